//! Extraction of the reply text from a flow run response.

use serde_json::Value;

use crate::error::FlowError;

enum Step {
    Key(&'static str),
    Index(usize),
}

/// `outputs[0].outputs[0].results.message`, followed by the `text` leaf.
const MESSAGE_PATH: [Step; 6] = [
    Step::Key("outputs"),
    Step::Index(0),
    Step::Key("outputs"),
    Step::Index(0),
    Step::Key("results"),
    Step::Key("message"),
];

/// Pull the chat reply out of a flow response.
///
/// Every segment of the path must exist and the leaf must be a string;
/// anything else is `MalformedResponse` naming the segment that failed.
pub fn extract_message_text(response: &Value) -> Result<String, FlowError> {
    let mut current = response;
    let mut walked = String::new();

    for step in MESSAGE_PATH.iter() {
        current = match step {
            Step::Key(key) => {
                let next = current.get(*key).ok_or_else(|| malformed(&walked, key))?;
                if !walked.is_empty() {
                    walked.push('.');
                }
                walked.push_str(key);
                next
            }
            Step::Index(i) => {
                let items = current
                    .as_array()
                    .ok_or_else(|| malformed_reason(format!("`{walked}` is not an array")))?;
                let next = items.get(*i).ok_or_else(|| {
                    malformed_reason(format!(
                        "`{walked}` has {} item(s), expected at least {}",
                        items.len(),
                        i + 1
                    ))
                })?;
                walked.push_str(&format!("[{i}]"));
                next
            }
        };
    }

    match current.get("text") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(malformed_reason(format!(
            "`{walked}.text` is {}, expected a string",
            kind(other)
        ))),
        None => Err(malformed(&walked, "text")),
    }
}

fn malformed(walked: &str, key: &str) -> FlowError {
    let at = if walked.is_empty() {
        "response".to_string()
    } else {
        format!("`{walked}`")
    };
    malformed_reason(format!("missing `{key}` in {at}"))
}

fn malformed_reason(reason: String) -> FlowError {
    FlowError::MalformedResponse { reason }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
