//! Server-rendered pages: the login form and the chat view.

use secrecy::ExposeSecret;

use super::markdown::{escape_html, render_markdown};
use crate::chat::{Message, Role};
use crate::config::LoginDefaults;

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, sans-serif; color: #262730; background: #fff; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 280px; padding: 1.5rem 1rem; background: #f0f2f6; }
.sidebar p { margin: 0.4rem 0; font-size: 0.9rem; }
.sidebar .caption { color: #6b6f76; font-size: 0.8rem; }
.sidebar code { word-break: break-all; }
main { flex: 1; max-width: 760px; margin: 0 auto; padding: 2rem 1rem 7rem; }
.login { max-width: 460px; margin: 4rem auto; padding: 0 1rem; }
label { display: block; margin-top: 1rem; font-weight: 600; font-size: 0.9rem; }
input[type=text], input[type=password] { width: 100%; padding: 0.55rem; margin-top: 0.3rem; border: 1px solid #d0d3d9; border-radius: 6px; }
button { margin-top: 1rem; padding: 0.5rem 1rem; border: 1px solid #d0d3d9; border-radius: 6px; background: #fff; cursor: pointer; }
button:hover { border-color: #ff4b4b; color: #ff4b4b; }
.notice { margin: 1rem 0; padding: 0.75rem 1rem; border-radius: 6px; background: #fff3cd; color: #664d03; }
.bubble { margin: 0.75rem 0; padding: 0.6rem 1rem; border-radius: 8px; }
.bubble.human { background: #f0f2f6; }
.bubble.ai { background: #fff; border: 1px solid #e6e8ec; }
.bubble.error { background: #fdecea; border-color: #f5c2c0; color: #842029; }
.bubble .who { font-size: 0.75rem; color: #6b6f76; text-transform: uppercase; }
.chat-input { position: fixed; bottom: 0; left: 280px; right: 0; padding: 1rem; background: #fff; border-top: 1px solid #e6e8ec; }
.chat-input form { display: flex; gap: 0.5rem; max-width: 760px; margin: 0 auto; }
.chat-input input { flex: 1; margin: 0; }
.chat-input button { margin: 0; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn notice_block(notice: Option<&str>) -> String {
    notice
        .map(|text| format!(r#"<div class="notice" role="alert">{}</div>"#, escape_html(text)))
        .unwrap_or_default()
}

/// The login form, pre-filled from `defaults`.
pub fn login_page(defaults: &LoginDefaults, notice: Option<&str>) -> String {
    let url = defaults.url.as_deref().unwrap_or_default();
    let flow_id = defaults.flow_id.as_deref().unwrap_or_default();
    let api_key = defaults
        .api_key
        .as_ref()
        .map(|k| k.expose_secret())
        .unwrap_or_default();

    let body = format!(
        r#"<div class="login">
<h1>Langflow Chat</h1>
{notice}
<form method="post" action="/login">
<label for="url">Langflow URL</label>
<input type="text" id="url" name="url" placeholder="https://.../api/v1/run" value="{url}">
<label for="flow_id">Flow ID</label>
<input type="text" id="flow_id" name="flow_id" placeholder="Langflow Flow ID or Endpoint Name" value="{flow_id}">
<label for="api_key">API Key</label>
<input type="password" id="api_key" name="api_key" value="{api_key}">
<button type="submit">Login</button>
</form>
</div>"#,
        notice = notice_block(notice),
        url = escape_html(url),
        flow_id = escape_html(flow_id),
        api_key = escape_html(api_key),
    );
    page("Langflow Chat — Login", &body)
}

/// Everything the chat page shows.
pub struct ChatView<'a> {
    pub server_url: &'a str,
    pub flow_id: &'a str,
    pub welcome: Option<&'a str>,
    pub messages: &'a [Message],
    /// Failure of the last flow call, shown in the assistant's turn.
    pub error: Option<&'a str>,
}

fn bubble(message: &Message) -> String {
    let (class, who) = match message.role {
        Role::Human => ("human", "You"),
        Role::Ai => ("ai", "Assistant"),
    };
    format!(
        "<div class=\"bubble {class}\"><div class=\"who\">{who}</div>{}</div>\n",
        render_markdown(&message.content)
    )
}

pub fn chat_page(view: &ChatView<'_>) -> String {
    let welcome = view.welcome.map(render_markdown).unwrap_or_default();
    let transcript: String = view.messages.iter().map(bubble).collect();
    let error = view
        .error
        .map(|e| {
            format!(
                "<div class=\"bubble ai error\" role=\"alert\"><div class=\"who\">Assistant</div>{}</div>\n",
                escape_html(e)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<div class="layout">
<aside class="sidebar">
<form method="post" action="/logout">
<p class="caption">Welcome to Langflow Chat! You can reset the flow by clicking on the button below.</p>
<p>Langflow Server: <code>{server_url}</code></p>
<p>Flow ID: <code>{flow_id}</code></p>
<button type="submit">Reset Flow</button>
</form>
<form method="post" action="/conversation/delete">
<button type="submit">Delete Conversation</button>
</form>
<p class="caption">v{version}</p>
</aside>
<main>
<section class="welcome">{welcome}</section>
<section class="transcript">
{transcript}{error}</section>
</main>
<div class="chat-input">
<form method="post" action="/chat">
<input type="text" name="message" placeholder="What's up?" autocomplete="off" autofocus>
<button type="submit">Send</button>
</form>
</div>
</div>"#,
        server_url = escape_html(view.server_url),
        flow_id = escape_html(view.flow_id),
        version = env!("CARGO_PKG_VERSION"),
    );
    page("Langflow Chat", &body)
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn login_page_prefills_escaped_defaults() {
        let defaults = LoginDefaults {
            url: Some("http://host/run?a=1&b=2".to_string()),
            flow_id: Some("\"flow\"".to_string()),
            api_key: Some(SecretString::from("sk-1")),
        };
        let html = login_page(&defaults, None);
        assert!(html.contains(r#"value="http://host/run?a=1&amp;b=2""#));
        assert!(html.contains(r#"value="&quot;flow&quot;""#));
        assert!(html.contains(r#"type="password" id="api_key" name="api_key" value="sk-1""#));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn login_page_shows_notice() {
        let html = login_page(&LoginDefaults::default(), Some("Please fill in: Flow ID"));
        assert!(html.contains(r#"<div class="notice" role="alert">Please fill in: Flow ID</div>"#));
    }

    #[test]
    fn chat_page_renders_transcript_in_order() {
        let messages = vec![
            Message::ai("Hi. How Langflow can help you?"),
            Message::human("first"),
            Message::ai("second"),
        ];
        let html = chat_page(&ChatView {
            server_url: "http://host/run",
            flow_id: "flow-1",
            welcome: Some("# Welcome"),
            messages: &messages,
            error: None,
        });
        let a = html.find("How Langflow").unwrap();
        let b = html.find("first").unwrap();
        let c = html.find("second").unwrap();
        assert!(a < b && b < c);
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("<code>flow-1</code>"));
        assert!(!html.contains("bubble ai error"));
    }

    #[test]
    fn chat_error_follows_transcript() {
        let messages = vec![Message::ai("greeting"), Message::human("Hi")];
        let html = chat_page(&ChatView {
            server_url: "u",
            flow_id: "f",
            welcome: None,
            messages: &messages,
            error: Some("Flow returned HTTP 500: <boom>"),
        });
        let question = html.find("<p>Hi</p>").unwrap();
        let error = html.find("bubble ai error").unwrap();
        assert!(question < error);
        assert!(html.contains("Flow returned HTTP 500: &lt;boom&gt;"));
    }
}
