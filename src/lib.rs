//! Langflow chat front-end.
//!
//! A small web app that gates each browser session on three credentials
//! (server URL, flow id, API key), then relays chat messages to the flow's
//! run endpoint and keeps the transcript in memory.

pub mod chat;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;
pub mod web;
