//! Parsing of Gradio `text/event-stream` responses.
//!
//! A prediction stream is a series of blocks separated by blank lines:
//!
//! ```text
//! event: generating
//! data: null
//!
//! event: complete
//! data: [{"path": "/tmp/gradio/a.png", "url": "https://.../a.png"}, ...]
//! ```

use serde_json::Value;

/// One `event:`/`data:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// How a prediction stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// `event: complete` with the decoded output list.
    Complete(Value),
    /// `event: error`, with the server message if one was sent.
    Error(Option<String>),
    /// The stream closed without a terminal event.
    Incomplete,
}

/// Split an event-stream body into events. Comment lines and unknown fields
/// are skipped; multiple `data:` lines in one block are joined with `\n`.
pub fn parse_events(body: &str) -> Vec<SseEvent> {
    let mut events = Vec::new();
    let mut event = String::new();
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines().chain(std::iter::once("")) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if !event.is_empty() || !data.is_empty() {
                events.push(SseEvent {
                    event: if event.is_empty() {
                        "message".to_string()
                    } else {
                        std::mem::take(&mut event)
                    },
                    data: data.join("\n"),
                });
                data.clear();
            }
            continue;
        }
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => event = value.to_string(),
            "data" => data.push(value),
            _ => {}
        }
    }
    events
}

/// Find the terminal event of a prediction stream.
pub fn final_outcome(events: &[SseEvent]) -> StreamOutcome {
    for ev in events {
        match ev.event.as_str() {
            "complete" => {
                return match serde_json::from_str::<Value>(&ev.data) {
                    Ok(value) => StreamOutcome::Complete(value),
                    Err(e) => StreamOutcome::Error(Some(format!("undecodable output: {e}"))),
                };
            }
            "error" => {
                let trimmed = ev.data.trim();
                let message = if trimmed.is_empty() || trimmed == "null" {
                    None
                } else {
                    match serde_json::from_str::<Value>(trimmed) {
                        Ok(Value::String(s)) => Some(s),
                        _ => Some(trimmed.to_string()),
                    }
                };
                return StreamOutcome::Error(message);
            }
            _ => {}
        }
    }
    StreamOutcome::Incomplete
}
