//! Decoder for the database's server-sent event streams.
//!
//! A streaming `GET` delivers frames such as
//!
//! ```text
//! event: put
//! data: {"path":"/","data":23.5}
//! ```
//!
//! separated by blank lines. Only the node itself is observed, so a `put` at
//! `/` carries the new value and everything else is bookkeeping.

use anyhow::{Context, Result, bail};
use log::debug;
use sensor_panel_core::RtdbOutput;
use serde::Deserialize;
use serde_json::Value;

/// One raw `event:`/`data:` frame
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Splits a byte stream into frames, buffering incomplete ones
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_frame(&String::from_utf8_lossy(&raw)) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn parse_frame(raw: &str) -> Option<Frame> {
    let mut frame = Frame::default();
    let mut data = Vec::new();

    for line in raw.lines() {
        if let Some(event) = line.strip_prefix("event:") {
            frame.event = event.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    if frame.event.is_empty() && data.is_empty() {
        return None;
    }

    frame.data = data.join("\n");
    Some(frame)
}

#[derive(Deserialize)]
struct Change {
    path: String,
    data: Value,
}

/// Decoded stream event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Put { path: String, data: Value },
    Patch { path: String, data: Value },
    KeepAlive,
    /// The server stopped the stream, typically for missing read permission
    Cancel(String),
    AuthRevoked,
}

impl TryFrom<Frame> for StreamEvent {
    type Error = anyhow::Error;

    fn try_from(frame: Frame) -> Result<Self> {
        let change = |data: &str| -> Result<Change> {
            serde_json::from_str(data)
                .with_context(|| format!("failed to parse {} payload: {data}", frame.event))
        };

        match frame.event.as_str() {
            "put" => {
                let Change { path, data } = change(&frame.data)?;
                Ok(Self::Put { path, data })
            }
            "patch" => {
                let Change { path, data } = change(&frame.data)?;
                Ok(Self::Patch { path, data })
            }
            "keep-alive" => Ok(Self::KeepAlive),
            "cancel" => {
                let reason = match serde_json::from_str::<Value>(&frame.data) {
                    Ok(Value::String(reason)) => reason,
                    _ if frame.data.trim().is_empty() || frame.data.trim() == "null" => {
                        "listen cancelled by server".to_string()
                    }
                    _ => frame.data.clone(),
                };
                Ok(Self::Cancel(reason))
            }
            "auth_revoked" => Ok(Self::AuthRevoked),
            other => bail!("failed to decode event stream: unknown event {other:?}"),
        }
    }
}

impl StreamEvent {
    /// What the core should see for this event, if anything
    pub fn into_output(self) -> Option<RtdbOutput> {
        match self {
            Self::Put { path, data } if path == "/" => Some(RtdbOutput::Value {
                data: (!data.is_null()).then(|| data.to_string()),
            }),
            Self::Put { path, .. } | Self::Patch { path, .. } => {
                debug!("ignoring change below observed node at {path}");
                None
            }
            Self::KeepAlive => None,
            Self::Cancel(message) => Some(RtdbOutput::Error { message }),
            Self::AuthRevoked => Some(RtdbOutput::Error {
                message: "auth token revoked".to_string(),
            }),
        }
    }
}
