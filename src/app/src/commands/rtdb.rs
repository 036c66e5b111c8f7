//! Realtime database command definitions.
//!
//! These types define the interface between the Core and the Shell for the
//! remote key-value store. Values cross the boundary as JSON text so every
//! shell can hand over whatever its database SDK delivers.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Operations that the Shell needs to perform against the database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RtdbOperation {
    /// Observe a path; the shell answers with one output per change until
    /// the matching `Unsubscribe` arrives.
    Subscribe { path: String },
    Unsubscribe { path: String },
    /// One-shot read of the current value.
    Read { path: String },
    Write { path: String, value: String },
}

// The output from database operations (shell tells us what happened)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RtdbOutput {
    /// Current value of the path as JSON, `None` when the node is absent.
    Value { data: Option<String> },
    Written,
    Unsubscribed,
    Error { message: String },
}

impl RtdbOutput {
    /// Interpret the output of a `Write` operation.
    pub fn into_write_result(self) -> Result<(), String> {
        match self {
            RtdbOutput::Written => Ok(()),
            RtdbOutput::Error { message } => Err(message),
            other => Err(format!("unexpected write response: {other:?}")),
        }
    }
}

impl Operation for RtdbOperation {
    type Output = RtdbOutput;
}

/// Command-based realtime database API
pub struct Rtdb<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Rtdb<Effect, Event>
where
    Effect: Send + From<crux_core::Request<RtdbOperation>> + 'static,
    Event: Send + 'static,
{
    /// Observe a path, sending one event per delivered output
    pub fn subscribe<F>(path: impl Into<String>, make_event: F) -> Command<Effect, Event>
    where
        F: Fn(RtdbOutput) -> Event + Send + 'static,
    {
        Command::stream_from_shell(RtdbOperation::Subscribe { path: path.into() })
            .then_send(make_event)
    }

    /// Stop observing a path
    pub fn unsubscribe<F>(path: impl Into<String>, make_event: F) -> Command<Effect, Event>
    where
        F: FnOnce(RtdbOutput) -> Event + Send + 'static,
    {
        Command::request_from_shell(RtdbOperation::Unsubscribe { path: path.into() })
            .then_send(make_event)
    }

    /// Fetch the current value of a path once
    pub fn read<F>(path: impl Into<String>, make_event: F) -> Command<Effect, Event>
    where
        F: FnOnce(RtdbOutput) -> Event + Send + 'static,
    {
        Command::request_from_shell(RtdbOperation::Read { path: path.into() })
            .then_send(make_event)
    }

    /// Replace the value of a path with the given JSON
    pub fn write<F>(
        path: impl Into<String>,
        value: impl Into<String>,
        make_event: F,
    ) -> Command<Effect, Event>
    where
        F: FnOnce(RtdbOutput) -> Event + Send + 'static,
    {
        Command::request_from_shell(RtdbOperation::Write {
            path: path.into(),
            value: value.into(),
        })
        .then_send(make_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_is_a_successful_write() {
        assert_eq!(RtdbOutput::Written.into_write_result(), Ok(()));
    }

    #[test]
    fn error_carries_its_message() {
        let output = RtdbOutput::Error {
            message: "Permission denied".to_string(),
        };
        assert_eq!(
            output.into_write_result(),
            Err("Permission denied".to_string())
        );
    }

    #[test]
    fn value_is_not_a_write_acknowledgement() {
        let output = RtdbOutput::Value {
            data: Some("true".to_string()),
        };
        assert!(output
            .into_write_result()
            .unwrap_err()
            .starts_with("unexpected write response"));
    }
}
