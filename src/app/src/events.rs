use serde::{Deserialize, Serialize};

use crate::commands::rtdb::RtdbOutput;
use crate::model::SessionId;
use crate::types::Source;

/// Screen lifecycle and user intents
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Open,
    Close,
    Refresh,
}

/// LED switch intents and write acknowledgements
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum LedEvent {
    Set {
        on: bool,
    },
    Toggle,

    #[serde(skip)]
    Written(Result<(), String>),
}

/// Deliveries from the database (internal events)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SensorEvent {
    /// Pushed by a standing subscription
    Observed {
        session: SessionId,
        source: Source,
        output: RtdbOutput,
    },
    /// Result of a manual refresh read
    Fetched {
        session: SessionId,
        source: Source,
        output: RtdbOutput,
    },
    SubscriptionEnded {
        source: Source,
        output: RtdbOutput,
    },
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    Screen(ScreenEvent),
    Led(LedEvent),

    #[serde(skip)]
    Sensor(SensorEvent),
}
