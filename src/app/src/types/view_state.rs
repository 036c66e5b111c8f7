use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::StoreError;

/// Whether the temperature stream is currently delivering values
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// Label shown next to the status indicator
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Đang kết nối",
            ConnectionStatus::Disconnected => "Mất kết nối",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("Connected"),
            ConnectionStatus::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Last observed sensor values; each field is updated on its own
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub led_on: bool,
}

/// Everything the reducer folds into the view state
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Temperature(Result<f64, StoreError>),
    Humidity(Result<f64, StoreError>),
    Led(Result<bool, StoreError>),
    RefreshRequested,
}

impl Update {
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Update::Temperature(Err(e)) | Update::Humidity(Err(e)) | Update::Led(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// Mirror of the observed database values plus the derived flags.
///
/// Only the temperature stream drives `connection` and clears `is_loading`;
/// humidity and LED failures leave both untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub reading: SensorReading,
    pub device: DeviceState,
    pub connection: ConnectionStatus,
    pub is_loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            reading: SensorReading::default(),
            device: DeviceState::default(),
            connection: ConnectionStatus::Disconnected,
            is_loading: true,
        }
    }
}

impl ViewState {
    /// Fold one update into a new state.
    #[must_use]
    pub fn reduce(self, update: &Update) -> Self {
        let mut next = self;

        match update {
            Update::Temperature(Ok(temperature)) => {
                next.reading.temperature = *temperature;
                next.connection = ConnectionStatus::Connected;
                next.is_loading = false;
            }
            Update::Temperature(Err(_)) => {
                next.connection = ConnectionStatus::Disconnected;
                next.is_loading = false;
            }
            Update::Humidity(Ok(humidity)) => next.reading.humidity = *humidity,
            Update::Led(Ok(led_on)) => next.device.led_on = *led_on,
            Update::Humidity(Err(_)) | Update::Led(Err(_)) => {}
            Update::RefreshRequested => next.is_loading = true,
        }

        next
    }
}
