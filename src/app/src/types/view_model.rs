use serde::{Deserialize, Serialize};

use crate::types::{ConnectionStatus, ViewState};

/// Shown instead of the readings until the first temperature result arrives
pub const CONNECTING_TEXT: &str = "Đang kết nối Firebase...";

/// What the shell renders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub temperature: f64,
    /// One decimal, e.g. `23.5°C`
    pub temperature_text: String,
    pub humidity: f64,
    /// Whole percent, e.g. `45%`
    pub humidity_text: String,
    pub led_on: bool,
    pub connection: ConnectionStatus,
    pub connection_text: String,
    pub is_loading: bool,
    pub is_open: bool,
}

impl ViewModel {
    pub fn new(state: &ViewState, is_open: bool) -> Self {
        Self {
            temperature: state.reading.temperature,
            temperature_text: format!("{:.1}°C", state.reading.temperature),
            humidity: state.reading.humidity,
            humidity_text: format!("{:.0}%", state.reading.humidity),
            led_on: state.device.led_on,
            connection: state.connection,
            connection_text: state.connection.label().to_string(),
            is_loading: state.is_loading,
            is_open,
        }
    }
}
