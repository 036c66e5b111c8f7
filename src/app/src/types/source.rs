use serde::{Deserialize, Serialize};
use std::fmt;

use crate::commands::rtdb::RtdbOutput;
use crate::payload::{coerce_bool, coerce_f64};
use crate::types::{StoreError, Update};

pub const TEMPERATURE_PATH: &str = "Sensor/temperature";
pub const HUMIDITY_PATH: &str = "Sensor/humidity";
pub const LED_PATH: &str = "Led/status";

/// One of the observed database paths
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    Temperature,
    Humidity,
    Led,
}

impl Source {
    /// Everything the screen subscribes to while open.
    pub const OBSERVED: [Source; 3] = [Source::Temperature, Source::Humidity, Source::Led];

    /// Readings fetched again on manual refresh.
    pub const REFRESHED: [Source; 2] = [Source::Temperature, Source::Humidity];

    pub const fn path(self) -> &'static str {
        match self {
            Source::Temperature => TEMPERATURE_PATH,
            Source::Humidity => HUMIDITY_PATH,
            Source::Led => LED_PATH,
        }
    }

    /// Turn a shell output for this path into a reducer update.
    ///
    /// Outputs that carry no reading (`Written`, `Unsubscribed`) yield `None`.
    pub fn decode(self, output: RtdbOutput) -> Option<Update> {
        let reading = match output {
            RtdbOutput::Value { data } => Ok(data),
            RtdbOutput::Error { message } => Err(StoreError::read(self.path(), message)),
            RtdbOutput::Written | RtdbOutput::Unsubscribed => return None,
        };

        let update = match self {
            Source::Temperature => {
                Update::Temperature(reading.map(|data| coerce_f64(data.as_deref())))
            }
            Source::Humidity => Update::Humidity(reading.map(|data| coerce_f64(data.as_deref()))),
            Source::Led => Update::Led(reading.map(|data| coerce_bool(data.as_deref()))),
        };

        Some(update)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(data: &str) -> RtdbOutput {
        RtdbOutput::Value {
            data: Some(data.to_string()),
        }
    }

    #[test]
    fn paths_match_the_database_layout() {
        assert_eq!(Source::Temperature.path(), "Sensor/temperature");
        assert_eq!(Source::Humidity.path(), "Sensor/humidity");
        assert_eq!(Source::Led.path(), "Led/status");
    }

    #[test]
    fn values_are_coerced_per_source() {
        assert_eq!(
            Source::Temperature.decode(value("23.5")),
            Some(Update::Temperature(Ok(23.5)))
        );
        assert_eq!(
            Source::Humidity.decode(value("\"oops\"")),
            Some(Update::Humidity(Ok(0.0)))
        );
        assert_eq!(
            Source::Led.decode(value("true")),
            Some(Update::Led(Ok(true)))
        );
        assert_eq!(
            Source::Led.decode(RtdbOutput::Value { data: None }),
            Some(Update::Led(Ok(false)))
        );
    }

    #[test]
    fn errors_become_read_failures() {
        let output = RtdbOutput::Error {
            message: "Permission denied".to_string(),
        };
        assert_eq!(
            Source::Temperature.decode(output),
            Some(Update::Temperature(Err(StoreError::read(
                TEMPERATURE_PATH,
                "Permission denied"
            ))))
        );
    }

    #[test]
    fn acknowledgements_carry_no_reading() {
        assert_eq!(Source::Led.decode(RtdbOutput::Written), None);
        assert_eq!(Source::Humidity.decode(RtdbOutput::Unsubscribed), None);
    }
}
