mod led;
mod screen;
mod sensor;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Screen(event) => screen::handle(event, model),
        Event::Sensor(event) => sensor::handle(event, model),
        Event::Led(event) => led::handle(event, model),
    }
}
