use crux_core::Command;
use log::{debug, warn};

use crate::events::{Event, LedEvent};
use crate::model::Model;
use crate::payload::encode_bool;
use crate::types::{StoreError, LED_PATH};
use crate::{Effect, RtdbCmd};

/// Handle LED switch intents.
///
/// The displayed switch state is never changed here; it follows the
/// `Led/status` subscription, which redelivers every successful write.
pub fn handle(event: LedEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        LedEvent::Set { on } => write(model, on),
        LedEvent::Toggle => write(model, !model.view.device.led_on),

        LedEvent::Written(Ok(())) => {
            debug!("wrote {LED_PATH}");
            Command::done()
        }
        LedEvent::Written(Err(message)) => {
            warn!("{}", StoreError::write(LED_PATH, message));
            Command::done()
        }
    }
}

fn write(model: &Model, on: bool) -> Command<Effect, Event> {
    if !model.is_open() {
        debug!("ignoring LED write while screen is closed");
        return Command::done();
    }

    RtdbCmd::write(LED_PATH, encode_bool(on), |output| {
        Event::Led(LedEvent::Written(output.into_write_result()))
    })
}
