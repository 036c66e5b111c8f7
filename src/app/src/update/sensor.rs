use crux_core::Command;
use log::{debug, warn};

use crate::commands::rtdb::RtdbOutput;
use crate::events::{Event, SensorEvent};
use crate::model::{Model, SessionId};
use crate::types::Source;
use crate::update_field;
use crate::Effect;

/// Handle values and errors delivered by the database
pub fn handle(event: SensorEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        SensorEvent::Observed {
            session,
            source,
            output,
        }
        | SensorEvent::Fetched {
            session,
            source,
            output,
        } => apply(model, session, source, output),

        SensorEvent::SubscriptionEnded { source, output } => {
            match output {
                RtdbOutput::Error { message } => {
                    warn!("failed to unsubscribe from {source}: {message}")
                }
                _ => debug!("unsubscribed from {source}"),
            }
            Command::done()
        }
    }
}

fn apply(
    model: &mut Model,
    session: SessionId,
    source: Source,
    output: RtdbOutput,
) -> Command<Effect, Event> {
    if !model.is_current(session) {
        debug!("dropping {source} delivery from stale session {session}");
        return Command::done();
    }

    let Some(update) = source.decode(output) else {
        return Command::done();
    };

    if let Some(err) = update.error() {
        warn!("{err}");
    }

    update_field!(model.view, model.view.reduce(&update))
}
