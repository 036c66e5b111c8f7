use crux_core::{render::render, Command};
use log::{debug, info};

use crate::events::{Event, ScreenEvent, SensorEvent};
use crate::model::Model;
use crate::types::{Source, Update};
use crate::{Effect, RtdbCmd};

/// Handle screen lifecycle events (open, close, manual refresh)
pub fn handle(event: ScreenEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ScreenEvent::Open => open(model),
        ScreenEvent::Close => close(model),
        ScreenEvent::Refresh => refresh(model),
    }
}

fn open(model: &mut Model) -> Command<Effect, Event> {
    if let Some(session) = model.session {
        debug!("screen already open in session {session}");
        return Command::done();
    }

    let session = model.open_session();
    info!("opening screen, session {session}");

    let subscriptions = Source::OBSERVED.into_iter().map(|source| {
        RtdbCmd::subscribe(source.path(), move |output| {
            Event::Sensor(SensorEvent::Observed {
                session,
                source,
                output,
            })
        })
    });

    Command::all(std::iter::once(render()).chain(subscriptions))
}

fn close(model: &mut Model) -> Command<Effect, Event> {
    let Some(session) = model.close_session() else {
        debug!("screen already closed");
        return Command::done();
    };
    info!("closing screen, session {session}");

    let unsubscriptions = Source::OBSERVED.into_iter().map(|source| {
        RtdbCmd::unsubscribe(source.path(), move |output| {
            Event::Sensor(SensorEvent::SubscriptionEnded { source, output })
        })
    });

    Command::all(std::iter::once(render()).chain(unsubscriptions))
}

fn refresh(model: &mut Model) -> Command<Effect, Event> {
    let Some(session) = model.session else {
        debug!("ignoring refresh while screen is closed");
        return Command::done();
    };

    model.view = model.view.reduce(&Update::RefreshRequested);

    let reads = Source::REFRESHED.into_iter().map(|source| {
        RtdbCmd::read(source.path(), move |output| {
            Event::Sensor(SensorEvent::Fetched {
                session,
                source,
                output,
            })
        })
    });

    Command::all(std::iter::once(render()).chain(reads))
}
