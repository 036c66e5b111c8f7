pub mod commands;
pub mod events;
pub mod macros;
pub mod model;
pub mod payload;
pub mod types;
pub mod update;

#[cfg(target_arch = "wasm32")]
pub mod wasm;


use crux_core::Command;

// Re-export core types
pub use crate::{
    commands::rtdb::{RtdbOperation, RtdbOutput},
    events::{Event, LedEvent, ScreenEvent, SensorEvent},
    model::{Model, SessionId},
    types::*,
};

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Rtdb(RtdbOperation),
}

pub type RtdbCmd = crate::commands::rtdb::Rtdb<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.view_model()
    }
}
