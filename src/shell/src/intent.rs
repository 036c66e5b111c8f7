use anyhow::{Result, bail};
use sensor_panel_core::{Event, LedEvent, ScreenEvent};

pub const HELP: &str = "commands: on | off | toggle | refresh | help | quit";

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Event(Event),
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`
pub fn parse_intent(line: &str) -> Result<Option<Intent>> {
    let intent = match line.trim().to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "on" => Intent::Event(Event::Led(LedEvent::Set { on: true })),
        "off" => Intent::Event(Event::Led(LedEvent::Set { on: false })),
        "toggle" => Intent::Event(Event::Led(LedEvent::Toggle)),
        "refresh" => Intent::Event(Event::Screen(ScreenEvent::Refresh)),
        "help" | "?" => Intent::Help,
        "quit" | "exit" => Intent::Quit,
        other => bail!("unknown command {other:?} ({HELP})"),
    };

    Ok(Some(intent))
}
