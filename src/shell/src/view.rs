use sensor_panel_core::{CONNECTING_TEXT, ViewModel};

/// One log line per rendered view model.
///
/// Readings are hidden while loading; only the status is shown.
pub fn render_line(view: &ViewModel) -> String {
    if !view.is_open {
        return "screen closed".to_string();
    }

    if view.is_loading {
        return format!("[{}] {CONNECTING_TEXT}", view.connection_text);
    }

    format!(
        "[{}] temperature {} | humidity {} | LED {}",
        view.connection_text,
        view.temperature_text,
        view.humidity_text,
        if view.led_on { "on" } else { "off" },
    )
}
