use anyhow::Result;
use crux_core::typegen::TypeGen;
use sensor_panel_core::{
    events::{LedEvent, ScreenEvent},
    types::{ConnectionStatus, Source},
    App, RtdbOutput,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<ScreenEvent>()?;
    gen.register_type::<LedEvent>()?;

    // Explicitly register other enums to ensure all variants are traced
    gen.register_type::<ConnectionStatus>()?;
    gen.register_type::<Source>()?;
    gen.register_type::<RtdbOutput>()?;

    let output_root = PathBuf::from("./generated");

    gen.swift("SharedTypes", output_root.join("swift"))?;
    gen.java("com.sensorpanel.shared_types", output_root.join("java"))?;
    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
