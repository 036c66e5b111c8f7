//! Foreign types for shells are generated by `build.rs` into `generated/`.
