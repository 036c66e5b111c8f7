//! Domain-based type organization
//!
//! - source: the observed database paths
//! - store: store error taxonomy
//! - view_state: the mirrored state and its reducer
//! - view_model: what shells render

pub mod source;
pub mod store;
pub mod view_model;
pub mod view_state;

pub use source::*;
pub use store::*;
pub use view_model::*;
pub use view_state::*;
