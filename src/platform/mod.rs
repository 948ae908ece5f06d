//! Platform abstraction layer
//!
//! Browser events are translated into simulation input here so that the
//! host wiring in `main.rs` stays thin.

pub mod input;

pub use input::{PointerPhase, is_game_key, key_to_input, pointer_to_input};
