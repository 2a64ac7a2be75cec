//! Prompt construction.
//!
//! - [`persona::compile`] — character + world → system prompt
//! - [`narrative::NarrativeTemplate`] — ending and novelization prompts
//! - [`turn::ChatTurn`] — role-tagged turns sent to a model

pub mod narrative;
pub mod persona;
pub mod turn;

pub use narrative::NarrativeTemplate;
pub use persona::compile;
pub use turn::{ChatTurn, Role};
