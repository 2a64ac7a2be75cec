//! Application-level configuration.
//!
//! - [`GenerationParams`] — transcript windows and per-pass model options

pub mod generation_params;

pub use generation_params::GenerationParams;
