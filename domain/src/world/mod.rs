//! Worldbook domain.

pub mod entities;
