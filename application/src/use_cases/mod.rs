//! Use cases (application services)

pub mod conversation_store;
pub mod orchestrator;
pub mod play_turn;
pub(crate) mod transcript;

#[cfg(test)]
pub(crate) mod test_support;
