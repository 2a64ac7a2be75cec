//! Generation parameters — transcript windows and per-pass model options.
//!
//! [`GenerationParams`] groups the static knobs the orchestrator and the
//! play-turn use case read. These are application-layer concerns, not domain
//! policy.

use crate::ports::llm_gateway::GenerationOptions;

/// Transcript windows and model options for each generation pass.
///
/// | Pass          | Transcript slice          | Options                 |
/// |---------------|---------------------------|-------------------------|
/// | Reply         | last `history_window`     | caller-supplied         |
/// | Story ending  | last `ending_window`      | `ending` (0.8, 800)     |
/// | Novelization  | first `novelization_window` | `novelization` (0.7, 1500) |
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// How many prior messages a reply sees.
    pub history_window: usize,
    /// How many trailing messages feed the story ending.
    pub ending_window: usize,
    /// How many leading messages feed the novelization.
    pub novelization_window: usize,
    /// Options for replies when the caller passes none of its own.
    pub reply: GenerationOptions,
    pub ending: GenerationOptions,
    pub novelization: GenerationOptions,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            history_window: 10,
            ending_window: 20,
            novelization_window: 30,
            reply: GenerationOptions::default(),
            ending: GenerationOptions::new()
                .with_temperature(0.8)
                .with_max_tokens(800),
            novelization: GenerationOptions::new()
                .with_temperature(0.7)
                .with_max_tokens(1500),
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_reply_options(mut self, options: GenerationOptions) -> Self {
        self.reply = options;
        self
    }
}
