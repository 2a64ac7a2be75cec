//! Transcript slicing and turn assembly shared by the generation use cases.

use worldtale_domain::{ChatTurn, Message};

/// The trailing `n` messages.
pub(crate) fn last_n(messages: &[Message], n: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(n)..]
}

/// The leading `n` messages.
pub(crate) fn first_n(messages: &[Message], n: usize) -> &[Message] {
    &messages[..messages.len().min(n)]
}

/// System prompt, then history mapped by sender, then the new player turn.
pub(crate) fn reply_turns(
    system_prompt: String,
    history: &[Message],
    player_message: &str,
) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::system(system_prompt));
    turns.extend(history.iter().map(ChatTurn::from));
    turns.push(ChatTurn::user(player_message));
    turns
}
