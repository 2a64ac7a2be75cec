//! Prompt templates for closing a session: story endings and novelization

use crate::session::message::{Message, Sender};
use crate::world::entities::Worldbook;

/// Templates for the two end-of-session narrative passes
pub struct NarrativeTemplate;

impl NarrativeTemplate {
    /// System prompt for the story ending pass
    pub fn ending_system() -> &'static str {
        r#"You are an experienced storyteller who writes endings for stories already in progress.
Craft a fitting ending covering the resolution of the plot, the consequences of the player's actions, the fates of the characters and the theme of the story."#
    }

    /// User prompt for the story ending pass.
    ///
    /// Only player and character lines make it into the transcript.
    pub fn ending_prompt(worldbook: Option<&Worldbook>, messages: &[Message]) -> String {
        let mut prompt = String::from(
            "Based on the conversation history below, write a fitting ending to the story. \
The ending should take into account the player's actions and choices as well as the overall development of the story.\n\n",
        );

        push_background(&mut prompt, worldbook);

        prompt.push_str("Conversation summary:\n");
        for message in messages {
            match message.sender {
                Sender::Player | Sender::Character => {
                    prompt.push_str(&format!("{}: {}\n", message.speaker_name(), message.content));
                }
                Sender::System => {}
            }
        }

        prompt.push_str(
            r#"
Write a story ending of 300-500 words that covers:
1. The resolution of the main plot
2. The consequences of the player's actions
3. The fates of the main characters
4. The overall theme or moral of the story"#,
        );

        prompt
    }

    /// System prompt for the novelization pass
    pub fn novelization_system() -> &'static str {
        r#"You are a skilled novelist who turns dialogue into vivid narrative prose."#
    }

    /// User prompt for the novelization pass.
    ///
    /// System messages are kept, rendered in brackets, since they usually
    /// carry scene changes.
    pub fn novelization_prompt(worldbook: Option<&Worldbook>, messages: &[Message]) -> String {
        let mut prompt = String::from(
            "Convert the conversation history below into prose in the form of a novel. \
The prose should have a smooth narrative, vivid description and fitting emotional expression.\n\n",
        );

        push_background(&mut prompt, worldbook);

        prompt.push_str("Conversation history:\n");
        for message in messages {
            match message.sender {
                Sender::Player | Sender::Character => {
                    prompt.push_str(&format!("{}: {}\n", message.speaker_name(), message.content));
                }
                Sender::System => {
                    prompt.push_str(&format!("[System: {}]\n", message.content));
                }
            }
        }

        prompt.push_str(
            r#"
Rewrite this conversation as a novel, including:
1. Scene description
2. The characters' inner thoughts
3. Descriptions of action
4. Atmosphere of the surroundings

Keep the core content and emotion of the original dialogue, adding detail and description to bring the story to life."#,
        );

        prompt
    }
}

fn push_background(prompt: &mut String, worldbook: Option<&Worldbook>) {
    if let Some(world) = worldbook {
        prompt.push_str(&format!(
            "Story background: {}\n{}\n\n",
            world.title, world.description
        ));
    }
}
