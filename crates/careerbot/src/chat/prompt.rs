//! Prompt assembly
//!
//! Combines the serialized knowledge table, prior turns, and the latest
//! major/question pair into a [`Prompt`] that any [`crate::model::ChatModel`]
//! can translate into its wire format.
//!
//! The assembler never inspects whether the major is in the table. Unknown
//! majors are handled by the instruction text itself.

use crate::chat::prompts::{EMPTY_HISTORY, HUMAN_TEMPLATE, SYSTEM_TEMPLATE};
use crate::chat::turn::Turn;

/// A fully assembled request, independent of provider wire format
#[derive(Debug, Clone)]
pub struct Prompt {
    /// System instruction with the knowledge table and history embedded
    pub system: String,
    /// Prior turns, oldest first
    pub history: Vec<Turn>,
    /// Latest human message
    pub user: String,
}

/// Assemble a prompt from the user's fields, the serialized table, and history
///
/// Inputs are passed through unchanged, including empty strings.
pub fn assemble(major: &str, question: &str, career_data: &str, history: &[Turn]) -> Prompt {
    let chat_history = render_history(history);

    let system = fill(
        SYSTEM_TEMPLATE,
        &[
            ("career_data", career_data),
            ("chat_history", &chat_history),
            ("major", major),
            ("user_input", question),
        ],
    );
    let user = fill(HUMAN_TEMPLATE, &[("major", major), ("user_input", question)]);

    Prompt {
        system,
        history: history.to_vec(),
        user,
    }
}

/// One `role: content` line per turn
fn render_history(history: &[Turn]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    history
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute `{name}` placeholders in a single pass
///
/// Substituted values are never rescanned, so user text containing
/// something like `{major}` is left alone.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
