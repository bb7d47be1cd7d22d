//! Prompt template for technology suggestions.

use crate::types::ChatMessage;

/// Number of technologies requested per title.
pub const EXPECTED_ITEMS: usize = 5;

/// Maximum words per technology name requested from the model.
pub const MAX_WORDS_PER_ITEM: usize = 2;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the user instruction for one patent title.
pub fn build_prompt(title: &str) -> String {
    format!(
        "This is the title of an invented patent: \"{title}\"\n\
         Please suggest exactly {EXPECTED_ITEMS} technologies that are highly relevant to this patent.\n\
         Each technology name should be at most {MAX_WORDS_PER_ITEM} words.\n\
         Answer in English only and do not use the word \"and\".\n\
         Do not include explanations—only list the names.\n\
         Response format: 'technology1, technology2, technology3, technology4, technology5'"
    )
}

/// System + user messages for one title.
pub fn build_messages(title: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(build_prompt(title))]
}

/// Count comma-separated items the way the format check sees them.
pub fn count_items(response: &str) -> usize {
    response.split(',').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_title() {
        let prompt = build_prompt("Solid-state battery cell");
        assert!(prompt.contains("\"Solid-state battery cell\""));
        assert!(prompt.contains("exactly 5 technologies"));
        assert!(prompt.contains("at most 2 words"));
    }

    #[test]
    fn test_messages_roles() {
        let messages = build_messages("x");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_count_items() {
        assert_eq!(count_items("a, b, c, d, e"), 5);
        assert_eq!(count_items("one long sentence"), 1);
        assert_eq!(count_items(""), 1);
    }
}
