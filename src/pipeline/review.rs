//! Review synthesizer — a secondary automated critique of the aggregated
//! answer, produced by a bounded incremental-generation loop.
//!
//! Each iteration replays the accumulated review as a prior assistant turn
//! and asks the model to continue, so the output grows past the per-call
//! token ceiling. The loop stops at a word-count floor, at a natural
//! sentence stop, or when the service returns no choices. A single-shot
//! request truncated at the token ceiling would under-produce relative to
//! the intended length, which is why the continuation protocol exists.

use crate::llm::{ChatClient, ChatMessage, GenerationOptions};

/// Accumulated review stops growing once it reaches this many words.
const REVIEW_WORD_TARGET: usize = 500;

/// Returned in place of partial output when any completion call fails.
pub const REVIEW_ERROR_SENTINEL: &str = "Error in reviewing the answer";

const REVIEW_SYSTEM_PROMPT: &str =
    "You are a highly skilled medical review expert. Your task is to critically evaluate \
     medical diagnoses and remedies for accuracy and completeness.";

const CONTINUE_PROMPT: &str = "Continue from where you left off:";

fn review_prompt(condition: &str, initial_answer: &str) -> String {
    format!(
        "As a medical review expert, critically evaluate the following diagnosis and remedy \
         for accuracy and completeness:\n\n\
         Condition: {condition}\n\
         Initial Answer: {initial_answer}\n\n\
         Please provide your assessment in the following format:\n\
         1. Accuracy of diagnosis:\n\
         2. Completeness of remedies:\n\
         3. Any missing important information:\n\
         4. Suggested improvements or corrections:\n\
         5. Overall assessment (Correct/Partially Correct/Incorrect):\n\n\
         Be thorough in your evaluation."
    )
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A chunk ending in sentence-terminal punctuation is a natural stop.
fn ends_at_sentence(chunk: &str) -> bool {
    chunk.ends_with('.') || chunk.ends_with(':')
}

/// Produce the review narrative for a condition and its aggregated
/// remedy text.
pub fn review_answer(client: &dyn ChatClient, condition: &str, initial_answer: &str) -> String {
    let prompt = review_prompt(condition, initial_answer);
    let options = GenerationOptions::new(0.3, 300);

    let mut full_review = String::new();
    while word_count(&full_review) < REVIEW_WORD_TARGET {
        let messages = [
            ChatMessage::system(REVIEW_SYSTEM_PROMPT),
            ChatMessage::user(prompt.clone()),
            ChatMessage::assistant(full_review.clone()),
            ChatMessage::user(CONTINUE_PROMPT),
        ];

        let choices = match client.chat(&messages, &options) {
            Ok(choices) => choices,
            Err(e) => {
                tracing::warn!(error = %e, "Review synthesis failed");
                return REVIEW_ERROR_SENTINEL.to_string();
            }
        };

        let Some(content) = choices.first() else {
            // Exhausted: the service has nothing more to add.
            break;
        };
        let chunk = content.trim();
        if chunk.is_empty() {
            // An empty chunk can never advance the word count; treat it
            // like exhaustion rather than looping on it.
            break;
        }

        full_review.push(' ');
        full_review.push_str(chunk);

        if ends_at_sentence(chunk) {
            break;
        }
    }

    full_review.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatClient;

    /// A chunk with `words` words and no terminal punctuation.
    fn open_chunk(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn terminates_at_word_target_without_natural_stop() {
        // 60 words per chunk, never ending in '.' or ':' — the loop must
        // stop on the word-count predicate alone.
        let chunk = open_chunk(60);
        let client = MockChatClient::fixed(&chunk);

        let review = review_answer(&client, "Bronchitis", "home_remedy:\nrest");

        assert!(word_count(&review) >= REVIEW_WORD_TARGET);
        // ceil(500 / 60) iterations.
        assert_eq!(client.calls(), 9);
    }

    #[test]
    fn stops_early_on_period() {
        let client = MockChatClient::fixed("The diagnosis is accurate.");
        let review = review_answer(&client, "Bronchitis", "answer");
        assert_eq!(review, "The diagnosis is accurate.");
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn stops_early_on_colon() {
        let client = MockChatClient::fixed("5. Overall assessment (Correct/Partially Correct/Incorrect):");
        let review = review_answer(&client, "Bronchitis", "answer");
        assert_eq!(client.calls(), 1);
        assert!(review.ends_with(':'));
    }

    #[test]
    fn continues_past_open_chunk_until_terminal_one() {
        let open = open_chunk(10);
        let client = MockChatClient::sequence(&[&open, "And that concludes the review."]);
        let review = review_answer(&client, "Migraine", "answer");
        assert_eq!(client.calls(), 2);
        assert!(review.starts_with("word"));
        assert!(review.ends_with("concludes the review."));
    }

    #[test]
    fn zero_choices_end_the_loop_keeping_accumulated_text() {
        let open = open_chunk(10);
        let client = MockChatClient::script(vec![vec![open.clone()], vec![]]);
        let review = review_answer(&client, "Migraine", "answer");
        assert_eq!(review, open);
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn blank_chunks_do_not_loop_forever() {
        let client = MockChatClient::fixed("   ");
        let review = review_answer(&client, "Flu", "answer");
        assert!(review.is_empty());
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn immediate_exhaustion_yields_empty_review() {
        let client = MockChatClient::empty();
        let review = review_answer(&client, "Migraine", "answer");
        assert!(review.is_empty());
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn service_error_returns_sentinel_not_partial_output() {
        let client = MockChatClient::failing();
        let review = review_answer(&client, "Bronchitis", "answer");
        assert_eq!(review, REVIEW_ERROR_SENTINEL);
    }

    #[test]
    fn chunks_are_space_separated_and_result_trimmed() {
        let client = MockChatClient::sequence(&["first part", "second part."]);
        let review = review_answer(&client, "Flu", "answer");
        assert_eq!(review, "first part second part.");
    }

    #[test]
    fn prompt_contains_condition_answer_and_rubric() {
        let prompt = review_prompt("Bronchitis", "home_remedy:\nginger tea");
        assert!(prompt.contains("Condition: Bronchitis"));
        assert!(prompt.contains("Initial Answer: home_remedy:\nginger tea"));
        assert!(prompt.contains("1. Accuracy of diagnosis:"));
        assert!(prompt.contains("5. Overall assessment (Correct/Partially Correct/Incorrect):"));
    }
}
