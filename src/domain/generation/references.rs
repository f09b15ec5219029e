//! Mixture-of-Agents aggregation prompt.
//!
//! When earlier model answers are supplied, the aggregator model receives
//! them as a system message ahead of the conversation.

const AGGREGATOR_PROMPT: &str = "You have been provided with a set of responses from various open-source models to the latest user query. Your task is to synthesize these responses into a single, high-quality response. It is crucial to critically evaluate the information provided in these responses, recognizing that some of it may be biased or incorrect. Your response should not simply replicate the given answers but should offer a refined, accurate, and comprehensive reply to the instruction. Ensure your response is well-structured, coherent, and adheres to the highest standards of accuracy and reliability.\n\nResponses from models:";

/// Builds the aggregator system prompt, or `None` when there is nothing to aggregate.
pub fn aggregator_system_prompt(references: &[String]) -> Option<String> {
    if references.is_empty() {
        return None;
    }

    let mut prompt = String::from(AGGREGATOR_PROMPT);
    for (i, reference) in references.iter().enumerate() {
        prompt.push_str(&format!("\n{}. {}", i + 1, reference));
    }
    Some(prompt)
}
