//! Fixed prompt sent with every query

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// User message wrapping the shopper's query
pub fn user_prompt(query: &str) -> String {
    format!(
        "Parse the following user query to identify product attributes and price constraints: '{}'. \
         List attributes and any specific price constraints.",
        query
    )
}
