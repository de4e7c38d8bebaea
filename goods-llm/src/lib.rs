//! Query interpretation through a chat-completion model
//!
//! A free-text shopping query is sent to the language model with a fixed
//! prompt; the free-text reply is parsed into [`QueryConstraints`]
//! (attribute tokens and an optional minimum price).
//!
//! [`QueryConstraints`]: goods_core::QueryConstraints

pub mod interpreter;
pub mod openai;
pub mod parser;
pub mod prompt;

pub use interpreter::{Interpretation, QueryInterpreter};
pub use openai::{LanguageService, OpenAIClient, DEFAULT_CHAT_MODEL};
pub use parser::{parse_reply, ParsedReply};
