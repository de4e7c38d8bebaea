//! Query interpretation

use std::sync::Arc;

use goods_core::QueryConstraints;
use tracing::{debug, error, instrument};

use crate::openai::LanguageService;
use crate::parser::{parse_reply, ParsedReply};
use crate::prompt::{user_prompt, SYSTEM_PROMPT};

/// What the language model made of a query
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Understood(QueryConstraints),
    /// The model answered, but no attributes or price could be read from it
    NotUnderstood { reply: String },
    /// The model could not be reached or returned nothing
    ServiceFailed { reason: String },
}

/// Turns free-text queries into search constraints
#[derive(Clone)]
pub struct QueryInterpreter {
    service: Arc<dyn LanguageService>,
}

impl QueryInterpreter {
    pub fn new(service: Arc<dyn LanguageService>) -> Self {
        Self { service }
    }

    /// Trimmed model reply, or an empty string when the call fails
    pub async fn raw_reply(&self, query: &str) -> String {
        match self.service.complete(SYSTEM_PROMPT, &user_prompt(query)).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                error!("Error processing query with language model: {}", e);
                String::new()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn interpret(&self, query: &str) -> Interpretation {
        let reply = match self.service.complete(SYSTEM_PROMPT, &user_prompt(query)).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                error!("Error processing query with language model: {}", e);
                return Interpretation::ServiceFailed {
                    reason: e.to_string(),
                };
            }
        };

        if reply.is_empty() {
            return Interpretation::ServiceFailed {
                reason: "Empty reply from language model".to_string(),
            };
        }

        match parse_reply(&reply) {
            ParsedReply::Constraints(constraints) => {
                debug!(
                    "Extracted attributes={:?} min_price={:?}",
                    constraints.attributes, constraints.min_price
                );
                Interpretation::Understood(constraints)
            }
            ParsedReply::Unparsed => {
                debug!("No constraints found in reply");
                Interpretation::NotUnderstood { reply }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use goods_core::{GoodsError, GoodsResult};
    use std::sync::Mutex;

    use super::*;

    /// Returns a fixed reply and records the prompts it saw
    struct ScriptedService {
        reply: GoodsResult<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedService {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(GoodsError::network("connection refused")),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageService for ScriptedService {
        async fn complete(&self, system: &str, user: &str) -> GoodsResult<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(e) => Err(GoodsError::network(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_interpret_understood() {
        let service = ScriptedService::replying("Attributes: eco, lotion\nMinimum price: 20\n");
        let interpreter = QueryInterpreter::new(service.clone());

        let result = interpreter.interpret("eco lotion over 20").await;
        assert_eq!(
            result,
            Interpretation::Understood(QueryConstraints::new(
                vec!["eco".to_string(), "lotion".to_string()],
                Some(20.0)
            ))
        );

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen[0].0, "You are a helpful assistant.");
        assert!(seen[0].1.contains("'eco lotion over 20'"));
    }

    #[tokio::test]
    async fn test_interpret_not_understood() {
        let interpreter = QueryInterpreter::new(ScriptedService::replying("  Sorry, could you clarify?  "));

        assert_eq!(
            interpreter.interpret("hmm").await,
            Interpretation::NotUnderstood {
                reply: "Sorry, could you clarify?".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_interpret_service_failure() {
        let interpreter = QueryInterpreter::new(ScriptedService::failing());

        let result = interpreter.interpret("soap").await;
        assert!(matches!(result, Interpretation::ServiceFailed { .. }));
    }

    #[tokio::test]
    async fn test_interpret_empty_reply_is_failure() {
        let interpreter = QueryInterpreter::new(ScriptedService::replying("   "));
        assert!(matches!(
            interpreter.interpret("soap").await,
            Interpretation::ServiceFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_raw_reply() {
        let interpreter = QueryInterpreter::new(ScriptedService::replying("\n Attributes: soap \n"));
        assert_eq!(interpreter.raw_reply("soap").await, "Attributes: soap");

        let failing = QueryInterpreter::new(ScriptedService::failing());
        assert_eq!(failing.raw_reply("soap").await, "");
    }
}
