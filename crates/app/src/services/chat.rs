use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, Result, require};
use crate::services::{AuxiliaryOutcome, SharedConfig, UsageService, open_db};
use crate::util::time::now_ts;
use ledger_core::{MessageRole, TrackerSnapshot};
use ledger_db::Db;

/// Structured expense extracted from free text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParsedExpense {
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub category_id: String,
    pub payment_method: String,
    pub description: Option<String>,
}

/// Failure reported by an external parser or responder.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{0}")]
pub struct ParserError(pub String);

pub trait ExpenseParser {
    fn parse(&self, message: &str) -> std::result::Result<ParsedExpense, ParserError>;
}

impl<F> ExpenseParser for F
where
    F: Fn(&str) -> std::result::Result<ParsedExpense, ParserError>,
{
    fn parse(&self, message: &str) -> std::result::Result<ParsedExpense, ParserError> {
        self(message)
    }
}

/// Conversational reply generator.
pub trait ChatResponder {
    fn respond(&self, message: &str) -> std::result::Result<String, ParserError>;
}

impl<F> ChatResponder for F
where
    F: Fn(&str) -> std::result::Result<String, ParserError>,
{
    fn respond(&self, message: &str) -> std::result::Result<String, ParserError> {
        self(message)
    }
}

pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> u64;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> u64,
{
    fn count_tokens(&self, text: &str) -> u64 {
        self(text)
    }
}

/// Parser result plus the outcome of each usage logging step, in order.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub result: std::result::Result<ParsedExpense, ParserError>,
    pub logging: Vec<AuxiliaryOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub logging: Vec<AuxiliaryOutcome>,
}

/// Message flows that record both sides of each exchange as usage.
#[derive(Clone)]
pub struct ChatService {
    config: SharedConfig,
    usage: UsageService,
}

impl ChatService {
    pub(super) fn new(config: SharedConfig, usage: UsageService) -> Self {
        Self { config, usage }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn parse_expense(
        &self,
        user_id: &str,
        tracker_id: &str,
        message: &str,
        parser: &impl ExpenseParser,
        tokens: &impl TokenCounter,
    ) -> Result<ParseOutcome> {
        require(message, "message")?;
        require(tracker_id, "tracker id")?;
        let snapshot = self.snapshot_for(user_id, tracker_id)?;
        let mut logging = vec![self.log(user_id, &snapshot, MessageRole::User, message, tokens)];

        let result = parser.parse(message);
        let reply = match &result {
            Ok(parsed) => format!(
                "Parsed expense: {} for {} via {}",
                parsed.amount, parsed.subcategory, parsed.payment_method
            ),
            Err(err) => err.to_string(),
        };
        logging.push(self.log(user_id, &snapshot, MessageRole::Assistant, &reply, tokens));
        Ok(ParseOutcome { result, logging })
    }

    /// Free-form chat. Usage is logged only when a tracker is given.
    ///
    /// A tracker that cannot be resolved skips logging; the reply still goes out.
    pub fn chat(
        &self,
        user_id: &str,
        tracker_id: Option<&str>,
        message: &str,
        responder: &impl ChatResponder,
        tokens: &impl TokenCounter,
    ) -> Result<ChatReply> {
        require(message, "message")?;
        let mut logging = Vec::new();
        let snapshot = match tracker_id {
            Some(tracker_id) => match self.snapshot_for(user_id, tracker_id) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    logging.push(AuxiliaryOutcome::record("resolve tracker", Err::<(), _>(err)));
                    None
                }
            },
            None => None,
        };
        if let Some(snapshot) = &snapshot {
            logging.push(self.log(user_id, snapshot, MessageRole::User, message, tokens));
        }
        let response = responder
            .respond(message)
            .map_err(|err| AppError::Message(format!("chat response: {}", err)))?;
        if let Some(snapshot) = &snapshot {
            logging.push(self.log(user_id, snapshot, MessageRole::Assistant, &response, tokens));
        }
        Ok(ChatReply { response, logging })
    }

    fn snapshot_for(&self, user_id: &str, tracker_id: &str) -> Result<TrackerSnapshot> {
        let tracker = self
            .db()?
            .get_tracker(user_id, tracker_id)?
            .ok_or_else(|| AppError::NotFound("tracker not found".to_string()))?;
        Ok(TrackerSnapshot::capture(&tracker, &now_ts()))
    }

    fn log(
        &self,
        user_id: &str,
        snapshot: &TrackerSnapshot,
        role: MessageRole,
        content: &str,
        tokens: &impl TokenCounter,
    ) -> AuxiliaryOutcome {
        let token_count = tokens.count_tokens(content);
        AuxiliaryOutcome::record(
            "log usage",
            self.usage
                .log_usage(user_id, snapshot, role, content, token_count),
        )
    }
}
