pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::{RangeFallback, RangeParams};
pub use error::{ApiError, AppError, Result};
pub use services::{
    AppServices, AuxiliaryOutcome, ChatReply, ChatResponder, ExpenseParser, NewTracker, Outcome,
    ParseOutcome, ParsedExpense, ParserError, SettingsSnapshot, TokenCounter, TrackerUpdate,
};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::time::{RangeFilter, resolve_range, resolve_range_at};
