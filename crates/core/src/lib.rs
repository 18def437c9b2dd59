use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerType {
    #[default]
    Personal,
    Business,
}

impl TrackerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerType::Personal => "personal",
            TrackerType::Business => "business",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Some(TrackerType::Personal),
            "business" => Some(TrackerType::Business),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// Live tracker row as owned by tracker management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub tracker_type: TrackerType,
    pub currency: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tracker identity as it was when a usage record was written.
///
/// `tracker_id` is fixed once persisted. Name, type and the deletion flag are
/// only ever rewritten in bulk by snapshot propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub tracker_id: String,
    pub tracker_name: String,
    pub tracker_type: TrackerType,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
    pub modified_at: String,
}

impl TrackerSnapshot {
    pub fn capture(tracker: &Tracker, now: &str) -> Self {
        Self {
            tracker_id: tracker.id.clone(),
            tracker_name: tracker.name.clone(),
            tracker_type: tracker.tracker_type,
            is_deleted: false,
            deleted_at: None,
            modified_at: now.to_string(),
        }
    }

    pub fn identity(&self) -> TrackerIdentity {
        TrackerIdentity {
            tracker_id: self.tracker_id.clone(),
            tracker_name: self.tracker_name.clone(),
            tracker_type: self.tracker_type,
            is_deleted: self.is_deleted,
            deleted_at: self.deleted_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: String,
    pub user_id: String,
    pub tracker_snapshot: TrackerSnapshot,
    pub message_role: MessageRole,
    pub message_content: String,
    pub token_count: u64,
    pub timestamp: String,
}

/// One row per (user, tracker, local calendar day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsageSummary {
    pub user_id: String,
    pub date: String,
    pub tracker_snapshot: TrackerSnapshot,
    pub total_messages: u64,
    pub total_tokens: u64,
    pub user_messages: u64,
    pub ai_messages: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub total_messages: u64,
    pub total_tokens: u64,
    pub user_messages: u64,
    pub ai_messages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerIdentity {
    pub tracker_id: String,
    pub tracker_name: String,
    pub tracker_type: TrackerType,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerUsageEntry {
    pub tracker_id: String,
    pub tracker_name: String,
    pub tracker_type: TrackerType,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
    pub message_count: u64,
    pub token_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: String,
    pub message_count: u64,
    pub token_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallUsage {
    pub overall: UsageTotals,
    pub by_tracker: Vec<TrackerUsageEntry>,
    pub recent_activity: Vec<DailyActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub token_count: u64,
    pub timestamp: String,
}

impl From<UsageEvent> for UsageMessage {
    fn from(event: UsageEvent) -> Self {
        Self {
            id: event.id,
            role: event.message_role,
            content: event.message_content,
            token_count: event.token_count,
            timestamp: event.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerUsage {
    pub tracker: TrackerIdentity,
    pub usage: UsageTotals,
    pub daily_usage: Vec<DailyActivity>,
    pub messages: Vec<UsageMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogPage {
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
    pub logs: Vec<UsageEvent>,
}

impl UsageLogPage {
    pub fn new(total_count: u64, limit: u32, offset: u32, logs: Vec<UsageEvent>) -> Self {
        Self {
            total_count,
            limit,
            offset,
            has_more: total_count > offset as u64 + limit as u64,
            logs,
        }
    }
}

/// Rows rewritten by one propagation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    pub events_updated: usize,
    pub summaries_updated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub tracker_id: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub category_id: String,
    pub payment_method: String,
    pub description: Option<String>,
    pub timestamp: String,
}

/// Closed interval of RFC 3339 UTC instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseQueryFilter {
    pub user_id: String,
    pub range: TimeRange,
    pub category_id: Option<String>,
    pub tracker_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: f64,
    pub average: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub category_id: String,
    pub total: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub month: u32,
    pub total: f64,
    pub count: u64,
}

/// Twelve zeroed buckets, January first.
pub fn empty_months() -> Vec<MonthlyBreakdown> {
    (1..=12)
        .map(|month| MonthlyBreakdown {
            month,
            total: 0.0,
            count: 0,
        })
        .collect()
}
