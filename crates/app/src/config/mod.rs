use serde::{Deserialize, Serialize};

/// Raw range parameters as they arrive from a caller.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RangeParams {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Window used when the filter name is unknown or a custom range lacks a bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeFallback {
    #[default]
    ThisMonth,
    Trailing30Days,
}
