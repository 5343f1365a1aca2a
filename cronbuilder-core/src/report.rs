use crate::{expr::CronExpression, field::FieldKind, schedule::RunSearch};
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// 給畫面用的完整結果：表達式字串、說明、接下來的執行時間
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub expression: String,
    pub description: String,
    pub next_runs: Vec<DateTime<FixedOffset>>,
    /// 搜尋上限內找不到足夠的筆數
    pub exhausted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_fields: Vec<FieldKind>,
}

impl ScheduleReport {
    pub fn evaluate<Tz: TimeZone>(expr: &CronExpression, from: &DateTime<Tz>, count: usize) -> Self {
        Self::from_search(expr, expr.search(from, count))
    }

    pub fn from_search<Tz: TimeZone>(expr: &CronExpression, search: RunSearch<Tz>) -> Self {
        Self {
            expression: expr.to_string(),
            description: expr.describe(),
            next_runs: search.runs.iter().map(|t| t.fixed_offset()).collect(),
            exhausted: search.exhausted,
            invalid_fields: expr.invalid_fields().into_iter().map(|(kind, _)| kind).collect(),
        }
    }
}
