use crate::{
    describe::describe,
    error::{CronError, Result},
    field::{FieldKind, FieldPattern},
    preset::find_preset,
    schedule::{self, RunSearch},
};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// 五欄位 cron 表達式（分 時 日 月 週）
///
/// 建好後不再修改；要換欄位就用 [`CronExpression::with_field`] 產生新的值。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CronExpression {
    pub minute: FieldPattern,
    pub hour: FieldPattern,
    pub day_of_month: FieldPattern,
    pub month: FieldPattern,
    pub day_of_week: FieldPattern,
}

impl Default for CronExpression {
    /// `* * * * *`
    fn default() -> Self {
        Self {
            minute: FieldPattern::Wildcard,
            hour: FieldPattern::Wildcard,
            day_of_month: FieldPattern::Wildcard,
            month: FieldPattern::Wildcard,
            day_of_week: FieldPattern::Wildcard,
        }
    }
}

impl CronExpression {
    /// 從五個欄位的文字逐一建立（對應畫面上的五個選單）
    pub fn from_fields(
        minute: &str,
        hour: &str,
        day_of_month: &str,
        month: &str,
        day_of_week: &str,
    ) -> Self {
        Self {
            minute: FieldPattern::parse(minute),
            hour: FieldPattern::parse(hour),
            day_of_month: FieldPattern::parse(day_of_month),
            month: FieldPattern::parse(month),
            day_of_week: FieldPattern::parse(day_of_week),
        }
    }

    /// 依預設組合的名稱建立，名稱不分大小寫
    pub fn from_preset(label: &str) -> Result<Self> {
        let preset = find_preset(label).ok_or_else(|| CronError::UnknownPreset(label.to_string()))?;
        preset.expression.parse()
    }

    pub fn field(&self, kind: FieldKind) -> &FieldPattern {
        match kind {
            FieldKind::Minute => &self.minute,
            FieldKind::Hour => &self.hour,
            FieldKind::DayOfMonth => &self.day_of_month,
            FieldKind::Month => &self.month,
            FieldKind::DayOfWeek => &self.day_of_week,
        }
    }

    pub fn with_field(&self, kind: FieldKind, pattern: FieldPattern) -> Self {
        let mut next = self.clone();
        let slot = match kind {
            FieldKind::Minute => &mut next.minute,
            FieldKind::Hour => &mut next.hour,
            FieldKind::DayOfMonth => &mut next.day_of_month,
            FieldKind::Month => &mut next.month,
            FieldKind::DayOfWeek => &mut next.day_of_week,
        };
        *slot = pattern;
        next
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldKind, &FieldPattern)> + '_ {
        FieldKind::ALL.into_iter().map(move |kind| (kind, self.field(kind)))
    }

    /// 解析失敗的欄位（名稱 + 原始文字）
    pub fn invalid_fields(&self) -> Vec<(FieldKind, &str)> {
        self.fields()
            .filter_map(|(kind, p)| match p {
                FieldPattern::Invalid(raw) => Some((kind, raw.as_str())),
                _ => None,
            })
            .collect()
    }

    /// 五個欄位必須全部符合；日與週之間沒有標準 cron 的 OR 特例
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        self.minute.matches(at.minute())
            && self.hour.matches(at.hour())
            && self.day_of_month.matches(at.day())
            && self.month.matches(at.month())
            && self.day_of_week.matches(at.weekday().num_days_from_sunday())
    }

    pub fn describe(&self) -> String {
        describe(self)
    }

    pub fn next_runs<Tz: TimeZone>(&self, from: &DateTime<Tz>, count: usize) -> Vec<DateTime<Tz>> {
        schedule::next_runs(self, from, count)
    }

    pub fn search<Tz: TimeZone>(&self, from: &DateTime<Tz>, count: usize) -> RunSearch<Tz> {
        schedule::search(self, from, count)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [minute, hour, dom, month, dow] => Ok(Self::from_fields(minute, hour, dom, month, dow)),
            _ => Err(CronError::FieldCount { found: parts.len() }),
        }
    }
}

impl From<CronExpression> for String {
    fn from(expr: CronExpression) -> Self {
        expr.to_string()
    }
}

impl TryFrom<String> for CronExpression {
    type Error = CronError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parse_and_display_keep_canonical_form() {
        let expr: CronExpression = "*/15 * * * *".parse().unwrap();
        assert_eq!(expr.minute, FieldPattern::Step(15));
        assert_eq!(expr.to_string(), "*/15 * * * *");

        // 多餘空白會被正規化
        let expr: CronExpression = "  0   8 *  * 1-5 ".parse().unwrap();
        assert_eq!(expr.to_string(), "0 8 * * 1-5");
    }

    #[test]
    fn wrong_token_count_is_an_error() {
        assert_eq!(
            "* * * *".parse::<CronExpression>(),
            Err(CronError::FieldCount { found: 4 })
        );
        assert_eq!(
            "0 0 * * * 2024".parse::<CronExpression>(),
            Err(CronError::FieldCount { found: 6 })
        );
        assert_eq!("".parse::<CronExpression>(), Err(CronError::FieldCount { found: 0 }));
    }

    #[test]
    fn bad_field_text_is_not_an_error() {
        let expr: CronExpression = "abc * * * *".parse().unwrap();
        assert_eq!(expr.invalid_fields(), vec![(FieldKind::Minute, "abc")]);
        assert_eq!(expr.to_string(), "abc * * * *");
    }

    #[test]
    fn out_of_domain_fields_are_reported_per_field() {
        let expr: CronExpression = "60 8 0 1-13 7".parse().unwrap();
        assert_eq!(
            expr.out_of_domain_fields(),
            vec![
                (FieldKind::Minute, vec![60]),
                (FieldKind::DayOfMonth, vec![0]),
                (FieldKind::Month, vec![13]),
                (FieldKind::DayOfWeek, vec![7]),
            ]
        );
        assert!(CronExpression::default().out_of_domain_fields().is_empty());
    }

    #[test]
    fn from_preset_is_case_insensitive() {
        let expr = CronExpression::from_preset("every day at MIDNIGHT").unwrap();
        assert_eq!(expr.to_string(), "0 0 * * *");
        assert_eq!(
            CronExpression::from_preset("sometimes"),
            Err(CronError::UnknownPreset("sometimes".to_string()))
        );
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let base = CronExpression::default();
        let changed = base.with_field(FieldKind::Hour, FieldPattern::Exact(9));
        assert_eq!(base.to_string(), "* * * * *");
        assert_eq!(changed.to_string(), "* 9 * * *");
    }

    #[test]
    fn day_fields_are_and_not_or() {
        // 2024-01-15 是星期一
        let expr: CronExpression = "0 0 15 * 5".parse().unwrap();
        let monday_15th = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert!(!expr.matches(&monday_15th));

        let expr: CronExpression = "0 0 15 * 1".parse().unwrap();
        assert!(expr.matches(&monday_15th));
    }

    #[test]
    fn serde_uses_string_form() {
        let expr: CronExpression = "0 8 * * 1-5".parse().unwrap();
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(json, "\"0 8 * * 1-5\"");
        let back: CronExpression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
        assert!(serde_json::from_str::<CronExpression>("\"0 8\"").is_err());
    }
}
