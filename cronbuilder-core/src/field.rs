use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// cron 五個欄位，依表達式中的順序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    /// 0 = 星期日
    DayOfWeek,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
    ];

    /// 欄位的有效值域（含兩端）
    pub fn domain(self) -> (u32, u32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 6),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 單一欄位解析後的限制條件
///
/// 解析順序固定：`*` → 含 `/` → 含 `,` → 含 `-` → 整數。
/// 因此 `1-5/2` 會被當成 `Step(2)`，`/` 左側一律忽略。
/// 文字不做 trim：只有剛好是 `*` 才算萬用字元。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPattern {
    /// `*`
    Wildcard,
    /// `*/n`：值本身可被 n 整除（不是從起點起算）
    Step(u32),
    /// `a,b,c`
    List(Vec<u32>),
    /// `lo-hi`，含兩端
    Range(u32, u32),
    /// 單一數值
    Exact(u32),
    /// 無法解析的原始文字；永不匹配
    Invalid(String),
}

impl FieldPattern {
    /// 解析欄位文字。不做值域檢查，超出值域的數值只是永遠匹配不到。
    /// 超過 `u32` 的數字視為無法解析（包含 `*/n` 的 n）。
    pub fn parse(text: &str) -> Self {
        let invalid = || FieldPattern::Invalid(text.to_string());

        if text == "*" {
            return FieldPattern::Wildcard;
        }
        if let Some((_, step)) = text.split_once('/') {
            return parse_value(step).map(FieldPattern::Step).unwrap_or_else(invalid);
        }
        if text.contains(',') {
            let values: Option<Vec<u32>> = text.split(',').map(parse_value).collect();
            return values.map(FieldPattern::List).unwrap_or_else(invalid);
        }
        if let Some((lo, hi)) = text.split_once('-') {
            return match (parse_value(lo), parse_value(hi)) {
                (Some(lo), Some(hi)) => FieldPattern::Range(lo, hi),
                _ => invalid(),
            };
        }
        parse_value(text).map(FieldPattern::Exact).unwrap_or_else(invalid)
    }

    pub fn matches(&self, value: u32) -> bool {
        match self {
            FieldPattern::Wildcard => true,
            FieldPattern::Step(0) => false,
            FieldPattern::Step(n) => value % n == 0,
            FieldPattern::List(values) => values.contains(&value),
            FieldPattern::Range(lo, hi) => (*lo..=*hi).contains(&value),
            FieldPattern::Exact(v) => value == *v,
            FieldPattern::Invalid(_) => false,
        }
    }

    /// 明確寫出、但落在欄位值域外的數值（這些值永遠不會匹配）
    pub fn out_of_domain(&self, kind: FieldKind) -> Vec<u32> {
        let (min, max) = kind.domain();
        let outside = |v: &u32| *v < min || *v > max;
        match self {
            FieldPattern::List(values) => values.iter().copied().filter(outside).collect(),
            FieldPattern::Range(lo, hi) => [*lo, *hi].into_iter().filter(outside).collect(),
            FieldPattern::Exact(v) => [*v].into_iter().filter(outside).collect(),
            FieldPattern::Wildcard | FieldPattern::Step(_) | FieldPattern::Invalid(_) => Vec::new(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldPattern::Wildcard)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldPattern::Invalid(_))
    }
}

fn parse_value(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPattern::Wildcard => f.write_str("*"),
            FieldPattern::Step(n) => write!(f, "*/{n}"),
            FieldPattern::List(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            FieldPattern::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            FieldPattern::Exact(v) => write!(f, "{v}"),
            FieldPattern::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for FieldPattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldPattern::parse(s))
    }
}
