//! 把表達式轉成英文說明句子。每個欄位各自產生一段，依固定順序串接；
//! 日、月、週為萬用字元時不輸出。

use crate::{
    expr::CronExpression,
    field::{FieldKind, FieldPattern},
};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

pub fn describe(expr: &CronExpression) -> String {
    let mut clauses = vec![minute_clause(&expr.minute), hour_clause(&expr.hour)];
    if !expr.day_of_month.is_wildcard() {
        clauses.push(day_of_month_clause(&expr.day_of_month));
    }
    if !expr.month.is_wildcard() {
        clauses.push(month_clause(&expr.month));
    }
    if !expr.day_of_week.is_wildcard() {
        clauses.push(day_of_week_clause(&expr.day_of_week));
    }
    format!("Runs {}", clauses.join(", "))
}

fn minute_clause(p: &FieldPattern) -> String {
    match p {
        FieldPattern::Wildcard => "every minute".to_string(),
        FieldPattern::Step(n) => every(*n, "minute", "minutes"),
        FieldPattern::List(values) => format!("at minutes {}", join(values, u32::to_string)),
        FieldPattern::Range(lo, hi) => format!("every minute from {lo} to {hi}"),
        FieldPattern::Exact(v) => format!("at minute {v}"),
        FieldPattern::Invalid(raw) => invalid(FieldKind::Minute, raw),
    }
}

fn hour_clause(p: &FieldPattern) -> String {
    match p {
        FieldPattern::Wildcard => "every hour".to_string(),
        FieldPattern::Step(n) => every(*n, "hour", "hours"),
        FieldPattern::List(values) => format!("at {}", join(values, |h| hour_12(*h))),
        FieldPattern::Range(lo, hi) => format!("from {} to {}", hour_12(*lo), hour_12(*hi)),
        FieldPattern::Exact(h) => format!("at {}", hour_12(*h)),
        FieldPattern::Invalid(raw) => invalid(FieldKind::Hour, raw),
    }
}

fn day_of_month_clause(p: &FieldPattern) -> String {
    match p {
        FieldPattern::Wildcard => "every day".to_string(),
        FieldPattern::Step(n) => every(*n, "day", "days"),
        FieldPattern::List(values) => {
            format!("on days {} of the month", join(values, u32::to_string))
        }
        FieldPattern::Range(lo, hi) => format!("from day {lo} to {hi} of the month"),
        FieldPattern::Exact(d) => format!("on day {d} of the month"),
        FieldPattern::Invalid(raw) => invalid(FieldKind::DayOfMonth, raw),
    }
}

fn month_clause(p: &FieldPattern) -> String {
    match p {
        FieldPattern::Wildcard => "every month".to_string(),
        FieldPattern::Step(n) => every(*n, "month", "months"),
        FieldPattern::List(values) => format!("in {}", join(values, |m| month_name(*m))),
        FieldPattern::Range(lo, hi) => format!("from {} to {}", month_name(*lo), month_name(*hi)),
        FieldPattern::Exact(m) => format!("in {}", month_name(*m)),
        FieldPattern::Invalid(raw) => invalid(FieldKind::Month, raw),
    }
}

fn day_of_week_clause(p: &FieldPattern) -> String {
    match p {
        FieldPattern::Wildcard => "every day of the week".to_string(),
        FieldPattern::Step(n) => every(*n, "day of the week", "days of the week"),
        FieldPattern::List(values) => format!("on {}", join(values, |d| weekday_name(*d))),
        FieldPattern::Range(lo, hi) => {
            format!("from {} to {}", weekday_name(*lo), weekday_name(*hi))
        }
        FieldPattern::Exact(d) => format!("on {}", weekday_name(*d)),
        FieldPattern::Invalid(raw) => invalid(FieldKind::DayOfWeek, raw),
    }
}

fn every(n: u32, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("every {singular}")
    } else {
        format!("every {n} {plural}")
    }
}

fn invalid(kind: FieldKind, raw: &str) -> String {
    format!("with an invalid {kind} value \"{raw}\" (never matches)")
}

/// `a`、`a and b`、`a, b and c`
fn join(values: &[u32], label: impl Fn(&u32) -> String) -> String {
    let labels: Vec<String> = values.iter().map(label).collect();
    match labels.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

/// 0 → 12 AM，13 → 1 PM；超出值域時直接印數字
fn hour_12(h: u32) -> String {
    match h {
        0 => "12 AM".to_string(),
        1..=11 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        13..=23 => format!("{} PM", h - 12),
        _ => format!("hour {h}"),
    }
}

fn month_name(m: u32) -> String {
    m.checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("month {m}"))
}

fn weekday_name(d: u32) -> String {
    WEEKDAYS
        .get(d as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("weekday {d}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(expr: &str) -> String {
        describe(&expr.parse().unwrap())
    }

    #[test]
    fn wildcards_describe_every_minute() {
        assert_eq!(text("* * * * *"), "Runs every minute, every hour");
    }

    #[test]
    fn presets_read_naturally() {
        assert_eq!(text("0 0 * * *"), "Runs at minute 0, at 12 AM");
        assert_eq!(text("0 8 * * 1-5"), "Runs at minute 0, at 8 AM, from Monday to Friday");
        assert_eq!(text("*/15 * * * *"), "Runs every 15 minutes, every hour");
        assert_eq!(text("0 0 1 * *"), "Runs at minute 0, at 12 AM, on day 1 of the month");
    }

    #[test]
    fn lists_and_names() {
        assert_eq!(
            text("1,15,30 9,17 * 1,7 0,6"),
            "Runs at minutes 1, 15 and 30, at 9 AM and 5 PM, in January and July, on Sunday and Saturday"
        );
        assert_eq!(
            text("0 */6 */2 3-5 *"),
            "Runs at minute 0, every 6 hours, every 2 days, from March to May"
        );
    }

    #[test]
    fn out_of_domain_values_fall_back_to_numbers() {
        assert_eq!(
            text("0 30 0 13 9"),
            "Runs at minute 0, at hour 30, on day 0 of the month, in month 13, on weekday 9"
        );
    }

    #[test]
    fn invalid_fields_are_called_out() {
        assert_eq!(
            text("x * * * *"),
            "Runs with an invalid minute value \"x\" (never matches), every hour"
        );
    }

    #[test]
    fn hour_12_edges() {
        assert_eq!(hour_12(0), "12 AM");
        assert_eq!(hour_12(11), "11 AM");
        assert_eq!(hour_12(12), "12 PM");
        assert_eq!(hour_12(23), "11 PM");
    }
}
