use crate::expr::CronExpression;
use chrono::{DateTime, TimeDelta, TimeZone, Timelike};
use std::collections::HashMap;
use tracing::{debug, trace};

/// 逐分鐘搜尋的上限：一個非閏年的分鐘數。
/// 不可能成立的表達式（例如 2 月 31 日）靠它保證結束。
pub const SEARCH_BUDGET_MINUTES: u32 = 525_600;

/// 一次搜尋的結果
#[derive(Debug, Clone)]
pub struct RunSearch<Tz: TimeZone> {
    /// 嚴格遞增，每一筆都在起點之後至少一分鐘
    pub runs: Vec<DateTime<Tz>>,
    /// 找到的筆數不足 `count` 就用完了搜尋上限
    pub exhausted: bool,
}

/// 從 `from`（截到分鐘）開始，每次往後推一分鐘並檢查是否符合，
/// 直到湊滿 `count` 筆或用完 [`SEARCH_BUDGET_MINUTES`]。
/// 用完上限不是錯誤，回傳已找到的部分（可能為空）。
pub fn search<Tz: TimeZone>(expr: &CronExpression, from: &DateTime<Tz>, count: usize) -> RunSearch<Tz> {
    let mut runs = Vec::with_capacity(count.min(64));
    if count == 0 {
        return RunSearch { runs, exhausted: false };
    }

    let step = TimeDelta::minutes(1);
    let mut candidate = truncate_to_minute(from);

    for _ in 0..SEARCH_BUDGET_MINUTES {
        candidate = match candidate.checked_add_signed(step) {
            Some(next) => next,
            None => break, // 超出 chrono 可表示的範圍
        };
        if expr.matches(&candidate) {
            trace!(expression = %expr, run = ?candidate, "match");
            runs.push(candidate.clone());
            if runs.len() == count {
                return RunSearch { runs, exhausted: false };
            }
        }
    }

    debug!(
        expression = %expr,
        found = runs.len(),
        wanted = count,
        "search budget exhausted"
    );
    RunSearch { runs, exhausted: true }
}

pub fn next_runs<Tz: TimeZone>(expr: &CronExpression, from: &DateTime<Tz>, count: usize) -> Vec<DateTime<Tz>> {
    search(expr, from, count).runs
}

/// 秒與奈秒歸零
pub fn truncate_to_minute<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    t.clone()
        - TimeDelta::seconds(i64::from(t.second()))
        - TimeDelta::nanoseconds(i64::from(t.nanosecond()))
}

/// 下次執行結果的快取：每個表達式只留最近一次的 (起點, count) 與結果
///
/// 結果與直接呼叫 [`search`] 完全相同，只是省掉重算。起點或 count 改變時
/// 覆蓋舊值，所以大小只跟不同表達式的數量有關。單執行緒使用，不加鎖。
#[derive(Debug)]
pub struct RunCache<Tz: TimeZone> {
    tz: Tz,
    entries: HashMap<String, CachedRun<Tz>>,
}

#[derive(Debug)]
struct CachedRun<Tz: TimeZone> {
    from: i64,
    count: usize,
    result: RunSearch<Tz>,
}

impl<Tz: TimeZone> RunCache<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            entries: HashMap::new(),
        }
    }

    pub fn search<Z: TimeZone>(&mut self, expr: &CronExpression, from: &DateTime<Z>, count: usize) -> RunSearch<Tz> {
        let from = truncate_to_minute(&from.with_timezone(&self.tz));
        let key = expr.to_string();

        if let Some(hit) = self.entries.get(&key) {
            if hit.from == from.timestamp() && hit.count == count {
                debug!(expression = %key, count, "next-run cache hit");
                return hit.result.clone();
            }
        }

        let result = search(expr, &from, count);
        self.entries.insert(
            key,
            CachedRun {
                from: from.timestamp(),
                count,
                result: result.clone(),
            },
        );
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
