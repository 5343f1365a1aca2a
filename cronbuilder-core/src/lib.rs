//! 五欄位 cron 表達式：解析、說明文字、計算接下來的執行時間。
//!
//! 與標準 cron 的已知差異：
//! - `a/b` 只看 `b`，匹配「值可被 b 整除」，不從 `a` 起算
//! - 日與週同時指定時要兩者都符合（AND），沒有標準 cron 的 OR 規則
//! - 欄位文字不 trim：只有剛好是 `*` 才算萬用字元，` *` 無法解析
//! - 數值以 `u32` 解析；超過的數字（例如 `*/99999999999`）讓整個欄位無法解析、永不匹配

mod describe;
mod error;
mod expr;
mod field;
mod preset;
mod report;
mod schedule;

pub use describe::describe;
pub use error::{CronError, Result};
pub use expr::CronExpression;
pub use field::{FieldKind, FieldPattern};
pub use preset::{find_preset, Preset, PRESETS};
pub use report::ScheduleReport;
pub use schedule::{next_runs, search, truncate_to_minute, RunCache, RunSearch, SEARCH_BUDGET_MINUTES};
