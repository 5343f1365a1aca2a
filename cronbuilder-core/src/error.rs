use thiserror::Error;

pub type Result<T, E = CronError> = std::result::Result<T, E>;

/// 只有「整串表達式」層級的問題才算錯誤；欄位內容解析失敗不報錯。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("expected 5 whitespace-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
