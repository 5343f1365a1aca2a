/// 常用排程的名稱與對應表達式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub expression: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset { label: "Every minute", expression: "* * * * *" },
    Preset { label: "Every 5 minutes", expression: "*/5 * * * *" },
    Preset { label: "Every 15 minutes", expression: "*/15 * * * *" },
    Preset { label: "Every 30 minutes", expression: "*/30 * * * *" },
    Preset { label: "Every hour", expression: "0 * * * *" },
    Preset { label: "Every 6 hours", expression: "0 */6 * * *" },
    Preset { label: "Every day at midnight", expression: "0 0 * * *" },
    Preset { label: "Every day at noon", expression: "0 12 * * *" },
    Preset { label: "Weekdays at 8 AM", expression: "0 8 * * 1-5" },
    Preset { label: "Weekends at 10 AM", expression: "0 10 * * 0,6" },
    Preset { label: "Every Monday at 9 AM", expression: "0 9 * * 1" },
    Preset { label: "First day of every month", expression: "0 0 1 * *" },
    Preset { label: "Every quarter", expression: "0 0 1 1,4,7,10 *" },
    Preset { label: "Every year on January 1st", expression: "0 0 1 1 *" },
];

/// 名稱比對忽略大小寫與前後空白
pub fn find_preset(label: &str) -> Option<&'static Preset> {
    let label = label.trim();
    PRESETS.iter().find(|p| p.label.eq_ignore_ascii_case(label))
}
