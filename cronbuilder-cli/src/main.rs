use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use clap::{ArgAction, Parser, Subcommand};
use cronbuilder_core::{CronExpression, RunCache, ScheduleReport, PRESETS};
use serde::Serialize;
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cronbuilder", version, about = "建立、解析 cron 表達式並預覽接下來的執行時間")]
struct Opts {
    /// 要列出幾次接下來的執行時間
    #[arg(long, default_value_t = 5, global = true)]
    count: usize,

    /// 起算時間（RFC3339），預設為現在
    #[arg(long, global = true)]
    from: Option<String>,

    /// 以 UTC 而非本地時間比對
    #[arg(long, global = true)]
    utc: bool,

    /// 以 JSON 輸出
    #[arg(long, global = true)]
    json: bool,

    /// -v = debug，-vv = trace（RUST_LOG 優先）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// 另外把日誌寫到這個目錄（每日輪替）
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// 子命令
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// 逐欄位組出表達式
    Build {
        #[arg(long, default_value = "*")]
        minute: String,
        #[arg(long, default_value = "*")]
        hour: String,
        #[arg(long, default_value = "*")]
        day_of_month: String,
        #[arg(long, default_value = "*")]
        month: String,
        #[arg(long, default_value = "*")]
        day_of_week: String,
    },

    /// 解析一整串表達式，例如 "*/15 * * * *"
    Parse {
        #[arg(required = true, num_args = 1..)]
        expr: Vec<String>,
    },

    /// 使用預設排程
    Preset { label: String },

    /// 列出所有預設排程
    Presets,

    /// 每行讀一個表達式（或預設名稱），即時重算
    Interactive,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let _guard = init_logging(opts.verbose, opts.log_dir.as_deref())?;

    if opts.count == 0 {
        bail!("--count 至少要是 1");
    }
    let from = parse_from(opts.from.as_deref())?;

    if opts.utc {
        run(&opts, &Utc, from)
    } else {
        run(&opts, &Local, from)
    }
}

fn run<Tz: TimeZone>(opts: &Opts, tz: &Tz, from: Option<DateTime<FixedOffset>>) -> Result<()> {
    let now = || match from {
        Some(t) => t.with_timezone(tz),
        None => Utc::now().with_timezone(tz),
    };

    match &opts.cmd {
        Cmd::Presets => {
            print_presets(opts.json)?;
        }

        Cmd::Interactive => {
            interactive(opts, tz, now)?;
        }

        cmd => {
            let expr = expression_for(cmd)?;
            info!(expression = %expr, "evaluating");
            let report = ScheduleReport::evaluate(&expr, &now(), opts.count);
            print_report(&expr, &report, opts.json)?;
        }
    }

    Ok(())
}

/// 把子命令轉成表達式；Presets / Interactive 不經過這裡
fn expression_for(cmd: &Cmd) -> Result<CronExpression> {
    let expr = match cmd {
        Cmd::Build {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        } => CronExpression::from_fields(minute, hour, day_of_month, month, day_of_week),
        Cmd::Parse { expr } => {
            let text = expr.join(" ");
            text.parse::<CronExpression>()
                .with_context(|| format!("解析表達式失敗：{text}"))?
        }
        Cmd::Preset { label } => CronExpression::from_preset(label).with_context(|| {
            format!("找不到預設排程「{label}」，可用 `cronbuilder presets` 查看")
        })?,
        Cmd::Presets | Cmd::Interactive => bail!("此子命令沒有單一表達式"),
    };
    Ok(expr)
}

fn interactive<Tz, F>(opts: &Opts, tz: &Tz, now: F) -> Result<()>
where
    Tz: TimeZone,
    F: Fn() -> DateTime<Tz>,
{
    let mut cache = RunCache::new(tz.clone());
    let stdin = io::stdin();

    prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("讀取 stdin")?;
        let input = line.trim();
        match input {
            "" => {}
            "quit" | "exit" => break,
            _ => match parse_input(input) {
                Ok(expr) => {
                    let search = cache.search(&expr, &now(), opts.count);
                    let report = ScheduleReport::from_search(&expr, search);
                    print_report(&expr, &report, opts.json)?;
                }
                Err(e) => {
                    warn!(input, "rejected input");
                    println!("⚠️ {e:#}");
                }
            },
        }
        prompt()?;
    }

    debug!(cached = cache.len(), "interactive session finished");
    Ok(())
}

/// 預設名稱優先，其次當成整串表達式
fn parse_input(input: &str) -> Result<CronExpression> {
    if let Ok(expr) = CronExpression::from_preset(input) {
        return Ok(expr);
    }
    input
        .parse::<CronExpression>()
        .with_context(|| format!("無法解析「{input}」"))
}

fn prompt() -> Result<()> {
    print!("cron> ");
    io::stdout().flush()?;
    Ok(())
}

fn print_report(expr: &CronExpression, report: &ScheduleReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("🕒 表達式：{}", report.expression);
    println!("📝 說明：{}", report.description);
    for (kind, raw) in expr.invalid_fields() {
        println!("⚠️ 欄位 {kind} 無法解析：\"{raw}\"（永遠不會匹配）");
    }
    for (kind, values) in expr.out_of_domain_fields() {
        let (min, max) = kind.domain();
        println!("⚠️ 欄位 {kind} 的 {values:?} 超出 {min}-{max}（永遠不會匹配）");
    }

    if report.next_runs.is_empty() {
        println!("（一年內找不到符合的執行時間）");
        return Ok(());
    }

    println!("=== 接下來的執行時間（共 {} 筆） ===", report.next_runs.len());
    for (i, t) in report.next_runs.iter().enumerate() {
        println!("{:>3}. {}", i + 1, t.format("%Y-%m-%d %H:%M (%a) %:z"));
    }
    if report.exhausted {
        println!("（已達搜尋上限，只找到部分結果）");
    }
    Ok(())
}

fn print_presets(json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct Rec<'a> {
        label: &'a str,
        expression: &'a str,
        description: String,
    }

    let mut rows = Vec::new();
    for p in PRESETS {
        let expr: CronExpression = p.expression.parse()?;
        rows.push(Rec {
            label: p.label,
            expression: p.expression,
            description: expr.describe(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("=== 預設排程（共 {} 筆） ===", rows.len());
    for r in rows {
        println!("- {:<28} {:<18} {}", r.label, r.expression, r.description);
    }
    Ok(())
}

fn parse_from(from: Option<&str>) -> Result<Option<DateTime<FixedOffset>>> {
    from.map(|s| {
        DateTime::parse_from_rfc3339(s).with_context(|| format!("解析 RFC3339 失敗：{s}"))
    })
    .transpose()
}

// ===== 日誌 =====
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("建立日誌目錄 {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "cronbuilder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("初始化日誌")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults_to_every_minute() {
        let opts = Opts::try_parse_from(["cronbuilder", "build"]).unwrap();
        let expr = expression_for(&opts.cmd).unwrap();
        assert_eq!(expr.to_string(), "* * * * *");
    }

    #[test]
    fn build_takes_individual_fields() {
        let opts = Opts::try_parse_from([
            "cronbuilder",
            "build",
            "--minute",
            "0",
            "--hour",
            "8",
            "--day-of-week",
            "1-5",
        ])
        .unwrap();
        assert_eq!(expression_for(&opts.cmd).unwrap().to_string(), "0 8 * * 1-5");
    }

    #[test]
    fn parse_accepts_quoted_or_split_tokens() {
        let quoted = Opts::try_parse_from(["cronbuilder", "parse", "*/15 * * * *"]).unwrap();
        let split = Opts::try_parse_from(["cronbuilder", "parse", "*/15", "*", "*", "*", "*"]).unwrap();
        assert_eq!(
            expression_for(&quoted.cmd).unwrap(),
            expression_for(&split.cmd).unwrap()
        );
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let opts = Opts::try_parse_from(["cronbuilder", "parse", "* * *"]).unwrap();
        assert!(expression_for(&opts.cmd).is_err());
    }

    #[test]
    fn preset_lookup_and_unknown_label() {
        let opts = Opts::try_parse_from(["cronbuilder", "preset", "Every 15 minutes"]).unwrap();
        assert_eq!(expression_for(&opts.cmd).unwrap().to_string(), "*/15 * * * *");

        let opts = Opts::try_parse_from(["cronbuilder", "preset", "nope"]).unwrap();
        assert!(expression_for(&opts.cmd).is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let opts = Opts::try_parse_from(["cronbuilder", "presets", "--json", "--count", "3"]).unwrap();
        assert!(opts.json);
        assert_eq!(opts.count, 3);
    }

    #[test]
    fn interactive_input_prefers_presets() {
        assert_eq!(parse_input("every hour").unwrap().to_string(), "0 * * * *");
        assert_eq!(parse_input("5 4 * * 0").unwrap().to_string(), "5 4 * * 0");
        assert!(parse_input("every other tuesday").is_err());
    }

    #[test]
    fn from_must_be_rfc3339() {
        let t = parse_from(Some("2024-01-06T09:15:00+08:00")).unwrap().unwrap();
        assert_eq!(t.to_rfc3339(), "2024-01-06T09:15:00+08:00");
        assert!(parse_from(Some("2024-01-06 09:15")).is_err());
        assert!(parse_from(None).unwrap().is_none());
    }
}
