// ==========================================
// 学习计划排程器 - 命令行入口
// ==========================================
// 流程: 读取配置 → 导入科目表 → 生成计划 → 输出每日汇总 → 导出 CSV
// ==========================================

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use study_planner::config::{config_keys, ConfigManager};
use study_planner::engine::PlanRequest;
use study_planner::exporter::CsvLayout;
use study_planner::importer::SubjectCsvImporter;
use study_planner::logging::{self, LogFormat};
use study_planner::StudyPlanApi;

/// 把学习时间分配到日期范围内的各个科目
#[derive(Parser, Debug)]
#[command(name = "study-planner", version, about)]
struct Args {
    /// 科目表 CSV（name,target_minutes,priority,min_session,difficulty,recovery_cost）
    #[arg(long)]
    subjects: PathBuf,

    /// 起始日期（YYYY-MM-DD）
    #[arg(long)]
    start: NaiveDate,

    /// 结束日期（YYYY-MM-DD，含）
    #[arg(long)]
    end: NaiveDate,

    /// 排程参数 JSON 文件
    #[arg(long, env = "STUDY_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// 覆盖配置中的随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 以 日期 × 科目 透视表导出
    #[arg(long)]
    pivot: bool,

    /// 导出 CSV 路径（缺省时只输出汇总）
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON 格式日志
    #[arg(long)]
    json_log: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_with(if args.json_log {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    info!("==================================================");
    info!("{} v{}", study_planner::APP_NAME, study_planner::VERSION);
    info!("==================================================");

    let mut manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?,
        None => ConfigManager::new(),
    };
    if let Some(seed) = args.seed {
        manager.set(config_keys::SEED, seed.to_string());
    }

    let subjects = SubjectCsvImporter::import_file(&args.subjects)
        .with_context(|| format!("无法导入科目表 {}", args.subjects.display()))?;
    info!(count = subjects.len(), "科目表已导入");

    let mut api = StudyPlanApi::from_config_manager(&manager)?;
    let plan = api.generate(PlanRequest {
        start_date: args.start,
        end_date: args.end,
        subjects,
    })?;

    info!(status = %plan.status, mode = %plan.mode, seed = plan.seed, "排程结果");
    for day in &plan.calendar {
        let summary: Vec<String> = plan
            .entries_on(day.date)
            .iter()
            .map(|e| format!("{} {}m", e.subject, e.minutes))
            .collect();
        info!(
            date = %day.date,
            weekday = %day.weekday,
            planned = plan.day_total(day.date),
            capacity = day.available_minutes,
            "{}",
            summary.join(", ")
        );
    }
    for (subject, minutes) in &plan.unscheduled {
        warn!(subject = %subject, minutes, "目标未能全部排入");
    }

    if let Some(path) = &args.output {
        let layout = if args.pivot {
            CsvLayout::Pivot
        } else {
            CsvLayout::Rows
        };
        api.export_csv_file(layout, path)?;
    }

    Ok(())
}
