// ==========================================
// 学习计划排程器 - 领域类型定义
// ==========================================
// 职责: 时长单位、取整规则、计划状态、星期解析
// 红线: 所有输出时长必须是取整步长的整数倍
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 时长单位：分钟
pub type Minutes = u32;

// ==========================================
// 取整规则 (Round Half Up)
// ==========================================
// 平局一律向上取整，保证多次运行结果一致

/// 将浮点时长取整到 `step` 的最近整数倍（四舍五入，平局向上）
///
/// # 参数
/// - `value`: 原始时长（分钟），负数与非有限值视为 0
/// - `step`: 取整步长（分钟），0 时按 1 处理
pub fn round_to_step(value: f64, step: Minutes) -> Minutes {
    let step = step.max(1);
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let units = (value / step as f64 + 0.5).floor();
    let rounded = units * step as f64;
    if rounded >= Minutes::MAX as f64 {
        // 超出上限时截断到不超过上限的最大步长倍数
        Minutes::MAX - Minutes::MAX % step
    } else {
        rounded as Minutes
    }
}

/// 整数时长按步长取整
pub fn snap_minutes(value: Minutes, step: Minutes) -> Minutes {
    round_to_step(value as f64, step)
}

// ==========================================
// 计划状态 (Plan Status)
// ==========================================
// NothingToSchedule 是合法的空计划结果，不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Scheduled,        // 已生成计划
    NothingToSchedule, // 全部完成/无可排科目
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Scheduled => write!(f, "SCHEDULED"),
            PlanStatus::NothingToSchedule => write!(f, "NOTHING_TO_SCHEDULE"),
        }
    }
}

// ==========================================
// 星期工具
// ==========================================

/// 是否为周末（周六/周日）
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// 解析星期列表，如 "sat,sun" / "Mon, Wed"
///
/// 空字符串返回空集合；无法识别的项返回 Err(原始项)
pub fn parse_weekday_list(raw: &str) -> Result<BTreeSet<WeekdayKey>, String> {
    let mut out = BTreeSet::new();
    for item in raw.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let weekday: Weekday = item.parse().map_err(|_| item.to_string())?;
        out.insert(WeekdayKey(weekday));
    }
    Ok(out)
}

/// 可排序的星期包装（chrono::Weekday 未实现 Ord）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayKey(pub Weekday);

impl PartialOrd for WeekdayKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeekdayKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl fmt::Display for WeekdayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
