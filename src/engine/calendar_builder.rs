// ==========================================
// 学习计划排程器 - 容量日历构建
// ==========================================
// 职责: 日期范围 → 每日可用学习时长
// 输入: 起止日期（含）+ 基础容量 + 周末倍率 + 休息日 + 取整步长
// 输出: 按日期升序的 CalendarDay 列表
// ==========================================

use crate::domain::calendar::{total_capacity, CalendarDay};
use crate::domain::types::{is_weekend, round_to_step, Minutes, WeekdayKey};
use crate::engine::error::{PlannerError, PlannerResult};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

// ==========================================
// CalendarBuilder - 容量日历构建器
// ==========================================
pub struct CalendarBuilder {
    // 无状态
}

impl CalendarBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建容量日历
    ///
    /// 规则:
    /// 1) 休息日容量为 0
    /// 2) 周六/周日容量 = base * weekend_multiplier
    /// 3) 其余日期容量 = base
    /// 4) 结果按步长四舍五入（平局向上）
    ///
    /// # 错误
    /// - `InvalidRange`: end 早于 start
    /// - `EmptyCapacity`: 全部日期容量之和为 0
    #[instrument(skip(self, off_weekdays), fields(off_days = off_weekdays.len()))]
    pub fn build(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base_minutes: Minutes,
        weekend_multiplier: f64,
        off_weekdays: &BTreeSet<WeekdayKey>,
        step: Minutes,
    ) -> PlannerResult<Vec<CalendarDay>> {
        if end < start {
            return Err(PlannerError::InvalidRange { start, end });
        }

        let calendar: Vec<CalendarDay> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| {
                let weekday = date.weekday();
                let available_minutes = if off_weekdays.contains(&WeekdayKey(weekday)) {
                    0
                } else if is_weekend(weekday) {
                    round_to_step(base_minutes as f64 * weekend_multiplier, step)
                } else {
                    round_to_step(base_minutes as f64, step)
                };
                CalendarDay {
                    date,
                    weekday,
                    available_minutes,
                }
            })
            .collect();

        let total = total_capacity(&calendar);
        if total == 0 {
            return Err(PlannerError::EmptyCapacity { start, end });
        }

        debug!(days = calendar.len(), total_minutes = total, "容量日历构建完成");
        Ok(calendar)
    }
}

impl Default for CalendarBuilder {
    fn default() -> Self {
        Self::new()
    }
}
