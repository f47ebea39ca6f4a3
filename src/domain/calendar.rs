// ==========================================
// 学习计划排程器 - 容量日历领域模型
// ==========================================
// 红线: 休息日容量恒为 0
// 用途: 每日可用学习时长，按配置整体重建，不做增量修改
// ==========================================

use crate::domain::types::Minutes;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// CalendarDay - 日容量
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub available_minutes: Minutes, // 已按步长取整
}

impl CalendarDay {
    pub fn is_off(&self) -> bool {
        self.available_minutes == 0
    }
}

/// 日历总容量
pub fn total_capacity(calendar: &[CalendarDay]) -> u64 {
    calendar.iter().map(|d| d.available_minutes as u64).sum()
}

