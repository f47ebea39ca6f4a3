// ==========================================
// 学习计划排程器 - 计划明细领域模型
// ==========================================
// 红线: 每日计划总时长 <= 当日可用容量
// 红线: 同一 (日期, 科目) 只保留一条明细，多次分配累加
// ==========================================

use crate::domain::types::Minutes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PlanEntry - 计划明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub date: NaiveDate,  // 学习日期
    pub subject: String,  // 科目名
    pub minutes: Minutes, // 时长（步长整数倍，> 0）
}

impl PlanEntry {
    pub fn new(date: NaiveDate, subject: &str, minutes: Minutes) -> Self {
        Self {
            date,
            subject: subject.to_string(),
            minutes,
        }
    }

    /// 完成记录的键
    pub fn key(&self) -> (NaiveDate, String) {
        (self.date, self.subject.clone())
    }
}

/// 将一段时长累加到 (date, subject) 对应的明细；不存在时追加新明细
///
/// 保持首次出现的顺序，供顺序模式保留当日先后次序
pub fn accumulate_entry(entries: &mut Vec<PlanEntry>, date: NaiveDate, subject: &str, minutes: Minutes) {
    if minutes == 0 {
        return;
    }
    match entries
        .iter_mut()
        .find(|e| e.date == date && e.subject == subject)
    {
        Some(entry) => entry.minutes += minutes,
        None => entries.push(PlanEntry::new(date, subject, minutes)),
    }
}

/// 某日计划总时长
pub fn day_total(entries: &[PlanEntry], date: NaiveDate) -> Minutes {
    entries
        .iter()
        .filter(|e| e.date == date)
        .map(|e| e.minutes)
        .sum()
}

/// 某科目计划总时长
pub fn subject_total(entries: &[PlanEntry], subject: &str) -> Minutes {
    entries
        .iter()
        .filter(|e| e.subject == subject)
        .map(|e| e.minutes)
        .sum()
}

/// 按 (日期, 科目名) 排序后的副本
pub fn sorted_by_date_subject(entries: &[PlanEntry]) -> Vec<PlanEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.subject.cmp(&b.subject)));
    sorted
}

// ==========================================
// ScheduleWarning - 非致命排程告警
// ==========================================
// 只附加在结果上，不中断整体排程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleWarning {
    /// 当日循环触达安全迭代上限，容量未用尽
    DayUnderfilled {
        date: NaiveDate,
        unused_minutes: Minutes,
        iterations: usize,
    },
    /// 单次最小时长超过当日剩余容量，科目当日跳过
    SubjectSkipped {
        date: NaiveDate,
        subject: String,
        min_session: Minutes,
        capacity_left: Minutes,
    },
}

impl ScheduleWarning {
    pub fn date(&self) -> NaiveDate {
        match self {
            ScheduleWarning::DayUnderfilled { date, .. } => *date,
            ScheduleWarning::SubjectSkipped { date, .. } => *date,
        }
    }
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::DayUnderfilled {
                date,
                unused_minutes,
                iterations,
            } => write!(
                f,
                "DAY_UNDERFILLED: date={}, unused_minutes={}, iterations={}",
                date, unused_minutes, iterations
            ),
            ScheduleWarning::SubjectSkipped {
                date,
                subject,
                min_session,
                capacity_left,
            } => write!(
                f,
                "SUBJECT_SKIPPED: date={}, subject={}, min_session={} > capacity_left={}",
                date, subject, min_session, capacity_left
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_accumulate_merges_same_day_subject() {
        let mut entries = Vec::new();
        accumulate_entry(&mut entries, d(2), "Math", 30);
        accumulate_entry(&mut entries, d(2), "English", 20);
        accumulate_entry(&mut entries, d(2), "Math", 10);
        accumulate_entry(&mut entries, d(3), "Math", 0);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], PlanEntry::new(d(2), "Math", 40));
        assert_eq!(day_total(&entries, d(2)), 60);
        assert_eq!(subject_total(&entries, "Math"), 40);
    }

    #[test]
    fn test_sorted_by_date_subject() {
        let entries = vec![
            PlanEntry::new(d(3), "Art", 10),
            PlanEntry::new(d(2), "Math", 10),
            PlanEntry::new(d(2), "English", 10),
        ];
        let sorted = sorted_by_date_subject(&entries);
        let keys: Vec<_> = sorted.iter().map(|e| (e.date, e.subject.as_str())).collect();
        assert_eq!(keys, vec![(d(2), "English"), (d(2), "Math"), (d(3), "Art")]);
    }
}
