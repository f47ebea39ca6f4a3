// ==========================================
// 学习计划排程器 - 学习进度跟踪
// ==========================================
// 职责: 记录 (日期, 科目) 完成状态；计算完成进度；给出可判定为“已完成”的科目
// 说明: 完成记录由调用方持有并显式传入，排程器本身不保存会话状态
// ==========================================

use crate::domain::plan::PlanEntry;
use crate::domain::types::Minutes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// CompletionRecord - 完成记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    keys: BTreeSet<(NaiveDate, String)>,
}

impl CompletionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记完成（幂等）；返回是否为新增
    pub fn mark_complete(&mut self, date: NaiveDate, subject: &str) -> bool {
        self.keys.insert((date, subject.trim().to_string()))
    }

    /// 取消完成（幂等）；返回是否确实移除
    pub fn mark_incomplete(&mut self, date: NaiveDate, subject: &str) -> bool {
        self.keys.remove(&(date, subject.trim().to_string()))
    }

    pub fn is_complete(&self, date: NaiveDate, subject: &str) -> bool {
        self.keys.contains(&(date, subject.to_string()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NaiveDate, String)> {
        self.keys.iter()
    }
}

/// 完成进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_minutes: u64,
    pub total_minutes: u64,
}

impl Progress {
    /// 完成比例 0.0 - 1.0；空计划为 0
    pub fn ratio(&self) -> f64 {
        if self.total_minutes == 0 {
            return 0.0;
        }
        self.completed_minutes as f64 / self.total_minutes as f64
    }
}

// ==========================================
// ProgressTracker - 进度跟踪
// ==========================================
pub struct ProgressTracker {
    // 无状态，完成记录由调用方传入
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {}
    }

    /// 完成进度（纯查询）
    pub fn progress(&self, entries: &[PlanEntry], record: &CompletionRecord) -> Progress {
        let total_minutes = entries.iter().map(|e| e.minutes as u64).sum();
        let completed_minutes = entries
            .iter()
            .filter(|e| record.is_complete(e.date, &e.subject))
            .map(|e| e.minutes as u64)
            .sum();
        Progress {
            completed_minutes,
            total_minutes,
        }
    }

    /// 某科目已完成的分钟数
    pub fn completed_minutes_of(
        &self,
        entries: &[PlanEntry],
        record: &CompletionRecord,
        subject: &str,
    ) -> Minutes {
        entries
            .iter()
            .filter(|e| e.subject == subject && record.is_complete(e.date, &e.subject))
            .map(|e| e.minutes)
            .sum()
    }

    /// 当日明细全部勾选完成的科目
    ///
    /// 仅提供判定结果；是否放入“已完成科目”集合由调用方决定
    pub fn finalize_done_subjects(
        &self,
        entries: &[PlanEntry],
        record: &CompletionRecord,
        date: NaiveDate,
    ) -> BTreeSet<String> {
        let today: Vec<&PlanEntry> = entries.iter().filter(|e| e.date == date).collect();
        today
            .iter()
            .map(|e| e.subject.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|subject| {
                today
                    .iter()
                    .filter(|e| e.subject == *subject)
                    .all(|e| record.is_complete(e.date, &e.subject))
            })
            .map(str::to_string)
            .collect()
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn plan() -> Vec<PlanEntry> {
        vec![
            PlanEntry::new(d(9), "Math", 60),
            PlanEntry::new(d(9), "English", 30),
            PlanEntry::new(d(10), "Math", 90),
        ]
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut record = CompletionRecord::new();
        assert!(record.mark_complete(d(9), "Math"));
        assert!(!record.mark_complete(d(9), "Math"));
        assert_eq!(record.len(), 1);

        assert!(record.mark_incomplete(d(9), "Math"));
        assert!(!record.mark_incomplete(d(9), "Math"));
        assert!(record.is_empty());
    }

    #[test]
    fn test_progress_sums_completed_durations() {
        let tracker = ProgressTracker::new();
        let mut record = CompletionRecord::new();
        record.mark_complete(d(9), "Math");

        let progress = tracker.progress(&plan(), &record);
        assert_eq!(progress.completed_minutes, 60);
        assert_eq!(progress.total_minutes, 180);
        assert!((progress.ratio() - 1.0 / 3.0).abs() < 1e-9);

        // 不在计划中的键不计入
        record.mark_complete(d(11), "Art");
        assert_eq!(tracker.progress(&plan(), &record).completed_minutes, 60);
        assert_eq!(tracker.completed_minutes_of(&plan(), &record, "Math"), 60);
    }

    #[test]
    fn test_empty_plan_ratio_is_zero() {
        let progress = ProgressTracker::new().progress(&[], &CompletionRecord::new());
        assert_eq!(progress.ratio(), 0.0);
    }

    #[test]
    fn test_finalize_done_subjects() {
        let tracker = ProgressTracker::new();
        let mut record = CompletionRecord::new();
        record.mark_complete(d(9), "English");

        let done = tracker.finalize_done_subjects(&plan(), &record, d(9));
        assert_eq!(done, ["English".to_string()].into_iter().collect());

        record.mark_complete(d(9), "Math");
        let done = tracker.finalize_done_subjects(&plan(), &record, d(9));
        assert_eq!(done.len(), 2);

        assert!(tracker.finalize_done_subjects(&plan(), &record, d(12)).is_empty());
    }
}
