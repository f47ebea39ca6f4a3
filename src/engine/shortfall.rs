// ==========================================
// 学习计划排程器 - 缺口补足
// ==========================================
// 职责: 补足取整/跳过造成的当日容量缺口
// 适用: 仅按比例分配模式
// 红线: 补足后不超过当日容量，补足量不小于取整步长
// 红线: 不新建短于最小时长的截断块（与分配阶段的跳过规则一致）
// ==========================================

use crate::domain::calendar::CalendarDay;
use crate::domain::plan::{accumulate_entry, day_total, PlanEntry};
use crate::domain::types::{round_to_step, Minutes};
use crate::engine::remaining::RemainingTargets;
use chrono::NaiveDate;
use tracing::{debug, instrument};

// ==========================================
// ShortfallReconciler - 缺口补足器
// ==========================================
pub struct ShortfallReconciler {
    step: Minutes,
}

impl ShortfallReconciler {
    pub fn new(step: Minutes) -> Self {
        Self { step: step.max(1) }
    }

    /// 逐日补足缺口
    ///
    /// 规则:
    /// 1) gap = 当日容量 - 当日已排总量，gap <= 0 不处理
    /// 2) 选剩余目标最大的科目（平局按名称）
    /// 3) 补足量 = min(gap, max(最小时长, 步长), 剩余目标)，按步长取整
    /// 4) 补足量 < 步长或超过 gap 时放弃
    /// 5) 补足后当日该科目明细仍短于 min(最小时长, 剩余目标) 时放弃（不制造截断块）
    ///
    /// # 返回
    /// 补足的总分钟数
    #[instrument(skip_all, fields(days = calendar.len()))]
    pub fn reconcile(
        &self,
        calendar: &[CalendarDay],
        entries: &mut Vec<PlanEntry>,
        remaining: &mut RemainingTargets,
    ) -> Minutes {
        let mut topped_up: Minutes = 0;

        for day in calendar {
            let planned = day_total(entries, day.date);
            if planned >= day.available_minutes {
                continue;
            }
            let gap = day.available_minutes - planned;

            let idx = match remaining.largest_outstanding() {
                Some(idx) => idx,
                None => break,
            };
            let slot = remaining.slot(idx);
            let raw = gap
                .min(slot.min_session.max(self.step))
                .min(slot.remaining);
            let top_up = round_to_step(raw as f64, self.step);
            if top_up < self.step || top_up > gap || top_up > slot.remaining {
                continue;
            }
            let existing = entry_minutes(entries, day.date, &slot.name);
            if existing + top_up < slot.min_session.min(slot.remaining) {
                debug!(date = %day.date, subject = %slot.name, top_up, existing, "补足后仍不足最小时长，放弃");
                continue;
            }

            let name = slot.name.clone();
            accumulate_entry(entries, day.date, &name, top_up);
            remaining.consume(idx, top_up);
            topped_up += top_up;
            debug!(date = %day.date, subject = %name, top_up, gap, "补足当日缺口");
        }

        topped_up
    }
}

fn entry_minutes(entries: &[PlanEntry], date: NaiveDate, subject: &str) -> Minutes {
    entries
        .iter()
        .find(|e| e.date == date && e.subject == subject)
        .map_or(0, |e| e.minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subject::Subject;
    use chrono::{NaiveDate, Weekday};

    fn day(d: u32, cap: Minutes) -> CalendarDay {
        CalendarDay {
            date: NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
            weekday: Weekday::Mon,
            available_minutes: cap,
        }
    }

    #[test]
    fn test_tops_up_largest_remaining() {
        let calendar = vec![day(9, 120)];
        let mut entries = vec![PlanEntry::new(calendar[0].date, "Math", 90)];
        let mut remaining = RemainingTargets::from_subjects(&[
            Subject::new("Math", Some(50), 3, 30),
            Subject::new("English", Some(80), 3, 20),
        ]);

        let added = ShortfallReconciler::new(10).reconcile(&calendar, &mut entries, &mut remaining);

        assert_eq!(added, 20);
        assert_eq!(day_total(&entries, calendar[0].date), 110);
        assert_eq!(remaining.remaining_of("English"), 60);
    }

    #[test]
    fn test_existing_entry_is_extended_and_capacity_respected() {
        let calendar = vec![day(9, 60)];
        let mut entries = vec![PlanEntry::new(calendar[0].date, "Math", 40)];
        let mut remaining =
            RemainingTargets::from_subjects(&[Subject::new("Math", Some(100), 3, 30)]);

        let added = ShortfallReconciler::new(10).reconcile(&calendar, &mut entries, &mut remaining);

        assert_eq!(added, 20);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].minutes, 60);
    }

    #[test]
    fn test_skipped_day_not_topped_up_with_short_entry() {
        let calendar = vec![day(7, 40), day(9, 60)];
        let mut entries = vec![PlanEntry::new(calendar[1].date, "Essay", 50)];
        let mut remaining =
            RemainingTargets::from_subjects(&[Subject::new("Essay", Some(100), 3, 50)]);
        remaining.consume(0, 50);

        let added = ShortfallReconciler::new(10).reconcile(&calendar, &mut entries, &mut remaining);

        // 3/7 新建 40 分钟块短于最小时长 50，放弃；3/9 扩展已有 50 分钟明细可行
        assert_eq!(added, 10);
        assert_eq!(day_total(&entries, calendar[0].date), 0);
        assert_eq!(entries, vec![PlanEntry::new(calendar[1].date, "Essay", 60)]);
        assert_eq!(remaining.remaining_of("Essay"), 40);
    }

    #[test]
    fn test_full_days_and_empty_remaining_untouched() {
        let calendar = vec![day(9, 60), day(10, 60)];
        let mut entries = vec![PlanEntry::new(calendar[0].date, "Math", 60)];
        let mut remaining =
            RemainingTargets::from_subjects(&[Subject::new("Math", Some(0), 3, 30)]);

        let added = ShortfallReconciler::new(10).reconcile(&calendar, &mut entries, &mut remaining);
        assert_eq!(added, 0);
        assert_eq!(entries.len(), 1);
    }
}
