// ==========================================
// 学习计划排程器 - 贪心分配引擎
// ==========================================
// 职责: 逐日把可用容量切分为各科目的学习块
// 输入: 容量日历 + 已解析目标的科目 + 分块选择策略
// 输出: 计划明细 + 剩余目标台账 + 非致命告警
// 红线: 每日分配总量不超过当日容量；不输出小于最小时长的截断块
// ==========================================

use crate::domain::calendar::CalendarDay;
use crate::domain::plan::{accumulate_entry, PlanEntry, ScheduleWarning};
use crate::domain::subject::Subject;
use crate::domain::types::{round_to_step, Minutes};
use crate::engine::remaining::RemainingTargets;
use crate::engine::selector::{ChunkSelector, DayContext};
use tracing::{debug, instrument, warn};

/// 单次分配运行结果
#[derive(Debug, Clone)]
pub struct DistributionResult {
    pub entries: Vec<PlanEntry>,
    pub remaining: RemainingTargets,
    pub warnings: Vec<ScheduleWarning>,
}

// ==========================================
// GreedyDistributor - 贪心分配引擎
// ==========================================
pub struct GreedyDistributor {
    step: Minutes,
    max_iterations_per_day: usize,
}

impl GreedyDistributor {
    pub fn new(step: Minutes, max_iterations_per_day: usize) -> Self {
        Self {
            step: step.max(1),
            max_iterations_per_day: max_iterations_per_day.max(1),
        }
    }

    /// 执行分配
    ///
    /// 每日循环（容量 > 0 且剩余目标 > 0）:
    /// 1) 轮次块大小 = min(容量, max(步长, 活跃科目最小时长均值))，均值不取整
    /// 2) 由选择策略给出本轮提案
    /// 3) 份额 = max(建议份额, 最小时长)，再夹到 min(剩余目标, 容量)，按步长取整
    /// 4) min(最小时长, 剩余目标) > 容量时当日跳过该科目，剩余目标原样顺延
    ///
    /// 当日已无候选科目时直接收工；仍有候选却触达安全迭代上限时记录 DayUnderfilled 告警，
    /// 继续处理后续日期
    #[instrument(skip_all, fields(days = calendar.len(), subjects = subjects.len()))]
    pub fn distribute<S: ChunkSelector>(
        &self,
        calendar: &[CalendarDay],
        subjects: &[Subject],
        selector: &mut S,
    ) -> DistributionResult {
        let mut remaining = RemainingTargets::from_subjects(subjects);
        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        if remaining.is_empty() {
            return DistributionResult {
                entries,
                remaining,
                warnings,
            };
        }

        for day in calendar {
            if day.available_minutes == 0 {
                continue;
            }
            if remaining.total() == 0 {
                break;
            }

            let mut capacity = day.available_minutes;
            let mut skipped = vec![false; remaining.len()];
            let mut last_assigned: Option<usize> = None;
            let mut iterations = 0usize;

            while capacity > 0 {
                let total_remaining = remaining.total();
                if total_remaining == 0 {
                    break;
                }
                // 剩余科目均已在当日跳过：容量本就无法填满，不算触达上限
                let has_candidate = remaining
                    .active_indices()
                    .into_iter()
                    .any(|idx| !skipped[idx]);
                if !has_candidate {
                    break;
                }
                if iterations >= self.max_iterations_per_day {
                    warn!(date = %day.date, unused_minutes = capacity, iterations, "当日触达安全迭代上限");
                    warnings.push(ScheduleWarning::DayUnderfilled {
                        date: day.date,
                        unused_minutes: capacity,
                        iterations,
                    });
                    break;
                }
                iterations += 1;

                let mean_min = match remaining.mean_active_min_session() {
                    Some(m) => m,
                    None => break,
                };
                let round_chunk = mean_min.max(self.step as f64).min(capacity as f64);

                let ctx = DayContext {
                    date: day.date,
                    capacity_left: capacity,
                    round_chunk,
                    total_remaining,
                    skipped: &skipped,
                };
                let proposals = selector.select_chunks(&ctx, &remaining, last_assigned);
                if proposals.is_empty() {
                    break;
                }

                let mut progressed = false;
                for proposal in proposals {
                    if capacity == 0 {
                        break;
                    }
                    let idx = proposal.subject_idx;
                    let slot = remaining.slot(idx);
                    if slot.remaining == 0 || skipped[idx] {
                        continue;
                    }

                    // 最小时长放不下：当日跳过，不截断
                    let required = slot.min_session.min(slot.remaining);
                    if required > capacity {
                        debug!(date = %day.date, subject = %slot.name, min_session = slot.min_session, capacity, "最小时长超出当日剩余容量，跳过");
                        warnings.push(ScheduleWarning::SubjectSkipped {
                            date: day.date,
                            subject: slot.name.clone(),
                            min_session: slot.min_session,
                            capacity_left: capacity,
                        });
                        skipped[idx] = true;
                        progressed = true;
                        continue;
                    }

                    let share = proposal
                        .proposed_share
                        .max(slot.min_session as f64)
                        .min(slot.remaining as f64)
                        .min(capacity as f64);
                    let minutes = round_to_step(share, self.step)
                        .min(slot.remaining)
                        .min(capacity);
                    if minutes == 0 {
                        continue;
                    }

                    accumulate_entry(&mut entries, day.date, &slot.name, minutes);
                    remaining.consume(idx, minutes);
                    capacity -= minutes;
                    last_assigned = Some(idx);
                    progressed = true;
                }

                if !progressed {
                    break;
                }
            }

            debug!(
                date = %day.date,
                capacity = day.available_minutes,
                unused = capacity,
                iterations,
                "当日分配完成"
            );
        }

        DistributionResult {
            entries,
            remaining,
            warnings,
        }
    }
}
