// ==========================================
// 学习计划排程器 - 分块选择策略
// ==========================================
// 职责: 决定每轮分配由哪些科目、以何建议份额参与
// 说明: 贪心分配循环只有一份，模式差异全部收敛在本 trait 的实现中
// ==========================================

use crate::config::strategy_profile::SequencingProfile;
use crate::domain::types::Minutes;
use crate::engine::remaining::RemainingTargets;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// 当前轮次的当日上下文
#[derive(Debug, Clone)]
pub struct DayContext<'a> {
    pub date: NaiveDate,
    pub capacity_left: Minutes,
    /// 本轮块大小（未取整，分配时才按步长取整）
    pub round_chunk: f64,
    pub total_remaining: u64,
    /// 当日已因最小时长超容量而跳过的科目（按台账下标）
    pub skipped: &'a [bool],
}

impl DayContext<'_> {
    fn is_candidate(&self, remaining: &RemainingTargets, idx: usize) -> bool {
        remaining.slot(idx).remaining > 0 && !self.skipped[idx]
    }
}

/// 一个分块提案：科目下标 + 建议份额（尚未做最小时长/容量约束与取整）
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkProposal {
    pub subject_idx: usize,
    pub proposed_share: f64,
}

// ==========================================
// Trait: ChunkSelector
// ==========================================
pub trait ChunkSelector {
    /// 本轮依次尝试的提案；返回空表示当日无可选科目
    ///
    /// `last_assigned` 为当日上一块分配到的科目下标
    fn select_chunks(
        &mut self,
        day: &DayContext<'_>,
        remaining: &RemainingTargets,
        last_assigned: Option<usize>,
    ) -> Vec<ChunkProposal>;
}

// ==========================================
// ProportionalSelector - 按比例分配
// ==========================================
// 每轮用注入的随机源洗牌访问顺序，避免总偏向输入靠前的科目
pub struct ProportionalSelector<R: Rng> {
    rng: R,
}

impl<R: Rng> ProportionalSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ChunkSelector for ProportionalSelector<R> {
    fn select_chunks(
        &mut self,
        day: &DayContext<'_>,
        remaining: &RemainingTargets,
        _last_assigned: Option<usize>,
    ) -> Vec<ChunkProposal> {
        if day.total_remaining == 0 {
            return Vec::new();
        }
        let mut order: Vec<usize> = remaining
            .active_indices()
            .into_iter()
            .filter(|idx| !day.skipped[*idx])
            .collect();
        order.shuffle(&mut self.rng);

        order
            .into_iter()
            .map(|idx| ChunkProposal {
                subject_idx: idx,
                proposed_share: day.round_chunk * remaining.slot(idx).remaining as f64
                    / day.total_remaining as f64,
            })
            .collect()
    }
}

// ==========================================
// SequencingSelector - 难度/恢复成本顺序分配
// ==========================================
// 启发式：偏好让高难度/高恢复成本的科目不连续出现，不保证最优
pub struct SequencingSelector {
    profile: SequencingProfile,
    normalizer: f64,
}

impl SequencingSelector {
    /// `max_recovery_cost` 用于未配置归一化分母时的兜底
    pub fn new(profile: SequencingProfile, max_recovery_cost: Minutes) -> Self {
        let normalizer = profile.normalizer_for(max_recovery_cost as f64);
        Self {
            profile,
            normalizer,
        }
    }

    /// 偏好分数
    ///
    /// pref(s) = base(s) * (1 - α·(d_prev - 3)·w) * (1 - β·(r_prev / norm)·w)
    /// - base(s): 剩余目标占比
    /// - prev: 当日上一块的科目，无则取 s 自身
    /// - w: 有 prev 时为 d_s / 3（候选越难，承接上一块负担的惩罚越重），无 prev 时为 1
    pub fn preference(
        &self,
        remaining: &RemainingTargets,
        candidate: usize,
        total_remaining: u64,
        last_assigned: Option<usize>,
    ) -> f64 {
        if total_remaining == 0 {
            return 0.0;
        }
        let cand = remaining.slot(candidate);
        let base = cand.remaining as f64 / total_remaining as f64;

        let (prev, weight) = match last_assigned {
            Some(p) => (remaining.slot(p), cand.difficulty as f64 / 3.0),
            None => (cand, 1.0),
        };
        let difficulty_factor =
            (1.0 - self.profile.alpha * (prev.difficulty as f64 - 3.0) * weight).max(0.0);
        let recovery_factor =
            (1.0 - self.profile.beta * (prev.recovery_cost as f64 / self.normalizer) * weight)
                .max(0.0);

        base * difficulty_factor * recovery_factor
    }
}

impl ChunkSelector for SequencingSelector {
    fn select_chunks(
        &mut self,
        day: &DayContext<'_>,
        remaining: &RemainingTargets,
        last_assigned: Option<usize>,
    ) -> Vec<ChunkProposal> {
        let mut best: Option<(usize, f64)> = None;
        for idx in 0..remaining.len() {
            if !day.is_candidate(remaining, idx) {
                continue;
            }
            let score = self.preference(remaining, idx, day.total_remaining, last_assigned);
            // 严格大于：平局保留输入顺序靠前者
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, _)| {
            let slot = remaining.slot(idx);
            let share = day
                .round_chunk
                .min(slot.remaining as f64)
                .min(day.capacity_left as f64);
            vec![ChunkProposal {
                subject_idx: idx,
                proposed_share: share,
            }]
        })
        .unwrap_or_default()
    }
}
