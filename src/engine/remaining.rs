// ==========================================
// 学习计划排程器 - 剩余目标台账
// ==========================================
// 职责: 一次排程运行内各科目的剩余目标时长
// 红线: 只归单次运行独占，不跨运行共享
// ==========================================

use crate::domain::subject::Subject;
use crate::domain::types::Minutes;
use serde::Serialize;

/// 单个科目的剩余目标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainingSlot {
    pub name: String,
    pub remaining: Minutes,
    pub min_session: Minutes,
    pub difficulty: u8,
    pub recovery_cost: Minutes,
}

// ==========================================
// RemainingTargets - 剩余目标台账
// ==========================================
// 下标即科目的输入顺序，用于平局时按插入顺序取舍
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainingTargets {
    slots: Vec<RemainingSlot>,
}

impl RemainingTargets {
    /// 由已解析目标的科目列表建立台账
    pub fn from_subjects(subjects: &[Subject]) -> Self {
        Self {
            slots: subjects
                .iter()
                .map(|s| RemainingSlot {
                    name: s.name.clone(),
                    remaining: s.target(),
                    min_session: s.min_session,
                    difficulty: s.effective_difficulty(),
                    recovery_cost: s.effective_recovery_cost(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, idx: usize) -> &RemainingSlot {
        &self.slots[idx]
    }

    pub fn slots(&self) -> &[RemainingSlot] {
        &self.slots
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn remaining_of(&self, name: &str) -> Minutes {
        self.index_of(name)
            .map(|idx| self.slots[idx].remaining)
            .unwrap_or(0)
    }

    /// 剩余目标总和
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|s| s.remaining as u64).sum()
    }

    /// 仍有剩余目标的科目下标（输入顺序）
    pub fn active_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 活跃科目单次最小时长的均值；无活跃科目时返回 None
    pub fn mean_active_min_session(&self) -> Option<f64> {
        let active: Vec<_> = self.slots.iter().filter(|s| s.remaining > 0).collect();
        if active.is_empty() {
            return None;
        }
        let sum: f64 = active.iter().map(|s| s.min_session as f64).sum();
        Some(sum / active.len() as f64)
    }

    /// 扣减剩余目标（饱和减法）
    pub fn consume(&mut self, idx: usize, minutes: Minutes) {
        let slot = &mut self.slots[idx];
        slot.remaining = slot.remaining.saturating_sub(minutes);
    }

    /// 剩余目标最大的科目（平局按科目名升序）
    pub fn largest_outstanding(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0)
            .max_by(|(_, a), (_, b)| {
                a.remaining
                    .cmp(&b.remaining)
                    .then_with(|| b.name.cmp(&a.name))
            })
            .map(|(idx, _)| idx)
    }

    /// 尚未排入计划的剩余时长（按输入顺序，仅 > 0）
    pub fn unscheduled(&self) -> Vec<(String, Minutes)> {
        self.slots
            .iter()
            .filter(|s| s.remaining > 0)
            .map(|s| (s.name.clone(), s.remaining))
            .collect()
    }
}
