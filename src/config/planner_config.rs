// ==========================================
// 学习计划排程器 - 排程配置
// ==========================================
// 职责: 一次排程运行所需的全部参数（日历、取整、种子、模式）
// 说明: 任一参数变化都需整体重建日历并重新排程
// ==========================================

use crate::config::strategy_profile::SequencingProfile;
use crate::domain::types::{Minutes, WeekdayKey};
use crate::engine::error::{PlannerError, PlannerResult};
use crate::engine::strategy::SchedulingMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_BASE_CAPACITY_MINUTES: Minutes = 120;
pub const DEFAULT_WEEKEND_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_ROUNDING_STEP_MINUTES: Minutes = 10;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS_PER_DAY: usize = 10_000;

// ==========================================
// PlannerConfig - 排程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    // ===== 日历 =====
    pub base_capacity_minutes: Minutes, // 工作日基础容量
    pub weekend_multiplier: f64,        // 周末倍率
    pub off_weekdays: BTreeSet<WeekdayKey>, // 固定休息日

    // ===== 取整与随机 =====
    pub rounding_step_minutes: Minutes,
    pub seed: u64,

    // ===== 分配 =====
    pub scheduling_mode: SchedulingMode,
    pub reconcile_shortfall: bool,
    pub max_iterations_per_day: usize, // 安全迭代上限（非语义上限）
    pub sequencing: SequencingProfile,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_capacity_minutes: DEFAULT_BASE_CAPACITY_MINUTES,
            weekend_multiplier: DEFAULT_WEEKEND_MULTIPLIER,
            off_weekdays: BTreeSet::new(),
            rounding_step_minutes: DEFAULT_ROUNDING_STEP_MINUTES,
            seed: DEFAULT_SEED,
            scheduling_mode: SchedulingMode::Auto,
            reconcile_shortfall: true,
            max_iterations_per_day: DEFAULT_MAX_ITERATIONS_PER_DAY,
            sequencing: SequencingProfile::default(),
        }
    }
}

impl PlannerConfig {
    /// 校验配置取值
    pub fn validate(&self) -> PlannerResult<()> {
        if self.rounding_step_minutes == 0 {
            return Err(invalid("rounding_step_minutes", "取整步长必须 > 0"));
        }
        if !self.weekend_multiplier.is_finite() || self.weekend_multiplier < 0.0 {
            return Err(invalid(
                "weekend_multiplier",
                &format!("周末倍率必须为非负有限数, 实际 {}", self.weekend_multiplier),
            ));
        }
        if self.max_iterations_per_day == 0 {
            return Err(invalid("max_iterations_per_day", "安全迭代上限必须 > 0"));
        }
        for (key, value) in [
            ("sequencing.alpha", self.sequencing.alpha),
            ("sequencing.beta", self.sequencing.beta),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(key, &format!("系数必须位于 [0, 1), 实际 {}", value)));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> PlannerError {
    PlannerError::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cfg = PlannerConfig {
            rounding_step_minutes: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(PlannerError::InvalidConfig { ref key, .. }) if key == "rounding_step_minutes"
        ));

        let cfg = PlannerConfig {
            weekend_multiplier: -1.0,
            ..PlannerConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = PlannerConfig::default();
        cfg.sequencing.alpha = 1.5;
        assert!(cfg.validate().is_err());
    }
}
