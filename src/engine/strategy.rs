// ==========================================
// 学习计划排程器 - 分配模式定义
// ==========================================
// 用途：
// - Proportional：按剩余目标比例分配，同日科目访问顺序由种子洗牌决定；
// - Sequencing：按难度/恢复成本偏好逐块挑选科目；
// - Auto：任一科目填写了难度或恢复成本时选择 Sequencing，否则 Proportional。

use crate::domain::Subject;
use serde::{Deserialize, Serialize};

/// 分配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    Auto,
    Proportional,
    Sequencing,
}

impl SchedulingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulingMode::Auto => "auto",
            SchedulingMode::Proportional => "proportional",
            SchedulingMode::Sequencing => "sequencing",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            SchedulingMode::Auto => "自动选择",
            SchedulingMode::Proportional => "按比例分配",
            SchedulingMode::Sequencing => "难度顺序分配",
        }
    }

    /// 将 Auto 落地为具体模式
    pub fn resolve_for(&self, subjects: &[Subject]) -> SchedulingMode {
        match self {
            SchedulingMode::Auto => {
                if subjects.iter().any(Subject::has_cognition) {
                    SchedulingMode::Sequencing
                } else {
                    SchedulingMode::Proportional
                }
            }
            other => *other,
        }
    }
}

impl Default for SchedulingMode {
    fn default() -> Self {
        SchedulingMode::Auto
    }
}

impl std::fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchedulingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SchedulingMode::Auto),
            "proportional" => Ok(SchedulingMode::Proportional),
            "sequencing" => Ok(SchedulingMode::Sequencing),
            other => Err(format!("未知分配模式: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_by_cognition_fields() {
        let plain = vec![Subject::new("Math", None, 3, 30)];
        assert_eq!(
            SchedulingMode::Auto.resolve_for(&plain),
            SchedulingMode::Proportional
        );

        let mut rich = plain.clone();
        rich.push(Subject::new("Physics", None, 3, 30).with_cognition(4, 10));
        assert_eq!(
            SchedulingMode::Auto.resolve_for(&rich),
            SchedulingMode::Sequencing
        );
        assert_eq!(
            SchedulingMode::Proportional.resolve_for(&rich),
            SchedulingMode::Proportional
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Sequencing".parse::<SchedulingMode>(), Ok(SchedulingMode::Sequencing));
        assert!("greedy".parse::<SchedulingMode>().is_err());
    }
}
