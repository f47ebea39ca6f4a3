// ==========================================
// 学习计划排程器 - 科目领域模型
// ==========================================
// 红线: 科目名唯一、非空、已去除首尾空白
// 用途: 目标解析与贪心分配的输入
// ==========================================

use crate::domain::types::Minutes;
use serde::{Deserialize, Serialize};

/// 未填写难度时的默认值
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// 优先级/难度的合法范围
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 5;

// ==========================================
// Subject - 科目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String, // 科目名（主键）

    // ===== 目标 =====
    #[serde(default)]
    pub target_minutes: Option<Minutes>, // 目标总时长，None/0 表示自动分配
    pub priority: u8,                    // 优先级 1-5

    // ===== 约束 =====
    pub min_session: Minutes, // 单次最小学习时长

    // ===== 认知属性 (可选) =====
    #[serde(default)]
    pub difficulty: Option<u8>, // 难度 1-5
    #[serde(default)]
    pub recovery_cost: Option<Minutes>, // 恢复成本（分钟）
}

impl Subject {
    /// 构造一个无认知属性的科目
    pub fn new(name: &str, target_minutes: Option<Minutes>, priority: u8, min_session: Minutes) -> Self {
        Self {
            name: name.to_string(),
            target_minutes,
            priority,
            min_session,
            difficulty: None,
            recovery_cost: None,
        }
    }

    /// 附加难度与恢复成本
    pub fn with_cognition(mut self, difficulty: u8, recovery_cost: Minutes) -> Self {
        self.difficulty = Some(difficulty);
        self.recovery_cost = Some(recovery_cost);
        self
    }

    /// 是否为手动目标科目（显式目标 > 0）
    pub fn is_manual(&self) -> bool {
        self.target_minutes.map_or(false, |t| t > 0)
    }

    /// 已解析后的目标时长（未设置视为 0）
    pub fn target(&self) -> Minutes {
        self.target_minutes.unwrap_or(0)
    }

    /// 有效难度（默认 3）
    pub fn effective_difficulty(&self) -> u8 {
        self.difficulty.unwrap_or(DEFAULT_DIFFICULTY)
    }

    /// 有效恢复成本（默认 0）
    pub fn effective_recovery_cost(&self) -> Minutes {
        self.recovery_cost.unwrap_or(0)
    }

    /// 是否填写了认知属性（难度或恢复成本）
    pub fn has_cognition(&self) -> bool {
        self.difficulty.is_some() || self.recovery_cost.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_defaults() {
        let s = Subject::new("Math", None, 3, 30);
        assert!(!s.is_manual());
        assert_eq!(s.target(), 0);
        assert_eq!(s.effective_difficulty(), DEFAULT_DIFFICULTY);
        assert_eq!(s.effective_recovery_cost(), 0);
        assert!(!s.has_cognition());

        let s = Subject::new("Math", Some(0), 3, 30);
        assert!(!s.is_manual());

        let s = Subject::new("Math", Some(120), 3, 30).with_cognition(5, 15);
        assert!(s.is_manual());
        assert!(s.has_cognition());
        assert_eq!(s.effective_difficulty(), 5);
    }

    #[test]
    fn test_subject_deserialize_camel_case() {
        let raw = r#"{"name":"English","targetMinutes":90,"priority":2,"minSession":20}"#;
        let s: Subject = serde_json::from_str(raw).unwrap();
        assert_eq!(s.target_minutes, Some(90));
        assert_eq!(s.min_session, 20);
        assert_eq!(s.difficulty, None);
    }
}
