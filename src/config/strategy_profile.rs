use serde::{Deserialize, Serialize};

/// 顺序模式偏好参数
///
/// 存储位置：配置键 `sequencing.alpha` / `sequencing.beta` / `sequencing.recovery_normalizer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencingProfile {
    /// 难度敏感系数 α
    #[serde(default = "default_coefficient")]
    pub alpha: f64,

    /// 恢复成本敏感系数 β
    #[serde(default = "default_coefficient")]
    pub beta: f64,

    /// 恢复成本归一化分母（分钟）；None 表示取科目中最大的恢复成本
    #[serde(default)]
    pub recovery_normalizer: Option<f64>,
}

fn default_coefficient() -> f64 {
    0.05
}

impl Default for SequencingProfile {
    fn default() -> Self {
        Self {
            alpha: default_coefficient(),
            beta: default_coefficient(),
            recovery_normalizer: None,
        }
    }
}

impl SequencingProfile {
    /// 实际使用的归一化分母（始终 > 0）
    pub fn normalizer_for(&self, max_recovery_cost: f64) -> f64 {
        match self.recovery_normalizer {
            Some(n) if n.is_finite() && n > 0.0 => n,
            _ if max_recovery_cost > 0.0 => max_recovery_cost,
            _ => 1.0,
        }
    }
}
