// ==========================================
// 学习计划排程器 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 扁平 key-value（JSON 文件或内存键值对）
// ==========================================

use crate::config::planner_config::{
    PlannerConfig, DEFAULT_BASE_CAPACITY_MINUTES, DEFAULT_MAX_ITERATIONS_PER_DAY,
    DEFAULT_ROUNDING_STEP_MINUTES, DEFAULT_SEED, DEFAULT_WEEKEND_MULTIPLIER,
};
use crate::config::strategy_profile::SequencingProfile;
use crate::domain::types::parse_weekday_list;
use crate::engine::strategy::SchedulingMode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    ParseError(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从扁平 JSON 对象文件加载
    ///
    /// 值可以是字符串、数字或布尔，统一按字符串保存
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manager = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), keys = manager.values.len(), "配置文件已加载");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let parsed: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let mut values = BTreeMap::new();
        for (key, value) in parsed {
            let text = match value {
                Value::String(s) => s,
                Value::Null => continue,
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }

    /// 覆写单个配置（命令行参数等更高优先级来源）
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.values)?)
    }

    fn parse_or<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) if raw.trim().is_empty() => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::ValueError {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 组装排程配置（未校验取值范围，校验见 PlannerConfig::validate）
    pub fn load_planner_config(&self) -> ConfigResult<PlannerConfig> {
        let off_raw = self.get_config_or_default(config_keys::OFF_WEEKDAYS, "");
        let off_weekdays = parse_weekday_list(&off_raw).map_err(|item| ConfigError::ValueError {
            key: config_keys::OFF_WEEKDAYS.to_string(),
            value: off_raw.clone(),
            message: format!("无法识别的星期: {}", item),
        })?;

        let recovery_normalizer = match self.get_config_value(config_keys::SEQUENCING_RECOVERY_NORMALIZER) {
            Some(raw) if !raw.trim().is_empty() => Some(self.parse_or(
                config_keys::SEQUENCING_RECOVERY_NORMALIZER,
                0.0_f64,
            )?),
            _ => None,
        };
        let defaults = SequencingProfile::default();

        Ok(PlannerConfig {
            base_capacity_minutes: self
                .parse_or(config_keys::BASE_CAPACITY_MINUTES, DEFAULT_BASE_CAPACITY_MINUTES)?,
            weekend_multiplier: self
                .parse_or(config_keys::WEEKEND_MULTIPLIER, DEFAULT_WEEKEND_MULTIPLIER)?,
            off_weekdays,
            rounding_step_minutes: self
                .parse_or(config_keys::ROUNDING_STEP_MINUTES, DEFAULT_ROUNDING_STEP_MINUTES)?,
            seed: self.parse_or(config_keys::SEED, DEFAULT_SEED)?,
            scheduling_mode: self.parse_or(config_keys::SCHEDULING_MODE, SchedulingMode::Auto)?,
            reconcile_shortfall: self.parse_or(config_keys::RECONCILE_SHORTFALL, true)?,
            max_iterations_per_day: self
                .parse_or(config_keys::MAX_ITERATIONS_PER_DAY, DEFAULT_MAX_ITERATIONS_PER_DAY)?,
            sequencing: SequencingProfile {
                alpha: self.parse_or(config_keys::SEQUENCING_ALPHA, defaults.alpha)?,
                beta: self.parse_or(config_keys::SEQUENCING_BETA, defaults.beta)?,
                recovery_normalizer,
            },
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 日历
    pub const BASE_CAPACITY_MINUTES: &str = "base_capacity_minutes";
    pub const WEEKEND_MULTIPLIER: &str = "weekend_multiplier";
    pub const OFF_WEEKDAYS: &str = "off_weekdays"; // 逗号分隔: mon..sun

    // 取整与随机
    pub const ROUNDING_STEP_MINUTES: &str = "rounding_step_minutes";
    pub const SEED: &str = "seed";

    // 分配
    pub const SCHEDULING_MODE: &str = "scheduling_mode";
    pub const RECONCILE_SHORTFALL: &str = "reconcile_shortfall";
    pub const MAX_ITERATIONS_PER_DAY: &str = "max_iterations_per_day";

    // 顺序模式
    pub const SEQUENCING_ALPHA: &str = "sequencing.alpha";
    pub const SEQUENCING_BETA: &str = "sequencing.beta";
    pub const SEQUENCING_RECOVERY_NORMALIZER: &str = "sequencing.recovery_normalizer";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::WeekdayKey;
    use chrono::Weekday;

    #[test]
    fn test_empty_manager_yields_defaults() {
        let cfg = ConfigManager::new().load_planner_config().unwrap();
        assert_eq!(cfg, PlannerConfig::default());
    }

    #[test]
    fn test_json_values_are_typed() {
        let manager = ConfigManager::from_json_str(
            r#"{
                "base_capacity_minutes": 90,
                "weekend_multiplier": 1.5,
                "off_weekdays": ["sun"],
                "scheduling_mode": "sequencing",
                "reconcile_shortfall": false,
                "sequencing.recovery_normalizer": 45
            }"#,
        )
        .unwrap();

        let cfg = manager.load_planner_config().unwrap();
        assert_eq!(cfg.base_capacity_minutes, 90);
        assert_eq!(cfg.weekend_multiplier, 1.5);
        assert!(cfg.off_weekdays.contains(&WeekdayKey(Weekday::Sun)));
        assert_eq!(cfg.scheduling_mode, SchedulingMode::Sequencing);
        assert!(!cfg.reconcile_shortfall);
        assert_eq!(cfg.sequencing.recovery_normalizer, Some(45.0));
    }

    #[test]
    fn test_bad_value_reports_key() {
        let manager = ConfigManager::from_pairs([(config_keys::SEED, "abc")]);
        match manager.load_planner_config() {
            Err(ConfigError::ValueError { key, .. }) => assert_eq!(key, config_keys::SEED),
            other => panic!("unexpected: {:?}", other),
        }

        let manager = ConfigManager::from_pairs([(config_keys::OFF_WEEKDAYS, "sat,funday")]);
        assert!(manager.load_planner_config().is_err());
    }

    #[test]
    fn test_set_overrides_and_snapshot() {
        let mut manager = ConfigManager::from_pairs([(config_keys::SEED, "1")]);
        manager.set(config_keys::SEED, "7");
        assert_eq!(manager.load_planner_config().unwrap().seed, 7);

        let snapshot = manager.get_config_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"seed":"7"}"#);
    }
}
