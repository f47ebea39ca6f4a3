// ==========================================
// 学习计划排程器 - 配置层
// ==========================================
// 职责: 系统配置管理，支持文件加载与覆写
// 存储: 扁平 key-value
// ==========================================

pub mod config_manager;
pub mod planner_config;
pub mod strategy_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use planner_config::PlannerConfig;
pub use strategy_profile::SequencingProfile;
