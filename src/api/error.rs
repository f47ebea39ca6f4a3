// ==========================================
// 学习计划排程器 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把各层错误转换为带显式原因的用户提示
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::PlannerError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 排程结构性错误
    // ==========================================
    /// 日期范围无效（致命，不产生计划）
    #[error("日期范围无效: {0}")]
    InvalidRange(String),

    /// 日历容量为 0（可调整配置后重试）
    #[error("日历容量为 0: {0}")]
    EmptyCapacity(String),

    // ==========================================
    // 输入与状态错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("尚未生成计划: {0}")]
    NoActivePlan(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<PlannerError>
impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::InvalidRange { .. } => ApiError::InvalidRange(err.to_string()),
            PlannerError::EmptyCapacity { .. } => ApiError::EmptyCapacity(err.to_string()),
            PlannerError::InvalidSubject { .. } | PlannerError::DuplicateSubject(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            PlannerError::InvalidConfig { .. } => ApiError::ConfigError(err.to_string()),
            PlannerError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl ApiError {
    /// 是否可由用户调整配置后恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::EmptyCapacity(_) | ApiError::ConfigError(_))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
