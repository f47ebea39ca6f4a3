// ==========================================
// 学习计划排程器 - API 层
// ==========================================
// 职责: 提供会话级业务接口，供命令行或上层应用调用
// ==========================================

pub mod error;
pub mod plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_api::StudyPlanApi;
