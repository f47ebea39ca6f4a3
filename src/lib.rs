// ==========================================
// 学习计划排程器 - 核心库
// ==========================================
// 职责: 把有限的每日学习时间分配给多个科目
// 流程: 容量日历 → 目标解析 → 贪心分配 → 缺口补足 → 进度跟踪
// 红线: 同一种子 + 同一输入 → 同一计划
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排程规则
pub mod engine;

// 配置层 - 排程参数
pub mod config;

// 导入层 - 科目表
pub mod importer;

// 导出层 - 计划表
pub mod exporter;

// 日志系统
pub mod logging;

// API 层 - 会话接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Minutes, PlanStatus, WeekdayKey};

// 领域实体
pub use domain::{CalendarDay, PlanEntry, ScheduleWarning, Subject};

// 引擎
pub use engine::{
    CalendarBuilder, CompletionRecord, GreedyDistributor, PlanOrchestrator, PlanRequest,
    PlannerError, PlannerResult, Progress, ProgressTracker, SchedulingMode, ShortfallReconciler,
    StudyPlan, TargetResolver,
};

// 配置
pub use config::{ConfigManager, PlannerConfig, SequencingProfile};

// API
pub use api::{ApiError, ApiResult, StudyPlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学习计划排程器";
