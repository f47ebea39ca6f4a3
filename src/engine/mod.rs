// ==========================================
// 学习计划排程器 - 引擎层
// ==========================================
// 职责: 实现排程规则，不做 I/O
// 红线: 每日分配不超过容量；所有时长为取整步长整数倍；同输入同种子结果一致
// ==========================================

pub mod calendar_builder;
pub mod distributor;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod remaining;
pub mod selector;
pub mod shortfall;
pub mod strategy;
pub mod target_resolver;

// 重导出核心引擎
pub use calendar_builder::CalendarBuilder;
pub use distributor::{DistributionResult, GreedyDistributor};
pub use error::{PlannerError, PlannerResult};
pub use orchestrator::{PlanOrchestrator, PlanRequest, StudyPlan};
pub use progress::{CompletionRecord, Progress, ProgressTracker};
pub use remaining::RemainingTargets;
pub use selector::{ChunkProposal, ChunkSelector, DayContext, ProportionalSelector, SequencingSelector};
pub use shortfall::ShortfallReconciler;
pub use strategy::SchedulingMode;
pub use target_resolver::{validate_subjects, TargetResolver};
