// ==========================================
// 学习计划排程器 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含排程逻辑，不含 I/O
// ==========================================

pub mod calendar;
pub mod plan;
pub mod subject;
pub mod types;

// 重导出核心类型
pub use calendar::CalendarDay;
pub use plan::{PlanEntry, ScheduleWarning};
pub use subject::Subject;
pub use types::{Minutes, PlanStatus, WeekdayKey};
