// ==========================================
// 学习计划排程器 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 结构性错误在分配前中止；逐日异常以 ScheduleWarning 附加到结果
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum PlannerError {
    // ===== 日历错误 =====
    #[error("日期范围无效: end={end} 早于 start={start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("日历总容量为 0: {start} ~ {end}，无法生成计划")]
    EmptyCapacity { start: NaiveDate, end: NaiveDate },

    // ===== 输入校验错误 =====
    #[error("科目数据无效 (name={name}): {reason}")]
    InvalidSubject { name: String, reason: String },

    #[error("科目名重复: {0}")]
    DuplicateSubject(String),

    #[error("配置值无效 (key={key}): {message}")]
    InvalidConfig { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlannerError {
    /// 是否可通过调整配置恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlannerError::EmptyCapacity { .. })
    }
}

/// Result 类型别名
pub type PlannerResult<T> = Result<T, PlannerError>;
