// ==========================================
// 学习计划排程器 - 导入层
// ==========================================
// 职责: 用户可编辑的科目表 → 科目列表
// 支持: CSV
// ==========================================

pub mod error;
pub mod subject_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use subject_importer::SubjectCsvImporter;
