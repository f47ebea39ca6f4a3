// ==========================================
// 学习计划排程器 - 导出层
// ==========================================
// 职责: 计划 → 表格文件（不参与排程）
// ==========================================

pub mod error;
pub mod plan_csv_exporter;

pub use error::{ExportError, ExportResult};
pub use plan_csv_exporter::{CsvLayout, PlanCsvExporter};
