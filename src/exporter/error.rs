// ==========================================
// 学习计划排程器 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("CSV 生成失败: {0}")]
    CsvWriteError(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
