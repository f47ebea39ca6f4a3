// ==========================================
// 学习计划排程器 - 科目表 CSV 导入
// ==========================================
// 支持: 带表头的 CSV，列顺序不限，表头大小写不敏感
// 列: name, target_minutes, priority, min_session, difficulty, recovery_cost
// 空单元格表示未设置（target_minutes 未设置 = 自动分配）
// ==========================================

use crate::domain::subject::Subject;
use crate::domain::types::Minutes;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub mod columns {
    pub const NAME: &str = "name";
    pub const TARGET_MINUTES: &str = "target_minutes";
    pub const PRIORITY: &str = "priority";
    pub const MIN_SESSION: &str = "min_session";
    pub const DIFFICULTY: &str = "difficulty";
    pub const RECOVERY_COST: &str = "recovery_cost";
}

// ==========================================
// SubjectCsvImporter - 科目表导入器
// ==========================================
pub struct SubjectCsvImporter;

impl SubjectCsvImporter {
    /// 从文件导入
    pub fn import_file(path: impl AsRef<Path>) -> ImportResult<Vec<Subject>> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = std::fs::File::open(path)?;
        let subjects = Self::import_reader(file)?;
        info!(path = %path.display(), count = subjects.len(), "科目表导入完成");
        Ok(subjects)
    }

    /// 从任意 reader 导入（允许 UTF-8 BOM）
    pub fn import_reader<R: Read>(reader: R) -> ImportResult<Vec<Subject>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .trim(csv::Trim::All)
            .from_reader(reader);

        // 表头 → 列下标
        let headers: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), idx))
            .collect();
        for required in [columns::NAME, columns::PRIORITY, columns::MIN_SESSION] {
            if !headers.contains_key(required) {
                return Err(ImportError::MissingColumn(required.to_string()));
            }
        }

        let mut subjects = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = row_idx + 2; // +2 因为行号从1开始,且跳过header
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let name = get_string_field(&record, &headers, columns::NAME).ok_or_else(|| {
                ImportError::RequiredFieldMissing {
                    row,
                    field: columns::NAME.to_string(),
                }
            })?;
            let priority: u8 = require(&record, &headers, columns::PRIORITY, row)?;
            let min_session: Minutes = require(&record, &headers, columns::MIN_SESSION, row)?;

            subjects.push(Subject {
                name,
                target_minutes: parse_field(&record, &headers, columns::TARGET_MINUTES, row)?,
                priority,
                min_session,
                difficulty: parse_field(&record, &headers, columns::DIFFICULTY, row)?,
                recovery_cost: parse_field(&record, &headers, columns::RECOVERY_COST, row)?,
            });
        }

        Ok(subjects)
    }
}

// ==========================================
// 辅助方法: CSV字段解析
// ==========================================

fn get_string_field(
    record: &StringRecord,
    headers: &HashMap<String, usize>,
    column: &str,
) -> Option<String> {
    headers
        .get(column)
        .and_then(|idx| record.get(*idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_field<T>(
    record: &StringRecord,
    headers: &HashMap<String, usize>,
    column: &str,
    row: usize,
) -> ImportResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_string_field(record, headers, column) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: column.to_string(),
                message: format!("{} ({})", e, raw),
            }),
    }
}

fn require<T>(
    record: &StringRecord,
    headers: &HashMap<String, usize>,
    column: &str,
    row: usize,
) -> ImportResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_field(record, headers, column, row)?.ok_or_else(|| ImportError::RequiredFieldMissing {
        row,
        field: column.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_reader_with_optional_columns() {
        let csv = "\u{feff}Name,Priority,min_session,target_minutes,difficulty,recovery_cost\n\
                   Math,3,30,200,,\n\
                   Physics, 4 ,40,,5,15\n\
                   ,,,,,\n";
        let subjects = SubjectCsvImporter::import_reader(csv.as_bytes()).unwrap();

        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].name, "Math");
        assert_eq!(subjects[0].target_minutes, Some(200));
        assert_eq!(subjects[0].difficulty, None);
        assert_eq!(subjects[1].priority, 4);
        assert_eq!(subjects[1].target_minutes, None);
        assert_eq!(subjects[1].difficulty, Some(5));
        assert_eq!(subjects[1].recovery_cost, Some(15));
    }

    #[test]
    fn test_missing_column_and_bad_value() {
        let csv = "name,priority\nMath,3\n";
        assert!(matches!(
            SubjectCsvImporter::import_reader(csv.as_bytes()),
            Err(ImportError::MissingColumn(ref c)) if c == "min_session"
        ));

        let csv = "name,priority,min_session\nMath,high,30\n";
        assert!(matches!(
            SubjectCsvImporter::import_reader(csv.as_bytes()),
            Err(ImportError::TypeConversionError { row: 2, .. })
        ));

        let csv = "name,priority,min_session\nMath,3,\n";
        assert!(matches!(
            SubjectCsvImporter::import_reader(csv.as_bytes()),
            Err(ImportError::RequiredFieldMissing { row: 2, .. })
        ));
    }

    #[test]
    fn test_import_file_checks_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subjects.txt");
        std::fs::write(&path, "name,priority,min_session\n").unwrap();
        assert!(matches!(
            SubjectCsvImporter::import_file(&path),
            Err(ImportError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            SubjectCsvImporter::import_file(dir.path().join("missing.csv")),
            Err(ImportError::FileNotFound(_))
        ));
    }
}
