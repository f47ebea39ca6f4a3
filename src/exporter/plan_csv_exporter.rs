// ==========================================
// 学习计划排程器 - 计划 CSV 导出
// ==========================================
// 格式:
// - 明细: date,subject,minutes（每个 (日期, 科目) 一行）
// - 透视: date,<科目...>,Total（日期 × 科目）
// 编码: UTF-8 + BOM，便于表格软件直接打开
// ==========================================

use crate::domain::plan::{sorted_by_date_subject, PlanEntry};
use crate::exporter::error::ExportResult;
use csv::WriterBuilder;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Rows,
    Pivot,
}

// ==========================================
// PlanCsvExporter - 计划导出器
// ==========================================
pub struct PlanCsvExporter;

impl PlanCsvExporter {
    /// 导出为字节（含 BOM）
    ///
    /// `subjects` 决定透视表列顺序；未列出的科目按名称追加在后
    pub fn to_bytes(entries: &[PlanEntry], subjects: &[String], layout: CsvLayout) -> ExportResult<Vec<u8>> {
        let mut buf = UTF8_BOM.to_vec();
        match layout {
            CsvLayout::Rows => Self::write_rows(entries, &mut buf)?,
            CsvLayout::Pivot => Self::write_pivot(entries, subjects, &mut buf)?,
        }
        Ok(buf)
    }

    /// 导出到文件
    pub fn write_file(
        entries: &[PlanEntry],
        subjects: &[String],
        layout: CsvLayout,
        path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(entries, subjects, layout)?;
        std::fs::write(path, bytes)?;
        info!(path = %path.display(), rows = entries.len(), ?layout, "学习计划已导出");
        Ok(())
    }

    /// 明细格式（不写 BOM）
    pub fn write_rows<W: Write>(entries: &[PlanEntry], out: W) -> ExportResult<()> {
        let mut writer = WriterBuilder::new().from_writer(out);
        writer.write_record(["date", "subject", "minutes"])?;
        for entry in sorted_by_date_subject(entries) {
            writer.write_record([
                entry.date.format("%Y-%m-%d").to_string(),
                entry.subject,
                entry.minutes.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 透视格式（不写 BOM）
    pub fn write_pivot<W: Write>(entries: &[PlanEntry], subjects: &[String], out: W) -> ExportResult<()> {
        let mut columns: Vec<String> = subjects.to_vec();
        let mut extra: Vec<String> = entries
            .iter()
            .map(|e| e.subject.clone())
            .filter(|s| !columns.contains(s))
            .collect();
        extra.sort();
        extra.dedup();
        columns.extend(extra);

        let mut by_date: BTreeMap<_, BTreeMap<&str, u32>> = BTreeMap::new();
        for entry in entries {
            *by_date
                .entry(entry.date)
                .or_default()
                .entry(entry.subject.as_str())
                .or_insert(0) += entry.minutes;
        }

        let mut writer = WriterBuilder::new().from_writer(out);
        let mut header = vec!["date".to_string()];
        header.extend(columns.iter().cloned());
        header.push("Total".to_string());
        writer.write_record(&header)?;

        for (date, cells) in &by_date {
            let mut row = vec![date.format("%Y-%m-%d").to_string()];
            let mut total: u64 = 0;
            for column in &columns {
                let minutes = cells.get(column.as_str()).copied().unwrap_or(0);
                total += minutes as u64;
                row.push(minutes.to_string());
            }
            row.push(total.to_string());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
