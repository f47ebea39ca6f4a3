// ==========================================
// 学习计划排程器 - 学习计划 API
// ==========================================
// 职责: 面向使用方的会话门面（生成、勾选完成、进度、重排、导出）
// 说明: 完成记录与已完成科目集合由本门面持有，排程引擎保持无状态
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlannerConfig};
use crate::domain::types::PlanStatus;
use crate::engine::{
    CompletionRecord, PlanOrchestrator, PlanRequest, Progress, ProgressTracker, StudyPlan,
};
use crate::exporter::{CsvLayout, PlanCsvExporter};
use crate::importer::SubjectCsvImporter;

// ==========================================
// StudyPlanApi - 学习计划 API
// ==========================================

/// 学习计划API
///
/// 职责：
/// 1. 生成计划（可选排除已完成科目）
/// 2. 勾选/取消勾选 (日期, 科目)
/// 3. 查询进度、判定当日已完成科目
/// 4. 基于完成记录重新排程
/// 5. 导出 CSV
pub struct StudyPlanApi {
    orchestrator: PlanOrchestrator,
    tracker: ProgressTracker,
    request: Option<PlanRequest>,
    plan: Option<StudyPlan>,
    record: CompletionRecord,
    done_subjects: BTreeSet<String>,
}

impl StudyPlanApi {
    /// 创建新的StudyPlanApi实例
    pub fn new(config: PlannerConfig) -> ApiResult<Self> {
        Ok(Self {
            orchestrator: PlanOrchestrator::new(config)?,
            tracker: ProgressTracker::new(),
            request: None,
            plan: None,
            record: CompletionRecord::new(),
            done_subjects: BTreeSet::new(),
        })
    }

    /// 由配置管理器创建
    pub fn from_config_manager(manager: &ConfigManager) -> ApiResult<Self> {
        Self::new(manager.load_planner_config()?)
    }

    // ==========================================
    // 计划生成
    // ==========================================

    /// 生成计划
    ///
    /// 新计划会清空完成记录；已完成科目集合保留
    pub fn generate(&mut self, request: PlanRequest) -> ApiResult<&StudyPlan> {
        let plan = self.orchestrator.generate(&request, &self.done_subjects)?;
        self.log_outcome(&plan);
        self.request = Some(request);
        self.record = CompletionRecord::new();
        Ok(self.plan.insert(plan))
    }

    /// 从科目表 CSV 生成计划
    pub fn generate_from_csv(
        &mut self,
        subjects_csv: impl AsRef<Path>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<&StudyPlan> {
        let subjects = SubjectCsvImporter::import_file(subjects_csv)?;
        self.generate(PlanRequest {
            start_date,
            end_date,
            subjects,
        })
    }

    /// 基于完成记录重新排程（从 from_date 起）
    ///
    /// 重排请求（手动目标已扣减完成量）成为新的基准请求，
    /// 完成记录随之清空，连续重排不会重复计入已完成分钟数
    pub fn replan(&mut self, from_date: NaiveDate) -> ApiResult<&StudyPlan> {
        let (request, previous) = match (&self.request, &self.plan) {
            (Some(r), Some(p)) => (r, p),
            _ => return Err(ApiError::NoActivePlan("请先生成计划".to_string())),
        };

        let next = self
            .orchestrator
            .replan_request(request, previous, &self.record, from_date)?;
        let plan = self.orchestrator.generate(&next, &self.done_subjects)?;
        self.log_outcome(&plan);
        self.request = Some(next);
        self.record = CompletionRecord::new();
        Ok(self.plan.insert(plan))
    }

    /// 当前基准请求（生成或重排后更新）
    pub fn current_request(&self) -> Option<&PlanRequest> {
        self.request.as_ref()
    }

    fn log_outcome(&self, plan: &StudyPlan) {
        match plan.status {
            PlanStatus::NothingToSchedule => info!("全部完成，无需排程"),
            PlanStatus::Scheduled => {
                for warning in &plan.warnings {
                    warn!(date = %warning.date(), %warning, "排程告警");
                }
            }
        }
    }

    pub fn current_plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn completion_record(&self) -> &CompletionRecord {
        &self.record
    }

    pub fn done_subjects(&self) -> &BTreeSet<String> {
        &self.done_subjects
    }

    // ==========================================
    // 完成状态
    // ==========================================

    pub fn mark_complete(&mut self, date: NaiveDate, subject: &str) -> bool {
        self.record.mark_complete(date, subject)
    }

    pub fn mark_incomplete(&mut self, date: NaiveDate, subject: &str) -> bool {
        self.record.mark_incomplete(date, subject)
    }

    /// 当前计划的完成进度
    pub fn progress(&self) -> ApiResult<Progress> {
        let plan = self.require_plan()?;
        Ok(self.tracker.progress(&plan.entries, &self.record))
    }

    /// 当日明细已全部勾选的科目（仅判定，不修改已完成集合）
    pub fn finalize_done_subjects(&self, date: NaiveDate) -> ApiResult<BTreeSet<String>> {
        let plan = self.require_plan()?;
        Ok(self
            .tracker
            .finalize_done_subjects(&plan.entries, &self.record, date))
    }

    /// 将科目放入已完成集合，后续排程将其排除
    pub fn mark_subjects_done<I, S>(&mut self, subjects: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for subject in subjects {
            self.done_subjects.insert(subject.as_ref().trim().to_string());
        }
    }

    /// 从已完成集合移除
    pub fn restore_subject(&mut self, subject: &str) -> bool {
        self.done_subjects.remove(subject.trim())
    }

    // ==========================================
    // 导出
    // ==========================================

    pub fn export_csv(&self, layout: CsvLayout) -> ApiResult<Vec<u8>> {
        let plan = self.require_plan()?;
        Ok(PlanCsvExporter::to_bytes(
            &plan.entries,
            &plan.subject_names(),
            layout,
        )?)
    }

    pub fn export_csv_file(&self, layout: CsvLayout, path: impl AsRef<Path>) -> ApiResult<()> {
        let plan = self.require_plan()?;
        Ok(PlanCsvExporter::write_file(
            &plan.entries,
            &plan.subject_names(),
            layout,
            path,
        )?)
    }

    fn require_plan(&self) -> ApiResult<&StudyPlan> {
        self.plan
            .as_ref()
            .ok_or_else(|| ApiError::NoActivePlan("请先生成计划".to_string()))
    }
}
