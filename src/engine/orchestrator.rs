// ==========================================
// 学习计划排程器 - 引擎编排器
// ==========================================
// 用途: 串联 日历构建 → 目标解析 → 贪心分配 → 缺口补足
// 说明: 单次运行是 (配置, 科目, 种子) 的纯函数，不做 I/O
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::calendar::{total_capacity, CalendarDay};
use crate::domain::plan::{self, PlanEntry, ScheduleWarning};
use crate::domain::subject::Subject;
use crate::domain::types::{Minutes, PlanStatus};
use crate::engine::error::{PlannerError, PlannerResult};
use crate::engine::progress::{CompletionRecord, ProgressTracker};
use crate::engine::selector::{ProportionalSelector, SequencingSelector};
use crate::engine::strategy::SchedulingMode;
use crate::engine::target_resolver::validate_subjects;
use crate::engine::{CalendarBuilder, GreedyDistributor, ShortfallReconciler, TargetResolver};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

// ==========================================
// PlanRequest - 排程请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub subjects: Vec<Subject>,
}

// ==========================================
// StudyPlan - 排程结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub status: PlanStatus,
    pub mode: SchedulingMode, // 实际使用的模式（不会是 Auto）
    pub seed: u64,

    // 日历与解析输出
    pub calendar: Vec<CalendarDay>,
    pub resolved_subjects: Vec<Subject>,

    // 分配输出
    pub entries: Vec<PlanEntry>,
    pub unscheduled: Vec<(String, Minutes)>, // 容量不足而未排入的剩余目标
    pub topped_up_minutes: Minutes,
    pub warnings: Vec<ScheduleWarning>,
}

impl StudyPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_on(&self, date: NaiveDate) -> Vec<&PlanEntry> {
        self.entries.iter().filter(|e| e.date == date).collect()
    }

    pub fn day_total(&self, date: NaiveDate) -> Minutes {
        plan::day_total(&self.entries, date)
    }

    pub fn subject_total(&self, subject: &str) -> Minutes {
        plan::subject_total(&self.entries, subject)
    }

    pub fn total_minutes(&self) -> u64 {
        self.entries.iter().map(|e| e.minutes as u64).sum()
    }

    /// 按 (日期, 科目名) 排序的明细
    pub fn sorted_entries(&self) -> Vec<PlanEntry> {
        plan::sorted_by_date_subject(&self.entries)
    }

    /// 计划中出现过的科目（按解析顺序）
    pub fn subject_names(&self) -> Vec<String> {
        self.resolved_subjects
            .iter()
            .map(|s| s.name.clone())
            .filter(|name| self.entries.iter().any(|e| &e.subject == name))
            .collect()
    }
}

// ==========================================
// PlanOrchestrator - 引擎编排器
// ==========================================
pub struct PlanOrchestrator {
    config: PlannerConfig,
    calendar_builder: CalendarBuilder,
    resolver: TargetResolver,
    distributor: GreedyDistributor,
    reconciler: ShortfallReconciler,
    tracker: ProgressTracker,
}

impl PlanOrchestrator {
    /// 创建编排器（配置非法时返回 InvalidConfig）
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        let step = config.rounding_step_minutes;
        Ok(Self {
            calendar_builder: CalendarBuilder::new(),
            resolver: TargetResolver::new(step),
            distributor: GreedyDistributor::new(step, config.max_iterations_per_day),
            reconciler: ShortfallReconciler::new(step),
            tracker: ProgressTracker::new(),
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 执行完整排程流程
    ///
    /// # 参数
    /// - request: 日期范围 + 科目列表
    /// - done: 已完成科目集合（排除于目标解析之外）
    ///
    /// # 错误
    /// - InvalidRange / EmptyCapacity: 分配前中止，不产生部分计划
    /// - InvalidSubject / DuplicateSubject: 输入校验失败
    ///
    /// 无可排科目时返回 status = NothingToSchedule 的空计划
    #[instrument(skip(self, request, done), fields(
        start = %request.start_date,
        end = %request.end_date,
        subjects = request.subjects.len(),
        seed = self.config.seed
    ))]
    pub fn generate(&self, request: &PlanRequest, done: &BTreeSet<String>) -> PlannerResult<StudyPlan> {
        info!("开始生成学习计划");

        // ==========================================
        // 步骤1: 容量日历
        // ==========================================
        let calendar = self.calendar_builder.build(
            request.start_date,
            request.end_date,
            self.config.base_capacity_minutes,
            self.config.weekend_multiplier,
            &self.config.off_weekdays,
            self.config.rounding_step_minutes,
        )?;
        let capacity = total_capacity(&calendar);

        // ==========================================
        // 步骤2: 输入校验 + 目标解析
        // ==========================================
        let subjects = validate_subjects(request.subjects.clone())?;
        let resolved = self.resolver.resolve(subjects, capacity, done);
        let mode = self.config.scheduling_mode.resolve_for(&resolved);

        if resolved.is_empty() {
            info!("无可排科目，返回空计划");
            return Ok(StudyPlan {
                status: PlanStatus::NothingToSchedule,
                mode,
                seed: self.config.seed,
                calendar,
                resolved_subjects: Vec::new(),
                entries: Vec::new(),
                unscheduled: Vec::new(),
                topped_up_minutes: 0,
                warnings: Vec::new(),
            });
        }

        // ==========================================
        // 步骤3: 贪心分配
        // ==========================================
        debug!(mode = %mode, "执行贪心分配");
        let mut result = match mode {
            SchedulingMode::Sequencing => {
                let max_recovery = resolved
                    .iter()
                    .map(Subject::effective_recovery_cost)
                    .max()
                    .unwrap_or(0);
                let mut selector =
                    SequencingSelector::new(self.config.sequencing.clone(), max_recovery);
                self.distributor.distribute(&calendar, &resolved, &mut selector)
            }
            _ => {
                let mut selector =
                    ProportionalSelector::new(ChaCha8Rng::seed_from_u64(self.config.seed));
                self.distributor.distribute(&calendar, &resolved, &mut selector)
            }
        };

        // ==========================================
        // 步骤4: 缺口补足（仅按比例模式）
        // ==========================================
        let topped_up_minutes =
            if mode == SchedulingMode::Proportional && self.config.reconcile_shortfall {
                self.reconciler
                    .reconcile(&calendar, &mut result.entries, &mut result.remaining)
            } else {
                0
            };

        let plan = StudyPlan {
            status: PlanStatus::Scheduled,
            mode,
            seed: self.config.seed,
            unscheduled: result.remaining.unscheduled(),
            calendar,
            resolved_subjects: resolved,
            entries: result.entries,
            topped_up_minutes,
            warnings: result.warnings,
        };

        info!(
            entries = plan.entries.len(),
            planned_minutes = plan.total_minutes(),
            capacity_minutes = capacity,
            topped_up_minutes,
            warnings = plan.warnings.len(),
            "学习计划生成完成"
        );
        Ok(plan)
    }

    /// 重新排程
    ///
    /// 等价于 `generate(&replan_request(..), done)`；调用方若要连续重排，
    /// 应保存 `replan_request` 的结果作为下一次重排的基准请求
    pub fn replan(
        &self,
        request: &PlanRequest,
        previous: &StudyPlan,
        record: &CompletionRecord,
        done: &BTreeSet<String>,
        from_date: NaiveDate,
    ) -> PlannerResult<StudyPlan> {
        let next = self.replan_request(request, previous, record, from_date)?;
        self.generate(&next, done)
    }

    /// 由完成记录推导重排请求
    ///
    /// 规则:
    /// 1) 日期范围改为 max(start, from_date) ~ end
    /// 2) 手动目标扣减已完成分钟数，扣为 0 的科目从请求中移除
    /// 3) 自动目标科目保持不变，按新日历重新分摊
    pub fn replan_request(
        &self,
        request: &PlanRequest,
        previous: &StudyPlan,
        record: &CompletionRecord,
        from_date: NaiveDate,
    ) -> PlannerResult<PlanRequest> {
        let start_date = request.start_date.max(from_date);
        if request.end_date < start_date {
            return Err(PlannerError::InvalidRange {
                start: start_date,
                end: request.end_date,
            });
        }

        let mut exhausted = 0usize;
        let subjects: Vec<Subject> = request
            .subjects
            .iter()
            .filter_map(|subject| {
                if !subject.is_manual() {
                    return Some(subject.clone());
                }
                let completed = self.tracker.completed_minutes_of(
                    &previous.entries,
                    record,
                    subject.name.trim(),
                );
                let left = subject.target().saturating_sub(completed);
                if left == 0 {
                    exhausted += 1;
                    return None;
                }
                let mut reduced = subject.clone();
                reduced.target_minutes = Some(left);
                Some(reduced)
            })
            .collect();

        debug!(
            from = %start_date,
            subjects = subjects.len(),
            exhausted,
            "基于完成记录推导重排请求"
        );

        Ok(PlanRequest {
            start_date,
            end_date: request.end_date,
            subjects,
        })
    }
}
