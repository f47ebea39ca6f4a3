// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use study_planner::config::{ConfigManager, PlannerConfig};
use study_planner::domain::types::Minutes;
use study_planner::engine::PlanRequest;
use study_planner::Subject;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// Subject 构建器
// ==========================================

pub struct SubjectBuilder {
    name: String,
    target_minutes: Option<Minutes>,
    priority: u8,
    min_session: Minutes,
    difficulty: Option<u8>,
    recovery_cost: Option<Minutes>,
}

impl SubjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            target_minutes: None,
            priority: 3,
            min_session: 30,
            difficulty: None,
            recovery_cost: None,
        }
    }

    pub fn target(mut self, minutes: Minutes) -> Self {
        self.target_minutes = Some(minutes);
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn min_session(mut self, minutes: Minutes) -> Self {
        self.min_session = minutes;
        self
    }

    pub fn difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn recovery_cost(mut self, minutes: Minutes) -> Self {
        self.recovery_cost = Some(minutes);
        self
    }

    pub fn build(self) -> Subject {
        let mut subject = Subject::new(
            &self.name,
            self.target_minutes,
            self.priority,
            self.min_session,
        );
        subject.difficulty = self.difficulty;
        subject.recovery_cost = self.recovery_cost;
        subject
    }
}

// ==========================================
// PlanRequest 构建器
// ==========================================

pub struct RequestBuilder {
    start_date: NaiveDate,
    end_date: NaiveDate,
    subjects: Vec<Subject>,
}

impl RequestBuilder {
    /// 默认 2026-03-09（周一）~ 2026-03-15（周日）
    pub fn new() -> Self {
        Self {
            start_date: date(2026, 3, 9),
            end_date: date(2026, 3, 15),
            subjects: Vec::new(),
        }
    }

    pub fn range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn build(self) -> PlanRequest {
        PlanRequest {
            start_date: self.start_date,
            end_date: self.end_date,
            subjects: self.subjects,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 三科目混合场景：一个手动目标 + 两个自动目标
pub fn mixed_request() -> PlanRequest {
    RequestBuilder::new()
        .subject(SubjectBuilder::new("Math").target(300).priority(5).min_session(40).build())
        .subject(SubjectBuilder::new("English").priority(4).min_session(30).build())
        .subject(SubjectBuilder::new("History").priority(2).min_session(20).build())
        .build()
}

/// 带认知参数的场景（自动模式下走顺序偏好）
pub fn cognition_request() -> PlanRequest {
    RequestBuilder::new()
        .subject(
            SubjectBuilder::new("Physics")
                .target(240)
                .priority(4)
                .min_session(40)
                .difficulty(5)
                .recovery_cost(20)
                .build(),
        )
        .subject(
            SubjectBuilder::new("Reading")
                .target(180)
                .priority(3)
                .min_session(30)
                .difficulty(1)
                .recovery_cost(5)
                .build(),
        )
        .subject(SubjectBuilder::new("Chemistry").priority(3).min_session(30).difficulty(4).build())
        .build()
}

/// 由键值对构建排程配置
pub fn config_from(pairs: &[(&str, &str)]) -> PlannerConfig {
    ConfigManager::from_pairs(pairs.iter().copied())
        .load_planner_config()
        .unwrap()
}
