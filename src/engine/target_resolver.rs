// ==========================================
// 学习计划排程器 - 目标时长解析
// ==========================================
// 职责: 为未设置目标的科目按优先级分摊剩余日历容量
// 输入: 科目列表 + 日历总容量 + 已完成科目集合
// 输出: 目标均 > 0 的科目列表（保持输入顺序）
// ==========================================

use crate::domain::subject::{Subject, LEVEL_MAX, LEVEL_MIN};
use crate::domain::types::{round_to_step, snap_minutes, Minutes};
use crate::engine::error::{PlannerError, PlannerResult};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

// ==========================================
// 输入校验
// ==========================================

/// 校验并规范化科目输入
///
/// 规则:
/// 1) 名称去除首尾空白后非空且唯一
/// 2) 优先级 1-5，难度（如填写）1-5
/// 3) 单次最小时长 > 0
pub fn validate_subjects(subjects: Vec<Subject>) -> PlannerResult<Vec<Subject>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(subjects.len());

    for mut subject in subjects {
        subject.name = subject.name.trim().to_string();
        if subject.name.is_empty() {
            return Err(invalid_subject(&subject.name, "科目名不能为空"));
        }
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&subject.priority) {
            return Err(invalid_subject(
                &subject.name,
                &format!("优先级必须位于 1-5, 实际 {}", subject.priority),
            ));
        }
        if subject.min_session == 0 {
            return Err(invalid_subject(&subject.name, "单次最小时长必须 > 0"));
        }
        if let Some(difficulty) = subject.difficulty {
            if !(LEVEL_MIN..=LEVEL_MAX).contains(&difficulty) {
                return Err(invalid_subject(
                    &subject.name,
                    &format!("难度必须位于 1-5, 实际 {}", difficulty),
                ));
            }
        }
        if !seen.insert(subject.name.clone()) {
            return Err(PlannerError::DuplicateSubject(subject.name));
        }
        out.push(subject);
    }

    Ok(out)
}

fn invalid_subject(name: &str, reason: &str) -> PlannerError {
    PlannerError::InvalidSubject {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

// ==========================================
// TargetResolver - 目标时长解析器
// ==========================================
pub struct TargetResolver {
    step: Minutes,
}

impl TargetResolver {
    pub fn new(step: Minutes) -> Self {
        Self { step: step.max(1) }
    }

    /// 解析目标时长
    ///
    /// 规则:
    /// 1) 已完成科目直接排除
    /// 2) 显式目标 > 0 的科目为手动科目，目标仅按步长对齐
    /// 3) 自动科目分摊 max(总容量 - 手动目标之和, 0)，权重为 priority / Σpriority
    /// 4) 自动科目优先级之和为 0 时平均分摊
    /// 5) 解析后目标为 0 的科目剔除
    ///
    /// 返回空列表表示“无可排科目”，由调用方转为空计划结果
    #[instrument(skip(self, subjects, done), fields(subjects = subjects.len(), done = done.len()))]
    pub fn resolve(
        &self,
        subjects: Vec<Subject>,
        total_capacity: u64,
        done: &BTreeSet<String>,
    ) -> Vec<Subject> {
        let active: Vec<Subject> = subjects
            .into_iter()
            .filter(|s| !done.contains(&s.name))
            .collect();

        let manual_sum: u64 = active
            .iter()
            .filter(|s| s.is_manual())
            .map(|s| s.target() as u64)
            .sum();
        let auto_pool = total_capacity.saturating_sub(manual_sum) as f64;

        let auto_count = active.iter().filter(|s| !s.is_manual()).count();
        let auto_priority_sum: u64 = active
            .iter()
            .filter(|s| !s.is_manual())
            .map(|s| s.priority as u64)
            .sum();

        let resolved: Vec<Subject> = active
            .into_iter()
            .map(|mut subject| {
                let target = if subject.is_manual() {
                    snap_minutes(subject.target(), self.step)
                } else if auto_priority_sum > 0 {
                    round_to_step(
                        auto_pool * subject.priority as f64 / auto_priority_sum as f64,
                        self.step,
                    )
                } else {
                    round_to_step(auto_pool / auto_count as f64, self.step)
                };
                subject.target_minutes = Some(target);
                subject
            })
            .filter(|s| s.target() > 0)
            .collect();

        debug!(
            manual_minutes = manual_sum,
            auto_pool_minutes = auto_pool,
            resolved = resolved.len(),
            "目标时长解析完成"
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> BTreeSet<String> {
        BTreeSet::new()
    }

    #[test]
    fn test_manual_targets_pass_through() {
        let resolver = TargetResolver::new(10);
        let subjects = vec![
            Subject::new("Math", Some(200), 3, 30),
            Subject::new("English", Some(100), 1, 30),
        ];
        let resolved = resolver.resolve(subjects, 360, &none());
        assert_eq!(resolved[0].target(), 200);
        assert_eq!(resolved[1].target(), 100);
    }

    #[test]
    fn test_auto_targets_follow_priority() {
        let resolver = TargetResolver::new(10);
        let subjects = vec![
            Subject::new("Math", Some(120), 3, 30),
            Subject::new("English", None, 3, 30),
            Subject::new("Art", None, 1, 30),
        ];
        // 剩余 480 - 120 = 360，按 3:1 分摊
        let resolved = resolver.resolve(subjects, 480, &none());
        assert_eq!(resolved[1].target(), 270);
        assert_eq!(resolved[2].target(), 90);
    }

    #[test]
    fn test_zero_priority_sum_splits_evenly() {
        let resolver = TargetResolver::new(10);
        let subjects = vec![
            Subject::new("A", None, 0, 30),
            Subject::new("B", None, 0, 30),
        ];
        let resolved = resolver.resolve(subjects, 200, &none());
        assert_eq!(resolved[0].target(), 100);
        assert_eq!(resolved[1].target(), 100);
    }

    #[test]
    fn test_auto_dropped_when_manual_exhausts_capacity() {
        let resolver = TargetResolver::new(10);
        let subjects = vec![
            Subject::new("Math", Some(500), 3, 30),
            Subject::new("English", None, 5, 30),
        ];
        let resolved = resolver.resolve(subjects, 300, &none());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Math");
    }

    #[test]
    fn test_done_subjects_are_excluded() {
        let resolver = TargetResolver::new(10);
        let done: BTreeSet<String> = ["Math".to_string()].into_iter().collect();
        let subjects = vec![
            Subject::new("Math", None, 3, 30),
            Subject::new("English", None, 3, 30),
        ];
        let resolved = resolver.resolve(subjects, 300, &done);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].target(), 300);
    }

    #[test]
    fn test_empty_input_resolves_to_nothing() {
        let resolver = TargetResolver::new(10);
        assert!(resolver.resolve(Vec::new(), 300, &none()).is_empty());
    }

    #[test]
    fn test_validate_subjects_rules() {
        let ok = validate_subjects(vec![Subject::new("  Math ", None, 3, 30)]).unwrap();
        assert_eq!(ok[0].name, "Math");

        assert!(matches!(
            validate_subjects(vec![Subject::new("   ", None, 3, 30)]),
            Err(PlannerError::InvalidSubject { .. })
        ));
        assert!(matches!(
            validate_subjects(vec![Subject::new("Math", None, 6, 30)]),
            Err(PlannerError::InvalidSubject { .. })
        ));
        assert!(matches!(
            validate_subjects(vec![Subject::new("Math", None, 3, 0)]),
            Err(PlannerError::InvalidSubject { .. })
        ));
        assert!(matches!(
            validate_subjects(vec![Subject::new("Math", None, 3, 30).with_cognition(0, 5)]),
            Err(PlannerError::InvalidSubject { .. })
        ));
        assert!(matches!(
            validate_subjects(vec![
                Subject::new("Math", None, 3, 30),
                Subject::new("Math ", None, 2, 30),
            ]),
            Err(PlannerError::DuplicateSubject(ref name)) if name == "Math"
        ));
    }
}
