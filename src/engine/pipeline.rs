// ==========================================
// 制造业 ERP - 研发管线统计引擎
// ==========================================
// 职责: 按状态计数 + 在研/已结/成功率
// 说明: 只统计快照，不校验状态流转
// ==========================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::rnd::RndProject;
use crate::domain::types::ProjectStatus;

/// 管线指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub counts_by_status: BTreeMap<ProjectStatus, usize>, // 全部状态，缺省为 0
    pub total: usize,
    pub live: usize,        // 非终态
    pub closed: usize,      // 终态
    pub success_rate: f64,  // closed / total，total 为 0 时为 0
}

impl PipelineMetrics {
    pub fn count(&self, status: ProjectStatus) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }
}

// ==========================================
// PipelineAggregator - 研发管线统计引擎
// ==========================================
#[derive(Debug, Default)]
pub struct PipelineAggregator {}

impl PipelineAggregator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn aggregate(&self, projects: &[RndProject]) -> PipelineMetrics {
        let mut counts_by_status: BTreeMap<ProjectStatus, usize> =
            ProjectStatus::ALL.into_iter().map(|s| (s, 0)).collect();

        let mut closed = 0;
        for project in projects {
            *counts_by_status.entry(project.status).or_insert(0) += 1;
            if project.status.is_terminal() {
                closed += 1;
            }
        }

        let total = projects.len();
        let success_rate = if total == 0 {
            0.0
        } else {
            closed as f64 / total as f64
        };

        PipelineMetrics {
            counts_by_status,
            total,
            live: total - closed,
            closed,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project(id: &str, status: ProjectStatus) -> RndProject {
        RndProject {
            project_id: id.to_string(),
            name: format!("Project {}", id),
            status,
            owner: None,
            created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_aggregate_counts_and_rates() {
        let aggregator = PipelineAggregator::new();
        let projects = vec![
            project("1", ProjectStatus::IdeaSubmitted),
            project("2", ProjectStatus::Prototype),
            project("3", ProjectStatus::Prototype),
            project("4", ProjectStatus::FinalApproved),
            project("5", ProjectStatus::PoIssued),
        ];

        let metrics = aggregator.aggregate(&projects);

        assert_eq!(metrics.total, 5);
        assert_eq!(metrics.live, 3);
        assert_eq!(metrics.closed, 2);
        assert_eq!(metrics.success_rate, 0.4);
        assert_eq!(metrics.count(ProjectStatus::Prototype), 2);
        assert_eq!(metrics.count(ProjectStatus::RedSeal), 0);
        assert_eq!(metrics.counts_by_status.len(), ProjectStatus::ALL.len());
    }

    #[test]
    fn test_empty_pipeline() {
        let metrics = PipelineAggregator::new().aggregate(&[]);
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert!(metrics.counts_by_status.values().all(|c| *c == 0));
    }
}
