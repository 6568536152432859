// ==========================================
// 制造业 ERP - 研发看板 API
// ==========================================
// 职责: 研发项目录入 + 看板指标（按状态计数、进行中、已关闭、成功率）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::form::{optional_text, required_text};
use crate::config::ConfigManager;
use crate::domain::rnd::RndProject;
use crate::domain::types::ProjectStatus;
use crate::engine::display_format::format_percent;
use crate::engine::pipeline::{PipelineAggregator, PipelineMetrics};
use crate::repository::RndProjectRepository;

/// 看板卡片（指标 + 展示文本）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDashboard {
    pub metrics: PipelineMetrics,
    pub success_rate_display: String,
}

pub struct PipelineApi {
    project_repo: Arc<RndProjectRepository>,
    config: Arc<ConfigManager>,
    aggregator: PipelineAggregator,
}

impl PipelineApi {
    pub fn new(project_repo: Arc<RndProjectRepository>, config: Arc<ConfigManager>) -> Self {
        Self {
            project_repo,
            config,
            aggregator: PipelineAggregator::new(),
        }
    }

    /// 录入研发项目
    pub fn add_project(
        &self,
        name: &str,
        status: ProjectStatus,
        owner: Option<&str>,
    ) -> ApiResult<RndProject> {
        let project = RndProject {
            project_id: Uuid::new_v4().to_string(),
            name: required_text("name", name)?,
            status,
            owner: optional_text(owner),
            created_at: chrono::Local::now().naive_local(),
        };
        self.project_repo.insert(&project)?;
        info!(project_id = %project.project_id, status = %status, "研发项目已录入");
        Ok(project)
    }

    /// 当前看板指标（快照，不含状态流转）
    pub fn get_metrics(&self) -> ApiResult<PipelineMetrics> {
        let projects = self.project_repo.list_all()?;
        let metrics = self.aggregator.aggregate(&projects);
        debug!(total = metrics.total, live = metrics.live, closed = metrics.closed, "看板指标已计算");
        Ok(metrics)
    }

    /// 看板卡片
    pub fn get_dashboard(&self) -> ApiResult<PipelineDashboard> {
        let metrics = self.get_metrics()?;
        let decimals = self
            .config
            .get_percent_decimals()
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))?;
        Ok(PipelineDashboard {
            success_rate_display: format_percent(metrics.success_rate, decimals),
            metrics,
        })
    }
}
