// ==========================================
// 制造业 ERP - 研发项目领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::ProjectStatus;

/// 研发项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RndProject {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub owner: Option<String>,
    pub created_at: NaiveDateTime,
}
