// ==========================================
// 制造业 ERP - 基础资料 API（工厂 / 计量单位）
// ==========================================
// 规则: 名称去空白后不能为空；同类型下重名（忽略大小写）拒绝
// ==========================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::form::{required_text, resolve_actor};
use crate::config::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::reference::ReferenceValue;
use crate::domain::types::ReferenceKind;
use crate::engine::error::ValidationReason;
use crate::repository::{ActionLogRepository, ReferenceRepository, RepositoryError};

pub struct ReferenceApi {
    reference_repo: Arc<ReferenceRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigManager>,
}

impl ReferenceApi {
    pub fn new(
        reference_repo: Arc<ReferenceRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            reference_repo,
            action_log_repo,
            config,
        }
    }

    pub fn add_plant(&self, name: &str, actor: Option<&str>) -> ApiResult<ReferenceValue> {
        self.add(ReferenceKind::Plant, name, actor)
    }

    pub fn add_unit(&self, name: &str, actor: Option<&str>) -> ApiResult<ReferenceValue> {
        self.add(ReferenceKind::Unit, name, actor)
    }

    pub fn list_plants(&self) -> ApiResult<Vec<ReferenceValue>> {
        Ok(self.reference_repo.list_by_kind(ReferenceKind::Plant)?)
    }

    pub fn list_units(&self) -> ApiResult<Vec<ReferenceValue>> {
        Ok(self.reference_repo.list_by_kind(ReferenceKind::Unit)?)
    }

    fn add(&self, kind: ReferenceKind, name: &str, actor: Option<&str>) -> ApiResult<ReferenceValue> {
        let name = required_text("name", name)?;
        let actor = resolve_actor(&self.config, actor)?;

        if self.reference_repo.exists(kind, &name)? {
            return Err(ValidationReason::DuplicateName { name }.into());
        }

        let value = ReferenceValue {
            kind,
            name,
            created_at: chrono::Local::now().naive_local(),
        };
        // 检查与插入之间若有并发写入，唯一约束兜底
        match self.reference_repo.insert(&value) {
            Ok(()) => {}
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ValidationReason::DuplicateName { name: value.name }.into());
            }
            Err(e) => return Err(ApiError::from(e)),
        }
        info!(kind = %kind, name = %value.name, "基础资料已新增");

        let log = ActionLog::new(ActionType::ReferenceAdd, &actor, Some(kind.as_str()))
            .with_detail(value.name.clone());
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(value)
    }
}
