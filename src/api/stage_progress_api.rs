// ==========================================
// 制造业 ERP - 工序进度 API（下料进度弹窗）
// ==========================================
// 职责: 读取订单 → 解析今日数量 → 引擎计算 → 原子写回 → 审计
// 红线: 提交要么全部物料生效，要么全部不生效
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::form::{parse_optional_quantity, resolve_actor};
use crate::config::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::production::ProductionOrder;
use crate::engine::display_format::{format_percent, format_quantity};
use crate::engine::stage_progress::{CommitOutcome, ProgressReport, StageProgressCalculator};
use crate::engine::EngineError;
use crate::repository::{ActionLogRepository, ProductionOrderStore};

/// 进度弹窗中的一行（已按配置格式化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDisplayRow {
    pub identifier: String,
    pub name: String,
    pub required: String,
    pub running_total: String,
    pub remaining: String,
    pub completion: String,
    pub is_bottleneck: bool,
}

// ==========================================
// StageProgressApi - 工序进度 API
// ==========================================
pub struct StageProgressApi {
    order_store: Arc<dyn ProductionOrderStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigManager>,
    calculator: StageProgressCalculator,
}

impl StageProgressApi {
    pub fn new(
        order_store: Arc<dyn ProductionOrderStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            order_store,
            action_log_repo,
            config,
            calculator: StageProgressCalculator::new(),
        }
    }

    /// 读取订单快照并校验
    fn load_order(&self, order_id: &str) -> ApiResult<ProductionOrder> {
        let order = self.order_store.get_order(order_id)?;
        self.calculator.validate_order(&order)?;
        Ok(order)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 打开弹窗：订单当前进度
    pub fn load_progress(&self, order_id: &str) -> ApiResult<ProgressReport> {
        let order = self.load_order(order_id)?;
        Ok(self.calculator.summarize(&order)?)
    }

    /// 录入中预览：把今日数量叠加到快照上重新计算（不落库）
    ///
    /// # 参数
    /// - pending_inputs: 物料标识 → 录入框原始文本；空白视为 0
    pub fn preview_progress(
        &self,
        order_id: &str,
        pending_inputs: &HashMap<String, String>,
    ) -> ApiResult<ProgressReport> {
        let mut order = self.load_order(order_id)?;
        let pending_by_item = parse_pending_inputs(pending_inputs)?;

        for (identifier, quantity) in &pending_by_item {
            let item = order
                .items
                .iter_mut()
                .find(|item| &item.identifier == identifier)
                .ok_or_else(|| EngineError::UnknownItem {
                    identifier: identifier.clone(),
                })?;
            item.pending_quantity = *quantity;
        }

        Ok(self.calculator.summarize(&order)?)
    }

    /// 按配置的小数位格式化进度行
    pub fn display_rows(&self, report: &ProgressReport) -> ApiResult<Vec<ProgressDisplayRow>> {
        let quantity_decimals = self
            .config
            .get_quantity_decimals()
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))?;
        let percent_decimals = self
            .config
            .get_percent_decimals()
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))?;

        Ok(report
            .items
            .iter()
            .map(|item| ProgressDisplayRow {
                identifier: item.identifier.clone(),
                name: item.name.clone(),
                required: format_quantity(item.required_quantity, quantity_decimals),
                running_total: format_quantity(item.running_total, quantity_decimals),
                remaining: format_quantity(item.remaining, quantity_decimals),
                completion: format_percent(item.completion_ratio, percent_decimals),
                is_bottleneck: item.is_bottleneck,
            })
            .collect())
    }

    // ==========================================
    // 提交接口
    // ==========================================

    /// 保存今日数量
    ///
    /// # 参数
    /// - order_id: 订单ID
    /// - pending_inputs: 物料标识 → 录入框原始文本
    /// - actor: 操作人（空则取 audit.default_actor）
    ///
    /// # 返回
    /// - Ok(CommitOutcome): 提交后的订单与新的可生产数量
    /// - Err(ValidationError): 数量非法 / 全部为 0，订单不变
    /// - Err(NotFound): 订单或物料不存在
    /// - Err(StoreError): 写入被拒，订单不变
    #[instrument(skip(self, pending_inputs), fields(items = pending_inputs.len()))]
    pub fn commit_progress(
        &self,
        order_id: &str,
        pending_inputs: &HashMap<String, String>,
        actor: Option<&str>,
    ) -> ApiResult<CommitOutcome> {
        let order = self.load_order(order_id)?;
        let pending_by_item = parse_pending_inputs(pending_inputs)?;
        let actor = resolve_actor(&self.config, actor)?;

        let outcome = self.calculator.commit(&order, &pending_by_item)?;
        self.order_store.commit_order(order_id, &outcome.order)?;

        info!(
            order_id,
            producible_quantity = outcome.producible_quantity,
            "工序进度已提交"
        );

        let committed: HashMap<&str, f64> = order
            .items
            .iter()
            .map(|item| {
                let pending = pending_by_item
                    .get(&item.identifier)
                    .copied()
                    .unwrap_or(item.pending_quantity);
                (item.identifier.as_str(), pending)
            })
            .filter(|(_, pending)| *pending > 0.0)
            .collect();
        let log = ActionLog::new(ActionType::ProgressCommit, &actor, Some(order_id))
            .with_payload(serde_json::json!({
                "order_no": order.order_no,
                "stage": order.stage,
                "committed": committed,
                "producible_before": self.calculator.producible_quantity(&order)?,
                "producible_after": outcome.producible_quantity,
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(outcome)
    }
}

/// 解析今日数量录入；空白录入计为 0
fn parse_pending_inputs(inputs: &HashMap<String, String>) -> ApiResult<HashMap<String, f64>> {
    inputs
        .iter()
        .map(|(identifier, raw)| {
            let quantity = parse_optional_quantity(identifier, raw)?.unwrap_or(0.0);
            Ok((identifier.clone(), quantity))
        })
        .collect()
}
