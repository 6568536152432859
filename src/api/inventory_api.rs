// ==========================================
// 制造业 ERP - 库存 API（库存调整表单 / 出入库流水）
// ==========================================
// 职责: 表单解析 → 引擎计算 → 库存与流水同事务落库 → 审计
// 红线: 出库不得超过当前库存；流水只追加
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::form::{optional_text, parse_optional_quantity, required_text, resolve_actor};
use crate::config::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::inventory::{StockItem, StockReference, StockTransaction};
use crate::engine::display_format::{format_datetime, format_quantity};
use crate::engine::stock_adjuster::StockAdjuster;
use crate::repository::{ActionLogRepository, StockRepository, StockStore};

// ==========================================
// 表单 / 视图结构
// ==========================================

/// 库存调整表单（界面原始录入）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockAdjustmentForm {
    pub item_id: String,
    pub add_amount: Option<String>,
    pub remove_amount: Option<String>,
    pub bill_no: Option<String>,
    pub vendor: Option<String>,
    pub remarks: Option<String>,
    pub actor: Option<String>,
}

/// 新建库存物料表单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStockItemForm {
    pub item_code: String,
    pub name: String,
    pub unit: String,
    pub plant: Option<String>,
    pub min_stock: Option<String>,
}

/// 库存列表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItemView {
    pub item: StockItem,
    pub current_stock_display: String,
    pub min_stock_display: String,
    pub below_minimum: bool,
}

/// 流水列表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransactionView {
    pub transaction: StockTransaction,
    pub direction_label: String, // "Stock In" / "Stock Out"
    pub quantity_display: String,
    pub date_display: String,
}

// ==========================================
// InventoryApi - 库存 API
// ==========================================
pub struct InventoryApi {
    stock_repo: Arc<StockRepository>,
    // 调整与流水走存储边界，测试中可注入替身
    stock_store: Arc<dyn StockStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigManager>,
    adjuster: StockAdjuster,
}

impl InventoryApi {
    pub fn new(
        stock_repo: Arc<StockRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            stock_store: stock_repo.clone(),
            stock_repo,
            action_log_repo,
            config,
            adjuster: StockAdjuster::new(),
        }
    }

    /// 替换库存调整与流水查询使用的存储
    pub fn with_stock_store(mut self, stock_store: Arc<dyn StockStore>) -> Self {
        self.stock_store = stock_store;
        self
    }

    fn quantity_decimals(&self) -> ApiResult<usize> {
        self.config
            .get_quantity_decimals()
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))
    }

    // ==========================================
    // 库存调整
    // ==========================================

    /// 提交库存调整表单
    ///
    /// # 返回
    /// - Ok(StockTransaction): 已落库的流水（含调整前后库存）
    /// - Err(ValidationError): 入库/出库同时填写或均未填写、数量非法、库存不足
    /// - Err(NotFound): 物料不存在
    /// - Err(StoreError): 存储拒绝写入（如库存已被并发修改）
    #[instrument(skip(self, form), fields(item_id = %form.item_id))]
    pub fn adjust_stock(&self, form: StockAdjustmentForm) -> ApiResult<StockTransaction> {
        let add_amount = match form.add_amount.as_deref() {
            Some(raw) => parse_optional_quantity("add_amount", raw)?,
            None => None,
        };
        let remove_amount = match form.remove_amount.as_deref() {
            Some(raw) => parse_optional_quantity("remove_amount", raw)?,
            None => None,
        };
        let reference = StockReference {
            bill_no: optional_text(form.bill_no.as_deref()),
            vendor: optional_text(form.vendor.as_deref()),
            remarks: optional_text(form.remarks.as_deref()),
        };
        let actor = resolve_actor(&self.config, form.actor.as_deref())?;

        let item = self.stock_store.get_item(&form.item_id)?;
        let movement =
            self.adjuster
                .apply_adjustment(item.current_stock, add_amount, remove_amount, reference)?;

        let txn = StockTransaction::from_movement(
            Uuid::new_v4().to_string(),
            item.item_id.clone(),
            movement,
            actor.clone(),
            chrono::Local::now().naive_local(),
        );
        self.stock_store.apply_movement(&txn)?;

        info!(
            item_code = %item.item_code,
            direction = txn.direction.as_str(),
            quantity = txn.quantity,
            new_stock = txn.new_stock,
            "库存已调整"
        );

        let log = ActionLog::new(ActionType::StockAdjust, &actor, Some(&item.item_id))
            .with_payload(serde_json::json!({
                "transaction_id": txn.transaction_id,
                "item_code": item.item_code,
                "direction": txn.direction.as_str(),
                "quantity": txn.quantity,
                "previous_stock": txn.previous_stock,
                "new_stock": txn.new_stock,
                "bill_no": txn.reference.bill_no,
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(txn)
    }

    // ==========================================
    // 物料维护
    // ==========================================

    /// 新建库存物料（期初库存为 0，后续通过入库调整）
    pub fn create_item(&self, form: NewStockItemForm) -> ApiResult<StockItem> {
        let item_code = required_text("item_code", &form.item_code)?.to_uppercase();
        let name = required_text("name", &form.name)?;
        let unit = required_text("unit", &form.unit)?;
        let min_stock = match form.min_stock.as_deref() {
            Some(raw) => parse_optional_quantity("min_stock", raw)?.unwrap_or(0.0),
            None => 0.0,
        };

        let item = StockItem {
            item_id: Uuid::new_v4().to_string(),
            item_code,
            name,
            unit,
            plant: optional_text(form.plant.as_deref()),
            current_stock: 0.0,
            min_stock,
            updated_at: chrono::Local::now().naive_local(),
        };
        self.stock_repo.insert_item(&item)?;
        info!(item_code = %item.item_code, "库存物料已创建");
        Ok(item)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 库存列表（含低于安全库存标记）
    pub fn list_items(&self) -> ApiResult<Vec<StockItemView>> {
        let decimals = self.quantity_decimals()?;
        let items = self.stock_repo.list_items()?;
        Ok(items
            .into_iter()
            .map(|item| StockItemView {
                current_stock_display: format_quantity(item.current_stock, decimals),
                min_stock_display: format_quantity(item.min_stock, decimals),
                below_minimum: self.adjuster.is_below_minimum(&item),
                item,
            })
            .collect())
    }

    /// 低于安全库存的物料
    pub fn list_low_stock(&self) -> ApiResult<Vec<StockItem>> {
        Ok(self
            .stock_repo
            .list_items()?
            .into_iter()
            .filter(|item| self.adjuster.is_below_minimum(item))
            .collect())
    }

    /// 物料出入库流水（按交易时间升序）
    pub fn list_transactions(&self, item_id: &str) -> ApiResult<Vec<StockTransactionView>> {
        // 物料不存在时返回 NotFound，而不是空列表
        self.stock_store.get_item(item_id)?;

        let decimals = self.quantity_decimals()?;
        let transactions = self.stock_store.get_transactions_for_item(item_id)?;
        Ok(transactions
            .into_iter()
            .map(|txn| StockTransactionView {
                direction_label: txn.direction.to_string(),
                quantity_display: format_quantity(txn.quantity, decimals),
                date_display: format_datetime(txn.transaction_date),
                transaction: txn,
            })
            .collect())
    }
}
