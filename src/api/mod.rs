// ==========================================
// 制造业 ERP - API 层
// ==========================================
// 职责: 提供业务 API 接口，供界面外壳调用
// 约束: 字符串录入在此层解析为强类型，再交给引擎
// ==========================================

pub mod error;
pub mod form;
pub mod inventory_api;
pub mod pipeline_api;
pub mod reference_api;
pub mod stage_progress_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use inventory_api::{
    InventoryApi, NewStockItemForm, StockAdjustmentForm, StockItemView, StockTransactionView,
};
pub use pipeline_api::{PipelineApi, PipelineDashboard};
pub use reference_api::ReferenceApi;
pub use stage_progress_api::{ProgressDisplayRow, StageProgressApi};
