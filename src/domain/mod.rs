// ==========================================
// 制造业 ERP - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod inventory;
pub mod production;
pub mod reference;
pub mod rnd;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use inventory::{StockItem, StockMovement, StockReference, StockTransaction};
pub use production::{ProductionOrder, TrackedItem};
pub use reference::ReferenceValue;
pub use rnd::RndProject;
pub use types::{ProjectStatus, ReferenceKind, TransactionDirection};
