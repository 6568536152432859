// ==========================================
// 制造业 ERP - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod production_order_repo;
pub mod reference_repo;
pub mod rnd_project_repo;
pub mod stock_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use production_order_repo::{ProductionOrderRepository, ProductionOrderStore};
pub use reference_repo::ReferenceRepository;
pub use rnd_project_repo::RndProjectRepository;
pub use stock_repo::{StockRepository, StockStore};
