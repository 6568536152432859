// ==========================================
// 制造业 ERP - 核心库
// ==========================================
// 范围: 工序进度（下料）、库存调整、研发看板、基础资料
// 技术栈: Rust + SQLite
// 定位: 界面外壳背后的业务核心（不含渲染）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ProjectStatus, ReferenceKind, TransactionDirection};

// 领域实体
pub use domain::{
    ActionLog, ActionType, ProductionOrder, ReferenceValue, RndProject, StockItem,
    StockTransaction, TrackedItem,
};

// 引擎
pub use engine::{PipelineAggregator, StageProgressCalculator, StockAdjuster};

// API
pub use api::{InventoryApi, PipelineApi, ReferenceApi, StageProgressApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制造业ERP";
