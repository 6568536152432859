// ==========================================
// API 集成测试辅助工具
// ==========================================
// 职责: 在临时数据库上装配全部仓储与 API
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use mfg_erp::api::{InventoryApi, PipelineApi, ReferenceApi, StageProgressApi};
use mfg_erp::config::ConfigManager;
use mfg_erp::repository::{
    ActionLogRepository, ProductionOrderRepository, ProductionOrderStore, ReferenceRepository,
    RndProjectRepository, StockRepository, StockStore,
};
use rusqlite::Connection;
use tempfile::NamedTempFile;

use crate::test_helpers::{create_test_db, open_shared_connection};

/// API 测试环境
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,

    pub order_repo: Arc<ProductionOrderRepository>,
    pub stock_repo: Arc<StockRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub config: Arc<ConfigManager>,

    pub stage_progress_api: StageProgressApi,
    pub inventory_api: InventoryApi,
    pub pipeline_api: PipelineApi,
    pub reference_api: ReferenceApi,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = create_test_db()?;
        let conn = open_shared_connection(&db_path)?;

        let order_repo = Arc::new(ProductionOrderRepository::new(conn.clone()));
        let stock_repo = Arc::new(StockRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

        let stage_progress_api =
            StageProgressApi::new(order_repo.clone(), action_log_repo.clone(), config.clone());
        let inventory_api =
            InventoryApi::new(stock_repo.clone(), action_log_repo.clone(), config.clone());
        let pipeline_api = PipelineApi::new(
            Arc::new(RndProjectRepository::new(conn.clone())),
            config.clone(),
        );
        let reference_api = ReferenceApi::new(
            Arc::new(ReferenceRepository::new(conn.clone())),
            action_log_repo.clone(),
            config.clone(),
        );

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            conn,
            order_repo,
            stock_repo,
            action_log_repo,
            config,
            stage_progress_api,
            inventory_api,
            pipeline_api,
            reference_api,
        })
    }

    /// 用指定的订单存储替身装配进度 API（共享本环境的日志与配置）
    pub fn stage_progress_api_with(&self, store: Arc<dyn ProductionOrderStore>) -> StageProgressApi {
        StageProgressApi::new(store, self.action_log_repo.clone(), self.config.clone())
    }

    /// 用指定的库存存储替身装配库存 API
    pub fn inventory_api_with(&self, store: Arc<dyn StockStore>) -> InventoryApi {
        InventoryApi::new(
            self.stock_repo.clone(),
            self.action_log_repo.clone(),
            self.config.clone(),
        )
        .with_stock_store(store)
    }
}
