// ==========================================
// 制造业 ERP - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 约束: 无模块级全局状态，所有仓储通过注入传递
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{InventoryApi, PipelineApi, ReferenceApi, StageProgressApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{CsvParser, StockImporterImpl};
use crate::repository::{
    ActionLogRepository, ProductionOrderRepository, ReferenceRepository, RndProjectRepository,
    StockRepository,
};

/// 应用状态
///
/// 持有共享连接上的全部仓储与 API 实例
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub stage_progress_api: Arc<StageProgressApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub pipeline_api: Arc<PipelineApi>,
    pub reference_api: Arc<ReferenceApi>,

    /// 库存期初导入
    pub stock_importer: Arc<StockImporterImpl>,

    /// 订单仓储（录入订单、列出订单）
    pub order_repo: Arc<ProductionOrderRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 说明
    /// 1. 打开数据库并应用统一 PRAGMA
    /// 2. 建表（幂等）
    /// 3. 装配 Repository / Config / API / Importer
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repository 层
        // ==========================================
        let order_repo = Arc::new(ProductionOrderRepository::new(conn.clone()));
        let stock_repo = Arc::new(StockRepository::new(conn.clone()));
        let project_repo = Arc::new(RndProjectRepository::new(conn.clone()));
        let reference_repo = Arc::new(ReferenceRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let locale = config_manager
            .get_locale()
            .map_err(|e| format!("读取界面语言失败: {}", e))?;
        crate::i18n::set_locale(&locale);

        // ==========================================
        // API 层
        // ==========================================
        let stage_progress_api = Arc::new(StageProgressApi::new(
            order_repo.clone(),
            action_log_repo.clone(),
            config_manager.clone(),
        ));
        let inventory_api = Arc::new(InventoryApi::new(
            stock_repo.clone(),
            action_log_repo.clone(),
            config_manager.clone(),
        ));
        let pipeline_api = Arc::new(PipelineApi::new(project_repo, config_manager.clone()));
        let reference_api = Arc::new(ReferenceApi::new(
            reference_repo,
            action_log_repo.clone(),
            config_manager.clone(),
        ));

        let import_actor = config_manager
            .get_default_actor()
            .map_err(|e| format!("读取默认操作人失败: {}", e))?;
        let stock_importer = Arc::new(StockImporterImpl::new(
            stock_repo,
            action_log_repo.clone(),
            config_manager.clone(),
            Box::new(CsvParser),
            import_actor,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            stage_progress_api,
            inventory_api,
            pipeline_api,
            reference_api,
            stock_importer,
            order_repo,
            action_log_repo,
            config_manager,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 MFG_ERP_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("MFG_ERP_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./mfg_erp.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("mfg-erp-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("mfg-erp");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("mfg_erp.db");
        }
    }

    path.to_string_lossy().to_string()
}
