// ==========================================
// 制造业 ERP - 应用层
// ==========================================
// 职责: 依赖装配，连接界面外壳与后端
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
