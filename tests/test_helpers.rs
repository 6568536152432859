// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库创建、建表、配置写入
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use mfg_erp::db::{init_schema, open_sqlite_connection};
use rusqlite::Connection;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与 AppState 相同的连接方式）
pub fn open_shared_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 写入 global 配置
pub fn insert_test_config(
    conn: &Arc<Mutex<Connection>>,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn Error>> {
    let guard = conn.lock().map_err(|e| e.to_string())?;
    guard.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// 统计某类操作日志条数
pub fn count_action_logs(
    conn: &Arc<Mutex<Connection>>,
    action_type: &str,
) -> Result<i64, Box<dyn Error>> {
    let guard = conn.lock().map_err(|e| e.to_string())?;
    let count = guard.query_row(
        "SELECT COUNT(*) FROM action_log WHERE action_type = ?1",
        [action_type],
        |row| row.get(0),
    )?;
    Ok(count)
}
