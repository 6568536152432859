// ==========================================
// 制造业 ERP - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化 schema（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS production_order (
            order_id TEXT PRIMARY KEY,
            order_no TEXT NOT NULL,
            product_name TEXT NOT NULL,
            stage TEXT NOT NULL,
            due_date TEXT,
            target_quantity REAL NOT NULL CHECK (target_quantity > 0),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS production_order_item (
            order_id TEXT NOT NULL REFERENCES production_order(order_id) ON DELETE CASCADE,
            identifier TEXT NOT NULL,
            seq_no INTEGER NOT NULL,
            name TEXT NOT NULL,
            required_quantity REAL NOT NULL CHECK (required_quantity >= 0),
            completed_quantity REAL NOT NULL CHECK (completed_quantity >= 0),
            pending_quantity REAL NOT NULL DEFAULT 0 CHECK (pending_quantity >= 0),
            unit_of_measure TEXT NOT NULL,
            PRIMARY KEY (order_id, identifier)
        );

        CREATE TABLE IF NOT EXISTS stock_item (
            item_id TEXT PRIMARY KEY,
            item_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            unit TEXT NOT NULL,
            plant TEXT,
            current_stock REAL NOT NULL CHECK (current_stock >= 0),
            min_stock REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS stock_transaction (
            transaction_id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL REFERENCES stock_item(item_id),
            direction TEXT NOT NULL,
            quantity REAL NOT NULL,
            previous_stock REAL NOT NULL,
            new_stock REAL NOT NULL,
            bill_no TEXT,
            vendor TEXT,
            remarks TEXT,
            actor TEXT NOT NULL,
            transaction_date TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_stock_transaction_item_date
            ON stock_transaction(item_id, transaction_date);

        CREATE TABLE IF NOT EXISTS rnd_project (
            project_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            owner TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reference_value (
            kind TEXT NOT NULL,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (kind, name_key)
        );

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            target_id TEXT,
            payload_json TEXT,
            detail TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_action_log_ts ON action_log(action_ts);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}
