// ==========================================
// 制造业 ERP - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 展示配置 =====

    /// 数量小数位（默认 2，最大 6）
    pub fn get_quantity_decimals(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::QUANTITY_DECIMALS, "2")?;
        Ok(value.trim().parse::<usize>().unwrap_or(2).min(6))
    }

    /// 百分比小数位（默认 1，最大 4）
    pub fn get_percent_decimals(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::PERCENT_DECIMALS, "1")?;
        Ok(value.trim().parse::<usize>().unwrap_or(1).min(4))
    }

    // ===== 审计配置 =====

    /// 未指定操作人时使用的默认操作人
    pub fn get_default_actor(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_ACTOR, "system")?;
        let trimmed = value.trim();
        Ok(if trimmed.is_empty() { "system".to_string() } else { trimmed.to_string() })
    }

    // ===== 界面配置 =====

    /// 界面语言（zh-CN / en）
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, "zh-CN")?;
        Ok(match value.trim() {
            "en" => "en".to_string(),
            _ => "zh-CN".to_string(),
        })
    }
}

// ==========================================
// ImportConfigReader 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_default_unit(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::IMPORT_DEFAULT_UNIT, "pcs")?;
        Ok(value.trim().to_string())
    }

    async fn get_default_plant(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::IMPORT_DEFAULT_PLANT)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 展示
    pub const QUANTITY_DECIMALS: &str = "display.quantity_decimals";
    pub const PERCENT_DECIMALS: &str = "display.percent_decimals";

    // 审计
    pub const DEFAULT_ACTOR: &str = "audit.default_actor";

    // 界面
    pub const LOCALE: &str = "ui.locale";

    // 库存导入
    pub const IMPORT_DEFAULT_UNIT: &str = "import.default_unit";
    pub const IMPORT_DEFAULT_PLANT: &str = "import.default_plant";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let manager = create_manager();
        assert_eq!(manager.get_quantity_decimals().unwrap(), 2);
        assert_eq!(manager.get_percent_decimals().unwrap(), 1);
        assert_eq!(manager.get_default_actor().unwrap(), "system");
        assert_eq!(manager.get_locale().unwrap(), "zh-CN");
    }

    #[test]
    fn test_overrides_and_snapshot() {
        let manager = create_manager();
        manager.set_global_config_value(config_keys::QUANTITY_DECIMALS, "3").unwrap();
        manager.set_global_config_value(config_keys::LOCALE, "en").unwrap();
        manager.set_global_config_value(config_keys::QUANTITY_DECIMALS, "0").unwrap();

        assert_eq!(manager.get_quantity_decimals().unwrap(), 0);
        assert_eq!(manager.get_locale().unwrap(), "en");

        let snapshot: HashMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.get("ui.locale").map(String::as_str), Some("en"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_invalid_decimals_fall_back() {
        let manager = create_manager();
        manager.set_global_config_value(config_keys::QUANTITY_DECIMALS, "abc").unwrap();
        assert_eq!(manager.get_quantity_decimals().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_import_defaults() {
        let manager = create_manager();
        assert_eq!(manager.get_default_unit().await.unwrap(), "pcs");
        assert_eq!(manager.get_default_plant().await.unwrap(), None);

        manager.set_global_config_value(config_keys::IMPORT_DEFAULT_PLANT, " Plant-2 ").unwrap();
        assert_eq!(manager.get_default_plant().await.unwrap().as_deref(), Some("Plant-2"));
    }
}
