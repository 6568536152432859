// ==========================================
// 制造业 ERP - 基础资料数据仓储（工厂 / 计量单位）
// ==========================================
// 唯一性: (kind, name_key)，name_key 为去空白小写后的名称
// ==========================================

use crate::domain::reference::{normalized_name, ReferenceValue};
use crate::domain::types::ReferenceKind;
use crate::repository::error::{format_datetime, parse_datetime, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct ReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReferenceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 同类型下是否已存在同名（忽略大小写）
    pub fn exists(&self, kind: ReferenceKind, name: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reference_value WHERE kind = ?1 AND name_key = ?2",
            params![kind.as_str(), normalized_name(name)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 插入基础资料
    ///
    /// # 错误
    /// - UniqueConstraintViolation: 同类型重名
    pub fn insert(&self, value: &ReferenceValue) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO reference_value (kind, name, name_key, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                value.kind.as_str(),
                value.name,
                normalized_name(&value.name),
                format_datetime(&value.created_at),
            ],
        )?;
        Ok(())
    }

    /// 按类型列出（按名称排序）
    pub fn list_by_kind(&self, kind: ReferenceKind) -> RepositoryResult<Vec<ReferenceValue>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, created_at FROM reference_value WHERE kind = ?1 ORDER BY name_key",
        )?;
        let rows = stmt
            .query_map(params![kind.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(name, created_raw)| {
                Ok(ReferenceValue {
                    kind,
                    name,
                    created_at: parse_datetime("created_at", &created_raw)?,
                })
            })
            .collect()
    }
}
