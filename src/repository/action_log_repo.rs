// ==========================================
// 制造业 ERP - 操作日志数据仓储
// ==========================================
// 红线: 所有写入必须记录
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::{format_datetime, parse_datetime, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    /// 创建新的操作日志仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入,返回action_id
    /// - `Err(...)`: 数据库错误
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor, target_id, payload_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.action_id,
                log.action_type.as_str(),
                format_datetime(&log.action_ts),
                log.actor,
                log.target_id,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;

        Ok(log.action_id.clone())
    }

    /// 查询作用对象的操作日志（按时间倒序）
    pub fn find_by_target(&self, target_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor, target_id, payload_json, detail
            FROM action_log
            WHERE target_id = ?1
            ORDER BY action_ts DESC, rowid DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![target_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(action_id, type_raw, ts_raw, actor, target_id, payload_raw, detail)| {
                let action_type = ActionType::parse(&type_raw).ok_or_else(|| {
                    RepositoryError::FieldValueError {
                        field: "action_type".to_string(),
                        message: format!("未知操作类型: {}", type_raw),
                    }
                })?;
                let payload_json = payload_raw
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()
                    .map_err(|e| RepositoryError::FieldValueError {
                        field: "payload_json".to_string(),
                        message: e.to_string(),
                    })?;
                Ok(ActionLog {
                    action_id,
                    action_type,
                    action_ts: parse_datetime("action_ts", &ts_raw)?,
                    actor,
                    target_id,
                    payload_json,
                    detail,
                })
            })
            .collect()
    }
}
