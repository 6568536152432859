// ==========================================
// 制造业 ERP - 研发项目数据仓储
// ==========================================

use crate::domain::rnd::RndProject;
use crate::domain::types::ProjectStatus;
use crate::repository::error::{format_datetime, parse_datetime, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct RndProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RndProjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, project: &RndProject) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO rnd_project (project_id, name, status, owner, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                project.project_id,
                project.name,
                project.status.as_str(),
                project.owner,
                format_datetime(&project.created_at),
            ],
        )?;
        Ok(())
    }

    /// 全部项目（按创建时间排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<RndProject>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT project_id, name, status, owner, created_at FROM rnd_project ORDER BY created_at, project_id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(project_id, name, status_raw, owner, created_raw)| {
                let status = ProjectStatus::parse(&status_raw).ok_or_else(|| {
                    RepositoryError::FieldValueError {
                        field: "status".to_string(),
                        message: format!("未知项目状态: {}", status_raw),
                    }
                })?;
                Ok(RndProject {
                    project_id,
                    name,
                    status,
                    owner,
                    created_at: parse_datetime("created_at", &created_raw)?,
                })
            })
            .collect()
    }
}
