// ==========================================
// 制造业 ERP - 生产订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 进度提交在单个事务内完成，全部物料更新或全部不更新
// ==========================================

use crate::domain::production::{ProductionOrder, TrackedItem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

// ==========================================
// ProductionOrderStore - 订单存储边界
// ==========================================
// 实现者: ProductionOrderRepository（SQLite）；测试中可注入替身
pub trait ProductionOrderStore: Send + Sync {
    /// 按订单ID读取订单快照
    ///
    /// # 错误
    /// - RepositoryError::NotFound: 订单不存在
    fn get_order(&self, order_id: &str) -> RepositoryResult<ProductionOrder>;

    /// 写回提交后的订单（全部物料同时生效）
    ///
    /// # 错误
    /// - RepositoryError::WriteRejected: 订单或物料行不存在，整体回滚
    fn commit_order(&self, order_id: &str, updated: &ProductionOrder) -> RepositoryResult<()>;
}

// ==========================================
// ProductionOrderRepository - 生产订单仓储
// ==========================================
pub struct ProductionOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionOrderRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建订单（含物料明细）
    pub fn insert_order(&self, order: &ProductionOrder) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO production_order (
                order_id, order_no, product_name, stage, due_date, target_quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                order.order_id,
                order.order_no,
                order.product_name,
                order.stage,
                order.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                order.target_quantity,
            ],
        )?;

        for (seq_no, item) in order.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO production_order_item (
                    order_id, identifier, seq_no, name, required_quantity,
                    completed_quantity, pending_quantity, unit_of_measure
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    order.order_id,
                    item.identifier,
                    seq_no as i64,
                    item.name,
                    item.required_quantity,
                    item.completed_quantity,
                    item.pending_quantity,
                    item.unit_of_measure,
                ],
            )?;
        }

        tx.commit()?;
        info!(order_id = %order.order_id, items = order.items.len(), "生产订单已创建");
        Ok(())
    }

    /// 列出全部订单ID（按订单号排序）
    pub fn list_order_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT order_id FROM production_order ORDER BY order_no")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(ids)
    }
}

impl ProductionOrderStore for ProductionOrderRepository {
    fn get_order(&self, order_id: &str) -> RepositoryResult<ProductionOrder> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT order_no, product_name, stage, due_date, target_quantity
                FROM production_order
                WHERE order_id = ?1
                "#,
                params![order_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "ProductionOrder".to_string(),
                id: order_id.to_string(),
            })?;

        let (order_no, product_name, stage, due_date_raw, target_quantity) = header;
        let due_date = match due_date_raw {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "due_date".to_string(),
                    message: format!("{} ({})", e, raw),
                }
            })?),
            None => None,
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT identifier, name, required_quantity, completed_quantity,
                   pending_quantity, unit_of_measure
            FROM production_order_item
            WHERE order_id = ?1
            ORDER BY seq_no
            "#,
        )?;
        let items = stmt
            .query_map(params![order_id], |row| {
                Ok(TrackedItem {
                    identifier: row.get(0)?,
                    name: row.get(1)?,
                    required_quantity: row.get(2)?,
                    completed_quantity: row.get(3)?,
                    pending_quantity: row.get(4)?,
                    unit_of_measure: row.get(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<TrackedItem>>>()?;

        Ok(ProductionOrder {
            order_id: order_id.to_string(),
            order_no,
            product_name,
            stage,
            due_date,
            target_quantity,
            items,
        })
    }

    fn commit_order(&self, order_id: &str, updated: &ProductionOrder) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let touched = tx.execute(
            "UPDATE production_order SET updated_at = datetime('now') WHERE order_id = ?1",
            params![order_id],
        )?;
        if touched == 0 {
            return Err(RepositoryError::WriteRejected {
                entity: "ProductionOrder".to_string(),
                id: order_id.to_string(),
                reason: "订单不存在".to_string(),
            });
        }

        for item in &updated.items {
            let affected = tx.execute(
                r#"
                UPDATE production_order_item
                SET completed_quantity = ?1, pending_quantity = ?2
                WHERE order_id = ?3 AND identifier = ?4
                "#,
                params![
                    item.completed_quantity,
                    item.pending_quantity,
                    order_id,
                    item.identifier,
                ],
            )?;
            // 未提交的事务在 drop 时回滚
            if affected != 1 {
                return Err(RepositoryError::WriteRejected {
                    entity: "TrackedItem".to_string(),
                    id: format!("{}/{}", order_id, item.identifier),
                    reason: "物料不属于该订单".to_string(),
                });
            }
        }

        tx.commit()?;
        debug!(order_id, items = updated.items.len(), "订单进度已写回");
        Ok(())
    }
}
