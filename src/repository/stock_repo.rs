// ==========================================
// 制造业 ERP - 库存数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: stock_transaction 只追加，不更新不删除
// ==========================================

use crate::domain::inventory::{StockItem, StockReference, StockTransaction};
use crate::domain::types::TransactionDirection;
use crate::repository::error::{format_datetime, parse_datetime, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// StockStore - 库存存储边界
// ==========================================
pub trait StockStore: Send + Sync {
    /// 读取库存物料
    fn get_item(&self, item_id: &str) -> RepositoryResult<StockItem>;

    /// 物料的出入库流水（按交易时间升序，仅供审计展示）
    fn get_transactions_for_item(&self, item_id: &str) -> RepositoryResult<Vec<StockTransaction>>;

    /// 追加一条流水
    fn record_transaction(&self, txn: &StockTransaction) -> RepositoryResult<()>;

    /// 更新库存并追加流水（同一事务）
    ///
    /// # 错误
    /// - RepositoryError::NotFound: 物料不存在
    /// - RepositoryError::WriteRejected: 当前库存已不等于 previous_stock
    fn apply_movement(&self, txn: &StockTransaction) -> RepositoryResult<()>;
}

// ==========================================
// StockRepository - 库存仓储
// ==========================================
pub struct StockRepository {
    conn: Arc<Mutex<Connection>>,
}

const STOCK_ITEM_COLUMNS: &str =
    "item_id, item_code, name, unit, plant, current_stock, min_stock, updated_at";

const STOCK_TXN_COLUMNS: &str = "transaction_id, item_id, direction, quantity, previous_stock, \
     new_stock, bill_no, vendor, remarks, actor, transaction_date";

impl StockRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增库存物料
    pub fn insert_item(&self, item: &StockItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_item_with(&conn, item)?;
        Ok(())
    }

    /// 按物料编码查询
    pub fn find_by_code(&self, item_code: &str) -> RepositoryResult<Option<StockItem>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM stock_item WHERE item_code = ?1", STOCK_ITEM_COLUMNS);
        let raw = conn
            .query_row(&sql, params![item_code], RawStockItem::from_row)
            .optional()?;
        raw.map(RawStockItem::into_item).transpose()
    }

    /// 全部库存物料（按编码排序）
    pub fn list_items(&self) -> RepositoryResult<Vec<StockItem>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM stock_item ORDER BY item_code", STOCK_ITEM_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
            .query_map([], RawStockItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawStockItem::into_item).collect()
    }

    /// 按物料编码批量插入或更新（导入用，单事务）
    ///
    /// 已存在的编码保留原 item_id，只更新主数据与库存
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    pub fn upsert_batch_by_code(&self, items: &[StockItem]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for item in items {
            count += tx.execute(
                r#"
                INSERT INTO stock_item (
                    item_id, item_code, name, unit, plant, current_stock, min_stock, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(item_code) DO UPDATE SET
                    name = excluded.name,
                    unit = excluded.unit,
                    plant = excluded.plant,
                    current_stock = excluded.current_stock,
                    min_stock = excluded.min_stock,
                    updated_at = excluded.updated_at
                "#,
                params![
                    item.item_id,
                    item.item_code,
                    item.name,
                    item.unit,
                    item.plant,
                    item.current_stock,
                    item.min_stock,
                    format_datetime(&item.updated_at),
                ],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

impl StockStore for StockRepository {
    fn get_item(&self, item_id: &str) -> RepositoryResult<StockItem> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM stock_item WHERE item_id = ?1", STOCK_ITEM_COLUMNS);
        let raw = conn
            .query_row(&sql, params![item_id], RawStockItem::from_row)
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "StockItem".to_string(),
                id: item_id.to_string(),
            })?;
        raw.into_item()
    }

    fn get_transactions_for_item(&self, item_id: &str) -> RepositoryResult<Vec<StockTransaction>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM stock_transaction WHERE item_id = ?1 ORDER BY transaction_date, rowid",
            STOCK_TXN_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
            .query_map(params![item_id], RawStockTransaction::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawStockTransaction::into_transaction).collect()
    }

    fn record_transaction(&self, txn: &StockTransaction) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_transaction_with(&conn, txn)?;
        Ok(())
    }

    fn apply_movement(&self, txn: &StockTransaction) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        // 仅当库存仍为计算时读到的值才写入
        let affected = tx.execute(
            r#"
            UPDATE stock_item SET current_stock = ?1, updated_at = ?2
            WHERE item_id = ?3 AND current_stock = ?4
            "#,
            params![
                txn.new_stock,
                format_datetime(&txn.transaction_date),
                txn.item_id,
                txn.previous_stock,
            ],
        )?;
        if affected == 0 {
            let current: Option<f64> = tx
                .query_row(
                    "SELECT current_stock FROM stock_item WHERE item_id = ?1",
                    params![txn.item_id],
                    |row| row.get(0),
                )
                .optional()?;
            return Err(match current {
                None => RepositoryError::NotFound {
                    entity: "StockItem".to_string(),
                    id: txn.item_id.clone(),
                },
                Some(current) => RepositoryError::WriteRejected {
                    entity: "StockItem".to_string(),
                    id: txn.item_id.clone(),
                    reason: format!(
                        "库存已变更: 期望 {}, 实际 {}",
                        txn.previous_stock, current
                    ),
                },
            });
        }
        insert_transaction_with(&tx, txn)?;

        tx.commit()?;
        debug!(item_id = %txn.item_id, new_stock = txn.new_stock, "库存变动已落库");
        Ok(())
    }
}

// ==========================================
// 行映射
// ==========================================

fn insert_item_with(conn: &Connection, item: &StockItem) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT INTO stock_item (
            item_id, item_code, name, unit, plant, current_stock, min_stock, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            item.item_id,
            item.item_code,
            item.name,
            item.unit,
            item.plant,
            item.current_stock,
            item.min_stock,
            format_datetime(&item.updated_at),
        ],
    )
}

fn insert_transaction_with(conn: &Connection, txn: &StockTransaction) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT INTO stock_transaction (
            transaction_id, item_id, direction, quantity, previous_stock,
            new_stock, bill_no, vendor, remarks, actor, transaction_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            txn.transaction_id,
            txn.item_id,
            txn.direction.as_str(),
            txn.quantity,
            txn.previous_stock,
            txn.new_stock,
            txn.reference.bill_no,
            txn.reference.vendor,
            txn.reference.remarks,
            txn.actor,
            format_datetime(&txn.transaction_date),
        ],
    )
}

/// stock_item 原始行（时间字段待解析）
struct RawStockItem {
    item_id: String,
    item_code: String,
    name: String,
    unit: String,
    plant: Option<String>,
    current_stock: f64,
    min_stock: f64,
    updated_at: String,
}

impl RawStockItem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            item_id: row.get(0)?,
            item_code: row.get(1)?,
            name: row.get(2)?,
            unit: row.get(3)?,
            plant: row.get(4)?,
            current_stock: row.get(5)?,
            min_stock: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_item(self) -> RepositoryResult<StockItem> {
        Ok(StockItem {
            updated_at: parse_datetime("updated_at", &self.updated_at)?,
            item_id: self.item_id,
            item_code: self.item_code,
            name: self.name,
            unit: self.unit,
            plant: self.plant,
            current_stock: self.current_stock,
            min_stock: self.min_stock,
        })
    }
}

/// stock_transaction 原始行
struct RawStockTransaction {
    transaction_id: String,
    item_id: String,
    direction: String,
    quantity: f64,
    previous_stock: f64,
    new_stock: f64,
    bill_no: Option<String>,
    vendor: Option<String>,
    remarks: Option<String>,
    actor: String,
    transaction_date: String,
}

impl RawStockTransaction {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            transaction_id: row.get(0)?,
            item_id: row.get(1)?,
            direction: row.get(2)?,
            quantity: row.get(3)?,
            previous_stock: row.get(4)?,
            new_stock: row.get(5)?,
            bill_no: row.get(6)?,
            vendor: row.get(7)?,
            remarks: row.get(8)?,
            actor: row.get(9)?,
            transaction_date: row.get(10)?,
        })
    }

    fn into_transaction(self) -> RepositoryResult<StockTransaction> {
        let direction = TransactionDirection::parse(&self.direction).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "direction".to_string(),
                message: format!("未知流水方向: {}", self.direction),
            }
        })?;

        Ok(StockTransaction {
            transaction_date: parse_datetime("transaction_date", &self.transaction_date)?,
            transaction_id: self.transaction_id,
            item_id: self.item_id,
            direction,
            quantity: self.quantity,
            previous_stock: self.previous_stock,
            new_stock: self.new_stock,
            reference: StockReference {
                bill_no: self.bill_no,
                vendor: self.vendor,
                remarks: self.remarks,
            },
            actor: self.actor,
        })
    }
}
