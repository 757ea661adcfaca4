// ==========================================
// Lot Cost Engine - rusqlite costing repository
// ==========================================
// Rule: parameterized queries only; no business logic
// Storage: decimals as TEXT (exact), dates as YYYY-MM-DD TEXT
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{
    DirectExpense, DirectExpenseCategory, FeedCategory, FeedConsumption, HarvestRecord, Lot,
    LotStatus, MortalityRecord, PenOccupancy, SharedExpenseCategory, SharedMonthlyExpense,
    YearMonth,
};
use crate::repository::costing_read_repo::CostingReadRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

const LOT_COLUMNS: &str = r#"
    lot_id, lot_code, start_date, close_date, status,
    initial_head_count, initial_avg_weight, purchase_cost
"#;

const OCCUPANCY_SELECT: &str = r#"
    SELECT
        pa.assignment_id, pa.lot_id, p.pen_id, p.name, p.area,
        pa.assigned_date, pa.release_date
    FROM pen_assignment pa
    JOIN pen p ON p.pen_id = pa.pen_id
    WHERE pa.lot_id = ?1
"#;

// ==========================================
// SqliteCostingRepository
// ==========================================
pub struct SqliteCostingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCostingRepository {
    /// Open a connection on `db_path` with the shared PRAGMAs
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build on an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl CostingReadRepository for SqliteCostingRepository {
    fn get_lot(&self, lot_id: &str) -> RepositoryResult<Option<Lot>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM lot WHERE lot_id = ?1", LOT_COLUMNS);
        let lot = conn
            .query_row(&sql, params![lot_id], map_lot)
            .optional()?;
        Ok(lot)
    }

    fn get_current_pen_assignments(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} AND pa.release_date IS NULL ORDER BY pa.assignment_id",
            OCCUPANCY_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![lot_id], map_occupancy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_pen_assignment_history(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY pa.assignment_id", OCCUPANCY_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![lot_id], map_occupancy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_lots_overlapping(&self, period: YearMonth) -> RepositoryResult<Vec<Lot>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM lot
            WHERE (close_date IS NULL OR close_date >= ?1)
              AND start_date <= ?2
            ORDER BY start_date, lot_id
            "#,
            LOT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let lots = stmt
            .query_map(params![period.first_day(), period.last_day()], map_lot)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lots)
    }

    fn get_feed_consumption(&self, lot_id: &str) -> RepositoryResult<Vec<FeedConsumption>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                fc.consumption_id, fc.lot_id, fc.date, fc.units_consumed,
                ft.feed_type_id, ft.name, ft.category, ft.cost_per_unit, ft.weight_per_unit
            FROM feed_consumption fc
            JOIN feed_type ft ON ft.feed_type_id = fc.feed_type_id
            WHERE fc.lot_id = ?1
            ORDER BY fc.date, fc.consumption_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![lot_id], |row| {
                Ok(FeedConsumption {
                    consumption_id: row.get(0)?,
                    lot_id: row.get(1)?,
                    date: row.get(2)?,
                    units_consumed: decimal_col(row, 3)?,
                    feed_type_id: row.get(4)?,
                    feed_name: row.get(5)?,
                    category: enum_col(row, 6, FeedCategory::from_db_str)?,
                    cost_per_unit: decimal_col(row, 7)?,
                    weight_per_unit: decimal_col(row, 8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_direct_expenses(&self, lot_id: &str) -> RepositoryResult<Vec<DirectExpense>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT expense_id, lot_id, date, concept, category, amount
            FROM direct_expense
            WHERE lot_id = ?1
            ORDER BY date, expense_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![lot_id], |row| {
                Ok(DirectExpense {
                    expense_id: row.get(0)?,
                    lot_id: row.get(1)?,
                    date: row.get(2)?,
                    concept: row.get(3)?,
                    category: enum_col(row, 4, DirectExpenseCategory::from_db_str)?,
                    amount: decimal_col(row, 5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_shared_monthly_expenses(
        &self,
        period: YearMonth,
    ) -> RepositoryResult<Vec<SharedMonthlyExpense>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT expense_id, year, month, concept, category, amount
            FROM shared_monthly_expense
            WHERE year = ?1 AND month = ?2
            ORDER BY expense_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![period.year(), period.month()], |row| {
                Ok(SharedMonthlyExpense {
                    expense_id: row.get(0)?,
                    year: row.get(1)?,
                    month: row.get(2)?,
                    concept: row.get(3)?,
                    category: enum_col(row, 4, SharedExpenseCategory::from_db_str)?,
                    amount: decimal_col(row, 5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_mortality(&self, lot_id: &str) -> RepositoryResult<Vec<MortalityRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, lot_id, date, count
            FROM mortality_record
            WHERE lot_id = ?1
            ORDER BY date, record_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![lot_id], |row| {
                Ok(MortalityRecord {
                    record_id: row.get(0)?,
                    lot_id: row.get(1)?,
                    date: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_harvests(&self, lot_id: &str) -> RepositoryResult<Vec<HarvestRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, lot_id, date, animal_count, total_weight, is_final
            FROM harvest_record
            WHERE lot_id = ?1
            ORDER BY date, record_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![lot_id], |row| {
                Ok(HarvestRecord {
                    record_id: row.get(0)?,
                    lot_id: row.get(1)?,
                    date: row.get(2)?,
                    animal_count: row.get(3)?,
                    total_weight: decimal_col(row, 4)?,
                    is_final: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

// ==========================================
// Row mapping
// ==========================================

fn map_lot(row: &Row<'_>) -> rusqlite::Result<Lot> {
    Ok(Lot {
        lot_id: row.get(0)?,
        lot_code: row.get(1)?,
        start_date: row.get(2)?,
        close_date: row.get(3)?,
        status: enum_col(row, 4, LotStatus::from_db_str)?,
        initial_head_count: row.get(5)?,
        initial_avg_weight: decimal_col(row, 6)?,
        purchase_cost: decimal_col(row, 7)?,
    })
}

fn map_occupancy(row: &Row<'_>) -> rusqlite::Result<PenOccupancy> {
    Ok(PenOccupancy {
        assignment_id: row.get(0)?,
        lot_id: row.get(1)?,
        pen_id: row.get(2)?,
        pen_name: row.get(3)?,
        area: decimal_col(row, 4)?,
        assigned_date: row.get(5)?,
        release_date: row.get(6)?,
    })
}

/// Exact decimal from a TEXT column (INTEGER and REAL tolerated for hand-edited databases)
fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let conversion = |msg: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
    };
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| conversion(e.to_string()))?;
            Decimal::from_str(text.trim())
                .map_err(|e| conversion(format!("invalid decimal '{}': {}", text, e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::from_f64(f)
            .ok_or_else(|| conversion(format!("non-finite decimal {}", f))),
        ValueRef::Null => Err(conversion("unexpected NULL decimal".to_string())),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Blob,
        )),
    }
}

/// Enumerated TEXT column parsed with the type's `from_db_str`
fn enum_col<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown enum value '{}'", raw).into(),
        )
    })
}
