// ==========================================
// Test helpers
// ==========================================
// Temp SQLite databases with the real schema, and a builder-style
// seeder writing rows the way production data looks (TEXT decimals)
// ==========================================

#![allow(dead_code)]

use lot_cost_engine::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// Create a temp database with the schema
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

pub fn insert_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

// ==========================================
// LotRow builder
// ==========================================
pub struct LotRow {
    lot_id: String,
    lot_code: String,
    start_date: String,
    close_date: Option<String>,
    head_count: i64,
    avg_weight: String,
    purchase_cost: String,
}

impl LotRow {
    pub fn new(lot_id: &str, start_date: &str) -> Self {
        Self {
            lot_id: lot_id.to_string(),
            lot_code: lot_id.to_string(),
            start_date: start_date.to_string(),
            close_date: None,
            head_count: 100,
            avg_weight: "25".to_string(),
            purchase_cost: "10000000".to_string(),
        }
    }

    pub fn closed(mut self, close_date: &str) -> Self {
        self.close_date = Some(close_date.to_string());
        self
    }

    pub fn head_count(mut self, count: i64) -> Self {
        self.head_count = count;
        self
    }

    pub fn avg_weight(mut self, kg: &str) -> Self {
        self.avg_weight = kg.to_string();
        self
    }

    pub fn purchase_cost(mut self, amount: &str) -> Self {
        self.purchase_cost = amount.to_string();
        self
    }
}

// ==========================================
// Seeder
// ==========================================
pub struct Seeder<'a> {
    conn: &'a Connection,
    seq: u32,
}

type SeedResult<'a> = Result<Seeder<'a>, Box<dyn Error>>;

impl<'a> Seeder<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn, seq: 0 }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{}-{}", prefix, self.seq)
    }

    pub fn lot(self, lot: LotRow) -> SeedResult<'a> {
        self.conn.execute(
            "INSERT INTO lot (lot_id, lot_code, start_date, close_date, status,
                              initial_head_count, initial_avg_weight, purchase_cost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                lot.lot_id,
                lot.lot_code,
                lot.start_date,
                lot.close_date,
                if lot.close_date.is_some() { "CLOSED" } else { "ACTIVE" },
                lot.head_count,
                lot.avg_weight,
                lot.purchase_cost
            ],
        )?;
        Ok(self)
    }

    pub fn pen(self, pen_id: &str, area: &str) -> SeedResult<'a> {
        self.conn.execute(
            "INSERT INTO pen (pen_id, name, area, active) VALUES (?1, ?2, ?3, 1)",
            params![pen_id, format!("Pen {}", pen_id), area],
        )?;
        Ok(self)
    }

    pub fn assign(
        mut self,
        lot_id: &str,
        pen_id: &str,
        assigned: Option<&str>,
        released: Option<&str>,
    ) -> SeedResult<'a> {
        let id = self.next_id("A");
        self.conn.execute(
            "INSERT INTO pen_assignment (assignment_id, lot_id, pen_id, assigned_date, release_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, lot_id, pen_id, assigned, released],
        )?;
        Ok(self)
    }

    pub fn feed_type(
        self,
        feed_type_id: &str,
        category: &str,
        cost_per_unit: &str,
        weight_per_unit: &str,
    ) -> SeedResult<'a> {
        self.conn.execute(
            "INSERT INTO feed_type (feed_type_id, name, category, cost_per_unit, weight_per_unit, active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![feed_type_id, feed_type_id, category, cost_per_unit, weight_per_unit],
        )?;
        Ok(self)
    }

    pub fn feed(mut self, lot_id: &str, feed_type_id: &str, date: &str, units: &str) -> SeedResult<'a> {
        let id = self.next_id("C");
        self.conn.execute(
            "INSERT INTO feed_consumption (consumption_id, lot_id, feed_type_id, date, units_consumed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, lot_id, feed_type_id, date, units],
        )?;
        Ok(self)
    }

    pub fn direct_expense(
        mut self,
        lot_id: &str,
        date: &str,
        category: &str,
        amount: &str,
    ) -> SeedResult<'a> {
        let id = self.next_id("E");
        self.conn.execute(
            "INSERT INTO direct_expense (expense_id, lot_id, date, concept, category, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, lot_id, date, format!("{} {}", category, id), category, amount],
        )?;
        Ok(self)
    }

    pub fn shared_expense(
        mut self,
        year: i32,
        month: u32,
        concept: &str,
        category: &str,
        amount: &str,
    ) -> SeedResult<'a> {
        let id = self.next_id("S");
        self.conn.execute(
            "INSERT INTO shared_monthly_expense (expense_id, year, month, concept, category, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, year, month, concept, category, amount],
        )?;
        Ok(self)
    }

    pub fn mortality(mut self, lot_id: &str, date: &str, count: i64) -> SeedResult<'a> {
        let id = self.next_id("M");
        self.conn.execute(
            "INSERT INTO mortality_record (record_id, lot_id, date, count) VALUES (?1, ?2, ?3, ?4)",
            params![id, lot_id, date, count],
        )?;
        Ok(self)
    }

    pub fn harvest(
        mut self,
        lot_id: &str,
        date: &str,
        animals: i64,
        total_weight: &str,
        is_final: bool,
    ) -> SeedResult<'a> {
        let id = self.next_id("H");
        self.conn.execute(
            "INSERT INTO harvest_record (record_id, lot_id, date, animal_count, total_weight, is_final)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, lot_id, date, animals, total_weight, is_final],
        )?;
        Ok(self)
    }
}

/// Two lots sharing a 400 m2 facility in January 2024:
/// L1 (100 m2, 2024-01-15..2024-02-10) and L2 (300 m2, open since 2023-12-01)
pub fn seed_shared_facility(conn: &Connection) -> Result<(), Box<dyn Error>> {
    Seeder::new(conn)
        .lot(LotRow::new("L1", "2024-01-15").closed("2024-02-10"))?
        .lot(LotRow::new("L2", "2023-12-01").head_count(200))?
        .pen("P1", "100")?
        .pen("P2", "300")?
        .assign("L1", "P1", Some("2024-01-15"), None)?
        .assign("L2", "P2", None, None)?
        .feed_type("GROWER-18", "GROWER", "50000", "40")?
        .feed("L1", "GROWER-18", "2024-01-20", "10")?
        .direct_expense("L1", "2024-01-15", "TRANSPORT", "300000")?
        .shared_expense(2024, 1, "rent", "RENT", "4000000")?
        .shared_expense(2024, 1, "power", "UTILITIES", "200000")?
        .shared_expense(2024, 2, "rent", "RENT", "4000000")?
        .mortality("L1", "2024-01-20", 1)?
        .mortality("L1", "2024-01-27", 2)?
        .harvest("L1", "2024-02-10", 97, "10670", true)?;
    Ok(())
}
