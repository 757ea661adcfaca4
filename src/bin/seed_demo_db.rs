// ==========================================
// Demo database seeding
// ==========================================
// Usage: seed_demo_db [PATH]
// An existing file is backed up and replaced
// ==========================================

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use lot_cost_engine::app::get_default_db_path;
use lot_cost_engine::db::{init_schema, open_sqlite_connection};

struct SeedLot {
    code: &'static str,
    start: (i32, u32, u32),
    close: Option<(i32, u32, u32)>,
    head_count: i64,
    avg_weight: &'static str,
    purchase_cost: &'static str,
    pens: &'static [&'static str],
}

const PENS: &[(&str, &str)] = &[("Pen A", "100"), ("Pen B", "150"), ("Pen C", "150")];

const FEED_TYPES: &[(&str, &str, &str, &str)] = &[
    ("Prestarter 22", "PRESTARTER", "62000", "40"),
    ("Grower 18", "GROWER", "54000", "40"),
    ("Finisher 16", "FINISHER", "49000", "40"),
];

const LOTS: &[SeedLot] = &[
    SeedLot {
        code: "2024-001",
        start: (2024, 1, 15),
        close: Some((2024, 4, 20)),
        head_count: 100,
        avg_weight: "25.5",
        purchase_cost: "18500000",
        pens: &["Pen A"],
    },
    SeedLot {
        code: "2024-002",
        start: (2024, 2, 1),
        close: None,
        head_count: 150,
        avg_weight: "24",
        purchase_cost: "27000000",
        pens: &["Pen B"],
    },
    SeedLot {
        code: "2024-003",
        start: (2024, 3, 10),
        close: None,
        head_count: 120,
        avg_weight: "26",
        purchase_cost: "22800000",
        pens: &["Pen C"],
    },
];

const SHARED: &[(&str, &str, &str)] = &[
    ("Facility rent", "RENT", "4000000"),
    ("Electricity", "UTILITIES", "650000"),
    ("Staff payroll", "PAYROLL", "5200000"),
    ("Vaccines", "MEDICATION", "380000"),
];

fn main() -> Result<()> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path).with_context(|| format!("opening {}", db_path))?;
    init_schema(&conn).context("creating schema")?;

    seed(&conn).context("seeding demo data")?;
    print_quick_counts(&conn)?;
    eprintln!("Seeded {}", db_path);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn date(ymd: (i32, u32, u32)) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
        .with_context(|| format!("invalid seed date {:?}", ymd))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn seed(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    let mut pen_ids = Vec::new();
    for (name, area) in PENS {
        let id = new_id();
        tx.execute(
            "INSERT INTO pen (pen_id, name, area, active) VALUES (?1, ?2, ?3, 1)",
            params![id, name, area],
        )?;
        pen_ids.push((*name, id));
    }

    let mut feed_ids = Vec::new();
    for (name, category, cost, weight) in FEED_TYPES {
        let id = new_id();
        tx.execute(
            "INSERT INTO feed_type (feed_type_id, name, category, cost_per_unit, weight_per_unit, active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![id, name, category, cost, weight],
        )?;
        feed_ids.push(id);
    }

    for lot in LOTS {
        let lot_id = new_id();
        let start = date(lot.start)?;
        let close = lot.close.map(date).transpose()?;
        tx.execute(
            "INSERT INTO lot (lot_id, lot_code, start_date, close_date, status,
                              initial_head_count, initial_avg_weight, purchase_cost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                lot_id,
                lot.code,
                start,
                close,
                if close.is_some() { "CLOSED" } else { "ACTIVE" },
                lot.head_count,
                lot.avg_weight,
                lot.purchase_cost
            ],
        )?;

        for pen_name in lot.pens {
            let pen_id = pen_ids
                .iter()
                .find(|(name, _)| name == pen_name)
                .map(|(_, id)| id.clone())
                .with_context(|| format!("unknown seed pen {}", pen_name))?;
            tx.execute(
                "INSERT INTO pen_assignment (assignment_id, lot_id, pen_id, assigned_date, release_date)
                 VALUES (?1, ?2, ?3, ?4, NULL)",
                params![new_id(), lot_id, pen_id, start],
            )?;
        }

        // one delivery of each feed, ten days apart
        for (i, feed_id) in feed_ids.iter().enumerate() {
            let day = start + chrono::Duration::days(10 * i as i64);
            let units = (lot.head_count / 5 * (i as i64 + 1)).to_string();
            tx.execute(
                "INSERT INTO feed_consumption (consumption_id, lot_id, feed_type_id, date, units_consumed)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![new_id(), lot_id, feed_id, day, units],
            )?;
        }

        tx.execute(
            "INSERT INTO direct_expense (expense_id, lot_id, date, concept, category, amount)
             VALUES (?1, ?2, ?3, 'Inbound freight', 'TRANSPORT', ?4)",
            params![new_id(), lot_id, start, (lot.head_count * 3_500).to_string()],
        )?;

        tx.execute(
            "INSERT INTO mortality_record (record_id, lot_id, date, count) VALUES (?1, ?2, ?3, ?4)",
            params![new_id(), lot_id, start + chrono::Duration::days(12), 2],
        )?;

        if let Some(close) = close {
            let sold = lot.head_count - 2;
            tx.execute(
                "INSERT INTO harvest_record (record_id, lot_id, date, animal_count, total_weight, is_final)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1)",
                params![new_id(), lot_id, close, sold, (sold * 108).to_string()],
            )?;
        }

        println!("{}\t{}", lot.code, lot_id);
    }

    for month in 1..=6u32 {
        for (concept, category, amount) in SHARED {
            tx.execute(
                "INSERT INTO shared_monthly_expense (expense_id, year, month, concept, category, amount)
                 VALUES (?1, 2024, ?2, ?3, ?4, ?5)",
                params![new_id(), month, concept, category, amount],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<()> {
    for table in [
        "lot",
        "pen",
        "pen_assignment",
        "feed_consumption",
        "direct_expense",
        "shared_monthly_expense",
        "mortality_record",
        "harvest_record",
    ] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("{:<24} {}", table, count);
    }
    Ok(())
}
