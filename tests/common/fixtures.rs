//! Seeded databases for end-to-end tests

use super::constants::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;
use training_record_server::training_store::CommitGate;
use training_record_server::{SqliteTrainingStore, TrainingStore};

/// Creates a temporary training database with live parts and menus plus one
/// archived record. Returns the temp dir (keep it alive) and the db path.
pub fn create_test_training_db() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("training.db");

    {
        let store = SqliteTrainingStore::new(&db_path)?;
        store.insert_part(CHEST_PART_NAME, CHEST_PART_COLOR)?;
        store.insert_part(LEGS_PART_NAME, LEGS_PART_COLOR)?;
        store.insert_menu(CHEST_PART_ID, BENCH_PRESS_MENU_NAME, &CommitGate::new())?;
        store.insert_menu(LEGS_PART_ID, SQUAT_MENU_NAME, &CommitGate::new())?;
    }

    let conn = Connection::open(&db_path)?;
    conn.execute(
        "INSERT INTO old_part_master (part_id, part_name, part_color) VALUES (?1, ?2, ?3)",
        params![OLD_PART_ID, OLD_PART_NAME, OLD_PART_COLOR],
    )?;
    conn.execute(
        "INSERT INTO old_menu_master (menu_id, part_id, menu_name) VALUES (?1, ?2, ?3)",
        params![OLD_MENU_ID, OLD_PART_ID, OLD_MENU_NAME],
    )?;
    conn.execute(
        "INSERT INTO old_record (record_id, part_id, menu_id, set_count, note, create_date)
         VALUES (?1, ?2, ?3, 2, 'archived', ?4)",
        params![OLD_RECORD_ID, OLD_PART_ID, OLD_MENU_ID, OLD_RECORD_DATE],
    )?;
    conn.execute(
        "INSERT INTO old_set_detail (record_id, current_set, weight, reps)
         VALUES (?1, 2, 22.5, 8), (?1, 1, 20.0, 10)",
        params![OLD_RECORD_ID],
    )?;

    Ok((temp_dir, db_path))
}
