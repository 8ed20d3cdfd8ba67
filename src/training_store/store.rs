use super::commit_gate::CommitGate;
use super::models::*;
use super::schema::TRAINING_VERSIONED_SCHEMAS;
use super::TrainingStore;
use crate::sqlite_persistence::open_versioned_db;
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub struct SqliteTrainingStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteTrainingStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let conn = open_versioned_db(&db_path, TRAINING_VERSIONED_SCHEMAS)
            .with_context(|| format!("Failed to open training database {:?}", db_path))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Training database connection lock poisoned"))
    }

    fn read_set_details(
        conn: &Connection,
        names: &TableNames,
    ) -> Result<HashMap<i64, Vec<SetDetail>>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT record_id, current_set, weight, reps FROM {} ORDER BY record_id ASC, current_set ASC",
            names.set_detail
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                SetDetail {
                    current_set: row.get(1)?,
                    weight: row.get(2)?,
                    reps: row.get(3)?,
                },
            ))
        })?;

        let mut by_record: HashMap<i64, Vec<SetDetail>> = HashMap::new();
        for row in rows {
            let (record_id, set_detail) = row?;
            by_record.entry(record_id).or_default().push(set_detail);
        }
        Ok(by_record)
    }
}

impl TrainingStore for SqliteTrainingStore {
    fn get_parts(&self, tables: TableSet) -> Result<Vec<Part>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT part_id, part_name, part_color FROM {} ORDER BY part_id ASC",
            tables.names().part
        ))?;
        let parts = stmt
            .query_map([], |row| {
                Ok(Part {
                    part_id: row.get(0)?,
                    part_name: row.get(1)?,
                    part_color: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts)
    }

    fn get_menus(&self, tables: TableSet) -> Result<Vec<Menu>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT menu_id, part_id, menu_name FROM {} ORDER BY menu_id ASC",
            tables.names().menu
        ))?;
        let menus = stmt
            .query_map([], |row| {
                Ok(Menu {
                    menu_id: row.get(0)?,
                    part_id: row.get(1)?,
                    menu_name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(menus)
    }

    fn get_records(&self, tables: TableSet) -> Result<Vec<RecordEntry>> {
        let names = tables.names();
        let conn = self.lock()?;
        let mut set_details = Self::read_set_details(&conn, &names)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT r.record_id, r.set_count, r.note, r.create_date, p.part_name, p.part_color, m.menu_name \
             FROM {record} r \
             LEFT JOIN {part} p ON p.part_id = r.part_id \
             LEFT JOIN {menu} m ON m.menu_id = r.menu_id \
             ORDER BY r.record_id ASC",
            record = names.record,
            part = names.part,
            menu = names.menu,
        ))?;
        let rows = stmt.query_map([], |row| {
            let part_name: Option<String> = row.get(4)?;
            let part_color: Option<String> = row.get(5)?;
            let menu_name: Option<String> = row.get(6)?;
            Ok(RecordEntry {
                record_id: row.get(0)?,
                set_count: row.get(1)?,
                note: row.get(2)?,
                create_date: row.get(3)?,
                part: part_name.zip(part_color).map(|(part_name, part_color)| PartSummary {
                    part_name,
                    part_color,
                }),
                menu: menu_name.map(|menu_name| MenuSummary { menu_name }),
                set_details: Vec::new(),
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let mut record = row?;
            record.set_details = set_details.remove(&record.record_id).unwrap_or_default();
            records.push(record);
        }
        Ok(records)
    }

    fn find_menu_id_by_name(&self, menu_name: &str) -> Result<Option<i64>> {
        let conn = self.lock()?;
        let menu_id = conn
            .query_row(
                "SELECT menu_id FROM menu_master WHERE menu_name = ?1 ORDER BY menu_id ASC LIMIT 1",
                params![menu_name],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to look up menu {:?}", menu_name))?;
        Ok(menu_id)
    }

    fn insert_record_with_sets(
        &self,
        record: &NewRecord,
        sets: &[SetDetail],
        gate: &CommitGate,
    ) -> Result<i64> {
        let mut conn = self.lock()?;
        if gate.is_abandoned() {
            bail!("Record insertion abandoned before it started");
        }
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO record (part_id, menu_id, set_count, note, create_date) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.part_id,
                record.menu_id,
                record.set_count,
                record.note,
                record.create_date
            ],
        )
        .context("Failed to insert record")?;
        let record_id = tx.last_insert_rowid();

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO set_detail (record_id, current_set, weight, reps) VALUES (?1, ?2, ?3, ?4)",
                )
                .context("Failed to insert set details")?;
            for set in sets {
                stmt.execute(params![record_id, set.current_set, set.weight, set.reps])
                    .context("Failed to insert set details")?;
            }
        }

        if !gate.begin_commit() {
            bail!("Record insertion abandoned, rolled back");
        }
        tx.commit().context("Failed to commit record insertion")?;
        debug!("Inserted record {} with {} sets", record_id, sets.len());
        Ok(record_id)
    }

    fn insert_menu(&self, part_id: i64, menu_name: &str, gate: &CommitGate) -> Result<i64> {
        let conn = self.lock()?;
        // A single statement commits as it runs, so the claim comes first.
        if !gate.begin_commit() {
            bail!("Menu insertion abandoned before it started");
        }
        conn.execute(
            "INSERT INTO menu_master (part_id, menu_name) VALUES (?1, ?2)",
            params![part_id, menu_name],
        )
        .context("Failed to insert menu")?;
        Ok(conn.last_insert_rowid())
    }

    fn delete_record_with_sets(&self, record_id: i64, gate: &CommitGate) -> Result<RecordDeletion> {
        let mut conn = self.lock()?;
        if gate.is_abandoned() {
            bail!("Record deletion abandoned before it started");
        }
        let tx = conn.transaction()?;

        let set_details_deleted = tx
            .execute(
                "DELETE FROM set_detail WHERE record_id = ?1",
                params![record_id],
            )
            .context("Failed to delete set details")?;
        let records_deleted = tx
            .execute("DELETE FROM record WHERE record_id = ?1", params![record_id])
            .context("Failed to delete record")?;

        if !gate.begin_commit() {
            bail!("Record deletion abandoned, rolled back");
        }
        tx.commit().context("Failed to commit record deletion")?;
        Ok(RecordDeletion {
            set_details_deleted,
            records_deleted,
        })
    }

    fn insert_part(&self, part_name: &str, part_color: &str) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO part_master (part_name, part_color) VALUES (?1, ?2)",
            params![part_name, part_color],
        )
        .context("Failed to insert part")?;
        Ok(conn.last_insert_rowid())
    }
}
