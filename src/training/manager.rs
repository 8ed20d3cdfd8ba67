use super::requests::{DeleteRecordRequest, InsertMenuRequest, InsertRecordRequest};
use crate::training_store::{
    CommitGate, Menu, NewRecord, Part, RecordDeletion, RecordEntry, SetDetail, TableSet,
    TrainingStore,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown menu: {0}")]
    UnknownMenu(String),

    #[error("{0:#}")]
    Store(#[from] anyhow::Error),
}

/// What to do when the menu named by a new record does not exist.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum MissingMenuPolicy {
    /// Store the record without a menu reference.
    #[default]
    Allow,
    /// Refuse the record.
    Reject,
}

impl std::fmt::Display for MissingMenuPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingMenuPolicy::Allow => write!(f, "allow"),
            MissingMenuPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Pairs weights and reps positionally into sets numbered from 1.
pub fn build_set_details(weights: &[f64], reps: &[i64]) -> Result<Vec<SetDetail>, TrainingError> {
    if weights.len() != reps.len() {
        return Err(TrainingError::InvalidInput(format!(
            "weight and reps must have the same length (got {} and {})",
            weights.len(),
            reps.len()
        )));
    }
    Ok(weights
        .iter()
        .zip(reps.iter())
        .enumerate()
        .map(|(index, (weight, reps))| SetDetail {
            current_set: index as i64 + 1,
            weight: *weight,
            reps: *reps,
        })
        .collect())
}

pub struct TrainingManager {
    store: Arc<dyn TrainingStore>,
    missing_menu_policy: MissingMenuPolicy,
}

impl TrainingManager {
    pub fn new(store: Arc<dyn TrainingStore>, missing_menu_policy: MissingMenuPolicy) -> Self {
        Self {
            store,
            missing_menu_policy,
        }
    }

    pub fn missing_menu_policy(&self) -> MissingMenuPolicy {
        self.missing_menu_policy
    }

    pub fn fetch_parts(&self, tables: TableSet) -> Result<Vec<Part>, TrainingError> {
        Ok(self.store.get_parts(tables)?)
    }

    pub fn fetch_menus(&self, tables: TableSet) -> Result<Vec<Menu>, TrainingError> {
        Ok(self.store.get_menus(tables)?)
    }

    pub fn fetch_records(&self, tables: TableSet) -> Result<Vec<RecordEntry>, TrainingError> {
        Ok(self.store.get_records(tables)?)
    }

    fn resolve_menu_id(&self, menu_name: &str) -> Result<Option<i64>, TrainingError> {
        match (self.store.find_menu_id_by_name(menu_name), self.missing_menu_policy) {
            (Ok(Some(menu_id)), _) => Ok(Some(menu_id)),
            (Ok(None), MissingMenuPolicy::Allow) => {
                warn!("No menu named {:?}, storing record without menu", menu_name);
                Ok(None)
            }
            (Ok(None), MissingMenuPolicy::Reject) => {
                Err(TrainingError::UnknownMenu(menu_name.to_string()))
            }
            (Err(err), MissingMenuPolicy::Allow) => {
                warn!(
                    "Menu lookup for {:?} failed, storing record without menu: {:#}",
                    menu_name, err
                );
                Ok(None)
            }
            (Err(err), MissingMenuPolicy::Reject) => Err(TrainingError::Store(err)),
        }
    }

    /// Logs a workout record with its sets. Returns the new record id.
    pub fn insert_record(
        &self,
        request: InsertRecordRequest,
        gate: &CommitGate,
    ) -> Result<i64, TrainingError> {
        let sets = build_set_details(&request.weight, &request.reps)?;
        let menu_id = self.resolve_menu_id(&request.menu_name)?;

        let record = NewRecord {
            part_id: request.part_id,
            menu_id,
            set_count: request.set_count,
            create_date: request.create_date,
            note: request.note,
        };
        let record_id = self.store.insert_record_with_sets(&record, &sets, gate)?;
        info!(
            "Inserted record {} (part {}, menu {:?}) with {} sets",
            record_id,
            record.part_id,
            record.menu_id,
            sets.len()
        );
        Ok(record_id)
    }

    /// Creates a menu. Returns the new menu id.
    pub fn insert_menu(
        &self,
        request: InsertMenuRequest,
        gate: &CommitGate,
    ) -> Result<i64, TrainingError> {
        let menu_id = self
            .store
            .insert_menu(request.part_id, &request.menu_name, gate)?;
        info!(
            "Inserted menu {} {:?} for part {}",
            menu_id, request.menu_name, request.part_id
        );
        Ok(menu_id)
    }

    pub fn delete_record(
        &self,
        request: DeleteRecordRequest,
        gate: &CommitGate,
    ) -> Result<RecordDeletion, TrainingError> {
        let deletion = self.store.delete_record_with_sets(request.record_id, gate)?;
        info!(
            "Deleted record {}: {} record row(s), {} set row(s)",
            request.record_id, deletion.records_deleted, deletion.set_details_deleted
        );
        Ok(deletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_store::SqliteTrainingStore;
    use anyhow::{bail, Result};
    use tempfile::TempDir;

    fn create_manager(
        policy: MissingMenuPolicy,
    ) -> (TrainingManager, Arc<SqliteTrainingStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store =
            Arc::new(SqliteTrainingStore::new(temp_dir.path().join("training.db")).unwrap());
        let manager = TrainingManager::new(store.clone(), policy);
        (manager, store, temp_dir)
    }

    fn bench_press_request(part_id: i64, menu_name: &str) -> InsertRecordRequest {
        InsertRecordRequest {
            part_id,
            menu_name: menu_name.to_string(),
            set_count: 3,
            create_date: "2024-06-01".to_string(),
            note: None,
            weight: vec![100.0, 110.0, 120.0],
            reps: vec![10, 8, 6],
        }
    }

    #[test]
    fn builds_sets_numbered_from_one() {
        let sets = build_set_details(&[100.0, 110.0, 120.0], &[10, 8, 6]).unwrap();

        assert_eq!(
            sets,
            vec![
                SetDetail {
                    current_set: 1,
                    weight: 100.0,
                    reps: 10
                },
                SetDetail {
                    current_set: 2,
                    weight: 110.0,
                    reps: 8
                },
                SetDetail {
                    current_set: 3,
                    weight: 120.0,
                    reps: 6
                },
            ]
        );
    }

    #[test]
    fn rejects_mismatched_weight_and_reps() {
        let result = build_set_details(&[100.0, 110.0], &[10]);
        assert!(matches!(result, Err(TrainingError::InvalidInput(_))));

        let result = build_set_details(&[100.0], &[10, 8]);
        assert!(matches!(result, Err(TrainingError::InvalidInput(_))));
    }

    #[test]
    fn inserts_record_with_resolved_menu() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);
        let part = store.insert_part("Chest", "red").unwrap();
        let menu = store
            .insert_menu(part, "Bench Press", &CommitGate::new())
            .unwrap();

        let record_id = manager
            .insert_record(bench_press_request(part, "Bench Press"), &CommitGate::new())
            .unwrap();

        let records = manager.fetch_records(TableSet::Current).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_id, record_id);
        assert_eq!(records[0].menu.as_ref().unwrap().menu_name, "Bench Press");
        assert_eq!(records[0].set_details.len(), 3);
        assert_eq!(store.find_menu_id_by_name("Bench Press").unwrap(), Some(menu));
    }

    #[test]
    fn allow_policy_stores_record_without_menu() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);
        let part = store.insert_part("Chest", "red").unwrap();

        manager
            .insert_record(bench_press_request(part, "Nonexistent"), &CommitGate::new())
            .unwrap();

        let records = manager.fetch_records(TableSet::Current).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].menu.is_none());
    }

    #[test]
    fn reject_policy_refuses_unknown_menu() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Reject);
        let part = store.insert_part("Chest", "red").unwrap();

        let result =
            manager.insert_record(bench_press_request(part, "Nonexistent"), &CommitGate::new());

        assert!(matches!(result, Err(TrainingError::UnknownMenu(name)) if name == "Nonexistent"));
        assert!(manager.fetch_records(TableSet::Current).unwrap().is_empty());
    }

    #[test]
    fn mismatched_lengths_write_nothing() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);
        let part = store.insert_part("Chest", "red").unwrap();
        let mut request = bench_press_request(part, "Bench Press");
        request.reps.pop();

        let result = manager.insert_record(request, &CommitGate::new());

        assert!(matches!(result, Err(TrainingError::InvalidInput(_))));
        assert!(manager.fetch_records(TableSet::Current).unwrap().is_empty());
    }

    #[test]
    fn store_errors_keep_their_context() {
        let (manager, _store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);

        let err = manager
            .insert_record(bench_press_request(99, "Bench Press"), &CommitGate::new())
            .unwrap_err();

        assert!(matches!(err, TrainingError::Store(_)));
        assert!(err.to_string().starts_with("Failed to insert record"));
    }

    #[test]
    fn duplicate_menus_are_allowed() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);
        let part = store.insert_part("Chest", "red").unwrap();
        let request = InsertMenuRequest {
            part_id: part,
            menu_name: "Bench Press".to_string(),
        };

        let first = manager
            .insert_menu(request.clone(), &CommitGate::new())
            .unwrap();
        let second = manager.insert_menu(request, &CommitGate::new()).unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.fetch_menus(TableSet::Current).unwrap().len(), 2);
    }

    #[test]
    fn delete_removes_record_from_listing() {
        let (manager, store, _temp_dir) = create_manager(MissingMenuPolicy::Allow);
        let part = store.insert_part("Chest", "red").unwrap();
        let record_id = manager
            .insert_record(bench_press_request(part, "Bench Press"), &CommitGate::new())
            .unwrap();

        let deletion = manager
            .delete_record(DeleteRecordRequest { record_id }, &CommitGate::new())
            .unwrap();

        assert_eq!(deletion.records_deleted, 1);
        assert_eq!(deletion.set_details_deleted, 3);
        assert!(manager
            .fetch_records(TableSet::Current)
            .unwrap()
            .iter()
            .all(|r| r.record_id != record_id));
    }

    /// Store whose menu lookup always fails, everything else is unreachable.
    struct FailingLookupStore;

    impl TrainingStore for FailingLookupStore {
        fn get_parts(&self, _tables: TableSet) -> Result<Vec<Part>> {
            bail!("unavailable")
        }

        fn get_menus(&self, _tables: TableSet) -> Result<Vec<Menu>> {
            bail!("unavailable")
        }

        fn get_records(&self, _tables: TableSet) -> Result<Vec<RecordEntry>> {
            bail!("unavailable")
        }

        fn find_menu_id_by_name(&self, _menu_name: &str) -> Result<Option<i64>> {
            bail!("lookup exploded")
        }

        fn insert_record_with_sets(
            &self,
            record: &NewRecord,
            _sets: &[SetDetail],
            _gate: &CommitGate,
        ) -> Result<i64> {
            assert!(record.menu_id.is_none());
            Ok(1)
        }

        fn insert_menu(&self, _part_id: i64, _menu_name: &str, _gate: &CommitGate) -> Result<i64> {
            bail!("unavailable")
        }

        fn delete_record_with_sets(
            &self,
            _record_id: i64,
            _gate: &CommitGate,
        ) -> Result<RecordDeletion> {
            bail!("unavailable")
        }

        fn insert_part(&self, _part_name: &str, _part_color: &str) -> Result<i64> {
            bail!("unavailable")
        }
    }

    #[test]
    fn failed_lookup_follows_policy() {
        let allow = TrainingManager::new(Arc::new(FailingLookupStore), MissingMenuPolicy::Allow);
        let record_id = allow
            .insert_record(bench_press_request(1, "Any"), &CommitGate::new())
            .unwrap();
        assert_eq!(record_id, 1);

        let reject = TrainingManager::new(Arc::new(FailingLookupStore), MissingMenuPolicy::Reject);
        let err = reject
            .insert_record(bench_press_request(1, "Any"), &CommitGate::new())
            .unwrap_err();
        assert!(matches!(err, TrainingError::Store(_)));
        assert_eq!(err.to_string(), "lookup exploded");
    }

    #[test]
    fn read_failures_surface_as_store_errors() {
        let manager = TrainingManager::new(Arc::new(FailingLookupStore), MissingMenuPolicy::Allow);

        let err = manager.fetch_parts(TableSet::Current).unwrap_err();
        assert!(matches!(err, TrainingError::Store(_)));
        assert_eq!(err.to_string(), "unavailable");
    }
}
