mod commit_gate;
mod models;
mod schema;
mod store;

pub use commit_gate::CommitGate;
pub use models::*;
pub use schema::TRAINING_VERSIONED_SCHEMAS;
pub use store::SqliteTrainingStore;

use anyhow::Result;

/// Storage backend for parts, menus and workout records.
pub trait TrainingStore: Send + Sync {
    /// All parts of the given table set, ascending by id.
    fn get_parts(&self, tables: TableSet) -> Result<Vec<Part>>;

    /// All menus of the given table set, ascending by id.
    fn get_menus(&self, tables: TableSet) -> Result<Vec<Menu>>;

    /// All records of the given table set, ascending by id, each with its
    /// part, menu and set details embedded.
    fn get_records(&self, tables: TableSet) -> Result<Vec<RecordEntry>>;

    /// Returns the id of the first live menu (lowest id) with the given name.
    fn find_menu_id_by_name(&self, menu_name: &str) -> Result<Option<i64>>;

    /// Inserts a record and its set details atomically, returns the new record id.
    /// Nothing is written when `gate` was abandoned before the commit.
    fn insert_record_with_sets(
        &self,
        record: &NewRecord,
        sets: &[SetDetail],
        gate: &CommitGate,
    ) -> Result<i64>;

    /// Inserts a menu, returns its id. Duplicated names are allowed.
    fn insert_menu(&self, part_id: i64, menu_name: &str, gate: &CommitGate) -> Result<i64>;

    /// Deletes the set details of a record and then the record itself, atomically.
    /// Deleting a record that does not exist is not an error.
    fn delete_record_with_sets(&self, record_id: i64, gate: &CommitGate) -> Result<RecordDeletion>;

    /// Seeds a live part, returns its id.
    fn insert_part(&self, part_name: &str, part_color: &str) -> Result<i64>;
}
