use serde::Serialize;
use serde_json::{json, Value};

/// Selects which group of tables an operation reads from: the live tables
/// or their read-only archival mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSet {
    Current,
    Archive,
}

/// Physical table names of one [`TableSet`].
#[derive(Debug, Clone, Copy)]
pub struct TableNames {
    pub part: &'static str,
    pub menu: &'static str,
    pub record: &'static str,
    pub set_detail: &'static str,
}

impl TableSet {
    pub fn names(self) -> TableNames {
        match self {
            TableSet::Current => TableNames {
                part: "part_master",
                menu: "menu_master",
                record: "record",
                set_detail: "set_detail",
            },
            TableSet::Archive => TableNames {
                part: "old_part_master",
                menu: "old_menu_master",
                record: "old_record",
                set_detail: "old_set_detail",
            },
        }
    }
}

/// A body region used to classify exercises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub part_id: i64,
    pub part_name: String,
    pub part_color: String,
}

/// A named exercise belonging to one [`Part`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub menu_id: i64,
    pub part_id: i64,
    pub menu_name: String,
}

/// One physical set of a workout record. `current_set` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetDetail {
    pub current_set: i64,
    pub weight: f64,
    pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSummary {
    pub part_name: String,
    pub part_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuSummary {
    pub menu_name: String,
}

/// A workout record together with its denormalized part/menu info and its sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub record_id: i64,
    pub part: Option<PartSummary>,
    pub menu: Option<MenuSummary>,
    pub set_count: i64,
    pub set_details: Vec<SetDetail>,
    pub note: Option<String>,
    pub create_date: String,
}

impl RecordEntry {
    /// Renders the record the way clients expect it, with the embedded
    /// entities keyed by the name of the table they come from.
    pub fn to_wire_json(&self, tables: TableSet) -> Value {
        let names = tables.names();
        let mut object = serde_json::Map::new();
        object.insert("record_id".to_string(), json!(self.record_id));
        object.insert(names.part.to_string(), json!(self.part));
        object.insert(names.menu.to_string(), json!(self.menu));
        object.insert("set_count".to_string(), json!(self.set_count));
        object.insert(names.set_detail.to_string(), json!(self.set_details));
        object.insert("note".to_string(), json!(self.note));
        object.insert("create_date".to_string(), json!(self.create_date));
        Value::Object(object)
    }
}

/// The fields of a record row to be inserted; the id is generated by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub part_id: i64,
    pub menu_id: Option<i64>,
    pub set_count: i64,
    pub create_date: String,
    pub note: Option<String>,
}

/// Row counts removed by a record deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordDeletion {
    pub set_details_deleted: usize,
    pub records_deleted: usize,
}
