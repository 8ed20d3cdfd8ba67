//! SQLite schema for the training database.
//!
//! The live tables (`part_master`, `menu_master`, `record`, `set_detail`) are
//! mirrored one-to-one by the archival `old_*` tables, which this server only reads.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Version 1 - Live tables
// =============================================================================

const PART_FK: ForeignKey = ForeignKey {
    foreign_table: "part_master",
    foreign_column: "part_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const MENU_FK: ForeignKey = ForeignKey {
    foreign_table: "menu_master",
    foreign_column: "menu_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

// Set details must be deleted before their record.
const RECORD_FK: ForeignKey = ForeignKey {
    foreign_table: "record",
    foreign_column: "record_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const PART_MASTER_TABLE_V1: Table = Table {
    name: "part_master",
    columns: &[
        sqlite_column!("part_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("part_name", &SqlType::Text, non_null = true),
        sqlite_column!("part_color", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const MENU_MASTER_TABLE_V1: Table = Table {
    name: "menu_master",
    columns: &[
        sqlite_column!("menu_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "part_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PART_FK)
        ),
        sqlite_column!("menu_name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_menu_master_name", "menu_name")],
    unique_constraints: &[],
};

const RECORD_TABLE_V1: Table = Table {
    name: "record",
    columns: &[
        sqlite_column!("record_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "part_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PART_FK)
        ),
        sqlite_column!("menu_id", &SqlType::Integer, foreign_key = Some(&MENU_FK)),
        sqlite_column!("set_count", &SqlType::Integer, non_null = true),
        sqlite_column!("note", &SqlType::Text),
        sqlite_column!("create_date", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const SET_DETAIL_TABLE_V1: Table = Table {
    name: "set_detail",
    columns: &[
        sqlite_column!(
            "record_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&RECORD_FK)
        ),
        sqlite_column!("current_set", &SqlType::Integer, non_null = true),
        sqlite_column!("weight", &SqlType::Real, non_null = true),
        sqlite_column!("reps", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["record_id", "current_set"]],
};

// =============================================================================
// Version 1 - Archival mirror
// =============================================================================

const OLD_PART_FK: ForeignKey = ForeignKey {
    foreign_table: "old_part_master",
    foreign_column: "part_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const OLD_MENU_FK: ForeignKey = ForeignKey {
    foreign_table: "old_menu_master",
    foreign_column: "menu_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const OLD_RECORD_FK: ForeignKey = ForeignKey {
    foreign_table: "old_record",
    foreign_column: "record_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const OLD_PART_MASTER_TABLE_V1: Table = Table {
    name: "old_part_master",
    columns: &[
        sqlite_column!("part_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("part_name", &SqlType::Text, non_null = true),
        sqlite_column!("part_color", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const OLD_MENU_MASTER_TABLE_V1: Table = Table {
    name: "old_menu_master",
    columns: &[
        sqlite_column!("menu_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "part_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&OLD_PART_FK)
        ),
        sqlite_column!("menu_name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const OLD_RECORD_TABLE_V1: Table = Table {
    name: "old_record",
    columns: &[
        sqlite_column!("record_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "part_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&OLD_PART_FK)
        ),
        sqlite_column!(
            "menu_id",
            &SqlType::Integer,
            foreign_key = Some(&OLD_MENU_FK)
        ),
        sqlite_column!("set_count", &SqlType::Integer, non_null = true),
        sqlite_column!("note", &SqlType::Text),
        sqlite_column!("create_date", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const OLD_SET_DETAIL_TABLE_V1: Table = Table {
    name: "old_set_detail",
    columns: &[
        sqlite_column!(
            "record_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&OLD_RECORD_FK)
        ),
        sqlite_column!("current_set", &SqlType::Integer, non_null = true),
        sqlite_column!("weight", &SqlType::Real, non_null = true),
        sqlite_column!("reps", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["record_id", "current_set"]],
};

pub const TRAINING_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        PART_MASTER_TABLE_V1,
        MENU_MASTER_TABLE_V1,
        RECORD_TABLE_V1,
        SET_DETAIL_TABLE_V1,
        OLD_PART_MASTER_TABLE_V1,
        OLD_MENU_MASTER_TABLE_V1,
        OLD_RECORD_TABLE_V1,
        OLD_SET_DETAIL_TABLE_V1,
    ],
    migration: None,
}];
