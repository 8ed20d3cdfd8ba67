//! Shared constants for end-to-end tests
//!
//! When the seeded test data changes, update only this file.
#![allow(dead_code)]

// ============================================================================
// Seeded live data
// ============================================================================

pub const CHEST_PART_ID: i64 = 1;
pub const CHEST_PART_NAME: &str = "Chest";
pub const CHEST_PART_COLOR: &str = "#e57373";

pub const LEGS_PART_ID: i64 = 2;
pub const LEGS_PART_NAME: &str = "Legs";
pub const LEGS_PART_COLOR: &str = "#64b5f6";

pub const BENCH_PRESS_MENU_ID: i64 = 1;
pub const BENCH_PRESS_MENU_NAME: &str = "Bench Press";

pub const SQUAT_MENU_ID: i64 = 2;
pub const SQUAT_MENU_NAME: &str = "Squat";

// ============================================================================
// Seeded archive data
// ============================================================================

pub const OLD_PART_ID: i64 = 100;
pub const OLD_PART_NAME: &str = "Arms";
pub const OLD_PART_COLOR: &str = "#fff176";

pub const OLD_MENU_ID: i64 = 200;
pub const OLD_MENU_NAME: &str = "Barbell Curl";

pub const OLD_RECORD_ID: i64 = 300;
pub const OLD_RECORD_DATE: &str = "2023-11-20";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
