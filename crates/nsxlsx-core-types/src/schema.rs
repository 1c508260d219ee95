//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the core, the store
//! and the engine.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Store identifiers
pub const FIELD_STORE_PATH: &str = "store_path";
pub const FIELD_STORE_FORMAT: &str = "store_format";
pub const FIELD_MODE: &str = "mode";

// Sheet addressing
pub const FIELD_SHEET: &str = "sheet";
pub const FIELD_ROW: &str = "row";
pub const FIELD_COLUMN: &str = "column";
pub const FIELD_FIELD_NAME: &str = "field";

// Collection sizes
pub const FIELD_SHEET_COUNT: &str = "sheet_count";
pub const FIELD_CELL_COUNT: &str = "cell_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
