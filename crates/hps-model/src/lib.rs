//! Record types for the Hall Pass Studio validation layer.
//!
//! This crate defines the plain records that flow from form submissions and
//! roster uploads into validation:
//!
//! - [`records`]: passes, log entries, broadcasts, conflict groups, parent
//!   contacts and schools as submitted by the dashboard
//! - [`enums`]: the closed value sets (pass status, log type, priority,
//!   contact type)
//! - [`student`]: roster fields and imported student records
//! - [`result`]: the `{valid, errors, sanitized}` result shape
//! - [`text`]: lenient decoding of loosely typed JSON form values
//!
//! Records are never persisted here. Text fields decode leniently: a JSON
//! value that is not a string becomes an empty field instead of a decode
//! failure, so validation can report it as missing.

pub mod enums;
pub mod records;
pub mod result;
pub mod student;
pub mod text;

pub use enums::{ContactType, LogType, ParseEnumError, PassStatus, Priority};
pub use records::{Broadcast, ConflictGroup, LogEntry, ParentContact, Pass, School};
pub use result::ValidationResult;
pub use student::{StudentField, StudentRecord};
pub use text::{RawText, format_numeric};
