//! Data models

pub mod enums;
pub mod report;
pub mod stat;
pub mod user;

// Re-export commonly used types
pub use enums::{Action, Sex};
pub use report::{DateGroup, Dated, ReportDocument, ReportRow};
pub use stat::{RecordStat, StatEvent, TopStatsQuery};
pub use user::{RegisterUser, TextId, User};
