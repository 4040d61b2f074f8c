//! Backup path naming.

use chrono::NaiveDateTime;

/// Timestamp layout appended to backup paths: 14 digits, second resolution.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Derive `<path>.backup.<YYYYMMDDHHMMSS>` from the original path.
///
/// Two backups taken within the same second map to the same name.
#[must_use]
pub fn backup_path(path: &str, now: NaiveDateTime) -> String {
    format!("{path}.backup.{}", now.format(BACKUP_TIMESTAMP_FORMAT))
}
