//! Backup filename computation for rotation (spec.md §6, "File naming").

use std::path::{ Path, PathBuf };

use crate::utils::civil_date_from_unix_seconds;

/// How a rotated backup file is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    /// `<stem>.<YYYY>-<MM>-<DD><ext>`
    Timestamp,
    /// `<current_path>.<rotation_count + 1>`
    Numbered,
}

impl NamingStyle {
    /// Parse from a config string (`timestamp|numbered`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "timestamp" => Some(Self::Timestamp),
            "numbered" => Some(Self::Numbered),
            _ => None,
        }
    }
}

/// Compute the backup path for `current_path` under the given style.
/// `rotation_count` is the number of rotations completed *before* this one.
pub fn compute_backup_path(current_path: &Path, style: NamingStyle, now_unix_secs: i64, rotation_count: usize) -> PathBuf {
    match style {
        NamingStyle::Numbered => {
            let mut name = current_path.as_os_str().to_owned();
            name.push(format!(".{}", rotation_count + 1));
            PathBuf::from(name)
        }
        NamingStyle::Timestamp => {
            let date = civil_date_from_unix_seconds(now_unix_secs);
            let stem = current_path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
            let ext = current_path.extension().and_then(|s| s.to_str());
            let file_name = match ext {
                Some(ext) => format!("{stem}.{date}.{ext}", date = date.format()),
                None => format!("{stem}.{date}", date = date.format()),
            };
            current_path.with_file_name(file_name)
        }
    }
}

/// Base name used when matching retention candidates: the current path's
/// file stem, which every style-generated backup name is prefixed with.
pub fn base_name(current_path: &Path) -> String {
    current_path.file_stem().and_then(|s| s.to_str()).unwrap_or("log").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_style() {
        let path = Path::new("/var/log/app.log");
        let backup = compute_backup_path(path, NamingStyle::Numbered, 0, 0);
        assert_eq!(backup, PathBuf::from("/var/log/app.log.1"));
    }

    #[test]
    fn test_numbered_style_increments_from_rotation_count() {
        let path = Path::new("/var/log/app.log");
        let backup = compute_backup_path(path, NamingStyle::Numbered, 0, 2);
        assert_eq!(backup, PathBuf::from("/var/log/app.log.3"));
    }

    #[test]
    fn test_timestamp_style_includes_leap_day() {
        let path = Path::new("/var/log/app.log");
        let backup = compute_backup_path(path, NamingStyle::Timestamp, 1_709_164_800, 0);
        assert_eq!(backup, PathBuf::from("/var/log/app.2024-02-29.log"));
    }

    #[test]
    fn test_timestamp_style_without_extension() {
        let path = Path::new("/var/log/app");
        let backup = compute_backup_path(path, NamingStyle::Timestamp, 1_709_164_800, 0);
        assert_eq!(backup, PathBuf::from("/var/log/app.2024-02-29"));
    }
}
