//! Retention sweep: delete backup files that no longer satisfy the
//! configured count/size/age limits (spec.md §6, "Retention sweep").

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use super::naming::base_name;

/// Retention limits applied during a sweep. `max_backup_files == 0` means
/// unlimited count.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub max_backup_files: usize,
    pub max_total_size: u64,
    pub max_age_days: u64,
}

/// Sweep `current_path`'s parent directory, deleting backup files that
/// exceed the count, cumulative-size, or age limits. Never touches
/// `current_path` itself.
pub fn sweep(current_path: &Path, policy: &RetentionPolicy) -> io::Result<()> {
    let parent = match current_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        return Ok(());
    }

    let base = base_name(current_path);
    let mut candidates: Vec<(std::path::PathBuf, SystemTime, u64)> = Vec::new();

    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        let path = entry.path();

        if path == current_path {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if !name.starts_with(&base) {
            continue;
        }

        let meta = entry.metadata()?;
        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((path, mtime, meta.len()));
    }

    // Newest first.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let now = SystemTime::now();
    let mut cumulative_size = 0u64;

    for (index, (path, mtime, size)) in candidates.iter().enumerate() {
        cumulative_size += size;

        let over_count = policy.max_backup_files != 0 && index >= policy.max_backup_files;
        let over_size = policy.max_total_size != 0 && cumulative_size > policy.max_total_size;
        let age_days = now
            .duration_since(*mtime)
            .unwrap_or_default()
            .as_secs() / 86_400;
        let over_age = policy.max_age_days != 0 && age_days > policy.max_age_days;

        if over_count || over_size || over_age {
            // Best-effort: a concurrent sweep or operator deleting the
            // file first is not an error here.
            let _ = fs::remove_file(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn touch(path: &Path, size: usize) {
        fs::write(path, vec![0u8; size]).unwrap();
    }

    #[test]
    fn test_sweep_keeps_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("app.log");
        touch(&current, 10);

        let policy = RetentionPolicy { max_backup_files: 0, max_total_size: 0, max_age_days: 0 };
        sweep(&current, &policy).unwrap();
        assert!(current.exists());
    }

    #[test]
    fn test_sweep_deletes_beyond_count_limit() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("app.log");
        touch(&current, 1);

        for n in 1..=4 {
            touch(&dir.path().join(format!("app.log.{n}")), 1);
            std::thread::sleep(Duration::from_millis(5));
        }

        let policy = RetentionPolicy { max_backup_files: 2, max_total_size: 0, max_age_days: 0 };
        sweep(&current, &policy).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n != "app.log")
            .collect();

        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_sweep_deletes_beyond_cumulative_size() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("app.log");
        touch(&current, 1);

        touch(&dir.path().join("app.log.1"), 100);
        std::thread::sleep(Duration::from_millis(5));
        touch(&dir.path().join("app.log.2"), 100);

        let policy = RetentionPolicy { max_backup_files: 0, max_total_size: 150, max_age_days: 0 };
        sweep(&current, &policy).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n != "app.log")
            .collect();

        assert_eq!(remaining.len(), 1);
    }
}
