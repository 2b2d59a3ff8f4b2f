//! Flat `key = value` document parser and default-document renderer.
//!
//! spec.md §6 describes the configuration file as "a declarative key/value
//! document" with dotted keys (`rotation.max_file_size`) and `_`-prefixed
//! comment keys preserved on write but ignored on read — not a nested
//! table format, so this is a small hand-rolled parser rather than a TOML
//! mapping.

use std::collections::HashMap;

/// A parsed document: every non-comment, non-blank `key = value` line,
/// keyed verbatim (including dotted keys).
pub struct RawDocument {
    values: HashMap<String, String>,
}

impl RawDocument {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get_str(key)?.parse().ok()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get_str(key)?.parse().ok()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get_str(key)?.parse().ok()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get_str(key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

/// Parse a flat key/value document. Blank lines, `#`-prefixed comment
/// lines, and lines with no `=` are ignored. Keys beginning with `_` are
/// parsed (so a later write can preserve them) but never surfaced through
/// `RawDocument::get_*`, matching the "ignored on read" contract.
pub fn parse_document(text: &str) -> RawDocument {
    let mut values = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else { continue };
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() || key.starts_with('_') {
            continue;
        }

        values.insert(key.to_string(), value.to_string());
    }

    RawDocument { values }
}

/// Render the default document written when a configuration file is
/// absent, with every recognized option named and commented.
pub fn render_default_document() -> String {
    let defaults = super::RingLogConfig::default();

    format!(
        "# ringlog configuration\n\
         # Generated automatically; edit values, keep keys as-is.\n\
         _generated_by = ringlog\n\
         \n\
         queue_capacity = {queue_capacity}\n\
         min_level = {min_level}\n\
         output_target = console\n\
         log_file_path = {log_file_path}\n\
         batch_size = {batch_size}\n\
         drop_rate_warning_threshold = {drop_rate_warning_threshold}\n\
         enable_statistics = {enable_statistics}\n\
         allocation_strategy = auto\n\
         tls_format_buffer_size = {tls_format_buffer_size}\n\
         worker_file_buffer_size = {worker_file_buffer_size}\n\
         idle_sleep_us = {idle_sleep_us}\n\
         \n\
         rotation.strategy = size_based\n\
         rotation.max_file_size = {rotation_max_file_size}\n\
         rotation.time_interval = daily\n\
         rotation.max_backup_files = {rotation_max_backup_files}\n\
         rotation.max_total_size = {rotation_max_total_size}\n\
         rotation.max_age_days = {rotation_max_age_days}\n\
         rotation.enable_compression = false\n\
         rotation.naming_style = timestamp\n",
        queue_capacity = defaults.queue_capacity,
        min_level = defaults.min_level,
        log_file_path = defaults.log_file_path.display(),
        batch_size = defaults.batch_size,
        drop_rate_warning_threshold = defaults.drop_rate_warning_threshold,
        enable_statistics = defaults.enable_statistics,
        tls_format_buffer_size = defaults.tls_format_buffer_size,
        worker_file_buffer_size = defaults.worker_file_buffer_size,
        idle_sleep_us = defaults.idle_sleep_us,
        rotation_max_file_size = defaults.rotation_max_file_size,
        rotation_max_backup_files = defaults.rotation_max_backup_files,
        rotation_max_total_size = defaults.rotation_max_total_size,
        rotation_max_age_days = defaults.rotation_max_age_days
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flat_and_dotted_keys() {
        let doc = parse_document("batch_size = 50\nrotation.max_file_size = 2048\n");
        assert_eq!(doc.get_usize("batch_size"), Some(50));
        assert_eq!(doc.get_u64("rotation.max_file_size"), Some(2048));
    }

    #[test]
    fn test_ignores_comments_and_blank_lines() {
        let doc = parse_document("# a comment\n\nbatch_size = 7\n");
        assert_eq!(doc.get_usize("batch_size"), Some(7));
    }

    #[test]
    fn test_underscore_keys_are_unreadable() {
        let doc = parse_document("_note = hello\n");
        assert_eq!(doc.get_str("_note"), None);
    }

    #[test]
    fn test_default_document_round_trips() {
        let rendered = render_default_document();
        let doc = parse_document(&rendered);
        assert_eq!(doc.get_usize("queue_capacity"), Some(crate::constants::DEFAULT_QUEUE_CAPACITY));
    }
}
