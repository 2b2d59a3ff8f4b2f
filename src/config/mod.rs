//! Configuration ingestion: a hand-rolled flat key/value document parser,
//! validation with default substitution, and default-document generation
//! (spec.md §4.8/§6).

mod parser;

use std::path::{ Path, PathBuf };

use crate::constants::*;
use crate::formatting::AllocationStrategy;
use crate::level::Level;
use crate::rotation::{ NamingStyle, RotationConfig, RotationStrategy, TimeInterval };
use crate::sink::OutputTarget;
use crate::statistics::clamp_drop_rate_threshold;

/// Fully validated, ready-to-construct logger configuration.
#[derive(Debug, Clone)]
pub struct RingLogConfig {
    pub queue_capacity: usize,
    pub min_level: Level,
    pub output_target: OutputTarget,
    pub log_file_path: PathBuf,
    pub batch_size: usize,
    pub drop_rate_warning_threshold: f64,
    pub enable_statistics: bool,
    pub allocation_strategy: AllocationStrategy,
    pub tls_format_buffer_size: usize,
    pub worker_file_buffer_size: usize,
    pub idle_sleep_us: u64,
    pub rotation_strategy: RotationStrategy,
    pub rotation_max_file_size: u64,
    pub rotation_time_interval: TimeInterval,
    pub rotation_max_backup_files: usize,
    pub rotation_max_total_size: u64,
    pub rotation_max_age_days: u64,
    pub rotation_enable_compression: bool,
    pub rotation_naming_style: NamingStyle,
}

impl RingLogConfig {
    /// Build the [`RotationConfig`] this configuration implies.
    pub fn rotation_config(&self) -> RotationConfig {
        RotationConfig {
            strategy: self.rotation_strategy,
            max_file_size: self.rotation_max_file_size,
            time_interval: self.rotation_time_interval,
            retention: crate::rotation::RetentionPolicy {
                max_backup_files: self.rotation_max_backup_files,
                max_total_size: self.rotation_max_total_size,
                max_age_days: self.rotation_max_age_days,
            },
            enable_compression: self.rotation_enable_compression,
            naming_style: self.rotation_naming_style,
        }
    }
}

impl Default for RingLogConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            min_level: Level::Debug,
            output_target: OutputTarget::Console,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
            batch_size: DEFAULT_BATCH_SIZE,
            drop_rate_warning_threshold: DEFAULT_DROP_RATE_WARNING_THRESHOLD,
            enable_statistics: true,
            allocation_strategy: AllocationStrategy::Auto,
            tls_format_buffer_size: DEFAULT_TLS_FORMAT_BUFFER_SIZE,
            worker_file_buffer_size: DEFAULT_WORKER_FILE_BUFFER_SIZE,
            idle_sleep_us: DEFAULT_IDLE_SLEEP_US,
            rotation_strategy: RotationStrategy::SizeBased,
            rotation_max_file_size: DEFAULT_MAX_FILE_SIZE,
            rotation_time_interval: TimeInterval::Daily,
            rotation_max_backup_files: DEFAULT_MAX_BACKUP_FILES,
            rotation_max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            rotation_max_age_days: DEFAULT_MAX_AGE_DAYS,
            rotation_enable_compression: false,
            rotation_naming_style: NamingStyle::Timestamp,
        }
    }
}

/// Loads, validates, and (if absent) regenerates the on-disk configuration
/// document described in spec.md §6.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `path`. If the file does not exist, a
    /// default document is written to `path` (creating parent
    /// directories) and the built-in defaults are returned.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<RingLogConfig> {
        let path = path.as_ref();

        if !path.exists() {
            Self::write_default_document(path)?;
            return Ok(RingLogConfig::default());
        }

        let text = std::fs::read_to_string(path)?;
        let raw = parser::parse_document(&text);
        Ok(Self::validate(&raw))
    }

    /// Write the recognized-options default document to `path`, creating
    /// its parent directory if needed. Existing commented (`_`-prefixed)
    /// keys are not preserved here since there is nothing to merge yet;
    /// [`load`] preserves them on a subsequent round trip by never writing
    /// unless the file is absent.
    pub fn write_default_document(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, parser::render_default_document())
    }

    /// Validate a raw key/value map, substituting defaults (with a
    /// `tracing::warn!`) for missing, malformed, or out-of-range values.
    /// Unknown and `_`-prefixed keys are silently ignored, per spec.md §6.
    fn validate(raw: &parser::RawDocument) -> RingLogConfig {
        let defaults = RingLogConfig::default();

        let queue_capacity = raw
            .get_usize("queue_capacity")
            .map(|v| v.clamp(MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY))
            .unwrap_or_else(|| warn_default("queue_capacity", defaults.queue_capacity));

        let min_level = raw
            .get_str("min_level")
            .and_then(Level::parse)
            .unwrap_or_else(|| warn_default("min_level", defaults.min_level));

        let output_target = raw
            .get_str("output_target")
            .and_then(OutputTarget::parse)
            .unwrap_or_else(|| warn_default("output_target", defaults.output_target));

        let log_file_path = raw
            .get_str("log_file_path")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file_path);

        let batch_size = raw
            .get_usize("batch_size")
            .map(|v| v.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE))
            .unwrap_or_else(|| warn_default("batch_size", defaults.batch_size));

        let drop_rate_warning_threshold = raw
            .get_f64("drop_rate_warning_threshold")
            .map(clamp_drop_rate_threshold)
            .unwrap_or(defaults.drop_rate_warning_threshold);

        let enable_statistics = raw.get_bool("enable_statistics").unwrap_or(defaults.enable_statistics);

        let allocation_strategy = raw
            .get_str("allocation_strategy")
            .and_then(AllocationStrategy::parse)
            .unwrap_or_else(|| warn_default("allocation_strategy", defaults.allocation_strategy));

        let tls_format_buffer_size = raw.get_usize("tls_format_buffer_size").unwrap_or(defaults.tls_format_buffer_size);

        let worker_file_buffer_size = raw.get_usize("worker_file_buffer_size").unwrap_or(defaults.worker_file_buffer_size);

        let idle_sleep_us = raw.get_u64("idle_sleep_us").unwrap_or(defaults.idle_sleep_us);

        let rotation_strategy = raw
            .get_str("rotation.strategy")
            .and_then(RotationStrategy::parse)
            .unwrap_or_else(|| warn_default("rotation.strategy", defaults.rotation_strategy));

        let rotation_max_file_size = raw.get_u64("rotation.max_file_size").unwrap_or(defaults.rotation_max_file_size);

        let rotation_time_interval = raw
            .get_str("rotation.time_interval")
            .and_then(TimeInterval::parse)
            .unwrap_or_else(|| warn_default("rotation.time_interval", defaults.rotation_time_interval));

        let rotation_max_backup_files = raw.get_usize("rotation.max_backup_files").unwrap_or(defaults.rotation_max_backup_files);

        let rotation_max_total_size = raw.get_u64("rotation.max_total_size").unwrap_or(defaults.rotation_max_total_size);

        let rotation_max_age_days = raw.get_u64("rotation.max_age_days").unwrap_or(defaults.rotation_max_age_days);

        let rotation_enable_compression = raw.get_bool("rotation.enable_compression").unwrap_or(defaults.rotation_enable_compression);

        let rotation_naming_style = raw
            .get_str("rotation.naming_style")
            .and_then(NamingStyle::parse)
            .unwrap_or_else(|| warn_default("rotation.naming_style", defaults.rotation_naming_style));

        RingLogConfig {
            queue_capacity,
            min_level,
            output_target,
            log_file_path,
            batch_size,
            drop_rate_warning_threshold,
            enable_statistics,
            allocation_strategy,
            tls_format_buffer_size,
            worker_file_buffer_size,
            idle_sleep_us,
            rotation_strategy,
            rotation_max_file_size,
            rotation_time_interval,
            rotation_max_backup_files,
            rotation_max_total_size,
            rotation_max_age_days,
            rotation_enable_compression,
            rotation_naming_style,
        }
    }
}

fn warn_default<T>(key: &str, default: T) -> T {
    tracing::warn!(key, "invalid or missing configuration value, substituting default");
    default
}
