//! Batched file writer: amortizes syscalls over the worker's pre-allocated
//! file-batch buffer (spec.md §4.5).

use std::fs::File;
use std::io::{ self, Write };
use std::path::{ Path, PathBuf };

use crate::constants::FILE_BATCH_FLUSH_FILL_RATIO;
use crate::formatting::WorkerBuffers;
use crate::utils::now_millis;

/// Owns the open file handle and decides when the batch buffer must be
/// flushed. The backing bytes live in the worker's [`WorkerBuffers`]; this
/// type never allocates.
pub struct FileBatcher {
    file: File,
    path: PathBuf,
}

impl FileBatcher {
    /// Open (creating if necessary) the file at `path` in append mode.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, path: path.to_path_buf() })
    }

    /// Reopen (create) the file at the same path, used after a rotation
    /// rename has moved the old inode to its backup name.
    pub fn reopen(&mut self) -> io::Result<()> {
        self.file = std::fs::OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(())
    }

    /// Current log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `bytes` to the batch, flushing first if they would overflow
    /// the remaining capacity. Returns the number of bytes actually
    /// written through to the file during this call (0 if they all fit in
    /// the buffer without a flush).
    pub fn append(&mut self, buffers: &mut WorkerBuffers, bytes: &[u8]) -> io::Result<usize> {
        let capacity = buffers.file_batch_capacity();
        let mut flushed_bytes = 0;

        if bytes.len() > capacity {
            // Larger than the whole batch buffer: flush what's pending,
            // then write the oversized chunk straight through.
            flushed_bytes += self.flush(buffers)?;
            self.file.write_all(bytes)?;
            flushed_bytes += bytes.len();
            return Ok(flushed_bytes);
        }

        let current_len = buffers.file_batch_len();
        if current_len + bytes.len() > capacity {
            flushed_bytes += self.flush(buffers)?;
        }

        let len = buffers.file_batch_len();
        let batch = buffers.file_batch();
        batch[len..len + bytes.len()].copy_from_slice(bytes);
        buffers.set_file_batch_len(len + bytes.len());

        if self.should_flush(buffers) {
            flushed_bytes += self.flush(buffers)?;
        }

        Ok(flushed_bytes)
    }

    /// Whether the dual trigger (fill ratio or batch age) says this batch
    /// must be flushed now.
    pub fn should_flush(&self, buffers: &WorkerBuffers) -> bool {
        let capacity = buffers.file_batch_capacity();
        let len = buffers.file_batch_len();
        let fill_triggered = (len as f64) >= (capacity as f64) * FILE_BATCH_FLUSH_FILL_RATIO;

        let age_triggered = {
            let now = now_millis();
            let last = buffers.last_flush_ms();
            now.saturating_sub(last) >= crate::constants::FILE_BATCH_FLUSH_MAX_AGE_MS
        };

        fill_triggered || age_triggered
    }

    /// Swap the batch length to zero and write the swapped-out range to
    /// the file. A no-op (and no file touched) when the batch is empty.
    pub fn flush(&mut self, buffers: &mut WorkerBuffers) -> io::Result<usize> {
        let len = buffers.file_batch_len();
        if len == 0 {
            buffers.set_last_flush_ms(now_millis());
            return Ok(0);
        }

        buffers.set_file_batch_len(0);
        let batch = buffers.file_batch();
        self.file.write_all(&batch[..len])?;
        buffers.set_last_flush_ms(now_millis());
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_is_noop_on_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut batcher = FileBatcher::open(&path).unwrap();
        let mut buffers = WorkerBuffers::new(256, 64);

        let flushed = batcher.flush(&mut buffers).unwrap();
        assert_eq!(flushed, 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_append_accumulates_until_fill_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut batcher = FileBatcher::open(&path).unwrap();
        let mut buffers = WorkerBuffers::new(256, 10);

        // 8/10 bytes crosses the 0.8 fill ratio and must flush immediately.
        batcher.append(&mut buffers, b"12345678").unwrap();
        assert_eq!(buffers.file_batch_len(), 0);
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, b"12345678");
    }

    #[test]
    fn test_oversized_append_bypasses_batch_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut batcher = FileBatcher::open(&path).unwrap();
        let mut buffers = WorkerBuffers::new(256, 4);

        let long = vec![b'x'; 20];
        batcher.append(&mut buffers, &long).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 20);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("app.log");
        let batcher = FileBatcher::open(&path);
        assert!(batcher.is_ok());
        assert!(path.parent().unwrap().exists());
    }
}
