//! Upload ingestion configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of files accepted in a single batch.
    #[serde(default = "default_max_batch_files")]
    pub max_batch_files: usize,
    /// Maximum size of a single file in bytes (default 2 GiB).
    ///
    /// An oversized file is rejected individually; the rest of the batch
    /// still goes through.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_batch_files: default_max_batch_files(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

fn default_max_batch_files() -> usize {
    10
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024 * 1024
}
