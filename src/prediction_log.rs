// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Append-only prediction log
//!
//! Each entry is the result serialized to a string and then JSON-encoded a
//! second time, so the file holds escaped string literals rather than JSON
//! objects. Entries are written back to back with no separator, so once a
//! second entry lands the file is neither JSON nor JSON lines.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Encode one log entry: `json(json(value))`.
pub fn encode_log_entry<T: Serialize>(value: &T) -> Result<String> {
    let stringified = serde_json::to_string(value).context("Failed to serialize prediction")?;
    serde_json::to_string(&stringified).context("Failed to encode prediction log entry")
}

/// Append one entry to `path`, creating the file if needed.
///
/// The file is opened and closed per call; concurrent appends are not
/// serialized. Returns the number of bytes written.
pub async fn append_log_entry<T: Serialize>(path: &Path, value: &T) -> Result<usize> {
    let entry = encode_log_entry(value)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open prediction log {}", path.display()))?;

    file.write_all(entry.as_bytes())
        .await
        .with_context(|| format!("Failed to write prediction log {}", path.display()))?;
    file.flush().await?;

    debug!("Appended {} bytes to {}", entry.len(), path.display());
    Ok(entry.len())
}
