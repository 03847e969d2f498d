//! Streaming SHA-256 fingerprint of the audited binary via `ring::digest`.

use ring::digest::{Context, SHA256};
use sshd_audit_core::{AuditError, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Buffer size for streaming file reads (64 KiB).
const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file without loading it into memory.
///
/// Returns lowercase hex-encoded digest.
///
/// # Errors
///
/// Returns `AuditError::Io` if the file cannot be opened or read.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AuditError::io(path, e))?;

    let mut context = Context::new(&SHA256);
    let mut buf = vec![0u8; BUF_SIZE];

    loop {
        let n = file.read(&mut buf).await.map_err(|e| AuditError::io(path, e))?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
    }

    Ok(hex::encode(context.finish().as_ref()))
}
