//! Backup artifact production.
//!
//! # Responsibilities
//! - Drive the dump adapter, optionally through a streaming gzip encoder
//! - Compute artifact size and a streaming SHA-256 checksum
//! - Remove partial artifacts when any step fails
//!
//! # Design Decisions
//! - The artifact is never buffered whole in memory; file streams run in
//!   `spawn_blocking` with fixed-size buffers
//! - Compression rewrites dump output file-to-file, then drops the staging
//!   file, so the dump adapter stays compression-agnostic

use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::backend::adapter::{AdapterError, DumpAdapter};

/// Size and checksum of a finished artifact.
#[derive(Debug, Clone)]
pub struct ArtifactDigest {
    pub size_bytes: u64,
    pub checksum: String,
}

/// Produce the artifact at `final_path` via the dump adapter.
///
/// With compression enabled the adapter writes to a `.raw` staging path
/// which is then gzip-streamed into `final_path`.
pub async fn produce_artifact(
    dump: &dyn DumpAdapter,
    final_path: &Path,
    compress: bool,
) -> Result<(), AdapterError> {
    if let Some(parent) = final_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    if !compress {
        dump.dump(final_path).await?;
        return Ok(());
    }

    let staging = staging_path(final_path);
    let result = async {
        dump.dump(&staging).await?;
        compress_file(staging.clone(), final_path.to_path_buf()).await?;
        Ok(())
    }
    .await;

    // The staging file is dropped on both paths.
    if let Err(e) = tokio::fs::remove_file(&staging).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging file");
        }
    }

    result
}

/// Compute the size and streaming SHA-256 digest of an artifact.
pub async fn digest_artifact(path: &Path) -> Result<ArtifactDigest, AdapterError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        let mut size_bytes = 0u64;

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            size_bytes += n as u64;
        }

        Ok(ArtifactDigest {
            size_bytes,
            checksum: format!("{:x}", hasher.finalize()),
        })
    })
    .await
    .map_err(|e| AdapterError::Other(format!("digest task failed: {e}")))?
}

/// Remove a (possibly partial) artifact, tolerating a missing file.
pub async fn remove_artifact(path: &Path) -> Result<(), std::io::Error> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn staging_path(final_path: &Path) -> PathBuf {
    let mut os = final_path.as_os_str().to_owned();
    os.push(".raw");
    PathBuf::from(os)
}

/// Stream-compress `input` into `output` with gzip.
async fn compress_file(input: PathBuf, output: PathBuf) -> Result<(), AdapterError> {
    tokio::task::spawn_blocking(move || -> Result<(), AdapterError> {
        let infile = std::fs::File::open(&input)?;
        let mut reader = BufReader::new(infile);

        let outfile = std::fs::File::create(&output)?;
        let writer = BufWriter::new(outfile);
        let mut encoder = GzEncoder::new(writer, Compression::default());

        std::io::copy(&mut reader, &mut encoder)?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
        Ok(())
    })
    .await
    .map_err(|e| AdapterError::Other(format!("compression task failed: {e}")))?
}
