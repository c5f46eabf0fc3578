//! Flat-file gateway: the whole ledger as one JSON array.
//!
//! Every save rewrites the file. The new contents go to a temporary file in
//! the same directory which is then renamed over the old one, so a crash
//! mid-save leaves either the old ledger or the new one, never a torn file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ledgerline_core::Block;
use tempfile::NamedTempFile;

use crate::error::{PersistError, Result};
use crate::traits::{Checkpoint, PersistenceGateway};

/// JSON file gateway.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    /// Use the ledger file at `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_chain(path: &Path) -> Result<Option<Vec<Block>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if contents.trim().is_empty() {
        return Err(PersistError::Corrupt(format!(
            "{} exists but is empty",
            path.display()
        )));
    }

    let chain: Vec<Block> = serde_json::from_str(&contents)
        .map_err(|e| PersistError::Corrupt(format!("{}: {}", path.display(), e)))?;
    Ok(Some(chain))
}

fn write_chain(path: &Path, chain: &[Block]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, chain)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn load(&self) -> Result<Option<Vec<Block>>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_chain(&path))
            .await
            .map_err(|e| PersistError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }

    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()> {
        let path = self.path.clone();
        let chain = checkpoint.chain().to_vec();
        tokio::task::spawn_blocking(move || -> Result<()> {
            write_chain(&path, &chain)?;
            tracing::trace!(path = %path.display(), blocks = chain.len(), "ledger file written");
            Ok(())
        })
        .await
        .map_err(|e| PersistError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}
