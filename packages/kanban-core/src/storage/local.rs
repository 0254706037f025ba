/// JSON-file board store.
///
/// Keeps the whole board in memory and rewrites the file after every
/// mutation with:
/// - Atomic writes (write to .tmp, fsync, rename)
/// - SHA-256 content hashing, so a mutation that leaves the serialized board
///   unchanged does not touch the disk
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use super::memory::BoardData;
use super::{BoardStore, StoreError};
use crate::order::{OrderMap, OrderPatch};
use crate::types::{Card, CardId, ColumnRecord};

struct FileState {
    data: BoardData,
    /// SHA-256 of the content last read from or written to disk
    content_hash: String,
}

pub struct LocalStore {
    file_path: PathBuf,
    state: Mutex<FileState>,
}

impl LocalStore {
    /// Open the board file at `file_path`. A missing file is created holding
    /// `seed_columns`; a file that does not parse is an error.
    pub fn open(file_path: &Path, seed_columns: Vec<ColumnRecord>) -> Result<Self, StoreError> {
        let (data, content_hash) = match fs::read_to_string(file_path) {
            Ok(content) => {
                let data: BoardData = serde_json::from_str(&content)?;
                log::info!(
                    "[kanban.store] Loaded {} ({} columns, {} cards)",
                    file_path.display(),
                    data.columns.len(),
                    data.cards.len()
                );
                (data, Self::content_hash(&content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let data = BoardData::seeded(seed_columns);
                let content = serde_json::to_string_pretty(&data)?;
                if let Some(dir) = file_path.parent() {
                    if !dir.as_os_str().is_empty() {
                        fs::create_dir_all(dir)?;
                    }
                }
                Self::atomic_write(file_path, &content)?;
                log::info!(
                    "[kanban.store] Created {} with {} columns",
                    file_path.display(),
                    data.columns.len()
                );
                (data, Self::content_hash(&content))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            file_path: file_path.to_path_buf(),
            state: Mutex::new(FileState { data, content_hash }),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Compute SHA-256 hash of content (for change detection).
    fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.replace("\r\n", "\n").as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Write `data` unless it serializes to the content already on disk, then
    /// make it the current board. On a failed write the current board is kept,
    /// so memory never gets ahead of the file. Returns whether the file was
    /// written.
    ///
    /// The write itself runs on the blocking pool.
    async fn commit(&self, state: &mut FileState, data: BoardData) -> Result<bool, StoreError> {
        let content = serde_json::to_string_pretty(&data)?;
        let hash = Self::content_hash(&content);
        let written = if hash == state.content_hash {
            log::debug!(
                "[kanban.store] {} unchanged, skipping write",
                self.file_path.display()
            );
            false
        } else {
            let path = self.file_path.clone();
            tokio::task::spawn_blocking(move || Self::atomic_write(&path, &content))
                .await
                .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
                .inspect_err(|e| {
                    log::error!(
                        "[kanban.store] Write to {} failed: {}",
                        self.file_path.display(),
                        e
                    )
                })?;
            state.content_hash = hash;
            true
        };
        state.data = data;
        Ok(written)
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BoardStore for LocalStore {
    async fn load_columns(&self) -> Result<Vec<ColumnRecord>, StoreError> {
        Ok(self.state.lock().await.data.columns.clone())
    }

    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.state.lock().await.data.cards.clone())
    }

    async fn load_order(&self) -> Result<OrderMap, StoreError> {
        Ok(self.state.lock().await.data.order.clone())
    }

    async fn create_card(&self, card: &Card) -> Result<Card, StoreError> {
        let mut state = self.state.lock().await;
        let mut data = state.data.clone();
        data.upsert_card(card);
        self.commit(&mut state, data).await?;
        Ok(card.clone())
    }

    async fn delete_card(&self, id: &CardId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let mut data = state.data.clone();
        data.remove_card(id)?;
        self.commit(&mut state, data).await?;
        Ok(())
    }

    async fn patch_order(&self, patch: &OrderPatch) -> Result<OrderMap, StoreError> {
        let mut state = self.state.lock().await;
        let mut data = state.data.clone();
        data.order.merge(patch);
        self.commit(&mut state, data).await?;
        Ok(state.data.order.clone())
    }
}
