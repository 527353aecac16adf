//! Persistence
//!
//! The cart persists as a whole: every mutation serializes the entire
//! line-item list and hands it to a channel. Channels are string-keyed blob
//! stores scoped to one device; the store treats them as best-effort and
//! keeps the in-memory cart authoritative when a write fails.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, items::LineItem};

/// Errors raised by persistence channels.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying storage was unavailable or rejected the write.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The blob could not be serialized or parsed.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Versioned serialized shape of the whole cart.
///
/// Quantities deserialize through `NonZeroU32`, so a tampered blob with a
/// zero quantity fails to parse and the store falls back to an empty cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshotV1 {
    /// Line items in display order, newest first.
    pub items: Vec<LineItem>,
}

impl CartSnapshotV1 {
    /// Captures the current cart state.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
        }
    }

    /// Rebuilds the cart this snapshot was taken from.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        Cart::from_items(self.items)
    }
}

/// Durable key-value storage for the serialized cart.
///
/// `load` distinguishes "nothing saved yet" (`Ok(None)`) from a malformed or
/// unreadable blob (`Err`); the store maps both to an empty cart, logging
/// the latter.
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceChannel {
    /// Returns the last saved snapshot, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the blob exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Option<CartSnapshotV1>, PersistError>;

    /// Durably writes a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the blob cannot be serialized or
    /// written.
    fn save(&mut self, snapshot: &CartSnapshotV1) -> Result<(), PersistError>;

    /// Removes any saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the underlying removal fails.
    fn clear(&mut self) -> Result<(), PersistError>;
}

/// In-memory channel holding the serialized blob as a string.
///
/// Mirrors browser local-storage semantics and backs most tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    blob: Option<String>,
}

impl MemoryChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel pre-seeded with a raw blob, valid or not.
    #[must_use]
    pub fn with_raw(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    /// Returns the raw stored blob, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl PersistenceChannel for MemoryChannel {
    fn load(&self) -> Result<Option<CartSnapshotV1>, PersistError> {
        match &self.blob {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &CartSnapshotV1) -> Result<(), PersistError> {
        self.blob = Some(serde_json::to_string(snapshot)?);

        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.blob = None;

        Ok(())
    }
}

/// Channel storing the blob as a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileChannel {
    path: PathBuf,
}

impl JsonFileChannel {
    /// Creates a channel backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceChannel for JsonFileChannel {
    fn load(&self) -> Result<Option<CartSnapshotV1>, PersistError> {
        let blob = match fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&blob)?))
    }

    fn save(&mut self, snapshot: &CartSnapshotV1) -> Result<(), PersistError> {
        let blob = serde_json::to_string(snapshot)?;

        fs::write(&self.path, blob)?;

        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
