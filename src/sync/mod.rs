//! Cloud sync collaborator.
//!
//! Sync sits behind a trait so the store never depends on a concrete
//! provider; it is fire-and-forget and has no bearing on the store's
//! consistency. The one shipped provider simulates a Drive round trip
//! with a fixed latency and always succeeds.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::model::{Folder, Note, Tag};

/// The collections handed to a provider for upload.
#[derive(Debug, Clone, Copy)]
pub struct SyncSnapshot<'a> {
    pub notes: &'a [Note],
    pub folders: &'a [Folder],
    pub tags: &'a [Tag],
}

/// What a completed sync covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub provider: String,
    pub notes: usize,
    pub folders: usize,
    pub tags: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("cloud sync is disabled (enable with `nf sync --enable`)")]
    Disabled,
    #[error("unknown sync provider '{0}'")]
    UnknownProvider(String),
    #[error("sync provider failed: {0}")]
    Provider(String),
}

/// A cloud sync backend.
pub trait CloudSync: std::fmt::Debug {
    fn provider_name(&self) -> &str;

    /// Push a snapshot of all collections to the provider.
    fn sync(&mut self, snapshot: &SyncSnapshot<'_>) -> Result<SyncReport, SyncError>;
}

/// Simulated Google Drive sync: waits out a configured latency and
/// reports success. No data leaves the machine.
#[derive(Debug)]
pub struct SimulatedDriveSync {
    latency: Duration,
}

impl SimulatedDriveSync {
    pub fn new(latency: Duration) -> Self {
        SimulatedDriveSync { latency }
    }
}

impl CloudSync for SimulatedDriveSync {
    fn provider_name(&self) -> &str {
        "drive"
    }

    fn sync(&mut self, snapshot: &SyncSnapshot<'_>) -> Result<SyncReport, SyncError> {
        tracing::debug!(
            notes = snapshot.notes.len(),
            folders = snapshot.folders.len(),
            tags = snapshot.tags.len(),
            "simulated drive sync"
        );
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        Ok(SyncReport {
            provider: self.provider_name().to_string(),
            notes: snapshot.notes.len(),
            folders: snapshot.folders.len(),
            tags: snapshot.tags.len(),
            completed_at: Utc::now(),
        })
    }
}

/// Resolve a provider by its configured name.
pub fn provider_for(name: &str, latency: Duration) -> Result<Box<dyn CloudSync>, SyncError> {
    match name {
        "drive" => Ok(Box::new(SimulatedDriveSync::new(latency))),
        other => Err(SyncError::UnknownProvider(other.to_string())),
    }
}
