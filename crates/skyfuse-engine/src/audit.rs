//! The persistent audit trail.
//!
//! One line per fused update. Field order and the empty placeholders for
//! absent values are fixed; downstream consumers parse these lines
//! positionally.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use parking_lot::{Mutex, RwLock};

use crate::domain::TrackSnapshot;
use crate::error::Result;

/// One fused update, flattened for the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Track key
    pub radar_id: String,
    /// Raw feed identifier, empty when the track never carried one
    pub identifier: String,
    /// Callsign at the time of the update
    pub callsign: String,
    /// Status display form
    pub status: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Ground speed
    pub velocity: Option<f64>,
    /// Barometric altitude
    pub barometric_altitude: Option<f64>,
    /// Geometric altitude
    pub geometric_altitude: Option<f64>,
    /// Heading in degrees
    pub heading: Option<f64>,
}

impl AuditRecord {
    /// Flattens a snapshot into a record.
    #[must_use]
    pub fn from_snapshot(snapshot: &TrackSnapshot) -> Self {
        Self {
            radar_id: snapshot.key.as_str().to_string(),
            identifier: snapshot.identifier.clone().unwrap_or_default(),
            callsign: snapshot.callsign.clone(),
            status: snapshot.status.as_str().to_string(),
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            velocity: snapshot.velocity,
            barometric_altitude: snapshot.barometric_altitude,
            geometric_altitude: snapshot.geometric_altitude,
            heading: snapshot.heading,
        }
    }

    /// Renders the comma-separated line, without a trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.radar_id,
            self.identifier,
            self.callsign,
            self.status,
            self.latitude,
            self.longitude,
            optional(self.velocity),
            optional(self.barometric_altitude),
            optional(self.geometric_altitude),
            optional(self.heading),
        )
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Receives one record per fused update.
///
/// Called from the engine's event loop; implementations must not block for
/// long and must never panic on write failure.
pub trait AuditSink: Send + Sync {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be persisted; the engine
    /// logs it and carries on.
    fn record(&self, record: &AuditRecord) -> Result<()>;
}

/// Appends one line per record to a file.
pub struct FileAuditSink {
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, record: &AuditRecord) -> Result<()> {
        let mut file = self.file.lock();
        writeln!(file, "{}", record.to_line())?;
        Ok(())
    }
}

/// Keeps records in memory, for tests and inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: &AuditRecord) -> Result<()> {
        self.records.write().push(record.clone());
        Ok(())
    }
}
