//! Document tree - folders of placemarks making up a flight log.
//!
//! The root owns exactly three folders, always exported in this order:
//!
//! | Key       | Name                          | Contents                        |
//! |-----------|-------------------------------|---------------------------------|
//! | `Flight`  | "Flight"                      | subfolder `FlightLog <start>`   |
//! | `Special` | "Special placemarks"          | named notable points            |
//! | `Data`    | "Flight data"                 | simplified annotated points     |
//!
//! Folders are append-only. The track builders never hold references into
//! the tree; they look up the latest placemark each time they need it.

pub mod export;
mod placemark;

use chrono::{DateTime, Local, SecondsFormat};
use thiserror::Error;

pub use export::{to_kml, to_kml_string, write_kml, ExportError};
pub use placemark::{
    describe_sample, AltitudeMode, Coordinate, Geometry, LineString, Placemark,
    DEFAULT_GROUND_ALTITUDE, FLIGHT_STYLE_URL, IN_THE_AIR_NAME, ON_GROUND_NAME,
};

/// Errors from document tree lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The folder has no placemarks yet.
    #[error("folder '{0}' has no placemarks")]
    NoPlacemarks(String),

    /// The folder has no subfolder.
    #[error("folder '{0}' has no subfolder")]
    NoSubfolder(String),
}

/// Top-level folders of a flight log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderKey {
    Flight,
    Special,
    Data,
}

impl FolderKey {
    /// All keys in export order.
    pub const ALL: [FolderKey; 3] = [FolderKey::Flight, FolderKey::Special, FolderKey::Data];
}

/// A named, ordered collection of placemarks with an optional subfolder.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    name: String,
    placemarks: Vec<Placemark>,
    subfolder: Option<Box<Folder>>,
}

impl Folder {
    /// Create an empty folder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placemarks: Vec::new(),
            subfolder: None,
        }
    }

    /// Attach a subfolder.
    pub fn with_subfolder(mut self, subfolder: Folder) -> Self {
        self.subfolder = Some(Box::new(subfolder));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    pub fn subfolder(&self) -> Option<&Folder> {
        self.subfolder.as_deref()
    }

    pub fn subfolder_mut(&mut self) -> Option<&mut Folder> {
        self.subfolder.as_deref_mut()
    }

    /// Append a placemark.
    pub fn add_placemark(&mut self, placemark: Placemark) {
        self.placemarks.push(placemark);
    }

    /// The most recently added placemark.
    pub fn latest_placemark(&self) -> Result<&Placemark, DocumentError> {
        self.placemarks
            .last()
            .ok_or_else(|| DocumentError::NoPlacemarks(self.name.clone()))
    }

    /// Mutable access to the most recently added placemark.
    pub fn latest_placemark_mut(&mut self) -> Result<&mut Placemark, DocumentError> {
        let name = &self.name;
        self.placemarks
            .last_mut()
            .ok_or_else(|| DocumentError::NoPlacemarks(name.clone()))
    }

    /// Number of placemarks, including those of nested subfolders.
    pub fn total_placemarks(&self) -> usize {
        self.placemarks.len() + self.subfolder().map_or(0, Folder::total_placemarks)
    }
}

/// The flight log being recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    started_at: DateTime<Local>,
    flight: Folder,
    special: Folder,
    data: Folder,
}

impl DocumentTree {
    /// Create an empty tree for a session started at `started_at`.
    pub fn new(started_at: DateTime<Local>) -> Self {
        let flight_log = Folder::new(format!("FlightLog {}", rfc3339(started_at)));
        Self {
            started_at,
            flight: Folder::new("Flight").with_subfolder(flight_log),
            special: Folder::new("Special placemarks"),
            data: Folder::new("Flight data"),
        }
    }

    /// When the session that owns this tree started.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn folder(&self, key: FolderKey) -> &Folder {
        match key {
            FolderKey::Flight => &self.flight,
            FolderKey::Special => &self.special,
            FolderKey::Data => &self.data,
        }
    }

    pub fn folder_mut(&mut self, key: FolderKey) -> &mut Folder {
        match key {
            FolderKey::Flight => &mut self.flight,
            FolderKey::Special => &mut self.special,
            FolderKey::Data => &mut self.data,
        }
    }

    /// Folders in export order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        FolderKey::ALL.into_iter().map(|key| self.folder(key))
    }

    /// Append a placemark to a top-level folder.
    pub fn add_placemark(&mut self, key: FolderKey, placemark: Placemark) {
        self.folder_mut(key).add_placemark(placemark);
    }

    /// Append a placemark to a top-level folder's subfolder.
    pub fn add_placemark_to_subfolder(
        &mut self,
        key: FolderKey,
        placemark: Placemark,
    ) -> Result<(), DocumentError> {
        self.subfolder_mut(key)?.add_placemark(placemark);
        Ok(())
    }

    /// Latest placemark of a top-level folder.
    pub fn latest_placemark(&self, key: FolderKey) -> Result<&Placemark, DocumentError> {
        self.folder(key).latest_placemark()
    }

    /// Mutable latest placemark of a top-level folder.
    pub fn latest_placemark_mut(&mut self, key: FolderKey) -> Result<&mut Placemark, DocumentError> {
        self.folder_mut(key).latest_placemark_mut()
    }

    /// Latest placemark of a top-level folder's subfolder.
    pub fn latest_subfolder_placemark(&self, key: FolderKey) -> Result<&Placemark, DocumentError> {
        let folder = self.folder(key);
        folder
            .subfolder()
            .ok_or_else(|| DocumentError::NoSubfolder(folder.name().to_string()))?
            .latest_placemark()
    }

    /// Mutable latest placemark of a top-level folder's subfolder.
    pub fn latest_subfolder_placemark_mut(
        &mut self,
        key: FolderKey,
    ) -> Result<&mut Placemark, DocumentError> {
        self.subfolder_mut(key)?.latest_placemark_mut()
    }

    /// Total placemarks across every folder.
    pub fn total_placemarks(&self) -> usize {
        self.folders().map(Folder::total_placemarks).sum()
    }

    fn subfolder_mut(&mut self, key: FolderKey) -> Result<&mut Folder, DocumentError> {
        let folder = self.folder_mut(key);
        let name = folder.name().to_string();
        folder
            .subfolder_mut()
            .ok_or(DocumentError::NoSubfolder(name))
    }
}

/// Format a timestamp the way folder and document names embed it.
pub fn rfc3339(timestamp: DateTime<Local>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
