//! # Project Data Structures
//!
//! `SplicedProject` is the root container persisted to `.sgp` files as
//! human-readable JSON. It owns the bridge framing, the construction timeline,
//! the ID allocator and every girder, so one file restores the whole model.
//!
//! ## Structure
//!
//! ```text
//! SplicedProject
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (defaults for new segments and closures)
//! ├── bridge: BridgeFraming (piers, temporary supports)
//! ├── timeline: Timeline (construction events)
//! ├── ids: SequentialIds (next segment / closure IDs)
//! └── girders: HashMap<Uuid, SplicedGirder>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use splice_core::project::{FramingEdit, SplicedProject};
//! use splice_core::bridge::TemporarySupportKind;
//! use splice_core::ids::PierId;
//!
//! let mut project = SplicedProject::new("Jane Engineer", "25-042", "DOT District 4");
//! project.bridge.add_pier(0.0).unwrap();
//! project.bridge.add_pier(240.0).unwrap();
//! let id = project.add_girder(PierId(0), PierId(1));
//!
//! let tower = project
//!     .bridge
//!     .add_temporary_support(120.0, TemporarySupportKind::ErectionTower)
//!     .unwrap();
//! let report = project.apply_framing_edit(FramingEdit::split_at_temporary_support(tower)).unwrap();
//! assert_eq!(report.edited, vec![id]);
//! assert_eq!(project.get_girder(&id).unwrap().segment_count(), 2);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::bridge::BridgeFraming;
use crate::closure::ClosureSupport;
use crate::editor::{PreparedJoin, PreparedSplit, TopologyEditor};
use crate::errors::{GirderError, GirderResult};
use crate::girder::SplicedGirder;
use crate::ids::{PierId, SequentialIds, TemporarySupportId};
use crate::materials::ConcreteMaterial;
use crate::profile::VariationProfile;
use crate::timeline::{Timeline, TimelineManager};

/// Current schema version for .sgp files.
///
/// 1.1 added segment top-flange width data.
pub const SCHEMA_VERSION: &str = "1.1.0";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplicedProject {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: GlobalSettings,

    pub bridge: BridgeFraming,

    pub timeline: Timeline,

    /// Allocator for segment and closure IDs across all girders
    pub ids: SequentialIds,

    /// All girders, keyed by UUID
    pub girders: HashMap<Uuid, SplicedGirder>,
}

impl SplicedProject {
    /// Create a new empty project.
    ///
    /// ```rust
    /// use splice_core::project::SplicedProject;
    ///
    /// let project = SplicedProject::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert!(project.girders.is_empty());
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        SplicedProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            bridge: BridgeFraming::new(),
            timeline: Timeline::new(),
            ids: SequentialIds::default(),
            girders: HashMap::new(),
        }
    }

    /// Add a one-segment girder between two piers using the default
    /// prismatic section. Returns the UUID assigned to the girder.
    pub fn add_girder(&mut self, start_pier: PierId, end_pier: PierId) -> Uuid {
        let profile = self.settings.default_profile();
        let mut girder = SplicedGirder::new(start_pier, end_pier, &mut self.ids, profile);
        girder.resolve_spans(&self.bridge);

        let id = Uuid::new_v4();
        info!(girder = %id, start = %start_pier, end = %end_pier, "girder added");
        self.girders.insert(id, girder);
        self.touch();
        id
    }

    /// Remove a girder, dropping its segments and closures from the timeline.
    pub fn remove_girder(&mut self, id: &Uuid) -> Option<SplicedGirder> {
        let girder = self.girders.remove(id)?;
        for segment in girder.segments() {
            self.timeline.remove_segment(segment.id);
        }
        for closure in girder.closures() {
            self.timeline.remove_closure(closure.id);
        }
        self.touch();
        Some(girder)
    }

    pub fn get_girder(&self, id: &Uuid) -> Option<&SplicedGirder> {
        self.girders.get(id)
    }

    /// Mutable access marks the project as modified.
    pub fn get_girder_mut(&mut self, id: &Uuid) -> Option<&mut SplicedGirder> {
        if self.girders.contains_key(id) {
            self.meta.modified = Utc::now();
            self.girders.get_mut(id)
        } else {
            None
        }
    }

    pub fn girder_count(&self) -> usize {
        self.girders.len()
    }

    /// Girder IDs in a stable order
    pub fn girder_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.girders.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Split or join every girder a support change affects.
    ///
    /// All girders are checked before any is edited. Girders that do not
    /// cross the support (split) or have no closure on it (join) are left
    /// alone; any other refusal aborts the edit with the project untouched.
    pub fn apply_framing_edit(&mut self, edit: FramingEdit) -> GirderResult<FramingEditReport> {
        let order = self.girder_ids();
        let SplicedProject {
            bridge,
            timeline,
            ids,
            girders,
            settings,
            ..
        } = &mut *self;
        let mut editor =
            TopologyEditor::new(&*bridge, timeline, ids).with_closure_concrete(settings.default_closure_concrete.clone());

        let edited = match edit {
            FramingEdit::SplitAt(support) => {
                let mut prepared: Vec<(Uuid, PreparedSplit)> = Vec::new();
                for id in &order {
                    let Some(girder) = girders.get(id) else { continue };
                    match editor.prepare_split(girder, support) {
                        Ok(split) => prepared.push((*id, split)),
                        Err(GirderError::SupportNotOnGirder { .. }) => {}
                        Err(e) => return Err(e),
                    }
                }
                let mut edited = Vec::with_capacity(prepared.len());
                for (id, split) in prepared {
                    if let Some(girder) = girders.get_mut(&id) {
                        editor.commit_split(girder, split)?;
                        edited.push(id);
                    }
                }
                edited
            }
            FramingEdit::JoinAt(support) => {
                let mut prepared: Vec<(Uuid, PreparedJoin)> = Vec::new();
                for id in &order {
                    let Some(girder) = girders.get(id) else { continue };
                    match editor.prepare_join(girder, support) {
                        Ok(join) => prepared.push((*id, join)),
                        Err(GirderError::ClosureNotFound { .. }) => {}
                        Err(e) => return Err(e),
                    }
                }
                let mut edited = Vec::with_capacity(prepared.len());
                for (id, join) in prepared {
                    if let Some(girder) = girders.get_mut(&id) {
                        editor.commit_join(girder, join)?;
                        edited.push(id);
                    }
                }
                edited
            }
        };

        info!(edit = ?edit, girders = edited.len(), "framing edit applied");
        if !edited.is_empty() {
            self.touch();
        }
        Ok(FramingEditReport { edit, edited })
    }
}

impl Default for SplicedProject {
    fn default() -> Self {
        SplicedProject::new("", "", "")
    }
}

/// A change to a girder line's framing at one support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FramingEdit {
    /// A support was added under the girders: place a closure on it
    SplitAt(ClosureSupport),
    /// A closure is being removed from a support
    JoinAt(ClosureSupport),
}

impl FramingEdit {
    pub fn split_at_pier(pier: PierId) -> Self {
        FramingEdit::SplitAt(ClosureSupport::Pier(pier))
    }

    pub fn split_at_temporary_support(support: TemporarySupportId) -> Self {
        FramingEdit::SplitAt(ClosureSupport::TemporarySupport(support))
    }

    pub fn join_at_pier(pier: PierId) -> Self {
        FramingEdit::JoinAt(ClosureSupport::Pier(pier))
    }

    pub fn join_at_temporary_support(support: TemporarySupportId) -> Self {
        FramingEdit::JoinAt(ClosureSupport::TemporarySupport(support))
    }
}

/// Girders changed by a framing edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingEditReport {
    pub edit: FramingEdit,
    pub edited: Vec<Uuid>,
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Defaults applied to new girders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_segment_height_ft")]
    pub default_segment_height_ft: f64,

    #[serde(default = "default_bottom_flange_depth_ft")]
    pub default_bottom_flange_depth_ft: f64,

    /// Concrete for the first closure cast on a girder
    #[serde(default)]
    pub default_closure_concrete: ConcreteMaterial,
}

fn default_segment_height_ft() -> f64 {
    6.0
}

fn default_bottom_flange_depth_ft() -> f64 {
    0.75
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            default_segment_height_ft: default_segment_height_ft(),
            default_bottom_flange_depth_ft: default_bottom_flange_depth_ft(),
            default_closure_concrete: ConcreteMaterial::default(),
        }
    }
}

impl GlobalSettings {
    /// Prismatic profile for new segments
    pub fn default_profile(&self) -> VariationProfile {
        VariationProfile::constant(self.default_segment_height_ft, self.default_bottom_flange_depth_ft)
    }
}
