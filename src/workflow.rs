//! Project status workflow.
//!
//! Six fixed states with two guided transitions (`advance` and
//! `request_changes`) layered on top of an otherwise free status field.
//! Everything here is pure; persisting the result is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    EditorReview,
    ClientReview,
    NeedsRevision,
    Approved,
    FinalDelivered,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Draft,
        ProjectStatus::EditorReview,
        ProjectStatus::ClientReview,
        ProjectStatus::NeedsRevision,
        ProjectStatus::Approved,
        ProjectStatus::FinalDelivered,
    ];

    /// Status every new project starts in.
    pub const INITIAL: ProjectStatus = ProjectStatus::Draft;

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::EditorReview => "editor_review",
            ProjectStatus::ClientReview => "client_review",
            ProjectStatus::NeedsRevision => "needs_revision",
            ProjectStatus::Approved => "approved",
            ProjectStatus::FinalDelivered => "final_delivered",
        }
    }

    /// Human-readable name, used in `last_activity` labels.
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "Draft",
            ProjectStatus::EditorReview => "Editor Review",
            ProjectStatus::ClientReview => "Client Review",
            ProjectStatus::NeedsRevision => "Needs Revision",
            ProjectStatus::Approved => "Approved",
            ProjectStatus::FinalDelivered => "Final Delivered",
        }
    }

    /// Parses one of the six current status names. Legacy names are not
    /// accepted here; see [`ProjectStatus::from_stored`].
    pub fn parse(value: &str) -> Option<ProjectStatus> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
    }

    /// Normalises a value read from the `projects.status` column.
    ///
    /// Rows written by older releases may carry `in_progress` or
    /// `pending_review`; anything unrecognised falls back to `draft`.
    /// The result must not be written back unless a status action runs.
    pub fn from_stored(value: &str) -> ProjectStatus {
        if let Some(status) = ProjectStatus::parse(value) {
            return status;
        }
        match value {
            "in_progress" => ProjectStatus::Draft,
            "pending_review" => ProjectStatus::ClientReview,
            _ => ProjectStatus::Draft,
        }
    }

    /// Stored column values that normalise to `self`. Used to filter by
    /// status in SQL; arbitrary unrecognised values are not covered.
    pub fn stored_aliases(self) -> &'static [&'static str] {
        match self {
            ProjectStatus::Draft => &["draft", "in_progress"],
            ProjectStatus::EditorReview => &["editor_review"],
            ProjectStatus::ClientReview => &["client_review", "pending_review"],
            ProjectStatus::NeedsRevision => &["needs_revision"],
            ProjectStatus::Approved => &["approved"],
            ProjectStatus::FinalDelivered => &["final_delivered"],
        }
    }

    /// The "send to next stage" transition. `final_delivered` maps to itself.
    pub fn advance(self) -> ProjectStatus {
        match self {
            ProjectStatus::Draft => ProjectStatus::EditorReview,
            ProjectStatus::EditorReview => ProjectStatus::ClientReview,
            ProjectStatus::ClientReview => ProjectStatus::Approved,
            ProjectStatus::NeedsRevision => ProjectStatus::EditorReview,
            ProjectStatus::Approved => ProjectStatus::FinalDelivered,
            ProjectStatus::FinalDelivered => ProjectStatus::FinalDelivered,
        }
    }

    /// Unconditionally `needs_revision`. Callers gate the action with
    /// [`ProjectStatus::can_request_changes`].
    pub fn request_changes(self) -> ProjectStatus {
        ProjectStatus::NeedsRevision
    }

    pub fn can_request_changes(self) -> bool {
        matches!(
            self,
            ProjectStatus::EditorReview | ProjectStatus::ClientReview
        )
    }

    /// Free-choice override; no legality check against the advance graph.
    pub fn set_status(self, requested: ProjectStatus) -> ProjectStatus {
        requested
    }

    pub fn is_terminal(self) -> bool {
        self.advance() == self
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
