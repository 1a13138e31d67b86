use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CaseId, UserId};

/// Lifecycle status of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Newly created, not yet picked up by an advisor.
    #[default]
    Pending,
    /// Accepted by an advisor.
    Open,
    /// Work on the case is under way.
    InProgress,
    /// Resolved or withdrawn.
    Closed,
}

impl CaseStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Open, Self::InProgress, Self::Closed];

    /// The wire and storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`CaseStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown case status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CaseStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// A client's request for legal assistance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "id": "01920d3e-5b7a-7c3e-9a41-2f0c4e8b1d22",
    "user_id": "u1",
    "title": "Divorcio",
    "description": "Necesito ayuda legal con mi divorcio",
    "status": "pending",
    "created_at": "2025-01-01T00:00:00Z",
    "updated_at": "2025-01-01T00:00:00Z"
})))]
pub struct Case {
    /// Unique case identifier.
    pub id: CaseId,
    /// Owning user. Never changes after creation.
    pub user_id: UserId,
    /// Short summary of the matter.
    pub title: String,
    /// Free-text account of the situation.
    pub description: String,
    /// Current lifecycle status.
    pub status: CaseStatus,
    /// When the case was created.
    pub created_at: DateTime<Utc>,
    /// When the case was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
}

impl NewCase {
    /// Materialize a pending [`Case`] with the given identifier and timestamp.
    #[must_use]
    pub fn into_case(self, id: CaseId, now: DateTime<Utc>) -> Case {
        Case {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: CaseStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(CaseStatus::default(), CaseStatus::Pending);
    }

    #[test]
    fn status_parses_every_variant() {
        for status in CaseStatus::ALL {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown() {
        let err = "archived".parse::<CaseStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown case status: archived");
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CaseStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn new_case_materializes_pending() {
        let now = Utc::now();
        let id = CaseId::generate();
        let case = NewCase {
            user_id: UserId::from("u1"),
            title: "Divorcio".into(),
            description: "Necesito ayuda legal con mi divorcio".into(),
        }
        .into_case(id, now);

        assert_eq!(case.id, id);
        assert_eq!(case.status, CaseStatus::Pending);
        assert_eq!(case.created_at, case.updated_at);
    }
}
