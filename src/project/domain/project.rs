//! Project aggregate root and related scalar types.

use super::{ParseDeadlineError, ProjectDomainError, ProjectId};
use crate::identity::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TITLE_LENGTH: usize = 100;

/// Date format accepted for deadlines throughout the crate.
const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Validated project title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTitle(String);

impl ProjectTitle {
    /// Creates a validated project title.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTitle`] when the value is empty
    /// after trimming or exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > MAX_TITLE_LENGTH {
            return Err(ProjectDomainError::InvalidTitle(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date-only deadline used by projects, tasks, and subtasks.
///
/// Deadline comparisons throughout the crate are date-only; callers submit
/// the `YYYY-MM-DD` form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Deadline(NaiveDate);

impl Deadline {
    /// Parses a deadline from its `YYYY-MM-DD` form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseDeadlineError`] when the value does not parse.
    pub fn parse(value: &str) -> Result<Self, ParseDeadlineError> {
        NaiveDate::parse_from_str(value.trim(), DEADLINE_FORMAT)
            .map(Self)
            .map_err(|_| ParseDeadlineError(value.to_owned()))
    }

    /// Creates a deadline from an already-parsed date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the wrapped date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEADLINE_FORMAT))
    }
}

/// Project aggregate root.
///
/// The creator is fixed at construction; no mutator exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: ProjectTitle,
    description: String,
    skills_required: Option<String>,
    deadline: Option<Deadline>,
    creator_id: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted title.
    pub title: ProjectTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted skills text, if any.
    pub skills_required: Option<String>,
    /// Persisted deadline, if any.
    pub deadline: Option<Deadline>,
    /// Persisted creator identifier.
    pub creator_id: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `creator_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyDescription`] when the description
    /// is empty after trimming.
    pub fn new(
        title: ProjectTitle,
        description: impl Into<String>,
        creator_id: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let description_text = description.into();
        if description_text.trim().is_empty() {
            return Err(ProjectDomainError::EmptyDescription);
        }

        Ok(Self {
            id: ProjectId::new(),
            title,
            description: description_text,
            skills_required: None,
            deadline: None,
            creator_id,
            created_at: clock.utc(),
        })
    }

    /// Sets the skills text shown to prospective applicants.
    #[must_use]
    pub fn with_skills_required(mut self, skills: impl Into<String>) -> Self {
        self.skills_required = Some(skills.into());
        self
    }

    /// Sets the project deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            skills_required: data.skills_required,
            deadline: data.deadline,
            creator_id: data.creator_id,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project title.
    #[must_use]
    pub const fn title(&self) -> &ProjectTitle {
        &self.title
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the skills text, if any.
    #[must_use]
    pub fn skills_required(&self) -> Option<&str> {
        self.skills_required.as_deref()
    }

    /// Returns the project deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Returns the creator's user identifier.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the project deadline.
    pub const fn set_deadline(&mut self, deadline: Deadline) {
        self.deadline = Some(deadline);
    }
}
