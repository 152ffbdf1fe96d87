use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An Εξοικονομώ retrofit project (or the offer that precedes one).
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Project {
    /// UUID of the project
    pub id: Uuid,
    /// Title of the project
    pub title: String,
    /// Free-text description
    pub description: Option<String>,
    /// Programme application number (e.g. "61-038111")
    pub application_number: Option<String>,
    /// Owning contact, if linked
    pub owner_id: Option<Uuid>,
    /// Display name of the owner, copied at write time. Not kept in sync
    /// when the contact is renamed; `project sync-owners` repairs drift.
    pub owner_name: Option<String>,
    /// Deadline of the project
    pub deadline: Option<Date>,
    /// Persisted status
    pub status: ProjectStatus,
    /// Created at timestamp of the project
    pub created_at: Timestamp,
}

/// Persisted project status. Serialized with the Greek values the store
/// files have always carried.
#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Προσφορά")]
    Offer,
    #[serde(rename = "Ενεργό")]
    Active,
    #[serde(rename = "Ολοκληρωμένο")]
    Completed,
    #[serde(rename = "Ακυρωμένο")]
    Cancelled,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Offer => "Προσφορά",
            ProjectStatus::Active => "Ενεργό",
            ProjectStatus::Completed => "Ολοκληρωμένο",
            ProjectStatus::Cancelled => "Ακυρωμένο",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown project status '{0}'. Use offer, active, completed or cancelled")]
pub struct ParseStatusError(String);

impl FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "offer" | "προσφορά" => Ok(ProjectStatus::Offer),
            "active" | "ενεργό" => Ok(ProjectStatus::Active),
            "completed" | "done" | "ολοκληρωμένο" => Ok(ProjectStatus::Completed),
            "cancelled" | "canceled" | "ακυρωμένο" => Ok(ProjectStatus::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Display status computed at render time. Never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DerivedStatus {
    Offer,
    OnSchedule,
    Overdue,
    Completed,
    Cancelled,
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DerivedStatus::Offer => "Προσφορά",
            DerivedStatus::OnSchedule => "Εντός Χρονοδιαγράμματος",
            DerivedStatus::Overdue => "Σε Καθυστέρηση",
            DerivedStatus::Completed => "Ολοκληρωμένο",
            DerivedStatus::Cancelled => "Ακυρωμένο",
        };
        f.write_str(label)
    }
}

/// Pure function of (status, deadline, today): offers, completed and
/// cancelled projects pass through; an active project is overdue once its
/// deadline is strictly in the past.
pub fn derived_status(status: ProjectStatus, deadline: Option<Date>, today: Date) -> DerivedStatus {
    match status {
        ProjectStatus::Offer => DerivedStatus::Offer,
        ProjectStatus::Completed => DerivedStatus::Completed,
        ProjectStatus::Cancelled => DerivedStatus::Cancelled,
        ProjectStatus::Active => match deadline {
            Some(date) if date < today => DerivedStatus::Overdue,
            _ => DerivedStatus::OnSchedule,
        },
    }
}

impl Project {
    pub fn derived_status(&self, today: Date) -> DerivedStatus {
        derived_status(self.status, self.deadline, today)
    }

    pub fn is_overdue(&self, today: Date) -> bool {
        self.derived_status(today) == DerivedStatus::Overdue
    }
}

/// Partial update for a project. `None` leaves the field untouched; the
/// explicit clear switches remove optional values.
#[derive(Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub application_number: Option<String>,
    pub deadline: Option<Date>,
    pub clear_deadline: bool,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.application_number.is_none()
            && self.deadline.is_none()
            && !self.clear_deadline
            && self.status.is_none()
    }

    pub fn apply(&self, project: &mut Project) {
        if let Some(v) = &self.title {
            project.title = v.clone();
        }
        if let Some(v) = &self.description {
            project.description = Some(v.clone());
        }
        if let Some(v) = &self.application_number {
            project.application_number = Some(v.clone());
        }
        if self.clear_deadline {
            project.deadline = None;
        } else if let Some(v) = self.deadline {
            project.deadline = Some(v);
        }
        if let Some(v) = self.status {
            project.status = v;
        }
    }
}
