use crate::error::TourError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Student, Role::Instructor, Role::Admin]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Section prefix every page of this role lives under.
    pub fn path_prefix(self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Instructor => "/instructor",
            Role::Admin => "/admin",
        }
    }

    /// Infer the role owning `path` from its section prefix.
    pub fn for_path(path: &str) -> Option<Role> {
        Role::all().iter().copied().find(|r| {
            let prefix = r.path_prefix();
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(TourError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TourStatus
// ---------------------------------------------------------------------------

/// Persisted lifecycle of a single tour id.
///
/// Transitions: `NotStarted → InProgress → Completed | Skipped`. A terminal
/// value is never reset automatically; only an explicit restart writes
/// `InProgress` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    /// Never written; the reading of an absent key.
    #[default]
    NotStarted,
    #[serde(rename = "inProgress")]
    InProgress,
    Completed,
    Skipped,
}

impl TourStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TourStatus::NotStarted => "not_started",
            TourStatus::InProgress => "inProgress",
            TourStatus::Completed => "completed",
            TourStatus::Skipped => "skipped",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TourStatus::Completed | TourStatus::Skipped)
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TourStatus {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(TourStatus::NotStarted),
            "inProgress" => Ok(TourStatus::InProgress),
            "completed" => Ok(TourStatus::Completed),
            "skipped" => Ok(TourStatus::Skipped),
            _ => Err(TourError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TourMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourMode {
    #[default]
    Single,
    Full,
}

impl TourMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TourMode::Single => "single",
            TourMode::Full => "full",
        }
    }
}

impl fmt::Display for TourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TourMode {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(TourMode::Single),
            "full" => Ok(TourMode::Full),
            _ => Err(TourError::InvalidMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchTag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchKind {
    /// Continue a full sequence on the next queued page.
    Resume,
    /// Begin a full sequence from its first page.
    Full,
}

impl LaunchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LaunchKind::Resume => "resume",
            LaunchKind::Full => "full",
        }
    }
}

/// One-shot instruction left in the store for the next page's launch trigger.
///
/// Wire form is `<role>:<kind>`, e.g. `student:resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTag {
    pub role: Role,
    pub kind: LaunchKind,
}

impl LaunchTag {
    pub fn resume(role: Role) -> Self {
        Self {
            role,
            kind: LaunchKind::Resume,
        }
    }

    pub fn full(role: Role) -> Self {
        Self {
            role,
            kind: LaunchKind::Full,
        }
    }
}

impl fmt::Display for LaunchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.kind.as_str())
    }
}

impl std::str::FromStr for LaunchTag {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, kind) = s
            .split_once(':')
            .ok_or_else(|| TourError::InvalidLaunchTag(s.to_string()))?;
        let role: Role = role
            .parse()
            .map_err(|_| TourError::InvalidLaunchTag(s.to_string()))?;
        let kind = match kind {
            "resume" => LaunchKind::Resume,
            "full" => LaunchKind::Full,
            _ => return Err(TourError::InvalidLaunchTag(s.to_string())),
        };
        Ok(Self { role, kind })
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    Center,
    Auto,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Left => "left",
            Placement::Right => "right",
            Placement::Center => "center",
            Placement::Auto => "auto",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Placement {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Placement::Top),
            "bottom" => Ok(Placement::Bottom),
            "left" => Ok(Placement::Left),
            "right" => Ok(Placement::Right),
            "center" => Ok(Placement::Center),
            "auto" => Ok(Placement::Auto),
            _ => Err(TourError::InvalidPlacement(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionStatus
// ---------------------------------------------------------------------------

/// Event reported by the walkthrough engine.
///
/// Only `Finished` and `Skipped` end a tour; the rest are progress noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Started,
    StepChanged,
    Paused,
    Finished,
    Skipped,
}

impl CompletionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CompletionStatus::Finished | CompletionStatus::Skipped)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
