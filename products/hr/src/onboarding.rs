//! Onboarding checklists and completion progress.
//!
//! The checklist itself belongs to the server. Nothing in this module flips a
//! task; see [`crate::HrModule::toggle_task`] for how changes are made.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = u64;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub tasks: Vec<Task>,
}

impl StaffMember {
    pub fn progress(&self) -> OnboardingProgress {
        progress(&self.tasks)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Completion bucket, lowest first. Lower bounds are inclusive: 25, 50, 75.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressQuartile {
    First,
    Second,
    Third,
    Fourth,
}

impl ProgressQuartile {
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            75.. => ProgressQuartile::Fourth,
            50.. => ProgressQuartile::Third,
            25.. => ProgressQuartile::Second,
            _ => ProgressQuartile::First,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ProgressQuartile::Fourth => "green",
            ProgressQuartile::Third => "yellow",
            ProgressQuartile::Second => "orange",
            ProgressQuartile::First => "red",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct OnboardingProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub band: ProgressQuartile,
}

/// An empty checklist is 0% rather than undefined.
pub fn progress(tasks: &[Task]) -> OnboardingProgress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let percent = if total == 0 {
        0
    } else {
        (completed as f64 / total as f64 * 100.0).round() as u8
    };
    OnboardingProgress {
        completed,
        total,
        percent,
        band: ProgressQuartile::for_percent(percent),
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ToggleRequest {
    pub task_id: TaskId,
}

/// Server acknowledgement of a toggle. Only `success` and `error` drive
/// behaviour; the rest is informational.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ToggleAck {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}
