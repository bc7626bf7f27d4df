//! Read-only payloads for the remaining dashboard sections.

use std::fmt;

use platform_authz::Role;
use serde::{Deserialize, Serialize};

/// A number or free text, as mock data mixes both ("15", "Unlimited",
/// "$1.2M").
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Figure::Number(n) => write!(f, "{n}"),
            Figure::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Resource {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filename: Option<String>,
    pub file_type: String,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Role keys (`hr`, `intern`, ...).
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

impl Resource {
    pub fn is_visible_to(&self, role: Role) -> bool {
        self.allowed_roles
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(role.key()))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeOff {
    #[serde(default)]
    pub policies: Vec<TimeOffPolicy>,
    #[serde(default)]
    pub upcoming_time_off: Vec<TimeOffEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeOffPolicy {
    #[serde(rename = "type")]
    pub kind: String,
    pub days_per_year: Figure,
    #[serde(default)]
    pub carryover_limit: Option<Figure>,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeOffEntry {
    pub employee: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

impl TimeOffEntry {
    /// Anything not explicitly approved is shown as pending.
    pub fn is_approved(&self) -> bool {
        self.status == "Approved"
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeTracking {
    pub weekly_summary: WeeklySummary,
    #[serde(default)]
    pub current_week: Vec<TimeEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct WeeklySummary {
    pub total_hours: f64,
    pub expected_hours: f64,
}

impl WeeklySummary {
    /// Logged hours as a rounded percentage of expected hours. May exceed 100.
    pub fn utilization(&self) -> u32 {
        self.ratio().map_or(0, |ratio| (ratio * 100.0).round() as u32)
    }

    /// Fill of the progress bar, capped at 100.
    pub fn bar_fill(&self) -> f64 {
        self.ratio().map_or(0.0, |ratio| (ratio * 100.0).min(100.0))
    }

    fn ratio(&self) -> Option<f64> {
        (self.expected_hours > 0.0).then(|| self.total_hours.max(0.0) / self.expected_hours)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimeEntry {
    pub date: String,
    pub project: String,
    pub hours: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Groups {
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Department {
    pub name: String,
    pub manager: String,
    #[serde(default)]
    pub budget: Option<Figure>,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub name: String,
    pub lead: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub employees: Figure,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_rounds_and_bar_caps() {
        let summary = WeeklySummary {
            total_hours: 42.5,
            expected_hours: 40.0,
        };
        assert_eq!(summary.utilization(), 106);
        assert_eq!(summary.bar_fill(), 100.0);

        let partial = WeeklySummary {
            total_hours: 30.0,
            expected_hours: 40.0,
        };
        assert_eq!(partial.utilization(), 75);
        assert_eq!(partial.bar_fill(), 75.0);
    }

    #[test]
    fn zero_expected_hours_is_zero_utilization() {
        let summary = WeeklySummary {
            total_hours: 8.0,
            expected_hours: 0.0,
        };
        assert_eq!(summary.utilization(), 0);
        assert_eq!(summary.bar_fill(), 0.0);
    }

    #[test]
    fn resource_visibility_uses_role_keys() {
        let resource: Resource = serde_json::from_str(
            r#"{"title":"Handbook","file_type":"pdf","allowed_roles":["admin","hr","intern"]}"#,
        )
        .unwrap();
        assert!(resource.is_visible_to(Role::HrSpecialist));
        assert!(resource.is_visible_to(Role::Intern));
        assert!(!resource.is_visible_to(Role::Engineer));
    }

    #[test]
    fn figures_accept_numbers_and_text() {
        let policy: TimeOffPolicy = serde_json::from_str(
            r#"{"type":"Vacation","days_per_year":15,"carryover_limit":"Unlimited","description":"Paid leave"}"#,
        )
        .unwrap();
        assert_eq!(policy.days_per_year.to_string(), "15");
        assert_eq!(
            policy.carryover_limit,
            Some(Figure::Text("Unlimited".into()))
        );
        assert_eq!(Figure::Number(7.5).to_string(), "7.5");
    }

    #[test]
    fn only_approved_entries_are_approved() {
        let entry = |status: &str| TimeOffEntry {
            employee: "Lisa Chen".into(),
            kind: "Vacation".into(),
            start_date: "2025-08-01".into(),
            end_date: "2025-08-05".into(),
            status: status.into(),
        };
        assert!(entry("Approved").is_approved());
        assert!(!entry("Pending").is_approved());
    }
}
