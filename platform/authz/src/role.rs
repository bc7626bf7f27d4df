use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::AuthzError;

/// Access level selected by the dashboard user for a session.
///
/// Every role has two spellings: a short key (`hr`) used in query strings and
/// on resource allow-lists, and a label (`HR Specialist`) used in API paths
/// and on screen. Serde uses the label.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "Admin")]
    Admin,
    #[serde(rename = "HR Specialist")]
    HrSpecialist,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Engineer")]
    Engineer,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Intern")]
    Intern,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::HrSpecialist,
        Role::Manager,
        Role::Engineer,
        Role::Marketing,
        Role::Intern,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HrSpecialist => "hr",
            Role::Manager => "manager",
            Role::Engineer => "engineer",
            Role::Marketing => "marketing",
            Role::Intern => "intern",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::HrSpecialist => "HR Specialist",
            Role::Manager => "Manager",
            Role::Engineer => "Engineer",
            Role::Marketing => "Marketing",
            Role::Intern => "Intern",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Admin => "System Administrator - Full access to all HR resources",
            Role::HrSpecialist => "HR Specialist - Manage employee records and policies",
            Role::Manager => "Team Manager - Oversee staff and performance metrics",
            Role::Engineer => "Software Engineer - Access technical documentation and resources",
            Role::Marketing => "Marketing Professional - Brand and campaign materials",
            Role::Intern => "Intern - Limited access to general company resources",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.key().eq_ignore_ascii_case(key))
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.label().eq_ignore_ascii_case(label))
    }

    /// Accepts either spelling, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_key(value).or_else(|| Self::from_label(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| AuthzError::UnknownRole(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_label_map_one_to_one() {
        for role in Role::ALL {
            assert_eq!(Role::from_key(role.key()), Some(role));
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
        assert_eq!(Role::HrSpecialist.label(), "HR Specialist");
        assert_eq!(Role::HrSpecialist.key(), "hr");
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_both_spellings() {
        assert_eq!(Role::parse("HR"), Some(Role::HrSpecialist));
        assert_eq!(Role::parse("hr specialist"), Some(Role::HrSpecialist));
        assert_eq!(Role::parse("  Intern "), Some(Role::Intern));
        assert_eq!(Role::parse("janitor"), None);
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Role::HrSpecialist).unwrap();
        assert_eq!(json, "\"HR Specialist\"");
        let back: Role = serde_json::from_str("\"Manager\"").unwrap();
        assert_eq!(back, Role::Manager);
    }
}
