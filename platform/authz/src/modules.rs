use std::fmt;

use serde::{Deserialize, Serialize};

/// A dashboard section whose visibility is gated by role.
///
/// The display name returned by [`Module::name`] is the stable identifier
/// used by the access tables; it must not change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub enum Module {
    #[serde(rename = "Contractors")]
    Contractors,
    #[serde(rename = "Onboarding")]
    Onboarding,
    #[serde(rename = "Resources")]
    Resources,
    #[serde(rename = "Upload")]
    Upload,
    #[serde(rename = "Time Off")]
    TimeOff,
    #[serde(rename = "Time Tracking")]
    TimeTracking,
    #[serde(rename = "Groups")]
    Groups,
    #[serde(rename = "Entities")]
    Entities,
    #[serde(rename = "Roles & Permissions")]
    RolesAndPermissions,
    #[serde(rename = "Billing & Payments")]
    BillingAndPayments,
}

impl Module {
    /// Dashboard order.
    pub const ALL: [Module; 10] = [
        Module::Contractors,
        Module::Onboarding,
        Module::Resources,
        Module::Upload,
        Module::TimeOff,
        Module::TimeTracking,
        Module::Groups,
        Module::Entities,
        Module::RolesAndPermissions,
        Module::BillingAndPayments,
    ];

    pub fn name(self) -> &'static str {
        self.definition().title
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|module| module.name() == name)
    }

    pub fn definition(self) -> &'static ModuleDefinition {
        &DEFINITIONS[self as usize]
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A role-scoped data endpoint, served at `GET /api/{path}/{role}`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataFeed {
    Contractors,
    Onboarding,
    Resources,
    TimeOff,
    TimeTracking,
    Groups,
    Entities,
}

impl DataFeed {
    pub fn path(self) -> &'static str {
        match self {
            DataFeed::Contractors => "contractors",
            DataFeed::Onboarding => "onboarding",
            DataFeed::Resources => "resources",
            DataFeed::TimeOff => "time-off",
            DataFeed::TimeTracking => "time-tracking",
            DataFeed::Groups => "groups",
            DataFeed::Entities => "entities",
        }
    }
}

/// What activating a module tile does.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "endpoint", rename_all = "snake_case")]
pub enum ModuleAction {
    Fetch(DataFeed),
    ShowUpload,
    /// The feature is not available in this build, regardless of role.
    ShowLocked,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleDefinition {
    pub module: Module,
    pub title: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub action: ModuleAction,
}

static DEFINITIONS: [ModuleDefinition; 10] = [
    ModuleDefinition {
        module: Module::Contractors,
        title: "Contractors",
        description: "View contract expiry tracking",
        color: "blue",
        action: ModuleAction::Fetch(DataFeed::Contractors),
    },
    ModuleDefinition {
        module: Module::Onboarding,
        title: "Onboarding",
        description: "Manage new employee checklists",
        color: "green",
        action: ModuleAction::Fetch(DataFeed::Onboarding),
    },
    ModuleDefinition {
        module: Module::Resources,
        title: "Resources",
        description: "Access role-based documents",
        color: "purple",
        action: ModuleAction::Fetch(DataFeed::Resources),
    },
    ModuleDefinition {
        module: Module::Upload,
        title: "Upload",
        description: "Upload and manage files",
        color: "orange",
        action: ModuleAction::ShowUpload,
    },
    ModuleDefinition {
        module: Module::TimeOff,
        title: "Time Off",
        description: "View time off policies and calendar",
        color: "indigo",
        action: ModuleAction::Fetch(DataFeed::TimeOff),
    },
    ModuleDefinition {
        module: Module::TimeTracking,
        title: "Time Tracking",
        description: "Track hours and project time",
        color: "pink",
        action: ModuleAction::Fetch(DataFeed::TimeTracking),
    },
    ModuleDefinition {
        module: Module::Groups,
        title: "Groups",
        description: "View department and team structure",
        color: "teal",
        action: ModuleAction::Fetch(DataFeed::Groups),
    },
    ModuleDefinition {
        module: Module::Entities,
        title: "Entities",
        description: "Manage company entities and locations",
        color: "yellow",
        action: ModuleAction::Fetch(DataFeed::Entities),
    },
    ModuleDefinition {
        module: Module::RolesAndPermissions,
        title: "Roles & Permissions",
        description: "Manage user roles and access control",
        color: "red",
        action: ModuleAction::ShowLocked,
    },
    ModuleDefinition {
        module: Module::BillingAndPayments,
        title: "Billing & Payments",
        description: "Manage billing and payment processing",
        color: "gray",
        action: ModuleAction::ShowLocked,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_line_up_with_variants() {
        for module in Module::ALL {
            assert_eq!(module.definition().module, module);
        }
    }

    #[test]
    fn names_are_exact_identifiers() {
        assert_eq!(Module::from_name("Time Off"), Some(Module::TimeOff));
        assert_eq!(
            Module::from_name("Roles & Permissions"),
            Some(Module::RolesAndPermissions)
        );
        assert_eq!(Module::from_name("time off"), None);
        assert_eq!(Module::from_name("Timeoff"), None);
    }

    #[test]
    fn data_modules_expose_their_endpoint() {
        assert_eq!(
            Module::TimeTracking.definition().action,
            ModuleAction::Fetch(DataFeed::TimeTracking)
        );
        assert_eq!(Module::Upload.definition().action, ModuleAction::ShowUpload);
        assert_eq!(
            Module::BillingAndPayments.definition().action,
            ModuleAction::ShowLocked
        );
    }

    #[test]
    fn feed_serializes_as_its_path() {
        for feed in [DataFeed::TimeOff, DataFeed::TimeTracking, DataFeed::Contractors] {
            assert_eq!(serde_json::to_value(feed).unwrap(), feed.path());
        }
        let action = serde_json::to_value(Module::Groups.definition().action).unwrap();
        assert_eq!(action, serde_json::json!({ "kind": "fetch", "endpoint": "groups" }));
    }
}
