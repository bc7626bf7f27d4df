use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{Module, ModuleDefinition, Role};

static BUILTIN: Lazy<RoleCatalog> = Lazy::new(RoleCatalog::builtin);

/// Role to module grants. Built once; never mutated afterwards.
#[derive(Clone, Debug)]
pub struct RoleCatalog {
    access: HashMap<Role, BTreeSet<Module>>,
}

impl RoleCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static RoleCatalog {
        &BUILTIN
    }

    fn builtin() -> Self {
        use Module::*;

        let grants: [(Role, &[Module]); 6] = [
            (Role::Admin, &Module::ALL),
            (
                Role::HrSpecialist,
                &[
                    Contractors,
                    Onboarding,
                    Resources,
                    Upload,
                    TimeOff,
                    TimeTracking,
                    Groups,
                ],
            ),
            (Role::Manager, &[Contractors, Resources, Upload, TimeOff]),
            (Role::Engineer, &[Resources, Upload]),
            (Role::Marketing, &[Resources, Upload]),
            (Role::Intern, &[Resources]),
        ];
        let access = grants
            .into_iter()
            .map(|(role, modules)| (role, modules.iter().copied().collect()))
            .collect();
        Self { access }
    }

    pub fn grants(&self, role: Role, module: Module) -> bool {
        self.access
            .get(&role)
            .is_some_and(|modules| modules.contains(&module))
    }

    /// Granted modules in dashboard order.
    pub fn modules_for(&self, role: Role) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|module| self.grants(role, *module))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Allowed,
    Locked,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// One entry of the module grid. Locked modules stay in the grid.
#[derive(Clone, Debug, Serialize)]
pub struct ModuleTile {
    #[serde(flatten)]
    pub definition: &'static ModuleDefinition,
    pub access: Access,
}

#[derive(Clone, Copy, Debug)]
pub struct AccessClassifier<'a> {
    catalog: &'a RoleCatalog,
}

impl Default for AccessClassifier<'static> {
    fn default() -> Self {
        Self::new(RoleCatalog::global())
    }
}

impl<'a> AccessClassifier<'a> {
    pub fn new(catalog: &'a RoleCatalog) -> Self {
        Self { catalog }
    }

    /// Boundary form keyed by strings. An unrecognised role or module name is
    /// locked rather than an error.
    pub fn is_allowed(&self, role: &str, module: &str) -> bool {
        match (Role::parse(role), Module::from_name(module)) {
            (Some(role), Some(module)) => self.catalog.grants(role, module),
            _ => false,
        }
    }

    pub fn classify(&self, role: Role, module: Module) -> Access {
        if self.catalog.grants(role, module) {
            Access::Allowed
        } else {
            Access::Locked
        }
    }

    /// Every module in dashboard order with its access for `role`. Without a
    /// role everything is locked.
    pub fn dashboard(&self, role: Option<Role>) -> Vec<ModuleTile> {
        Module::ALL
            .into_iter()
            .map(|module| ModuleTile {
                definition: module.definition(),
                access: role.map_or(Access::Locked, |role| self.classify(role, module)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_at_least_one_module() {
        let catalog = RoleCatalog::global();
        for role in Role::ALL {
            assert!(!catalog.modules_for(role).is_empty(), "{role} has no modules");
        }
    }

    #[test]
    fn admin_sees_everything_and_intern_only_resources() {
        let catalog = RoleCatalog::global();
        assert_eq!(catalog.modules_for(Role::Admin), Module::ALL.to_vec());
        assert_eq!(catalog.modules_for(Role::Intern), vec![Module::Resources]);
        assert_eq!(
            catalog.modules_for(Role::Manager),
            vec![
                Module::Contractors,
                Module::Resources,
                Module::Upload,
                Module::TimeOff
            ]
        );
    }

    #[test]
    fn unknown_roles_are_locked_out_of_everything() {
        let classifier = AccessClassifier::default();
        for module in Module::ALL {
            assert!(!classifier.is_allowed("Janitor", module.name()));
            assert!(!classifier.is_allowed("", module.name()));
        }
    }

    #[test]
    fn string_lookup_matches_membership() {
        let classifier = AccessClassifier::default();
        let catalog = RoleCatalog::global();
        for role in Role::ALL {
            for module in Module::ALL {
                assert_eq!(
                    classifier.is_allowed(role.label(), module.name()),
                    catalog.grants(role, module),
                    "{role} / {module}"
                );
            }
        }
    }

    #[test]
    fn module_names_must_match_exactly() {
        let classifier = AccessClassifier::default();
        assert!(classifier.is_allowed("HR Specialist", "Time Off"));
        assert!(!classifier.is_allowed("HR Specialist", "time-off"));
        assert!(!classifier.is_allowed("HR Specialist", "Entities"));
    }

    #[test]
    fn dashboard_keeps_locked_tiles() {
        let classifier = AccessClassifier::default();
        let tiles = classifier.dashboard(Some(Role::Engineer));
        assert_eq!(tiles.len(), Module::ALL.len());
        let allowed: Vec<Module> = tiles
            .iter()
            .filter(|tile| tile.access.is_allowed())
            .map(|tile| tile.definition.module)
            .collect();
        assert_eq!(allowed, vec![Module::Resources, Module::Upload]);

        let anonymous = classifier.dashboard(None);
        assert!(anonymous.iter().all(|tile| tile.access == Access::Locked));
    }

    #[test]
    fn classification_is_idempotent() {
        let classifier = AccessClassifier::default();
        let first = classifier.classify(Role::Marketing, Module::Upload);
        let second = classifier.classify(Role::Marketing, Module::Upload);
        assert_eq!(first, second);
        assert_eq!(first, Access::Allowed);
    }
}
