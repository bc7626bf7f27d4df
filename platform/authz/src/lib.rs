//! Authorization primitives for the HR dashboard: roles, modules, and the
//! static tables that decide which modules a role may open.

mod catalog;
mod modules;
mod role;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use catalog::{Access, AccessClassifier, ModuleTile, RoleCatalog};
pub use modules::{DataFeed, Module, ModuleAction, ModuleDefinition};
pub use role::Role;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown role {0:?}")]
    UnknownRole(String),
    #[error("{module} is locked. Please login to access this feature.")]
    Locked { role: Role, module: Module },
}

impl AuthzError {
    pub fn title(&self) -> &'static str {
        match self {
            AuthzError::UnknownRole(_) => "Role Required",
            AuthzError::Locked { .. } => "Feature Locked",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct PolicyContext {
    pub role: Role,
    pub module: Module,
}

/// Result-returning front for [`AccessClassifier`], with access logging.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyEngine {
    classifier: AccessClassifier<'static>,
}

impl PolicyEngine {
    pub fn check(&self, ctx: &PolicyContext) -> Result<(), AuthzError> {
        if self.classifier.classify(ctx.role, ctx.module).is_allowed() {
            debug!(role = ctx.role.key(), module = %ctx.module, "access granted");
            Ok(())
        } else {
            warn!(role = ctx.role.key(), module = %ctx.module, "access denied");
            Err(AuthzError::Locked {
                role: ctx.role,
                module: ctx.module,
            })
        }
    }
}
