use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use platform_api::ApiError;
use platform_authz::{
    AccessClassifier, AuthzError, DataFeed, Module, ModuleAction, ModuleTile, PolicyContext,
    PolicyEngine, Role, RoleCatalog,
};
use products_hr::{
    HrModule,
    contracts::{self, ContractReport},
    onboarding::{OnboardingProgress, StaffMember, TaskId},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::render;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please select your role first")]
    RoleRequired,
    #[error("no dashboard module named {0:?}")]
    UnknownModule(String),
    #[error(transparent)]
    Authz(#[from] AuthzError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to render output")]
    Render(#[from] fmt::Error),
    #[error("failed to encode output")]
    Encode(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn title(&self) -> &'static str {
        match self {
            DashboardError::RoleRequired => "Role Required",
            DashboardError::UnknownModule(_) => "Unknown Module",
            DashboardError::Authz(err) => err.title(),
            DashboardError::Api(err) => err.title(),
            DashboardError::Render(_) | DashboardError::Encode(_) => "Output Error",
        }
    }
}

pub type CommandResult = Result<String, DashboardError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Text,
    Json,
}

/// One CLI invocation: the selected role plus everything needed to serve it.
pub struct Session {
    pub hr: HrModule,
    pub policy: PolicyEngine,
    pub classifier: AccessClassifier<'static>,
    pub role: Option<String>,
    pub format: Format,
}

#[derive(Serialize)]
struct ModulesView<'a> {
    role: Option<Role>,
    modules: &'a [ModuleTile],
}

#[derive(Serialize)]
struct StaffView<'a> {
    #[serde(flatten)]
    member: &'a StaffMember,
    progress: OnboardingProgress,
}

#[derive(Serialize)]
struct RoleView {
    key: &'static str,
    label: &'static str,
    description: &'static str,
    modules: Vec<Module>,
}

impl Session {
    fn role(&self) -> Result<Role, DashboardError> {
        let raw = self.role.as_deref().ok_or(DashboardError::RoleRequired)?;
        Ok(raw.parse::<Role>()?)
    }

    fn authorize(&self, module: Module) -> Result<Role, DashboardError> {
        let role = self.role()?;
        self.policy.check(&PolicyContext { role, module })?;
        Ok(role)
    }

    fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&mut String) -> fmt::Result,
    ) -> CommandResult {
        match self.format {
            Format::Json => Ok(serde_json::to_string_pretty(value)? + "\n"),
            Format::Text => {
                let mut out = String::new();
                text(&mut out)?;
                Ok(out)
            }
        }
    }

    pub fn roles(&self) -> CommandResult {
        let catalog = RoleCatalog::global();
        let views: Vec<RoleView> = Role::ALL
            .into_iter()
            .map(|role| RoleView {
                key: role.key(),
                label: role.label(),
                description: role.description(),
                modules: catalog.modules_for(role),
            })
            .collect();
        self.emit(&views, |out| {
            render::roles(out, |role| catalog.modules_for(role).len())
        })
    }

    /// The module grid. An unknown or missing role is not an error here: it
    /// simply locks every tile.
    pub fn modules(&self) -> CommandResult {
        let role = self.role.as_deref().and_then(Role::parse);
        let tiles = self.classifier.dashboard(role);
        self.emit(
            &ModulesView {
                role,
                modules: &tiles,
            },
            |out| render::modules(out, role, &tiles),
        )
    }

    /// Activates a module the way clicking its tile would.
    pub async fn open(&self, name: &str) -> CommandResult {
        let module =
            Module::from_name(name).ok_or_else(|| DashboardError::UnknownModule(name.into()))?;
        let role = self.authorize(module)?;
        match module.definition().action {
            ModuleAction::Fetch(feed) => self.fetch(feed, Utc::now()).await,
            ModuleAction::ShowUpload => {
                let mut out = String::new();
                render::notice(
                    &mut out,
                    "Upload",
                    &format!("{} may upload files from the web dashboard.", role.label()),
                )?;
                Ok(out)
            }
            ModuleAction::ShowLocked => Err(AuthzError::Locked { role, module }.into()),
        }
    }

    async fn fetch(&self, feed: DataFeed, reference: DateTime<Utc>) -> CommandResult {
        match feed {
            DataFeed::Contractors => self.contractors(reference, false).await,
            DataFeed::Onboarding => self.onboarding().await,
            DataFeed::Resources => self.resources().await,
            DataFeed::TimeOff => self.time_off().await,
            DataFeed::TimeTracking => self.time_tracking().await,
            DataFeed::Groups => self.groups().await,
            DataFeed::Entities => self.entities().await,
        }
    }

    pub async fn contractors(
        &self,
        reference: DateTime<Utc>,
        expiring_only: bool,
    ) -> CommandResult {
        let role = self.authorize(Module::Contractors)?;
        let mut list = self.hr.contractors(role).await?;
        if expiring_only {
            list = contracts::expiring(&list, reference)
                .into_iter()
                .cloned()
                .collect();
        }
        let report = ContractReport::build(list, reference);
        info!(
            role = role.key(),
            rows = report.rows.len(),
            expiring = report.expiring_count,
            "contract report built"
        );
        self.emit(&report, |out| {
            render::as_of(out, reference.date_naive())?;
            render::contracts(out, &report)
        })
    }

    pub async fn onboarding(&self) -> CommandResult {
        let role = self.authorize(Module::Onboarding)?;
        let staff = self.hr.onboarding(role).await?;
        self.emit_staff(&staff)
    }

    /// Prints the list as re-fetched after the toggle, never a locally edited
    /// copy.
    pub async fn toggle(&self, staff_id: &str, task_id: TaskId) -> CommandResult {
        let role = self.authorize(Module::Onboarding)?;
        let staff = self.hr.toggle_task(role, staff_id, task_id).await?;
        self.emit_staff(&staff)
    }

    fn emit_staff(&self, staff: &[StaffMember]) -> CommandResult {
        let views: Vec<StaffView<'_>> = staff
            .iter()
            .map(|member| StaffView {
                member,
                progress: member.progress(),
            })
            .collect();
        self.emit(&views, |out| render::onboarding(out, staff))
    }

    pub async fn resources(&self) -> CommandResult {
        let role = self.authorize(Module::Resources)?;
        let resources = self.hr.resources(role).await?;
        self.emit(&resources, |out| render::resources(out, &resources, role))
    }

    pub async fn time_off(&self) -> CommandResult {
        let role = self.authorize(Module::TimeOff)?;
        let time_off = self.hr.time_off(role).await?;
        self.emit(&time_off, |out| render::time_off(out, &time_off))
    }

    pub async fn time_tracking(&self) -> CommandResult {
        let role = self.authorize(Module::TimeTracking)?;
        let tracking = self.hr.time_tracking(role).await?;
        self.emit(&tracking, |out| render::time_tracking(out, &tracking))
    }

    pub async fn groups(&self) -> CommandResult {
        let role = self.authorize(Module::Groups)?;
        let groups = self.hr.groups(role).await?;
        self.emit(&groups, |out| render::groups(out, &groups))
    }

    pub async fn entities(&self) -> CommandResult {
        let role = self.authorize(Module::Entities)?;
        let entities = self.hr.entities(role).await?;
        self.emit(&entities, |out| render::entities(out, &entities))
    }
}

/// Midnight UTC of `date`, or now.
pub fn reference_time(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.map_or_else(Utc::now, |date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Formats a failed command for the terminal. Connection failures are logged
/// as well as shown.
pub fn describe_failure(err: &DashboardError) -> String {
    if let DashboardError::Api(api @ ApiError::Connection(_)) = err {
        error!(code = api.code(), error = ?api, "dashboard request failed");
    }
    let mut out = String::new();
    if render::notice(&mut out, err.title(), &err.to_string()).is_err() {
        return err.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;
    use platform_api::ApiClient;
    use serde_json::Value;

    use super::*;

    fn session_at(base: &str, role: Option<&str>, format: Format) -> Session {
        let api = ApiClient::new(base, Duration::from_secs(5)).unwrap();
        Session {
            hr: HrModule::new(api),
            policy: PolicyEngine::default(),
            classifier: AccessClassifier::default(),
            role: role.map(str::to_string),
            format,
        }
    }

    fn session(role: Option<&str>, format: Format) -> Session {
        // Nothing listens on port 9; only offline paths are exercised here.
        session_at("http://127.0.0.1:9", role, format)
    }

    #[test]
    fn unknown_role_locks_every_module() {
        let out = session(Some("Janitor"), Format::Json).modules().unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let modules = value["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 10);
        assert!(modules.iter().all(|m| m["access"] == "locked"));
        assert!(value["role"].is_null());
    }

    #[test]
    fn module_json_uses_display_names() {
        let out = session(Some("hr"), Format::Json).modules().unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["role"], "HR Specialist");
        assert_eq!(value["modules"][4]["title"], "Time Off");
        assert_eq!(value["modules"][4]["access"], "allowed");
        assert_eq!(value["modules"][4]["action"]["endpoint"], "time-off");
        assert_eq!(value["modules"][7]["title"], "Entities");
        assert_eq!(value["modules"][7]["access"], "locked");
    }

    #[tokio::test]
    async fn missing_role_is_reported_before_any_request() {
        let err = session(None, Format::Text)
            .contractors(Utc::now(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::RoleRequired));
        assert_eq!(err.title(), "Role Required");
    }

    #[tokio::test]
    async fn locked_module_never_hits_the_network() {
        let err = session(Some("intern"), Format::Text)
            .contractors(Utc::now(), false)
            .await
            .unwrap_err();
        assert_eq!(err.title(), "Feature Locked");
        assert_eq!(
            describe_failure(&err),
            "Feature Locked: Contractors is locked. Please login to access this feature.\n"
        );
    }

    #[tokio::test]
    async fn always_locked_features_stay_locked_for_admin() {
        let err = session(Some("admin"), Format::Text)
            .open("Billing & Payments")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Authz(AuthzError::Locked {
                module: Module::BillingAndPayments,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn open_requires_exact_module_name() {
        let err = session(Some("admin"), Format::Text)
            .open("billing")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownModule(_)));
    }

    #[tokio::test]
    async fn upload_tile_reports_availability() {
        let out = session(Some("engineer"), Format::Text)
            .open("Upload")
            .await
            .unwrap();
        assert!(out.starts_with("Upload: Engineer may upload files"));
    }

    #[tokio::test]
    async fn open_fetches_the_bound_feed() {
        let (base, _) = dashboard_tests::spawn().await.unwrap();
        let out = session_at(&base, Some("hr"), Format::Text)
            .open("Contractors")
            .await
            .unwrap();
        // Every fixture contract ended in 2025.
        assert!(out.contains("Contractors (4)  4 expiring soon"));
        assert!(out.contains("Sarah Johnson"));
        assert!(out.contains("days ago"));

        let out = session_at(&base, Some("intern"), Format::Json)
            .open("Resources")
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["title"], "Employee Handbook");
    }

    #[tokio::test]
    async fn expiring_filters_before_building_the_report() {
        let (base, _) = dashboard_tests::spawn().await.unwrap();
        let reference = Utc.with_ymd_and_hms(2025, 7, 20, 0, 0, 0).unwrap();
        let out = session_at(&base, Some("HR Specialist"), Format::Json)
            .contractors(reference, true)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let ids: Vec<&str> = value["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["C001", "C002", "C004"]);
        assert_eq!(value["expiring_count"], 3);
        assert_eq!(value["rows"][1]["status"]["days_left"], 10);
    }

    #[tokio::test]
    async fn toggle_prints_the_refetched_list() {
        let (base, fixture) = dashboard_tests::spawn().await.unwrap();
        let out = session_at(&base, Some("hr"), Format::Json)
            .toggle("S001", 3)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], "S001");
        assert_eq!(value[0]["tasks"][2]["completed"], true);
        assert_eq!(value[0]["progress"]["completed"], 3);
        assert_eq!(value[0]["progress"]["percent"], 75);
        assert_eq!(fixture.toggle_roles(), ["hr"]);

        let out = session_at(&base, Some("hr"), Format::Text)
            .onboarding()
            .await
            .unwrap();
        assert!(out.contains("3/4 tasks (75%, green)"));
        assert!(out.contains("[x] #3"));
    }

    #[tokio::test]
    async fn toggle_is_refused_locally_without_onboarding_access() {
        let (base, fixture) = dashboard_tests::spawn().await.unwrap();
        let err = session_at(&base, Some("manager"), Format::Text)
            .toggle("S001", 3)
            .await
            .unwrap_err();
        assert_eq!(err.title(), "Feature Locked");
        assert!(fixture.toggle_roles().is_empty());
    }

    #[test]
    fn reference_time_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 16).unwrap();
        assert_eq!(
            reference_time(Some(date)).to_rfc3339(),
            "2025-07-16T00:00:00+00:00"
        );
    }
}
