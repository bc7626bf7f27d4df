//! HR vertical slice.
//!
//! [`contracts`] and [`onboarding`] hold the derived-status rules; [`HrModule`]
//! fetches the role-scoped data they run on.

pub mod contracts;
pub mod onboarding;
pub mod records;

use platform_api::{ApiClient, ApiError, ApiResult, StatusCode};
use platform_authz::{DataFeed, Role};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    contracts::Contractor,
    onboarding::{StaffMember, TaskId, ToggleAck, ToggleRequest},
    records::{Entity, Groups, Resource, TimeOff, TimeTracking},
};

#[derive(Deserialize)]
struct ContractorsEnvelope {
    contractors: Vec<Contractor>,
}

#[derive(Deserialize)]
struct StaffEnvelope {
    staff: Vec<StaffMember>,
}

#[derive(Deserialize)]
struct ResourcesEnvelope {
    resources: Vec<Resource>,
}

#[derive(Deserialize)]
struct TimeOffEnvelope {
    time_off: TimeOff,
}

#[derive(Deserialize)]
struct TimeTrackingEnvelope {
    time_tracking: TimeTracking,
}

#[derive(Deserialize)]
struct GroupsEnvelope {
    groups: Groups,
}

#[derive(Deserialize)]
struct EntitiesEnvelope {
    entities: Vec<Entity>,
}

#[derive(Clone, Debug)]
pub struct HrModule {
    api: ApiClient,
}

impl HrModule {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn contractors(&self, role: Role) -> ApiResult<Vec<Contractor>> {
        let body: ContractorsEnvelope = self
            .api
            .get_role_scoped(DataFeed::Contractors, role)
            .await?;
        Ok(body.contractors)
    }

    pub async fn onboarding(&self, role: Role) -> ApiResult<Vec<StaffMember>> {
        let body: StaffEnvelope = self.api.get_role_scoped(DataFeed::Onboarding, role).await?;
        Ok(body.staff)
    }

    pub async fn resources(&self, role: Role) -> ApiResult<Vec<Resource>> {
        let body: ResourcesEnvelope = self.api.get_role_scoped(DataFeed::Resources, role).await?;
        Ok(body.resources)
    }

    pub async fn time_off(&self, role: Role) -> ApiResult<TimeOff> {
        let body: TimeOffEnvelope = self.api.get_role_scoped(DataFeed::TimeOff, role).await?;
        Ok(body.time_off)
    }

    pub async fn time_tracking(&self, role: Role) -> ApiResult<TimeTracking> {
        let body: TimeTrackingEnvelope = self
            .api
            .get_role_scoped(DataFeed::TimeTracking, role)
            .await?;
        Ok(body.time_tracking)
    }

    pub async fn groups(&self, role: Role) -> ApiResult<Groups> {
        let body: GroupsEnvelope = self.api.get_role_scoped(DataFeed::Groups, role).await?;
        Ok(body.groups)
    }

    pub async fn entities(&self, role: Role) -> ApiResult<Vec<Entity>> {
        let body: EntitiesEnvelope = self.api.get_role_scoped(DataFeed::Entities, role).await?;
        Ok(body.entities)
    }

    /// Asks the server to flip one checklist item, then returns the freshly
    /// fetched onboarding list. The local copy is never patched: the caller
    /// must treat whatever it showed before as stale.
    #[instrument(name = "hr.toggle_task", skip(self, role), fields(role = role.key()))]
    pub async fn toggle_task(
        &self,
        role: Role,
        staff_id: &str,
        task_id: TaskId,
    ) -> ApiResult<Vec<StaffMember>> {
        let mut url = self.api.endpoint(&[DataFeed::Onboarding.path(), staff_id, "toggle"])?;
        url.query_pairs_mut().append_pair("role", role.key());

        let ack: ToggleAck = self.api.post_json(url, &ToggleRequest { task_id }).await?;
        if !ack.success {
            // `success: false` arrives with a 2xx status.
            return Err(ApiError::Server {
                status: StatusCode::OK,
                message: ack.error.unwrap_or_else(|| "Task update failed".into()),
            });
        }
        info!(
            staff_id,
            task_id,
            completed = ?ack.completed,
            "task toggled; refreshing onboarding list"
        );
        self.onboarding(role).await
    }
}
