//! Contract expiry tracking.
//!
//! Expiry dates are calendar days and stand for midnight UTC of that day. The
//! reference instant keeps its time of day, so the same contract can move
//! between bands over the course of a day.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Contracts ending within this many days count as expiring.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Contractor {
    pub id: String,
    pub name: String,
    pub position: String,
    pub contract_expiry: NaiveDate,
}

impl Contractor {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.contract_expiry.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn status(&self, reference: DateTime<Utc>) -> ContractStatus {
        classify(self.expires_at(), reference)
    }

    pub fn in_expiry_window(&self, reference: DateTime<Utc>) -> bool {
        in_expiry_window(self.expires_at(), reference)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractBand {
    Expired,
    ExpiringSoon,
    Active,
}

impl ContractBand {
    pub fn label(self) -> &'static str {
        match self {
            ContractBand::Expired => "Expired",
            ContractBand::ExpiringSoon => "Expiring Soon",
            ContractBand::Active => "Active",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ContractStatus {
    pub days_left: i64,
    pub band: ContractBand,
}

/// Whole days until `expiry`, rounded up. A contract that ended an hour ago
/// still has `0` days left; one that ended a day and an hour ago has `-1`.
pub fn days_left(expiry: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let delta = expiry - reference;
    let whole = delta.num_days();
    if delta - TimeDelta::days(whole) > TimeDelta::zero() {
        whole + 1
    } else {
        whole
    }
}

pub fn classify(expiry: DateTime<Utc>, reference: DateTime<Utc>) -> ContractStatus {
    let days_left = days_left(expiry, reference);
    let band = if days_left < 0 {
        ContractBand::Expired
    } else if days_left <= EXPIRY_WINDOW_DAYS {
        ContractBand::ExpiringSoon
    } else {
        ContractBand::Active
    };
    ContractStatus { days_left, band }
}

/// Inclusive on the far edge, so it agrees with [`classify`]: a contract is in
/// the window exactly when its band is not `Active`. Already expired
/// contracts are inside the window.
pub fn in_expiry_window(expiry: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    expiry <= reference + TimeDelta::days(EXPIRY_WINDOW_DAYS)
}

/// Contracts inside the expiry window, in input order.
pub fn expiring(contractors: &[Contractor], reference: DateTime<Utc>) -> Vec<&Contractor> {
    contractors
        .iter()
        .filter(|contractor| contractor.in_expiry_window(reference))
        .collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct ContractRow {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub status: ContractStatus,
    pub expiring: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ContractReport {
    pub rows: Vec<ContractRow>,
    pub expiring_count: usize,
}

impl ContractReport {
    pub fn build(contractors: Vec<Contractor>, reference: DateTime<Utc>) -> Self {
        let rows: Vec<ContractRow> = contractors
            .into_iter()
            .map(|contractor| ContractRow {
                status: contractor.status(reference),
                expiring: contractor.in_expiry_window(reference),
                contractor,
            })
            .collect();
        let expiring_count = rows.iter().filter(|row| row.expiring).count();
        Self {
            rows,
            expiring_count,
        }
    }
}
