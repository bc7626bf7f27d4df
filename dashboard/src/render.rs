//! Plain-text presentation of dashboard data.
//!
//! Nothing here decides access or computes status; every function formats
//! values that were already classified.

use std::fmt::{self, Write};

use chrono::NaiveDate;
use platform_authz::{ModuleTile, Role};
use products_hr::{
    contracts::{ContractBand, ContractReport},
    onboarding::StaffMember,
    records::{Entity, Groups, Resource, TimeOff, TimeTracking},
};

const LOCK: &str = "[locked]";

pub fn notice(out: &mut impl Write, title: &str, message: &str) -> fmt::Result {
    writeln!(out, "{title}: {message}")
}

pub fn roles(out: &mut impl Write, modules_for: impl Fn(Role) -> usize) -> fmt::Result {
    for role in Role::ALL {
        writeln!(
            out,
            "{:<10} {:<14} {:>2} modules  {}",
            role.key(),
            role.label(),
            modules_for(role),
            role.description()
        )?;
    }
    Ok(())
}

pub fn modules(out: &mut impl Write, role: Option<Role>, tiles: &[ModuleTile]) -> fmt::Result {
    match role {
        Some(role) => {
            writeln!(out, "Welcome back, {}!", role.label())?;
            writeln!(out, "{}", role.description())?;
        }
        None => writeln!(out, "Please select your role")?,
    }
    writeln!(out)?;
    for tile in tiles {
        let def = tile.definition;
        if tile.access.is_allowed() {
            writeln!(out, "  {:<20} {}", def.title, def.description)?;
        } else {
            writeln!(out, "  {:<20} {} {LOCK}", def.title, def.description)?;
        }
    }
    Ok(())
}

pub fn contracts(out: &mut impl Write, report: &ContractReport) -> fmt::Result {
    if report.rows.is_empty() {
        return writeln!(out, "No contractors found.");
    }
    write!(out, "Contractors ({})", report.rows.len())?;
    if report.expiring_count > 0 {
        write!(out, "  {} expiring soon", report.expiring_count)?;
    }
    writeln!(out)?;
    for row in &report.rows {
        let c = &row.contractor;
        let days = match row.status.band {
            ContractBand::Expired => format!("{} days ago", -row.status.days_left),
            _ => format!("{} days left", row.status.days_left),
        };
        writeln!(
            out,
            "{} {:<6} {:<20} {:<22} {}  {:<13} {}",
            if row.expiring { "!" } else { " " },
            c.id,
            c.name,
            c.position,
            c.contract_expiry,
            row.status.band.label(),
            days
        )?;
    }
    Ok(())
}

pub fn onboarding(out: &mut impl Write, staff: &[StaffMember]) -> fmt::Result {
    if staff.is_empty() {
        return writeln!(out, "No staff currently onboarding.");
    }
    for member in staff {
        let progress = member.progress();
        writeln!(
            out,
            "{} ({}) {} - {}, started {}",
            member.name,
            member.id,
            bar(progress.percent as f64),
            member.position,
            member.start_date
        )?;
        writeln!(
            out,
            "  {}/{} tasks ({}%, {})",
            progress.completed,
            progress.total,
            progress.percent,
            progress.band.color()
        )?;
        for task in &member.tasks {
            let mark = if task.completed { "x" } else { " " };
            writeln!(out, "  [{mark}] #{:<3} {}", task.id, task.name)?;
        }
    }
    Ok(())
}

pub fn resources(out: &mut impl Write, resources: &[Resource], role: Role) -> fmt::Result {
    if resources.is_empty() {
        return writeln!(out, "No resources available for {}.", role.label());
    }
    for resource in resources {
        writeln!(
            out,
            "{} [{}] {}",
            resource.title,
            resource.file_type.to_uppercase(),
            resource.file_size.as_deref().unwrap_or("-")
        )?;
        if !resource.description.is_empty() {
            writeln!(out, "  {}", resource.description)?;
        }
        let roles: Vec<String> = resource
            .allowed_roles
            .iter()
            .map(|allowed| {
                if allowed.eq_ignore_ascii_case(role.key()) {
                    format!("*{allowed}*")
                } else {
                    allowed.clone()
                }
            })
            .collect();
        writeln!(out, "  roles: {}", roles.join(", "))?;
    }
    Ok(())
}

pub fn time_off(out: &mut impl Write, time_off: &TimeOff) -> fmt::Result {
    writeln!(out, "Policies")?;
    for policy in &time_off.policies {
        write!(out, "  {:<16} {} days/year", policy.kind, policy.days_per_year)?;
        if let Some(limit) = &policy.carryover_limit {
            write!(out, ", carryover {limit}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Upcoming")?;
    for entry in &time_off.upcoming_time_off {
        let status = if entry.is_approved() { "approved" } else { "pending" };
        writeln!(
            out,
            "  {:<20} {:<12} {} .. {}  {} ({status})",
            entry.employee, entry.kind, entry.start_date, entry.end_date, entry.status
        )?;
    }
    Ok(())
}

pub fn time_tracking(out: &mut impl Write, tracking: &TimeTracking) -> fmt::Result {
    let summary = &tracking.weekly_summary;
    writeln!(
        out,
        "{}h of {}h this week {} {}%",
        summary.total_hours,
        summary.expected_hours,
        bar(summary.bar_fill()),
        summary.utilization()
    )?;
    for entry in &tracking.current_week {
        writeln!(
            out,
            "  {}  {:<20} {:>5}h  {}",
            entry.date, entry.project, entry.hours, entry.description
        )?;
    }
    Ok(())
}

pub fn groups(out: &mut impl Write, groups: &Groups) -> fmt::Result {
    writeln!(out, "Departments")?;
    for dept in &groups.departments {
        write!(out, "  {} (manager {}, {} members", dept.name, dept.manager, dept.members.len())?;
        if let Some(budget) = &dept.budget {
            write!(out, ", budget {budget}")?;
        }
        writeln!(out, ")")?;
        for member in &dept.members {
            writeln!(out, "    - {member}")?;
        }
    }
    writeln!(out, "Teams")?;
    for team in &groups.teams {
        writeln!(out, "  {} (lead {}) {}", team.name, team.lead, team.focus)?;
        for member in &team.members {
            writeln!(out, "    - {member}")?;
        }
    }
    Ok(())
}

pub fn entities(out: &mut impl Write, entities: &[Entity]) -> fmt::Result {
    for entity in entities {
        writeln!(
            out,
            "{:<8} {:<28} {:<14} {:<18} {:>6}  {}",
            entity.id, entity.name, entity.kind, entity.location, entity.employees, entity.status
        )?;
    }
    Ok(())
}

pub fn as_of(out: &mut impl Write, date: NaiveDate) -> fmt::Result {
    writeln!(out, "as of {}", date.format("%A, %B %-d, %Y"))
}

/// Ten-cell bar, one cell per started 10%.
fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 10.0).ceil()) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}
