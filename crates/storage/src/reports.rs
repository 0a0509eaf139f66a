use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use shared::{
    domain::{Report, ReportId, ReportInput, ReportStatus, Site, CURRENT_USER},
    error::{NotFoundError, StatusError, ValidationError},
    validation::{validate_report, validate_stored_report},
};
use tracing::{info, warn};

use crate::{next_id_after, Clock};

const SEED_ENGINEER: &str = "Engr. Sunday Adaogoshi Eya";

/// Work-status reports for one session, newest first.
pub struct ReportStore {
    reports: VecDeque<Report>,
    next_id: i64,
    default_engineer: String,
    clock: Arc<dyn Clock>,
}

impl ReportStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            reports: VecDeque::new(),
            next_id: 1,
            default_engineer: CURRENT_USER.to_string(),
            clock,
        }
    }

    /// Replays stored records, already in display order.
    ///
    /// Each record is held to the same rules as `submit`. Fails on the first
    /// invalid record or duplicate id. New ids continue after the highest one.
    pub fn from_records(clock: Arc<dyn Clock>, records: Vec<Report>) -> Result<Self> {
        let next_id = next_id_after("report", records.iter().map(|r| r.id.0))?;
        let mut seen = HashSet::with_capacity(records.len());
        for report in &records {
            if !seen.insert(report.id) {
                bail!("duplicate report id {} in restored records", report.id);
            }
            validate_stored_report(report)
                .with_context(|| format!("restored report {} is invalid", report.id))?;
        }
        Ok(Self {
            reports: records.into(),
            next_id,
            default_engineer: CURRENT_USER.to_string(),
            clock,
        })
    }

    /// Store preloaded with the sample reports shown on a fresh install.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let records = seed_reports();
        let next_id = records.len() as i64 + 1;
        Self {
            reports: records.into(),
            next_id,
            default_engineer: CURRENT_USER.to_string(),
            clock,
        }
    }

    pub fn with_default_engineer(mut self, engineer: impl Into<String>) -> Self {
        self.default_engineer = engineer.into();
        self
    }

    pub fn list(&self) -> Vec<Report> {
        self.reports.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Report> + '_ {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn for_site(&self, site: Site) -> Vec<Report> {
        self.reports
            .iter()
            .filter(|r| r.site == site)
            .cloned()
            .collect()
    }

    pub fn with_status(&self, status: ReportStatus) -> Vec<Report> {
        self.reports
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    pub fn submit(&mut self, input: &ReportInput) -> Result<Report, ValidationError> {
        let validated = validate_report(input).inspect_err(|err| {
            warn!(fields = %err, "rejected report submission");
        })?;

        let report = Report {
            id: ReportId(self.next_id),
            site: validated.site,
            date: validated.date.unwrap_or_else(|| self.clock.today()),
            work_completed: validated.work_completed,
            progress_percent: validated.progress_percent,
            work_remaining: validated.work_remaining,
            status: ReportStatus::Pending,
            engineer: validated
                .engineer
                .unwrap_or_else(|| self.default_engineer.clone()),
            notes: validated.notes,
        };
        self.next_id += 1;
        self.reports.push_front(report.clone());
        info!(
            report_id = %report.id,
            site = %report.site,
            progress = report.progress_percent,
            "report submitted"
        );
        Ok(report)
    }

    /// Moves a report forward through review. Only `status` changes.
    pub fn set_status(
        &mut self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<Report, StatusError> {
        let Some(report) = self.reports.iter_mut().find(|r| r.id == id) else {
            warn!(report_id = %id, "status change for unknown report");
            return Err(NotFoundError { id }.into());
        };
        if !report.status.can_transition_to(status) {
            warn!(
                report_id = %id,
                from = %report.status,
                to = %status,
                "rejected status transition"
            );
            return Err(StatusError::InvalidTransition {
                id,
                from: report.status,
                to: status,
            });
        }
        let previous = report.status;
        report.status = status;
        info!(report_id = %id, from = %previous, to = %status, "report status changed");
        Ok(report.clone())
    }

    pub fn remove(&mut self, id: ReportId) -> Result<Report, NotFoundError> {
        let Some(removed) = self
            .reports
            .iter()
            .position(|r| r.id == id)
            .and_then(|index| self.reports.remove(index))
        else {
            warn!(report_id = %id, "removal of unknown report");
            return Err(NotFoundError { id });
        };
        info!(report_id = %id, "report removed");
        Ok(removed)
    }
}

type SeedReport = (Site, (i32, u32, u32), &'static str, u8, &'static str);

const SEED_REPORTS: [SeedReport; 3] = [
    (
        Site::GullyRehabilitationKeffi,
        (2026, 2, 12),
        "Completed terracing on 2.5 hectares, installed water management structures",
        72,
        "Vegetation planting and monitoring (4 weeks)",
    ),
    (
        Site::SoilConservationLafia,
        (2026, 2, 11),
        "Soil stabilization on 1.8 hectares, completed survey",
        58,
        "Slope reinforcement and drainage system installation (6 weeks)",
    ),
    (
        Site::TerracingProjectNasarawa,
        (2026, 2, 10),
        "Completed 85% of terracing work, installed retention walls",
        85,
        "Final surface preparation and vegetation (2 weeks)",
    ),
];

fn seed_reports() -> Vec<Report> {
    SEED_REPORTS
        .iter()
        .zip(1..)
        .map(|(&(site, (y, m, d), done, progress, remaining), id)| Report {
            id: ReportId(id),
            site,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            work_completed: done.to_string(),
            progress_percent: progress,
            work_remaining: remaining.to_string(),
            status: ReportStatus::Approved,
            engineer: SEED_ENGINEER.to_string(),
            notes: None,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/reports_tests.rs"]
mod tests;
