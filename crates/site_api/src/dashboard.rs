//! Site overview derived from the newest report per site.

use shared::{
    domain::{ReportStatus, Site},
    protocol::{DashboardSummary, SiteHealth, SiteProgress},
};
use storage::{MessageStore, ReportStore, TeamRoster};

pub const ON_TRACK_THRESHOLD: u8 = 55;
pub const AT_RISK_THRESHOLD: u8 = 40;

pub fn classify(progress_percent: u8) -> SiteHealth {
    if progress_percent >= ON_TRACK_THRESHOLD {
        SiteHealth::OnTrack
    } else if progress_percent >= AT_RISK_THRESHOLD {
        SiteHealth::AtRisk
    } else {
        SiteHealth::Behind
    }
}

/// Integer mean rounded half up; 0 for no values.
pub fn mean_percent(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let total: u32 = values.iter().map(|v| u32::from(*v)).sum();
    let count = values.len() as u32;
    let mean = (2 * total + count) / (2 * count);
    u8::try_from(mean).unwrap_or(100)
}

pub fn summarize(
    reports: &ReportStore,
    messages: &MessageStore,
    roster: &TeamRoster,
) -> DashboardSummary {
    let sites: Vec<SiteProgress> = Site::ALL
        .into_iter()
        .filter_map(|site| {
            reports.iter().find(|r| r.site == site).map(|latest| SiteProgress {
                site,
                progress_percent: latest.progress_percent,
                health: classify(latest.progress_percent),
                latest_report: Some(latest.id),
            })
        })
        .collect();

    let progress: Vec<u8> = sites.iter().map(|s| s.progress_percent).collect();
    let count = |health: SiteHealth| sites.iter().filter(|s| s.health == health).count();

    DashboardSummary {
        overall_progress: mean_percent(&progress),
        on_track: count(SiteHealth::OnTrack),
        at_risk: count(SiteHealth::AtRisk),
        behind: count(SiteHealth::Behind),
        pending_review: reports
            .iter()
            .filter(|r| r.status != ReportStatus::Approved)
            .count(),
        total_reports: reports.len(),
        active_members: roster.active_count(),
        latest_message: messages.latest().map(|m| m.id),
        sites,
    }
}
