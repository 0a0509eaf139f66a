use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use shared::{
    domain::{Message, Report, Site, TeamMember},
    error::ApiError,
    protocol::{DashboardSummary, SessionEvent},
};
use site_api::format::{format_date, format_relative_or_absolute};

pub fn report_line(report: &Report) -> String {
    format!(
        "{}  [{}]  {}  {}%  {}  {}",
        report.id,
        report.status,
        report.site,
        report.progress_percent,
        format_date(report.date),
        report.engineer
    )
}

pub fn report_detail(report: &Report) -> String {
    let mut out = format!(
        "{}\n    completed: {}\n    remaining: {}",
        report_line(report),
        report.work_completed,
        report.work_remaining
    );
    if let Some(notes) = &report.notes {
        let _ = write!(out, "\n    notes: {notes}");
    }
    out
}

pub fn member_line(member: &TeamMember) -> String {
    format!(
        "{}  [{}]  {}, {}  ({})",
        member.id, member.status, member.name, member.role, member.site
    )
}

pub fn message_block(message: &Message, now: DateTime<Utc>) -> String {
    format!(
        "{}  [{}]  {} ({})\n    {}",
        message.id,
        message.kind,
        message.author,
        format_relative_or_absolute(message.timestamp, now),
        message.content
    )
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "overall progress: {}%", summary.overall_progress);
    let _ = writeln!(
        out,
        "on track: {}  at risk: {}  behind: {}",
        summary.on_track, summary.at_risk, summary.behind
    );
    let _ = writeln!(
        out,
        "reports: {} ({} awaiting approval)",
        summary.total_reports, summary.pending_review
    );
    let _ = writeln!(out, "team members active: {}", summary.active_members);
    for site in &summary.sites {
        let _ = writeln!(
            out,
            "  {:<32} {:>3}%  {:?}",
            site.site.name(),
            site.progress_percent,
            site.health
        );
    }
    out
}

pub fn sites() -> String {
    Site::ALL
        .iter()
        .map(|site| site.name())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn event(event: &SessionEvent, now: DateTime<Utc>) -> String {
    match event {
        SessionEvent::Reports { reports } if reports.is_empty() => "no reports".to_string(),
        SessionEvent::Reports { reports } => reports
            .iter()
            .map(report_line)
            .collect::<Vec<_>>()
            .join("\n"),
        SessionEvent::ReportSubmitted { report } => {
            format!("submitted {}", report_detail(report))
        }
        SessionEvent::ReportStatusChanged { report, previous } => {
            format!("{} moved from {} to {}", report.id, previous, report.status)
        }
        SessionEvent::ReportRemoved { report } => format!("removed {}", report.id),
        SessionEvent::Messages { messages } if messages.is_empty() => "no messages".to_string(),
        SessionEvent::Messages { messages } => messages
            .iter()
            .map(|m| message_block(m, now))
            .collect::<Vec<_>>()
            .join("\n"),
        SessionEvent::MessageSent { message } => {
            format!("sent {}", message_block(message, now))
        }
        SessionEvent::Team { members, active } => {
            let mut out = format!("{active} of {} members active", members.len());
            for member in members {
                let _ = write!(out, "\n{}", member_line(member));
            }
            out
        }
        SessionEvent::MemberSelected { member } => format!("selected {}", member_line(member)),
        SessionEvent::Dashboard { summary } => dashboard(summary).trim_end().to_string(),
    }
}

pub fn error(err: &ApiError) -> String {
    if err.fields.is_empty() {
        err.message.clone()
    } else {
        let fields = err
            .fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} (check: {fields})", err.message)
    }
}
