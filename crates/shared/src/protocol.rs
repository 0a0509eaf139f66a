use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    MemberId, Message, MessageId, MessageInput, Report, ReportId, ReportInput, ReportStatus,
    Site, TeamMember,
};

pub const SNAPSHOT_VERSION: u8 = 1;

/// Requests the presentation layer issues against a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionRequest {
    ListReports {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        site: Option<Site>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<ReportStatus>,
    },
    SubmitReport(ReportInput),
    SetReportStatus {
        id: ReportId,
        status: ReportStatus,
    },
    RemoveReport {
        id: ReportId,
    },
    ListMessages,
    SendMessage(MessageInput),
    ListTeam,
    SelectMember {
        id: MemberId,
    },
    Dashboard,
}

impl SessionRequest {
    /// Whether handling the request can change either collection.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            SessionRequest::SubmitReport(_)
                | SessionRequest::SetReportStatus { .. }
                | SessionRequest::RemoveReport { .. }
                | SessionRequest::SendMessage(_)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    Reports { reports: Vec<Report> },
    ReportSubmitted { report: Report },
    ReportStatusChanged {
        report: Report,
        previous: ReportStatus,
    },
    ReportRemoved { report: Report },
    Messages { messages: Vec<Message> },
    MessageSent { message: Message },
    Team {
        members: Vec<TeamMember>,
        active: usize,
    },
    MemberSelected { member: TeamMember },
    Dashboard { summary: DashboardSummary },
}

/// Latest known state of one site, derived from its newest report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProgress {
    pub site: Site,
    pub progress_percent: u8,
    pub health: SiteHealth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_report: Option<ReportId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteHealth {
    OnTrack,
    AtRisk,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub sites: Vec<SiteProgress>,
    pub overall_progress: u8,
    pub on_track: usize,
    pub at_risk: usize,
    pub behind: usize,
    pub pending_review: usize,
    pub total_reports: usize,
    pub active_members: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_message: Option<MessageId>,
}

/// Serialized form of a session: both collections in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u8,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl SessionSnapshot {
    pub fn new(saved_at: DateTime<Utc>, reports: Vec<Report>, messages: Vec<Message>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            reports,
            messages,
        }
    }
}
