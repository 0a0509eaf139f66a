use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{
    domain::{
        MemberId, Message, MessageInput, Report, ReportId, ReportInput, ReportStatus, Site,
        TeamMember,
    },
    error::ApiError,
    protocol::{DashboardSummary, SessionEvent, SessionRequest, SessionSnapshot},
};
use storage::{Clock, MessageStore, ReportStore, TeamRoster};
use tracing::debug;

pub mod dashboard;
pub mod format;

/// One running session: both stores, owned here and handed to the
/// presentation layer by reference.
pub struct Session {
    reports: ReportStore,
    messages: MessageStore,
    roster: TeamRoster,
    selected_member: Option<MemberId>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            reports: ReportStore::new(clock.clone()),
            messages: MessageStore::new(clock.clone()),
            roster: TeamRoster::seeded(),
            selected_member: None,
            clock,
        }
    }

    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        Self {
            reports: ReportStore::seeded(clock.clone()),
            messages: MessageStore::seeded(clock.clone()),
            roster: TeamRoster::seeded(),
            selected_member: None,
            clock,
        }
    }

    pub fn restore(clock: Arc<dyn Clock>, snapshot: SessionSnapshot) -> Result<Self> {
        let reports = ReportStore::from_records(clock.clone(), snapshot.reports)
            .context("failed to restore reports")?;
        let messages = MessageStore::from_records(clock.clone(), snapshot.messages)
            .context("failed to restore messages")?;
        Ok(Self {
            reports,
            messages,
            roster: TeamRoster::seeded(),
            selected_member: None,
            clock,
        })
    }

    /// Attribution used when a form leaves engineer or author blank.
    pub fn with_attribution(
        mut self,
        engineer: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        self.reports = self.reports.with_default_engineer(engineer);
        self.messages = self.messages.with_default_author(author);
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.clock.now(), self.reports.list(), self.messages.list())
    }

    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    pub fn list_reports(&self, site: Option<Site>, status: Option<ReportStatus>) -> Vec<Report> {
        match (site, status) {
            (None, None) => self.reports.list(),
            (Some(site), None) => self.reports.for_site(site),
            (None, Some(status)) => self.reports.with_status(status),
            (Some(site), Some(status)) => self
                .reports
                .for_site(site)
                .into_iter()
                .filter(|r| r.status == status)
                .collect(),
        }
    }

    pub fn submit_report(&mut self, input: &ReportInput) -> Result<Report, ApiError> {
        Ok(self.reports.submit(input)?)
    }

    pub fn set_report_status(
        &mut self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<(Report, ReportStatus), ApiError> {
        let previous = self
            .reports
            .get(id)
            .map(|r| r.status)
            .unwrap_or(status);
        let report = self.reports.set_status(id, status)?;
        Ok((report, previous))
    }

    pub fn remove_report(&mut self, id: ReportId) -> Result<Report, ApiError> {
        Ok(self.reports.remove(id)?)
    }

    pub fn list_messages(&self) -> Vec<Message> {
        self.messages.list()
    }

    pub fn send_message(&mut self, input: &MessageInput) -> Result<Message, ApiError> {
        Ok(self
            .messages
            .send(&input.content, input.author.as_deref(), input.kind)?)
    }

    pub fn list_team(&self) -> Vec<TeamMember> {
        self.roster.list().to_vec()
    }

    pub fn active_members(&self) -> usize {
        self.roster.active_count()
    }

    /// Marks a roster member as the one being viewed. Unknown ids leave the
    /// current selection in place.
    pub fn select_member(&mut self, id: MemberId) -> Result<TeamMember, ApiError> {
        let member = self.roster.get(id)?.clone();
        self.selected_member = Some(member.id);
        Ok(member)
    }

    pub fn selected_member(&self) -> Option<&TeamMember> {
        self.selected_member.and_then(|id| self.roster.get(id).ok())
    }

    pub fn dashboard(&self) -> DashboardSummary {
        dashboard::summarize(&self.reports, &self.messages, &self.roster)
    }

    pub fn handle(&mut self, request: SessionRequest) -> Result<SessionEvent, ApiError> {
        debug!(?request, "handling session request");
        let event = match request {
            SessionRequest::ListReports { site, status } => SessionEvent::Reports {
                reports: self.list_reports(site, status),
            },
            SessionRequest::SubmitReport(input) => SessionEvent::ReportSubmitted {
                report: self.submit_report(&input)?,
            },
            SessionRequest::SetReportStatus { id, status } => {
                let (report, previous) = self.set_report_status(id, status)?;
                SessionEvent::ReportStatusChanged { report, previous }
            }
            SessionRequest::RemoveReport { id } => SessionEvent::ReportRemoved {
                report: self.remove_report(id)?,
            },
            SessionRequest::ListMessages => SessionEvent::Messages {
                messages: self.list_messages(),
            },
            SessionRequest::SendMessage(input) => SessionEvent::MessageSent {
                message: self.send_message(&input)?,
            },
            SessionRequest::ListTeam => SessionEvent::Team {
                members: self.list_team(),
                active: self.active_members(),
            },
            SessionRequest::SelectMember { id } => SessionEvent::MemberSelected {
                member: self.select_member(id)?,
            },
            SessionRequest::Dashboard => SessionEvent::Dashboard {
                summary: self.dashboard(),
            },
        };
        Ok(event)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
