use shared::{
    domain::{MemberId, MemberStatus, TeamMember},
    error::MemberNotFoundError,
};

/// Project team shown beside the feed. Fixed for the session.
pub struct TeamRoster {
    members: Vec<TeamMember>,
}

impl TeamRoster {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    pub fn seeded() -> Self {
        let members = SEED_MEMBERS
            .iter()
            .zip(1..)
            .map(|(&(name, role, site, status), id)| TeamMember {
                id: MemberId(id),
                name: name.to_string(),
                role: role.to_string(),
                site: site.to_string(),
                status,
            })
            .collect();
        Self { members }
    }

    pub fn list(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn get(&self, id: MemberId) -> Result<&TeamMember, MemberNotFoundError> {
        self.members
            .iter()
            .find(|member| member.id == id)
            .ok_or(MemberNotFoundError { id })
    }

    pub fn active_count(&self) -> usize {
        self.members
            .iter()
            .filter(|member| member.status == MemberStatus::Active)
            .count()
    }
}

const SEED_MEMBERS: [(&str, &str, &str, MemberStatus); 6] = [
    (
        "Dr. Mohammed Ismail, P.hD",
        "Project Coordinator (Head)",
        "Overall State Coordination",
        MemberStatus::Active,
    ),
    (
        "Engr. Sunday Adaogoshi Eya",
        "Project Engineer",
        "All Sites",
        MemberStatus::Active,
    ),
    (
        "Supervisor James Okoro",
        "Site Supervisor",
        "Multiple Sites",
        MemberStatus::Active,
    ),
    (
        "Dr. Fatima Adeyemi",
        "Project Manager",
        "Overall Coordination",
        MemberStatus::Active,
    ),
    (
        "Eng. Peter Nwankwo",
        "Team Lead",
        "Water Management - Akwanga",
        MemberStatus::Offline,
    ),
    (
        "Eng. Chukwu Obi",
        "Site Coordinator",
        "Keffi and Lafia Sites",
        MemberStatus::Active,
    ),
];
