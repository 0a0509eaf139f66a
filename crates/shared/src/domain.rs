use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParseIdError, UnknownValueError};

/// Placeholder attribution used while there is no signed-in user.
pub const CURRENT_USER: &str = "Current User";

macro_rules! id_newtype {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{:03}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                let digits = trimmed
                    .strip_prefix(concat!($prefix, "-"))
                    .unwrap_or(trimmed);
                digits
                    .parse::<i64>()
                    .ok()
                    .filter(|value| *value > 0)
                    .map($name)
                    .ok_or_else(|| ParseIdError::new($prefix, raw))
            }
        }
    };
}

id_newtype!(ReportId, "rep");
id_newtype!(MessageId, "msg");
id_newtype!(MemberId, "tm");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "Gully Rehabilitation - Keffi")]
    GullyRehabilitationKeffi,
    #[serde(rename = "Soil Conservation - Lafia")]
    SoilConservationLafia,
    #[serde(rename = "Terracing Project - Nasarawa")]
    TerracingProjectNasarawa,
    #[serde(rename = "Water Management - Akwanga")]
    WaterManagementAkwanga,
    #[serde(rename = "Vegetation Recovery - Obi")]
    VegetationRecoveryObi,
    #[serde(rename = "Slope Stabilization - Wamba")]
    SlopeStabilizationWamba,
}

impl Site {
    /// Every known project site, in the order the report form lists them.
    pub const ALL: [Site; 6] = [
        Site::GullyRehabilitationKeffi,
        Site::SoilConservationLafia,
        Site::TerracingProjectNasarawa,
        Site::WaterManagementAkwanga,
        Site::VegetationRecoveryObi,
        Site::SlopeStabilizationWamba,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Site::GullyRehabilitationKeffi => "Gully Rehabilitation - Keffi",
            Site::SoilConservationLafia => "Soil Conservation - Lafia",
            Site::TerracingProjectNasarawa => "Terracing Project - Nasarawa",
            Site::WaterManagementAkwanga => "Water Management - Akwanga",
            Site::VegetationRecoveryObi => "Vegetation Recovery - Obi",
            Site::SlopeStabilizationWamba => "Slope Stabilization - Wamba",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Site {
    type Err = UnknownValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Site::ALL
            .into_iter()
            .find(|site| site.name() == wanted)
            .ok_or_else(|| UnknownValueError::new("site", raw))
    }
}

/// Review state of a report. Moves forward only; `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Submitted,
    Approved,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Submitted => "submitted",
            ReportStatus::Approved => "approved",
        }
    }

    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::Pending, ReportStatus::Submitted)
                | (ReportStatus::Pending, ReportStatus::Approved)
                | (ReportStatus::Submitted, ReportStatus::Approved)
        )
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = UnknownValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "submitted" => Ok(ReportStatus::Submitted),
            "approved" => Ok(ReportStatus::Approved),
            _ => Err(UnknownValueError::new("status", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Update,
    Alert,
    Milestone,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Update => "update",
            MessageType::Alert => "alert",
            MessageType::Milestone => "milestone",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = UnknownValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "update" => Ok(MessageType::Update),
            "alert" => Ok(MessageType::Alert),
            "milestone" => Ok(MessageType::Milestone),
            _ => Err(UnknownValueError::new("message type", raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub site: Site,
    pub date: NaiveDate,
    pub work_completed: String,
    pub progress_percent: u8,
    pub work_remaining: String,
    pub status: ReportStatus,
    pub engineer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MessageType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Offline,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub role: String,
    /// Free-text assignment such as "All Sites"; not limited to [`Site`].
    pub site: String,
    pub status: MemberStatus,
}

/// Raw form values for a new report, exactly as the form collected them.
///
/// `site` is the select-box value and `progress_percent` the slider value.
/// Neither is trusted until it passes validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    pub site: String,
    pub work_completed: String,
    pub progress_percent: i64,
    pub work_remaining: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer: Option<String>,
    /// Falls back to the submission day when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_with_padded_prefix() {
        assert_eq!(ReportId(1).to_string(), "rep-001");
        assert_eq!(MessageId(1234).to_string(), "msg-1234");
    }

    #[test]
    fn ids_parse_prefixed_and_bare_forms() {
        assert_eq!("rep-007".parse::<ReportId>().expect("prefixed"), ReportId(7));
        assert_eq!(" 12 ".parse::<ReportId>().expect("bare"), ReportId(12));
        assert!("msg-007".parse::<ReportId>().is_err());
        assert!("rep-0".parse::<ReportId>().is_err());
    }

    #[test]
    fn site_names_round_trip_through_from_str() {
        for site in Site::ALL {
            assert_eq!(site.name().parse::<Site>().expect("known site"), site);
        }
        assert!("Erosion Site - Nowhere".parse::<Site>().is_err());
        assert!("".parse::<Site>().is_err());
    }

    #[test]
    fn site_serializes_as_display_name() {
        let json = serde_json::to_string(&Site::VegetationRecoveryObi).expect("json");
        assert_eq!(json, "\"Vegetation Recovery - Obi\"");
    }

    #[test]
    fn status_moves_forward_only() {
        use ReportStatus::*;
        assert!(Pending.can_transition_to(Submitted));
        assert!(Pending.can_transition_to(Approved));
        assert!(Submitted.can_transition_to(Approved));
        assert!(!Submitted.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Submitted));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn member_ids_render_with_tm_prefix() {
        assert_eq!(MemberId(5).to_string(), "tm-005");
        assert_eq!("tm-005".parse::<MemberId>().expect("member id"), MemberId(5));
    }

    #[test]
    fn report_notes_are_omitted_when_absent() {
        let input = ReportInput::default();
        let value = serde_json::to_value(&input).expect("json");
        assert!(value.get("notes").is_none());
        let parsed: ReportInput = serde_json::from_str(
            r#"{"site":"","work_completed":"","progress_percent":0,"work_remaining":"","notes":"muddy access road"}"#,
        )
        .expect("input");
        assert_eq!(parsed.notes.as_deref(), Some("muddy access road"));
    }

    #[test]
    fn message_serializes_kind_under_type_key() {
        let message = Message {
            id: MessageId(1),
            author: CURRENT_USER.into(),
            content: "hello".into(),
            timestamp: DateTime::<Utc>::from_timestamp(0, 0).expect("epoch"),
            kind: MessageType::Alert,
        };
        let value = serde_json::to_value(&message).expect("json");
        assert_eq!(value["type"], "alert");
        assert_eq!(value["id"], 1);
    }
}
