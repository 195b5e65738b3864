use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignId};
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type MarketerId = TypedId<Marketer>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "MarketerDocument")]
pub struct Marketer {
    #[serde(rename = "_id")]
    pub id: MarketerId,
    pub name: String,
    pub email: String,
    pub status: Status,
    pub campaigns: Vec<Campaign>,
}

/// The stored shape, before campaigns without an id are given one.
#[derive(Deserialize)]
struct MarketerDocument {
    #[serde(rename = "_id")]
    id: MarketerId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    campaigns: Vec<Campaign>,
}

impl From<MarketerDocument> for Marketer {
    fn from(document: MarketerDocument) -> Marketer {
        let mut campaigns = document.campaigns;
        for (index, campaign) in campaigns.iter_mut().enumerate() {
            if campaign.id.is_blank() {
                campaign.id = CampaignId::derived(&document.id, index);
            }
        }

        Marketer {
            id: document.id,
            name: document.name,
            email: document.email,
            status: document.status,
            campaigns,
        }
    }
}

impl Marketer {
    pub fn from_new(id: MarketerId, new: NewMarketer) -> Marketer {
        Marketer {
            id,
            name: new.name,
            email: new.email,
            status: new.status,
            campaigns: new.campaigns,
        }
    }

    /// Applies every field present in `patch`.
    pub fn apply(&mut self, patch: &MarketerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(campaigns) = &patch.campaigns {
            self.campaigns = campaigns.clone();
        }
    }

    /// Case-insensitive substring match on name or email.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

impl TypedIdMarker for Marketer {
    fn tag() -> &'static str {
        "MKT"
    }
}

/// A marketer before the store has assigned it an identifier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NewMarketer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MarketerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "strict_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaigns: Option<Vec<Campaign>>,
}

impl MarketerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.status.is_none()
            && self.campaigns.is_none()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    Vietnamese,
}

impl Status {
    /// Maps the spellings found in stored documents. Returns `None` for
    /// anything unrecognized.
    pub fn from_legacy(value: &str) -> Option<Status> {
        match value.trim().to_lowercase().as_str() {
            "active" | "hoạt động" | "hoat dong" => Some(Status::Active),
            "inactive" | "không hoạt động" | "khong hoat dong" | "ngừng hoạt động"
            | "ngung hoat dong" => Some(Status::Inactive),
            _ => None,
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Status::Active, Language::English) => "Active",
            (Status::Inactive, Language::English) => "Inactive",
            (Status::Active, Language::Vietnamese) => "Hoạt động",
            (Status::Inactive, Language::Vietnamese) => "Không hoạt động",
        }
    }

    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

impl Default for Status {
    fn default() -> Status {
        Status::Active
    }
}

/// Status as sent by a client. Unlike stored documents, an unrecognized
/// value is an error rather than `Inactive`.
pub fn strict_status<'de, D>(deserializer: D) -> Result<Option<Status>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => Status::from_legacy(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::unknown_variant(&raw, &["ACTIVE", "INACTIVE"])),
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let status = match raw {
            None => Status::default(),
            Some(raw) => Status::from_legacy(&raw).unwrap_or_else(|| {
                tracing::warn!(status = %raw, "unrecognized marketer status, reading as inactive");
                Status::Inactive
            }),
        };

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marketer(name: &str, email: &str) -> Marketer {
        Marketer {
            id: MarketerId::new(),
            name: name.into(),
            email: email.into(),
            status: Status::Active,
            campaigns: vec![],
        }
    }

    #[test]
    fn legacy_statuses_are_normalized() {
        assert_eq!(Status::from_legacy("Active"), Some(Status::Active));
        assert_eq!(Status::from_legacy("Hoạt động"), Some(Status::Active));
        assert_eq!(Status::from_legacy("Inactive"), Some(Status::Inactive));
        assert_eq!(Status::from_legacy(" ACTIVE "), Some(Status::Active));
        assert_eq!(Status::from_legacy("paused"), None);
    }

    #[test]
    fn status_deserializes_leniently() {
        let status: Status = serde_json::from_str("\"Hoạt động\"").unwrap();
        assert_eq!(status, Status::Active);
        let status: Status = serde_json::from_str("\"INACTIVE\"").unwrap();
        assert_eq!(status, Status::Inactive);
        let status: Status = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, Status::Inactive);
        let status: Status = serde_json::from_str("null").unwrap();
        assert_eq!(status, Status::Active);
    }

    #[test]
    fn status_serializes_canonically() {
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "\"ACTIVE\"");
        assert_eq!(Status::Inactive.label(Language::Vietnamese), "Không hoạt động");
    }

    #[test]
    fn missing_campaigns_and_status_use_defaults() {
        let marketer: Marketer =
            serde_json::from_str(r#"{"_id": "abc", "name": "Le Van C", "email": "lvc@example.com"}"#)
                .unwrap();

        assert_eq!(marketer.status, Status::Active);
        assert!(marketer.campaigns.is_empty());
    }

    #[test]
    fn campaigns_without_ids_read_the_same_every_time() {
        let document = mongodb::bson::doc! {
            "_id": "m-1",
            "name": "Le Van C",
            "campaigns": [
                { "name": "legacy", "spend": 10.0 },
                { "id": "C-005", "name": "App Install Asia" },
                { "id": mongodb::bson::Bson::Null, "name": "nulled" },
                { "id": "", "name": "emptied" },
            ],
        };

        let first: Marketer = mongodb::bson::from_document(document.clone()).unwrap();
        let second: Marketer = mongodb::bson::from_document(document).unwrap();

        let ids: Vec<&str> = first.campaigns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["m-1-0", "C-005", "m-1-2", "m-1-3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn patch_rejects_unknown_status() {
        let result = serde_json::from_str::<MarketerPatch>(r#"{"status": "actve"}"#);
        assert!(result.is_err());

        let patch: MarketerPatch = serde_json::from_str(r#"{"status": "Hoạt động"}"#).unwrap();
        assert_eq!(patch.status, Some(Status::Active));
        let patch: MarketerPatch = serde_json::from_str(r#"{"status": null}"#).unwrap();
        assert_eq!(patch.status, None);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut m = marketer("Tran Thi B", "ttb@example.com");
        m.apply(&MarketerPatch {
            status: Some(Status::Inactive),
            ..Default::default()
        });

        assert_eq!(m.name, "Tran Thi B");
        assert_eq!(m.email, "ttb@example.com");
        assert_eq!(m.status, Status::Inactive);
    }

    #[test]
    fn matches_name_or_email_ignoring_case() {
        let m = marketer("Nguyen Van A", "nva@example.com");

        assert!(m.matches("nguyen"));
        assert!(m.matches("NVA@"));
        assert!(m.matches("  "));
        assert!(!m.matches("tran"));
    }
}
