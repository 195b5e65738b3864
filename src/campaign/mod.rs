use serde::{Deserialize, Serialize};

use crate::typedid::{lenient_id, TypedId, TypedIdMarker};
use crate::utils::{lenient_amount, lenient_count, lenient_optional_amount};

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

/// One advertising campaign, stored inside its marketer's document.
///
/// Numeric fields are read leniently: absent, `null` or unusable values
/// become `0`. `cost_per_message` and `cpm` are whatever the upstream input
/// carried; they are never trusted, see [`crate::metrics`]. A missing,
/// `null` or empty id reads as blank: writes assign a fresh id and stored
/// documents derive one from the marketer id and position.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default = "CampaignId::blank", deserialize_with = "lenient_id")]
    pub id: CampaignId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub messages: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reach: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub orders: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub freq: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub thru_play: u64,
    #[serde(
        default,
        rename = "costPerMsg",
        deserialize_with = "lenient_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_per_message: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub cpm: Option<f64>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CMP"
    }
}
