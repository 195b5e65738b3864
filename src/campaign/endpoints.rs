use actix_web::web::{Data, Json, Path};
use actix_web::{delete, post};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::marketer::{MarketerBody, MarketerId};
use crate::metrics::{self, AggregateMetrics};

use super::{manager, Campaign, CampaignId};

/// A stored campaign plus its recomputed metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub metrics: AggregateMetrics,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            metrics: metrics::campaign_metrics(&campaign),
            campaign,
        }
    }
}

#[post("/marketers/{marketer_id}/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn add_campaign_to_marketer(
    db: Data<dyn Database>,
    params: Path<MarketerId>,
    body: Json<Campaign>,
) -> Result<Json<MarketerBody>, Error> {
    let marketer_id = params.into_inner();
    let campaign = body.into_inner();

    let marketer = manager::add_campaign(db.get_ref(), &marketer_id, campaign).await?;

    Ok(Json(MarketerBody::render(marketer)))
}

#[delete("/marketers/{marketer_id}/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn remove_campaign_from_marketer(
    db: Data<dyn Database>,
    params: Path<(MarketerId, CampaignId)>,
) -> Result<Json<MarketerBody>, Error> {
    let (marketer_id, campaign_id) = params.into_inner();

    let marketer = manager::remove_campaign(db.get_ref(), &marketer_id, &campaign_id).await?;

    Ok(Json(MarketerBody::render(marketer)))
}
