use crate::database::Database;
use crate::error::Error;
use crate::marketer::manager::{
    assign_campaign_ids, ensure_unique_campaign_ids, get_marketer_by_id,
};
use crate::marketer::{Marketer, MarketerId, MarketerPatch};

use super::{Campaign, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn add_campaign(
    db: &dyn Database,
    marketer_id: &MarketerId,
    campaign: Campaign,
) -> Result<Marketer, Error> {
    let mut marketer = get_marketer_by_id(db, marketer_id).await?;

    let mut campaigns = marketer.campaigns.clone();
    campaigns.push(campaign);
    assign_campaign_ids(&mut campaigns);
    ensure_unique_campaign_ids(Some(marketer_id), &campaigns)?;

    let patch = MarketerPatch {
        campaigns: Some(campaigns),
        ..Default::default()
    };
    db.marketers().update_marketer(marketer_id, &patch).await?;
    marketer.apply(&patch);

    Ok(marketer)
}

#[tracing::instrument(skip(db))]
pub async fn remove_campaign(
    db: &dyn Database,
    marketer_id: &MarketerId,
    campaign_id: &CampaignId,
) -> Result<Marketer, Error> {
    let mut marketer = get_marketer_by_id(db, marketer_id).await?;

    if !marketer.campaigns.iter().any(|c| &c.id == campaign_id) {
        return Err(Error::CampaignNotFound {
            marketer_id: marketer_id.clone(),
            campaign_id: campaign_id.clone(),
        });
    }

    let campaigns = marketer
        .campaigns
        .iter()
        .filter(|c| &c.id != campaign_id)
        .cloned()
        .collect();
    let patch = MarketerPatch {
        campaigns: Some(campaigns),
        ..Default::default()
    };
    db.marketers().update_marketer(marketer_id, &patch).await?;
    marketer.apply(&patch);

    Ok(marketer)
}
