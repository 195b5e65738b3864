use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, patch, post, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignBody};
use crate::database::Database;
use crate::error::Error;
use crate::metrics::{self, AggregateMetrics};

use super::{manager, strict_status, Marketer, MarketerId, MarketerPatch, NewMarketer, Status};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateMarketerBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "strict_status")]
    pub status: Option<Status>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketerBody {
    pub id: MarketerId,
    pub name: String,
    pub email: String,
    pub status: Status,
    pub campaigns: Vec<CampaignBody>,
    pub metrics: AggregateMetrics,
}

impl MarketerBody {
    pub fn render(marketer: Marketer) -> MarketerBody {
        MarketerBody {
            metrics: metrics::aggregate(&marketer.campaigns),
            id: marketer.id,
            name: marketer.name,
            email: marketer.email,
            status: marketer.status,
            campaigns: marketer
                .campaigns
                .into_iter()
                .map(CampaignBody::render)
                .collect(),
        }
    }
}

#[get("/marketers")]
#[tracing::instrument(skip(db))]
pub async fn get_marketers(
    db: Data<dyn Database>,
    query: Query<SearchQuery>,
) -> Result<Json<Vec<MarketerBody>>, Error> {
    let query = query.into_inner();

    let marketers = manager::get_marketers(db.get_ref(), query.search.as_deref()).await?;

    Ok(Json(marketers.into_iter().map(MarketerBody::render).collect()))
}

#[post("/marketers")]
#[tracing::instrument(skip(db))]
pub async fn create_marketer(
    db: Data<dyn Database>,
    body: Json<CreateMarketerBody>,
) -> Result<Json<MarketerBody>, Error> {
    let body = body.into_inner();

    let new = NewMarketer {
        name: body.name,
        email: body.email,
        status: body.status.unwrap_or_default(),
        campaigns: body.campaigns,
    };
    let marketer = manager::create_marketer(db.get_ref(), new).await?;

    Ok(Json(MarketerBody::render(marketer)))
}

#[get("/marketers/{marketer_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_marketer_by_id(
    db: Data<dyn Database>,
    params: Path<MarketerId>,
) -> Result<Json<MarketerBody>, Error> {
    let marketer_id = params.into_inner();

    let marketer = manager::get_marketer_by_id(db.get_ref(), &marketer_id).await?;

    Ok(Json(MarketerBody::render(marketer)))
}

#[patch("/marketers/{marketer_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_marketer(
    db: Data<dyn Database>,
    params: Path<MarketerId>,
    body: Json<MarketerPatch>,
) -> Result<Json<MarketerBody>, Error> {
    let marketer_id = params.into_inner();
    let patch = body.into_inner();

    let marketer = manager::update_marketer(db.get_ref(), &marketer_id, patch).await?;

    Ok(Json(MarketerBody::render(marketer)))
}

#[delete("/marketers/{marketer_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_marketer(
    db: Data<dyn Database>,
    params: Path<MarketerId>,
) -> Result<HttpResponse, Error> {
    let marketer_id = params.into_inner();

    manager::delete_marketer(db.get_ref(), &marketer_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
