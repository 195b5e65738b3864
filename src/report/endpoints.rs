use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{Data, Json};
use actix_web::{get, HttpResponse};

use crate::database::Database;
use crate::error::Error;
use crate::marketer::manager;

use super::{DashboardOverview, Report};

#[get("/dashboard")]
#[tracing::instrument(skip(db))]
pub async fn get_dashboard(db: Data<dyn Database>) -> Result<Json<DashboardOverview>, Error> {
    let marketers = manager::get_marketers(db.get_ref(), None).await?;

    Ok(Json(DashboardOverview::build(&marketers)))
}

#[get("/reports")]
#[tracing::instrument(skip(db))]
pub async fn get_report(db: Data<dyn Database>) -> Result<Json<Report>, Error> {
    let marketers = manager::get_marketers(db.get_ref(), None).await?;

    Ok(Json(Report::build(&marketers)))
}

#[get("/reports/export")]
#[tracing::instrument(skip(db))]
pub async fn export_report(db: Data<dyn Database>) -> Result<HttpResponse, Error> {
    let marketers = manager::get_marketers(db.get_ref(), None).await?;
    let csv = Report::build(&marketers).to_csv();

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("report.csv".to_string())],
        })
        .body(csv))
}
