use std::sync::Arc;

use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod cache;
pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod format;
pub mod marketer;
pub mod metrics;
pub mod report;
pub mod seed;
pub mod typedid;
pub mod utils;

use crate::config::{Config, StoreKind};
use crate::database::{Database, MemoryDatabase, MongoDatabase};
use crate::error::Error;

/// Registers extractor error formats and every endpoint.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(marketer::endpoints::get_marketers)
    .service(marketer::endpoints::create_marketer)
    .service(marketer::endpoints::get_marketer_by_id)
    .service(marketer::endpoints::update_marketer)
    .service(marketer::endpoints::delete_marketer)
    .service(campaign::endpoints::add_campaign_to_marketer)
    .service(campaign::endpoints::remove_campaign_from_marketer)
    .service(report::endpoints::get_dashboard)
    .service(report::endpoints::get_report)
    .service(report::endpoints::export_report);
}

pub async fn not_found() -> HttpResponse {
    Error::PathNotFound.error_response()
}

pub async fn connect(config: &Config) -> Result<Arc<dyn Database>, Error> {
    let db: Arc<dyn Database> = match config.store {
        StoreKind::Mongo => {
            Arc::new(MongoDatabase::connect(&config.mongodb_uri, &config.database_name).await?)
        }
        StoreKind::Memory => {
            info!("using in-memory store");
            Arc::new(MemoryDatabase::new())
        }
    };

    if config.seed {
        info!("seeding demo marketers");
        seed::seed(db.as_ref()).await?;
    }

    Ok(db)
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db: Data<dyn Database> = Data::from(connect(&config).await?);

    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    Ok(())
}
