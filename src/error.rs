use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use config::ConfigError;
use derivative::Derivative;
use mongodb::bson::de::Error as BsonDeError;
use mongodb::bson::ser::Error as BsonSerError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;
use crate::marketer::MarketerId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    MarketerFieldRequired {
        field: &'static str,
    },

    // 404
    PathNotFound,
    MarketerNotFound {
        marketer_id: MarketerId,
    },
    CampaignNotFound {
        marketer_id: MarketerId,
        campaign_id: CampaignId,
    },

    // 409
    DuplicateCampaignId {
        marketer_id: Option<MarketerId>,
        campaign_id: CampaignId,
    },

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonSerError),
    #[serde(serialize_with = "display")]
    FailedToDeserializeFromBson(#[derivative(PartialEq = "ignore")] BsonDeError),
    #[serde(serialize_with = "display")]
    InvalidConfig(#[derivative(PartialEq = "ignore")] ConfigError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidQuery(_) => "E4001003",
            Error::MarketerFieldRequired { .. } => "E4001004",
            Error::PathNotFound => "E4041000",
            Error::MarketerNotFound { .. } => "E4041001",
            Error::CampaignNotFound { .. } => "E4041002",
            Error::DuplicateCampaignId { .. } => "E4091000",
            Error::FailedDatabaseCall(_) => "E5001001",
            Error::FailedToSerializeToBson(_) => "E5001002",
            Error::FailedToDeserializeFromBson(_) => "E5001003",
            Error::InvalidConfig(_) => "E5001004",
            Error::IoError(_) => "E5001005",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::MarketerFieldRequired { .. } => "The marketer is missing a required field",
            Error::PathNotFound => "The requested path was not found",
            Error::MarketerNotFound { .. } => "The requested marketer was not found",
            Error::CampaignNotFound { .. } => {
                "The requested campaign was not found for the marketer"
            }
            Error::DuplicateCampaignId { .. } => {
                "The marketer already has a campaign with the given id"
            }
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::FailedToDeserializeFromBson(_) => {
                "An error occurred when deserializing an object from bson"
            }
            Error::InvalidConfig(_) => "The server configuration could not be loaded",
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::MarketerFieldRequired { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::MarketerNotFound { .. } => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::DuplicateCampaignId { .. } => StatusCode::CONFLICT,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToDeserializeFromBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonSerError> for Error {
    fn from(error: BsonSerError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<BsonDeError> for Error {
    fn from(error: BsonDeError) -> Error {
        Error::FailedToDeserializeFromBson(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Error {
        Error::InvalidConfig(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::FailedToDeserializeFromBson(err) => Some(err),
            Error::InvalidConfig(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
