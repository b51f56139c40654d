//! Response payloads shared by the handlers.
//!
//! Engine failures are reported with a fixed message so internals never
//! reach the caller; the details only go to the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::params::ParamError;

/// Message returned whenever the engine fails.
pub const GENERIC_EXCEPTION: &str = "Please contact the server administrator to check the issue";

/// Decoy payload for deflected scanners.
pub const BOT_MESSAGE: &str = "These are not the droids you are looking for";

#[derive(Debug, Serialize)]
pub struct ExceptionBody {
    pub exception: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailBody {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct BotBody {
    pub bot: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SourcesBody {
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DnsBruteBody {
    pub dns_bruteforce: crate::engine::HarvestResult,
}

/// Generic engine failure with the given status.
pub fn engine_failure(status: StatusCode) -> Response {
    (
        status,
        Json(ExceptionBody {
            exception: GENERIC_EXCEPTION,
        }),
    )
        .into_response()
}

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(DetailBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
