use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use serde_with::skip_serializing_none;
use tracing::{debug, error};

use super::error::ClientError;
use crate::{utils, web::Error};

pub fn log_request(
    req_id: &str,
    req_method: Method,
    uri: Uri,
    status_code: StatusCode,
    web_error: Option<&Error>,
    client_status_and_error: Option<(StatusCode, ClientError)>,
) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let client_error_type = client_status_and_error
        .as_ref()
        .map(|(_, ce)| ce.as_ref().to_string());
    let status_code = client_status_and_error
        .as_ref()
        .map(|(sc, _)| *sc)
        .unwrap_or(status_code);
    let web_error_type = web_error.map(|we| we.as_ref().to_string());
    let web_error_msg = web_error.map(|we| utils::error_chain(we));

    let logline = LogLine {
        timestamp,
        req_id: req_id.to_string(),
        req_method: req_method.to_string(),
        uri: uri.to_string(),
        status_code: status_code.as_u16(),
        client_error_type,
        web_error_type,
        web_error_msg,
    };

    if status_code.is_server_error() {
        error!("LOGLINE: {}", json!(logline));
    } else {
        debug!("LOGLINE: {}", json!(logline));
    }
}

#[skip_serializing_none]
#[derive(Serialize)]
struct LogLine {
    timestamp: String,
    req_id: String,

    req_method: String,
    uri: String,
    status_code: u16,

    client_error_type: Option<String>,
    web_error_type: Option<String>,
    web_error_msg: Option<String>,
}
