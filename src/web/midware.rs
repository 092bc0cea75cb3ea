use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into the client error body
/// and logs one line per request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let req_id = resp.headers().get(REQUEST_ID_HEADER).cloned();
    let req_id_str = req_id
        .as_ref()
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({
            "detail": cl_err.to_string(),
            "error": {
                "type": cl_err.as_ref(),
                "req_id": req_id_str,
            }
        });

        let mut err_resp = (*status, Json(client_error_body)).into_response();
        if let Some(req_id) = req_id {
            err_resp.headers_mut().insert(REQUEST_ID_HEADER, req_id);
        }
        err_resp
    });

    log::log_request(
        &req_id_str,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
