use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use csv::{Terminator, WriterBuilder};

use crate::{
    model::{Subscription, SubscriptionRepo},
    web::WebResult,
    AppState,
};

pub const EXPORT_FILENAME: &str = "emails.csv";

#[tracing::instrument(name = "Exporting subscriptions as CSV", skip(app_state))]
pub async fn export(State(app_state): State<AppState>) -> WebResult<impl IntoResponse> {
    let mut session = app_state.database_mgr.session().await?;
    let subscriptions = SubscriptionRepo::new(&mut session).list().await?;
    drop(session);

    let body = subscriptions_to_csv(&subscriptions)?;

    let content_disposition = format!("attachment; filename={EXPORT_FILENAME}");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        body,
    ))
}

/// Records end with CRLF, fields are quoted only when they need to be.
fn subscriptions_to_csv(subscriptions: &[Subscription]) -> csv::Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(["Id", "EmailName"])?;
    for sub in subscriptions {
        wtr.write_record([sub.id.to_string().as_str(), sub.email_name.as_str()])?;
    }

    wtr.into_inner().map_err(|er| csv::Error::from(er.into_error()))
}
