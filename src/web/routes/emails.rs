use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    model::{Subscription, SubscriptionRepo},
    web::{
        extractors::{EmailBody, SubscriptionId},
        WebResult,
    },
    AppState,
};

#[tracing::instrument(name = "Listing subscriptions", skip(app_state))]
pub async fn list(State(app_state): State<AppState>) -> WebResult<Json<Vec<Subscription>>> {
    let mut session = app_state.database_mgr.session().await?;
    let subscriptions = SubscriptionRepo::new(&mut session).list().await?;

    Ok(Json(subscriptions))
}

#[tracing::instrument(name = "Getting a subscription", skip(app_state))]
pub async fn get(
    State(app_state): State<AppState>,
    SubscriptionId(id): SubscriptionId,
) -> WebResult<Json<Subscription>> {
    let mut session = app_state.database_mgr.session().await?;
    let subscription = SubscriptionRepo::new(&mut session).get(id).await?;

    Ok(Json(subscription))
}

#[tracing::instrument(
    name = "Adding a new subscription",
    skip(app_state, email),
    fields(email_name = email.as_ref())
)]
pub async fn create(
    State(app_state): State<AppState>,
    EmailBody(email): EmailBody,
) -> WebResult<(StatusCode, Json<Subscription>)> {
    let mut session = app_state.database_mgr.session().await?;
    let subscription = SubscriptionRepo::new(&mut session).create(email.as_ref()).await?;
    info!("New subscription with id {} added.", subscription.id);

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[tracing::instrument(
    name = "Updating a subscription",
    skip(app_state, email),
    fields(email_name = email.as_ref())
)]
pub async fn update(
    State(app_state): State<AppState>,
    SubscriptionId(id): SubscriptionId,
    EmailBody(email): EmailBody,
) -> WebResult<StatusCode> {
    let mut session = app_state.database_mgr.session().await?;
    SubscriptionRepo::new(&mut session)
        .update(id, email.as_ref())
        .await?;
    info!("SUCCESS");

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Removing a subscription", skip(app_state))]
pub async fn delete(
    State(app_state): State<AppState>,
    SubscriptionId(id): SubscriptionId,
) -> WebResult<StatusCode> {
    let mut session = app_state.database_mgr.session().await?;
    SubscriptionRepo::new(&mut session).delete(id).await?;
    info!("SUCCESS");

    Ok(StatusCode::NO_CONTENT)
}
