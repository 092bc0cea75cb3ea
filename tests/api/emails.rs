use anyhow::Result;
use forum_emails::model::Subscription;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinSet;

use crate::helpers::TestApp;

#[tokio::test]
async fn emails_create_returns_201_and_the_record() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.email_post("ursula_le_guin@gmail.com").await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Subscription = res.json().await?;
    assert_eq!(created.email_name, "ursula_le_guin@gmail.com");
    assert_eq!(app.email_name_of(created.id).await?, "ursula_le_guin@gmail.com");

    Ok(())
}

#[tokio::test]
async fn emails_create_duplicate_returns_409() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.subscription_create("a@x.com").await?;

    let res = app.email_post("a@x.com").await?;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["detail"], "Email already registered");
    assert_eq!(app.emails_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn emails_create_invalid_email_returns_422() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "email_name": "" }), "Empty email"),
        (json!({ "email_name": "not an email" }), "Invalid email"),
        (json!({ "email_name": "@domain.com" }), "Missing subject"),
        (json!({ "email_name": null }), "Null email"),
        (json!({ "email_name": 42 }), "Numeric email"),
        (json!({}), "Empty json"),
    ];

    for (body, description) in cases {
        let res = app.emails_post(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "The API did not return a 422 UNPROCESSABLE ENTITY when the payload was: {description}."
        );
        let body: Value = res.json().await?;
        assert_eq!(body["error"]["type"], "InvalidInput", "{description}");
        assert!(
            body["detail"]
                .as_str()
                .is_some_and(|detail| detail.starts_with("Received invalid input: ")),
            "{description}: {body}"
        );
    }
    assert_eq!(app.emails_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn emails_create_concurrent_duplicates_only_one_wins() -> Result<()> {
    let app = TestApp::spawn().await?;
    let url = app.url("/emails");

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let client = app.http_client.clone();
        let url = url.clone();
        set.spawn(async move {
            client
                .post(url)
                .json(&json!({ "email_name": "race@x.com" }))
                .send()
                .await
                .map(|res| res.status())
        });
    }

    let mut statuses = Vec::new();
    while let Some(status) = set.join_next().await {
        statuses.push(status??);
    }

    let created = statuses
        .iter()
        .filter(|st| **st == StatusCode::CREATED)
        .count();
    let conflicts = statuses
        .iter()
        .filter(|st| **st == StatusCode::CONFLICT)
        .count();
    assert_eq!(created, 1, "statuses: {statuses:?}");
    assert_eq!(conflicts, 9, "statuses: {statuses:?}");
    assert_eq!(app.emails_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn emails_create_without_content_type_returns_415() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/emails"))
        .body(r#"{"email_name": "a@x.com"}"#)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["type"], "InvalidInput");
    assert_eq!(app.emails_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn emails_create_malformed_json_returns_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/emails"))
        .header("content-type", "application/json")
        .body(r#"{"email_name": "#)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["type"], "InvalidInput");

    Ok(())
}

#[tokio::test]
async fn emails_list_empty() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.emails_get().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Subscription> = res.json().await?;
    assert!(body.is_empty());

    Ok(())
}

#[tokio::test]
async fn emails_list_returns_all_records() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.subscription_create("a@x.com").await?;
    let second = app.subscription_create("b@x.com").await?;

    let res = app.emails_get().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!([
            { "id": first, "email_name": "a@x.com" },
            { "id": second, "email_name": "b@x.com" },
        ])
    );

    Ok(())
}

#[tokio::test]
async fn emails_get_after_create() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.subscription_create("john.doe@example.com").await?;

    let res = app.email_get(id).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let sub: Subscription = res.json().await?;
    assert_eq!(
        sub,
        Subscription {
            id,
            email_name: "john.doe@example.com".into()
        }
    );

    Ok(())
}

#[tokio::test]
async fn emails_get_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.email_get(1).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["detail"], "Email not found");

    Ok(())
}

#[tokio::test]
async fn emails_get_non_integer_id_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/emails/abc")).send().await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["type"], "InvalidPath");

    Ok(())
}

#[tokio::test]
async fn emails_id_outside_the_id_range_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.subscription_create("a@x.com").await?;

    for id in ["3000000000", "-3000000000", "99999999999999999999999"] {
        let url = app.url(&format!("/emails/{id}"));
        let responses = [
            app.http_client.get(&url).send().await?,
            app.http_client
                .put(&url)
                .json(&json!({ "email_name": "b@x.com" }))
                .send()
                .await?,
            app.http_client.delete(&url).send().await?,
        ];

        for res in responses {
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "id: {id}");
            let body: Value = res.json().await?;
            assert_eq!(body["detail"], "Email not found", "id: {id}");
        }
    }
    assert_eq!(app.emails_count().await?, 1);
    assert_eq!(app.emails_count_with("b@x.com").await?, 0);

    Ok(())
}

#[tokio::test]
async fn emails_update_returns_204_and_keeps_the_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.subscription_create("old@x.com").await?;

    let res = app.email_put(id, "new@x.com").await?;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());
    assert_eq!(app.email_name_of(id).await?, "new@x.com");
    assert_eq!(app.emails_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn emails_update_to_the_same_email_succeeds() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.subscription_create("same@x.com").await?;

    let res = app.email_put(id, "same@x.com").await?;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.email_name_of(id).await?, "same@x.com");

    Ok(())
}

#[tokio::test]
async fn emails_update_to_an_email_of_another_record_returns_409() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.subscription_create("a@x.com").await?;
    let second = app.subscription_create("b@x.com").await?;

    let res = app.email_put(second, "a@x.com").await?;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(app.email_name_of(first).await?, "a@x.com");
    assert_eq!(app.email_name_of(second).await?, "b@x.com");

    Ok(())
}

#[tokio::test]
async fn emails_update_concurrent_to_the_same_email_only_one_wins() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.subscription_create("a@x.com").await?;
    let second = app.subscription_create("b@x.com").await?;

    let (first_res, second_res) = tokio::join!(
        app.email_put(first, "taken@x.com"),
        app.email_put(second, "taken@x.com"),
    );
    let mut statuses = [first_res?.status(), second_res?.status()];
    statuses.sort();

    assert_eq!(
        statuses,
        [StatusCode::NO_CONTENT, StatusCode::CONFLICT],
        "statuses: {statuses:?}"
    );
    assert_eq!(app.emails_count_with("taken@x.com").await?, 1);
    assert_eq!(app.emails_count().await?, 2);

    Ok(())
}

#[tokio::test]
async fn emails_update_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.email_put(77, "a@x.com").await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn emails_update_invalid_email_returns_422() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.subscription_create("a@x.com").await?;

    let res = app.email_put(id, "definitely-not-an-email").await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.email_name_of(id).await?, "a@x.com");

    Ok(())
}

#[tokio::test]
async fn emails_delete_then_get_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.subscription_create("gone@x.com").await?;

    let res = app.email_delete(id).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = app.email_get(id).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.emails_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn emails_delete_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.email_delete(5).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn emails_ids_are_not_reused_after_delete() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.subscription_create("a@x.com").await?;
    app.email_delete(first).await?.error_for_status()?;

    let second = app.subscription_create("a@x.com").await?;

    assert!(second > first, "id {second} reused or went backwards");

    Ok(())
}
