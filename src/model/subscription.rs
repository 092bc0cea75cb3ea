use serde::{Deserialize, Serialize};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::debug;

use super::{Error, Result};

/// A row of the `emails` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: i32,
    pub email_name: String,
}

/// Runs the subscription operations on a single session.
/// Operations made of more than one statement run inside one transaction,
/// an early return drops the transaction which rolls it back.
pub struct SubscriptionRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> SubscriptionRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&mut self) -> Result<Vec<Subscription>> {
        let subscriptions =
            sqlx::query_as::<_, Subscription>("SELECT id, email_name FROM emails ORDER BY id")
                .fetch_all(&mut *self.conn)
                .await?;

        Ok(subscriptions)
    }

    pub async fn get(&mut self, id: i32) -> Result<Subscription> {
        sqlx::query_as::<_, Subscription>("SELECT id, email_name FROM emails WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(Error::SubscriptionNotFound { id })
    }

    /// Expects an already validated `email_name`.
    pub async fn create(&mut self, email_name: &str) -> Result<Subscription> {
        let mut tx = self.conn.begin().await?;

        let existing: Option<i32> =
            sqlx::query_scalar("SELECT id FROM emails WHERE email_name = $1")
                .bind(email_name)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(id) = existing {
            debug!("{:<12} - email already registered under id {id}", "create");
            return Err(Error::EmailTaken(email_name.to_string()));
        }

        // A concurrent insert of the same email can slip past the check above,
        // the unique constraint rejects it here.
        let subscription = sqlx::query_as::<_, Subscription>(
            "INSERT INTO emails (email_name) VALUES ($1) RETURNING id, email_name",
        )
        .bind(email_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|er| Error::from_write(er, email_name))?;

        tx.commit()
            .await
            .map_err(|er| Error::from_write(er, email_name))?;

        Ok(subscription)
    }

    pub async fn update(&mut self, id: i32, email_name: &str) -> Result<()> {
        let mut tx = self.conn.begin().await?;

        let target: Option<i32> =
            sqlx::query_scalar("SELECT id FROM emails WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if target.is_none() {
            return Err(Error::SubscriptionNotFound { id });
        }

        let taken_by: Option<i32> =
            sqlx::query_scalar("SELECT id FROM emails WHERE email_name = $1 AND id <> $2")
                .bind(email_name)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if taken_by.is_some() {
            return Err(Error::EmailTaken(email_name.to_string()));
        }

        sqlx::query("UPDATE emails SET email_name = $1 WHERE id = $2")
            .bind(email_name)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|er| Error::from_write(er, email_name))?;

        tx.commit()
            .await
            .map_err(|er| Error::from_write(er, email_name))?;

        Ok(())
    }

    pub async fn delete(&mut self, id: i32) -> Result<()> {
        let res = sqlx::query("DELETE FROM emails WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::SubscriptionNotFound { id });
        }

        Ok(())
    }
}
