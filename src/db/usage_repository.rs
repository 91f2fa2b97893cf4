//! SQLite-backed daily message counters.
//!
//! Counters are keyed by user id and UTC calendar day, so a user's quota
//! resets at midnight UTC without any cleanup job.

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;

use crate::db::Database;
use crate::entitlements::QuotaStatus;

/// Message usage persistence operations.
pub struct UsageRepository<'a> {
    db: &'a Database,
}

impl<'a> UsageRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Count one message for a user today. Returns the updated count.
    pub fn record_message(&self, user_id: &str) -> Result<u32, rusqlite::Error> {
        self.record_message_on(user_id, Self::today())
    }

    /// Count one message for a user on a given day.
    pub fn record_message_on(&self, user_id: &str, day: NaiveDate) -> Result<u32, rusqlite::Error> {
        let day = day.to_string();
        self.db.conn().execute(
            "INSERT INTO message_usage (user_id, day, count, updated_at) VALUES (?, ?, 1, unixepoch())
             ON CONFLICT(user_id, day) DO UPDATE SET count = count + 1, updated_at = excluded.updated_at",
            [user_id, day.as_str()],
        )?;
        tracing::debug!(user = %user_id, day = %day, "Recorded message");
        self.messages_on_str(user_id, &day)
    }

    /// Messages sent by a user today.
    pub fn messages_today(&self, user_id: &str) -> Result<u32, rusqlite::Error> {
        self.messages_on(user_id, Self::today())
    }

    /// Messages sent by a user on a given day.
    pub fn messages_on(&self, user_id: &str, day: NaiveDate) -> Result<u32, rusqlite::Error> {
        self.messages_on_str(user_id, &day.to_string())
    }

    fn messages_on_str(&self, user_id: &str, day: &str) -> Result<u32, rusqlite::Error> {
        let count: Option<u32> = self
            .db
            .conn()
            .query_row(
                "SELECT count FROM message_usage WHERE user_id = ? AND day = ?",
                [user_id, day],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Today's usage against a daily limit.
    pub fn quota_status(&self, user_id: &str, limit: u32) -> Result<QuotaStatus, rusqlite::Error> {
        Ok(QuotaStatus::new(self.messages_today(user_id)?, limit))
    }
}
