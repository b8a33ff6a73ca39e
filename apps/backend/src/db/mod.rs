//! PostgreSQL database operations
//!
//! Every session write (create/update/delete) runs as one transaction:
//! tag resolution, the session mutation and the streak recompute commit
//! together, so readers never see a session with a half-applied tag set or a
//! user whose streak fields lag its sessions.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};

use crate::error::{ApiError, Result};
use crate::models::*;
use studylog_core::{compute_streaks, normalize_tag_names};

/// Attempts for find-or-create tag resolution before giving up on a
/// persistent unique-constraint conflict.
const TAG_RESOLVE_ATTEMPTS: usize = 3;

/// Calendar-day expression for bucketing sessions, pinned to UTC so results
/// do not depend on the connection's timezone setting.
const STUDY_DAY: &str = "(start_time AT TIME ZONE 'UTC')::date";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user
    pub async fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        gender: Option<&str>,
        name: Option<&str>,
    ) -> Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (id, email, password_hash, gender, name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, gender, name, created_at,
                      last_study_date, current_streak, longest_streak
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(gender)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, password_hash, gender, name, created_at,
                   last_study_date, current_streak, longest_streak
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, password_hash, gender, name, created_at,
                   last_study_date, current_streak, longest_streak
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert the bootstrap demo user if it does not exist yet
    pub async fn ensure_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Session Repository ===

    /// Create a study session: resolve tags, insert the row and its junction
    /// rows, and refresh the user's streak fields, all in one transaction.
    pub async fn create_session(
        &self,
        user_id: &str,
        payload: &SessionPayload,
        duration_minutes: i64,
    ) -> Result<(DbSession, Vec<String>)> {
        let mut tx = self.pool.begin().await?;

        let tags = resolve_tags(&mut tx, user_id, &payload.tags).await?;

        let session = sqlx::query_as::<_, DbSession>(
            r#"
            INSERT INTO study_sessions (user_id, start_time, end_time,
                                        duration_minutes, focus_level, memo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, start_time, end_time, duration_minutes,
                      focus_level, memo, created_at
            "#,
        )
        .bind(user_id)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(duration_minutes as i32)
        .bind(payload.focus_level)
        .bind(&payload.memo)
        .fetch_one(&mut *tx)
        .await?;

        attach_tags(&mut tx, session.id, &tags).await?;
        refresh_streaks(&mut tx, user_id).await?;

        tx.commit().await?;

        Ok((session, tags.into_iter().map(|t| t.name).collect()))
    }

    /// Update every field of a session, replacing its tag set, then refresh
    /// streaks. Returns None when the session does not exist or belongs to a
    /// different user.
    pub async fn update_session(
        &self,
        session_id: i64,
        user_id: &str,
        payload: &SessionPayload,
        duration_minutes: i64,
    ) -> Result<Option<(DbSession, Vec<String>)>> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, DbSession>(
            r#"
            UPDATE study_sessions
            SET start_time = $3, end_time = $4, duration_minutes = $5,
                focus_level = $6, memo = $7
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, start_time, end_time, duration_minutes,
                      focus_level, memo, created_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(duration_minutes as i32)
        .bind(payload.focus_level)
        .bind(&payload.memo)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        let tags = resolve_tags(&mut tx, user_id, &payload.tags).await?;

        // The update's tag list is authoritative: drop the old set entirely.
        sqlx::query("DELETE FROM session_tags WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, session_id, &tags).await?;

        refresh_streaks(&mut tx, user_id).await?;

        tx.commit().await?;

        Ok(Some((session, tags.into_iter().map(|t| t.name).collect())))
    }

    /// Delete a session and refresh streaks. Returns false when nothing was
    /// deleted.
    pub async fn delete_session(&self, session_id: i64, user_id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM study_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        refresh_streaks(&mut tx, user_id).await?;
        tx.commit().await?;

        Ok(true)
    }

    /// Get a session with its tag names
    pub async fn get_session(
        &self,
        session_id: i64,
        user_id: &str,
    ) -> Result<Option<(DbSession, Vec<String>)>> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, start_time, end_time, duration_minutes,
                   focus_level, memo, created_at
            FROM study_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match session {
            Some(session) => {
                let mut tag_map = self.tags_for_sessions(&[session.id]).await?;
                let tags = tag_map.remove(&session.id).unwrap_or_default();
                Ok(Some((session, tags)))
            }
            None => Ok(None),
        }
    }

    /// Most recent sessions by start time, with tag names
    pub async fn recent_sessions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<(DbSession, Vec<String>)>> {
        let sessions = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, start_time, end_time, duration_minutes,
                   focus_level, memo, created_at
            FROM study_sessions
            WHERE user_id = $1
            ORDER BY start_time DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        let mut tag_map = self.tags_for_sessions(&ids).await?;

        Ok(sessions
            .into_iter()
            .map(|s| {
                let tags = tag_map.remove(&s.id).unwrap_or_default();
                (s, tags)
            })
            .collect())
    }

    /// All sessions whose study day falls in the inclusive date range
    pub async fn sessions_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DbSession>> {
        let sessions = sqlx::query_as::<_, DbSession>(&format!(
            r#"
            SELECT id, user_id, start_time, end_time, duration_minutes,
                   focus_level, memo, created_at
            FROM study_sessions
            WHERE user_id = $1 AND {STUDY_DAY} BETWEEN $2 AND $3
            ORDER BY start_time
            "#,
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Sessions of a single day with their tag names (for the day summary)
    pub async fn day_sessions(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<(DbSession, Vec<String>)>> {
        let sessions = self.sessions_in_range(user_id, day, day).await?;
        let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        let mut tag_map = self.tags_for_sessions(&ids).await?;

        Ok(sessions
            .into_iter()
            .map(|s| {
                let tags = tag_map.remove(&s.id).unwrap_or_default();
                (s, tags)
            })
            .collect())
    }

    /// Distinct calendar days with at least one session
    pub async fn distinct_study_days(&self, user_id: &str) -> Result<Vec<NaiveDate>> {
        let days = sqlx::query_scalar::<_, NaiveDate>(&format!(
            r#"
            SELECT DISTINCT {STUDY_DAY}
            FROM study_sessions
            WHERE user_id = $1
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    // === Tag Repository ===

    /// All tags of a user, name ascending
    pub async fn list_tags(&self, user_id: &str) -> Result<Vec<DbTag>> {
        let tags = sqlx::query_as::<_, DbTag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// One (tag name, session minutes) pair per session-tag link in range;
    /// the engine sums and ranks these.
    pub async fn tag_minutes_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(String, i64)>> {
        let pairs = sqlx::query_as::<_, (String, i64)>(&format!(
            r#"
            SELECT t.name, s.duration_minutes::BIGINT
            FROM tags t
            JOIN session_tags st ON st.tag_id = t.id
            JOIN study_sessions s ON s.id = st.session_id
            WHERE t.user_id = $1 AND ({day}) BETWEEN $2 AND $3
            "#,
            day = "(s.start_time AT TIME ZONE 'UTC')::date",
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(pairs)
    }

    /// Tag names per session for a set of session IDs
    async fn tags_for_sessions(&self, session_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>> {
        if session_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT st.session_id, t.name
            FROM session_tags st
            JOIN tags t ON t.id = st.tag_id
            WHERE st.session_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i64, Vec<String>> = HashMap::new();
        for (session_id, name) in rows {
            map.entry(session_id).or_default().push(name);
        }
        Ok(map)
    }

    // === Report Repository ===

    /// Persist report metadata
    pub async fn insert_report(
        &self,
        user_id: &str,
        report_type: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        file_format: &str,
        s3_key: &str,
    ) -> Result<DbReportFile> {
        let report = sqlx::query_as::<_, DbReportFile>(
            r#"
            INSERT INTO report_files (user_id, report_type, period_start,
                                      period_end, file_format, s3_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, report_type, period_start, period_end,
                      file_format, s3_key, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(report_type)
        .bind(period_start)
        .bind(period_end)
        .bind(file_format)
        .bind(s3_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    /// Recent report metadata, optionally filtered by type
    pub async fn list_reports(
        &self,
        user_id: &str,
        report_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<DbReportFile>> {
        let reports = match report_type {
            Some(kind) => {
                sqlx::query_as::<_, DbReportFile>(
                    r#"
                    SELECT id, user_id, report_type, period_start, period_end,
                           file_format, s3_key, created_at, expires_at
                    FROM report_files
                    WHERE user_id = $1 AND report_type = $2
                    ORDER BY created_at DESC
                    LIMIT $3
                    "#,
                )
                .bind(user_id)
                .bind(kind)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbReportFile>(
                    r#"
                    SELECT id, user_id, report_type, period_start, period_end,
                           file_format, s3_key, created_at, expires_at
                    FROM report_files
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(reports)
    }

    /// Get report metadata by ID
    pub async fn get_report(
        &self,
        report_id: i64,
        user_id: &str,
    ) -> Result<Option<DbReportFile>> {
        let report = sqlx::query_as::<_, DbReportFile>(
            r#"
            SELECT id, user_id, report_type, period_start, period_end,
                   file_format, s3_key, created_at, expires_at
            FROM report_files
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(report_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }
}

/// Find-or-create tags for the normalized name set inside the transaction.
///
/// Two writers introducing the same new tag name race on the
/// (user_id, name) unique constraint. `ON CONFLICT DO NOTHING` skips rows the
/// other writer won, and the next read picks them up; only a persistent
/// conflict after the retry budget surfaces as an error.
async fn resolve_tags(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    raw_names: &[String],
) -> Result<Vec<DbTag>> {
    let names = normalize_tag_names(raw_names);
    if names.is_empty() {
        return Ok(Vec::new());
    }

    for _ in 0..TAG_RESOLVE_ATTEMPTS {
        let existing = sqlx::query_as::<_, DbTag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1 AND name = ANY($2)
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .bind(&names)
        .fetch_all(&mut **tx)
        .await?;

        if existing.len() == names.len() {
            return Ok(existing);
        }

        let missing: Vec<String> = names
            .iter()
            .filter(|name| !existing.iter().any(|tag| &tag.name == *name))
            .cloned()
            .collect();

        sqlx::query(
            r#"
            INSERT INTO tags (user_id, name)
            SELECT $1, n FROM unnest($2::text[]) AS n
            ON CONFLICT (user_id, name) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&missing)
        .execute(&mut **tx)
        .await?;
    }

    Err(ApiError::TagConflict(
        "tag resolution retries exhausted".to_string(),
    ))
}

/// Attach a resolved tag set to a session
async fn attach_tags(
    tx: &mut Transaction<'_, Postgres>,
    session_id: i64,
    tags: &[DbTag],
) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }

    let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
    sqlx::query(
        r#"
        INSERT INTO session_tags (session_id, tag_id)
        SELECT $1, tag_id FROM unnest($2::bigint[]) AS tag_id
        "#,
    )
    .bind(session_id)
    .bind(&tag_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Recompute the user's streak fields from scratch and store them.
///
/// Runs inside the same transaction as the session mutation, so the three
/// fields replace atomically.
async fn refresh_streaks(tx: &mut Transaction<'_, Postgres>, user_id: &str) -> Result<()> {
    let days: Vec<NaiveDate> = sqlx::query_scalar(&format!(
        r#"
        SELECT DISTINCT {STUDY_DAY}
        FROM study_sessions
        WHERE user_id = $1
        "#,
    ))
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;

    let summary = compute_streaks(&days);

    sqlx::query(
        r#"
        UPDATE users
        SET last_study_date = $2, current_streak = $3, longest_streak = $4
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(summary.last_study_date)
    .bind(summary.current_streak as i32)
    .bind(summary.longest_streak as i32)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
