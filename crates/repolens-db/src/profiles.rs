//! Database operations for the `repository_profiles` table.

use chrono::{DateTime, Utc};
use repolens_core::NewProfile;
use sqlx::PgPool;

use crate::DbError;

const PROFILE_COLUMNS: &str =
    "id, repo_full_name, repo_url, title, summary, topic, image_url, created_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `repository_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub repo_full_name: String,
    pub repo_url: String,
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Zero-based page selection for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub const DEFAULT_SIZE: i64 = 20;
    pub const MAX_SIZE: i64 = 100;

    /// Builds a page request, clamping `size` to `1..=MAX_SIZE` and `page` to `>= 0`.
    #[must_use]
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(0).max(0),
            size: size.unwrap_or(Self::DEFAULT_SIZE).clamp(1, Self::MAX_SIZE),
        }
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of profiles plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub items: Vec<ProfileRow>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Get a profile by its `owner/name` key.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_profile_by_full_name(
    pool: &PgPool,
    repo_full_name: &str,
) -> Result<Option<ProfileRow>, DbError> {
    Ok(sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles WHERE repo_full_name = $1"
    ))
    .bind(repo_full_name)
    .fetch_optional(pool)
    .await?)
}

/// Get a profile by primary key.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_profile(pool: &PgPool, id: i64) -> Result<Option<ProfileRow>, DbError> {
    Ok(sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert a batch of profiles in a single transaction.
///
/// Rows whose `repo_full_name` already exists are skipped (`ON CONFLICT DO
/// NOTHING`), so a concurrent writer that stored the same repository first
/// does not abort the rest of the batch. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError`] if the transaction cannot be started, a statement
/// fails, or the commit fails. On error nothing from this batch is stored.
pub async fn insert_profiles(pool: &PgPool, profiles: &[NewProfile]) -> Result<u64, DbError> {
    if profiles.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for profile in profiles {
        let result = sqlx::query(
            "INSERT INTO repository_profiles \
               (repo_full_name, repo_url, title, summary, topic, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (repo_full_name) DO NOTHING",
        )
        .bind(&profile.repo_full_name)
        .bind(&profile.repo_url)
        .bind(&profile.title)
        .bind(&profile.summary)
        .bind(&profile.topic)
        .bind(profile.image_url.as_deref())
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Overwrite the image URL of an existing profile.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no profile has `id`, or [`DbError::Sqlx`]
/// on query failure.
pub async fn update_profile_image_url(
    pool: &PgPool,
    id: i64,
    image_url: &str,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE repository_profiles SET image_url = $1 WHERE id = $2")
        .bind(image_url)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Delete every profile created strictly before `cutoff`. Returns the number
/// of deleted rows.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn delete_profiles_created_before(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM repository_profiles WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete a single profile. Returns `false` when no row had `id`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn delete_profile(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM repository_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Listing queries
// ---------------------------------------------------------------------------

/// List all profiles, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_profiles(pool: &PgPool, page: PageRequest) -> Result<ProfilePage, DbError> {
    let items = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles \
         ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM repository_profiles")
        .fetch_one(pool)
        .await?;

    Ok(ProfilePage {
        items,
        total,
        page: page.page,
        size: page.size,
    })
}

/// Case-insensitive substring search over title and summary.
///
/// `%`, `_` and `\` in `keyword` match literally.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn search_profiles(
    pool: &PgPool,
    keyword: &str,
    page: PageRequest,
) -> Result<ProfilePage, DbError> {
    let pattern = like_pattern(keyword);

    let items = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles \
         WHERE title ILIKE $1 OR summary ILIKE $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(&pattern)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM repository_profiles WHERE title ILIKE $1 OR summary ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    Ok(ProfilePage {
        items,
        total,
        page: page.page,
        size: page.size,
    })
}

/// List profiles with an exact topic match, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_profiles_by_topic(
    pool: &PgPool,
    topic: &str,
    page: PageRequest,
) -> Result<ProfilePage, DbError> {
    let items = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles WHERE topic = $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(topic)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM repository_profiles WHERE topic = $1")
            .bind(topic)
            .fetch_one(pool)
            .await?;

    Ok(ProfilePage {
        items,
        total,
        page: page.page,
        size: page.size,
    })
}

/// List profiles whose id is in `ids`, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_profiles_by_ids(
    pool: &PgPool,
    ids: &[i64],
    page: PageRequest,
) -> Result<ProfilePage, DbError> {
    let items = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM repository_profiles WHERE id = ANY($1) \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(ids)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM repository_profiles WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_one(pool)
    .await?;

    Ok(ProfilePage {
        items,
        total,
        page: page.page,
        size: page.size,
    })
}

/// Distinct topics currently present, alphabetically.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_distinct_topics(pool: &PgPool) -> Result<Vec<String>, DbError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT topic FROM repository_profiles ORDER BY topic",
    )
    .fetch_all(pool)
    .await?)
}

/// Wrap `keyword` in `%…%` after escaping `ILIKE` wildcards.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
