//! `/api/projects`: browsing, on-demand analysis and image regeneration.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use repolens_db::{PageRequest, ProfilePage, ProfileRow};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, map_pipeline_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Response and request types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct ProfileItem {
    pub id: i64,
    pub repo_full_name: String,
    pub repo_url: String,
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileItem {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            repo_full_name: row.repo_full_name,
            repo_url: row.repo_url,
            title: row.title,
            summary: row.summary,
            topic: row.topic,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProfilePageData {
    pub items: Vec<ProfileItem>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl From<ProfilePage> for ProfilePageData {
    fn from(page: ProfilePage) -> Self {
        let total_pages = if page.size > 0 {
            (page.total + page.size - 1) / page.size
        } else {
            0
        };
        Self {
            items: page.items.into_iter().map(ProfileItem::from).collect(),
            page: page.page,
            size: page.size,
            total: page.total,
            total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopicQuery {
    pub topic: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageData {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageData {
    pub image_url: String,
}

type PageResult = Result<Json<ApiResponse<ProfilePageData>>, ApiError>;

fn page_response(page: ProfilePage, request_id: String) -> Json<ApiResponse<ProfilePageData>> {
    Json(ApiResponse::new(ProfilePageData::from(page), request_id))
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

pub(super) async fn list_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> PageResult {
    let page = repolens_db::list_profiles(&state.pool, PageRequest::new(query.page, query.size))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(page_response(page, req_id.0))
}

/// Case-insensitive substring match on title or summary.
pub(super) async fn search_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let Some(keyword) = query.keyword else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "keyword is required",
        ));
    };
    let page = repolens_db::search_profiles(
        &state.pool,
        &keyword,
        PageRequest::new(query.page, query.size),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(page_response(page, req_id.0))
}

pub(super) async fn filter_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopicQuery>,
) -> PageResult {
    let Some(topic) = query.topic.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "topic is required",
        ));
    };
    let page = repolens_db::list_profiles_by_topic(
        &state.pool,
        &topic,
        PageRequest::new(query.page, query.size),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(page_response(page, req_id.0))
}

pub(super) async fn list_topics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let topics = repolens_db::list_distinct_topics(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(topics, req_id.0)))
}

/// Profiles whose ids appear in the request body, newest first.
pub(super) async fn favorite_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
    Json(ids): Json<Vec<i64>>,
) -> PageResult {
    let page = repolens_db::list_profiles_by_ids(
        &state.pool,
        &ids,
        PageRequest::new(query.page, query.size),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(page_response(page, req_id.0))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Accepts a repository URL and analyzes it on a detached task.
///
/// The response only acknowledges the request; URL parsing errors and the
/// analysis outcome are logged by the task.
pub(super) async fn analyze_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageData>>), ApiError> {
    let Some(url) = body.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) else {
        return Err(ApiError::new(req_id.0, "bad_request", "url is required"));
    };

    tracing::info!(url = %url, request_id = %req_id.0, "on-demand analysis requested");
    drop(state.ingestor.spawn_analyze(url));

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(
            MessageData {
                message: "analysis request accepted; check back shortly",
            },
            req_id.0,
        )),
    ))
}

pub(super) async fn regenerate_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ImageData>>, ApiError> {
    let image_url = state
        .ingestor
        .regenerate_image(id)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(ImageData { image_url }, req_id.0)))
}

pub(super) async fn delete_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = repolens_db::delete_profile(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("project {id} not found"),
        ))
    }
}
