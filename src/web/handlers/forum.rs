//! Forum pages: topic listing, topic view with threaded comments, creation
//! and deletion of both.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::forum;
use crate::game::types::{CommentRecord, TopicRecord};
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct TopicView {
    id: u64,
    title: String,
    description: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl From<TopicRecord> for TopicView {
    fn from(topic: TopicRecord) -> Self {
        Self {
            id: topic.id,
            title: topic.title,
            description: topic.description,
            author: topic.author,
            created_at: topic.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct TopicSummary {
    #[serde(flatten)]
    topic: TopicView,
    comments: usize,
}

#[derive(Serialize)]
pub struct ForumsResponse {
    success: bool,
    topics: Vec<TopicSummary>,
}

pub async fn forums_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ForumsResponse>, HttpError> {
    let _username = require_user(&state, &headers)?;
    let mut topics = Vec::new();
    for topic in state.store.list_topics()? {
        let comments = state.store.list_comments_for_topic(topic.id)?.len();
        topics.push(TopicSummary {
            topic: TopicView::from(topic),
            comments,
        });
    }
    Ok(Json(ForumsResponse {
        success: true,
        topics,
    }))
}

#[derive(Deserialize)]
pub struct CreateTopicRequest {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Serialize)]
pub struct TopicCreatedResponse {
    success: bool,
    topic: TopicView,
}

pub async fn create_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTopicRequest>,
) -> Result<Json<TopicCreatedResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let topic = forum::create_topic(&state.store, &username, &req.title, &req.description)?;
    Ok(Json(TopicCreatedResponse {
        success: true,
        topic: TopicView::from(topic),
    }))
}

#[derive(Serialize)]
pub struct CommentView {
    id: u64,
    parent_id: Option<u64>,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
    nesting_level: u32,
}

fn comment_view(state: &AppState, comment: CommentRecord) -> Result<CommentView, HttpError> {
    let nesting_level = forum::nesting_level(&state.store, &comment)?;
    Ok(CommentView {
        id: comment.id,
        parent_id: comment.parent_id,
        author: comment.author,
        text: comment.text,
        created_at: comment.created_at,
        nesting_level,
    })
}

#[derive(Serialize)]
pub struct TopicPageResponse {
    success: bool,
    topic: TopicView,
    comments: Vec<CommentView>,
}

pub async fn show_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(topic_id): Path<u64>,
) -> Result<Json<TopicPageResponse>, HttpError> {
    let _username = require_user(&state, &headers)?;
    let topic = state.store.get_topic(topic_id)?;
    let mut comments = Vec::new();
    for comment in state.store.list_comments_for_topic(topic_id)? {
        comments.push(comment_view(&state, comment)?);
    }
    Ok(Json(TopicPageResponse {
        success: true,
        topic: TopicView::from(topic),
        comments,
    }))
}

#[derive(Deserialize)]
pub struct PostCommentRequest {
    comment: String,
    #[serde(default)]
    parent_id: Option<u64>,
}

#[derive(Serialize)]
pub struct CommentCreatedResponse {
    success: bool,
    comment: CommentView,
}

pub async fn post_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(topic_id): Path<u64>,
    Json(req): Json<PostCommentRequest>,
) -> Result<Json<CommentCreatedResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let comment = forum::post_comment(
        &state.store,
        &username,
        topic_id,
        req.parent_id,
        &req.comment,
    )?;
    let view = comment_view(&state, comment)?;
    Ok(Json(CommentCreatedResponse {
        success: true,
        comment: view,
    }))
}

#[derive(Serialize)]
pub struct RemovedResponse {
    success: bool,
    removed: usize,
}

pub async fn delete_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(topic_id): Path<u64>,
) -> Result<Json<RemovedResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let removed = forum::delete_topic(&state.store, &username, topic_id)?;
    Ok(Json(RemovedResponse {
        success: true,
        removed,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<u64>,
) -> Result<Json<RemovedResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let removed = forum::delete_comment(&state.store, &username, comment_id)?;
    Ok(Json(RemovedResponse {
        success: true,
        removed,
    }))
}
