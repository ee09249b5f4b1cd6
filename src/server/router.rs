//! JSON API handlers

use crate::error::{FeedbackError, Result};
use crate::models::{CreateFeedbackRequest, CreateProjectRequest, Feedback, Project, VoteRequest};
use crate::notify::{feedback_received_message, spawn_notification};
use crate::recommendation::{Answers, FeedbackType, ScoreVector, describe, score};
use crate::server::FeedbackServer;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

fn body<T>(payload: JsonBody<T>) -> Result<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| FeedbackError::validation(rejection.body_text()))
}

/// Routes under `/api`
pub fn api_routes() -> Router<FeedbackServer> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/:id", get(get_project))
        .route("/feedback", post(create_feedback))
        .route("/feedback/:project_id", get(list_feedback))
        .route("/feedback/vote/:id", post(vote_feedback))
        .route("/recommendation", post(recommend_type))
        .route("/feedback-types", get(feedback_types))
}

pub async fn list_projects(State(server): State<FeedbackServer>) -> Result<Json<Vec<Project>>> {
    Ok(Json(server.store.list_projects()?))
}

pub async fn create_project(
    State(server): State<FeedbackServer>,
    payload: JsonBody<serde_json::Value>,
) -> Result<(StatusCode, Json<Project>)> {
    let new = CreateProjectRequest::from_json(body(payload)?)?.validate()?;
    let project = server.store.create_project(new)?;
    info!(
        "Created project {} ({}) awaiting {} feedback",
        project.id, project.title, project.feedback_type
    );
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(server): State<FeedbackServer>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    server
        .store
        .get_project(&id)?
        .map(Json)
        .ok_or_else(|| FeedbackError::not_found("Project"))
}

pub async fn list_feedback(
    State(server): State<FeedbackServer>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Feedback>>> {
    Ok(Json(server.store.feedback_for_project(&project_id)?))
}

pub async fn create_feedback(
    State(server): State<FeedbackServer>,
    payload: JsonBody<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>)> {
    let new = body(payload)?.validate()?;
    let feedback = server.store.create_feedback(new)?;
    info!(
        "Received {} feedback {} for project {}",
        feedback.feedback_type, feedback.id, feedback.project_id
    );

    if let Some(project) = server.store.get_project(&feedback.project_id)?
        && let Some(message) = feedback_received_message(
            server.notifier.sender(),
            &project,
            &feedback,
            &server.config.server.public_base_url,
        )
    {
        spawn_notification(server.notifier.clone(), message);
    }

    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn vote_feedback(
    State(server): State<FeedbackServer>,
    Path(id): Path<String>,
    payload: JsonBody<VoteRequest>,
) -> Result<Json<Feedback>> {
    let vote = body(payload)?.validate()?;
    server
        .store
        .vote(&id, vote)?
        .map(Json)
        .ok_or_else(|| FeedbackError::not_found("Feedback"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommended_type: FeedbackType,
    pub description: &'static str,
    pub scores: ScoreVector,
}

/// Advisory recommendation for a set of quiz answers
pub async fn recommend_type(payload: JsonBody<Answers>) -> Result<Json<RecommendationResponse>> {
    let answers = body(payload)?;
    let scores = score(&answers);
    let recommended_type = scores.leader();
    Ok(Json(RecommendationResponse {
        recommended_type,
        description: describe(recommended_type),
        scores,
    }))
}

#[derive(Debug, Serialize)]
pub struct FeedbackTypeInfo {
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub label: &'static str,
    pub description: &'static str,
}

pub async fn feedback_types() -> Json<Vec<FeedbackTypeInfo>> {
    Json(
        FeedbackType::ALL
            .into_iter()
            .map(|t| FeedbackTypeInfo {
                feedback_type: t,
                label: t.label(),
                description: describe(t),
            })
            .collect(),
    )
}
