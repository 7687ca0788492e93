//! Issue tracker routes

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::models::{IssueCreate, IssueUpdate};
use crate::services::issues::{self, CreateIssueOutcome};
use crate::services::MISSING_REQUIRED_FIELDS;

use super::{ApiError, AppState};

/// Form body of an issue submission or update; every field may be absent
#[derive(Debug, Default, Deserialize)]
pub struct IssueForm {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<String>,
}

impl IssueForm {
    fn into_create(self) -> IssueCreate {
        IssueCreate {
            issue_title: self.issue_title.unwrap_or_default(),
            issue_text: self.issue_text.unwrap_or_default(),
            created_by: self.created_by.unwrap_or_default(),
            assigned_to: self.assigned_to.unwrap_or_default(),
            status_text: self.status_text.unwrap_or_default(),
        }
    }

    /// Blank fields count as not sent
    fn to_update(&self) -> IssueUpdate {
        let field = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        IssueUpdate {
            issue_title: field(&self.issue_title),
            issue_text: field(&self.issue_text),
            created_by: field(&self.created_by),
            assigned_to: field(&self.assigned_to),
            status_text: field(&self.status_text),
            open: match self.open.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/issues/{project}",
        get(list_issues)
            .post(create_issue)
            .put(update_issue)
            .delete(delete_issue),
    )
}

async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let issues = issues::list_issues(&state.db, &project, &query)?;
    Ok(Json(issues).into_response())
}

async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Form(form): Form<IssueForm>,
) -> Result<Response, ApiError> {
    match issues::create_issue(&state.db, &project, form.into_create())? {
        CreateIssueOutcome::Created(issue) => Ok(Json(issue).into_response()),
        CreateIssueOutcome::MissingRequiredFields => Ok(MISSING_REQUIRED_FIELDS.into_response()),
    }
}

async fn update_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Form(form): Form<IssueForm>,
) -> Result<Response, ApiError> {
    let outcome = issues::update_issue(&state.db, &project, form.id.as_deref(), form.to_update())?;
    Ok(outcome.to_string().into_response())
}

async fn delete_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Form(form): Form<IssueForm>,
) -> Result<Response, ApiError> {
    let outcome = issues::delete_issue(&state.db, &project, form.id.as_deref())?;
    Ok(outcome.to_string().into_response())
}
