//! Personal library routes

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::services::library::{self, AddBookOutcome, CommentOutcome, NO_BOOK_EXISTS};

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    pub comment: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/books",
            get(list_books).post(add_book).delete(delete_all_books),
        )
        .route(
            "/api/books/{id}",
            get(get_book).post(add_comment).delete(delete_book),
        )
}

async fn list_books(State(state): State<AppState>) -> Result<Response, ApiError> {
    let books = library::list_books(&state.db)?;
    Ok(Json(books).into_response())
}

async fn add_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Result<Response, ApiError> {
    match library::add_book(&state.db, form.title.as_deref())? {
        AddBookOutcome::Added(book) => Ok(Json(book).into_response()),
        AddBookOutcome::MissingTitle => Ok("missing required title".into_response()),
    }
}

async fn delete_all_books(State(state): State<AppState>) -> Result<Response, ApiError> {
    library::delete_all_books(&state.db)?;
    Ok("complete delete successful".into_response())
}

async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match library::get_book(&state.db, &id)? {
        Some(book) => Ok(Json(book).into_response()),
        None => Ok(NO_BOOK_EXISTS.into_response()),
    }
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, ApiError> {
    match library::add_comment(&state.db, &id, form.comment.as_deref())? {
        CommentOutcome::Commented(book) => Ok(Json(book).into_response()),
        CommentOutcome::MissingIdOrComment => Ok("missing required id or comment".into_response()),
        CommentOutcome::NoBook => Ok(NO_BOOK_EXISTS.into_response()),
    }
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = library::delete_book(&state.db, &id)?;
    Ok(outcome.to_string().into_response())
}
