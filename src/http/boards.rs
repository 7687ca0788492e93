//! Anonymous message board routes
//!
//! Successful posts redirect the browser to the board or thread page.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::services::boards::{self, BoardOutcome, NO_THREAD_EXISTS};

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ThreadForm {
    pub thread_id: Option<String>,
    pub text: Option<String>,
    pub delete_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReplyForm {
    pub thread_id: Option<String>,
    pub reply_id: Option<String>,
    pub text: Option<String>,
    pub delete_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub thread_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/threads/{board}",
            get(list_threads)
                .post(create_thread)
                .put(report_thread)
                .delete(delete_thread),
        )
        .route(
            "/api/replies/{board}",
            get(get_thread)
                .post(create_reply)
                .put(report_reply)
                .delete(delete_reply),
        )
}

/// 303 to a front-end page
fn see_other(location: String) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => (StatusCode::SEE_OTHER, [(header::LOCATION, HeaderValue::from_static("/"))])
            .into_response(),
    }
}

fn render(board: &str, outcome: BoardOutcome) -> Response {
    match outcome {
        BoardOutcome::ThreadCreated(_) => see_other(format!("/b/{}", board)),
        BoardOutcome::ReplyCreated { thread_id, .. } => {
            see_other(format!("/b/{}/{}", board, thread_id))
        }
        other => other.to_string().into_response(),
    }
}

// ============================================================================
// Threads
// ============================================================================

async fn list_threads(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Response, ApiError> {
    let threads = boards::list_threads(&state.db, &board)?;
    Ok(Json(threads).into_response())
}

async fn create_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ThreadForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::create_thread(
        &state.db,
        &board,
        form.text.as_deref(),
        form.delete_password.as_deref(),
    )?;
    Ok(render(&board, outcome))
}

async fn report_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ThreadForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::report_thread(&state.db, &board, form.thread_id.as_deref())?;
    Ok(render(&board, outcome))
}

async fn delete_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ThreadForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::delete_thread(
        &state.db,
        &board,
        form.thread_id.as_deref(),
        form.delete_password.as_deref(),
    )?;
    Ok(render(&board, outcome))
}

// ============================================================================
// Replies
// ============================================================================

async fn get_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Query(query): Query<ThreadQuery>,
) -> Result<Response, ApiError> {
    match boards::get_thread(&state.db, &board, query.thread_id.as_deref())? {
        Some(thread) => Ok(Json(thread).into_response()),
        None => Ok(NO_THREAD_EXISTS.into_response()),
    }
}

async fn create_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ReplyForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::create_reply(
        &state.db,
        &board,
        form.thread_id.as_deref(),
        form.text.as_deref(),
        form.delete_password.as_deref(),
    )?;
    Ok(render(&board, outcome))
}

async fn report_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ReplyForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::report_reply(
        &state.db,
        &board,
        form.thread_id.as_deref(),
        form.reply_id.as_deref(),
    )?;
    Ok(render(&board, outcome))
}

async fn delete_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Form(form): Form<ReplyForm>,
) -> Result<Response, ApiError> {
    let outcome = boards::delete_reply(
        &state.db,
        &board,
        form.thread_id.as_deref(),
        form.reply_id.as_deref(),
        form.delete_password.as_deref(),
    )?;
    Ok(render(&board, outcome))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::http::server::testing::{client, spawn_app};
    use crate::quotes::FixedQuoteSource;

    async fn send(
        method: reqwest::Method,
        url: &str,
        fields: &[(&str, &str)],
    ) -> reqwest::Response {
        client()
            .request(method, url)
            .form(fields)
            .send()
            .await
            .unwrap()
    }

    async fn board_page(base: &str) -> Vec<Value> {
        client()
            .get(format!("{}/api/threads/test", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Post a thread and return its id as shown on the board page
    async fn post_thread(base: &str, text: &str) -> String {
        let response = send(
            reqwest::Method::POST,
            &format!("{}/api/threads/test", base),
            &[("text", text), ("delete_password", "pw")],
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/b/test");

        board_page(base).await[0]["_id"].to_string()
    }

    async fn post_reply(base: &str, thread_id: &str, text: &str) -> reqwest::Response {
        send(
            reqwest::Method::POST,
            &format!("{}/api/replies/test", base),
            &[("thread_id", thread_id), ("text", text), ("delete_password", "rpw")],
        )
        .await
    }

    #[tokio::test]
    async fn test_create_and_list_threads() {
        let base = spawn_app(FixedQuoteSource::default()).await;
        let id = post_thread(&base, "first thread").await;

        let threads = board_page(&base).await;
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0]["_id"].to_string(), id);
        assert_eq!(threads[0]["text"], "first thread");
        assert_eq!(threads[0]["created_on"], threads[0]["bumped_on"]);
        assert!(threads[0].get("reported").is_none());
        assert!(threads[0].get("delete_password").is_none());

        let text = send(
            reqwest::Method::POST,
            &format!("{}/api/threads/test", base),
            &[("text", "no password")],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "missing required fields");
    }

    #[tokio::test]
    async fn test_board_page_limits() {
        let base = spawn_app(FixedQuoteSource::default()).await;
        for i in 0..11 {
            post_thread(&base, &format!("thread {}", i)).await;
        }
        let id = board_page(&base).await[0]["_id"].to_string();
        for i in 0..4 {
            post_reply(&base, &id, &format!("reply {}", i)).await;
        }

        let threads = board_page(&base).await;
        assert_eq!(threads.len(), 10);
        let replies = threads[0]["replies"].as_array().unwrap();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["text"], "reply 1");
        assert_eq!(replies[2]["text"], "reply 3");
    }

    #[tokio::test]
    async fn test_reply_flow() {
        let base = spawn_app(FixedQuoteSource::default()).await;
        let id = post_thread(&base, "discuss").await;

        let response = post_reply(&base, &id, "me too").await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], format!("/b/test/{}", id).as_str());

        let thread: Value = client()
            .get(format!("{}/api/replies/test", base))
            .query(&[("thread_id", id.as_str())])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let reply = &thread["replies"][0];
        assert_eq!(reply["text"], "me too");
        assert_eq!(thread["bumped_on"], reply["created_on"]);
        assert!(reply.get("delete_password").is_none());
        let reply_id = reply["_id"].to_string();

        let url = format!("{}/api/replies/test", base);
        let text = send(
            reqwest::Method::PUT,
            &url,
            &[("thread_id", id.as_str()), ("reply_id", reply_id.as_str())],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "success");

        let text = send(
            reqwest::Method::DELETE,
            &url,
            &[
                ("thread_id", id.as_str()),
                ("reply_id", reply_id.as_str()),
                ("delete_password", "wrong"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "incorrect board, thread_id, reply_id or password");

        let text = send(
            reqwest::Method::DELETE,
            &url,
            &[
                ("thread_id", id.as_str()),
                ("reply_id", reply_id.as_str()),
                ("delete_password", "rpw"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "success");

        let missing = client()
            .get(format!("{}/api/replies/test", base))
            .query(&[("thread_id", "999999")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(missing, "no thread exists");
    }

    #[tokio::test]
    async fn test_report_and_delete_thread() {
        let base = spawn_app(FixedQuoteSource::default()).await;
        let id = post_thread(&base, "bad thread").await;
        let url = format!("{}/api/threads/test", base);

        let text = send(reqwest::Method::PUT, &url, &[("thread_id", id.as_str())])
            .await
            .text()
            .await
            .unwrap();
        assert_eq!(text, "success");

        let text = send(
            reqwest::Method::DELETE,
            &url,
            &[("thread_id", id.as_str()), ("delete_password", "nope")],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "incorrect board, thread_id or password");

        let text = send(
            reqwest::Method::DELETE,
            &url,
            &[("thread_id", id.as_str()), ("delete_password", "pw")],
        )
        .await
        .text()
        .await
        .unwrap();
        assert_eq!(text, "success");
        assert!(board_page(&base).await.is_empty());
    }
}
