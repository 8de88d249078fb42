//! Route handlers.
//!
//! Each handler returns `Result<_, Error>`; the error's kind picks the status
//! code (see [`super::error`]).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::warn;

use super::{form, pages, AppState};
use crate::error::Result;

pub(crate) async fn index_handler() -> Html<String> {
    Html(pages::index())
}

pub(crate) async fn lost_form_handler() -> Html<String> {
    Html(pages::lost_form())
}

pub(crate) async fn submit_lost_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect> {
    let submission = form::read_submission(multipart).await?;
    state
        .reports
        .submit(submission.report, &submission.photo)
        .await?;
    Ok(Redirect::to("/found"))
}

pub(crate) async fn found_handler(State(state): State<AppState>) -> Result<Html<String>> {
    let records = state.reports.list().await?;
    Ok(Html(pages::found(&records)))
}

/// A miss still renders the detail page, in its no-record state, with a 404.
pub(crate) async fn detail_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response> {
    match state.reports.get(id).await {
        Ok(record) => Ok(Html(pages::detail(Some(&record))).into_response()),
        Err(err) if err.is_not_found() => {
            warn!(id, "Detail requested for unknown report");
            Ok((StatusCode::NOT_FOUND, Html(pages::detail(None))).into_response())
        }
        Err(err) => Err(err),
    }
}
