use std::fmt::Display;
use std::str::FromStr;

use axum::extract::{Multipart, Path};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use log::{error, warn};

use crate::app::render_page;
use crate::error::ConsoleError;
use crate::models::*;
use crate::settings::SettingsStore;
use crate::transport::Api;
use crate::view::PromptedView;
use crate::State;

pub(crate) fn handle_error<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, format!("{err}"))
}

/// Failed actions leave the page as it was; they only reach the log.
fn report(action: &str, result: Result<(), ConsoleError>) -> Redirect {
    if let Err(e) = result {
        error!("{action} failed: {e}");
    }
    Redirect::to("/")
}

pub fn router<S, A>(state: State<S, A>) -> Router
where
    S: SettingsStore + 'static,
    A: Api + 'static,
{
    Router::new()
        .route("/", get(index::<S, A>))
        .route("/connection", post(save_connection::<S, A>))
        .route("/health", post(check_health::<S, A>))
        .route("/upload/file", post(upload_file::<S, A>))
        .route("/upload/manual", post(upload_manual::<S, A>))
        .route("/bills", post(load_bills::<S, A>))
        .route("/bills/:id/mark_paid", post(mark_paid::<S, A>))
        .route("/bills/:id/notify", post(notify::<S, A>))
        .fallback(fallback)
        .layer(Extension(state))
}

pub async fn index<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
) -> Html<String> {
    Html(render_page(&state.page.take_for_render()))
}

pub async fn save_connection<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    Form(form): Form<ConnectionForm>,
) -> Redirect {
    let result = state
        .console
        .save_connection(&state.page, &form.into())
        .map(|_| ());
    report("Saving connection", result)
}

pub async fn check_health<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
) -> Redirect {
    report(
        "Health check",
        state.console.check_health(&state.page).await,
    )
}

pub async fn upload_file<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    mut multipart: Multipart,
) -> Result<Redirect, (StatusCode, String)> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(handle_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(handle_error)?;
        // browsers send an empty part when no file was chosen
        if !file_name.is_empty() {
            file = Some(UploadFile {
                file_name,
                bytes: bytes.to_vec(),
            });
        }
    }

    Ok(report(
        "File upload",
        state.console.upload_file(&state.page, file).await,
    ))
}

pub async fn upload_manual<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    Form(entry): Form<ManualEntry>,
) -> Redirect {
    report(
        "Manual upload",
        state.console.upload_manual(&state.page, &entry).await,
    )
}

pub async fn load_bills<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    Form(form): Form<FilterForm>,
) -> Redirect {
    let filter = StatusFilter::from_str(&form.status).unwrap_or_else(|e| {
        warn!("{e}, showing all bills");
        StatusFilter::All
    });
    state.page.set_status_filter(filter);

    report("Loading bills", state.console.load_bills(&state.page).await)
}

pub async fn mark_paid<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    Path(id): Path<String>,
) -> Redirect {
    report("Mark paid", state.console.mark_paid(&state.page, &id).await)
}

pub async fn notify<S: SettingsStore, A: Api>(
    Extension(state): Extension<State<S, A>>,
    Path(id): Path<String>,
    Form(form): Form<NotifyForm>,
) -> Redirect {
    let view = PromptedView::new(&state.page, form.to);
    report("Notify", state.console.notify(&view, &id).await)
}

async fn fallback(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("No route for {}", uri))
}
