//! GET handler: favicon, admin, static pages, then the paste read pipeline.

use crate::{error::HttpError, pages, AppState};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use minipaste_core::constants::HTML_CONTENT_TYPE;
use minipaste_core::models::StoredPaste;
use minipaste_core::read::{
    dispatch, evaluate_conditional, http_date, parse_path, CacheCheck, ReadQuery, Rendition,
};
use minipaste_core::{AppError, PasteStore};
use std::collections::HashMap;
use std::sync::Arc;

/// `public, max-age=<age>` when an age is configured.
fn cache_control(age: Option<u32>) -> Option<HeaderValue> {
    age.and_then(|age| HeaderValue::from_str(&format!("public, max-age={}", age)).ok())
}

fn last_modified(paste: &StoredPaste) -> Option<HeaderValue> {
    paste
        .metadata
        .last_modified_at()
        .and_then(|at| HeaderValue::from_str(&http_date(at)).ok())
}

fn found(location: &str) -> Result<Response, HttpError> {
    let location = HeaderValue::from_str(location).map_err(|_| {
        AppError::BadRequest("redirect target is not a valid header value".to_string())
    })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn html_response(body: String, cache: Option<HeaderValue>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    if let Some(cache) = cache {
        headers.insert(header::CACHE_CONTROL, cache);
    }
    (StatusCode::OK, headers, body).into_response()
}

/// Run a store call on the blocking pool.
async fn with_store<T, F>(store: Arc<dyn PasteStore>, call: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&dyn PasteStore) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|err| {
            tracing::error!("Store task failed: {}", err);
            AppError::Internal
        })?
}

async fn admin(state: &AppState, headers: &HeaderMap) -> Result<Response, HttpError> {
    if let Some(denied) = state.auth.verify(headers, &state.config) {
        return Ok(denied);
    }
    let pastes = with_store(state.store.clone(), |store| store.list()).await?;
    let page = pages::admin_page(&pastes, &state.config);
    Ok(html_response(
        page,
        cache_control(state.config.cache_static_page_age),
    ))
}

fn paste_response(
    rendition: Rendition,
    paste_headers: HeaderMap,
) -> Result<Response, HttpError> {
    let (content_type, body, disposition) = match rendition {
        Rendition::Redirect(target) => return found(&target),
        Rendition::Article(html) | Rendition::Highlighted(html) => (
            HeaderValue::from_static(HTML_CONTENT_TYPE),
            html.into_bytes(),
            None,
        ),
        Rendition::Raw { body, negotiated } => {
            let content_type = HeaderValue::from_str(&negotiated.content_type).map_err(|_| {
                AppError::BadRequest(format!(
                    "invalid mime type '{}'",
                    negotiated.content_type.trim_end_matches(";charset=UTF-8")
                ))
            })?;
            let disposition = HeaderValue::from_str(&negotiated.content_disposition)
                .map_err(|_| AppError::Internal)?;
            (content_type, body, Some(disposition))
        }
    };

    let mut headers = paste_headers;
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(disposition) = disposition {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Resolve any GET request.
///
/// # Returns
/// A redirect, a static or admin page, a 304, or the paste rendition.
///
/// # Errors
/// Returns 404 for missing pastes, 400 for unusable redirect targets or MIME
/// overrides, and 500 when the store fails. Auth denials are returned as-is.
pub async fn handle_get(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let path = uri.path();

    if path == "/favicon.ico" {
        if let Some(favicon) = state.config.favicon.as_deref() {
            return found(favicon);
        }
    }
    if pages::is_admin_path(path) {
        return admin(&state, &headers).await;
    }

    let descriptor = parse_path(path);

    // Password-bearing paths open the editor page, which lives at `/`.
    let static_path = if descriptor.targets_editor() { "/" } else { path };
    if let Some(page) = pages::static_page(static_path, &state.config, state.markdown.as_ref()) {
        if let Some(denied) = state.auth.verify(&headers, &state.config) {
            return Ok(denied);
        }
        return Ok(html_response(
            page,
            cache_control(state.config.cache_static_page_age),
        ));
    }

    let query = ReadQuery::from_params(params);
    let id = descriptor.id.clone();
    let paste = with_store(state.store.clone(), move |store| store.get_with_metadata(&id)).await?;

    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok());
    let stored_last_modified = paste
        .as_ref()
        .and_then(|paste| paste.metadata.last_modified.as_deref());
    if let CacheCheck::NotModified { last_modified } =
        evaluate_conditional(stored_last_modified, if_modified_since)
    {
        let value = HeaderValue::from_str(&last_modified).map_err(|_| AppError::Internal)?;
        return Ok((StatusCode::NOT_MODIFIED, [(header::LAST_MODIFIED, value)]).into_response());
    }

    let mut paste_headers = HeaderMap::new();
    if let Some(cache) = cache_control(state.config.cache_paste_age) {
        paste_headers.insert(header::CACHE_CONTROL, cache);
    }
    if let Some(value) = paste.as_ref().and_then(last_modified) {
        paste_headers.insert(header::LAST_MODIFIED, value);
    }

    let rendition = dispatch(
        &descriptor,
        &query,
        paste,
        state.markdown.as_ref(),
        state.highlighter.as_ref(),
    )
    .inspect_err(|err| {
        if err.is_client_error() {
            tracing::debug!(path = %path, "read rejected: {}", err);
        }
    })?;

    paste_response(rendition, paste_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_control_only_when_configured() {
        assert!(cache_control(None).is_none());
        assert_eq!(
            cache_control(Some(600)).expect("header"),
            "public, max-age=600"
        );
    }

    #[test]
    fn last_modified_skips_unparsable_metadata() {
        let paste = StoredPaste::new("x").with_last_modified("not a date");
        assert!(last_modified(&paste).is_none());

        let paste = StoredPaste::new("x").with_last_modified("1994-11-06T08:49:37.123Z");
        assert_eq!(
            last_modified(&paste).expect("header"),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn redirect_rendition_has_no_body_headers() {
        let response = paste_response(
            Rendition::Redirect("https://example.com".to_string()),
            HeaderMap::new(),
        )
        .expect("redirect");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "https://example.com"
        );
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    }
}
