//! Request logging middleware

use super::super::state::ServerState;
use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

enum ContentLengthParseResult {
    Ok(usize),
    No(&'static str),
}

fn parse_content_length(headers: &HeaderMap) -> ContentLengthParseResult {
    let value = match headers.get("content-length") {
        Some(x) => x,
        None => return ContentLengthParseResult::No("Content-length not set."),
    };

    let str_value = match value.to_str() {
        Ok(x) => x,
        Err(_) => {
            return ContentLengthParseResult::No("Could not get Content-length string value.")
        }
    };

    match str_value.parse::<usize>() {
        Ok(x) => ContentLengthParseResult::Ok(x),
        Err(_) => ContentLengthParseResult::No("Could not parse Content-length numeric value."),
    }
}

fn log_headers(prefix: &str, headers: &HeaderMap) {
    info!("  {} Headers:", prefix);
    for (name, value) in headers.iter() {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Buffer a small body so it can be logged and handed on unchanged.
/// Returns `None` when the body could not be read.
async fn log_body(prefix: &str, headers: &HeaderMap, body: Body) -> Option<Body> {
    match parse_content_length(headers) {
        ContentLengthParseResult::No(reason) => {
            info!("  {} Body: {}", prefix, reason);
            Some(body)
        }
        ContentLengthParseResult::Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
            match axum::body::to_bytes(body, size).await {
                Ok(bytes) => {
                    info!("  {} Body:\n{}", prefix, String::from_utf8_lossy(&bytes));
                    Some(Body::from(bytes))
                }
                Err(err) => {
                    error!("Failed to read {} body: {:?}", prefix, err);
                    None
                }
            }
        }
        ContentLengthParseResult::Ok(size) => {
            info!(
                "  {} Body: Too big to log ({:#})",
                prefix,
                byte_unit::Byte::from(size)
            );
            Some(body)
        }
    }
}

fn body_read_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

pub async fn log_requests(
    State(state): State<ServerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level;
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        let Some(body) = log_body("Req", &parts.headers, body).await else {
            return body_read_failure();
        };
        request = Request::from_parts(parts, body);
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        let Some(body) = log_body("Resp", &parts.headers, body).await else {
            return body_read_failure();
        };
        response = Response::from_parts(parts, body);
    }

    if level > RequestsLoggingLevel::None {
        info!(
            "<<< {} {} {} in {:?}",
            method,
            uri,
            response.status().as_u16(),
            start.elapsed()
        );
    }

    response
}
