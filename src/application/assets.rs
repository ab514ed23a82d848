use std::path;

use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

fn content_type(file_path: &str) -> &'static str {
    let ext = path::Path::new(file_path)
        .extension()
        .and_then(|ext| return ext.to_str())
        .unwrap_or_default();

    match ext {
        "html" => return "text/html; charset=utf-8",
        "css" => return "text/css; charset=utf-8",
        "js" => return "text/javascript; charset=utf-8",
        "svg" => return "image/svg+xml",
        "png" => return "image/png",
        "ico" => return "image/x-icon",
        _ => return "application/octet-stream",
    }
}

/// Serves a file compiled into the binary from the `static` folder.
pub fn serve(file_path: &str) -> Response {
    match StaticAssets::get(file_path) {
        Some(file) => {
            return (
                [(header::CONTENT_TYPE, content_type(file_path))],
                file.data.into_owned(),
            )
                .into_response();
        }
        None => {
            tracing::debug!(path = file_path, "Asset not found");
            return StatusCode::NOT_FOUND.into_response();
        }
    }
}
