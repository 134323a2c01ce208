//! Landing page and static asset serving
//!
//! `/` returns the index template as-is; files under the static prefix are
//! served from the static directory with `ETag` validation.

use crate::config::ResourcesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the landing page
pub async fn serve_index(
    ctx: &RequestContext<'_>,
    resources: &ResourcesConfig,
) -> Response<Full<Bytes>> {
    let path = Path::new(&resources.template_dir).join(&resources.index_file);

    match fs::read(&path).await {
        Ok(content) => http::build_html_response(content, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to load template '{}': {e}",
                path.display()
            ));
            http::build_500_response("500 Internal Server Error: template not found")
        }
    }
}

/// Serve a file below the static prefix
pub async fn serve_static(
    ctx: &RequestContext<'_>,
    resources: &ResourcesConfig,
) -> Response<Full<Bytes>> {
    let relative = ctx
        .path
        .strip_prefix(resources.static_prefix.as_str())
        .unwrap_or_default();

    let Some((content, content_type)) = load_static_file(&resources.static_dir, relative).await
    else {
        return http::build_404_response();
    };

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(content, content_type, &etag, ctx.is_head)
}

/// Load a file from `static_dir`, refusing anything that resolves outside it
async fn load_static_file(static_dir: &str, relative: &str) -> Option<(Vec<u8>, &'static str)> {
    if relative.is_empty() {
        return None;
    }

    let static_root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log it
    let file_path = static_root.join(relative).canonicalize().ok()?;
    if !file_path.starts_with(&static_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_path.display()
        ));
        return None;
    }
    if !file_path.is_file() {
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}
