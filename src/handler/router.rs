//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method and body-size checks,
//! route dispatch, common response headers and access logging.

use crate::config::{AppState, HttpConfig};
use crate::handler::{pages, recintos};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: Method,
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_str(req, header::IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);

    let mut response = match check_body_size(&req, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => dispatch(&ctx, &state).await,
    };
    apply_common_headers(&mut response, &state.config.http);

    if state.access_log() {
        let entry = build_access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check the method and route the request
pub async fn dispatch(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(&ctx.method, state.config.http.enable_cors) {
        return resp;
    }
    route_request(ctx, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = header_str(req, header::CONTENT_LENGTH)?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Route table: the venue API, the landing page and static assets
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let resources = &state.config.resources;

    match ctx.path {
        recintos::RECINTOS_PATH => recintos::serve_recintos(ctx, state).await,
        "/" => pages::serve_index(ctx, resources).await,
        path if path.starts_with(resources.static_prefix.as_str()) => {
            pages::serve_static(ctx, resources).await
        }
        _ => http::build_404_response(),
    }
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert(header::SERVER, value);
        }
        Err(_) => logger::log_warning(&format!(
            "Invalid server_name '{}', Server header omitted",
            http_config.server_name
        )),
    }
    if http_config.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

fn build_access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(req, header::REFERER).map(ToString::to_string);
    entry.user_agent = header_str(req, header::USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn header_str<B>(req: &Request<B>, name: header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const VENUES_CSV: &str = " latitud , longitud ,nombre\n\
                              -17.8,-63.2,A\n\
                              ,-63.1,B\n\
                              -17.7,-63.0,\n";

    fn test_state(dir: &Path) -> Arc<AppState> {
        let mut cfg = Config::defaults().unwrap();
        cfg.dataset.path = dir.join("recintos.csv");
        cfg.resources.template_dir = dir.join("templates").to_string_lossy().into_owned();
        cfg.resources.static_dir = dir.join("static").to_string_lossy().into_owned();
        Arc::new(AppState::new(&cfg).unwrap())
    }

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recintos.csv"), VENUES_CSV).unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::write(
            dir.path().join("templates/index.html"),
            "<!DOCTYPE html><title>Recintos</title>",
        )
        .unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/app.js"), "console.log('mapa');").unwrap();
        dir
    }

    fn ctx(method: Method, path: &str) -> RequestContext<'_> {
        RequestContext {
            is_head: method == Method::HEAD,
            method,
            path,
            if_none_match: None,
        }
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_recintos_returns_filtered_rows() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "application/json");
        assert_eq!(
            body_string(response).await,
            r#"[{"latitud":"-17.8","longitud":"-63.2","nombre":"A"},{"latitud":"-17.7","longitud":"-63.0","nombre":null}]"#
        );
    }

    #[tokio::test]
    async fn test_recintos_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "El archivo CSV no se encontró en el servidor."})
        );
    }

    #[tokio::test]
    async fn test_recintos_processing_error_is_500() {
        let dir = site();
        fs::write(dir.path().join("recintos.csv"), "nombre\nA\n").unwrap();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            body["error"],
            "Missing required column(s): latitud, longitud"
        );
    }

    #[tokio::test]
    async fn test_recintos_invalid_utf8_is_500() {
        let dir = site();
        fs::write(
            dir.path().join("recintos.csv"),
            b"latitud,longitud,nombre\n-17.8,-63.2,\xe9\n".as_slice(),
        )
        .unwrap();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_recintos_reads_file_on_every_request() {
        let dir = site();
        let state = test_state(dir.path());

        let first = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert!(body_string(first).await.contains("\"A\""));

        fs::write(dir.path().join("recintos.csv"), "latitud,longitud,nombre\n1,2,Z\n").unwrap();
        let second = dispatch(&ctx(Method::GET, "/api/recintos"), &state).await;
        assert_eq!(
            body_string(second).await,
            r#"[{"latitud":"1","longitud":"2","nombre":"Z"}]"#
        );
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::HEAD, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_index_page() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            body_string(response).await,
            "<!DOCTYPE html><title>Recintos</title>"
        );
    }

    #[tokio::test]
    async fn test_bundled_index_renders_cells_as_text() {
        let mut cfg = Config::defaults().unwrap();
        cfg.resources.template_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string();
        let state = Arc::new(AppState::new(&cfg).unwrap());

        let response = dispatch(&ctx(Method::GET, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("/api/recintos"));
        assert!(page.contains("textContent = key"));
        assert!(!page.contains("innerHTML"));
        assert!(!page.contains("<b>${"));
    }

    #[tokio::test]
    async fn test_missing_template_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_static_asset_and_etag() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/static/app.js"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "application/javascript");
        let etag = response.headers()["ETag"].to_str().unwrap().to_string();
        assert_eq!(body_string(response).await, "console.log('mapa');");

        let mut conditional = ctx(Method::GET, "/static/app.js");
        conditional.if_none_match = Some(&etag);
        let response = dispatch(&conditional, &state).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_static_traversal_is_blocked() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::GET, "/static/../recintos.csv"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = dispatch(&ctx(Method::GET, "/static/missing.css"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let dir = site();
        let state = test_state(dir.path());

        for path in ["/api/recintos/", "/api/other", "/index.html"] {
            let response = dispatch(&ctx(Method::GET, path), &state).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_method_checks() {
        let dir = site();
        let state = test_state(dir.path());

        let response = dispatch(&ctx(Method::POST, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = dispatch(&ctx(Method::OPTIONS, "/api/recintos"), &state).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_handle_request_sets_common_headers() {
        let dir = site();
        let state = test_state(dir.path());
        let req = Request::builder()
            .uri("/api/recintos?ignored=1")
            .header("User-Agent", "test")
            .body(())
            .unwrap();

        let response = handle_request(req, state, "127.0.0.1:50000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Server"], "recintos");
        assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[tokio::test]
    async fn test_body_size_limit() {
        let dir = site();
        let state = test_state(dir.path());
        let req = Request::builder()
            .uri("/api/recintos")
            .header("Content-Length", "999999999")
            .body(())
            .unwrap();

        let response = handle_request(req, state, "127.0.0.1:50000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_access_entry() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/recintos?x=1")
            .header("Referer", "http://localhost/")
            .body(())
            .unwrap();
        let response = http::build_json_response(StatusCode::OK, &[1, 2], false, false);

        let entry = build_access_entry(
            &req,
            "10.0.0.7:4000".parse().unwrap(),
            &response,
            Instant::now(),
        );
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.path, "/api/recintos");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.body_bytes, 5);
        assert_eq!(entry.referer.as_deref(), Some("http://localhost/"));
        assert_eq!(entry.user_agent, None);
    }
}
