//! Venue API endpoint
//!
//! `GET /api/recintos` reads the backing CSV file fresh on every request and
//! returns the cleaned rows as a JSON array, or `{"error": ...}`.

use crate::config::AppState;
use crate::dataset::{self, Dataset, DatasetError};
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::Arc;

pub const RECINTOS_PATH: &str = "/api/recintos";

/// Serve the venue list
pub async fn serve_recintos(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let pretty = state.debug();

    match fetch_recintos(state).await {
        Ok(dataset) => {
            logger::log_debug(&format!(
                "Loaded {} venue(s) from '{}' ({} row(s) read, {} dropped, {} column(s), {} empty cell(s))",
                dataset.records.len(),
                state.config.dataset.path.display(),
                dataset.rows_read,
                dataset.dropped(),
                dataset.columns.len(),
                dataset.null_cells(),
            ));
            http::build_json_response(StatusCode::OK, &dataset.records, pretty, ctx.is_head)
        }
        Err(e) => {
            let status = e.status();
            if status == StatusCode::NOT_FOUND {
                logger::log_warning(&format!(
                    "Dataset file not found: {}",
                    state.config.dataset.path.display()
                ));
            } else {
                logger::log_error(&format!("Failed to read dataset: {e}"));
            }
            http::build_json_error(status, &e.to_string(), pretty, ctx.is_head)
        }
    }
}

/// Read the dataset on the blocking pool so slow disks don't stall the workers
async fn fetch_recintos(state: &Arc<AppState>) -> Result<Dataset, DatasetError> {
    let state = Arc::clone(state);
    let task = tokio::task::spawn_blocking(move || {
        dataset::load_dataset(&state.config.dataset.path, &state.read_options)
    });

    match task.await {
        Ok(result) => result,
        Err(e) => Err(DatasetError::Io(std::io::Error::other(format!(
            "dataset task failed: {e}"
        )))),
    }
}
