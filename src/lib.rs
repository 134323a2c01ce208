//! Recintos: serves geographic venue records from a CSV file as JSON,
//! plus a static landing page.
//!
//! - `GET /api/recintos` - venues with coordinates, read fresh per request
//! - `GET /` - landing page from the template directory
//! - `GET /static/*` - static assets

pub mod config;
pub mod dataset;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
