//! HTTP front end for turn-latency analysis.
//!
//! `GET /` answers a health check. `POST /analyze` takes multipart audio
//! uploads in the `files` field and responds with the cross-file summary
//! CSV. Requests are processed on the blocking pool, one file after another.

mod error;
mod routes;

pub use error::RouteError;
pub use routes::{router, AppState};
