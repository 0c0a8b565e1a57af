//! Applicant fit classifier: trains a tf-idf + random forest pipeline on
//! (score, cover letter) pairs and serves "Fit" / "Moderate" / "Not Fit"
//! predictions over HTTP and the command line.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod prediction;
pub mod routes;
pub mod state;
pub mod telemetry;
