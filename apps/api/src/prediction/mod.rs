// Serving adapters' shared core: raw score parsing and the POST /predict/ handler.
// The CLI in bin/predict.rs goes through the same `predict_raw` path.

pub mod handlers;
pub mod input;
