// Bulk screening (industry flow).
// Implements: criteria extraction, reply normalization, override filter, batch run, CSV export.
// All model calls go through the `GenerativeModel` handed in by `AppState`.

pub mod batch;
pub mod criteria;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
