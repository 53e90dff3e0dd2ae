// Single-candidate analysis (student flow).
// Implements: resume review modes, skill gap, interview prep, career path, portfolio page.
// All model calls go through the `GenerativeModel` handed in by `AppState`.

pub mod handlers;
pub mod portfolio;
pub mod prompts;
pub mod service;
