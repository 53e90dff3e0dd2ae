//! Project portfolio page: fills the `portfolio.html` template with the model's
//! enhanced project description and feature list.

use askama::Template;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const NOT_SPECIFIED: &str = "Not specified";

static INVALID_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("filename pattern is valid"));
static UNDERSCORE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("underscore pattern is valid"));

/// Operator-supplied project details.
#[derive(Debug, Clone, Default)]
pub struct ProjectDetails {
    pub name: String,
    pub technologies: String,
    pub duration: Option<String>,
    pub role: Option<String>,
    pub team_size: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioPage {
    pub file_name: String,
    pub html: String,
}

/// Everything the page shows. Askama escapes every field.
#[derive(Template)]
#[template(path = "portfolio.html")]
struct PortfolioTemplate<'a> {
    project_name: &'a str,
    duration: &'a str,
    role: &'a str,
    team_size: &'a str,
    /// One paragraph per line of the enhanced description.
    overview: Vec<String>,
    /// One list item per line of the feature list.
    features: Vec<String>,
    technologies: Vec<&'a str>,
    link: Option<&'a str>,
}

/// Lines of model text with markdown bold markers removed.
fn plain_lines(text: &str) -> Vec<String> {
    text.replace("**", "").lines().map(String::from).collect()
}

fn technologies(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|tech| !tech.is_empty())
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Replaces characters that are invalid in file names with `_`, collapses
/// runs of `_` and trims them from both ends.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = INVALID_FILENAME_CHARS.replace_all(name, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

pub fn portfolio_file_name(project_name: &str) -> String {
    format!("{}_portfolio.html", sanitize_filename(project_name).to_lowercase())
}

pub fn render_portfolio(
    details: &ProjectDetails,
    enhanced: &str,
    features: &str,
) -> Result<PortfolioPage, askama::Error> {
    let page = PortfolioTemplate {
        project_name: details.name.trim(),
        duration: non_blank(details.duration.as_deref()).unwrap_or(NOT_SPECIFIED),
        role: non_blank(details.role.as_deref()).unwrap_or(NOT_SPECIFIED),
        team_size: non_blank(details.team_size.as_deref()).unwrap_or(NOT_SPECIFIED),
        overview: plain_lines(enhanced),
        features: plain_lines(features),
        technologies: technologies(&details.technologies),
        link: non_blank(details.link.as_deref()),
    };

    Ok(PortfolioPage {
        file_name: portfolio_file_name(&details.name),
        html: page.render()?,
    })
}
