// src/presentation/http/pages.rs
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, warn};

/// One configured template page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub path: String,
    pub template: String,
    #[serde(default)]
    pub requires_auth: bool,
}

const RESERVED_EXACT: &[&str] = &["/", "/instances", "/health", "/openapi.json"];
const RESERVED_PREFIXES: &[&str] = &["/auth", "/api", "/js"];

fn is_reserved(path: &str) -> bool {
    RESERVED_EXACT.contains(&path)
        || RESERVED_PREFIXES
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

fn is_valid_path(path: &str) -> bool {
    path.starts_with('/')
        && path.len() > 1
        && !path.ends_with('/')
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
        && !path.contains("//")
}

fn is_valid_template(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_'))
}

/// Read the page configuration file. A missing or malformed file yields no
/// pages; individual bad entries are skipped.
pub async fn load_pages(path: &Path) -> Vec<PageConfig> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) => {
            error!(path = %path.display(), error = %err, "could not read page configuration");
            return Vec::new();
        }
    };
    let pages = parse_pages(&raw);
    info!(path = %path.display(), count = pages.len(), "page configuration loaded");
    pages
}

pub fn parse_pages(raw: &str) -> Vec<PageConfig> {
    let entries: Vec<PageConfig> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            error!(error = %err, "page configuration is not a valid page list");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|page| {
            if !is_valid_path(&page.path) {
                warn!(path = %page.path, "skipping page with invalid path");
                return false;
            }
            if is_reserved(&page.path) {
                warn!(path = %page.path, "skipping page that shadows a built-in route");
                return false;
            }
            if !is_valid_template(&page.template) {
                warn!(path = %page.path, template = %page.template, "skipping page with invalid template name");
                return false;
            }
            if !seen.insert(page.path.clone()) {
                warn!(path = %page.path, "skipping duplicate page path");
                return false;
            }
            true
        })
        .collect()
}
