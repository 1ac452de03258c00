use std::path::Path;

use heck::ToTitleCase;

/// Derive a registry slug from a spec file path.
///
/// Examples:
/// - `weather.yaml` → `weather`
/// - `My API.json` → `my_api`
/// - `petstore-openapi.yaml` → `petstore`
/// - `openapi.yaml` → `openapi`
/// - `---.yml` → `unnamed`
pub fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    slugify(&stem)
}

/// Lowercase, collapse every run of non-alphanumeric characters into one `_`,
/// trim leading/trailing `_`, and drop a standalone `openapi` word unless it
/// is the only word.
pub fn slugify(name: &str) -> String {
    let words = split_words(name);
    let kept: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| *w != "openapi")
        .collect();

    let joined = if kept.is_empty() {
        words.join("_")
    } else {
        kept.join("_")
    };

    if joined.is_empty() {
        return "unnamed".to_string();
    }
    joined
}

/// Human-readable fallback title for a slug: `my_api` → `My Api`.
pub fn title_from_slug(slug: &str) -> String {
    slug.to_title_case()
}

fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}
