use super::capabilities::path_tokens;
use super::tags::most_common;
use crate::normalize::SpecRecord;

/// `info.description` verbatim, or a one-liner built from the title and the
/// resource token that appears in the most paths.
///
/// Examples:
/// - title `Petstore`, paths `/pets`, `/pets/{id}`, `/store` → `Petstore exposing pets endpoints`
/// - title `Weather API`, no paths → `Weather API`
/// - title `Billing`, no paths → `Billing API`
pub fn describe(record: &SpecRecord) -> String {
    if let Some(description) = &record.description {
        return description.clone();
    }

    let subject = most_common(record.paths.keys().flat_map(|path| path_tokens(path)));

    match subject {
        Some(subject) => format!(
            "{} exposing {} endpoints",
            record.title,
            subject.replace('_', " ")
        ),
        None if record.title.to_ascii_lowercase().ends_with("api") => record.title.clone(),
        None => format!("{} API", record.title),
    }
}
