use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::capabilities::path_tokens;
use crate::normalize::SpecRecord;

/// Union of every operation's declared tags. When no operation declares a
/// tag, a single topic tag is guessed from the paths instead: the leading
/// resource token repeated across the most paths (`/pets`, `/pets/{id}` and
/// `/store/order` give `pets`).
pub fn extract_tags(record: &SpecRecord) -> BTreeSet<String> {
    let declared: BTreeSet<String> = record
        .operations()
        .flat_map(|(_, op)| op.tags.iter().cloned())
        .collect();

    if !declared.is_empty() {
        return declared;
    }

    let leading = record
        .paths
        .keys()
        .filter_map(|path| path_tokens(path).into_iter().next());

    most_common(leading).into_iter().collect()
}

/// The most frequent item; ties go to the one seen first.
pub(crate) fn most_common(items: impl Iterator<Item = String>) -> Option<String> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }

    let mut best: Option<(String, usize)> = None;
    for (item, count) in counts {
        if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::load::SourceFormat;
    use crate::normalize::normalize;

    fn record(yaml: &str) -> SpecRecord {
        let doc = serde_yaml_ng::from_str(yaml).unwrap();
        normalize(doc, Path::new("test.yaml"), SourceFormat::Yaml).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_of_declared_tags() {
        let r = record(
            r#"
openapi: 3.0.0
paths:
  /pets:
    get:
      tags: [pets]
    post:
      tags: [pets, admin]
  /store:
    get:
      tags: [store]
"#,
        );
        assert_eq!(extract_tags(&r), set(&["admin", "pets", "store"]));
    }

    #[test]
    fn test_fallback_to_most_repeated_leading_segment() {
        let r = record(
            r#"
openapi: 3.0.0
paths:
  /store/order: {}
  /pets: {}
  /pets/{id}: {}
  /api/v1/pets/{id}/photos: {}
"#,
        );
        assert_eq!(extract_tags(&r), set(&["pets"]));
    }

    #[test]
    fn test_fallback_tie_goes_to_first_path() {
        let r = record("openapi: 3.0.0\npaths:\n  /users: {}\n  /orders: {}\n");
        assert_eq!(extract_tags(&r), set(&["users"]));
    }

    #[test]
    fn test_no_paths_means_no_tags() {
        let r = record("openapi: 3.0.0\n");
        assert!(extract_tags(&r).is_empty());
    }

    #[test]
    fn test_only_parameter_paths_means_no_tags() {
        let r = record("openapi: 3.0.0\npaths:\n  /: {}\n  /{id}: {}\n");
        assert!(extract_tags(&r).is_empty());
    }

    #[test]
    fn test_most_common() {
        let items = ["a", "b", "b", "c", "a", "b"].into_iter().map(String::from);
        assert_eq!(most_common(items), Some("b".to_string()));
        assert_eq!(most_common(std::iter::empty()), None);
    }
}
