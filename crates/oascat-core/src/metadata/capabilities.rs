use std::collections::BTreeSet;

use heck::ToSnakeCase;

use crate::normalize::SpecRecord;

/// Path segments that name no resource: API prefixes and version markers.
const BOILERPLATE_SEGMENTS: &[&str] = &["api", "apis", "rest", "rpc", "public", "internal"];

/// Capability tokens for a record: resource tokens from every path plus one
/// action token per recognized `operationId`.
pub fn extract_capabilities(record: &SpecRecord) -> BTreeSet<String> {
    let mut capabilities: BTreeSet<String> = record
        .paths
        .keys()
        .flat_map(|path| path_tokens(path))
        .collect();

    capabilities.extend(
        record
            .operations()
            .filter_map(|(_, op)| op.operation_id.as_deref())
            .filter_map(operation_action)
            .map(str::to_string),
    );

    capabilities
}

/// Resource tokens of one path template, in path order.
///
/// Parameter segments (`{id}`), boilerplate prefixes, version segments (`v1`,
/// `v2.1`) and segments without letters are dropped. What remains is
/// snake_cased, so `/user-profiles`, `/userProfiles` and `/user_profiles` all
/// yield `user_profiles`.
///
/// Examples:
/// - `/forecast/{city}` → `["forecast"]`
/// - `/api/v2/pets/{petId}/photos` → `["pets", "photos"]`
/// - `/` → `[]`
pub fn path_tokens(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|seg| !seg.is_empty() && !seg.starts_with('{'))
        .filter(|seg| seg.chars().any(char::is_alphabetic))
        .map(str::to_snake_case)
        .filter(|seg| !seg.is_empty())
        .filter(|seg| !BOILERPLATE_SEGMENTS.contains(&seg.as_str()) && !is_version_segment(seg))
        .collect()
}

/// `v1`, `v2`, `v2_1` (snake_cased `v2.1`).
fn is_version_segment(seg: &str) -> bool {
    let Some(rest) = seg.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit() || c == '_')
}

/// Map an `operationId` to a normalized action token.
///
/// The id is split into snake_case words and any trailing `by_...` qualifier
/// is cut off. The first word is checked against the verb table, then the
/// last word. Ids with no recognized verb contribute nothing.
///
/// Examples:
/// - `getPetById` → `read`
/// - `listPets` → `list`
/// - `petsList` → `list`
/// - `userCreate` → `create`
/// - `removeOrder` → `delete`
/// - `findPetsByStatus` → `read`
/// - `weatherReport` → none
pub fn operation_action(operation_id: &str) -> Option<&'static str> {
    let snake = operation_id.to_snake_case();
    let mut words: Vec<&str> = snake.split('_').filter(|w| !w.is_empty()).collect();

    if let Some(by) = words.iter().skip(1).position(|w| *w == "by") {
        words.truncate(by + 1);
    }

    let first = words.first().and_then(|w| verb_action(w));
    first.or_else(|| words.last().and_then(|w| verb_action(w)))
}

fn verb_action(word: &str) -> Option<&'static str> {
    let action = match word {
        "list" | "index" => "list",
        "get" | "read" | "fetch" | "retrieve" | "find" | "show" | "describe" | "lookup" => "read",
        "create" | "add" | "new" | "post" | "insert" | "register" => "create",
        "update" | "put" | "patch" | "edit" | "modify" | "set" | "replace" => "update",
        "delete" | "remove" | "destroy" | "del" => "delete",
        "search" | "query" | "filter" => "search",
        "upload" => "upload",
        "download" => "download",
        _ => return None,
    };
    Some(action)
}
