// ABOUTME: Identifier casing helpers shared by the signature parser and the name transformer.
// ABOUTME: Converts CamelCase to snake_case and applies the argument name edit table.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::RuleSet;

static ACRONYM_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Converts an identifier to snake_case.
///
/// Acronym runs stay together (`GetFXGUID` becomes `get_fxguid`), and input
/// that is already snake_case is returned unchanged.
pub fn to_snake(s: &str) -> String {
    let s = ACRONYM_BOUNDARY.replace_all(s, "${1}_${2}");
    let s = WORD_BOUNDARY.replace_all(&s, "${1}_${2}");
    s.to_lowercase()
}

/// Appends `_` to `name` if it is a reserved word of the destination language.
pub fn escape_keyword(name: String, rules: &RuleSet) -> String {
    if rules.is_keyword(&name) {
        format!("{name}_")
    } else {
        name
    }
}

/// Turns a documented argument name into a wrapper-convention parameter name.
pub fn sanitize_argument_name(raw: &str, rules: &RuleSet) -> String {
    let mut name = escape_keyword(to_snake(raw), rules).replace('.', "");

    if let Some(edited) = rules.argument_edits.iter().find_map(|edit| edit.apply(&name)) {
        name = edited;
    }
    if let Some(rest) = name.strip_prefix("__") {
        name = rest.to_string();
    }
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    name
}
