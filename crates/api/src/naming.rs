// ABOUTME: Derives the wrapper-convention name of a function from its vendor name.
// ABOUTME: Strips namespace prefixes, snake-cases, escapes keywords and applies per-namespace overrides.

use crate::casing::{escape_keyword, to_snake};
use crate::rules::RuleSet;

/// Computes the target name of `source_name` within `namespace`.
///
/// `token` is the namespace token parsed from the source name. The result
/// depends only on the three inputs and the rule set.
pub fn target_name(namespace: &str, token: Option<&str>, source_name: &str, rules: &RuleSet) -> String {
    let naming = &rules.naming;
    let mut name = source_name.to_string();
    for (legacy, current) in &naming.legacy_spellings {
        if name.contains(legacy.as_str()) {
            name = name.replace(legacy.as_str(), current);
        }
    }

    let token_present = token.is_some_and(|t| name.contains(t));
    let exempt = token.is_some_and(|t| naming.unstripped_namespaces.iter().any(|u| u == t));
    if (token_present || name.contains(namespace)) && !exempt {
        if let Some(t) = token {
            name = name.replace(t, "");
        }
        name = name.replace(namespace, "");
    }

    let name = name
        .strip_prefix("__")
        .or_else(|| name.strip_prefix('_'))
        .unwrap_or(&name);

    let name = escape_keyword(to_snake(name), rules);
    naming
        .overrides
        .get(namespace)
        .and_then(|renames| renames.get(&name))
        .cloned()
        .unwrap_or(name)
}
