// ABOUTME: Parses one Lua signature line of the API reference into a FunctionRecord.
// ABOUTME: Splits return values from the call, tokenizes typed names and derives the namespace token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::casing::sanitize_argument_name;
use crate::error::CatalogError;
use crate::models::{FunctionRecord, TypeDescriptor};
use crate::rules::RuleSet;

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+\s*\([^)]*\)").unwrap());
static ARGUMENTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
static FUNCTION_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\s*\(").unwrap());

/// Parses signature text such as
/// `integer retval, string buf = reaper.GetSetProjectInfo_String(ReaProject project, string desc)`.
///
/// The record comes back without documentation or target name.
pub fn parse_signature(text: &str, rules: &RuleSet) -> Result<FunctionRecord, CatalogError> {
    let (returns, fragments) = match text.split_once(rules.document.namespace_prefix.as_str()) {
        Some((returns, call)) => (Some(returns), vec![returns, call]),
        None => (None, vec![text]),
    };

    let return_values = returns
        .map(|clause| parse_return_values(clause, rules))
        .unwrap_or_default();

    let signature = fragments
        .iter()
        .map(|f| f.trim())
        .find(|f| SIGNATURE_RE.is_match(f))
        .ok_or_else(|| CatalogError::missing_signature(&fragments))?;

    let arguments = parse_typed_list(
        extract_arguments(signature)?.split(','),
        rules,
    );
    let source_name = function_name(signature)?;
    let raw_namespace = namespace_token(source_name, rules);

    Ok(FunctionRecord {
        signature: signature.to_string(),
        source_name: source_name.to_string(),
        raw_namespace,
        arguments,
        return_values,
        docs: None,
        target_name: None,
        constants: None,
    })
}

/// Parses a comma separated return clause, ignoring the `=` that precedes the call.
pub fn parse_return_values(clause: &str, rules: &RuleSet) -> Vec<TypeDescriptor> {
    parse_typed_list(clause.split(',').map(|part| part.replace('=', "")), rules)
}

/// Tokenizes pieces until the first empty one; `()` yields no arguments.
fn parse_typed_list<I, S>(pieces: I, rules: &RuleSet) -> Vec<TypeDescriptor>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pieces
        .into_iter()
        .map_while(|piece| parse_typed_name(piece.as_ref(), rules))
        .collect()
}

/// Parses `TYPE`, `TYPE name` or `optional TYPE name` into a descriptor.
///
/// Returns `None` for a blank piece.
pub fn parse_typed_name(piece: &str, rules: &RuleSet) -> Option<TypeDescriptor> {
    let mut tokens: Vec<&str> = piece.split_whitespace().collect();
    let optional = tokens.first() == Some(&"optional") && tokens.len() > 1;
    if optional {
        tokens.remove(0);
    }
    let (source_type, name) = match tokens.as_slice() {
        [] => return None,
        [ty] => (*ty, None),
        [ty, name, ..] => (*ty, Some(sanitize_argument_name(name, rules))),
    };

    let mut builder = TypeDescriptor::builder(rules.types.canonical(source_type)).optional(optional);
    if let Some(name) = name {
        builder = builder.name(name);
    }
    Some(builder.build(&rules.types))
}

fn extract_arguments(signature: &str) -> Result<&str, CatalogError> {
    ARGUMENTS_RE
        .captures(signature)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| CatalogError::MissingArguments(signature.to_string()))
}

/// Finds the identifier directly followed by an opening parenthesis.
pub fn function_name(signature: &str) -> Result<&str, CatalogError> {
    FUNCTION_NAME_RE
        .captures(signature)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| CatalogError::MissingFunctionName(signature.to_string()))
}

/// Returns the part of `name` before its first underscore, unless that part is
/// a known false positive. Historical spellings map to their current namespace.
pub fn namespace_token(name: &str, rules: &RuleSet) -> Option<String> {
    let (token, _) = name.split_once('_').filter(|(t, _)| !t.is_empty())?;
    if rules
        .parser
        .false_positive_namespaces
        .iter()
        .any(|fp| fp == token)
    {
        return None;
    }
    let token = rules
        .parser
        .namespace_aliases
        .get(token)
        .map(String::as_str)
        .unwrap_or(token);
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> RuleSet {
        RuleSet::builtin()
    }

    #[test]
    fn parses_returns_arguments_and_namespace() {
        let func = parse_signature(
            "integer retval, string buf = reaper.GetSetProjectInfo_String(ReaProject project, string desc, string valuestrNeedBig, boolean is_set)",
            &rules(),
        )
        .unwrap();

        assert_eq!(func.source_name, "GetSetProjectInfo_String");
        assert_eq!(func.raw_namespace, None);
        assert_eq!(
            func.signature,
            "GetSetProjectInfo_String(ReaProject project, string desc, string valuestrNeedBig, boolean is_set)"
        );
        let returns: Vec<_> = func
            .return_values
            .iter()
            .map(|r| (r.source_type(), r.name.as_deref()))
            .collect();
        assert_eq!(returns, [("integer", Some("ret_val")), ("string", Some("buf"))]);
        let args: Vec<_> = func
            .arguments
            .iter()
            .map(|a| (a.source_type(), a.name.as_deref()))
            .collect();
        assert_eq!(
            args,
            [
                ("ReaProject", Some("project")),
                ("string", Some("desc")),
                ("string", Some("valuestr_need_big")),
                ("boolean", Some("is_set")),
            ]
        );
    }

    #[test]
    fn empty_argument_list_yields_no_arguments() {
        let func = parse_signature("integer reaper.CountTracks()", &rules()).unwrap();
        assert!(func.arguments.is_empty());
        assert_eq!(func.return_values.len(), 1);
        assert_eq!(func.return_values[0].source_type(), "integer");
        assert_eq!(func.return_values[0].name, None);
    }

    #[test]
    fn signature_without_returns() {
        let func = parse_signature("reaper.TrackFX_Show(MediaTrack track, integer index, integer showFlag)", &rules()).unwrap();
        assert!(func.return_values.is_empty());
        assert_eq!(func.raw_namespace.as_deref(), Some("TrackFX"));
        assert_eq!(func.arguments[2].name.as_deref(), Some("show_flag"));
    }

    #[test]
    fn missing_signature_is_an_error() {
        let err = parse_signature("gfx.r", &rules()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSignature(_)));
        assert!(err.is_entry_error());
    }

    #[test]
    fn optional_marker_shifts_type_and_name() {
        let t = parse_typed_name("optional boolean wantmaster", &rules()).unwrap();
        assert_eq!(t.source_type(), "boolean");
        assert_eq!(t.name.as_deref(), Some("wantmaster"));
        assert!(t.is_optional);
    }

    #[test]
    fn single_token_is_bare_type() {
        let t = parse_typed_name(" MediaItem_Take ", &rules()).unwrap();
        assert_eq!(t.source_type(), "MediaItemTake");
        assert_eq!(t.name, None);
        assert!(!t.is_optional);
        assert!(parse_typed_name("   ", &rules()).is_none());
    }

    #[test]
    fn namespace_token_filters_false_positives_and_aliases() {
        let r = rules();
        assert_eq!(namespace_token("TrackFX_GetCount", &r).as_deref(), Some("TrackFX"));
        assert_eq!(namespace_token("GetSetMediaTrackInfo_String", &r), None);
        assert_eq!(namespace_token("CountTracks", &r), None);
        assert_eq!(namespace_token("TimeMap2_beatsToTime", &r).as_deref(), Some("TimeMap"));
        assert_eq!(namespace_token("midi_getrecentinputevent", &r).as_deref(), Some("MIDI"));
        assert_eq!(namespace_token("BR_GetMediaTrackByGUID", &r).as_deref(), Some("BR"));
    }

    #[test]
    fn leading_underscore_yields_no_namespace_token() {
        let r = rules();
        assert_eq!(namespace_token("__mergesort", &r), None);
        assert_eq!(namespace_token("_Foo", &r), None);
        let func = parse_signature("reaper.__mergesort(integer a)", &r).unwrap();
        assert_eq!(func.raw_namespace, None);
    }

    #[test]
    fn function_name_requires_parenthesis() {
        assert_eq!(function_name("Foo (a)").unwrap(), "Foo");
        assert!(matches!(
            function_name("no call here"),
            Err(CatalogError::MissingFunctionName(_))
        ));
    }

    #[test]
    fn return_clause_strips_assignment() {
        let values = parse_return_values("boolean retval, number position = ", &rules());
        let names: Vec<_> = values.iter().filter_map(|v| v.name.as_deref()).collect();
        assert_eq!(names, ["ret_val", "position"]);
    }
}
