// ABOUTME: Extracts named constants documented by the *Info accessor functions.
// ABOUTME: Lines like `I_FXEN : int * : fx enabled` become TypeDescriptors; other lines stay prose.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::TypeDescriptor;
use crate::rules::{RuleSet, TypeVocabulary};

static CONSTANT_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]+(?:_[A-Z]+)*$").unwrap());

/// Separates documentation lines into prose and constant definitions.
///
/// A line is a constant when it has at least two non-empty `:` separated parts
/// and the first is an upper-case identifier. With three parts the middle one
/// is a type hint; with two the type is guessed from the description.
/// Prose lines are joined with `\n`, keeping one documentation line per line.
pub fn split_constants<I, S>(lines: I, rules: &RuleSet) -> (String, Vec<TypeDescriptor>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut docs = Vec::new();
    let mut constants = Vec::new();

    for line in lines {
        let line = line.as_ref();
        match parse_constant(line, &rules.types) {
            Some(constant) => constants.push(constant),
            None if !line.trim().is_empty() => docs.push(line.trim().to_string()),
            None => {}
        }
    }
    (docs.join("\n"), constants)
}

fn parse_constant(line: &str, vocab: &TypeVocabulary) -> Option<TypeDescriptor> {
    let parts: Vec<&str> = line
        .split(':')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 || !CONSTANT_NAME_RE.is_match(parts[0]) {
        return None;
    }

    let (source_type, is_pointer, description) = match parts.as_slice() {
        [_, description] => (infer_type(description, vocab), false, description.to_string()),
        [_, hint, rest @ ..] => (hint_type(hint, vocab), hint.contains('*'), rest.join(": ")),
        _ => return None,
    };

    Some(
        TypeDescriptor::builder(source_type)
            .name(parts[0])
            .description(description)
            .pointer(is_pointer)
            .build(vocab),
    )
}

/// Longest handle type mentioned in `text`, so `MediaItemTake` wins over `MediaItem`.
fn mentioned_handle<'a>(text: &str, vocab: &'a TypeVocabulary) -> Option<&'a str> {
    vocab
        .handle_types
        .iter()
        .filter(|t| text.contains(t.as_str()))
        .max_by_key(|t| t.len())
        .map(String::as_str)
}

/// Maps a C-ish type hint (`int *`, `char *`, `MediaTrack *`) to a runtime type name.
fn hint_type(hint: &str, vocab: &TypeVocabulary) -> String {
    let hint = vocab
        .type_aliases
        .iter()
        .fold(hint.to_string(), |h, (from, to)| h.replace(from.as_str(), to));
    if let Some(handle) = mentioned_handle(&hint, vocab) {
        return handle.to_string();
    }
    if hint.starts_with("int") {
        "number".to_string()
    } else if hint.starts_with("bool") {
        "boolean".to_string()
    } else if hint.starts_with("char") || hint.starts_with("str") {
        "string".to_string()
    } else {
        hint
    }
}

fn infer_type(description: &str, vocab: &TypeVocabulary) -> String {
    if let Some(handle) = mentioned_handle(description, vocab) {
        return handle.to_string();
    }
    ["number", "string", "boolean"]
        .into_iter()
        .find(|kw| description.contains(kw))
        .unwrap_or("any")
        .to_string()
}
