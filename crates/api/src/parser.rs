// ABOUTME: Walks the ReaScript reference page and parses every function entry.
// ABOUTME: API entries fail the run on malformed signatures; built-in entries are logged and skipped.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::constants::split_constants;
use crate::error::CatalogError;
use crate::html_utils::{collapse_whitespace, element_text, paragraph_lines, strip_nbsp};
use crate::models::FunctionRecord;
use crate::rules::{DocumentRules, RuleSet};
use crate::signature::parse_signature;

/// Parses a static HTML document into a traversable tree.
pub fn load_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Compiled selectors of a [`DocumentRules`].
struct Selectors {
    functions: Selector,
    builtins: Selector,
    entry: Selector,
    signature: Selector,
    code: Selector,
    docs: Selector,
}

impl Selectors {
    fn compile(rules: &DocumentRules) -> Result<Self, CatalogError> {
        Ok(Self {
            functions: compile(&rules.functions_selector)?,
            builtins: compile(&rules.builtins_selector)?,
            entry: compile(&rules.entry_selector)?,
            signature: compile(&rules.signature_selector)?,
            code: compile(&rules.code_selector)?,
            docs: compile(&rules.docs_selector)?,
        })
    }
}

fn compile(css: &str) -> Result<Selector, CatalogError> {
    Selector::parse(css).map_err(|e| CatalogError::invalid_rules(format!("selector {css:?}: {e}")))
}

/// Parses every entry of the API functions section, in document order.
///
/// Any malformed entry aborts the whole parse: a silently skipped API
/// function would leave a hole in the catalog.
pub fn parse_functions(doc: &Html, rules: &RuleSet) -> Result<Vec<FunctionRecord>, CatalogError> {
    let selectors = Selectors::compile(&rules.document)?;
    let section = doc
        .select(&selectors.functions)
        .next()
        .ok_or_else(|| CatalogError::MissingSection(rules.document.functions_selector.clone()))?;

    let functions = section
        .select(&selectors.entry)
        .map(|entry| parse_entry(entry, &selectors, rules))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = functions.len(), "parsed API functions");
    Ok(functions)
}

/// Parses the built-in functions section on a best-effort basis.
///
/// Entries that cannot be parsed are logged and skipped. A missing section
/// yields no functions.
pub fn parse_builtin_functions(doc: &Html, rules: &RuleSet) -> Result<Vec<FunctionRecord>, CatalogError> {
    let selectors = Selectors::compile(&rules.document)?;
    let Some(section) = doc.select(&selectors.builtins).next() else {
        warn!(selector = %rules.document.builtins_selector, "built-in functions section not found");
        return Ok(Vec::new());
    };

    let mut functions = Vec::new();
    for entry in section.select(&selectors.entry) {
        let parsed = signature_text(entry, &selectors)
            .ok_or_else(|| CatalogError::missing_signature(&[entry_id(entry)]))
            .and_then(|text| parse_signature(&text, rules));
        match parsed {
            Ok(mut func) => {
                func.raw_namespace = Some(rules.document.builtin_namespace.clone());
                func.docs = entry_docs(entry, &selectors).map(|p| element_text(p).trim().to_string());
                functions.push(func);
            }
            Err(err) if err.is_entry_error() => {
                warn!(error = %err, entry = entry_id(entry), "skipping malformed built-in function")
            }
            Err(err) => return Err(err),
        }
    }
    debug!(count = functions.len(), "parsed built-in functions");
    Ok(functions)
}

fn parse_entry(
    entry: ElementRef<'_>,
    selectors: &Selectors,
    rules: &RuleSet,
) -> Result<FunctionRecord, CatalogError> {
    let text = signature_text(entry, selectors)
        .ok_or_else(|| CatalogError::missing_signature(&[entry_id(entry)]))?;
    let mut func = parse_signature(&text, rules)?;

    let Some(docs) = entry_docs(entry, selectors) else {
        return Ok(func);
    };
    if func.source_name.contains(rules.parser.info_marker.as_str()) {
        let (prose, constants) = split_constants(paragraph_lines(docs), rules);
        func.docs = Some(strip_nbsp(&prose));
        if !constants.is_empty() {
            func.constants = Some(constants);
        }
    } else {
        func.docs = Some(strip_nbsp(&element_text(docs)).trim().to_string());
    }
    Ok(func)
}

/// Text of the Lua signature block, preferring its code element so that
/// labels rendered next to the code are ignored.
fn signature_text(entry: ElementRef<'_>, selectors: &Selectors) -> Option<String> {
    let block = entry.select(&selectors.signature).next()?;
    let text = match block.select(&selectors.code).next() {
        Some(code) => element_text(code),
        None => element_text(block),
    };
    Some(collapse_whitespace(&text))
}

fn entry_docs<'a>(entry: ElementRef<'a>, selectors: &Selectors) -> Option<ElementRef<'a>> {
    entry.select(&selectors.docs).next()
}

fn entry_id(entry: ElementRef<'_>) -> &str {
    entry.value().attr("id").unwrap_or("<unnamed entry>")
}
