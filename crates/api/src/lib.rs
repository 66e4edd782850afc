// ABOUTME: Catalog builder for the REAPER ReaScript API reference.
// ABOUTME: Parses the HTML reference, groups functions by namespace and renames them for ReaWrap.

//! Turns REAPER's `reascripthelp.html` into a namespace → functions catalog.
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`parser::load_document`] parses the page;
//! 2. [`parser::parse_functions`] turns every entry into a [`FunctionRecord`];
//! 3. [`classify::group_by_namespace`] assigns namespaces;
//! 4. [`refine::refine_functions`] computes target names and drops collisions;
//! 5. [`refine::dedupe_functions`] drops deprecated entries and applies overrides.
//!
//! # Example
//!
//! ```no_run
//! use reawrap_api::{build_catalog, CatalogOptions, RuleSet};
//!
//! let html = std::fs::read_to_string("reascripthelp.html").unwrap();
//! let catalog = build_catalog(&html, &RuleSet::builtin(), &CatalogOptions::default()).unwrap();
//! for ns in catalog.iter() {
//!     println!("{}: {} functions", ns.name, ns.functions.len());
//! }
//! ```

pub mod casing;
pub mod classify;
pub mod constants;
pub mod error;
pub mod html_utils;
pub mod models;
pub mod naming;
pub mod parser;
pub mod refine;
pub mod rules;
pub mod signature;

pub use casing::to_snake;
pub use classify::{classify, group_by_namespace};
pub use error::CatalogError;
pub use models::{FunctionRecord, Namespace, NamespaceTable, RuntimeType, TypeDescriptor};
pub use naming::target_name;
pub use parser::{load_document, parse_builtin_functions, parse_functions};
pub use refine::{dedupe_functions, refine_functions};
pub use rules::RuleSet;
pub use signature::parse_signature;

use tracing::info;

/// Switches for a catalog run.
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// Also parse the built-in functions section (best effort).
    pub include_builtins: bool,
}

/// Runs the whole pipeline over an HTML document.
///
/// Fails if the API section is missing or any API entry is malformed;
/// malformed built-in entries are only logged.
pub fn build_catalog(
    html: &str,
    rules: &RuleSet,
    options: &CatalogOptions,
) -> Result<NamespaceTable, CatalogError> {
    let doc = load_document(html);
    let mut functions = parse_functions(&doc, rules)?;
    if options.include_builtins {
        functions.extend(parse_builtin_functions(&doc, rules)?);
    }
    let parsed = functions.len();

    let grouped = group_by_namespace(functions, rules);
    let catalog = dedupe_functions(refine_functions(grouped, rules), rules);
    info!(
        parsed,
        kept = catalog.function_count(),
        namespaces = catalog.len(),
        "built function catalog"
    );
    Ok(catalog)
}
