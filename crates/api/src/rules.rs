// ABOUTME: Rule set data models and the loader for the embedded default rules.
// ABOUTME: Holds every denylist, alias, override and selector the pipeline stages consult.

//! Rule tables for the catalog pipeline.
//!
//! The REAPER documentation is inconsistent enough that each stage leans on a
//! hand-maintained table: namespaces that are not namespaces, types that are
//! host handles, names that must be rewritten. All of them live here as plain
//! data so that a stage can be exercised with a trimmed-down rule set in tests
//! and so that a user can swap the tables without touching code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Embedded JSON containing the default rule set.
const BUILTIN_RULES_JSON: &str = include_str!("../data/rules.json");

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub document: DocumentRules,
    pub types: TypeVocabulary,
    /// Reserved words of the destination language.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Ordered argument name edits; the first matching edit is applied.
    #[serde(default)]
    pub argument_edits: Vec<NameEdit>,
    pub parser: ParserRules,
    pub classifier: ClassifierRules,
    pub naming: NamingRules,
    pub refinement: RefinementRules,
}

impl RuleSet {
    /// Loads the default rule set embedded in the crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded JSON is malformed or cannot be deserialized.
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_RULES_JSON).expect("failed to parse builtin rules")
    }

    /// Loads a rule set from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(CatalogError::invalid_rules)
    }

    /// Returns true if `word` is a reserved word of the destination language.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }
}

/// CSS selectors and markers describing the shape of the documentation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRules {
    /// Container of the regular API functions.
    pub functions_selector: String,
    /// Container of the built-in (best-effort) functions.
    pub builtins_selector: String,
    /// One function entry inside either container.
    pub entry_selector: String,
    /// The Lua signature block inside an entry.
    pub signature_selector: String,
    /// Code element inside the signature block, preferred over the block text.
    pub code_selector: String,
    /// Documentation paragraph inside an entry.
    pub docs_selector: String,
    /// Prefix qualifying every API function name, e.g. `reaper.`.
    pub namespace_prefix: String,
    /// Namespace token assigned to every built-in function.
    pub builtin_namespace: String,
}

/// Knowledge about the vendor's type vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeVocabulary {
    /// Types that are opaque references to host objects.
    #[serde(default)]
    pub handle_types: Vec<String>,
    /// Relabeling of source types into wrapper class names.
    #[serde(default)]
    pub target_types: BTreeMap<String, String>,
    /// Alternate spellings of a type found in signatures.
    #[serde(default)]
    pub type_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub number_types: Vec<String>,
    #[serde(default)]
    pub string_types: Vec<String>,
    #[serde(default)]
    pub boolean_types: Vec<String>,
}

impl TypeVocabulary {
    /// Returns true if `source_type` names an opaque handle type.
    pub fn is_handle(&self, source_type: &str) -> bool {
        self.handle_types.iter().any(|t| t == source_type)
    }

    /// Maps a type spelling to its canonical form.
    pub fn canonical<'a>(&'a self, source_type: &'a str) -> &'a str {
        self.type_aliases
            .get(source_type)
            .map(String::as_str)
            .unwrap_or(source_type)
    }

    /// Returns the wrapper-side type name for a source type.
    pub fn target_type<'a>(&'a self, source_type: &'a str) -> &'a str {
        self.target_types
            .get(source_type)
            .map(String::as_str)
            .unwrap_or(source_type)
    }
}

/// A single argument name rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum NameEdit {
    /// Replace a trailing `pattern` with `replacement`, unless the name is the pattern itself.
    Suffix { pattern: String, replacement: String },
    /// Replace a leading `pattern` with `replacement`, unless the name is the pattern itself.
    Prefix { pattern: String, replacement: String },
    /// Replace the whole name.
    Exact { pattern: String, replacement: String },
}

impl NameEdit {
    /// Applies the edit, returning `None` when it does not match `name`.
    pub fn apply(&self, name: &str) -> Option<String> {
        match self {
            NameEdit::Suffix {
                pattern,
                replacement,
            } => {
                let stem = name.strip_suffix(pattern.as_str())?;
                (!stem.is_empty()).then(|| format!("{stem}{replacement}"))
            }
            NameEdit::Prefix {
                pattern,
                replacement,
            } => {
                let rest = name.strip_prefix(pattern.as_str())?;
                (!rest.is_empty()).then(|| format!("{replacement}{rest}"))
            }
            NameEdit::Exact {
                pattern,
                replacement,
            } => (name == pattern).then(|| replacement.clone()),
        }
    }
}

/// Tables used by the signature parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserRules {
    /// Name prefixes that contain an underscore but are not namespaces.
    #[serde(default)]
    pub false_positive_namespaces: Vec<String>,
    /// Historical namespace spellings and their current names.
    #[serde(default)]
    pub namespace_aliases: BTreeMap<String, String>,
    /// Functions whose name contains this marker may document constants.
    pub info_marker: String,
}

/// Ordered classification rules; the first rule that yields a namespace wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub rules: Vec<ClassifierRule>,
    /// Namespace used when no rule matches.
    pub fallback: String,
}

/// One entry of the classifier's priority chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ClassifierRule {
    /// Functions whose token equals, or whose name contains, `namespace`.
    Family {
        namespace: String,
        #[serde(default)]
        exceptions: Vec<String>,
    },
    /// Functions whose token equals `namespace` or whose first argument has one of `receiver_types`.
    Dedicated {
        namespace: String,
        #[serde(default)]
        receiver_types: Vec<String>,
    },
    /// Functions whose first argument is a handle type, grouped by that type.
    ReceiverType,
    /// Functions without a token, or with a token listed in `members`.
    Umbrella {
        namespace: String,
        #[serde(default)]
        members: Vec<String>,
    },
    /// Functions with a token, grouped by the token verbatim.
    Token,
}

/// Tables used by the name transformer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamingRules {
    /// Legacy spellings inside source names, replaced before anything else.
    #[serde(default)]
    pub legacy_spellings: BTreeMap<String, String>,
    /// Namespace tokens that are never stripped from a name.
    #[serde(default)]
    pub unstripped_namespaces: Vec<String>,
    /// Per-namespace final renames, keyed by namespace then computed name.
    #[serde(default)]
    pub overrides: BTreeMap<String, BTreeMap<String, String>>,
}

/// Tables used by the refinement and deduplication engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinementRules {
    /// Case-insensitive documentation markers that exclude a function.
    #[serde(default)]
    pub skip_markers: Vec<String>,
    /// Namespace-scoped drops and renames, evaluated in order.
    #[serde(default)]
    pub overrides: Vec<RefinementOverride>,
}

/// A hand-curated correction applied to one target name of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementOverride {
    pub namespace: String,
    pub target: String,
    #[serde(flatten)]
    pub action: OverrideAction,
}

/// What a refinement override does to the matching function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverrideAction {
    /// Remove the function from the catalog.
    Drop,
    /// Give the function a new target name, optionally rewriting one argument.
    Rename {
        to: String,
        #[serde(default)]
        argument: Option<ArgumentRewrite>,
    },
}

/// Renames an argument and sets its optionality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentRewrite {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub optional: bool,
}
