// ABOUTME: Data models for parsed API functions, their typed values and the namespace table.
// ABOUTME: TypeDescriptor derives its runtime type and default literal once, at construction.

use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::rules::TypeVocabulary;

/// Scripting-language runtime type a source type maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeType {
    Number,
    String,
    Boolean,
    /// Opaque host handle.
    Userdata,
    /// Any type the vocabulary does not recognize, kept verbatim.
    Other(String),
}

impl RuntimeType {
    /// Default literal for a value of this type in the destination language.
    pub fn default_literal(&self) -> &'static str {
        match self {
            RuntimeType::Boolean => "false",
            RuntimeType::Number => "0",
            RuntimeType::String => "\"\"",
            RuntimeType::Userdata | RuntimeType::Other(_) => "nil",
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuntimeType::Number => "number",
            RuntimeType::String => "string",
            RuntimeType::Boolean => "boolean",
            RuntimeType::Userdata => "userdata",
            RuntimeType::Other(other) => other.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl Serialize for RuntimeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One argument, return value or documented constant.
///
/// The source type is fixed at construction; everything derived from it is
/// computed then and never recomputed. Use [`TypeDescriptor::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    source_type: String,
    pub name: Option<String>,
    pub is_optional: bool,
    pub description: Option<String>,
    pub is_pointer: bool,
    is_handle: bool,
    target_type: String,
    runtime_type: RuntimeType,
    default_value: String,
}

impl TypeDescriptor {
    /// Starts building a descriptor for `source_type`.
    pub fn builder(source_type: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            source_type: source_type.into(),
            name: None,
            is_optional: false,
            description: None,
            is_pointer: false,
            default_value: None,
        }
    }

    /// The type as spelled by the vendor documentation.
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Whether the type is an opaque host handle.
    pub fn is_handle(&self) -> bool {
        self.is_handle
    }

    /// The wrapper-side type name, e.g. `Project` for `ReaProject`.
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn runtime_type(&self) -> &RuntimeType {
        &self.runtime_type
    }

    /// Default literal used when the value is omitted.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Whether the wrapper library exposes its own class for this type.
    pub fn is_wrapper_type(&self) -> bool {
        self.target_type != self.source_type
    }

    /// Name of the wrapper class for this type.
    pub fn wrapper_class(&self) -> String {
        format!("ReaWrap{}", self.source_type)
    }

    /// Runtime type seen by wrapper callers; wrapper classes are tables.
    pub fn wrapper_runtime_type(&self) -> String {
        if self.is_wrapper_type() {
            "table".to_string()
        } else {
            self.runtime_type.to_string()
        }
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TypeDescriptor", 10)?;
        s.serialize_field("reascript_type", &self.source_type)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("is_optional", &self.is_optional)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("is_pointer", &self.is_pointer)?;
        s.serialize_field("is_reaper_type", &self.is_handle)?;
        s.serialize_field("reawrap_type", &self.target_type)?;
        s.serialize_field("lua_type", &self.runtime_type)?;
        s.serialize_field("reawrap_lua_type", &self.wrapper_runtime_type())?;
        s.serialize_field("default_value", &self.default_value)?;
        s.end()
    }
}

/// First phase of [`TypeDescriptor`] construction.
#[derive(Debug, Clone)]
pub struct TypeDescriptorBuilder {
    source_type: String,
    name: Option<String>,
    is_optional: bool,
    description: Option<String>,
    is_pointer: bool,
    default_value: Option<String>,
}

impl TypeDescriptorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.is_optional = optional;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn pointer(mut self, pointer: bool) -> Self {
        self.is_pointer = pointer;
        self
    }

    /// Overrides the default literal otherwise derived from the runtime type.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Derives the handle flag, target type, runtime type and default literal.
    pub fn build(self, vocab: &TypeVocabulary) -> TypeDescriptor {
        let source = self.source_type.as_str();
        let is_handle = vocab.is_handle(source);
        let runtime_type = if is_handle {
            RuntimeType::Userdata
        } else if vocab.number_types.iter().any(|t| t == source) {
            RuntimeType::Number
        } else if vocab.boolean_types.iter().any(|t| t == source) {
            RuntimeType::Boolean
        } else if vocab.string_types.iter().any(|t| t == source) {
            RuntimeType::String
        } else {
            RuntimeType::Other(self.source_type.clone())
        };
        let default_value = self
            .default_value
            .unwrap_or_else(|| runtime_type.default_literal().to_string());

        TypeDescriptor {
            target_type: vocab.target_type(source).to_string(),
            source_type: self.source_type,
            name: self.name,
            is_optional: self.is_optional,
            description: self.description,
            is_pointer: self.is_pointer,
            is_handle,
            runtime_type,
            default_value,
        }
    }
}

/// One documented callable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionRecord {
    /// Signature text including the argument list.
    pub signature: String,
    /// Function name as documented by the vendor.
    #[serde(rename = "reascript_name")]
    pub source_name: String,
    /// Namespace token parsed from the name, if it names a real namespace.
    #[serde(rename = "fn_name_space")]
    pub raw_namespace: Option<String>,
    pub arguments: Vec<TypeDescriptor>,
    pub return_values: Vec<TypeDescriptor>,
    pub docs: Option<String>,
    /// Wrapper-convention name, assigned during refinement.
    #[serde(rename = "reawrap_name")]
    pub target_name: Option<String>,
    /// Constants enumerated by the documentation of info accessors.
    pub constants: Option<Vec<TypeDescriptor>>,
}

impl FunctionRecord {
    /// Type of the first argument, the receiver for object-style grouping.
    pub fn receiver_type(&self) -> Option<&str> {
        self.arguments.first().map(TypeDescriptor::source_type)
    }

    /// Returns true if the documentation contains `marker`, ignoring case.
    pub fn docs_mention(&self, marker: &str) -> bool {
        self.docs
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&marker.to_lowercase()))
    }
}

/// Functions of one namespace, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Namespace {
    pub name: String,
    pub functions: Vec<FunctionRecord>,
}

/// Mapping from namespace name to its functions, preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceTable {
    namespaces: Vec<Namespace>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `func` to `namespace`, creating the namespace on first use.
    pub fn push(&mut self, namespace: &str, func: FunctionRecord) {
        match self.namespaces.iter_mut().find(|ns| ns.name == namespace) {
            Some(ns) => ns.functions.push(func),
            None => self.namespaces.push(Namespace {
                name: namespace.to_string(),
                functions: vec![func],
            }),
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&[FunctionRecord]> {
        self.namespaces
            .iter()
            .find(|ns| ns.name == namespace)
            .map(|ns| ns.functions.as_slice())
    }

    /// Finds a function by target name within a namespace.
    pub fn find(&self, namespace: &str, target_name: &str) -> Option<&FunctionRecord> {
        self.get(namespace)?
            .iter()
            .find(|f| f.target_name.as_deref() == Some(target_name))
    }

    /// Namespace names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(|ns| ns.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    /// Number of namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Total number of functions across all namespaces.
    pub fn function_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.functions.len()).sum()
    }

    /// Orders namespaces by name, ignoring case. Ties keep their relative order.
    pub fn sort_case_insensitive(&mut self) {
        self.namespaces.sort_by_key(|ns| ns.name.to_lowercase());
    }
}

impl IntoIterator for NamespaceTable {
    type Item = Namespace;
    type IntoIter = std::vec::IntoIter<Namespace>;

    fn into_iter(self) -> Self::IntoIter {
        self.namespaces.into_iter()
    }
}

impl FromIterator<Namespace> for NamespaceTable {
    fn from_iter<I: IntoIterator<Item = Namespace>>(iter: I) -> Self {
        Self {
            namespaces: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NamespaceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.namespaces.len()))?;
        for ns in &self.namespaces {
            map.serialize_entry(&ns.name, &ns.functions)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    fn vocab() -> TypeVocabulary {
        RuleSet::builtin().types
    }

    #[test]
    fn handle_type_derives_userdata_and_nil() {
        let t = TypeDescriptor::builder("ReaProject").name("proj").build(&vocab());
        assert!(t.is_handle());
        assert_eq!(t.target_type(), "Project");
        assert_eq!(t.runtime_type(), &RuntimeType::Userdata);
        assert_eq!(t.default_value(), "nil");
        assert!(t.is_wrapper_type());
        assert_eq!(t.wrapper_class(), "ReaWrapReaProject");
        assert_eq!(t.wrapper_runtime_type(), "table");
    }

    #[test]
    fn primitive_defaults_follow_runtime_type() {
        let v = vocab();
        assert_eq!(TypeDescriptor::builder("boolean").build(&v).default_value(), "false");
        assert_eq!(TypeDescriptor::builder("integer").build(&v).default_value(), "0");
        assert_eq!(TypeDescriptor::builder("double").build(&v).default_value(), "0");
        assert_eq!(TypeDescriptor::builder("string").build(&v).default_value(), "\"\"");
        assert_eq!(TypeDescriptor::builder("identifier").build(&v).default_value(), "nil");
    }

    #[test]
    fn unknown_type_keeps_its_spelling() {
        let t = TypeDescriptor::builder("identifier").build(&vocab());
        assert_eq!(t.runtime_type(), &RuntimeType::Other("identifier".to_string()));
        assert_eq!(t.runtime_type().to_string(), "identifier");
        assert!(!t.is_wrapper_type());
        assert_eq!(t.wrapper_runtime_type(), "identifier");
    }

    #[test]
    fn explicit_default_overrides_derived_one() {
        let t = TypeDescriptor::builder("boolean")
            .default_value("true")
            .build(&vocab());
        assert_eq!(t.default_value(), "true");
        let renamed = TypeDescriptor {
            name: Some("flag".to_string()),
            ..t
        };
        assert_eq!(renamed.default_value(), "true");
    }

    #[test]
    fn table_keeps_insertion_order_until_sorted() {
        let v = vocab();
        let func = |name: &str| FunctionRecord {
            signature: format!("{name}()"),
            source_name: name.to_string(),
            raw_namespace: None,
            arguments: vec![TypeDescriptor::builder("MediaTrack").build(&v)],
            return_values: Vec::new(),
            docs: None,
            target_name: None,
            constants: None,
        };
        let mut table = NamespaceTable::new();
        table.push("TrackFX", func("A"));
        table.push("midi", func("B"));
        table.push("Reaper", func("C"));
        table.push("TrackFX", func("D"));
        assert_eq!(table.names().collect::<Vec<_>>(), ["TrackFX", "midi", "Reaper"]);
        assert_eq!(table.get("TrackFX").map(<[_]>::len), Some(2));
        assert_eq!(table.function_count(), 4);

        table.sort_case_insensitive();
        assert_eq!(table.names().collect::<Vec<_>>(), ["midi", "Reaper", "TrackFX"]);
        assert_eq!(table.get("midi").unwrap()[0].receiver_type(), Some("MediaTrack"));
    }

    #[test]
    fn docs_mention_ignores_case() {
        let func = FunctionRecord {
            signature: "F()".to_string(),
            source_name: "F".to_string(),
            raw_namespace: None,
            arguments: Vec::new(),
            return_values: Vec::new(),
            docs: Some("[DEPRECATED] use G".to_string()),
            target_name: None,
            constants: None,
        };
        assert!(func.docs_mention("deprecated"));
        assert!(!func.docs_mention("discouraged"));
    }
}
