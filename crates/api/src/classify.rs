// ABOUTME: Assigns every parsed function to exactly one namespace.
// ABOUTME: Evaluates the ordered classifier rules of the rule set; the first rule that matches wins.

use tracing::debug;

use crate::models::{FunctionRecord, NamespaceTable};
use crate::rules::{ClassifierRule, RuleSet};

impl ClassifierRule {
    /// Returns the namespace this rule assigns to `func`, if the rule applies.
    pub fn namespace_for(&self, func: &FunctionRecord, rules: &RuleSet) -> Option<String> {
        let token = func.raw_namespace.as_deref();
        match self {
            ClassifierRule::Family {
                namespace,
                exceptions,
            } => {
                let in_family = token == Some(namespace.as_str())
                    || func.source_name.contains(namespace.as_str());
                let excepted = exceptions.iter().any(|e| *e == func.source_name);
                (in_family && !excepted).then(|| namespace.clone())
            }
            ClassifierRule::Dedicated {
                namespace,
                receiver_types,
            } => {
                let by_token = token == Some(namespace.as_str());
                let by_receiver = func
                    .receiver_type()
                    .is_some_and(|t| receiver_types.iter().any(|r| r == t));
                (by_token || by_receiver).then(|| namespace.clone())
            }
            ClassifierRule::ReceiverType => func
                .receiver_type()
                .filter(|t| rules.types.is_handle(t))
                .map(str::to_string),
            ClassifierRule::Umbrella { namespace, members } => {
                let member = token.map_or(true, |t| members.iter().any(|m| m == t));
                member.then(|| namespace.clone())
            }
            ClassifierRule::Token => token.map(str::to_string),
        }
    }
}

/// Namespace of a single function. Depends only on the function itself.
pub fn classify(func: &FunctionRecord, rules: &RuleSet) -> String {
    rules
        .classifier
        .rules
        .iter()
        .find_map(|rule| rule.namespace_for(func, rules))
        .unwrap_or_else(|| rules.classifier.fallback.clone())
}

/// Groups functions by namespace, preserving first-seen order within each namespace.
pub fn group_by_namespace<I>(functions: I, rules: &RuleSet) -> NamespaceTable
where
    I: IntoIterator<Item = FunctionRecord>,
{
    let mut table = NamespaceTable::new();
    for func in functions {
        let namespace = classify(&func, rules);
        table.push(&namespace, func);
    }
    debug!(
        namespaces = table.len(),
        functions = table.function_count(),
        "grouped functions by namespace"
    );
    table
}
