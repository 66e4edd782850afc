// ABOUTME: Assigns target names and removes duplicate, deprecated and hand-excluded functions.
// ABOUTME: Two passes: refine (first-seen target name wins) and dedupe (markers, overrides, uniqueness).

use std::collections::HashSet;

use tracing::debug;

use crate::models::{FunctionRecord, Namespace, NamespaceTable};
use crate::naming::target_name;
use crate::rules::{ArgumentRewrite, OverrideAction, RuleSet};

/// First pass: sorts namespaces case-insensitively, names every function and
/// keeps only the first function producing a given target name per namespace.
pub fn refine_functions(mut table: NamespaceTable, rules: &RuleSet) -> NamespaceTable {
    table.sort_case_insensitive();
    table
        .into_iter()
        .map(|ns| {
            let mut seen = HashSet::new();
            let functions = ns
                .functions
                .into_iter()
                .filter_map(|mut func| {
                    let name = target_name(&ns.name, func.raw_namespace.as_deref(), &func.source_name, rules);
                    if !seen.insert(name.clone()) {
                        debug!(function = %func.source_name, namespace = %ns.name, target = %name, "skipping duplicate target name");
                        return None;
                    }
                    func.target_name = Some(name);
                    Some(func)
                })
                .collect();
            Namespace {
                name: ns.name,
                functions,
            }
        })
        .collect()
}

/// Second pass: drops deprecated or discouraged functions, applies the
/// namespace-scoped overrides and re-checks target name uniqueness.
pub fn dedupe_functions(table: NamespaceTable, rules: &RuleSet) -> NamespaceTable {
    table
        .into_iter()
        .map(|ns| {
            let mut seen = HashSet::new();
            let functions = ns
                .functions
                .into_iter()
                .filter_map(|func| dedupe_one(func, &ns.name, rules))
                .filter(|func| seen.insert(func.target_name.clone()))
                .collect();
            Namespace {
                name: ns.name,
                functions,
            }
        })
        .collect()
}

fn dedupe_one(mut func: FunctionRecord, namespace: &str, rules: &RuleSet) -> Option<FunctionRecord> {
    if let Some(marker) = rules.refinement.skip_markers.iter().find(|m| func.docs_mention(m)) {
        debug!(function = %func.source_name, namespace, marker = %marker, "skipping function flagged in docs");
        return None;
    }

    let Some(target) = func.target_name.clone() else {
        return Some(func);
    };
    let action = rules
        .refinement
        .overrides
        .iter()
        .find(|o| o.namespace == namespace && o.target == target)
        .map(|o| &o.action);

    match action {
        Some(OverrideAction::Drop) => {
            debug!(function = %func.source_name, namespace, target = %target, "dropping superseded function");
            None
        }
        Some(OverrideAction::Rename { to, argument }) => {
            func.target_name = Some(to.clone());
            if let Some(rewrite) = argument {
                rewrite_argument(&mut func, rewrite);
            }
            Some(func)
        }
        None => Some(func),
    }
}

fn rewrite_argument(func: &mut FunctionRecord, rewrite: &ArgumentRewrite) {
    for arg in func
        .arguments
        .iter_mut()
        .filter(|a| a.name.as_deref() == Some(rewrite.from.as_str()))
    {
        arg.name = Some(rewrite.to.clone());
        arg.is_optional = rewrite.optional;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::group_by_namespace;
    use crate::signature::parse_signature;
    use pretty_assertions::assert_eq;

    fn func(signature: &str, docs: Option<&str>) -> FunctionRecord {
        let mut f = parse_signature(signature, &RuleSet::builtin()).unwrap();
        f.docs = docs.map(str::to_string);
        f
    }

    fn run(functions: Vec<FunctionRecord>) -> NamespaceTable {
        let rules = RuleSet::builtin();
        let grouped = group_by_namespace(functions, &rules);
        dedupe_functions(refine_functions(grouped, &rules), &rules)
    }

    fn targets(table: &NamespaceTable, namespace: &str) -> Vec<String> {
        table
            .get(namespace)
            .unwrap_or_default()
            .iter()
            .filter_map(|f| f.target_name.clone())
            .collect()
    }

    #[test]
    fn refine_sorts_namespaces_case_insensitively() {
        let table = run(vec![
            func("reaper.UpdateArrange()", None),
            func("string reaper.CF_GetClipboard()", None),
            func("integer reaper.CountTracks(ReaProject proj)", None),
            func("reaper.MIDI_Sort(integer take)", None),
        ]);
        assert_eq!(table.names().collect::<Vec<_>>(), ["CF", "MIDI", "Reaper", "ReaProject"]);
    }

    #[test]
    fn refine_keeps_first_function_per_target_name() {
        let table = run(vec![
            func("MediaItemTake reaper.GetMediaItemTake(MediaItem item, integer tk)", Some("first")),
            func("MediaItemTake reaper.GetMediaItem_Take(MediaItem item, integer tk)", Some("second")),
        ]);
        let funcs = table.get("MediaItem").unwrap();
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].docs.as_deref(), Some("first"));
        assert_eq!(funcs[0].target_name.as_deref(), Some("get_take"));
    }

    #[test]
    fn deprecated_and_discouraged_are_dropped() {
        let table = run(vec![
            func("reaper.Main_OnCommand(integer command, integer flag)", Some("Deprecated, use Main_OnCommandEx")),
            func("reaper.Main_OnCommandEx(integer command, integer flag, ReaProject proj)", Some("Performs an action")),
            func("reaper.Help_Set(string helpstring, boolean is_temporary_help)", Some("Use of this is DISCOURAGED")),
        ]);
        assert_eq!(targets(&table, "Reaper"), ["on_command_ex"]);
    }

    #[test]
    fn enum_project_markers_keeps_third_variant() {
        let table = run(vec![
            func(
                "integer retval, boolean isrgn = reaper.EnumProjectMarkers2(ReaProject proj, integer idx)",
                Some("v2"),
            ),
            func(
                "integer retval, boolean isrgn = reaper.EnumProjectMarkers3(ReaProject proj, integer idx)",
                Some("v3"),
            ),
        ]);
        let funcs = table.get("ReaProject").unwrap();
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].target_name.as_deref(), Some("enum_project_markers"));
        assert_eq!(funcs[0].source_name, "EnumProjectMarkers3");
        assert_eq!(funcs[0].return_values[1].name.as_deref(), Some("is_rgn"));
    }

    #[test]
    fn superseding_overload_gets_optional_argument() {
        let table = run(vec![
            func("integer reaper.CountSelectedTracks(ReaProject proj)", None),
            func("integer reaper.CountSelectedTracks2(ReaProject proj, boolean wantmaster)", None),
        ]);
        let funcs = table.get("ReaProject").unwrap();
        assert_eq!(funcs.len(), 1);
        let f = &funcs[0];
        assert_eq!(f.source_name, "CountSelectedTracks2");
        assert_eq!(f.target_name.as_deref(), Some("count_selected_tracks"));
        assert_eq!(f.arguments[1].name.as_deref(), Some("want_master"));
        assert!(f.arguments[1].is_optional);
        assert_eq!(f.arguments[1].default_value(), "false");
    }

    #[test]
    fn plain_renames_rewrite_target_names() {
        let table = run(vec![
            func("number reaper.GetPlayPositionEx(ReaProject proj)", None),
            func("number reaper.GetPlayPosition2Ex(ReaProject proj)", None),
        ]);
        assert_eq!(
            targets(&table, "ReaProject"),
            ["get_play_position_lat_comp", "get_play_position"]
        );
    }

    #[test]
    fn no_duplicate_target_names_after_overrides() {
        let table = run(vec![
            func("integer reaper.GetProjectTimeSignature2(ReaProject proj)", Some("newer")),
            func("integer reaper.GetProjectTimeSignature(ReaProject proj)", Some("older")),
            func("MediaTrack reaper.GetSelectedTrack(ReaProject proj, integer seltrackidx)", None),
            func("MediaTrack reaper.GetSelectedTrack2(ReaProject proj, integer seltrackidx, boolean wantmaster)", None),
        ]);
        for ns in table.iter() {
            let mut seen = HashSet::new();
            for f in &ns.functions {
                assert!(seen.insert(f.target_name.clone()), "duplicate {:?} in {}", f.target_name, ns.name);
            }
        }
        let funcs = table.get("ReaProject").unwrap();
        assert_eq!(funcs[0].docs.as_deref(), Some("newer"));
        assert_eq!(funcs[1].source_name, "GetSelectedTrack2");
        assert_eq!(funcs[1].arguments[1].name.as_deref(), Some("seltrack_idx"));
    }
}
