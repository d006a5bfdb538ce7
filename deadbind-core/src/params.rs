//! Parameter trimming.
//!
//! Unused parameters before the last used one keep their position and gain
//! an `_` prefix. Unused parameters after it are dropped when trailing
//! removal is enabled, and prefixed otherwise.

use crate::fix::EditSpan;
use crate::unused::{FunctionParams, ParamSlot};

/// Edits for one function's parameter list.
pub fn trim_parameters(source: &str, group: &FunctionParams, remove_trailing: bool) -> Vec<EditSpan> {
    let params = &group.params;
    let last_used = group.last_used_index();

    let drop_from = match last_used {
        Some(index) if remove_trailing && index + 1 < params.len() => Some(index + 1),
        _ => None,
    };

    let Some(drop_from) = drop_from else {
        return params
            .iter()
            .filter(|slot| slot.is_unused())
            .filter_map(|slot| slot.binding.as_ref())
            .map(|binding| EditSpan::insert(binding.ident_start, "_"))
            .collect();
    };

    let (Some(first), Some(last)) = (params.first(), params.last()) else {
        return Vec::new();
    };
    let retained: Vec<String> = params[..drop_from]
        .iter()
        .map(|slot| retained_text(source, slot))
        .collect();
    vec![EditSpan::replace(first.range.start..last.range.end, retained.join(", "))]
}

/// Original parameter text, with `_` before the name when it is unused.
fn retained_text(source: &str, slot: &ParamSlot) -> String {
    let text = &source[slot.range.clone()];
    match &slot.binding {
        Some(binding) if binding.unused => {
            let at = binding.ident_start - slot.range.start;
            format!("{}_{}", &text[..at], &text[at..])
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::EditPlan;
    use crate::parse::{parse_source, FileKind};
    use crate::unused::find_unused_declarations;
    use crate::usage::UsedNameSet;

    fn trim(src: &str, kind: FileKind, remove_trailing: bool) -> String {
        let tree = parse_source(src, kind).unwrap();
        let used = UsedNameSet::collect(&tree);
        let found = find_unused_declarations(&tree, &used);
        let mut plan = EditPlan::default();
        for group in &found.parameters {
            plan.extend(trim_parameters(src, group, remove_trailing));
        }
        plan.apply(src).unwrap()
    }

    const PROCESS_USER: &str =
        "function processUser(userId, userName, userRole, userAge){ console.log(userName); }";

    #[test]
    fn test_trailing_parameters_removed() {
        assert_eq!(
            trim(PROCESS_USER, FileKind::Js, true),
            "function processUser(_userId, userName){ console.log(userName); }"
        );
    }

    #[test]
    fn test_trailing_parameters_prefixed_when_kept() {
        assert_eq!(
            trim(PROCESS_USER, FileKind::Js, false),
            "function processUser(_userId, userName, _userRole, _userAge){ console.log(userName); }"
        );
    }

    #[test]
    fn test_all_unused_parameters_are_prefixed() {
        assert_eq!(
            trim("const f = (a, b) => 1;\nf();\n", FileKind::Js, true),
            "const f = (_a, _b) => 1;\nf();\n"
        );
    }

    #[test]
    fn test_retained_text_keeps_annotations_and_defaults() {
        assert_eq!(
            trim("function f(a: number = 1, b?: string, c?: boolean) { return b; }\nf();\n", FileKind::Ts, true),
            "function f(_a: number = 1, b?: string) { return b; }\nf();\n"
        );
    }

    #[test]
    fn test_rest_parameter_prefix_follows_dots() {
        assert_eq!(
            trim("function f(...rest) {}\nf();\n", FileKind::Js, true),
            "function f(..._rest) {}\nf();\n"
        );
    }

    #[test]
    fn test_destructured_parameter_anchors_trimming() {
        assert_eq!(
            trim("function f({ a }, b) {}\nf();\n", FileKind::Js, true),
            "function f({ a }) {}\nf();\n"
        );
    }

    #[test]
    fn test_result_has_last_used_index_plus_one_parameters() {
        let src = "function f(a, b, c, d, e) { return c; }\nf();\n";
        let out = trim(src, FileKind::Js, true);
        assert_eq!(out, "function f(_a, _b, c) { return c; }\nf();\n");
    }
}
