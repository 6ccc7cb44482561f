//! # Module Set Resolution
//!
//! Computes the list of modules to register at startup: the fixed baseline,
//! minus `DISABLED_MODULES`, plus `ENABLED_MODULES`.

/// Modules registered when no overrides are given, in registration order.
pub const BASELINE_MODULES: &[&str] = &[
    "Activity",
    "Discord",
    "Overload",
    "Ignore",
    "Holiday",
    "Potato",
    "UserJoined",
    "Help",
    "TimeToGalacon",
    "Boop",
    "Bap",
    "Hug",
    "Fanta",
    "Bizaam",
    "Assfart",
    "BestPony",
    "WorstPony",
    "MentionCanni",
    "DevCommands",
    "Solver",
    "GamerCanni",
    "Greetings",
    "Compliment",
    "Hype",
    "RoutineMessages",
    "InterBotCom",
    "NoMessageProcessor",
];

/// Splits a comma-separated list into trimmed, non-empty names.
pub fn parse_module_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Applies the disabled and enabled overrides to `baseline`.
///
/// Unknown disabled names and already-present enabled names are ignored.
/// Comparison is exact and case-sensitive.
pub fn resolve_modules(
    baseline: &[&str],
    disabled: Option<&str>,
    enabled: Option<&str>,
) -> Vec<String> {
    let mut modules: Vec<String> = baseline.iter().map(|m| m.to_string()).collect();

    for name in parse_module_list(disabled) {
        if let Some(idx) = modules.iter().position(|m| m == name) {
            modules.remove(idx);
        }
    }

    for name in parse_module_list(enabled) {
        if !modules.iter().any(|m| m == name) {
            modules.push(name.to_string());
        }
    }

    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: &[&str] = &["A", "B", "C"];

    #[test]
    fn test_disable_and_enable() {
        let result = resolve_modules(ABC, Some("B"), Some("D,A"));
        assert_eq!(result, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_missing_overrides_keep_baseline() {
        assert_eq!(resolve_modules(ABC, None, None), vec!["A", "B", "C"]);
        assert_eq!(resolve_modules(ABC, Some(""), Some(" , ,")), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let result = resolve_modules(ABC, Some("  A ,C  "), Some(" E ,  F"));
        assert_eq!(result, vec!["B", "E", "F"]);
    }

    #[test]
    fn test_disable_unknown_is_noop() {
        assert_eq!(resolve_modules(ABC, Some("Z,b"), None), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_enable_is_idempotent() {
        let once = resolve_modules(ABC, None, Some("D"));
        let twice = resolve_modules(ABC, None, Some("D,D,C"));
        assert_eq!(once, twice);
        assert_eq!(twice.iter().filter(|m| *m == "D").count(), 1);
    }

    #[test]
    fn test_enabled_keep_input_order_after_baseline() {
        let result = resolve_modules(ABC, Some("A"), Some("Z,Y,X"));
        assert_eq!(result, vec!["B", "C", "Z", "Y", "X"]);
    }

    #[test]
    fn test_disable_then_reenable_moves_to_end() {
        let result = resolve_modules(ABC, Some("A"), Some("A"));
        assert_eq!(result, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_baseline_has_no_duplicates() {
        let unique: std::collections::HashSet<_> = BASELINE_MODULES.iter().collect();
        assert_eq!(unique.len(), BASELINE_MODULES.len());
        assert_eq!(BASELINE_MODULES.last(), Some(&"NoMessageProcessor"));
    }
}
