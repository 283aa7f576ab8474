// Static reference tables: unit aliases, unicode fractions, keyword sets,
// and the tool-usage / procedure dictionaries. Tables are embedded JSON,
// parsed once on first use.
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

static UNIT_ALIASES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("units.json")).expect("units.json is valid")
});

static UNICODE_FRACTIONS: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    serde_json::from_str(include_str!("fractions.json")).expect("fractions.json is valid")
});

#[derive(Debug, Deserialize)]
struct ToolTables {
    tool_keywords: Vec<String>,
    prep_words: Vec<String>,
    tool_verbs: Vec<String>,
}

static TOOL_TABLES: Lazy<ToolTables> = Lazy::new(|| {
    serde_json::from_str(include_str!("tools.json")).expect("tools.json is valid")
});

#[derive(Debug, Deserialize)]
struct MethodTables {
    method_keywords: Vec<String>,
}

static METHOD_TABLES: Lazy<MethodTables> = Lazy::new(|| {
    serde_json::from_str(include_str!("methods.json")).expect("methods.json is valid")
});

#[derive(Debug, Clone, Deserialize)]
pub struct ToolUsage {
    pub name: String,
    pub description: String,
    pub usage: String,
}

static TOOL_USAGE: Lazy<Vec<ToolUsage>> = Lazy::new(|| {
    serde_json::from_str(include_str!("usage.json")).expect("usage.json is valid")
});

#[derive(Debug, Clone, Deserialize)]
pub struct Procedure {
    pub phrase: String,
    pub definition: String,
}

static PROCEDURES: Lazy<Vec<Procedure>> = Lazy::new(|| {
    serde_json::from_str(include_str!("procedures.json")).expect("procedures.json is valid")
});

static PREP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    TOOL_TABLES.prep_words.iter().map(|s| s.as_str()).collect()
});

static TOOL_VERB_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    TOOL_TABLES.tool_verbs.iter().map(|s| s.as_str()).collect()
});

static METHOD_KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    METHOD_TABLES
        .method_keywords
        .iter()
        .map(|s| s.as_str())
        .collect()
});

/// Alias alternation for unit regexes, longest alias first so that e.g.
/// "cups" wins over "cup" at the same position.
static UNITS_PATTERN: Lazy<String> = Lazy::new(|| {
    let mut aliases: Vec<&str> = UNIT_ALIASES.keys().map(|s| s.as_str()).collect();
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    aliases
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|")
});

/// Every unicode vulgar-fraction character, concatenated for use in a
/// regex character class.
static FRACTION_CHARS: Lazy<String> =
    Lazy::new(|| UNICODE_FRACTIONS.keys().map(|s| s.as_str()).collect());

pub fn canonical_unit(alias: &str) -> Option<&'static str> {
    UNIT_ALIASES
        .get(&alias.to_lowercase())
        .map(|s| s.as_str())
}

pub fn units_pattern() -> &'static str {
    &UNITS_PATTERN
}

pub fn fraction_chars() -> &'static str {
    &FRACTION_CHARS
}

pub fn fraction_value(ch: &str) -> Option<f64> {
    UNICODE_FRACTIONS.get(ch).copied()
}

pub fn tool_keywords() -> &'static [String] {
    &TOOL_TABLES.tool_keywords
}

pub fn prep_words() -> &'static HashSet<&'static str> {
    &PREP_WORD_SET
}

pub fn tool_verbs() -> &'static HashSet<&'static str> {
    &TOOL_VERB_SET
}

pub fn method_keywords() -> &'static [String] {
    &METHOD_TABLES.method_keywords
}

pub fn method_keyword_set() -> &'static HashSet<&'static str> {
    &METHOD_KEYWORD_SET
}

/// Tool dictionary entries, in declaration order (ties in overlap scoring
/// resolve to the first entry).
pub fn tool_usage() -> &'static [ToolUsage] {
    &TOOL_USAGE
}

/// Procedure dictionary entries, in declaration order.
pub fn procedures() -> &'static [Procedure] {
    &PROCEDURES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_unit_lookup() {
        assert_eq!(canonical_unit("tbsp"), Some("tablespoon"));
        assert_eq!(canonical_unit("Cups"), Some("cup"));
        assert_eq!(canonical_unit("cup"), Some("cup"));
        assert_eq!(canonical_unit("furlong"), None);
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        // Canonical names are themselves aliases, so resolving twice is
        // the same as resolving once.
        for alias in ["tbsp", "cups", "oz", "lbs", "ml"] {
            let once = canonical_unit(alias).unwrap();
            assert_eq!(canonical_unit(once), Some(once));
        }
    }

    #[test]
    fn test_units_pattern_prefers_longest() {
        let idx_cups = UNITS_PATTERN.find("cups|").or_else(|| UNITS_PATTERN.find("|cups"));
        let idx_cup = UNITS_PATTERN.find("|cup|");
        assert!(idx_cups.is_some());
        assert!(idx_cup.is_some());
        assert!(idx_cups.unwrap() < idx_cup.unwrap());
    }

    #[test]
    fn test_fraction_values() {
        assert_eq!(fraction_value("½"), Some(0.5));
        assert_eq!(fraction_value("¾"), Some(0.75));
        assert_eq!(fraction_value("x"), None);
        assert!(fraction_chars().contains('⅓'));
    }

    #[test]
    fn test_dictionaries_are_nonempty() {
        assert!(tool_usage().iter().any(|t| t.name == "whisk"));
        assert!(procedures().iter().any(|p| p.phrase == "knead"));
        assert!(method_keyword_set().contains("bake"));
        assert!(tool_verbs().contains("stir"));
        assert!(prep_words().contains("in"));
    }
}
