// Ingredient line parsing: name, quantity, canonical unit, descriptors,
// and preparation. Each stage strips a matched prefix and hands the
// remainder on; a stage that doesn't match is skipped, never an error.
use crate::annotate::{Annotator, Dep};
use crate::recipe::Ingredient;
use crate::vocab;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Leading filler words that would otherwise hide a quantity or unit.
const FILLER: &str = r"plus|and|with|about|approximately|approx\.?|around|roughly|nearly|another|extra|more";

/// Vacuous adjectives that never count as descriptors.
const DESCRIPTOR_STOPLIST: &[&str] = &["other", "such", "additional", "more", "another"];

static FILLER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^\s*(?:{FILLER})\b[\s,]*")).unwrap());

static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\([^)]*\)\s*").unwrap());

static PAREN_ANYWHERE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

static UNIT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^\s*(?:{})\b\.?\s*", vocab::units_pattern())).unwrap()
});

static UNIT_ANYWHERE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", vocab::units_pattern())).unwrap()
});

static OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*of\b\s*").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One quantity form: a stripping pattern plus a value builder. Evaluated
/// in declaration order, first match wins.
struct QuantityRule {
    pattern: Regex,
    value: fn(&Captures) -> Option<f64>,
}

static QUANTITY_RULES: Lazy<Vec<QuantityRule>> = Lazy::new(|| {
    let fracs = regex::escape(vocab::fraction_chars());
    vec![
        // Numeric range: the value is the lower bound.
        QuantityRule {
            pattern: Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)\s*")
                .unwrap(),
            value: |caps| caps[1].parse().ok(),
        },
        // Optionally-prefixed unicode vulgar fraction ("1½", "1 ½").
        QuantityRule {
            pattern: Regex::new(&format!(r"^\s*(?:(\d+)\s*)?([{fracs}])\s*")).unwrap(),
            value: |caps| {
                let whole: f64 = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0.0);
                vocab::fraction_value(&caps[2]).map(|frac| whole + frac)
            },
        },
        // Optionally-prefixed ASCII fraction ("1 1/2", "3/4").
        QuantityRule {
            pattern: Regex::new(r"^\s*(?:(\d+)\s+)?(\d+)\s*/\s*(\d+)\s*").unwrap(),
            value: |caps| {
                let whole: f64 = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0.0);
                let num: f64 = caps[2].parse().ok()?;
                let den: f64 = caps[3].parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                Some(whole + num / den)
            },
        },
        // Decimal.
        QuantityRule {
            pattern: Regex::new(r"^\s*(\d+\.\d+)\s*").unwrap(),
            value: |caps| caps[1].parse().ok(),
        },
        // Integer.
        QuantityRule {
            pattern: Regex::new(r"^\s*(\d+)\s*").unwrap(),
            value: |caps| caps[1].parse().ok(),
        },
    ]
});

pub struct IngredientExtractor<'a> {
    annotator: &'a dyn Annotator,
}

impl<'a> IngredientExtractor<'a> {
    pub fn new(annotator: &'a dyn Annotator) -> Self {
        IngredientExtractor { annotator }
    }

    /// Parse raw ingredient lines. Never fails; fields the line doesn't
    /// carry stay absent or empty.
    pub fn parse(&self, lines: &[String]) -> Vec<Ingredient> {
        lines.iter().map(|line| self.parse_line(line)).collect()
    }

    fn parse_line(&self, line: &str) -> Ingredient {
        let mut rest = line;

        // 1) Leading filler words, at most three.
        for _ in 0..3 {
            match FILLER_RE.find(rest) {
                Some(m) => rest = &rest[m.end()..],
                None => break,
            }
        }

        // 2) One leading quantity token; first rule that matches wins.
        let mut quantity = None;
        for rule in QUANTITY_RULES.iter() {
            if let Some(caps) = rule.pattern.captures(rest) {
                quantity = (rule.value)(&caps);
                rest = &rest[caps.get(0).unwrap().end()..];
                break;
            }
        }

        // 3) Up to three leading parenthetical blocks.
        for _ in 0..3 {
            match PAREN_RE.find(rest) {
                Some(m) => rest = &rest[m.end()..],
                None => break,
            }
        }

        // 4) One leading unit alias, then an optional "of".
        if let Some(m) = UNIT_PREFIX_RE.find(rest) {
            rest = &rest[m.end()..];
        }
        if let Some(m) = OF_RE.find(rest) {
            rest = &rest[m.end()..];
        }

        // 5) Truncate at the first comma; the tail is handled as a
        //    preparation candidate below.
        let pre_comma = match rest.find(',') {
            Some(idx) => &rest[..idx],
            None => rest,
        };

        // 6) Collapse whitespace; fall back to the raw line when empty.
        let mut name = WHITESPACE_RE.replace_all(pre_comma, " ").trim().to_string();
        if name.is_empty() {
            name = line.trim().to_string();
        }

        let unit = self.canonical_unit(line);
        let descriptors = self.extract_descriptors(line);
        let preparation = self.extract_preparation(line);

        debug!(
            "Parsed ingredient line '{}' -> name '{}', quantity {:?}, unit {:?}",
            line, name, quantity, unit
        );

        Ingredient {
            original: line.to_string(),
            name,
            quantity,
            unit,
            descriptors,
            preparation,
        }
    }

    /// Whole-line unit scan, independent of the name pipeline: parenthetical
    /// content is removed first; if nothing matches, the original line gets
    /// a second chance (sizes like "(28 ounce)" live in parentheses).
    fn canonical_unit(&self, line: &str) -> Option<String> {
        let scrubbed = PAREN_ANYWHERE_RE.replace_all(line, " ");
        let alias = UNIT_ANYWHERE_RE
            .captures(&scrubbed)
            .or_else(|| UNIT_ANYWHERE_RE.captures(line))
            .map(|caps| caps[1].to_string())?;
        vocab::canonical_unit(&alias).map(|u| u.to_string())
    }

    /// Adjectival modifiers of the head noun: the rightmost noun in the
    /// pre-comma segment anchors the search; modifiers attached to it, or
    /// to a compound-noun chain feeding it, qualify.
    fn extract_descriptors(&self, line: &str) -> Vec<String> {
        let pre_comma = match line.find(',') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let ann = self.annotator.annotate(pre_comma);

        let head = match ann
            .tokens
            .iter()
            .rposition(|t| t.is_noun_like())
        {
            Some(head) => head,
            None => return Vec::new(),
        };

        // The head plus every compound noun that chains into it.
        let mut anchors = vec![head];
        let mut changed = true;
        while changed {
            changed = false;
            for (i, tok) in ann.tokens.iter().enumerate() {
                if tok.dep == Dep::Compound && anchors.contains(&tok.head) && !anchors.contains(&i)
                {
                    anchors.push(i);
                    changed = true;
                }
            }
        }

        let mut descriptors: Vec<String> = Vec::new();
        for (i, tok) in ann.tokens.iter().enumerate() {
            if i == head || tok.dep != Dep::Amod || !anchors.contains(&tok.head) {
                continue;
            }
            let text = tok.lower();
            if DESCRIPTOR_STOPLIST.contains(&text.as_str()) {
                continue;
            }
            if !descriptors.contains(&text) {
                descriptors.push(text);
            }
        }
        descriptors
    }

    /// The substring after the final comma is a preparation phrase only if
    /// the annotator finds at least one verb or participle in it.
    fn extract_preparation(&self, line: &str) -> Vec<String> {
        let tail = match line.rfind(',') {
            Some(idx) => line[idx + 1..].trim(),
            None => return Vec::new(),
        };
        if tail.is_empty() {
            return Vec::new();
        }
        let ann = self.annotator.annotate(tail);
        if ann.tokens.iter().any(|t| t.is_verb_like()) {
            vec![tail.to_string()]
        } else {
            Vec::new()
        }
    }
}
