// Per-step annotation: ingredient references, tools, methods, time,
// temperature (with the rolling oven context), classification, and grammar
// normalization. The cascades are ordered rule tables, first match wins.
use crate::extract::methods::MethodExtractor;
use crate::extract::tools::ToolExtractor;
use crate::recipe::{Ingredient, Step, StepKind, TemperatureSpec, TimeSpec};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

struct TimeRule {
    pattern: Regex,
    render: fn(&Captures) -> String,
}

static TIME_RULES: Lazy<Vec<TimeRule>> = Lazy::new(|| {
    vec![
        // Explicit durations.
        TimeRule {
            pattern: Regex::new(r"(\d+)\s*(?:minutes?|mins?)\b").unwrap(),
            render: |caps| format!("{} minutes", &caps[1]),
        },
        TimeRule {
            pattern: Regex::new(r"(\d+)\s*(?:hours?|hrs?)\b").unwrap(),
            render: |caps| format!("{} hours", &caps[1]),
        },
        // Numeric ranges.
        TimeRule {
            pattern: Regex::new(r"(\d+)\s*[-–]\s*(\d+)\s*(minutes?|hours?)").unwrap(),
            render: |caps| format!("{}-{} {}", &caps[1], &caps[2], &caps[3]),
        },
        // "until golden brown" style conditions, up to the next clause
        // boundary.
        TimeRule {
            pattern: Regex::new(r"until\s+([^,.;]+?)(?:[,.;]|$)").unwrap(),
            render: |caps| format!("until {}", caps[1].trim()),
        },
        // "for 30 minutes".
        TimeRule {
            pattern: Regex::new(r"for\s+(\d+)\s*(minutes?|hours?|mins?|hrs?)").unwrap(),
            render: |caps| format!("{} {}", &caps[1], &caps[2]),
        },
    ]
});

const OVEN_KEYWORDS: &[&str] = &["preheat", "oven", "bake", "roast", "broil"];

static OVEN_TEMP_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d+)\s*°?\s*f\b").unwrap(),
        Regex::new(r"(\d+)\s+degrees?").unwrap(),
        Regex::new(r"(?:preheat|heat)\b[^.;]*?\bto\s+(\d+)").unwrap(),
    ]
});

static INGREDIENT_TEMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s+to\s+(\d+)").unwrap());

static HEAT_LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(low|medium|high)\s+heat").unwrap());

const WARNING_KEYWORDS: &[&str] = &["careful", "don't", "avoid", "warning", "do not", "never"];
const ADVICE_KEYWORDS: &[&str] = &[
    "optional",
    "alternatively",
    "tip",
    "you can",
    "or",
    "may",
    "might",
];
const OBSERVATION_KEYWORDS: &[&str] = &["will", "should be", "may become", "it should", "they should"];

/// Forward-only oven-temperature context threaded through sequential step
/// annotation. Set when a step names an oven temperature; never cleared by
/// a step without one.
#[derive(Debug, Clone, Default)]
pub struct OvenContext {
    pub oven_temperature: Option<TemperatureSpec>,
}

pub struct StepAnnotator {
    /// (original name, lowercase name) pairs for reference matching.
    ingredient_names: Vec<(String, String)>,
}

impl StepAnnotator {
    pub fn new(ingredients: &[Ingredient]) -> Self {
        let ingredient_names = ingredients
            .iter()
            .map(|ing| (ing.name.clone(), ing.name.to_lowercase()))
            .collect();
        StepAnnotator { ingredient_names }
    }

    /// Annotate one atomic step. The caller assigns ordinals sequentially
    /// and threads the oven context through in step order.
    pub fn annotate(
        &self,
        ordinal: usize,
        raw: &str,
        tools: &ToolExtractor<'_>,
        methods: &MethodExtractor<'_>,
        context: &mut OvenContext,
    ) -> Step {
        let lower = raw.to_lowercase();
        let step = Step {
            ordinal,
            description: normalize_step_text(raw),
            ingredients: self.ingredient_references(&lower),
            tools: tools.extract_tools(raw),
            methods: methods.extract_methods(raw),
            time: extract_time(&lower),
            temperature: extract_temperature(&lower, context),
            kind: classify_step(&lower),
        };
        trace!("Annotated step {}: {:?}", ordinal, step.kind);
        step
    }

    /// Known ingredient names mentioned in the step. Single-word names
    /// match on word boundaries; multi-word names try an exact substring
    /// first, then their final word alone when it is longer than three
    /// characters. First-seen order, case-insensitive dedup.
    fn ingredient_references(&self, step_lower: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut refs = Vec::new();

        for (original, lower) in &self.ingredient_names {
            let words: Vec<&str> = lower.split_whitespace().collect();
            let mentioned = match words.len() {
                0 => false,
                1 => word_boundary_match(step_lower, words[0]),
                _ => {
                    if step_lower.contains(lower.as_str()) {
                        true
                    } else {
                        let last = words[words.len() - 1];
                        last.len() > 3 && word_boundary_match(step_lower, last)
                    }
                }
            };
            if mentioned && !seen.contains(lower) {
                seen.push(lower.clone());
                refs.push(original.clone());
            }
        }
        refs
    }
}

fn word_boundary_match(text: &str, word: &str) -> bool {
    Regex::new(&format!(r"\b{}\b", regex::escape(word)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Time extraction over the ordered rule table; first match wins.
pub fn extract_time(step_lower: &str) -> Option<TimeSpec> {
    for rule in TIME_RULES.iter() {
        if let Some(caps) = rule.pattern.captures(step_lower) {
            return Some(TimeSpec {
                duration: (rule.render)(&caps),
            });
        }
    }
    None
}

/// Temperature extraction. Oven-context steps try the Fahrenheit patterns
/// and record a hit into the rolling context; an oven step without its own
/// reading reuses the context. Other steps try the ingredient-target and
/// heat-level patterns.
pub fn extract_temperature(
    step_lower: &str,
    context: &mut OvenContext,
) -> Option<TemperatureSpec> {
    let is_oven_step = OVEN_KEYWORDS.iter().any(|k| step_lower.contains(k));

    if is_oven_step {
        for re in OVEN_TEMP_RES.iter() {
            if let Some(caps) = re.captures(step_lower) {
                let spec = TemperatureSpec {
                    value: caps[1].to_string(),
                    unit: "°F".to_string(),
                    ingredient: None,
                };
                context.oven_temperature = Some(spec.clone());
                return Some(spec);
            }
        }
        if let Some(remembered) = &context.oven_temperature {
            return Some(remembered.clone());
        }
    }

    if let Some(caps) = INGREDIENT_TEMP_RE.captures(step_lower) {
        return Some(TemperatureSpec {
            value: caps[2].to_string(),
            unit: "°F".to_string(),
            ingredient: Some(caps[1].to_string()),
        });
    }

    if let Some(caps) = HEAT_LEVEL_RE.captures(step_lower) {
        return Some(TemperatureSpec {
            value: caps[1].to_string(),
            unit: "heat".to_string(),
            ingredient: None,
        });
    }

    None
}

/// Keyword containment for classification: multi-word phrases match as
/// substrings, single words on word boundaries.
fn contains_any(step_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| {
        if k.contains(' ') {
            step_lower.contains(k)
        } else {
            word_boundary_match(step_lower, k)
        }
    })
}

/// Fixed-priority step classification; exactly one kind per step.
pub fn classify_step(step_lower: &str) -> StepKind {
    if contains_any(step_lower, WARNING_KEYWORDS) {
        return StepKind::Warning;
    }
    if contains_any(step_lower, ADVICE_KEYWORDS) {
        return StepKind::Advice;
    }
    if contains_any(step_lower, OBSERVATION_KEYWORDS)
        && (step_lower.starts_with("the ")
            || step_lower.starts_with("it ")
            || step_lower.starts_with("they "))
    {
        return StepKind::Observation;
    }
    StepKind::Actionable
}

/// Grammar normalization: capitalized opener, upcased standalone F/C,
/// merged hyphen continuations, guaranteed terminal punctuation.
pub fn normalize_step_text(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // "20 - 30" / "extra - virgin" -> "20-30" / "extra-virgin".
    static HYPHEN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\w)\s+-\s+(\w)").unwrap());
    text = HYPHEN_RE.replace_all(&text, "$1-$2").to_string();

    // Standalone temperature abbreviations.
    static DEGREE_ABBREV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([fc])\b").unwrap());
    text = DEGREE_ABBREV_RE
        .replace_all(&text, |caps: &Captures| caps[1].to_uppercase())
        .to_string();

    // Capitalize the first alphabetic character.
    if let Some(pos) = text.find(|c: char| c.is_alphabetic()) {
        let ch = text[pos..].chars().next().unwrap();
        text.replace_range(pos..pos + ch.len_utf8(), &ch.to_uppercase().to_string());
    }

    // Terminal punctuation: append after alphanumerics and closing
    // brackets, replace any other trailing character.
    match text.chars().last() {
        None => text,
        Some(last) if last.is_alphanumeric() || matches!(last, ')' | ']' | '}') => {
            text.push('.');
            text
        }
        Some('.') => text,
        Some(last) => {
            let cut = text.len() - last.len_utf8();
            text.truncate(cut);
            text.push('.');
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_explicit_duration() {
        let time = extract_time("bake for 30 minutes").unwrap();
        assert_eq!(time.duration, "30 minutes");

        let time = extract_time("simmer for 2 hours").unwrap();
        assert_eq!(time.duration, "2 hours");
    }

    #[test]
    fn test_time_until_condition() {
        let time = extract_time("cook until golden brown, turning once").unwrap();
        assert_eq!(time.duration, "until golden brown");
    }

    #[test]
    fn test_time_absent() {
        assert!(extract_time("season with salt").is_none());
    }

    #[test]
    fn test_explicit_duration_outranks_until() {
        let time = extract_time("bake for 25 minutes until set").unwrap();
        assert_eq!(time.duration, "25 minutes");
    }

    #[test]
    fn test_oven_temperature_degrees() {
        let mut context = OvenContext::default();
        let temp = extract_temperature("preheat the oven to 350 degrees f.", &mut context)
            .unwrap();
        assert_eq!(temp.value, "350");
        assert_eq!(temp.unit, "°F");
        assert!(context.oven_temperature.is_some());
    }

    #[test]
    fn test_oven_temperature_bare_to() {
        let mut context = OvenContext::default();
        let temp = extract_temperature("preheat the oven to 425.", &mut context).unwrap();
        assert_eq!(temp.value, "425");
    }

    #[test]
    fn test_context_reuse_for_later_oven_step() {
        let mut context = OvenContext::default();
        extract_temperature("preheat the oven to 350 degrees.", &mut context);

        let temp = extract_temperature("bake until golden.", &mut context).unwrap();
        assert_eq!(temp.value, "350");

        // Non-oven steps never inherit.
        assert!(extract_temperature("stir the sauce.", &mut context).is_none());
    }

    #[test]
    fn test_ingredient_target_temperature() {
        let mut context = OvenContext::default();
        let temp = extract_temperature("cook the chicken to 165", &mut context).unwrap();
        assert_eq!(temp.value, "165");
        assert_eq!(temp.ingredient.as_deref(), Some("chicken"));
    }

    #[test]
    fn test_heat_level() {
        let mut context = OvenContext::default();
        let temp = extract_temperature("cook over medium heat", &mut context).unwrap();
        assert_eq!(temp.value, "medium");
        assert_eq!(temp.unit, "heat");
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify_step("don't overmix the batter"), StepKind::Warning);
        assert_eq!(
            classify_step("you can substitute honey, or use maple syrup"),
            StepKind::Advice
        );
        assert_eq!(
            classify_step("the mixture will thicken as it cools"),
            StepKind::Observation
        );
        assert_eq!(classify_step("stir the sauce"), StepKind::Actionable);
    }

    #[test]
    fn test_advice_or_requires_word_boundary() {
        // "for" must not read as the advice keyword "or".
        assert_eq!(classify_step("bake for 20 minutes"), StepKind::Actionable);
    }

    #[test]
    fn test_observation_needs_leading_subject() {
        // Keyword without the subject prefix stays actionable.
        assert_eq!(
            classify_step("remove when it should be done"),
            StepKind::Actionable
        );
    }

    #[test]
    fn test_normalize_capitalization_and_period() {
        assert_eq!(normalize_step_text("fold in the flour"), "Fold in the flour.");
        assert_eq!(normalize_step_text("stir well,"), "Stir well.");
        assert_eq!(normalize_step_text("Bake."), "Bake.");
    }

    #[test]
    fn test_normalize_degree_abbreviation() {
        assert_eq!(
            normalize_step_text("heat to 350 degrees f"),
            "Heat to 350 degrees F."
        );
    }

    #[test]
    fn test_normalize_hyphen_continuation() {
        assert_eq!(
            normalize_step_text("bake 20 - 25 minutes"),
            "Bake 20-25 minutes."
        );
    }
}
