// Intent handlers. Each takes the engine and the normalized question and
// returns the answer text; unresolvable anchors surface as fixed sentinel
// strings, never as errors.
use crate::chat::{QueryEngine, NO_INGREDIENTS, NO_SUCH_STEP};
use crate::error::{Error, Result};
use crate::recipe::{format_quantity, Ingredient};
use crate::vocab;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

const PREV_KEYWORDS: &[&str] = &["back", "prior", "before", "prev"];
const CURRENT_KEYWORDS: &[&str] = &["repeat", "again", "current"];
const NEXT_KEYWORDS: &[&str] = &["next", "after"];

const ORDINAL_WORDS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth", "eleventh", "twelfth", "thirteenth", "fourteenth", "fifteenth", "sixteenth",
    "seventeenth", "eighteenth", "nineteenth", "twentieth",
];
const CARDINAL_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// Parameter buckets in declaration order; ties in occurrence counts
/// resolve to the earlier bucket.
const PARAMETER_BUCKETS: &[(&str, &[&str])] = &[
    ("time", &["long", "time", "when"]),
    ("substitute", &["instead", "substitute", "replace", "swap"]),
    (
        "temperature",
        &["temperature", "temp", "hot", "heat", "cold", "degrees"],
    ),
];

static LEADING_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^what\s+is\s+(?:a\s+|an\s+)?",
        r"^what\s+does\s+",
        r"^what\s+are\s+",
        r"^who\s+is\s+",
        r"^how\s+do\s+you\s+",
        r"^what's\s+(?:a\s+|an\s+)?",
        r"^define\s+",
        r"^explain\s+",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TRAILING_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\s+mean$", r"\s+used\s+for$", r"\s+do$"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Requests to show the recipe or one of its parts. "recipe" renders all
/// three sections; otherwise the first matching category wins.
pub fn retrieval(engine: &mut QueryEngine, question: &str) -> Result<String> {
    if question.contains("recipe") {
        return Ok([
            render_title(engine),
            render_ingredients(engine),
            render_steps(engine),
        ]
        .join("\n\n"));
    }
    if question.contains("name") || question.contains("title") {
        return Ok(render_title(engine));
    }
    if question.contains("ingredient") {
        return Ok(render_ingredients(engine));
    }
    if question.contains("step") || question.contains("direction") || question.contains("instruction")
    {
        return Ok(render_steps(engine));
    }
    Ok(render_title(engine))
}

fn render_title(engine: &QueryEngine) -> String {
    format!("--- {} ---", engine.recipe().title)
}

fn render_ingredients(engine: &QueryEngine) -> String {
    let mut out = String::from("--- Ingredients ---");
    for ingredient in &engine.recipe().ingredients {
        out.push_str(&format!("\n - {}", ingredient.original));
    }
    out
}

fn render_steps(engine: &QueryEngine) -> String {
    let mut out = String::from("--- Steps ---");
    for step in &engine.recipe().steps {
        out.push_str(&format!("\n{}: {}", step.ordinal, step.description));
    }
    out
}

/// Moving between, repeating, or revisiting steps. An out-of-range target
/// is rejected with the fixed message and the cursor is left unchanged.
pub fn navigation(engine: &mut QueryEngine, question: &str) -> Result<String> {
    let current = engine.current_step() as i64;

    let target: Option<i64> = if PREV_KEYWORDS.iter().any(|k| question.contains(k)) {
        Some(current - 1)
    } else if NEXT_KEYWORDS.iter().any(|k| question.contains(k)) {
        Some(current + 1)
    } else if CURRENT_KEYWORDS.iter().any(|k| question.contains(k)) {
        Some(current)
    } else {
        resolve_step_reference(engine, question)
    };

    let total = engine.recipe().steps.len() as i64;
    match target {
        Some(index) if (0..total).contains(&index) => {
            engine.set_current_step(index as usize);
            debug!("Navigated to step index {}", index);
            Ok(engine.recipe().steps[index as usize].description.clone())
        }
        _ => Ok(NO_SUCH_STEP.to_string()),
    }
}

/// Resolve an explicit step reference: "last", ordinal/cardinal words one
/// through twenty, else the most frequent digit sequence (first-seen wins
/// ties). A digit value N names step N, i.e. 0-based index N-1.
fn resolve_step_reference(engine: &QueryEngine, question: &str) -> Option<i64> {
    if question.contains("last") {
        return Some(engine.recipe().steps.len() as i64 - 1);
    }

    for i in 0..20 {
        if question.contains(ORDINAL_WORDS[i]) || question.contains(CARDINAL_WORDS[i]) {
            return Some(i as i64);
        }
    }

    let mut counts: Vec<(i64, usize)> = Vec::new();
    for m in DIGITS_RE.find_iter(question) {
        let value: i64 = m.as_str().parse().ok()?;
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    let best = counts.iter().max_by_key(|(_, count)| *count)?.0;
    Some(best - 1)
}

/// Time, substitute, and temperature questions about the current step.
/// The bucket with the highest keyword-occurrence count wins.
pub fn parameter(engine: &mut QueryEngine, question: &str) -> Result<String> {
    let counts: Vec<usize> = PARAMETER_BUCKETS
        .iter()
        .map(|(_, keywords)| {
            keywords
                .iter()
                .map(|k| question.matches(k).count())
                .sum()
        })
        .collect();

    let (winner, &count) = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .ok_or_else(|| Error::Query("No parameter buckets defined".to_string()))?;
    if count == 0 {
        return Ok("Please elaborate on your question.".to_string());
    }

    let step = engine.current_step_record();
    let answer = match PARAMETER_BUCKETS[winner].0 {
        "time" => match step.and_then(|s| s.time.as_ref()) {
            Some(time) => format!("{}.", time.duration),
            None => "No time available for this step.".to_string(),
        },
        "substitute" => "Substitutes are currently unavailable.".to_string(),
        _ => match step.and_then(|s| s.temperature.as_ref()) {
            Some(temp) => format!("{} {}.", temp.value, temp.unit),
            None => "No temperature available for this step.".to_string(),
        },
    };
    Ok(answer)
}

/// Definitions of tools and terms, answered from the tool-usage dictionary
/// with a search-link fallback.
pub fn clarification(engine: &mut QueryEngine, question: &str) -> Result<String> {
    let keyword = extract_keyword(question);
    if keyword.is_empty() {
        return Ok("Please clarify what you would like to know.".to_string());
    }

    let keyword_tokens = token_set(&keyword);
    let mut best: Option<&vocab::ToolUsage> = None;
    let mut best_score = 0;
    for entry in vocab::tool_usage() {
        let score = overlap(&token_set(&entry.name), &keyword_tokens);
        // Strictly greater, so ties resolve to the first-seen entry.
        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }

    match best {
        Some(entry) => {
            let link = engine.search_link(&format!("how to use a {}", entry.name));
            Ok(format!(
                "{} {} You can learn more here: {}",
                entry.description, entry.usage, link
            ))
        }
        None => Ok("Please clarify what you would like to know.".to_string()),
    }
}

/// "How do I ..." questions: the final token keys into the procedure
/// dictionary; the search link is appended whether or not an entry matched.
pub fn procedure(engine: &mut QueryEngine, question: &str) -> Result<String> {
    let keyword = question
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string();
    let keyword_tokens = token_set(&keyword);

    let mut best: Option<&vocab::Procedure> = None;
    let mut best_score = 0;
    for entry in vocab::procedures() {
        let score = overlap(&token_set(&entry.phrase), &keyword_tokens);
        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }

    let link = engine.search_link(&format!("how to {keyword}"));
    let answer = match best {
        Some(entry) => format!(
            "To {} means {}. You can also check: {}",
            entry.phrase, entry.definition, link
        ),
        None => format!("You can check: {link}"),
    };
    Ok(answer)
}

/// Ingredient amounts: a named ingredient when one matches the question,
/// else the first ingredient referenced by the current step.
pub fn quantity(engine: &mut QueryEngine, question: &str) -> Result<String> {
    let keyword = extract_keyword(question);
    let keyword_tokens = token_set(&keyword);

    let mut best: Option<&Ingredient> = None;
    let mut best_score = 0;
    for ingredient in &engine.recipe().ingredients {
        let score = overlap(&token_set(&ingredient.name), &keyword_tokens);
        if score > best_score {
            best_score = score;
            best = Some(ingredient);
        }
    }

    let resolved = match best {
        Some(ingredient) => Some(ingredient),
        None => engine
            .current_step_record()
            .and_then(|step| step.ingredients.first())
            .and_then(|name| {
                engine
                    .recipe()
                    .ingredients
                    .iter()
                    .find(|ing| ing.name == *name)
            }),
    };

    let ingredient = match resolved {
        Some(ingredient) => ingredient,
        None => return Ok(NO_INGREDIENTS.to_string()),
    };

    match ingredient.quantity {
        None => Ok(format!(
            "No quantity is available for the ingredient {}.",
            ingredient.name
        )),
        Some(value) => {
            let amount = format_quantity(value);
            match &ingredient.unit {
                Some(unit) => Ok(format!("{} {} of {}.", amount, unit, ingredient.name)),
                None => Ok(format!("{} {}.", amount, ingredient.name)),
            }
        }
    }
}

/// Strip interrogative prefixes and trailing filler from a question to get
/// its keyword phrase.
pub fn extract_keyword(question: &str) -> String {
    let mut keyword = question.to_string();
    for pattern in LEADING_PHRASES.iter() {
        keyword = pattern.replace(&keyword, "").to_string();
    }
    for pattern in TRAILING_PHRASES.iter() {
        keyword = pattern.replace(&keyword, "").to_string();
    }
    keyword.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    a.intersection(b).count()
}
