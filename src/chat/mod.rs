// Conversational query engine: a dialogue state machine whose only state
// is the current-step cursor over a bound recipe.
pub mod handlers;
pub mod intents;
pub mod session;

pub use intents::Intent;
pub use session::SessionStore;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::recipe::{Recipe, Step};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

pub const UNCLEAR_QUESTION: &str = "Unclear question type.";
pub const NO_SUCH_STEP: &str = "No such step exists.";
pub const NO_INGREDIENTS: &str = "No ingredients mentioned.";

/// The bound recipe plus the cursor. The cursor starts at 0 and is mutated
/// only by successful navigation; rejected navigation leaves it unchanged.
#[derive(Debug, Clone)]
pub struct ConversationState {
    recipe: Recipe,
    current_step: usize,
}

/// One turn's answer, with the cursor and step count the API contract
/// exposes alongside it.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub current_step: usize,
    pub total_steps: usize,
}

type Handler = fn(&mut QueryEngine, &str) -> Result<String>;

/// Intent-to-handler lookup table.
const HANDLERS: &[(Intent, Handler)] = &[
    (Intent::Retrieval, handlers::retrieval),
    (Intent::Navigation, handlers::navigation),
    (Intent::Parameter, handlers::parameter),
    (Intent::Procedure, handlers::procedure),
    (Intent::Clarification, handlers::clarification),
    (Intent::Quantity, handlers::quantity),
];

static WHAT_KIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"what\s+kind\s+of\s+(.+)$").unwrap());

pub struct QueryEngine {
    state: ConversationState,
    search_base_url: String,
}

impl QueryEngine {
    pub fn new(recipe: Recipe) -> Self {
        QueryEngine {
            state: ConversationState {
                recipe,
                current_step: 0,
            },
            search_base_url: "https://www.google.com/search".to_string(),
        }
    }

    pub fn with_config(recipe: Recipe, config: &ChatConfig) -> Self {
        let mut engine = QueryEngine::new(recipe);
        engine.search_base_url = config.search_base_url.clone();
        engine
    }

    pub fn recipe(&self) -> &Recipe {
        &self.state.recipe
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub(crate) fn set_current_step(&mut self, index: usize) {
        self.state.current_step = index;
    }

    pub(crate) fn current_step_record(&self) -> Option<&Step> {
        self.state.recipe.steps.get(self.state.current_step)
    }

    pub(crate) fn search_link(&self, query: &str) -> String {
        format!(
            "{}?q={}",
            self.search_base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }

    /// Answer a question, moving the cursor as a side effect of navigation.
    /// Never fails: internal faults map to the unclear-question sentinel.
    pub fn respond(&mut self, question: &str) -> Reply {
        let normalized = normalize_question(question);
        let text = match self.dispatch(&normalized) {
            Ok(text) => text,
            Err(e) => {
                warn!("Query handling failed for '{}': {}", normalized, e);
                UNCLEAR_QUESTION.to_string()
            }
        };
        Reply {
            text,
            current_step: self.state.current_step,
            total_steps: self.state.recipe.steps.len(),
        }
    }

    fn dispatch(&mut self, question: &str) -> Result<String> {
        if question.is_empty() {
            return Ok(UNCLEAR_QUESTION.to_string());
        }
        if let Some(answer) = self.shortcut(question) {
            return Ok(answer);
        }
        match intents::classify(question) {
            Some(intent) => {
                debug!("Question '{}' classified as {:?}", question, intent);
                let handler = HANDLERS
                    .iter()
                    .find(|(i, _)| *i == intent)
                    .map(|(_, h)| *h)
                    .ok_or_else(|| Error::Query(format!("No handler for intent {intent:?}")))?;
                handler(self, question)
            }
            None => {
                debug!("Question '{}' matched no intent group", question);
                Ok(UNCLEAR_QUESTION.to_string())
            }
        }
    }

    /// Fixed-phrase shortcuts answered before intent classification:
    /// current-step ingredient/tool/method lookups and "what kind of <X>".
    fn shortcut(&self, question: &str) -> Option<String> {
        if question.contains("this step") || question.contains("current step") {
            if let Some(step) = self.current_step_record() {
                if question.contains("ingredient") {
                    return Some(render_step_list(
                        "Ingredients in this step",
                        &step.ingredients,
                    ));
                }
                if question.contains("tool") {
                    return Some(render_step_list("Tools in this step", &step.tools));
                }
                if question.contains("method") {
                    return Some(render_step_list("Methods in this step", &step.methods));
                }
            }
        }

        if let Some(caps) = WHAT_KIND_RE.captures(question) {
            let target = caps[1].trim();
            if let Some(ingredient) = self.best_ingredient_match(target) {
                let mut details: Vec<String> = ingredient.descriptors.clone();
                details.extend(ingredient.preparation.iter().cloned());
                let answer = if details.is_empty() {
                    format!("No details are available for {}.", ingredient.name)
                } else {
                    format!("The {} should be {}.", ingredient.name, details.join(", "))
                };
                return Some(answer);
            }
        }

        None
    }

    fn best_ingredient_match(&self, target: &str) -> Option<&crate::recipe::Ingredient> {
        let target_tokens: Vec<String> = target
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        let mut best = None;
        let mut best_score = 0;
        for ingredient in &self.state.recipe.ingredients {
            let name = ingredient.name.to_lowercase();
            let score = name
                .split_whitespace()
                .filter(|w| target_tokens.iter().any(|t| t == w))
                .count();
            if score > best_score {
                best_score = score;
                best = Some(ingredient);
            }
        }
        best
    }
}

fn render_step_list(label: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("{label}: none.")
    } else {
        format!("{}: {}.", label, items.join(", "))
    }
}

/// Lowercase, trim, strip trailing "?" and ".", collapse whitespace.
fn normalize_question(question: &str) -> String {
    question
        .to_lowercase()
        .trim()
        .trim_end_matches('?')
        .trim_end_matches('.')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LexiconAnnotator;
    use crate::recipe::build_recipe;

    fn engine() -> QueryEngine {
        let annotator = LexiconAnnotator::new();
        let ingredients = vec![
            "2 1/2 cups of flour, sifted".to_string(),
            "3 large eggs".to_string(),
            "1 cup sugar".to_string(),
        ];
        let directions = vec![
            "Preheat the oven to 350 degrees F.".to_string(),
            "Whisk the eggs in a large bowl. Add the sugar.".to_string(),
            "Fold in the flour. Bake for 30 minutes.".to_string(),
        ];
        QueryEngine::new(build_recipe("Test Cake", &ingredients, &directions, &annotator))
    }

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize_question("  What's   Next?? "), "what's next");
        assert_eq!(normalize_question("Repeat."), "repeat");
    }

    #[test]
    fn test_unclear_question() {
        let mut engine = engine();
        let before = engine.current_step();
        let reply = engine.respond("blah blah");
        assert_eq!(reply.text, UNCLEAR_QUESTION);
        assert_eq!(reply.current_step, before);
    }

    #[test]
    fn test_current_step_shortcut() {
        let mut engine = engine();
        engine.respond("go to step 2");
        let reply = engine.respond("what ingredients are in this step?");
        assert!(reply.text.contains("eggs"), "{}", reply.text);
    }

    #[test]
    fn test_what_kind_shortcut() {
        let mut engine = engine();
        let reply = engine.respond("what kind of flour?");
        assert!(reply.text.contains("sifted"), "{}", reply.text);
    }

    #[test]
    fn test_quantity_scenario() {
        let mut engine = engine();
        let reply = engine.respond("how much flour do I need");
        assert_eq!(reply.text, "2.5 cup of flour.");
    }

    #[test]
    fn test_navigation_bounds() {
        let mut engine = engine();
        let total = engine.recipe().steps.len();
        // Walk forward past the end; the cursor must stop at the last
        // index and rejected moves must not change it.
        for _ in 0..total + 3 {
            engine.respond("next step please");
        }
        assert_eq!(engine.current_step(), total - 1);

        let reply = engine.respond("what's next?");
        assert_eq!(reply.text, NO_SUCH_STEP);
        assert_eq!(reply.current_step, total - 1);
    }

    #[test]
    fn test_retrieval_renders_all_for_recipe() {
        let mut engine = engine();
        let reply = engine.respond("show me the recipe");
        assert!(reply.text.contains("Test Cake"));
        assert!(reply.text.contains("--- Ingredients ---"));
        assert!(reply.text.contains("--- Steps ---"));
    }
}
