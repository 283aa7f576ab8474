// Recipe data model and the build pipeline: raw ingredient lines and
// direction paragraphs in, structured records out.
pub mod loader;

use crate::annotate::Annotator;
use crate::extract::annotations::{OvenContext, StepAnnotator};
use crate::extract::ingredients::IngredientExtractor;
use crate::extract::methods::MethodExtractor;
use crate::extract::steps::StepSegmenter;
use crate::extract::tools::ToolExtractor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One parsed ingredient line. Quantity and unit are independently
/// optional: a line may have neither, either, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub original: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub descriptors: Vec<String>,
    pub preparation: Vec<String>,
}

impl Ingredient {
    /// Quantity rendered for display; whole numbers collapse to integers.
    pub fn quantity_display(&self) -> Option<String> {
        self.quantity.map(format_quantity)
    }
}

pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSpec {
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureSpec {
    pub value: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
}

/// Step classification, resolved by a fixed priority order; exactly one
/// kind per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Actionable,
    Warning,
    Advice,
    Observation,
}

/// One atomic, single-action instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// 1-based, strictly increasing and contiguous across the recipe.
    pub ordinal: usize,
    pub description: String,
    pub ingredients: Vec<String>,
    pub tools: Vec<String>,
    pub methods: Vec<String>,
    pub time: Option<TimeSpec>,
    pub temperature: Option<TemperatureSpec>,
    pub kind: StepKind,
}

/// A raw direction paragraph with its derived steps and the tool/method
/// unions across them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direction {
    pub original: String,
    pub steps: Vec<Step>,
    pub tools: Vec<String>,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<Direction>,
    /// Steps flattened across directions, renumbered 1..N.
    pub steps: Vec<Step>,
}

/// Build a structured recipe from raw text. Never fails: malformed lines
/// degrade to records with absent fields.
pub fn build_recipe(
    title: &str,
    ingredient_lines: &[String],
    direction_paragraphs: &[String],
    annotator: &dyn Annotator,
) -> Recipe {
    let ingredients = IngredientExtractor::new(annotator).parse(ingredient_lines);
    debug!("Extracted {} ingredients", ingredients.len());

    let segmenter = StepSegmenter::new(annotator);
    let tool_extractor = ToolExtractor::new(annotator);
    let method_extractor = MethodExtractor::new(annotator);
    let step_annotator = StepAnnotator::new(&ingredients);

    let segmented = segmenter.split(direction_paragraphs);

    let mut directions = Vec::with_capacity(direction_paragraphs.len());
    let mut steps = Vec::new();
    let mut context = OvenContext::default();
    let mut ordinal = 0;

    for (paragraph, raw_steps) in direction_paragraphs.iter().zip(segmented) {
        let mut direction_steps = Vec::with_capacity(raw_steps.len());
        for raw in raw_steps {
            ordinal += 1;
            let step = step_annotator.annotate(
                ordinal,
                &raw,
                &tool_extractor,
                &method_extractor,
                &mut context,
            );
            direction_steps.push(step);
        }

        let mut tools: Vec<String> = Vec::new();
        let mut methods: Vec<String> = Vec::new();
        for step in &direction_steps {
            for tool in &step.tools {
                if !tools.contains(tool) {
                    tools.push(tool.clone());
                }
            }
            for method in &step.methods {
                if !methods.contains(method) {
                    methods.push(method.clone());
                }
            }
        }

        steps.extend(direction_steps.iter().cloned());
        directions.push(Direction {
            original: paragraph.clone(),
            steps: direction_steps,
            tools,
            methods,
        });
    }

    debug!("Built recipe '{}' with {} steps", title, steps.len());

    Recipe {
        title: title.to_string(),
        ingredients,
        directions,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LexiconAnnotator;

    #[test]
    fn test_build_recipe_renumbers_steps() {
        let annotator = LexiconAnnotator::new();
        let ingredients = vec!["2 cups flour".to_string(), "1 cup sugar".to_string()];
        let directions = vec![
            "Preheat the oven to 350 degrees F. Mix the flour and sugar.".to_string(),
            "Bake for 30 minutes.".to_string(),
        ];

        let recipe = build_recipe("Test Cake", &ingredients, &directions, &annotator);

        assert_eq!(recipe.title, "Test Cake");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.directions.len(), 2);
        assert!(recipe.steps.len() >= 3);
        for (i, step) in recipe.steps.iter().enumerate() {
            assert_eq!(step.ordinal, i + 1);
        }
    }

    #[test]
    fn test_direction_aggregates_are_deduplicated() {
        let annotator = LexiconAnnotator::new();
        let directions =
            vec!["Stir the sauce in a saucepan. Stir again in the saucepan.".to_string()];
        let recipe = build_recipe("Sauce", &[], &directions, &annotator);

        let direction = &recipe.directions[0];
        let stir_count = direction.methods.iter().filter(|m| *m == "stir").count();
        assert!(stir_count <= 1);
        let pan_count = direction.tools.iter().filter(|t| t.contains("saucepan")).count();
        assert!(pan_count <= 1);
    }

    #[test]
    fn test_format_quantity_collapses_whole_numbers() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.75), "0.75");
    }
}
