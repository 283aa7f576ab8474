// Plain-text recipe files: a title line, an "Ingredients" section with one
// ingredient per line, and a "Directions" section of blank-line-separated
// paragraphs. This is the local input path standing in for a scraper.
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
}

static INGREDIENTS_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#*\s*ingredients:?\s*$").unwrap());

static DIRECTIONS_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#*\s*(?:directions|instructions|steps):?\s*$").unwrap());

// A numbered bullet needs trailing whitespace so "2.5 cups" keeps its
// decimal quantity.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)]\s)\s*").unwrap());

pub fn load_recipe_file(path: &Path) -> Result<LoadedRecipe> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(Error::RecipeParse(format!(
            "Recipe file {} is empty",
            path.display()
        )));
    }
    let recipe = parse_recipe_text(&content);
    if recipe.ingredients.is_empty() && recipe.directions.is_empty() {
        warn!("Recipe file {:?} has no ingredients or directions", path);
    }
    Ok(recipe)
}

/// Parse recipe text into its raw parts. Never fails: missing sections
/// degrade to empty lists and a missing title falls back to a default.
pub fn parse_recipe_text(content: &str) -> LoadedRecipe {
    #[derive(PartialEq)]
    enum Section {
        Preamble,
        Ingredients,
        Directions,
    }

    let mut title = None;
    let mut ingredients = Vec::new();
    let mut directions = Vec::new();
    let mut paragraph = String::new();
    let mut section = Section::Preamble;

    for line in content.lines() {
        let trimmed = line.trim();

        if INGREDIENTS_HEADER_RE.is_match(trimmed) {
            section = Section::Ingredients;
            continue;
        }
        if DIRECTIONS_HEADER_RE.is_match(trimmed) {
            section = Section::Directions;
            continue;
        }

        match section {
            Section::Preamble => {
                if title.is_none() && !trimmed.is_empty() {
                    title = Some(trimmed.trim_start_matches('#').trim().to_string());
                }
            }
            Section::Ingredients => {
                if !trimmed.is_empty() {
                    let line = BULLET_RE.replace(trimmed, "").trim().to_string();
                    if !line.is_empty() {
                        ingredients.push(line);
                    }
                }
            }
            Section::Directions => {
                if trimmed.is_empty() {
                    if !paragraph.is_empty() {
                        directions.push(std::mem::take(&mut paragraph));
                    }
                } else {
                    if !paragraph.is_empty() {
                        paragraph.push(' ');
                    }
                    paragraph.push_str(trimmed);
                }
            }
        }
    }
    if !paragraph.is_empty() {
        directions.push(paragraph);
    }

    let title = title.unwrap_or_else(|| "Untitled Recipe".to_string());
    debug!(
        "Loaded recipe '{}': {} ingredient lines, {} direction paragraphs",
        title,
        ingredients.len(),
        directions.len()
    );

    LoadedRecipe {
        title,
        ingredients,
        directions,
    }
}
