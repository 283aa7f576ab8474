use crate::annotate::LexiconAnnotator;
use crate::chat::QueryEngine;
use crate::config::Settings;
use crate::recipe::{build_recipe, loader, Recipe};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

fn load_and_build(file: &Path) -> Result<Recipe> {
    let loaded = loader::load_recipe_file(file)
        .with_context(|| format!("Failed to load recipe file {}", file.display()))?;
    let annotator = LexiconAnnotator::new();
    Ok(build_recipe(
        &loaded.title,
        &loaded.ingredients,
        &loaded.directions,
        &annotator,
    ))
}

pub fn parse(file: &Path, json: bool) -> Result<()> {
    let recipe = load_and_build(file)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&recipe).context("Failed to serialize recipe")?
        );
        return Ok(());
    }

    println!("--- {} ---\n", recipe.title);

    println!("Ingredients:");
    for ing in &recipe.ingredients {
        let quantity = ing
            .quantity_display()
            .map(|q| match &ing.unit {
                Some(unit) => format!("{q} {unit}"),
                None => q,
            })
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<24} {}", ing.name, quantity);
        if !ing.descriptors.is_empty() {
            println!("      descriptors: {}", ing.descriptors.join(", "));
        }
        if !ing.preparation.is_empty() {
            println!("      preparation: {}", ing.preparation.join(", "));
        }
    }

    println!("\nSteps:");
    for step in &recipe.steps {
        println!("  {}: {}", step.ordinal, step.description);
        if !step.ingredients.is_empty() {
            println!("      ingredients: {}", step.ingredients.join(", "));
        }
        if !step.tools.is_empty() {
            println!("      tools: {}", step.tools.join(", "));
        }
        if !step.methods.is_empty() {
            println!("      methods: {}", step.methods.join(", "));
        }
        if let Some(time) = &step.time {
            println!("      time: {}", time.duration);
        }
        if let Some(temp) = &step.temperature {
            println!("      temperature: {} {}", temp.value, temp.unit);
        }
    }

    Ok(())
}

pub fn ask(settings: &Settings, file: &Path, questions: &[String]) -> Result<()> {
    let recipe = load_and_build(file)?;
    let mut engine = QueryEngine::with_config(recipe, &settings.chat);

    for question in questions {
        let reply = engine.respond(question);
        println!("> {question}");
        println!("{}\n", reply.text);
    }

    Ok(())
}

pub fn chat(settings: &Settings, file: &Path) -> Result<()> {
    let recipe = load_and_build(file)?;
    let total_steps = recipe.steps.len();
    let title = recipe.title.clone();
    let mut engine = QueryEngine::with_config(recipe, &settings.chat);

    info!("Starting chat session for '{}'", title);

    println!("========================================");
    println!("{title}");
    println!("{total_steps} steps - ask me anything about this recipe.");
    println!("Type 'quit' to leave the session.");
    println!("========================================\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("? ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "quit" | "exit" | "bye") {
            break;
        }

        let reply = engine.respond(question);
        println!(
            "{}\n[step {}/{}]\n",
            reply.text,
            reply.current_step + 1,
            reply.total_steps
        );
    }

    println!("Happy cooking!");
    Ok(())
}
