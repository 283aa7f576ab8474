// Conversational engine tests over a fully built recipe: intents,
// navigation, cursor discipline, and the canned-answer scenarios.
use souschef::annotate::LexiconAnnotator;
use souschef::chat::{QueryEngine, SessionStore};
use souschef::recipe::build_recipe;

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Five-step recipe used across the scenarios.
fn five_step_engine() -> QueryEngine {
    let annotator = LexiconAnnotator::new();
    let ingredients = strings(&["2 1/2 cups of flour, sifted", "1 cup sugar", "3 large eggs"]);
    let directions = strings(&[
        "Preheat the oven to 350 degrees F.",
        "Whisk the eggs in a large bowl.",
        "Fold in the flour. Add the sugar.",
        "Bake for 30 minutes.",
    ]);
    let recipe = build_recipe("Butter Cake", &ingredients, &directions, &annotator);
    assert_eq!(recipe.steps.len(), 5);
    QueryEngine::new(recipe)
}

#[test]
fn test_quantity_question_with_step_context() {
    // Scenario: "how much flour do I need" -> "2.5 cup of flour."
    let mut engine = five_step_engine();
    engine.respond("go to step 3");
    let reply = engine.respond("how much flour do I need");
    assert_eq!(reply.text, "2.5 cup of flour.");
}

#[test]
fn test_vague_quantity_falls_back_to_current_step() {
    let mut engine = five_step_engine();
    engine.respond("go to step 2");
    // Step 2 references the eggs; "that" matches no ingredient name.
    let reply = engine.respond("how much of that do I need");
    assert!(reply.text.contains("eggs"), "{}", reply.text);
}

#[test]
fn test_whats_next_advances_cursor() {
    // Scenario: cursor 2 of 5, "what's next?" -> cursor 3, step 4 shown.
    let mut engine = five_step_engine();
    engine.respond("go to step 3");
    assert_eq!(engine.current_step(), 2);

    let reply = engine.respond("what's next?");
    assert_eq!(reply.current_step, 3);
    assert_eq!(reply.text, engine.recipe().steps[3].description);
}

#[test]
fn test_out_of_range_navigation_is_rejected() {
    // Scenario: "go to the tenth step" with 5 steps -> fixed message,
    // cursor unchanged.
    let mut engine = five_step_engine();
    engine.respond("go to step 3");
    assert_eq!(engine.current_step(), 2);

    let reply = engine.respond("go to the tenth step");
    assert_eq!(reply.text, "No such step exists.");
    assert_eq!(reply.current_step, 2);
    assert_eq!(engine.current_step(), 2);
}

#[test]
fn test_unrecognized_question() {
    // Scenario: no pattern matches -> "Unclear question type."
    let mut engine = five_step_engine();
    engine.respond("go to step 2");
    let reply = engine.respond("blah blah");
    assert_eq!(reply.text, "Unclear question type.");
    assert_eq!(reply.current_step, 1);
}

#[test]
fn test_navigation_word_and_digit_references_agree() {
    let mut engine = five_step_engine();

    let by_word = engine.respond("take me to the third step");
    assert_eq!(by_word.current_step, 2);

    engine.respond("go to the first step");
    let by_digit = engine.respond("go to step 3");
    assert_eq!(by_digit.current_step, 2);
}

#[test]
fn test_repeat_keeps_cursor() {
    let mut engine = five_step_engine();
    engine.respond("what's next?");
    let step_after_next = engine.current_step();

    let reply = engine.respond("repeat please");
    assert_eq!(reply.current_step, step_after_next);
    assert_eq!(reply.text, engine.recipe().steps[step_after_next].description);
}

#[test]
fn test_back_and_last_references() {
    let mut engine = five_step_engine();
    engine.respond("go to the last step");
    assert_eq!(engine.current_step(), 4);

    let reply = engine.respond("go back one step");
    assert_eq!(reply.current_step, 3);
}

#[test]
fn test_parameter_time_and_temperature() {
    let mut engine = five_step_engine();

    engine.respond("go to the first step");
    let reply = engine.respond("what temperature should the oven be?");
    assert_eq!(reply.text, "350 °F.");

    engine.respond("go to the last step");
    let reply = engine.respond("how long do I bake it?");
    assert_eq!(reply.text, "30 minutes.");
}

#[test]
fn test_parameter_substitute_is_recognized_but_unanswerable() {
    let mut engine = five_step_engine();
    let reply = engine.respond("what can I use instead of butter?");
    assert_eq!(reply.text, "Substitutes are currently unavailable.");
}

#[test]
fn test_clarification_uses_tool_dictionary() {
    let mut engine = five_step_engine();
    let reply = engine.respond("what is a whisk?");
    assert!(reply.text.contains("whisk"), "{}", reply.text);
    assert!(
        reply.text.contains("https://www.google.com/search?q="),
        "{}",
        reply.text
    );
}

#[test]
fn test_procedure_always_links_out() {
    let mut engine = five_step_engine();

    let known = engine.respond("how do I knead");
    assert!(known.text.contains("knead"), "{}", known.text);
    assert!(known.text.contains("https://"), "{}", known.text);

    let unknown = engine.respond("how do I flambe");
    assert!(unknown.text.contains("https://"), "{}", unknown.text);
}

#[test]
fn test_retrieval_of_title_and_steps() {
    let mut engine = five_step_engine();

    let title = engine.respond("what is the name of the recipe?");
    assert!(title.text.contains("Butter Cake"), "{}", title.text);

    let steps = engine.respond("show me the steps");
    assert!(steps.text.contains("1:"), "{}", steps.text);
    assert!(steps.text.contains("5:"), "{}", steps.text);
}

#[test]
fn test_intent_classification_is_stable_across_turns() {
    let mut engine = five_step_engine();
    let first = engine.respond("blah blah").text;
    engine.respond("what's next?");
    let second = engine.respond("blah blah").text;
    assert_eq!(first, second);
}

#[test]
fn test_session_store_isolation() {
    let annotator = LexiconAnnotator::new();
    let store = SessionStore::new(8);

    let make_engine = || {
        let recipe = build_recipe(
            "Loaf",
            &strings(&["1 loaf bread"]),
            &strings(&["Slice the bread. Toast it. Serve."]),
            &annotator,
        );
        QueryEngine::new(recipe)
    };

    store.insert("alice", make_engine()).unwrap();
    store.insert("bob", make_engine()).unwrap();

    store.respond("alice", "what's next").unwrap();
    store.respond("alice", "what's next").unwrap();

    let alice = store.respond("alice", "repeat").unwrap();
    let bob = store.respond("bob", "repeat").unwrap();
    assert_eq!(alice.current_step, 2);
    assert_eq!(bob.current_step, 0);
}
