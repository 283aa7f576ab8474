// Integration tests for ingredient extraction against the full annotator.
use souschef::annotate::LexiconAnnotator;
use souschef::extract::IngredientExtractor;

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mixed_ingredient_list() {
    let annotator = LexiconAnnotator::new();
    let extractor = IngredientExtractor::new(&annotator);

    let parsed = extractor.parse(&lines(&[
        "2 1/2 cups of flour, sifted",
        "1 (28 ounce) can crushed tomatoes",
        "3 large eggs",
        "salt and freshly ground black pepper",
        "½ cup unsalted butter, melted",
        "about 2-3 tablespoons extra-virgin olive oil",
    ]));

    assert_eq!(parsed.len(), 6);

    // Scenario: "2 1/2 cups of flour, sifted"
    assert_eq!(parsed[0].name, "flour");
    assert_eq!(parsed[0].quantity, Some(2.5));
    assert_eq!(parsed[0].unit.as_deref(), Some("cup"));
    assert_eq!(parsed[0].preparation, vec!["sifted".to_string()]);

    assert_eq!(parsed[1].name, "crushed tomatoes");
    assert_eq!(parsed[1].quantity, Some(1.0));

    assert_eq!(parsed[2].name, "large eggs");
    assert_eq!(parsed[2].quantity, Some(3.0));
    assert_eq!(parsed[2].unit, None);

    // No quantity and no unit is a valid line.
    assert_eq!(parsed[3].quantity, None);
    assert_eq!(parsed[3].unit, None);

    assert_eq!(parsed[4].quantity, Some(0.5));
    assert_eq!(parsed[4].unit.as_deref(), Some("cup"));
    assert_eq!(parsed[4].preparation, vec!["melted".to_string()]);

    // Filler word, then a range: the value is the lower bound.
    assert_eq!(parsed[5].quantity, Some(2.0));
    assert_eq!(parsed[5].unit.as_deref(), Some("tablespoon"));
    assert_eq!(parsed[5].name, "extra-virgin olive oil");
}

#[test]
fn test_quantity_parsing_is_idempotent() {
    let annotator = LexiconAnnotator::new();
    let extractor = IngredientExtractor::new(&annotator);

    let originals = lines(&[
        "2 1/2 cups of flour, sifted",
        "1½ teaspoons vanilla extract",
        "2-3 tablespoons olive oil",
        "1 (28 ounce) can crushed tomatoes",
        "3 large eggs",
        "1 cup sugar",
    ]);
    let parsed = extractor.parse(&originals);

    let names: Vec<String> = parsed.iter().map(|i| i.name.clone()).collect();
    let reparsed = extractor.parse(&names);
    for (first, second) in parsed.iter().zip(&reparsed) {
        assert_eq!(
            second.quantity, None,
            "name '{}' still parses a quantity",
            first.name
        );
    }
}

#[test]
fn test_unit_canonicalization_round_trip() {
    let annotator = LexiconAnnotator::new();
    let extractor = IngredientExtractor::new(&annotator);

    // Canonicalizing an alias twice yields the same canonical form as once.
    for (alias, canonical) in [
        ("2 tbsp butter", "tablespoon"),
        ("1 tsp salt", "teaspoon"),
        ("8 oz cream cheese", "ounce"),
        ("2 lbs potatoes", "pound"),
    ] {
        let first = extractor.parse(&lines(&[alias]))[0].clone();
        assert_eq!(first.unit.as_deref(), Some(canonical));

        let again = extractor.parse(&lines(&[&format!("1 {canonical} x")]))[0].clone();
        assert_eq!(again.unit.as_deref(), Some(canonical));
    }
}

#[test]
fn test_malformed_lines_never_fail() {
    let annotator = LexiconAnnotator::new();
    let extractor = IngredientExtractor::new(&annotator);

    let parsed = extractor.parse(&lines(&["", "   ", ",,,", "((()))", "1/0 cup impossible"]));
    assert_eq!(parsed.len(), 5);
    // Empty-ish lines fall back to the trimmed original.
    assert_eq!(parsed[0].name, "");
    // Division by zero in a fraction yields no quantity.
    assert_eq!(parsed[4].quantity, None);
}
