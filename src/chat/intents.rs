// Intent classification: six ordered regex groups, first group with any
// matching pattern wins. The groups are data so they can be tested and
// extended independently of the handlers.
use once_cell::sync::Lazy;
use regex::Regex;

/// The six recognized question categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Retrieval,
    Navigation,
    Parameter,
    Procedure,
    Clarification,
    Quantity,
}

struct IntentGroup {
    intent: Intent,
    patterns: Vec<Regex>,
}

fn group(intent: Intent, patterns: &[&str]) -> IntentGroup {
    IntentGroup {
        intent,
        patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
    }
}

static INTENT_GROUPS: Lazy<Vec<IntentGroup>> = Lazy::new(|| {
    vec![
        group(
            Intent::Retrieval,
            &[
                r"\b(?:show|display|list|give|tell)\s+(?:me\s+)?(?:the\s+)?(?:recipe|ingredients?|directions?|steps?|instructions?)\b",
                r"\b(?:what|which)\s+(?:are\s+)?(?:the\s+)?(?:ingredients?|steps?)\b",
                r"\brecipe\b",
                r"\bingredients?\s+list\b",
            ],
        ),
        group(
            Intent::Navigation,
            &[
                r"\b(?:go|move|jump|skip|take\s+me)\s+(?:to\s+)?(?:the\s+)?(?:next|previous|back|forward|first|last)\b",
                r"\b(?:go|move|jump|skip|take\s+me)\b.*\bstep\b",
                r"\b(?:next|previous|prior|back|first|last)\s+(?:step|one)\b",
                r"\bgo\s+back\b",
                r"\bwhat'?s?\s+next\b",
                r"\brepeat(?:\s+please|\s+that|\s+step)?\b",
                r"\bwhat\s+was\s+that(?:\s+again)?\b",
                r"\bagain\b",
                r"\bstart\s+over\b",
                r"\bstep\s+\d+\b",
            ],
        ),
        group(
            Intent::Parameter,
            &[
                r"\bhow\s+long\b",
                r"\bhow\s+much\s+time\b",
                r"\bwhen\s+is\s+it\s+done\b",
                r"\bwhat\s+can\s+i\s+use\s+instead\b",
                r"\bsubstitute\b",
                r"\breplace\b",
                r"\bhow\s+(?:hot|warm|cold)\b",
                r"\btemperature\b",
                r"\btemp\b",
            ],
        ),
        group(
            Intent::Procedure,
            &[
                r"\bhow\s+do\s+(?:i|you)\b",
                r"\bhow\s+to\b",
                r"\bwhat'?s\s+the\s+(?:way|method|process)\b",
                r"\bcan\s+you\s+(?:show|tell|explain)\s+me\s+how\b",
            ],
        ),
        group(
            Intent::Clarification,
            &[
                r"\bwhat\s+is\s+(?:a\s+|an\s+)?\w+",
                r"\bwhat\s+does\s+\w+\s+mean\b",
                r"\bwhat'?s\s+(?:a\s+|an\s+)?\w+",
                r"\bdefine\b",
                r"\bexplain\b",
                r"\bwhat\s+are\s+\w+\b",
            ],
        ),
        group(
            Intent::Quantity,
            &[
                r"\bhow\s+much\b",
                r"\bhow\s+many\b",
            ],
        ),
    ]
});

/// Classify a normalized question. First-group-wins over the ordered
/// groups; `None` is the unclear-question sentinel, not an error.
pub fn classify(question: &str) -> Option<Intent> {
    // "define" always reads as a clarification request.
    if question.contains("define") {
        return Some(Intent::Clarification);
    }
    for group in INTENT_GROUPS.iter() {
        if group.patterns.iter().any(|p| p.is_match(question)) {
            return Some(group.intent);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_patterns() {
        assert_eq!(classify("show me the ingredients"), Some(Intent::Retrieval));
        assert_eq!(classify("display the recipe"), Some(Intent::Retrieval));
        assert_eq!(classify("what are the steps"), Some(Intent::Retrieval));
    }

    #[test]
    fn test_navigation_patterns() {
        assert_eq!(classify("what's next"), Some(Intent::Navigation));
        assert_eq!(classify("go back one step"), Some(Intent::Navigation));
        assert_eq!(classify("go to the tenth step"), Some(Intent::Navigation));
        assert_eq!(classify("repeat please"), Some(Intent::Navigation));
        assert_eq!(classify("take me to step 3"), Some(Intent::Navigation));
    }

    #[test]
    fn test_parameter_patterns() {
        assert_eq!(classify("how long do i bake it"), Some(Intent::Parameter));
        assert_eq!(
            classify("what temperature should the oven be"),
            Some(Intent::Parameter)
        );
        assert_eq!(
            classify("what can i use instead of butter"),
            Some(Intent::Parameter)
        );
    }

    #[test]
    fn test_procedure_and_clarification_order() {
        assert_eq!(classify("how do i knead the dough"), Some(Intent::Procedure));
        assert_eq!(classify("what is a whisk"), Some(Intent::Clarification));
        assert_eq!(classify("define simmer"), Some(Intent::Clarification));
    }

    #[test]
    fn test_quantity_patterns() {
        assert_eq!(
            classify("how much flour do i need"),
            Some(Intent::Quantity)
        );
        assert_eq!(
            classify("how much of that do i need"),
            Some(Intent::Quantity)
        );
    }

    #[test]
    fn test_unclear_question() {
        assert_eq!(classify("blah blah"), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify("what's next"), Some(Intent::Navigation));
        }
    }
}
