// Direction paragraphs -> atomic, single-action step texts. Sentences come
// from the annotator; an interior "and"/"then" only splits a sentence when
// a verb sits strictly on each side of it.
use crate::annotate::{Annotator, Pos, Token};
use tracing::debug;

pub struct StepSegmenter<'a> {
    annotator: &'a dyn Annotator,
}

impl<'a> StepSegmenter<'a> {
    pub fn new(annotator: &'a dyn Annotator) -> Self {
        StepSegmenter { annotator }
    }

    /// Split each paragraph into atomic step texts, one inner list per
    /// paragraph. Empty segments are dropped.
    pub fn split(&self, paragraphs: &[String]) -> Vec<Vec<String>> {
        paragraphs
            .iter()
            .map(|paragraph| self.split_paragraph(paragraph))
            .collect()
    }

    fn split_paragraph(&self, paragraph: &str) -> Vec<String> {
        let ann = self.annotator.annotate(paragraph);
        let mut steps = Vec::new();

        for sentence in &ann.sentences {
            let tokens = ann.sentence_tokens(sentence);
            let sentence_text = ann.sentence_text(sentence).to_string();
            if sentence_text.is_empty() {
                continue;
            }

            let mut split_points = Vec::new();
            for i in 1..tokens.len().saturating_sub(1) {
                let lower = tokens[i].lower();
                if lower != "and" && lower != "then" {
                    continue;
                }
                let verb_before = tokens[..i].iter().any(|t| t.pos == Pos::Verb);
                let verb_after = tokens[i + 1..].iter().any(|t| t.pos == Pos::Verb);
                if verb_before && verb_after {
                    split_points.push(i);
                }
            }

            if split_points.is_empty() {
                steps.push(sentence_text);
                continue;
            }

            let mut parts = Vec::new();
            let mut start = 0;
            for &point in &split_points {
                let part = detokenize(&tokens[start..point]);
                if !part.is_empty() {
                    parts.push(part);
                }
                start = point + 1;
            }
            if start < tokens.len() {
                let part = detokenize(&tokens[start..]);
                if !part.is_empty() {
                    parts.push(part);
                }
            }

            if parts.len() > 1 {
                debug!(
                    "Split sentence into {} steps: '{}'",
                    parts.len(),
                    sentence_text
                );
                steps.extend(parts);
            } else {
                steps.push(sentence_text);
            }
        }

        steps
    }
}

/// Rebuild text from a token slice, without a space before closing
/// punctuation.
fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        if !out.is_empty() && !matches!(tok.text.as_str(), "," | "." | ";" | ":" | "!" | "?" | ")")
        {
            out.push(' ');
        }
        out.push_str(&tok.text);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LexiconAnnotator;

    fn split_one(paragraph: &str) -> Vec<String> {
        let annotator = LexiconAnnotator::new();
        StepSegmenter::new(&annotator).split(&[paragraph.to_string()])[0].clone()
    }

    #[test]
    fn test_sentences_become_steps() {
        let steps = split_one("Preheat the oven to 350 degrees. Grease a baking pan.");
        assert_eq!(steps.len(), 2);
        assert!(steps[0].starts_with("Preheat"));
        assert!(steps[1].starts_with("Grease"));
    }

    #[test]
    fn test_coordinated_actions_split() {
        let steps = split_one("Whisk the eggs and then fold in the flour.");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], "Whisk the eggs");
        assert_eq!(steps[1], "fold in the flour.");
    }

    #[test]
    fn test_noun_conjunction_is_not_split() {
        let steps = split_one("Season with salt and pepper.");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0], "Season with salt and pepper.");
    }

    #[test]
    fn test_coordinator_must_be_interior() {
        // A sentence-initial "then" is not a split point.
        let steps = split_one("Then simmer for 5 minutes.");
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_trailing_segment_keeps_punctuation() {
        let steps = split_one("Stir well and serve.");
        assert_eq!(steps, vec!["Stir well".to_string(), "serve.".to_string()]);
    }

    #[test]
    fn test_multiple_paragraphs() {
        let annotator = LexiconAnnotator::new();
        let segmenter = StepSegmenter::new(&annotator);
        let split = segmenter.split(&[
            "Boil the pasta.".to_string(),
            "Drain and rinse.".to_string(),
        ]);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0], vec!["Boil the pasta.".to_string()]);
        assert_eq!(
            split[1],
            vec!["Drain".to_string(), "rinse.".to_string()]
        );
    }
}
