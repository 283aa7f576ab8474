// Cooking-method extraction from one text unit: qualifying verbs (root,
// imperative opener, or whitelist member) contribute their lemma plus any
// particle, pulling coordinated verbs along; the result is filtered against
// the method whitelist.
use crate::annotate::{Annotation, Annotator, Dep};
use crate::vocab;
use tracing::trace;

/// Auxiliary-like verbs that never count as methods.
const AUX_STOPLIST: &[&str] = &["be", "have", "do", "get", "make"];

pub struct MethodExtractor<'a> {
    annotator: &'a dyn Annotator,
}

impl<'a> MethodExtractor<'a> {
    pub fn new(annotator: &'a dyn Annotator) -> Self {
        MethodExtractor { annotator }
    }

    /// Extract method lemmas from one sentence or step, in qualification
    /// order, deduplicated.
    pub fn extract_methods(&self, text: &str) -> Vec<String> {
        let ann = self.annotator.annotate(text);
        let mut methods: Vec<String> = Vec::new();

        for (i, tok) in ann.tokens.iter().enumerate() {
            if !tok.is_verb_like() {
                continue;
            }
            if AUX_STOPLIST.contains(&tok.lemma.as_str()) {
                continue;
            }
            let verb_norm = normalized_verb(&ann, i);

            if tok.dep == Dep::Root {
                methods.insert(0, verb_norm);
                for conj in coordinated_verbs(&ann, i) {
                    methods.push(conj);
                }
                continue;
            }

            // Imperative opener or whitelist member.
            if i == 0 || vocab::method_keyword_set().contains(tok.lemma.as_str()) {
                methods.push(verb_norm);
                for conj in coordinated_verbs(&ann, i) {
                    methods.push(conj);
                }
            }
        }

        // Fallback: a verb-like opener even when nothing else qualified.
        if methods.is_empty() {
            if let Some(first) = ann.tokens.first() {
                if first.is_verb_like() {
                    methods.push(first.lemma.clone());
                }
            }
        }

        // Order-preserving dedup, then the whitelist filter: exact entries
        // or entry-prefixed phrases ("set aside" for "set").
        let mut seen = Vec::new();
        for m in methods {
            if !seen.contains(&m) {
                seen.push(m);
            }
        }
        let filtered: Vec<String> = seen
            .into_iter()
            .filter(|m| {
                vocab::method_keywords()
                    .iter()
                    .any(|k| m == k || m.starts_with(&format!("{k} ")))
            })
            .collect();
        trace!("Methods in '{}': {:?}", text, filtered);
        filtered
    }
}

/// Lemma plus any attached particles ("set" + "aside" -> "set aside").
fn normalized_verb(ann: &Annotation, index: usize) -> String {
    let particles: Vec<String> = ann
        .children(index, Dep::Prt)
        .into_iter()
        .map(|j| ann.tokens[j].text.clone())
        .collect();
    if particles.is_empty() {
        ann.tokens[index].lemma.clone()
    } else {
        format!("{} {}", ann.tokens[index].lemma, particles.join(" "))
    }
}

/// Verb-like tokens coordinated under `head`, normalized the same way.
fn coordinated_verbs(ann: &Annotation, head: usize) -> Vec<String> {
    ann.children(head, Dep::Conj)
        .into_iter()
        .filter(|&j| ann.tokens[j].is_verb_like())
        .map(|j| normalized_verb(ann, j))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LexiconAnnotator;

    fn methods(text: &str) -> Vec<String> {
        let annotator = LexiconAnnotator::new();
        MethodExtractor::new(&annotator).extract_methods(text)
    }

    #[test]
    fn test_imperative_root_verb() {
        assert_eq!(methods("Bake for 30 minutes."), vec!["bake".to_string()]);
    }

    #[test]
    fn test_coordinated_verbs() {
        let found = methods("Cover and simmer for 10 minutes.");
        assert_eq!(found, vec!["cover".to_string(), "simmer".to_string()]);
    }

    #[test]
    fn test_particle_verb() {
        let found = methods("Set aside to cool.");
        assert!(found.contains(&"set aside".to_string()), "{found:?}");
    }

    #[test]
    fn test_auxiliaries_are_skipped() {
        let found = methods("The dough should be smooth.");
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn test_whitelist_filter() {
        // "discard" is a verb but not a whitelisted cooking method.
        let found = methods("Discard the bay leaf.");
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn test_mid_sentence_whitelist_verb() {
        let found = methods("Stir until the butter melts.");
        assert_eq!(found[0], "stir");
    }
}
