// Kitchen-equipment extraction from one text unit. Pure function of the
// text: noun chunks are walked and trimmed, candidates are admitted by
// syntactic role or keyword, then article-stripped, filtered, and sorted.
use crate::annotate::{Annotator, Dep, Pos};
use crate::vocab;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

static ARTICLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:a|an|the)\s+").unwrap());
static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Whole-word containment: does `text` contain `keyword` as a word (or a
/// space-separated phrase)?
fn contains_keyword(text: &str) -> bool {
    let padded = format!(" {text} ");
    vocab::tool_keywords()
        .iter()
        .any(|k| padded.contains(&format!(" {k} ")))
}

pub struct ToolExtractor<'a> {
    annotator: &'a dyn Annotator,
}

impl<'a> ToolExtractor<'a> {
    pub fn new(annotator: &'a dyn Annotator) -> Self {
        ToolExtractor { annotator }
    }

    /// Extract tool names from one sentence or step. Deterministic; the
    /// result is deduplicated and sorted lexicographically.
    pub fn extract_tools(&self, text: &str) -> Vec<String> {
        let ann = self.annotator.annotate(text);
        let mut candidates: HashSet<String> = HashSet::new();

        // Noun chunks, trimmed at the first preposition-like token.
        for chunk in &ann.chunks {
            let mut kept = Vec::new();
            for i in chunk.start..chunk.end {
                let tok = &ann.tokens[i];
                let lower = tok.lower();
                if tok.pos == Pos::Adp
                    || tok.dep == Dep::Prep
                    || tok.like_num()
                    || vocab::prep_words().contains(lower.as_str())
                    || lower == "to"
                {
                    break;
                }
                kept.push(lower);
            }
            if kept.is_empty() {
                continue;
            }
            let chunk_text = PAREN_RE.replace_all(&kept.join(" "), "").trim().to_string();

            let root_tok = &ann.tokens[chunk.root];
            let object_like = matches!(
                root_tok.dep,
                Dep::Pobj | Dep::Dobj | Dep::Pcomp | Dep::Attr | Dep::Dative
            );
            let after_preposition =
                chunk.start > 0 && ann.tokens[chunk.start - 1].pos == Pos::Adp;

            if object_like || after_preposition {
                let governed_by_tool_verb =
                    vocab::tool_verbs().contains(ann.tokens[root_tok.head].lemma.as_str());
                let after_prep_word = chunk.start > 0
                    && vocab::prep_words().contains(ann.tokens[chunk.start - 1].lemma.as_str());

                if governed_by_tool_verb || after_prep_word || contains_keyword(&chunk_text) {
                    candidates.insert(chunk_text);
                }
            }
        }

        // Single tokens that lexically match a tool keyword, promoted with
        // their left determiner/adjective/compound modifiers.
        for (i, tok) in ann.tokens.iter().enumerate() {
            let keyword_match = vocab::tool_keywords().iter().any(|k| {
                k.as_str() == tok.lemma || k.as_str() == tok.lower()
            });
            if !keyword_match || !tok.is_noun_like() {
                continue;
            }
            let object_role = matches!(
                tok.dep,
                Dep::Dobj | Dep::Pobj | Dep::Attr | Dep::Root | Dep::Conj
            );
            let tool_verb_governor =
                vocab::tool_verbs().contains(ann.tokens[tok.head].lemma.as_str());
            if !object_role && !tool_verb_governor {
                continue;
            }
            let mut span: Vec<String> = ann
                .left_children(i, &[Dep::Det, Dep::Amod, Dep::Compound])
                .into_iter()
                .map(|j| ann.tokens[j].lower())
                .collect();
            span.push(tok.lower());
            let span_text = PAREN_RE.replace_all(&span.join(" "), "").trim().to_string();
            candidates.insert(span_text);
        }

        let mut tools: Vec<String> = candidates
            .into_iter()
            .map(|c| ARTICLE_RE.replace(&c, "").trim().to_string())
            .filter(|c| contains_keyword(c))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tools.sort();
        trace!("Tools in '{}': {:?}", text, tools);
        tools
    }
}
