// Linguistic annotator boundary. The extraction pipeline consumes only this
// contract: tokens with lemma, coarse/fine part-of-speech, dependency label
// and governor index, plus noun-chunk spans and sentence boundaries. Any
// conforming tagger/parser can stand behind the trait; `LexiconAnnotator`
// is the built-in deterministic implementation.
pub mod lexicon;

pub use lexicon::LexiconAnnotator;

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Conj,
    Det,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Verb,
}

/// Dependency label. `Dep::Unattached` is the default for tokens the
/// shallow attachment pass leaves alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dep {
    Amod,
    Attr,
    Aux,
    Compound,
    Conj,
    Dative,
    Det,
    Dobj,
    Nsubj,
    Pcomp,
    Pobj,
    Prep,
    Prt,
    Punct,
    Root,
    Unattached,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    /// Fine-grained tag, Penn-style ("VB", "VBG", "VBN", "NN", "JJ", ...).
    pub tag: String,
    pub dep: Dep,
    /// Index of the governing token; the root governs itself.
    pub head: usize,
    /// Byte offsets into the annotated text.
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_verb_like(&self) -> bool {
        self.pos == Pos::Verb || self.tag.starts_with("VB")
    }

    pub fn is_noun_like(&self) -> bool {
        matches!(self.pos, Pos::Noun | Pos::Propn)
    }

    /// Numeric-looking token: a digit sequence, a vulgar fraction, or a
    /// number word.
    pub fn like_num(&self) -> bool {
        self.pos == Pos::Num
    }
}

/// A noun chunk: a half-open token range and the index of its root noun.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NounChunk {
    pub start: usize,
    pub end: usize,
    pub root: usize,
}

/// A sentence as a half-open token range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub tokens: Vec<Token>,
    pub chunks: Vec<NounChunk>,
    pub sentences: Vec<Sentence>,
}

impl Annotation {
    pub fn sentence_tokens(&self, sentence: &Sentence) -> &[Token] {
        &self.tokens[sentence.start..sentence.end]
    }

    /// The original text slice covered by a sentence.
    pub fn sentence_text(&self, sentence: &Sentence) -> &str {
        if sentence.start >= sentence.end {
            return "";
        }
        let from = self.tokens[sentence.start].start;
        let to = self.tokens[sentence.end - 1].end;
        self.text[from..to].trim()
    }

    pub fn chunk_tokens(&self, chunk: &NounChunk) -> &[Token] {
        &self.tokens[chunk.start..chunk.end]
    }

    /// Tokens directly governed by `head` and to its left, carrying one of
    /// the given labels.
    pub fn left_children(&self, head: usize, labels: &[Dep]) -> Vec<usize> {
        (0..head)
            .filter(|&i| self.tokens[i].head == head && labels.contains(&self.tokens[i].dep))
            .collect()
    }

    /// Tokens directly governed by `head` carrying the given label.
    pub fn children(&self, head: usize, label: Dep) -> Vec<usize> {
        (0..self.tokens.len())
            .filter(|&i| i != head && self.tokens[i].head == head && self.tokens[i].dep == label)
            .collect()
    }
}

/// The external annotator capability. Implementations must be deterministic:
/// identical text yields an identical annotation.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Annotation;
}
