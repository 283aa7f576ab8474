// Built-in annotator: a deterministic, lexicon-driven tagger with shallow
// dependency attachment, tuned for imperative recipe prose. It trades
// linguistic generality for predictability; the extraction heuristics only
// need the attributes the `Annotator` contract names.
use super::{Annotation, Annotator, Dep, NounChunk, Pos, Sentence, Token};
use crate::vocab;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "no",
    "all", "both", "another",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "into", "onto", "from", "over", "under",
    "about", "above", "across", "after", "against", "along", "among", "around", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "during", "inside", "near",
    "off", "outside", "through", "throughout", "toward", "towards", "until", "upon", "within",
    "without",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "them", "him", "her", "me", "us", "everything",
    "something", "anything",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "so", "yet"];

const ADVERBS: &[&str] = &[
    "then", "now", "again", "very", "too", "also", "well", "just", "once", "twice", "often",
    "almost", "about", "not", "never", "always", "together", "aside", "halfway", "meanwhile",
];

/// Tokens that attach to a preceding verb as its particle. Deliberately
/// excludes "in"/"on"/"over", which double as prepositions in recipe text.
const PARTICLES: &[&str] = &["up", "down", "off", "away", "aside", "together", "out"];

const MODALS: &[&str] = &[
    "will", "would", "can", "could", "may", "might", "must", "shall", "should",
];

const AUXILIARIES: &[&str] = &[
    "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had", "having",
    "do", "does", "did",
];

const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty", "dozen", "half", "quarter", "third",
];

/// Verbs beyond the method/tool whitelists: state-change and handling verbs
/// that recipe prose uses but that never count as cooking methods.
const EXTRA_VERBS: &[&str] = &[
    "let", "allow", "continue", "begin", "start", "stop", "keep", "repeat", "discard",
    "reserve", "divide", "shape", "form", "sift", "dust", "coat", "dip", "soak", "squeeze",
    "stuff", "wrap", "unwrap", "thaw", "taste", "adjust", "check", "watch", "return", "lower",
    "raise", "increase", "work", "layer", "scatter", "seal", "flatten", "smooth", "split",
    "halve", "core", "seed", "hull", "score", "pound", "thicken", "bubble", "rise", "brown",
    "double", "firm", "soften", "darken", "shimmer", "foam", "wilt", "stand", "sit", "need",
    "want", "look", "become", "stick", "burn", "overcook", "curdle", "separate", "spring",
    "use", "tent", "rotate", "swirl", "tilt", "shake", "knock", "loosen", "release", "prick",
    "pierce", "vent", "crimp", "trim", "pull", "tear", "fluff", "skim",
];

const ADJECTIVES: &[&str] = &[
    "large", "small", "medium", "big", "hot", "cold", "warm", "cool", "fresh", "dry", "wet",
    "soft", "firm", "ripe", "raw", "golden", "crisp", "crispy", "tender", "smooth", "fluffy",
    "thick", "thin", "fine", "coarse", "low", "high", "light", "dark", "sweet", "sour",
    "bitter", "salty", "savory", "spicy", "mild", "extra", "virgin", "whole", "ground",
    "boneless", "skinless", "unsalted", "salted", "sweetened", "unsweetened", "heavy", "sharp",
    "clean", "even", "remaining", "leftover", "optional", "nonstick", "lukewarm", "ready",
    "done", "wide", "deep", "shallow", "stiff", "lumpy", "smaller", "larger", "other", "such",
    "additional", "more", "new", "gentle", "single", "double", "stale", "overripe", "juicy",
    "dried", "frozen", "canned", "red", "green", "yellow", "white", "black", "brown",
];

static IRREGULAR_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("am", "be"),
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("does", "do"),
        ("did", "do"),
        ("done", "do"),
        ("got", "get"),
        ("gotten", "get"),
        ("made", "make"),
        ("left", "leave"),
        ("brought", "bring"),
        ("took", "take"),
        ("taken", "take"),
        ("gave", "give"),
        ("given", "give"),
        ("broke", "break"),
        ("broken", "break"),
        ("froze", "freeze"),
        ("frozen", "freeze"),
        ("risen", "rise"),
        ("rose", "rise"),
        ("stood", "stand"),
        ("loaves", "loaf"),
        ("leaves", "leaf"),
        ("knives", "knife"),
        ("halves", "half"),
        ("tomatoes", "tomato"),
        ("potatoes", "potato"),
    ])
});

static VERB_LEXICON: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut verbs: HashSet<String> = HashSet::new();
    verbs.extend(vocab::method_keywords().iter().cloned());
    verbs.extend(vocab::tool_verbs().iter().map(|v| v.to_string()));
    verbs.extend(EXTRA_VERBS.iter().map(|v| v.to_string()));
    verbs
});

static ADJ_LEXICON: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ADJECTIVES.iter().copied().collect());

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+(?:['\-][A-Za-z]+)*|\d+(?:\.\d+)?|\S").unwrap()
});

fn in_list(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

fn is_verb_lemma(word: &str) -> bool {
    VERB_LEXICON.contains(word)
}

/// Resolve an inflected form to a verb-lexicon lemma, if one fits.
/// Handles -ing/-ed/-es/-s with consonant doubling ("stirring" -> "stir")
/// and dropped final e ("baking" -> "bake").
fn verb_stem(word: &str) -> Option<(String, &'static str)> {
    let restore = |stem: &str| -> Option<String> {
        if is_verb_lemma(stem) {
            return Some(stem.to_string());
        }
        if stem.len() >= 2 {
            let bytes = stem.as_bytes();
            if bytes[stem.len() - 1] == bytes[stem.len() - 2] {
                let shortened = &stem[..stem.len() - 1];
                if is_verb_lemma(shortened) {
                    return Some(shortened.to_string());
                }
            }
        }
        let lengthened = format!("{stem}e");
        if is_verb_lemma(&lengthened) {
            return Some(lengthened);
        }
        None
    };

    if let Some(stem) = word.strip_suffix("ing") {
        if let Some(lemma) = restore(stem) {
            return Some((lemma, "VBG"));
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if let Some(lemma) = restore(stem) {
            return Some((lemma, "VBN"));
        }
        // "fried" -> "fry"
        if let Some(base) = word.strip_suffix("ied") {
            let lemma = format!("{base}y");
            if is_verb_lemma(&lemma) {
                return Some((lemma, "VBN"));
            }
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if is_verb_lemma(stem) {
            return Some((stem.to_string(), "VBZ"));
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if is_verb_lemma(stem) {
            return Some((stem.to_string(), "VBZ"));
        }
    }
    None
}

fn noun_lemma(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_LEMMAS.get(word) {
        return lemma.to_string();
    }
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["ches", "shes", "sses", "xes", "oes"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
            return word[..word.len() - 1].to_string();
        }
    }
    word.to_string()
}

/// Deterministic lexicon-driven implementation of the annotator contract.
#[derive(Debug, Default, Clone)]
pub struct LexiconAnnotator;

impl LexiconAnnotator {
    pub fn new() -> Self {
        LexiconAnnotator
    }

    fn tag_token(&self, text: &str) -> (Pos, String, String) {
        let lower = text.to_lowercase();

        if !text.chars().any(|c| c.is_alphanumeric()) {
            return (Pos::Punct, ".".to_string(), lower);
        }
        if text.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return (Pos::Num, "CD".to_string(), lower);
        }
        if vocab::fraction_value(text).is_some() {
            return (Pos::Num, "CD".to_string(), lower);
        }
        if in_list(NUMBER_WORDS, &lower) {
            return (Pos::Num, "CD".to_string(), lower);
        }
        if lower == "to" {
            return (Pos::Part, "TO".to_string(), lower);
        }
        if in_list(PARTICLES, &lower) {
            return (Pos::Adv, "RP".to_string(), lower);
        }
        if in_list(DETERMINERS, &lower) {
            return (Pos::Det, "DT".to_string(), lower);
        }
        if in_list(PRONOUNS, &lower) {
            return (Pos::Pron, "PRP".to_string(), lower);
        }
        if in_list(CONJUNCTIONS, &lower) {
            return (Pos::Conj, "CC".to_string(), lower);
        }
        if in_list(MODALS, &lower) {
            return (Pos::Verb, "MD".to_string(), lower);
        }
        if in_list(AUXILIARIES, &lower) {
            let lemma = IRREGULAR_LEMMAS.get(lower.as_str()).unwrap_or(&"");
            let lemma = if lemma.is_empty() { lower.clone() } else { lemma.to_string() };
            return (Pos::Verb, "VB".to_string(), lemma);
        }
        if in_list(PREPOSITIONS, &lower) {
            return (Pos::Adp, "IN".to_string(), lower);
        }
        if in_list(ADVERBS, &lower) || (lower.ends_with("ly") && lower.len() > 4) {
            return (Pos::Adv, "RB".to_string(), lower);
        }
        if let Some(irregular) = IRREGULAR_LEMMAS.get(lower.as_str()) {
            if is_verb_lemma(irregular) {
                return (Pos::Verb, "VBD".to_string(), irregular.to_string());
            }
        }
        if is_verb_lemma(&lower) {
            return (Pos::Verb, "VB".to_string(), lower);
        }
        if let Some((lemma, tag)) = verb_stem(&lower) {
            return (Pos::Verb, tag.to_string(), lemma);
        }
        if ADJ_LEXICON.contains(lower.as_str())
            || lower.contains('-')
            || ["ous", "ful", "ish", "ive", "able", "ible", "less"]
                .iter()
                .any(|s| lower.ends_with(s) && lower.len() > s.len() + 2)
        {
            return (Pos::Adj, "JJ".to_string(), lower);
        }
        if text.chars().next().is_some_and(|c| c.is_uppercase()) {
            return (Pos::Propn, "NNP".to_string(), lower);
        }
        let lemma = noun_lemma(&lower);
        let tag = if lemma == lower { "NN" } else { "NNS" };
        (Pos::Noun, tag.to_string(), lemma)
    }

    fn split_sentences(&self, tokens: &[Token]) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for (i, tok) in tokens.iter().enumerate() {
            if tok.pos == Pos::Punct && matches!(tok.text.as_str(), "." | "!" | "?") {
                sentences.push(Sentence { start, end: i + 1 });
                start = i + 1;
            }
        }
        if start < tokens.len() {
            sentences.push(Sentence {
                start,
                end: tokens.len(),
            });
        }
        sentences
    }

    /// Context fixups that need sentence boundaries: imperative openers,
    /// determiner-governed nouns, "to"-infinitives.
    fn adjust_in_context(&self, tokens: &mut [Token], sentences: &[Sentence]) {
        for sentence in sentences {
            let range = sentence.start..sentence.end;

            // Imperative opener: a sentence-initial lexicon verb is a verb
            // even if it doubles as a noun ("Heat", "Mix").
            if let Some(first) = range
                .clone()
                .find(|&i| tokens[i].text.chars().any(|c| c.is_alphabetic()))
            {
                let lower = tokens[first].lower();
                if is_verb_lemma(&lower) {
                    tokens[first].pos = Pos::Verb;
                    tokens[first].tag = "VB".to_string();
                    tokens[first].lemma = lower;
                }
            }

            for i in range.clone() {
                // A "verb" right after a determiner, adjective, or number is
                // a noun in disguise ("a whisk", "the mix").
                if tokens[i].pos == Pos::Verb
                    && tokens[i].tag == "VB"
                    && i > sentence.start
                    && matches!(tokens[i - 1].pos, Pos::Det | Pos::Adj | Pos::Num)
                {
                    tokens[i].pos = Pos::Noun;
                    tokens[i].tag = "NN".to_string();
                    tokens[i].lemma = tokens[i].lower();
                }
                // Infinitive after "to".
                if i > sentence.start
                    && tokens[i - 1].tag == "TO"
                    && tokens[i].pos != Pos::Verb
                    && is_verb_lemma(&tokens[i].lower())
                {
                    tokens[i].pos = Pos::Verb;
                    tokens[i].tag = "VB".to_string();
                    tokens[i].lemma = tokens[i].lower();
                }
            }
        }
    }

    fn find_chunks(&self, tokens: &[Token]) -> Vec<NounChunk> {
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let in_run = |t: &Token| {
                matches!(t.pos, Pos::Det | Pos::Adj | Pos::Num | Pos::Noun | Pos::Propn)
                    || (t.pos == Pos::Verb && matches!(t.tag.as_str(), "VBN" | "VBG"))
            };
            if !in_run(&tokens[i]) {
                i += 1;
                continue;
            }
            let start = i;
            let mut end = i;
            while end < tokens.len() && in_run(&tokens[end]) {
                // A determiner can only open a chunk.
                if end > start && tokens[end].pos == Pos::Det {
                    break;
                }
                end += 1;
            }
            // Root is the last noun in the run; trim anything after it.
            let root = (start..end).rev().find(|&j| tokens[j].is_noun_like());
            match root {
                Some(root) => {
                    chunks.push(NounChunk {
                        start,
                        end: root + 1,
                        root,
                    });
                    i = end;
                }
                None => {
                    i = end.max(i + 1);
                }
            }
        }
        chunks
    }

    fn attach(&self, tokens: &mut [Token], chunks: &[NounChunk], sentences: &[Sentence]) {
        for sentence in sentences {
            let range = sentence.start..sentence.end;

            let is_aux = |t: &Token| {
                t.tag == "MD" || in_list(AUXILIARIES, t.lower().as_str())
            };

            // Root: first non-auxiliary verb, else first token.
            let root = range
                .clone()
                .find(|&i| tokens[i].pos == Pos::Verb && !is_aux(&tokens[i]))
                .unwrap_or(sentence.start);
            tokens[root].dep = Dep::Root;
            tokens[root].head = root;

            // Non-root verbs: conjoined if a coordinator sits between them
            // and the previous verb; auxiliaries lean on the next verb.
            let mut prev_verb = root;
            for i in range.clone() {
                if i == root || tokens[i].pos != Pos::Verb {
                    continue;
                }
                if is_aux(&tokens[i]) {
                    tokens[i].dep = Dep::Aux;
                    tokens[i].head = root;
                    continue;
                }
                if i < root {
                    prev_verb = i;
                    continue;
                }
                let coordinated = (prev_verb + 1..i).any(|j| {
                    tokens[j].pos == Pos::Conj || tokens[j].lower() == "then"
                });
                if coordinated {
                    tokens[i].dep = Dep::Conj;
                    tokens[i].head = prev_verb;
                }
                prev_verb = i;
            }

            // Particles.
            for i in range.clone() {
                if i > sentence.start
                    && in_list(PARTICLES, tokens[i].lower().as_str())
                    && tokens[i - 1].pos == Pos::Verb
                {
                    tokens[i].dep = Dep::Prt;
                    tokens[i].head = i - 1;
                }
            }

            // Prepositions attach to the nearest preceding verb.
            for i in range.clone() {
                if tokens[i].pos == Pos::Adp && tokens[i].dep == Dep::Unattached {
                    tokens[i].dep = Dep::Prep;
                    let head = (sentence.start..i)
                        .rev()
                        .find(|&j| tokens[j].pos == Pos::Verb)
                        .unwrap_or(root);
                    tokens[i].head = head;
                }
            }

            for chunk in chunks
                .iter()
                .filter(|c| c.start >= sentence.start && c.end <= sentence.end)
            {
                let root_tok = chunk.root;

                // Internal structure: determiners and modifiers hang off the
                // next noun in the chunk; non-final nouns form a compound
                // chain into the root.
                for i in chunk.start..chunk.end {
                    if i == root_tok {
                        continue;
                    }
                    let next_noun = (i + 1..chunk.end)
                        .find(|&j| tokens[j].is_noun_like())
                        .unwrap_or(root_tok);
                    match tokens[i].pos {
                        Pos::Det => {
                            tokens[i].dep = Dep::Det;
                            tokens[i].head = root_tok;
                        }
                        Pos::Adj => {
                            tokens[i].dep = Dep::Amod;
                            tokens[i].head = next_noun;
                        }
                        Pos::Verb => {
                            tokens[i].dep = Dep::Amod;
                            tokens[i].head = next_noun;
                        }
                        Pos::Noun | Pos::Propn => {
                            tokens[i].dep = Dep::Compound;
                            tokens[i].head = next_noun;
                        }
                        _ => {}
                    }
                }

                // Chunk root attachment: object of a preceding preposition,
                // complement/object of a preceding verb, else subject of a
                // following root verb.
                if tokens[root_tok].dep != Dep::Unattached {
                    continue;
                }
                let mut before = chunk.start;
                while before > sentence.start && tokens[before - 1].pos == Pos::Adv {
                    before -= 1;
                }
                if before > sentence.start {
                    let prev = before - 1;
                    if tokens[prev].pos == Pos::Adp || tokens[prev].tag == "TO" {
                        tokens[root_tok].dep = Dep::Pobj;
                        tokens[root_tok].head = prev;
                        continue;
                    }
                    if tokens[prev].pos == Pos::Verb {
                        tokens[root_tok].dep = if tokens[prev].lemma == "be" {
                            Dep::Attr
                        } else {
                            Dep::Dobj
                        };
                        tokens[root_tok].head = prev;
                        continue;
                    }
                }
                if root_tok < root && tokens[root].pos == Pos::Verb {
                    tokens[root_tok].dep = Dep::Nsubj;
                    tokens[root_tok].head = root;
                }
            }

            // Punctuation.
            for i in range {
                if tokens[i].pos == Pos::Punct {
                    tokens[i].dep = Dep::Punct;
                    tokens[i].head = root;
                }
            }
        }
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Annotation {
        let mut tokens: Vec<Token> = WORD_RE
            .find_iter(text)
            .map(|m| {
                let (pos, tag, lemma) = self.tag_token(m.as_str());
                Token {
                    text: m.as_str().to_string(),
                    lemma,
                    pos,
                    tag,
                    dep: Dep::Unattached,
                    head: 0,
                    start: m.start(),
                    end: m.end(),
                }
            })
            .collect();
        for i in 0..tokens.len() {
            tokens[i].head = i;
        }

        let sentences = self.split_sentences(&tokens);
        self.adjust_in_context(&mut tokens, &sentences);
        let chunks = self.find_chunks(&tokens);
        self.attach(&mut tokens, &chunks, &sentences);

        Annotation {
            text: text.to_string(),
            tokens,
            chunks,
            sentences,
        }
    }
}
