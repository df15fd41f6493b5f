use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Phrasing,
    Emoji,
    Structural,
    Buzzword,
}

/// One detector that scored at least one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub name: &'static str,
    pub category: Category,
    pub count: usize,
    /// Points this detector contributed to the total score. Structural
    /// flags below their bonus cutoff report a count but contribute 0.
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub score: i32,
    /// Every detector with count > 0, in registry order.
    pub hits: Vec<Hit>,
    /// Distinct lexicon phrases found, in lexicon order.
    pub buzzwords_found: Vec<&'static str>,
}

impl AnalysisResult {
    pub fn count_for(&self, name: &str) -> usize {
        self.hits
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.count)
            .unwrap_or(0)
    }

    pub fn band(&self) -> Confidence {
        classify(self.score)
    }

    pub fn exceeds(&self, threshold: i32) -> bool {
        self.score >= threshold
    }

    /// True when not a single detector matched. Distinct from a zero
    /// score, which can also arise from sub-cutoff structural counts.
    pub fn is_clean(&self) -> bool {
        self.hits.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    #[serde(rename = "VERY LOW")]
    VeryLow,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::VeryLow => "VERY LOW",
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
            Confidence::VeryHigh => "VERY HIGH",
        };
        f.write_str(label)
    }
}

/// Host-side knobs. The engine itself holds no state; a hosting process
/// persists this wherever it likes and passes values per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub threshold: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Settings {
    pub fn decide(&self, analysis: &AnalysisResult) -> bool {
        self.enabled && analysis.exceeds(self.threshold)
    }
}

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

pub const DEFAULT_THRESHOLD: i32 = 30;

struct Weights {
    phrasing_points: i32,
    emoji_points: i32,
    buzzword_points: i32,
    band_very_high_min: i32,
    band_high_min: i32,
    band_medium_min: i32,
    band_low_min: i32,
    filler_words_per_unit: usize,
}

static W: Weights = Weights {
    phrasing_points: 10,
    emoji_points: 5,
    buzzword_points: 3,
    band_very_high_min: 100,
    band_high_min: 60,
    band_medium_min: 30,
    band_low_min: 15,
    filler_words_per_unit: 3,
};

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

static PHRASING_PATTERNS: &[(&str, &str)] = &[
    // "The gap isn't jobs. It's understanding."
    (
        "contrastive_negation",
        r"(?i)\b(?:the\s+\w+\s+)?(?:isn't|is\s+not|aren't|are\s+not)\s+(?:\w+\s*){1,5}\.\s*(?:it's|they're|it\s+is|they\s+are)\s+",
    ),
    // "Not tools. Not salary. Just clarity." Two or more negated fragments
    // resolved by just/but/only.
    (
        "staccato_negation",
        r"(?im)(?:^|\n)\s*(?:(?:not|no)\s+[\w\s]{3,30}\.\s*){2,}(?:just|but|only)\s+",
    ),
    (
        "heres_what",
        r"(?i)here'?s\s+(?:what|the\s+(?:truth|reality|problem|uncomfortable\s+truth))[:\s]",
    ),
    ("excessive_bold", r"(?:\*\*[^*]{10,80}\*\*\s*){3,}"),
    (
        "remember_this",
        r"(?i)if\s+you\s+[\w\s]{5,40},?\s+remember\s+this",
    ),
    ("what_changed", r"(?i)what\s+changed\?\s*(?:not|no)\s+"),
    (
        "this_is_not",
        r"(?i)this\s+(?:is\s+not|isn't|doesn't)\s+[\w\s]{3,30}\.\s*it(?:\s+is|'s)\s+",
    ),
    (
        "on_paper_reality",
        r"(?i)on\s+paper,?\s+[\w\s]{5,50}\.\s*but\s+in\s+reality,?\s+",
    ),
    (
        "engagement_bait",
        r#"(?i)like\s+this\s+post|comment\s+[“”"']?\w+[“”"']?|drop\s+a\s+comment|share\s+if|tag\s+someone"#,
    ),
    (
        "what_if_answer",
        r"(?i)what\s+if\s+[\w\s]{5,50}\s+(?:was|were|is)\s+the\s+answer\s+to",
    ),
    ("because_opener", r"(?im)(?:^|\n)\s*because\s+[\w\s]{10,}"),
    (
        "headline_contrast",
        r#"(?i)the\s+\w+\s+isn't\s+[“”"'][^“”"']{5,50}[“”"']\.\s*it's\s+[“”"']"#,
    ),
    ("countdown_urgency", r"(?i)\b\d+\s+(?:days?|hours?|minutes?)\s+to\s+"),
    ("less_more", r"(?i)\bless\s+[\w\s]{3,20}\.\s*more\s+[\w\s]{3,20}\."),
    ("question_one_word", r"\?\s*\n\s*[A-Z]\w{3,15}\.\s*\n"),
    ("stop_start", r"(?i)\bstop\s+[\w\s]{3,30}\.\s*start\s+"),
    (
        "audience_command",
        r"(?i)to\s+(?:aspiring|hiring|future|young|experienced)\s+[\w\s]{3,30}:\s*(?:stop|start|remember|don't|never)",
    ),
    (
        "triple_emphasis",
        r"(?:•|-|\*|\d\.)\s*[^•\-*\n]{10,80}\s*(?:•|-|\*|\d\.)\s*[^•\-*\n]{10,80}\s*(?:•|-|\*|\d\.)\s*[^•\-*\n]{10,80}",
    ),
];

static EMOJI_PATTERNS: &[(&str, &str)] = &[
    ("rocket", "🚀"),
    ("green_check", "✅"),
    ("pointing_down", "👇"),
    ("fire", "🔥"),
    ("lightbulb", "💡"),
    ("chart_up", "📈"),
    ("warning", "⚠️"),
    ("pretentious_glyphs", "🪶|🕰️|🕊️|🏛️|📜|🗺️"),
];

// (name, pattern, bonus cutoff, bonus). The bonus lands only when the
// occurrence count is strictly greater than the cutoff.
static STRUCTURAL_FLAGS: &[(&str, &str, usize, i32)] = &[
    (
        "single_sentence_paragraphs",
        r"(?m)(?:^|\n)\s*[A-Z][^.\n]{10,100}\.\s*(?:\n\s*\n|\n\s*$)",
        5,
        15,
    ),
    ("excessive_breaks", r"\n\s*\n\s*\n", 3, 10),
    ("em_dash_abuse", r"\u{2014}", 4, 8),
    ("caps_emphasis", r"\b[A-Z]{3,}\b", 2, 5),
];

static BUZZWORDS: &[&str] = &[
    "game-changer",
    "game changer",
    "shift",
    "uncomfortable truth",
    "here's the thing",
    "let that sink in",
    "read that again",
    "the reality is",
    "the truth is",
    "servant leadership",
    "thought leadership",
    "paradigm shift",
    "disruptor",
    "innovator",
    "visionary",
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

enum Matcher {
    Pattern(Regex),
    // Case-insensitive presence check; count is capped at 1.
    Substring(&'static str),
}

pub struct Detector {
    name: &'static str,
    category: Category,
    matcher: Matcher,
    weight: i32,
    step: Option<StepBonus>,
}

struct StepBonus {
    cutoff: usize,
    bonus: i32,
}

impl Detector {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Count non-overlapping occurrences in `text`. Total over any input;
    /// returns 0 when nothing matches.
    pub fn count(&self, text: &str) -> usize {
        match &self.matcher {
            Matcher::Pattern(re) => re.find_iter(text).count(),
            Matcher::Substring(needle) => {
                if text.to_lowercase().contains(needle) {
                    1
                } else {
                    0
                }
            }
        }
    }

    fn contribution(&self, count: usize) -> i32 {
        match &self.step {
            Some(step) => {
                if count > step.cutoff {
                    step.bonus
                } else {
                    0
                }
            }
            None => self.weight * count as i32,
        }
    }
}

static REGISTRY: Lazy<Vec<Detector>> = Lazy::new(|| {
    let mut detectors = Vec::new();
    for &(name, pattern) in PHRASING_PATTERNS {
        detectors.push(Detector {
            name,
            category: Category::Phrasing,
            matcher: Matcher::Pattern(Regex::new(pattern).unwrap()),
            weight: W.phrasing_points,
            step: None,
        });
    }
    for &(name, pattern) in EMOJI_PATTERNS {
        detectors.push(Detector {
            name,
            category: Category::Emoji,
            matcher: Matcher::Pattern(Regex::new(pattern).unwrap()),
            weight: W.emoji_points,
            step: None,
        });
    }
    for &(name, pattern, cutoff, bonus) in STRUCTURAL_FLAGS {
        detectors.push(Detector {
            name,
            category: Category::Structural,
            matcher: Matcher::Pattern(Regex::new(pattern).unwrap()),
            weight: 0,
            step: Some(StepBonus { cutoff, bonus }),
        });
    }
    for &phrase in BUZZWORDS {
        detectors.push(Detector {
            name: phrase,
            category: Category::Buzzword,
            matcher: Matcher::Substring(phrase),
            weight: W.buzzword_points,
            step: None,
        });
    }
    detectors
});

/// All detectors in registration order.
pub fn detectors() -> &'static [Detector] {
    &REGISTRY
}

pub fn detectors_in(category: Category) -> impl Iterator<Item = &'static Detector> {
    detectors().iter().filter(move |d| d.category == category)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Run every detector against `text` and aggregate the weighted hits.
/// Pure and total: any string in, a result out, no state kept between calls.
pub fn analyze(text: &str) -> AnalysisResult {
    let mut hits = Vec::new();
    let mut buzzwords_found = Vec::new();
    let mut score = 0i32;

    // Whitespace-only input reports nothing, not even sub-cutoff
    // structural counts.
    if text.trim().is_empty() {
        return AnalysisResult {
            score,
            hits,
            buzzwords_found,
        };
    }

    for detector in detectors() {
        let count = detector.count(text);
        if count == 0 {
            continue;
        }
        let points = detector.contribution(count);
        score += points;
        if detector.category == Category::Buzzword {
            buzzwords_found.push(detector.name);
        }
        hits.push(Hit {
            name: detector.name,
            category: detector.category,
            count,
            points,
        });
    }

    AnalysisResult {
        score,
        hits,
        buzzwords_found,
    }
}

pub fn classify(score: i32) -> Confidence {
    if score >= W.band_very_high_min {
        Confidence::VeryHigh
    } else if score >= W.band_high_min {
        Confidence::High
    } else if score >= W.band_medium_min {
        Confidence::Medium
    } else if score >= W.band_low_min {
        Confidence::Low
    } else {
        Confidence::VeryLow
    }
}

pub fn decide(text: &str, threshold: i32) -> bool {
    analyze(text).score >= threshold
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

pub const FILLER_TOKEN: &str = "herp derp";

static FILLER_VARIANTS: &[&str] = &[
    "herp derp",
    "derp herp",
    "herp de derp",
    "derpy derp derp",
    "herp a derp",
];

/// Replace matched phrasing patterns with the filler token when the text
/// scores at or above `threshold`; otherwise return the input unchanged.
///
/// Replacement runs detector-by-detector in registry order over the text
/// as modified so far, so a span already reduced to filler is not
/// reconsidered by later detectors. Emoji, structural, and buzzword hits
/// are left in place.
pub fn redact(text: &str, threshold: i32) -> String {
    let analysis = analyze(text);
    if analysis.score < threshold {
        return text.to_string();
    }

    let filler = format!("{FILLER_TOKEN}. ");
    let mut modified = text.to_string();
    for detector in detectors_in(Category::Phrasing) {
        if analysis.count_for(detector.name) == 0 {
            continue;
        }
        if let Matcher::Pattern(re) = &detector.matcher {
            modified = re.replace_all(&modified, filler.as_str()).into_owned();
        }
    }
    modified
}

/// Build filler prose sized to roughly `word_count` words: one unit per
/// three words (rounding up), cycling through the variant palette.
pub fn filler_of(word_count: usize) -> String {
    let units = word_count.div_ceil(W.filler_words_per_unit);
    let mut parts = Vec::with_capacity(units);
    for i in 0..units {
        parts.push(FILLER_VARIANTS[i % FILLER_VARIANTS.len()]);
    }
    let mut out = parts.join(". ");
    out.push('.');
    out
}
