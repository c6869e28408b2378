//! Small lexicon-based sentiment scorer.
//!
//! Each known word contributes a valence in roughly `-4.0..=4.0`; a negation
//! in the three preceding tokens flips and dampens it. The sum is squashed
//! into `-1.0..=1.0` with `s / sqrt(s^2 + 15)`.

const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const NEGATION_WINDOW: usize = 3;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
];

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("bullish", 2.0),
    ("best", 3.2),
    ("excellent", 2.7),
    ("excited", 1.9),
    ("exciting", 2.2),
    ("fair", 1.3),
    ("good", 1.9),
    ("great", 3.1),
    ("growth", 1.6),
    ("happy", 2.7),
    ("innovative", 1.9),
    ("legit", 1.8),
    ("love", 3.2),
    ("nice", 1.8),
    ("profit", 1.5),
    ("promising", 1.7),
    ("reliable", 1.8),
    ("safe", 1.9),
    ("secure", 1.4),
    ("solid", 1.6),
    ("strong", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("support", 1.7),
    ("thanks", 1.9),
    ("transparent", 1.6),
    ("trust", 2.3),
    ("win", 2.8),
    ("wow", 2.8),
    // negative
    ("angry", -2.3),
    ("bad", -2.5),
    ("bearish", -2.0),
    ("broken", -2.1),
    ("crash", -1.7),
    ("dead", -3.3),
    ("disappointed", -1.9),
    ("dump", -1.6),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fake", -2.1),
    ("fraud", -2.8),
    ("hack", -1.6),
    ("hacked", -2.0),
    ("hate", -2.7),
    ("lost", -1.3),
    ("loss", -1.3),
    ("poor", -2.1),
    ("risk", -1.1),
    ("risky", -1.4),
    ("rug", -2.5),
    ("scam", -2.9),
    ("scammer", -3.0),
    ("stolen", -2.6),
    ("terrible", -2.5),
    ("ugly", -2.3),
    ("warning", -1.4),
    ("worst", -3.1),
    ("worthless", -1.9),
    ("wrong", -2.1),
];

fn valence(word: &str) -> Option<f64> {
    LEXICON.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Compound sentiment in `-1.0..=1.0`; `0.0` when no lexicon word is present.
pub fn compound(text: &str) -> f64 {
    let words = tokens(text);
    let mut sum = 0.0;
    for (i, word) in words.iter().enumerate() {
        let Some(mut v) = valence(word) else {
            continue;
        };
        let start = i.saturating_sub(NEGATION_WINDOW);
        if words[start..i].iter().any(|w| is_negation(w)) {
            v *= NEGATION_SCALAR;
        }
        sum += v;
    }
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Human label used in reports.
pub fn label(score: f64) -> &'static str {
    if score >= 0.05 {
        "positive"
    } else if score <= -0.05 {
        "negative"
    } else {
        "neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero() {
        assert_eq!(compound("The validator set rotates every epoch."), 0.0);
        assert_eq!(compound(""), 0.0);
    }

    #[test]
    fn polarity_follows_lexicon() {
        assert!(compound("Great team, amazing progress!") > 0.5);
        assert!(compound("This is a scam, worst project, total fraud") < -0.5);
    }

    #[test]
    fn negation_flips_sign() {
        assert!(compound("good") > 0.0);
        assert!(compound("not good") < 0.0);
        assert!(compound("this isn't safe") < 0.0);
    }

    #[test]
    fn stays_in_range() {
        let many = "great ".repeat(200);
        let s = compound(&many);
        assert!(s <= 1.0 && s > 0.99);
    }

    #[test]
    fn labels() {
        assert_eq!(label(0.6), "positive");
        assert_eq!(label(0.0), "neutral");
        assert_eq!(label(-0.3), "negative");
    }
}
