//! Five-factor personality vector (Value Object)

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Scores strictly above this render the high phrase.
pub const HIGH_TRAIT_THRESHOLD: u8 = 50;

/// Upper bound of a trait score.
pub const MAX_TRAIT_SCORE: u8 = 100;

/// One of the five personality traits, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    /// All traits in the order they are stored and rendered.
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
        }
    }

    /// Capitalized label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }

    pub fn high_phrase(&self) -> &'static str {
        match self {
            Trait::Openness => "embraces new experience and ideas",
            Trait::Conscientiousness => "organized and dependable",
            Trait::Extraversion => "outgoing and energetic",
            Trait::Agreeableness => "friendly and cooperative",
            Trait::Neuroticism => "prone to emotional swings",
        }
    }

    pub fn low_phrase(&self) -> &'static str {
        match self {
            Trait::Openness => "favors tradition and practicality",
            Trait::Conscientiousness => "easygoing and flexible",
            Trait::Extraversion => "reserved and quiet",
            Trait::Agreeableness => "blunt and sometimes confrontational",
            Trait::Neuroticism => "emotionally stable and calm",
        }
    }

    /// Phrase describing `score` for this trait.
    pub fn phrase(&self, score: u8) -> &'static str {
        if score > HIGH_TRAIT_THRESHOLD {
            self.high_phrase()
        } else {
            self.low_phrase()
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated personality: five scores, each in `0..=100`.
///
/// Persisted as an object keyed by trait name. Out-of-range or negative
/// scores are rejected on construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPersonality", into = "RawPersonality")]
pub struct Personality {
    scores: [u8; 5],
}

impl Personality {
    pub fn new(
        openness: i64,
        conscientiousness: i64,
        extraversion: i64,
        agreeableness: i64,
        neuroticism: i64,
    ) -> Result<Self, DomainError> {
        let raw = [
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        ];
        let mut scores = [0u8; 5];
        for (t, value) in Trait::ALL.iter().zip(raw) {
            scores[t.index()] = validate_score(*t, value)?;
        }
        Ok(Self { scores })
    }

    pub fn score(&self, t: Trait) -> u8 {
        self.scores[t.index()]
    }

    /// Traits with their scores, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, u8)> + '_ {
        Trait::ALL.iter().map(|t| (*t, self.score(*t)))
    }
}

fn validate_score(t: Trait, value: i64) -> Result<u8, DomainError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_TRAIT_SCORE)
        .ok_or(DomainError::TraitOutOfRange {
            trait_name: t.as_str(),
            value,
        })
}

#[derive(Serialize, Deserialize)]
struct RawPersonality {
    openness: i64,
    conscientiousness: i64,
    extraversion: i64,
    agreeableness: i64,
    neuroticism: i64,
}

impl TryFrom<RawPersonality> for Personality {
    type Error = DomainError;

    fn try_from(raw: RawPersonality) -> Result<Self, Self::Error> {
        Personality::new(
            raw.openness,
            raw.conscientiousness,
            raw.extraversion,
            raw.agreeableness,
            raw.neuroticism,
        )
    }
}

impl From<Personality> for RawPersonality {
    fn from(p: Personality) -> Self {
        Self {
            openness: p.score(Trait::Openness).into(),
            conscientiousness: p.score(Trait::Conscientiousness).into(),
            extraversion: p.score(Trait::Extraversion).into(),
            agreeableness: p.score(Trait::Agreeableness).into(),
            neuroticism: p.score(Trait::Neuroticism).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_in_canonical_order() {
        let p = Personality::new(80, 30, 60, 50, 10).unwrap();
        let collected: Vec<_> = p.iter().collect();
        assert_eq!(
            collected,
            vec![
                (Trait::Openness, 80),
                (Trait::Conscientiousness, 30),
                (Trait::Extraversion, 60),
                (Trait::Agreeableness, 50),
                (Trait::Neuroticism, 10),
            ]
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Personality::new(80, 101, 60, 50, 10).unwrap_err();
        assert_eq!(
            err,
            DomainError::TraitOutOfRange {
                trait_name: "conscientiousness",
                value: 101
            }
        );
        assert!(Personality::new(-1, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_bounds_accepted() {
        assert!(Personality::new(0, 100, 0, 100, 0).is_ok());
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(Trait::Openness.phrase(50), Trait::Openness.low_phrase());
        assert_eq!(Trait::Openness.phrase(51), Trait::Openness.high_phrase());
    }

    #[test]
    fn test_deserialize_object_shape() {
        let json = r#"{"openness":80,"conscientiousness":70,"extraversion":60,"agreeableness":50,"neuroticism":30}"#;
        let p: Personality = serde_json::from_str(json).unwrap();
        assert_eq!(p.score(Trait::Neuroticism), 30);
        assert_eq!(serde_json::to_string(&p).unwrap(), json);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let json = r#"{"openness":180,"conscientiousness":70,"extraversion":60,"agreeableness":50,"neuroticism":30}"#;
        assert!(serde_json::from_str::<Personality>(json).is_err());
    }
}
