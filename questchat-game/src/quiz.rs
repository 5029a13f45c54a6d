//! Personality quiz: ten Likert answers to trait scores and a 4-letter code.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    QUIZ_MAX_ANSWER, QUIZ_MIN_ANSWER, QUIZ_NEUTRAL_ANSWER, QUIZ_TRAIT_PIVOT, QUIZ_TRAIT_START,
    STAT_MAX, STAT_MIN,
};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Creativity,
    Productivity,
    Energy,
    Kindness,
    Awareness,
}

impl Trait {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creativity => "creativity",
            Self::Productivity => "productivity",
            Self::Energy => "energy",
            Self::Kindness => "kindness",
            Self::Awareness => "awareness",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: u8,
    pub text: &'static str,
    pub trait_kind: Trait,
    pub weight: i32,
}

pub static QUIZ_QUESTIONS: [QuizQuestion; 10] = [
    QuizQuestion {
        id: 1,
        text: "I make friends easily.",
        trait_kind: Trait::Energy,
        weight: 10,
    },
    QuizQuestion {
        id: 2,
        text: "I have a vivid imagination.",
        trait_kind: Trait::Creativity,
        weight: 10,
    },
    QuizQuestion {
        id: 3,
        text: "I worry about things.",
        trait_kind: Trait::Awareness,
        weight: 10,
    },
    QuizQuestion {
        id: 4,
        text: "I trust others.",
        trait_kind: Trait::Kindness,
        weight: 10,
    },
    QuizQuestion {
        id: 5,
        text: "I complete tasks successfully.",
        trait_kind: Trait::Productivity,
        weight: 10,
    },
    QuizQuestion {
        id: 6,
        text: "I get angry easily.",
        trait_kind: Trait::Awareness,
        weight: 10,
    },
    QuizQuestion {
        id: 7,
        text: "I love large parties.",
        trait_kind: Trait::Energy,
        weight: 10,
    },
    QuizQuestion {
        id: 8,
        text: "I believe that art is important.",
        trait_kind: Trait::Creativity,
        weight: 10,
    },
    QuizQuestion {
        id: 9,
        text: "I use my time wisely.",
        trait_kind: Trait::Productivity,
        weight: 10,
    },
    QuizQuestion {
        id: 10,
        text: "I like to make people feel welcome.",
        trait_kind: Trait::Kindness,
        weight: 10,
    },
];

/// Running score per trait, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
    pub creativity: i32,
    pub productivity: i32,
    pub energy: i32,
    pub kindness: i32,
    pub awareness: i32,
}

impl Default for TraitScores {
    fn default() -> Self {
        Self {
            creativity: QUIZ_TRAIT_START,
            productivity: QUIZ_TRAIT_START,
            energy: QUIZ_TRAIT_START,
            kindness: QUIZ_TRAIT_START,
            awareness: QUIZ_TRAIT_START,
        }
    }
}

impl TraitScores {
    #[must_use]
    pub const fn get(&self, trait_kind: Trait) -> i32 {
        match trait_kind {
            Trait::Creativity => self.creativity,
            Trait::Productivity => self.productivity,
            Trait::Energy => self.energy,
            Trait::Kindness => self.kindness,
            Trait::Awareness => self.awareness,
        }
    }

    fn slot(&mut self, trait_kind: Trait) -> &mut i32 {
        match trait_kind {
            Trait::Creativity => &mut self.creativity,
            Trait::Productivity => &mut self.productivity,
            Trait::Energy => &mut self.energy,
            Trait::Kindness => &mut self.kindness,
            Trait::Awareness => &mut self.awareness,
        }
    }

    /// Shift a trait by `(answer - 3) * weight`, clamped to `[0, 100]`.
    pub fn apply(&mut self, question: &QuizQuestion, answer: u8) {
        let impact = (i32::from(answer) - i32::from(QUIZ_NEUTRAL_ANSWER)) * question.weight;
        let slot = self.slot(question.trait_kind);
        *slot = (*slot + impact).clamp(STAT_MIN, STAT_MAX);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("expected {expected} answers, got {got}")]
    WrongAnswerCount { expected: usize, got: usize },
    #[error("answer {index} is {value}; answers must be between {min} and {max}")]
    AnswerOutOfRange {
        index: usize,
        value: u8,
        min: u8,
        max: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub code: String,
    pub trait_scores: TraitScores,
}

/// Derive the 4-letter code. A score of exactly 50 takes the second letter
/// of each pair. Creativity is scored but does not feed the code.
#[must_use]
pub fn personality_code(scores: &TraitScores) -> String {
    let pick = |score: i32, above: char, otherwise: char| {
        if score > QUIZ_TRAIT_PIVOT {
            above
        } else {
            otherwise
        }
    };
    [
        pick(scores.energy, 'E', 'I'),
        pick(scores.awareness, 'S', 'N'),
        pick(scores.kindness, 'F', 'T'),
        pick(scores.productivity, 'J', 'P'),
    ]
    .iter()
    .collect()
}

/// Score a complete set of answers, one per question in order.
///
/// # Errors
///
/// Returns an error if there are not exactly ten answers or an answer lies
/// outside `1..=5`.
pub fn score_quiz(answers: &[u8]) -> Result<QuizOutcome, QuizError> {
    if answers.len() != QUIZ_QUESTIONS.len() {
        return Err(QuizError::WrongAnswerCount {
            expected: QUIZ_QUESTIONS.len(),
            got: answers.len(),
        });
    }
    let mut scores = TraitScores::default();
    for (index, (question, &answer)) in QUIZ_QUESTIONS.iter().zip(answers).enumerate() {
        if !(QUIZ_MIN_ANSWER..=QUIZ_MAX_ANSWER).contains(&answer) {
            return Err(QuizError::AnswerOutOfRange {
                index,
                value: answer,
                min: QUIZ_MIN_ANSWER,
                max: QUIZ_MAX_ANSWER,
            });
        }
        scores.apply(question, answer);
    }
    Ok(QuizOutcome {
        code: personality_code(&scores),
        trait_scores: scores,
    })
}

/// Merge quiz results into the player once. Returns false, leaving the
/// document unchanged, when a personality is already on file.
pub fn merge_profile(state: &mut GameState, scores: &TraitScores, code: &str) -> bool {
    let player = &mut state.player;
    if player.personality_known() {
        return false;
    }
    player.stats.creativity = Some(scores.creativity);
    player.stats.productivity = scores.productivity;
    player.stats.energy = scores.energy;
    player.stats.kindness = Some(scores.kindness);
    player.stats.awareness = Some(scores.awareness);
    player.stats.clamp();
    player.personality_type = code.to_string();
    log::debug!("personality profile merged: {code}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_answers_land_on_the_lower_letters() {
        let outcome = score_quiz(&[3; 10]).unwrap();
        assert_eq!(outcome.trait_scores, TraitScores::default());
        // every trait sits at exactly 50, which is not above the pivot
        assert_eq!(outcome.code, "INTP");
    }

    #[test]
    fn strong_answers_flip_every_letter() {
        let outcome = score_quiz(&[5; 10]).unwrap();
        assert_eq!(outcome.code, "ESFJ");
        assert_eq!(outcome.trait_scores.energy, 90);
        assert_eq!(outcome.trait_scores.creativity, 90);
    }

    #[test]
    fn one_point_above_pivot_counts() {
        // energy questions are 1 and 7
        let outcome = score_quiz(&[4, 3, 3, 3, 3, 3, 3, 3, 3, 3]).unwrap();
        assert_eq!(outcome.trait_scores.energy, 60);
        assert_eq!(outcome.code, "ENTP");
    }

    #[test]
    fn creativity_does_not_change_the_code() {
        let low = score_quiz(&[3, 1, 3, 3, 3, 3, 3, 1, 3, 3]).unwrap();
        let high = score_quiz(&[3, 5, 3, 3, 3, 3, 3, 5, 3, 3]).unwrap();
        assert_eq!(low.trait_scores.creativity, 10);
        assert_eq!(high.trait_scores.creativity, 90);
        assert_eq!(low.code, high.code);
    }

    #[test]
    fn trait_scores_clamp() {
        let mut scores = TraitScores {
            energy: 95,
            ..TraitScores::default()
        };
        scores.apply(&QUIZ_QUESTIONS[0], 5);
        assert_eq!(scores.energy, 100);
        scores.energy = 5;
        scores.apply(&QUIZ_QUESTIONS[0], 1);
        assert_eq!(scores.energy, 0);
    }

    #[test]
    fn invalid_answer_sets_are_rejected() {
        assert_eq!(
            score_quiz(&[3; 9]),
            Err(QuizError::WrongAnswerCount {
                expected: 10,
                got: 9
            })
        );
        let err = score_quiz(&[3, 3, 0, 3, 3, 3, 3, 3, 3, 3]).unwrap_err();
        assert_eq!(
            err,
            QuizError::AnswerOutOfRange {
                index: 2,
                value: 0,
                min: 1,
                max: 5
            }
        );
        assert!(score_quiz(&[6; 10]).is_err());
    }

    #[test]
    fn profile_merges_only_once() {
        let mut state = GameState::default();
        let first = score_quiz(&[5; 10]).unwrap();
        assert!(merge_profile(&mut state, &first.trait_scores, &first.code));
        assert_eq!(state.player.personality_type, "ESFJ");
        assert_eq!(state.player.stats.energy, 90);
        assert_eq!(state.player.stats.kindness, Some(90));

        let second = score_quiz(&[1; 10]).unwrap();
        assert!(!merge_profile(&mut state, &second.trait_scores, &second.code));
        assert_eq!(state.player.personality_type, "ESFJ");
        assert_eq!(state.player.stats.energy, 90);
    }
}
