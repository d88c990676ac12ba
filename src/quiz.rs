//! Quiz session state machine: question progression, scoring, and the
//! one-way QUIZ -> RESULT transition with its score tier.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::Rng;

use crate::layout::Layout;
use crate::question::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultTier {
    Perfect,
    Good,
    Okay,
    Low,
}

impl ResultTier {
    /// Pure mapping from final percentage to tier.
    pub fn for_percentage(percentage: f32) -> Self {
        if percentage >= 100.0 {
            Self::Perfect
        } else if percentage >= 70.0 {
            Self::Good
        } else if percentage >= 40.0 {
            Self::Okay
        } else {
            Self::Low
        }
    }

    /// Frames between effect spawns on the result screen. Paired with
    /// the per-tier factory in `effects`, this is the whole tuning table.
    pub fn spawn_cadence(self) -> u64 {
        match self {
            Self::Perfect => 60,
            Self::Good => 2,
            Self::Okay => 15,
            Self::Low => 2,
        }
    }
}

/// Final result, fixed once at the QUIZ -> RESULT transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub tier: ResultTier,
    pub score: usize,
    pub total: usize,
    pub message: &'static str,
    pub encouragement: &'static str,
}

impl Outcome {
    /// `total` must be nonzero; empty sessions never reach this point
    /// (they start on `Screen::Empty`).
    pub fn from_score(score: usize, total: usize) -> Self {
        let percentage = score as f32 / total as f32 * 100.0;
        let tier = ResultTier::for_percentage(percentage);
        let (message, encouragement) = match tier {
            ResultTier::Perfect => ("Perfect score!", ""),
            ResultTier::Good => ("Great work!", "One step away from a perfect run!"),
            ResultTier::Okay => ("Not bad, keep at it!", "Knowledge is power!"),
            ResultTier::Low => ("Don't lose heart!", "Every miss is a lesson!"),
        };
        Self {
            tier,
            score,
            total,
            message,
            encouragement,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Quiz,
    Result(Outcome),
    /// Terminal guard shown when no usable questions were loaded.
    Empty,
}

#[derive(Resource)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: usize,
    screen: Screen,
}

impl QuizSession {
    /// Shuffles every question's presented order up front, so the first
    /// presentation of each question already counts as a shuffle.
    pub fn new(mut questions: Vec<Question>, rng: &mut impl Rng) -> Self {
        for question in &mut questions {
            question.reshuffle(rng);
        }
        let screen = if questions.is_empty() {
            Screen::Empty
        } else {
            Screen::Quiz
        };
        Self {
            questions,
            current: 0,
            score: 0,
            screen,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Handles one click. A click outside every option region is a
    /// no-op; a hit consumes exactly one question, scoring it against
    /// the presented order, and re-deals the next question's options.
    pub fn select_option(&mut self, pointer: Vec2, layout: &Layout, rng: &mut impl Rng) {
        if self.screen != Screen::Quiz {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        let Some(slot) = layout.hit_option(pointer) else {
            return;
        };

        if question.is_correct(slot) {
            self.score += 1;
        }
        self.current += 1;
        if let Some(next) = self.questions.get_mut(self.current) {
            next.reshuffle(rng);
        }
    }

    /// Transitions QUIZ -> RESULT once every question has been consumed.
    /// Returns true on the frame the transition happens so the caller
    /// can reset the effect state.
    pub fn poll_completion(&mut self) -> bool {
        if self.screen != Screen::Quiz || self.current < self.questions.len() {
            return false;
        }
        self.screen = Screen::Result(Outcome::from_score(self.score, self.questions.len()));
        true
    }
}
