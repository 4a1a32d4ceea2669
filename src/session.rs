use rand::prelude::*;

use crate::bank::{BankState, Question};

pub const MAX_QUIZ_SIZE: usize = 10;

/// Draws a fresh random selection from one category. The bank is never
/// mutated; consecutive draws are independent.
pub fn pick(bank: &BankState, category: &str, rng: &mut impl Rng) -> Vec<Question> {
    let pool = match bank.category(category) {
        Some(pool) => pool,
        None => return Vec::new(),
    };

    let mut pool = pool.to_vec();
    pool.shuffle(rng);
    pool.truncate(MAX_QUIZ_SIZE);
    pool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.correct * 100 / self.total
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Unmarked,
    Correct,
    Wrong,
}

/// The active quiz: current selection, one optional choice per question, and
/// whether a scoring pass has revealed the marks.
#[derive(Debug)]
pub struct QuizSession {
    category: Option<String>,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    revealed: bool,
    rng: ThreadRng,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            category: None,
            questions: Vec::new(),
            answers: Vec::new(),
            revealed: false,
            rng: rand::rng(),
        }
    }

    pub fn generate(&mut self, bank: &BankState, category: &str) {
        self.questions = pick(bank, category, &mut self.rng);
        self.answers = vec![None; self.questions.len()];
        self.revealed = false;
        self.category = Some(category.to_string());
    }

    /// Redraws from the current category. Returns false if no category has
    /// been chosen yet.
    pub fn regenerate(&mut self, bank: &BankState) -> bool {
        match self.category.clone() {
            Some(category) => {
                self.generate(bank, &category);
                true
            }
            None => false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    /// Selects an option for a question, replacing any earlier choice in the
    /// same question. Returns false for out-of-range indices.
    pub fn select(&mut self, question: usize, option: usize) -> bool {
        match self.questions.get(question) {
            Some(q) if option < q.options.len() => {
                self.answers[question] = Some(option);
                true
            }
            _ => false,
        }
    }

    /// Unanswered questions count as incorrect and stay in the total.
    pub fn score(&self) -> Score {
        let correct = self
            .answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| **answer == Some(question.answer))
            .count();

        Score {
            correct,
            total: self.questions.len(),
        }
    }

    pub fn reveal(&mut self) -> Score {
        self.revealed = true;
        self.score()
    }

    pub fn mark(&self, question: usize, option: usize) -> OptionMark {
        if !self.revealed {
            return OptionMark::Unmarked;
        }
        let q = match self.questions.get(question) {
            Some(q) => q,
            None => return OptionMark::Unmarked,
        };
        if option == q.answer {
            OptionMark::Correct
        } else if self.selection(question) == Some(option) {
            OptionMark::Wrong
        } else {
            OptionMark::Unmarked
        }
    }

    pub fn clear_answers(&mut self) {
        for slot in &mut self.answers {
            *slot = None;
        }
        self.revealed = false;
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
