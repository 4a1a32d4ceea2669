use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir, File};
use serde::Deserialize;

static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
}

impl Question {
    fn is_well_formed(&self) -> bool {
        !self.options.is_empty() && self.answer < self.options.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    categories: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    pub(crate) fn from_json(data: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<Question>> =
            serde_json::from_str(data).context("question bank is not valid JSON")?;

        let mut categories = BTreeMap::new();
        for (name, questions) in raw {
            let mut kept = Vec::with_capacity(questions.len());
            for question in questions {
                if question.is_well_formed() {
                    kept.push(question);
                } else {
                    log::warn!(
                        "Skipping malformed question in category '{}': {}",
                        name,
                        question.question
                    );
                }
            }
            categories.insert(name, kept);
        }

        Ok(Self { categories })
    }

    pub fn load_embedded() -> Result<Self> {
        let bank_file: &File = ASSETS_DIR
            .get_file("questions.json")
            .expect("questions.json not found in assets directory");

        let data = bank_file
            .contents_utf8()
            .expect("Failed to read questions.json as UTF-8");

        Self::from_json(data)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read question bank from {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn category(&self, name: &str) -> Option<&[Question]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.categories
            .iter()
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum BankState {
    NotLoaded,
    Loaded(QuestionBank),
    Failed(String),
}

impl BankState {
    pub fn load(path: Option<&Path>) -> Self {
        let result = match path {
            Some(path) => QuestionBank::load_from_path(path),
            None => QuestionBank::load_embedded(),
        };

        match result {
            Ok(bank) => BankState::Loaded(bank),
            Err(err) => {
                log::error!("Failed to load question bank: {:#}", err);
                BankState::Failed(format!("{:#}", err))
            }
        }
    }

    pub fn bank(&self) -> Option<&QuestionBank> {
        match self {
            BankState::Loaded(bank) => Some(bank),
            _ => None,
        }
    }

    pub fn category(&self, name: &str) -> Option<&[Question]> {
        self.bank().and_then(|bank| bank.category(name))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            BankState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_categories_and_questions() {
        let bank = QuestionBank::from_json(
            r#"{"general": [{"question": "Q1?", "options": ["A", "B", "C"], "answer": 1}]}"#,
        )
        .unwrap();

        let questions = bank.category("general").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1?");
        assert_eq!(questions[0].options, vec!["A", "B", "C"]);
        assert_eq!(questions[0].answer, 1);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(QuestionBank::from_json("not json").is_err());
        assert!(QuestionBank::from_json(r#"{"general": [{"question": "Q?"}]}"#).is_err());
    }

    #[test]
    fn skips_questions_violating_the_answer_invariant() {
        let bank = QuestionBank::from_json(
            r#"{"general": [
                {"question": "Out of range", "options": ["A", "B"], "answer": 2},
                {"question": "No options", "options": [], "answer": 0},
                {"question": "Fine", "options": ["A", "B"], "answer": 0}
            ]}"#,
        )
        .unwrap();

        let questions = bank.category("general").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Fine");
    }

    #[test]
    fn embedded_bank_loads_and_is_well_formed() {
        let bank = QuestionBank::load_embedded().unwrap();
        assert!(!bank.is_empty());
        for (_, questions) in bank.iter() {
            for question in questions {
                assert!(!question.options.is_empty());
                assert!(question.answer < question.options.len());
            }
        }
    }

    #[test]
    fn unloaded_and_failed_states_expose_no_categories() {
        assert!(BankState::NotLoaded.category("general").is_none());
        assert!(BankState::Failed("boom".to_string())
            .category("general")
            .is_none());
    }

    #[test]
    fn loading_a_missing_file_fails_without_panicking() {
        let state = BankState::load(Some(Path::new("/nonexistent/questions.json")));
        assert!(state.failure().is_some());
        assert!(state.bank().is_none());
    }
}
