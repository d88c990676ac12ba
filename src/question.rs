//! Question data and the CSV source it loads from.
//!
//! Rows use the columns `question,optionA,optionB,optionC,correct`.
//! Malformed rows are skipped with a warning rather than aborting the
//! whole set; two built-in questions are always appended after the file.

use bevy::log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct QuestionRow {
    question: String,
    #[serde(rename = "optionA")]
    option_a: String,
    #[serde(rename = "optionB")]
    option_b: String,
    #[serde(rename = "optionC")]
    option_c: String,
    correct: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    text: String,
    options: [String; 3],
    correct: String,
    /// Shuffled display order, re-dealt each time the question becomes
    /// current. Always a permutation of `options`.
    presented: [String; 3],
}

impl Question {
    /// Returns `None` when `correct` does not appear among the options,
    /// since such a question could never be scored.
    pub fn new(text: &str, options: [String; 3], correct: &str) -> Option<Self> {
        if !options.iter().any(|option| option == correct) {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            presented: options.clone(),
            options,
            correct: correct.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn presented(&self) -> &[String; 3] {
        &self.presented
    }

    /// Whether the option shown in `slot` is the correct answer.
    pub fn is_correct(&self, slot: usize) -> bool {
        self.presented[slot] == self.correct
    }

    /// Deals a fresh display order from the fixed option set.
    pub fn reshuffle(&mut self, rng: &mut impl Rng) {
        self.presented = self.options.clone();
        self.presented.shuffle(rng);
    }

    #[cfg(test)]
    pub fn options(&self) -> &[String; 3] {
        &self.options
    }
}

/// Loads all well-formed questions from a CSV file. A missing or
/// unreadable file is an error; individual bad rows only cost a warning.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut questions = Vec::new();

    for row in reader.deserialize::<QuestionRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("skipping malformed quiz row: {err}");
                continue;
            }
        };
        let options = [row.option_a, row.option_b, row.option_c];
        match Question::new(&row.question, options, &row.correct) {
            Some(question) => questions.push(question),
            None => warn!(
                "skipping question whose correct answer is not an option: {}",
                row.question
            ),
        }
    }

    Ok(questions)
}

/// Hard-coded questions appended after whatever the CSV provides.
pub fn builtin_questions() -> Vec<Question> {
    [
        (
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter"],
            "Mars",
        ),
        (
            "How many sides does a hexagon have?",
            ["Five", "Six", "Eight"],
            "Six",
        ),
    ]
    .into_iter()
    .filter_map(|(text, options, correct)| {
        Question::new(text, options.map(String::from), correct)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use std::path::PathBuf;

    fn strs(options: [&str; 3]) -> [String; 3] {
        options.map(String::from)
    }

    fn temp_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quizfetti-{}-{name}", std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn rejects_correct_answer_missing_from_options() {
        assert!(Question::new("q", strs(["a", "b", "c"]), "d").is_none());
        assert!(Question::new("q", strs(["a", "b", "c"]), "b").is_some());
    }

    #[test]
    fn reshuffle_is_always_a_permutation_of_the_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut question = Question::new("q", strs(["a", "b", "c"]), "a").unwrap();
        for _ in 0..50 {
            question.reshuffle(&mut rng);
            let mut presented = question.presented().clone();
            let mut options = question.options().clone();
            presented.sort();
            options.sort();
            assert_eq!(presented, options);
        }
    }

    #[test]
    fn is_correct_follows_the_presented_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut question = Question::new("q", strs(["a", "b", "c"]), "b").unwrap();
        for _ in 0..20 {
            question.reshuffle(&mut rng);
            let hits: Vec<usize> = (0..3).filter(|&slot| question.is_correct(slot)).collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(question.presented()[hits[0]], "b");
        }
    }

    #[test]
    fn loads_rows_and_skips_malformed_ones() {
        let path = temp_csv(
            "load.csv",
            "question,optionA,optionB,optionC,correct\n\
             What is 2+2?,3,4,5,4\n\
             Broken row,red,green,blue,purple\n\
             Largest ocean?,Atlantic,Pacific,Arctic,Pacific\n",
        );
        let questions = load_questions(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "What is 2+2?");
        assert_eq!(questions[1].text(), "Largest ocean?");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_questions("/nonexistent/quiz.csv").is_err());
    }

    #[test]
    fn builtins_are_wellformed() {
        let questions = builtin_questions();
        assert_eq!(questions.len(), 2);
        for question in &questions {
            assert_eq!(
                (0..3).filter(|&slot| question.is_correct(slot)).count(),
                1
            );
        }
    }
}
