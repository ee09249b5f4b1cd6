//! Feedback-type recommendation from the submission quiz.
//!
//! Each of the three quiz slots adds two points to exactly one category when
//! it holds a known token. Unknown or missing tokens contribute nothing. The
//! highest tally wins, ties going to the earliest category in
//! [`FeedbackType::ALL`], so an empty answer set resolves to `Hustler`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Points a matching answer adds to its category
const ANSWER_WEIGHT: u8 = 2;

/// The three fixed feedback specializations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    /// Business and market validation
    Hustler,
    /// Design and user experience
    Hipster,
    /// Code quality and architecture
    Hacker,
}

impl FeedbackType {
    /// Enumeration order; also the tie-break order for recommendations
    pub const ALL: [FeedbackType; 3] = [
        FeedbackType::Hustler,
        FeedbackType::Hipster,
        FeedbackType::Hacker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Hustler => "hustler",
            FeedbackType::Hipster => "hipster",
            FeedbackType::Hacker => "hacker",
        }
    }

    /// Capitalized name for display
    pub fn label(self) -> &'static str {
        match self {
            FeedbackType::Hustler => "Hustler",
            FeedbackType::Hipster => "Hipster",
            FeedbackType::Hacker => "Hacker",
        }
    }

    pub fn description(self) -> &'static str {
        describe(self)
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feedback type '{0}'")]
pub struct UnknownFeedbackType(pub String);

impl FromStr for FeedbackType {
    type Err = UnknownFeedbackType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hustler" => Ok(FeedbackType::Hustler),
            "hipster" => Ok(FeedbackType::Hipster),
            "hacker" => Ok(FeedbackType::Hacker),
            other => Err(UnknownFeedbackType(other.to_string())),
        }
    }
}

/// Quiz answers; each slot holds a raw token or nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biggest_concern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_goal: Option<String>,
}

impl Answers {
    pub fn is_empty(&self) -> bool {
        self.project_stage.is_none() && self.biggest_concern.is_none() && self.next_goal.is_none()
    }

    pub fn get(&self, question: Question) -> Option<&str> {
        match question {
            Question::ProjectStage => self.project_stage.as_deref(),
            Question::BiggestConcern => self.biggest_concern.as_deref(),
            Question::NextGoal => self.next_goal.as_deref(),
        }
    }

    pub fn set(&mut self, question: Question, token: impl Into<String>) {
        let slot = match question {
            Question::ProjectStage => &mut self.project_stage,
            Question::BiggestConcern => &mut self.biggest_concern,
            Question::NextGoal => &mut self.next_goal,
        };
        *slot = Some(token.into());
    }
}

/// Transient per-category tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreVector {
    pub hustler: u8,
    pub hipster: u8,
    pub hacker: u8,
}

impl ScoreVector {
    pub fn get(&self, category: FeedbackType) -> u8 {
        match category {
            FeedbackType::Hustler => self.hustler,
            FeedbackType::Hipster => self.hipster,
            FeedbackType::Hacker => self.hacker,
        }
    }

    fn add(&mut self, category: FeedbackType, points: u8) {
        let slot = match category {
            FeedbackType::Hustler => &mut self.hustler,
            FeedbackType::Hipster => &mut self.hipster,
            FeedbackType::Hacker => &mut self.hacker,
        };
        *slot += points;
    }

    pub fn max(&self) -> u8 {
        self.hustler.max(self.hipster).max(self.hacker)
    }

    /// First category in enumeration order holding the maximum score
    pub fn leader(&self) -> FeedbackType {
        let max = self.max();
        FeedbackType::ALL
            .into_iter()
            .find(|c| self.get(*c) == max)
            .unwrap_or(FeedbackType::Hustler)
    }
}

fn stage_category(token: &str) -> Option<FeedbackType> {
    match token {
        "idea" | "built-no-users" => Some(FeedbackType::Hustler),
        "users-clunky-ux" => Some(FeedbackType::Hipster),
        "working-messy-code" => Some(FeedbackType::Hacker),
        _ => None,
    }
}

fn concern_category(token: &str) -> Option<FeedbackType> {
    match token {
        "real-problem" => Some(FeedbackType::Hustler),
        "easy-pleasant" => Some(FeedbackType::Hipster),
        "scale-break" => Some(FeedbackType::Hacker),
        _ => None,
    }
}

fn goal_category(token: &str) -> Option<FeedbackType> {
    match token {
        "find-customers" => Some(FeedbackType::Hustler),
        "improve-ux" => Some(FeedbackType::Hipster),
        "clean-debt" => Some(FeedbackType::Hacker),
        _ => None,
    }
}

/// Tally the answer set
pub fn score(answers: &Answers) -> ScoreVector {
    let mut scores = ScoreVector::default();
    let picks = [
        answers.project_stage.as_deref().and_then(stage_category),
        answers.biggest_concern.as_deref().and_then(concern_category),
        answers.next_goal.as_deref().and_then(goal_category),
    ];
    for category in picks.into_iter().flatten() {
        scores.add(category, ANSWER_WEIGHT);
    }
    scores
}

/// Recommend a feedback type for the (possibly partial) answer set
pub fn recommend(answers: &Answers) -> FeedbackType {
    score(answers).leader()
}

/// One-sentence description of a feedback type
pub fn describe(category: FeedbackType) -> &'static str {
    match category {
        FeedbackType::Hustler => {
            "Business-focused feedback on market validation, customer needs, and growth strategies from entrepreneurial students."
        }
        FeedbackType::Hipster => {
            "Design and UX feedback on user experience, interface design, and usability from design-focused students."
        }
        FeedbackType::Hacker => {
            "Technical feedback on code quality, architecture, scalability, and best practices from engineering students."
        }
    }
}

/// Quiz slots, in the order the wizard asks them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Question {
    ProjectStage,
    BiggestConcern,
    NextGoal,
}

impl Question {
    pub const ALL: [Question; 3] = [
        Question::ProjectStage,
        Question::BiggestConcern,
        Question::NextGoal,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            Question::ProjectStage => "Where is your project right now?",
            Question::BiggestConcern => "What's your biggest concern?",
            Question::NextGoal => "What's your next goal?",
        }
    }

    pub fn options(self) -> &'static [AnswerOption] {
        match self {
            Question::ProjectStage => PROJECT_STAGE_OPTIONS,
            Question::BiggestConcern => BIGGEST_CONCERN_OPTIONS,
            Question::NextGoal => NEXT_GOAL_OPTIONS,
        }
    }

    pub fn accepts(self, token: &str) -> bool {
        self.options().iter().any(|o| o.value == token)
    }
}

/// One selectable answer in the question catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const PROJECT_STAGE_OPTIONS: &[AnswerOption] = &[
    AnswerOption {
        value: "idea",
        label: "Just an idea/concept",
        description: "I have an idea but haven't built anything yet",
    },
    AnswerOption {
        value: "built-no-users",
        label: "Built but no users yet",
        description: "I've built something but haven't launched or gotten users",
    },
    AnswerOption {
        value: "users-clunky-ux",
        label: "Have users but UX feels clunky",
        description: "People are using it but the experience isn't smooth",
    },
    AnswerOption {
        value: "working-messy-code",
        label: "Working well but code is messy",
        description: "Users are happy but the technical foundation needs work",
    },
];

const BIGGEST_CONCERN_OPTIONS: &[AnswerOption] = &[
    AnswerOption {
        value: "real-problem",
        label: "Is this solving a real problem?",
        description: "I'm not sure if people actually need this",
    },
    AnswerOption {
        value: "easy-pleasant",
        label: "Is it easy/pleasant to use?",
        description: "I want to make sure the user experience is great",
    },
    AnswerOption {
        value: "scale-break",
        label: "Will this code scale/break?",
        description: "I'm worried about technical debt and scalability",
    },
];

const NEXT_GOAL_OPTIONS: &[AnswerOption] = &[
    AnswerOption {
        value: "find-customers",
        label: "Find first customers",
        description: "I need to validate demand and get initial users",
    },
    AnswerOption {
        value: "improve-ux",
        label: "Improve user experience",
        description: "I want to make the product more intuitive and enjoyable",
    },
    AnswerOption {
        value: "clean-debt",
        label: "Clean up technical debt",
        description: "I need to refactor and improve the codebase",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(stage: Option<&str>, concern: Option<&str>, goal: Option<&str>) -> Answers {
        Answers {
            project_stage: stage.map(str::to_string),
            biggest_concern: concern.map(str::to_string),
            next_goal: goal.map(str::to_string),
        }
    }

    #[test]
    fn single_idea_answer_is_hustler() {
        let a = answers(Some("idea"), None, None);
        let s = score(&a);
        assert_eq!(s, ScoreVector { hustler: 2, hipster: 0, hacker: 0 });
        assert_eq!(recommend(&a), FeedbackType::Hustler);
    }

    #[test]
    fn all_design_answers_is_hipster() {
        let a = answers(
            Some("users-clunky-ux"),
            Some("easy-pleasant"),
            Some("improve-ux"),
        );
        assert_eq!(score(&a).hipster, 6);
        assert_eq!(score(&a).max(), 6);
        assert_eq!(recommend(&a), FeedbackType::Hipster);
    }

    #[test]
    fn empty_answers_fall_back_to_hustler() {
        let a = Answers::default();
        assert!(a.is_empty());
        assert_eq!(score(&a), ScoreVector::default());
        assert_eq!(recommend(&a), FeedbackType::Hustler);
    }

    #[test]
    fn tie_resolves_in_enumeration_order() {
        let a = answers(Some("working-messy-code"), Some("real-problem"), None);
        let s = score(&a);
        assert_eq!(s.hacker, 2);
        assert_eq!(s.hustler, 2);
        assert_eq!(recommend(&a), FeedbackType::Hustler);

        let b = answers(Some("working-messy-code"), Some("easy-pleasant"), None);
        assert_eq!(recommend(&b), FeedbackType::Hipster);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let a = answers(Some("improve-ux"), Some("nonsense"), Some("clean-debt"));
        assert_eq!(score(&a), ScoreVector { hustler: 0, hipster: 0, hacker: 2 });
        assert_eq!(recommend(&a), FeedbackType::Hacker);
    }

    #[test]
    fn every_combination_yields_a_category() {
        let mut stages: Vec<Option<&str>> =
            PROJECT_STAGE_OPTIONS.iter().map(|o| Some(o.value)).collect();
        stages.push(None);
        let mut concerns: Vec<Option<&str>> =
            BIGGEST_CONCERN_OPTIONS.iter().map(|o| Some(o.value)).collect();
        concerns.push(None);
        let mut goals: Vec<Option<&str>> =
            NEXT_GOAL_OPTIONS.iter().map(|o| Some(o.value)).collect();
        goals.push(None);

        for stage in &stages {
            for concern in &concerns {
                for goal in &goals {
                    let a = answers(*stage, *concern, *goal);
                    let first = recommend(&a);
                    assert!(FeedbackType::ALL.contains(&first));
                    assert_eq!(first, recommend(&a));
                    let s = score(&a);
                    assert!(s.max() <= 6);
                    assert_eq!(s.get(first), s.max());
                }
            }
        }
    }

    #[test]
    fn descriptions_are_distinct_and_stable() {
        let texts: Vec<&str> = FeedbackType::ALL.iter().map(|c| describe(*c)).collect();
        assert!(texts.iter().all(|t| !t.is_empty()));
        assert_ne!(texts[0], texts[1]);
        assert_ne!(texts[1], texts[2]);
        assert_ne!(texts[0], texts[2]);
        assert_eq!(describe(FeedbackType::Hacker), describe(FeedbackType::Hacker));
        assert!(describe(FeedbackType::Hipster).contains("UX"));
    }

    #[test]
    fn feedback_type_parses_lowercase_only() {
        assert_eq!("hacker".parse::<FeedbackType>(), Ok(FeedbackType::Hacker));
        assert!("Hacker".parse::<FeedbackType>().is_err());
        assert_eq!(
            serde_json::to_string(&FeedbackType::Hipster).unwrap(),
            "\"hipster\""
        );
    }

    #[test]
    fn answers_deserialize_from_camel_case() {
        let a: Answers =
            serde_json::from_str(r#"{"projectStage":"idea","nextGoal":"clean-debt"}"#).unwrap();
        assert_eq!(a.get(Question::ProjectStage), Some("idea"));
        assert_eq!(a.get(Question::BiggestConcern), None);
        assert_eq!(a.get(Question::NextGoal), Some("clean-debt"));
    }

    #[test]
    fn catalog_tokens_all_score() {
        for question in Question::ALL {
            for option in question.options() {
                let mut a = Answers::default();
                a.set(question, option.value);
                assert_eq!(score(&a).max(), 2, "{} should score", option.value);
                assert!(question.accepts(option.value));
            }
        }
    }
}
