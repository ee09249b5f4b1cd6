//! Guided project submission: three quiz steps, a recommendation step, then
//! the project details form.

use crate::error::{FeedbackError, Result};
use crate::models::{CreateProjectRequest, NewProject};
use crate::recommendation::{Answers, FeedbackType, Question, recommend};
use serde::{Deserialize, Serialize};

pub const TOTAL_STEPS: u8 = 5;
const RECOMMENDATION_STEP: u8 = 4;
const DETAILS_STEP: u8 = 5;
const MIN_OWNER_TOKEN_LEN: usize = 10;

/// Keep a plausible existing owner token, otherwise mint a fresh one
pub fn ensure_owner_token(existing: Option<&str>) -> String {
    match existing {
        Some(token) if token.len() >= MIN_OWNER_TOKEN_LEN => token.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    }
}

/// Fields of the final step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetails {
    pub title: String,
    pub description: String,
    pub url: String,
    pub notification_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionWizard {
    step: u8,
    answers: Answers,
    recommended_type: Option<FeedbackType>,
    selected_type: Option<FeedbackType>,
}

impl Default for SubmissionWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionWizard {
    pub fn new() -> Self {
        Self {
            step: 1,
            answers: Answers::default(),
            recommended_type: None,
            selected_type: None,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn recommended_type(&self) -> Option<FeedbackType> {
        self.recommended_type
    }

    pub fn selected_type(&self) -> Option<FeedbackType> {
        self.selected_type
    }

    /// Question asked on the current step, if it is a quiz step
    pub fn current_question(&self) -> Option<Question> {
        Question::ALL.get(usize::from(self.step).checked_sub(1)?).copied()
    }

    /// Completion percentage shown in the progress bar
    pub fn progress(&self) -> u8 {
        (u16::from(self.step) * 100 / u16::from(TOTAL_STEPS)) as u8
    }

    pub fn answer(&mut self, question: Question, token: impl Into<String>) {
        self.answers.set(question, token);
    }

    pub fn select_type(&mut self, feedback_type: FeedbackType) {
        self.selected_type = Some(feedback_type);
    }

    pub fn can_advance(&self) -> bool {
        match self.current_question() {
            Some(question) => self.answers.get(question).is_some(),
            None => self.step == RECOMMENDATION_STEP && self.selected_type.is_some(),
        }
    }

    /// Advance one step; leaving the last question computes the recommendation
    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        if self.step == RECOMMENDATION_STEP - 1 {
            let recommendation = recommend(&self.answers);
            tracing::debug!("Recommended {} for {:?}", recommendation, self.answers);
            self.recommended_type = Some(recommendation);
            self.selected_type = Some(recommendation);
        }
        self.step += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.step <= 1 {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Build the project to create from the final step
    pub fn submit(&self, details: ProjectDetails, owner_token: &str) -> Result<NewProject> {
        if self.step != DETAILS_STEP {
            return Err(FeedbackError::validation(
                "Project details can only be submitted on the final step",
            ));
        }
        let feedback_type = self
            .selected_type
            .ok_or_else(|| FeedbackError::validation("No feedback type selected"))?;
        CreateProjectRequest {
            title: Some(details.title),
            description: Some(details.description),
            url: Some(details.url),
            feedback_type: Some(feedback_type.as_str().to_string()),
            owner_token: Some(owner_token.to_string()),
            notification_email: Some(details.notification_email),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered() -> SubmissionWizard {
        let mut w = SubmissionWizard::new();
        w.answer(Question::ProjectStage, "working-messy-code");
        assert!(w.next());
        w.answer(Question::BiggestConcern, "scale-break");
        assert!(w.next());
        w.answer(Question::NextGoal, "improve-ux");
        assert!(w.next());
        w
    }

    #[test]
    fn starts_on_first_question() {
        let w = SubmissionWizard::new();
        assert_eq!(w.step(), 1);
        assert_eq!(w.progress(), 20);
        assert_eq!(w.current_question(), Some(Question::ProjectStage));
        assert!(!w.can_advance());
    }

    #[test]
    fn cannot_skip_unanswered_question() {
        let mut w = SubmissionWizard::new();
        assert!(!w.next());
        assert_eq!(w.step(), 1);
    }

    #[test]
    fn recommendation_computed_after_third_question() {
        let w = answered();
        assert_eq!(w.step(), 4);
        assert_eq!(w.current_question(), None);
        assert_eq!(w.recommended_type(), Some(FeedbackType::Hacker));
        assert_eq!(w.selected_type(), Some(FeedbackType::Hacker));
        assert_eq!(w.progress(), 80);
    }

    #[test]
    fn user_can_override_recommendation() {
        let mut w = answered();
        w.select_type(FeedbackType::Hipster);
        assert!(w.next());
        assert_eq!(w.step(), 5);
        assert_eq!(w.recommended_type(), Some(FeedbackType::Hacker));
        assert_eq!(w.selected_type(), Some(FeedbackType::Hipster));
        assert!(!w.next());
        assert_eq!(w.progress(), 100);
    }

    #[test]
    fn prev_stops_at_first_step() {
        let mut w = answered();
        assert!(w.prev());
        assert!(w.prev());
        assert!(w.prev());
        assert!(!w.prev());
        assert_eq!(w.step(), 1);
        assert_eq!(w.answers().get(Question::ProjectStage), Some("working-messy-code"));
    }

    #[test]
    fn submit_builds_project_with_selected_type() {
        let mut w = answered();
        w.select_type(FeedbackType::Hustler);
        w.next();
        let token = ensure_owner_token(None);
        let project = w
            .submit(
                ProjectDetails {
                    title: "LocalEats".into(),
                    description: "Restaurant discovery".into(),
                    url: String::new(),
                    notification_email: "owner@example.com".into(),
                },
                &token,
            )
            .unwrap();
        assert_eq!(project.feedback_type, FeedbackType::Hustler);
        assert_eq!(project.owner_token, token);
        assert_eq!(project.url, None);
    }

    #[test]
    fn submit_before_final_step_fails() {
        let w = answered();
        assert!(w.submit(ProjectDetails::default(), "owner-token-xyz").is_err());
    }

    #[test]
    fn owner_token_reused_only_when_long_enough() {
        assert_eq!(ensure_owner_token(Some("abcdefghijk")), "abcdefghijk");
        let fresh = ensure_owner_token(Some("short"));
        assert_ne!(fresh, "short");
        assert_eq!(fresh.len(), 36);
    }
}
