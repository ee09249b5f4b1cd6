//! Per-category feedback questionnaires.
//!
//! A reviewer fills the form matching the project's feedback type; the
//! answers are folded into the single text stored on a feedback item.

use crate::error::{FeedbackError, Result};
use crate::models::NewFeedback;
use crate::recommendation::FeedbackType;
use serde::{Deserialize, Serialize};

/// Business and market validation questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HustlerForm {
    pub real_problem: String,
    pub real_problem_explanation: String,
    pub who_would_pay: String,
    pub monetization: String,
    pub market_concern: String,
    pub additional_thoughts: String,
}

/// Design and user experience questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HipsterForm {
    pub first_impression: String,
    pub first_impression_rating: String,
    pub user_flow: String,
    pub confusing: String,
    pub visual_design: String,
    pub additional_thoughts: String,
}

/// Technical review questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HackerForm {
    pub code_quality: String,
    pub code_quality_rating: String,
    pub architecture: String,
    pub performance: String,
    pub security: String,
    pub additional_thoughts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedbackForm {
    Hustler(HustlerForm),
    Hipster(HipsterForm),
    Hacker(HackerForm),
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

impl HustlerForm {
    pub fn is_complete(&self) -> bool {
        filled(&self.real_problem)
            && filled(&self.who_would_pay)
            && filled(&self.monetization)
            && filled(&self.market_concern)
    }

    pub fn compose(&self) -> String {
        format!(
            "**Problem Assessment:** {}\n{}\n\n**Target Customers:** {}\n\n**Monetization Strategy:** {}\n\n**Market Concerns:** {}\n\n**Additional Insights:** {}",
            self.real_problem,
            self.real_problem_explanation,
            self.who_would_pay,
            self.monetization,
            self.market_concern,
            self.additional_thoughts,
        )
        .trim()
        .to_string()
    }
}

impl HipsterForm {
    pub fn is_complete(&self) -> bool {
        filled(&self.first_impression)
            && filled(&self.user_flow)
            && filled(&self.confusing)
            && filled(&self.visual_design)
    }

    pub fn compose(&self) -> String {
        format!(
            "**First Impression:** {}\n{}\n\n**User Flow:** {}\n\n**Confusing Elements:** {}\n\n**Visual Design Suggestions:** {}\n\n**Additional Insights:** {}",
            self.first_impression_rating,
            self.first_impression,
            self.user_flow,
            self.confusing,
            self.visual_design,
            self.additional_thoughts,
        )
        .trim()
        .to_string()
    }
}

impl HackerForm {
    pub fn is_complete(&self) -> bool {
        filled(&self.code_quality)
            && filled(&self.architecture)
            && filled(&self.performance)
            && filled(&self.security)
    }

    pub fn compose(&self) -> String {
        format!(
            "**Code Quality Assessment:** {}\n{}\n\n**Architecture Suggestions:** {}\n\n**Performance Issues:** {}\n\n**Security Considerations:** {}\n\n**Additional Technical Insights:** {}",
            self.code_quality_rating,
            self.code_quality,
            self.architecture,
            self.performance,
            self.security,
            self.additional_thoughts,
        )
        .trim()
        .to_string()
    }
}

impl FeedbackForm {
    /// Empty form for a category
    pub fn blank(category: FeedbackType) -> Self {
        match category {
            FeedbackType::Hustler => FeedbackForm::Hustler(HustlerForm::default()),
            FeedbackType::Hipster => FeedbackForm::Hipster(HipsterForm::default()),
            FeedbackType::Hacker => FeedbackForm::Hacker(HackerForm::default()),
        }
    }

    pub fn feedback_type(&self) -> FeedbackType {
        match self {
            FeedbackForm::Hustler(_) => FeedbackType::Hustler,
            FeedbackForm::Hipster(_) => FeedbackType::Hipster,
            FeedbackForm::Hacker(_) => FeedbackType::Hacker,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            FeedbackForm::Hustler(f) => f.is_complete(),
            FeedbackForm::Hipster(f) => f.is_complete(),
            FeedbackForm::Hacker(f) => f.is_complete(),
        }
    }

    pub fn compose(&self) -> String {
        match self {
            FeedbackForm::Hustler(f) => f.compose(),
            FeedbackForm::Hipster(f) => f.compose(),
            FeedbackForm::Hacker(f) => f.compose(),
        }
    }

    pub fn into_new_feedback(self, project_id: &str) -> Result<NewFeedback> {
        if !self.is_complete() {
            return Err(FeedbackError::validation(format!(
                "{} feedback form is incomplete",
                self.feedback_type().label()
            )));
        }
        Ok(NewFeedback {
            project_id: project_id.to_string(),
            feedback: self.compose(),
            feedback_type: self.feedback_type(),
        })
    }
}
