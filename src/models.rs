//! Projects, feedback items and the request payloads that create them

use crate::error::{FeedbackError, FieldErrors, Result};
use crate::recommendation::FeedbackType;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern should compile")
});

/// Stored project; owner fields stay server-side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub feedback_type: FeedbackType,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub owner_token: String,
    #[serde(skip)]
    pub notification_email: Option<String>,
}

/// Validated input for a new project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub feedback_type: FeedbackType,
    pub owner_token: String,
    pub notification_email: Option<String>,
}

/// Raw `POST /api/projects` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub feedback_type: Option<String>,
    #[serde(default)]
    pub owner_token: Option<String>,
    #[serde(default)]
    pub notification_email: Option<String>,
}

/// Trim and drop empty strings
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// String field of a JSON object; a non-string value is recorded against the field
fn string_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add(field, "Expected string");
            None
        }
    }
}

impl CreateProjectRequest {
    /// Read a request from arbitrary JSON, reporting type mismatches per field
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(FeedbackError::validation("Expected a JSON object"));
        };
        let mut errors = FieldErrors::new();
        let request = Self {
            title: string_field(&object, "title", &mut errors),
            description: string_field(&object, "description", &mut errors),
            url: string_field(&object, "url", &mut errors),
            feedback_type: string_field(&object, "feedbackType", &mut errors),
            owner_token: string_field(&object, "ownerToken", &mut errors),
            notification_email: string_field(&object, "notificationEmail", &mut errors),
        };
        errors.into_result()?;
        Ok(request)
    }

    /// Validate every field, collecting one message per failing field
    pub fn validate(self) -> Result<NewProject> {
        let mut errors = FieldErrors::new();

        let title = non_blank(self.title.as_deref());
        if title.is_none() {
            errors.add("title", "Title is required");
        }
        let description = non_blank(self.description.as_deref());
        if description.is_none() {
            errors.add("description", "Description is required");
        }

        let url = non_blank(self.url.as_deref());
        if let Some(u) = &url
            && !is_valid_url(u)
        {
            errors.add("url", "Invalid URL");
        }

        let feedback_type = match self.feedback_type.as_deref() {
            Some(raw) => match FeedbackType::from_str(raw) {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.add(
                        "feedbackType",
                        "Invalid enum value. Expected 'hustler' | 'hipster' | 'hacker'",
                    );
                    None
                }
            },
            None => {
                errors.add("feedbackType", "Required");
                None
            }
        };

        let owner_token = self.owner_token.filter(|t| !t.is_empty());
        if owner_token.is_none() {
            errors.add("ownerToken", "Missing owner token");
        }

        let notification_email = non_blank(self.notification_email.as_deref());
        if let Some(email) = &notification_email
            && !is_valid_email(email)
        {
            errors.add("notificationEmail", "Invalid email");
        }

        errors.into_result()?;

        match (title, description, feedback_type, owner_token) {
            (Some(title), Some(description), Some(feedback_type), Some(owner_token)) => {
                Ok(NewProject {
                    title,
                    description,
                    url,
                    feedback_type,
                    owner_token,
                    notification_email,
                })
            }
            _ => Err(FeedbackError::Internal {
                message: "validated project is missing a required field".into(),
            }),
        }
    }
}

/// Stored feedback item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub project_id: String,
    pub feedback: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub helpful: u32,
    pub not_helpful: u32,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new feedback item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub project_id: String,
    pub feedback: String,
    pub feedback_type: FeedbackType,
}

/// Raw `POST /api/feedback` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, rename = "type")]
    pub feedback_type: Option<String>,
}

impl CreateFeedbackRequest {
    pub fn validate(self) -> Result<NewFeedback> {
        let project_id = non_blank(self.project_id.as_deref());
        let feedback = non_blank(self.feedback.as_deref());
        let raw_type = non_blank(self.feedback_type.as_deref());

        let (Some(project_id), Some(feedback), Some(raw_type)) = (project_id, feedback, raw_type)
        else {
            return Err(FeedbackError::validation("Missing required fields"));
        };

        let feedback_type = raw_type
            .parse::<FeedbackType>()
            .map_err(|_| FeedbackError::validation("Invalid feedback type"))?;

        Ok(NewFeedback {
            project_id,
            feedback,
            feedback_type,
        })
    }
}

/// Which counter a vote increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Vote {
    Helpful,
    NotHelpful,
}

impl Vote {
    pub fn column(self) -> &'static str {
        match self {
            Vote::Helpful => "helpful",
            Vote::NotHelpful => "not_helpful",
        }
    }
}

impl FromStr for Vote {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "helpful" => Ok(Vote::Helpful),
            "notHelpful" => Ok(Vote::NotHelpful),
            _ => Err(FeedbackError::validation("Invalid vote type")),
        }
    }
}

/// Raw `POST /api/feedback/vote/:id` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub vote: Option<String>,
}

impl VoteRequest {
    pub fn validate(&self) -> Result<Vote> {
        self.vote
            .as_deref()
            .ok_or_else(|| FeedbackError::validation("Invalid vote type"))?
            .parse()
    }
}
