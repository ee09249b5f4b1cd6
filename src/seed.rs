//! Demo projects for local development databases

use crate::error::Result;
use crate::models::{NewProject, Project};
use crate::recommendation::FeedbackType;
use crate::store::Store;

const DEMO_PROJECTS: &[(&str, &str, Option<&str>, FeedbackType)] = &[
    (
        "TaskFlow - Project Management App",
        "A modern project management tool built with React and Node.js. Looking for feedback on user experience and feature prioritization.",
        Some("https://taskflow-demo.com"),
        FeedbackType::Hipster,
    ),
    (
        "EcoTracker - Carbon Footprint Calculator",
        "Mobile app that helps users track and reduce their carbon footprint. Need validation on market demand and business model.",
        Some("https://ecotracker.app"),
        FeedbackType::Hustler,
    ),
    (
        "CodeReview AI - Automated Code Analysis",
        "AI-powered tool for automated code reviews and suggestions. Looking for technical feedback on architecture and scalability.",
        Some("https://github.com/user/codereview-ai"),
        FeedbackType::Hacker,
    ),
    (
        "StudyBuddy - Collaborative Learning Platform",
        "Platform connecting students for study groups and peer learning. Seeking UX feedback on the matching algorithm interface.",
        None,
        FeedbackType::Hipster,
    ),
    (
        "LocalEats - Restaurant Discovery App",
        "Hyperlocal restaurant discovery app focusing on hidden gems. Need feedback on go-to-market strategy and user acquisition.",
        Some("https://localeats.co"),
        FeedbackType::Hustler,
    ),
    (
        "DevTools Pro - Developer Productivity Suite",
        "Collection of developer tools integrated into one dashboard. Looking for technical review of the plugin architecture.",
        Some("https://devtools-pro.dev"),
        FeedbackType::Hacker,
    ),
];

pub fn demo_projects(owner_token: &str) -> Vec<NewProject> {
    DEMO_PROJECTS
        .iter()
        .map(|(title, description, url, feedback_type)| NewProject {
            title: title.to_string(),
            description: description.to_string(),
            url: url.map(str::to_string),
            feedback_type: *feedback_type,
            owner_token: owner_token.to_string(),
            notification_email: None,
        })
        .collect()
}

/// Insert the demo projects, skipping titles already present
pub fn seed_demo_projects(store: &Store, owner_token: &str) -> Result<Vec<Project>> {
    let existing: Vec<String> = store
        .list_projects()?
        .into_iter()
        .map(|p| p.title)
        .collect();
    let mut inserted = Vec::new();
    for project in demo_projects(owner_token) {
        if existing.contains(&project.title) {
            continue;
        }
        inserted.push(store.create_project(project)?);
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_set_covers_every_type() {
        let projects = demo_projects("seed-owner-token");
        assert_eq!(projects.len(), 6);
        for t in FeedbackType::ALL {
            assert!(projects.iter().any(|p| p.feedback_type == t));
        }
    }

    #[test]
    fn seeding_twice_inserts_once() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(seed_demo_projects(&store, "seed-owner-token").unwrap().len(), 6);
        assert!(seed_demo_projects(&store, "seed-owner-token").unwrap().is_empty());
        assert_eq!(store.counts().unwrap(), (6, 0));
    }
}
