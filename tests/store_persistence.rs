//! On-disk store behaviour across reopen.

use peer_feedback::models::{NewFeedback, NewProject, Vote};
use peer_feedback::recommendation::FeedbackType;
use peer_feedback::store::Store;
use tempfile::tempdir;

#[test]
fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let (project_id, feedback_id) = {
        let store = Store::open(&path).unwrap();
        let project = store
            .create_project(NewProject {
                title: "StudyBuddy".into(),
                description: "Peer learning platform".into(),
                url: Some("https://studybuddy.example".into()),
                feedback_type: FeedbackType::Hipster,
                owner_token: "owner-token-0001".into(),
                notification_email: None,
            })
            .unwrap();
        let feedback = store
            .create_feedback(NewFeedback {
                project_id: project.id.clone(),
                feedback: "The matching screen is confusing".into(),
                feedback_type: FeedbackType::Hipster,
            })
            .unwrap();
        store.vote(&feedback.id, Vote::Helpful).unwrap();
        (project.id, feedback.id)
    };

    let reopened = Store::open(&path).unwrap();
    assert_eq!(reopened.path(), path.to_string_lossy());
    let project = reopened.get_project(&project_id).unwrap().unwrap();
    assert_eq!(project.url.as_deref(), Some("https://studybuddy.example"));
    assert_eq!(project.owner_token, "owner-token-0001");

    let feedback = reopened.feedback_for_project(&project_id).unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].id, feedback_id);
    assert_eq!(feedback[0].helpful, 1);
    assert_eq!(reopened.counts().unwrap(), (1, 1));
}

#[test]
fn concurrent_votes_are_not_lost() {
    let store = Store::open_in_memory().unwrap();
    let project = store
        .create_project(NewProject {
            title: "Busy".into(),
            description: "Lots of votes".into(),
            url: None,
            feedback_type: FeedbackType::Hacker,
            owner_token: "owner-token-0002".into(),
            notification_email: None,
        })
        .unwrap();
    let feedback = store
        .create_feedback(NewFeedback {
            project_id: project.id,
            feedback: "Add caching".into(),
            feedback_type: FeedbackType::Hacker,
        })
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let id = feedback.id.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    store.vote(&id, Vote::Helpful).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let final_state = store.get_feedback(&feedback.id).unwrap().unwrap();
    assert_eq!(final_state.helpful, 200);
    assert_eq!(final_state.not_helpful, 0);
}
