use axum::http::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::ActivityStore;
use crate::models::ActivityDirectory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("Activity not found")]
    NotFound,
    #[error("{email} is already signed up for {activity}")]
    AlreadySignedUp { activity: String, email: String },
    #[error("{email} is not signed up for {activity}")]
    NotSignedUp { activity: String, email: String },
    #[error("{activity} is full")]
    ActivityFull { activity: String },
    #[error("Email is required")]
    InvalidEmail,
}

impl ActivityError {
    pub fn status(&self) -> StatusCode {
        match self {
            ActivityError::NotFound => StatusCode::NOT_FOUND,
            ActivityError::AlreadySignedUp { .. }
            | ActivityError::NotSignedUp { .. }
            | ActivityError::ActivityFull { .. }
            | ActivityError::InvalidEmail => StatusCode::BAD_REQUEST,
        }
    }
}

/// A participant email that passed boundary validation.
///
/// Only blank input is rejected; the value is kept verbatim because roster
/// matching is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEmail(String);

impl ParticipantEmail {
    pub fn parse(raw: &str) -> Result<Self, ActivityError> {
        if raw.trim().is_empty() {
            return Err(ActivityError::InvalidEmail);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignupPolicy {
    /// Reject signups once `max_participants` is reached.
    pub enforce_capacity: bool,
}

pub async fn list_activities(store: &ActivityStore) -> ActivityDirectory {
    store.snapshot().await
}

pub async fn signup(
    store: &ActivityStore,
    activity_name: &str,
    email: &ParticipantEmail,
    policy: SignupPolicy,
) -> Result<String, ActivityError> {
    let email = email.as_str();
    let result = store
        .update(|directory| -> Result<usize, ActivityError> {
            let activity = directory
                .get_mut(activity_name)
                .ok_or(ActivityError::NotFound)?;
            if activity.has_participant(email) {
                return Err(ActivityError::AlreadySignedUp {
                    activity: activity_name.to_string(),
                    email: email.to_string(),
                });
            }
            if policy.enforce_capacity && activity.is_full() {
                return Err(ActivityError::ActivityFull {
                    activity: activity_name.to_string(),
                });
            }
            activity.participants.push(email.to_string());
            Ok(activity.participants.len())
        })
        .await;

    match result {
        Ok(count) => {
            info!(activity = %activity_name, email = %email, participants = count, "signed up");
            Ok(format!("Signed up {} for {}", email, activity_name))
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %email, error = %e, "signup rejected");
            Err(e)
        }
    }
}

pub async fn unregister(
    store: &ActivityStore,
    activity_name: &str,
    email: &ParticipantEmail,
) -> Result<String, ActivityError> {
    let email = email.as_str();
    let result = store
        .update(|directory| -> Result<usize, ActivityError> {
            let activity = directory
                .get_mut(activity_name)
                .ok_or(ActivityError::NotFound)?;
            let Some(pos) = activity.participants.iter().position(|p| p == email) else {
                return Err(ActivityError::NotSignedUp {
                    activity: activity_name.to_string(),
                    email: email.to_string(),
                });
            };
            activity.participants.remove(pos);
            Ok(activity.participants.len())
        })
        .await;

    match result {
        Ok(count) => {
            info!(activity = %activity_name, email = %email, participants = count, "unregistered");
            Ok(format!("Unregistered {} from {}", email, activity_name))
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %email, error = %e, "unregister rejected");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn store() -> ActivityStore {
        ActivityStore::new(ActivityDirectory::new(vec![
            Activity::new(
                "Chess Club",
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
            ),
            Activity::new("Tiny Club", "Two seats", "Mondays", 2, &["a@mergington.edu"]),
        ]))
    }

    fn email(raw: &str) -> ParticipantEmail {
        ParticipantEmail::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn signup_appends_in_order() {
        let store = store();
        let message = signup(&store, "Chess Club", &email("new@mergington.edu"), SignupPolicy::default())
            .await
            .unwrap();
        assert!(message.contains("Signed up"));
        assert!(message.contains("new@mergington.edu"));
        assert_eq!(
            store.participants("Chess Club").await.unwrap(),
            vec![
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "new@mergington.edu"
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected_once() {
        let store = store();
        let e = email("dup@mergington.edu");
        signup(&store, "Chess Club", &e, SignupPolicy::default())
            .await
            .unwrap();
        let err = signup(&store, "Chess Club", &e, SignupPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("already signed up"));

        let participants = store.participants("Chess Club").await.unwrap();
        assert_eq!(participants.iter().filter(|p| *p == "dup@mergington.edu").count(), 1);
    }

    #[tokio::test]
    async fn unknown_activity_is_not_found() {
        let store = store();
        let err = signup(&store, "chess club", &email("x@mergington.edu"), SignupPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err, ActivityError::NotFound);
        assert_eq!(err.to_string(), "Activity not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = unregister(&store, "Drama Club", &email("x@mergington.edu"))
            .await
            .unwrap_err();
        assert_eq!(err, ActivityError::NotFound);
    }

    #[tokio::test]
    async fn unregister_removes_member() {
        let store = store();
        let message = unregister(&store, "Chess Club", &email("michael@mergington.edu"))
            .await
            .unwrap();
        assert!(message.contains("Unregistered"));
        assert!(message.contains("michael@mergington.edu"));
        assert_eq!(
            store.participants("Chess Club").await.unwrap(),
            vec!["daniel@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn unregister_non_member_is_bad_request() {
        let err = unregister(&store(), "Chess Club", &email("nobody@mergington.edu"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("not signed up"));
    }

    #[tokio::test]
    async fn capacity_is_ignored_by_default() {
        let store = store();
        for who in ["b@mergington.edu", "c@mergington.edu", "d@mergington.edu"] {
            signup(&store, "Tiny Club", &email(who), SignupPolicy::default())
                .await
                .unwrap();
        }
        assert_eq!(store.participants("Tiny Club").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn capacity_enforced_when_enabled() {
        let store = store();
        let policy = SignupPolicy {
            enforce_capacity: true,
        };
        signup(&store, "Tiny Club", &email("b@mergington.edu"), policy)
            .await
            .unwrap();
        let err = signup(&store, "Tiny Club", &email("c@mergington.edu"), policy)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActivityError::ActivityFull {
                activity: "Tiny Club".to_string()
            }
        );
        assert!(err.to_string().contains("full"));
        assert_eq!(store.participants("Tiny Club").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn signup_unregister_signup_cycle() {
        let store = store();
        let e = email("cycle@mergington.edu");
        signup(&store, "Chess Club", &e, SignupPolicy::default())
            .await
            .unwrap();
        unregister(&store, "Chess Club", &e).await.unwrap();
        signup(&store, "Chess Club", &e, SignupPolicy::default())
            .await
            .unwrap();
        let participants = store.participants("Chess Club").await.unwrap();
        assert_eq!(participants.last().map(String::as_str), Some("cycle@mergington.edu"));
        assert_eq!(participants.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_do_not_lose_updates() {
        let store = store();
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let e = email(&format!("student{}@mergington.edu", i));
                signup(&store, "Chess Club", &e, SignupPolicy::default()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.participants("Chess Club").await.unwrap().len(), 52);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_signups_land_once() {
        let store = store();
        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                signup(&store, "Chess Club", &email("same@mergington.edu"), SignupPolicy::default()).await
            }));
        }
        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        let participants = store.participants("Chess Club").await.unwrap();
        assert_eq!(participants.iter().filter(|p| *p == "same@mergington.edu").count(), 1);
    }

    #[test]
    fn blank_email_is_rejected() {
        assert_eq!(ParticipantEmail::parse(""), Err(ActivityError::InvalidEmail));
        assert_eq!(ParticipantEmail::parse("   "), Err(ActivityError::InvalidEmail));
        assert_eq!(email("a@b.edu").as_str(), "a@b.edu");
    }
}
