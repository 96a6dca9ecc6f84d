use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Activity, ActivityDirectory};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid seed file {path}: {email} is listed twice in {activity}")]
    DuplicateParticipant {
        path: PathBuf,
        activity: String,
        email: String,
    },
}

/// One entry of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl From<SeedRecord> for Activity {
    fn from(r: SeedRecord) -> Self {
        Activity {
            name: r.name,
            description: r.description,
            schedule: r.schedule,
            max_participants: r.max_participants,
            participants: r.participants,
        }
    }
}

impl From<&Activity> for SeedRecord {
    fn from(a: &Activity) -> Self {
        SeedRecord {
            name: a.name.clone(),
            description: a.description.clone(),
            schedule: a.schedule.clone(),
            max_participants: a.max_participants,
            participants: a.participants.clone(),
        }
    }
}

/// The activities offered at Mergington High School when no seed file is configured.
pub fn default_activities() -> Vec<Activity> {
    vec![
        Activity::new(
            "Basketball Team",
            "Competitive basketball team that plays in the regional league",
            "Mondays and Wednesdays, 4:00 PM - 6:00 PM",
            15,
            &["alex@mergington.edu"],
        ),
        Activity::new(
            "Tennis Club",
            "Learn tennis techniques and play friendly matches",
            "Tuesdays and Thursdays, 3:30 PM - 5:00 PM",
            10,
            &["grace@mergington.edu"],
        ),
        Activity::new(
            "Art Studio",
            "Explore painting, drawing and sculpture with guided projects",
            "Wednesdays, 3:30 PM - 5:00 PM",
            18,
            &["lily@mergington.edu"],
        ),
        Activity::new(
            "Music Band",
            "Rehearse and perform with the school band at events",
            "Tuesdays, 4:00 PM - 5:30 PM",
            25,
            &["noah@mergington.edu", "mia@mergington.edu"],
        ),
        Activity::new(
            "Debate Team",
            "Develop public speaking and argumentation skills in tournaments",
            "Thursdays, 3:30 PM - 5:00 PM",
            12,
            &["ava@mergington.edu"],
        ),
        Activity::new(
            "Robotics Club",
            "Design, build and program robots for competitions",
            "Fridays, 3:30 PM - 5:30 PM",
            14,
            &["ethan@mergington.edu"],
        ),
        Activity::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
        Activity::new(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        Activity::new(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
    ]
}

/// Parses a seed file: a JSON array of [`SeedRecord`]s.
///
/// A roster listing the same email twice is rejected.
pub fn parse_seed(path: &Path, contents: &str) -> Result<ActivityDirectory, SeedError> {
    let records: Vec<SeedRecord> =
        serde_json::from_str(contents).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for record in &records {
        for (i, email) in record.participants.iter().enumerate() {
            if record.participants[..i].contains(email) {
                return Err(SeedError::DuplicateParticipant {
                    path: path.to_path_buf(),
                    activity: record.name.clone(),
                    email: email.clone(),
                });
            }
        }
    }

    Ok(ActivityDirectory::new(
        records.into_iter().map(Activity::from).collect(),
    ))
}

/// Renders activities in the seed file layout read by [`parse_seed`].
pub fn render_seed(activities: &[Activity]) -> serde_json::Result<String> {
    let records: Vec<SeedRecord> = activities.iter().map(SeedRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

pub fn load_seed_file(path: &Path) -> Result<ActivityDirectory, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed(path, &contents)
}

/// Seed file when configured, built-in activities otherwise.
pub fn load_directory(seed_file: Option<&Path>) -> Result<ActivityDirectory, SeedError> {
    match seed_file {
        Some(path) => {
            let directory = load_seed_file(path)?;
            tracing::info!(path = %path.display(), activities = directory.len(), "loaded seed file");
            Ok(directory)
        }
        None => Ok(ActivityDirectory::new(default_activities())),
    }
}
