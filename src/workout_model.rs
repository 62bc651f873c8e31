//! Data model for the persisted workout document.
//!
//! Everything the application stores lives in one [`StoreDocument`]. Field
//! names serialize in camelCase so the JSON matches what front ends already
//! read (`currentUserId`, `dayType`, `createdAt`, ...).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// Training split a workout and its exercise templates belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    Push,
    Pull,
    Leg,
    Upper,
}

impl DayType {
    pub const ALL: [DayType; 4] = [DayType::Push, DayType::Pull, DayType::Leg, DayType::Upper];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Push => "Push",
            DayType::Pull => "Pull",
            DayType::Leg => "Leg",
            DayType::Upper => "Upper",
        }
    }
}

impl Display for DayType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = AppResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayType::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppResponse::ValidationError(format!("Unknown day type: {s}")))
    }
}

/// A registered local account. Never mutated after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string; older documents stored this under `password`.
    #[serde(alias = "password")]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

/// One set of an exercise. Weight is in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

impl WorkoutSet {
    pub fn new(reps: u32, weight: Option<f64>) -> Self {
        Self { reps, weight, completed: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub day_type: DayType,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Length of the session in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|exercise| exercise.sets.len()).sum()
    }
}

/// The single document holding all application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    pub last_sync: DateTime<Utc>,
    /// Bumped on every successful write.
    #[serde(default)]
    pub revision: u64,
}

impl StoreDocument {
    /// Empty document: no users, no workouts, nobody logged in.
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            users: Vec::new(),
            current_user_id: None,
            workouts: Vec::new(),
            last_sync: now,
            revision: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.workouts.is_empty() && self.current_user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_type_parses_case_insensitively() {
        assert_eq!("push".parse::<DayType>().unwrap(), DayType::Push);
        assert_eq!(" UPPER ".parse::<DayType>().unwrap(), DayType::Upper);
        assert!(matches!("Cardio".parse::<DayType>(), Err(AppResponse::ValidationError(_))));
    }

    #[test]
    fn legacy_document_layout_loads() {
        let raw = r#"{
            "users": [{"id":"user-1","username":"alice","password":"abc","createdAt":"2024-01-15T10:30:00.000Z"}],
            "currentUserId": "user-1",
            "workouts": [{
                "id": "workout-1",
                "userId": "user-1",
                "date": "2024-01-15T10:30:00.000Z",
                "dayType": "Push",
                "exercises": [{"id":"e1","name":"Bench","sets":[{"reps":8,"weight":40,"completed":false}],"notes":""}],
                "notes": "felt strong",
                "createdAt": "2024-01-15T10:30:00.000Z",
                "updatedAt": "2024-01-15T10:30:00.000Z"
            }],
            "lastSync": "2024-01-15T10:30:00.000Z"
        }"#;

        let doc: StoreDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.users[0].password_digest, "abc");
        assert_eq!(doc.current_user_id.as_deref(), Some("user-1"));
        assert_eq!(doc.workouts[0].day_type, DayType::Push);
        assert_eq!(doc.workouts[0].exercises[0].sets[0].weight, Some(40.0));
        assert_eq!(doc.workouts[0].total_sets(), 1);
        assert_eq!(doc.revision, 0);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let doc = StoreDocument::default_at(Utc::now());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("currentUserId").is_some());
        assert!(json.get("lastSync").is_some());
        assert!(doc.is_empty());
    }
}
