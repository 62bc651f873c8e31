//! In-progress workout built step by step: pick a day, pick exercises, adjust
//! sets, then [`WorkoutDraft::build`] a [`Workout`] ready to save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_response::AppResponse;
use crate::exercise_catalog::find_template;
use crate::workout_model::{DayType, Exercise, Workout, WorkoutSet};

/// Set count used when a name has no template, or its template says zero.
pub const FALLBACK_SET_COUNT: u32 = 2;
/// Reps pre-filled into every new set.
pub const DEFAULT_REPS: u32 = 10;

fn default_set() -> WorkoutSet {
    WorkoutSet::new(DEFAULT_REPS, Some(0.0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftExercise {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDraft {
    pub day_type: DayType,
    /// Selected exercises in the order they were picked.
    #[serde(default)]
    pub exercises: Vec<DraftExercise>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl WorkoutDraft {
    pub fn new(day_type: DayType) -> Self {
        Self {
            day_type,
            exercises: Vec::new(),
            notes: String::new(),
            duration: None,
        }
    }

    /// Switching to another day drops the current selection, since its
    /// exercises belong to the previous day's templates.
    pub fn select_day(&mut self, day_type: DayType) {
        if self.day_type != day_type {
            self.day_type = day_type;
            self.exercises.clear();
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.exercises.iter().any(|exercise| exercise.name == name)
    }

    /// Selects `name` with its template's default sets, or deselects it.
    /// Returns whether the exercise is selected afterwards.
    pub fn toggle_exercise(&mut self, name: &str) -> bool {
        if let Some(index) = self.exercises.iter().position(|exercise| exercise.name == name) {
            self.exercises.remove(index);
            return false;
        }

        let count = find_template(self.day_type, name)
            .map(|template| template.default_sets)
            .filter(|&sets| sets > 0)
            .unwrap_or(FALLBACK_SET_COUNT);

        self.exercises.push(DraftExercise {
            name: name.to_string(),
            sets: (0..count).map(|_| default_set()).collect(),
        });
        true
    }

    pub fn sets(&self, name: &str) -> Option<&[WorkoutSet]> {
        self.exercises
            .iter()
            .find(|exercise| exercise.name == name)
            .map(|exercise| exercise.sets.as_slice())
    }

    pub fn add_set(&mut self, name: &str) -> Result<(), AppResponse> {
        self.selected_mut(name)?.sets.push(default_set());
        Ok(())
    }

    pub fn remove_set(&mut self, name: &str, index: usize) -> Result<WorkoutSet, AppResponse> {
        let exercise = self.selected_mut(name)?;
        if index >= exercise.sets.len() {
            return Err(set_out_of_range(name, index));
        }
        Ok(exercise.sets.remove(index))
    }

    pub fn update_set(&mut self, name: &str, index: usize, set: WorkoutSet) -> Result<(), AppResponse> {
        let slot = self
            .selected_mut(name)?
            .sets
            .get_mut(index)
            .ok_or_else(|| set_out_of_range(name, index))?;
        *slot = set;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Turns the draft into a new workout owned by `user_id`, dated `now`.
    pub fn build(&self, user_id: &str, now: DateTime<Utc>) -> Result<Workout, AppResponse> {
        if self.exercises.is_empty() {
            return Err(AppResponse::ValidationError(
                "Select at least one exercise before saving".to_string(),
            ));
        }

        let exercises = self
            .exercises
            .iter()
            .map(|exercise| Exercise {
                id: format!("exercise-{}", Uuid::new_v4()),
                name: exercise.name.clone(),
                sets: exercise.sets.clone(),
                notes: None,
            })
            .collect();

        let notes = self.notes.trim();

        Ok(Workout {
            id: format!("workout-{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            date: now,
            day_type: self.day_type,
            exercises,
            duration: self.duration,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            created_at: now,
            updated_at: now,
        })
    }

    fn selected_mut(&mut self, name: &str) -> Result<&mut DraftExercise, AppResponse> {
        self.exercises
            .iter_mut()
            .find(|exercise| exercise.name == name)
            .ok_or_else(|| AppResponse::NotFound(format!("Exercise not selected: {name}")))
    }
}

fn set_out_of_range(name: &str, index: usize) -> AppResponse {
    AppResponse::BadRequest(format!("Set {index} does not exist for {name}"))
}
