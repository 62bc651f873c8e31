//! # Workout Log Core
//!
//! Local storage and identity core for an offline workout tracker. The whole
//! application state (accounts, the active session and every logged workout)
//! lives in one JSON document kept in an LMDB environment. Front ends (Flutter,
//! web views, desktop shells) drive it through the C-compatible functions
//! below; Rust callers can use [`AuthContext`] and [`WorkoutStore`] directly.
//!
//! ## Layers
//!
//! - [`kv_store`]: string get/set primitive, with LMDB ([`local_db_state`]) and in-memory backends
//! - [`document_store`]: whole-document read/write that never surfaces storage errors
//! - [`workout_store`]: user, session and workout accessors
//! - [`auth_context`]: register/login/logout over salted Argon2 digests ([`credentials`])
//! - [`exercise_catalog`], [`workout_draft`], [`workout_stats`]: templates, the
//!   new-workout builder and history summaries
//!
//! ## FFI Functions
//!
//! Every function returns a JSON-encoded [`AppResponse`] as a heap C string
//! that must be released with [`free_response`].
//!
//! - [`create_app`] / [`close_app`] - Open and close the store
//! - [`register_user`], [`login_user`], [`logout_user`], [`current_user`] - Session
//! - [`save_workout`], [`build_workout`] - Upsert a workout / save a draft
//! - [`list_workouts`], [`get_workout`], [`delete_workout`] - History
//! - [`exercise_templates`], [`dashboard_summary`], [`archive_summary`] - Reference data and summaries

pub mod app_response;
pub mod auth_context;
pub mod credentials;
pub mod document_store;
pub mod exercise_catalog;
pub mod kv_store;
pub mod local_db_state;
pub mod store_config;
pub mod workout_draft;
pub mod workout_model;
pub mod workout_stats;
pub mod workout_store;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use chrono::Utc;
use log::{info, warn};
use serde::Serialize;

pub use crate::app_response::AppResponse;
pub use crate::auth_context::AuthContext;
pub use crate::local_db_state::AppDbState;
pub use crate::store_config::StoreConfig;
pub use crate::workout_store::WorkoutStore;

use crate::exercise_catalog::templates_for;
use crate::workout_draft::WorkoutDraft;
use crate::workout_model::{DayType, Workout};
use crate::workout_stats::{filter_by_day, ArchiveSummary, DashboardSummary};

/// Handle returned by [`create_app`]: an auth context over the LMDB store.
pub type LocalApp = AuthContext<AppDbState>;

/// Opens (or creates) the store and restores the persisted session.
///
/// `config` is either a JSON [`StoreConfig`] object or a bare path; the data
/// lands in `<path>.lmdb/`. Returns a null pointer on any failure. The handle
/// must be released with [`close_app`].
///
/// # Safety
///
/// `config` must be null or a valid C string.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_app(config: *const c_char) -> *mut LocalApp {
    if config.is_null() {
        warn!("Null config pointer passed to create_app");
        return std::ptr::null_mut();
    }

    let raw = match unsafe { CStr::from_ptr(config).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    let config = match StoreConfig::from_json_or_path(raw) {
        Ok(config) => config,
        Err(e) => {
            warn!("Rejected store config: {e}");
            return std::ptr::null_mut();
        }
    };

    match AppDbState::init(&config) {
        Ok(db) => {
            let store = WorkoutStore::new(db, config.storage_key.clone());
            info!("Store ready at {}", config.env_dir().display());
            Box::into_raw(Box::new(AuthContext::init(store)))
        }
        Err(e) => {
            warn!("Failed to initialize store: {e}");
            warn!("Attempted path: {}", config.env_dir().display());
            std::ptr::null_mut()
        }
    }
}

/// Creates an account and logs it in.
///
/// # Parameters
///
/// * `app` - Handle returned by [`create_app`]
/// * `username` - Null-terminated UTF-8 username; surrounding whitespace is trimmed
/// * `password` - Null-terminated UTF-8 password
///
/// # Returns
///
/// `Ok` with the new user as JSON. The returned string must be released with
/// [`free_response`].
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `ValidationError` for an empty username or password
/// - `Conflict` when the username is taken
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn register_user(app: *mut LocalApp, username: *const c_char, password: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "register_user") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let username = match c_ptr_to_string(username, "username") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let password = match c_ptr_to_string(password, "password") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond(app.register(&username, &password))
}

/// Logs in an existing account.
///
/// # Returns
///
/// `Ok` with the user as JSON.
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `Unauthorized("Invalid credentials")` for an unknown user or a wrong
///   password alike
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn login_user(app: *mut LocalApp, username: *const c_char, password: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "login_user") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let username = match c_ptr_to_string(username, "username") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let password = match c_ptr_to_string(password, "password") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond(app.login(&username, &password))
}

/// Clears the persisted session. Succeeds even when nobody is logged in.
///
/// # Safety
///
/// `app` must be null or a live handle from [`create_app`].
///
/// # Errors
///
/// `BadRequest` for a null handle.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn logout_user(app: *mut LocalApp) -> *const c_char {
    let app = match app_from_ptr(app, "logout_user") {
        Ok(app) => app,
        Err(err) => return err,
    };

    app.logout();
    response_to_c_string(&AppResponse::success("Logged out"))
}

/// Returns the logged-in user as JSON.
///
/// # Safety
///
/// `app` must be null or a live handle from [`create_app`].
///
/// # Errors
///
/// - `BadRequest` for a null handle
/// - `NotFound` when nobody is logged in
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn current_user(app: *mut LocalApp) -> *const c_char {
    let app = match app_from_ptr(app, "current_user") {
        Ok(app) => app,
        Err(err) => return err,
    };

    respond(
        app.current_user()
            .ok_or_else(|| AppResponse::NotFound("No user is logged in".to_string())),
    )
}

/// Inserts or replaces a workout by id.
///
/// The workout's `userId` must be the current user, and an existing workout
/// stored under the same id must belong to the current user as well.
///
/// # JSON Format
///
/// ```json
/// {
///   "id": "workout-1",
///   "userId": "user-...",
///   "date": "2024-01-15T10:30:00Z",
///   "dayType": "Push",
///   "exercises": [{"id": "e1", "name": "Bench", "sets": [{"reps": 8, "weight": 40.0, "completed": false}]}],
///   "notes": "optional",
///   "createdAt": "2024-01-15T10:30:00Z",
///   "updatedAt": "2024-01-15T10:30:00Z"
/// }
/// ```
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `SerializationError` for malformed JSON
/// - `Unauthorized` without a session, or when `userId` is someone else
/// - `NotFound` when the id is already taken by another user's workout
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_workout(app: *mut LocalApp, workout_json: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "save_workout") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let json_str = match c_ptr_to_string(workout_json, "JSON") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let workout: Workout = match serde_json::from_str(&json_str) {
        Ok(w) => w,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let result = app.require_user().and_then(|user| {
        if workout.user_id != user.id {
            return Err(AppResponse::Unauthorized(
                "Workout belongs to another user".to_string(),
            ));
        }

        let foreign = app
            .store()
            .find_workout(&workout.id)
            .is_some_and(|existing| existing.user_id != user.id);
        if foreign {
            return Err(AppResponse::NotFound(format!(
                "No workout found with id: {}",
                workout.id
            )));
        }
        Ok(())
    });

    respond(result.map(|()| {
        app.store().save_workout(&workout);
        workout
    }))
}

/// Builds a workout from a serialized [`WorkoutDraft`] for the current user
/// and saves it.
///
/// # Returns
///
/// `Ok` with the saved workout as JSON.
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `SerializationError` for a malformed draft
/// - `Unauthorized` without a session
/// - `ValidationError` when the draft has no exercises
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn build_workout(app: *mut LocalApp, draft_json: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "build_workout") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let json_str = match c_ptr_to_string(draft_json, "JSON") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let draft: WorkoutDraft = match serde_json::from_str(&json_str) {
        Ok(d) => d,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid draft JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let result = app
        .require_user()
        .and_then(|user| draft.build(&user.id, Utc::now()))
        .map(|workout| {
            app.store().save_workout(&workout);
            workout
        });

    respond(result)
}

/// Current user's workouts, newest first.
///
/// # Parameters
///
/// * `app` - Handle returned by [`create_app`]
/// * `day` - Day type to keep, or null for all days
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for a null handle or invalid UTF-8
/// - `ValidationError` for an unknown day type
/// - `Unauthorized` without a session
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_workouts(app: *mut LocalApp, day: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "list_workouts") {
        Ok(app) => app,
        Err(err) => return err,
    };

    let day = match optional_day(day) {
        Ok(day) => day,
        Err(err) => return err,
    };

    respond(
        app.require_user()
            .map(|user| filter_by_day(&app.store().workouts_for_user(&user.id), day)),
    )
}

/// A workout of the current user by id.
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `Unauthorized` without a session
/// - `NotFound` on a miss or when the workout belongs to someone else
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_workout(app: *mut LocalApp, id: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "get_workout") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let id_str = match c_ptr_to_string(id, "id") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let result = app.require_user().and_then(|user| {
        app.store()
            .find_workout(&id_str)
            .filter(|workout| workout.user_id == user.id)
            .ok_or_else(|| AppResponse::NotFound(format!("No workout found with id: {id_str}")))
    });

    respond(result)
}

/// Deletes one of the current user's workouts by id.
///
/// # Parameters
///
/// * `app` - Handle returned by [`create_app`]
/// * `id` - Null-terminated workout id
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for null pointers or invalid UTF-8
/// - `Unauthorized` without a session
/// - `NotFound` on a miss or when the workout belongs to someone else
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_workout(app: *mut LocalApp, id: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "delete_workout") {
        Ok(app) => app,
        Err(err) => return err,
    };
    let id_str = match c_ptr_to_string(id, "id") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let user = match app.require_user() {
        Ok(user) => user,
        Err(e) => return response_to_c_string(&e),
    };

    let owned = app
        .store()
        .find_workout(&id_str)
        .is_some_and(|workout| workout.user_id == user.id);

    if owned && app.store().delete_workout(&id_str) {
        response_to_c_string(&AppResponse::success("Workout deleted successfully"))
    } else {
        response_to_c_string(&AppResponse::NotFound(format!("No workout found with id: {id_str}")))
    }
}

/// Templates for a day type (`Push`, `Pull`, `Leg` or `Upper`).
///
/// # Safety
///
/// `day` must be null or a valid C string.
///
/// # Errors
///
/// - `BadRequest` for a null pointer or invalid UTF-8
/// - `ValidationError` for an unknown day type
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn exercise_templates(day: *const c_char) -> *const c_char {
    let day = match c_ptr_to_string(day, "day") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond(day.parse::<DayType>().map(templates_for))
}

/// Dashboard figures for the current user: total count, workouts in the
/// last seven days, the latest workout date and the five most recent workouts.
///
/// # Safety
///
/// `app` must be null or a live handle from [`create_app`].
///
/// # Errors
///
/// - `BadRequest` for a null handle
/// - `Unauthorized` without a session
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn dashboard_summary(app: *mut LocalApp) -> *const c_char {
    let app = match app_from_ptr(app, "dashboard_summary") {
        Ok(app) => app,
        Err(err) => return err,
    };

    respond(app.require_user().map(|user| {
        let workouts = app.store().workouts_for_user(&user.id);
        DashboardSummary::from_workouts(&workouts, Utc::now())
    }))
}

/// Archive figures for the current user: total count, workouts this calendar
/// month, and the history filtered by day type.
///
/// # Parameters
///
/// * `app` - Handle returned by [`create_app`]
/// * `day` - Day type to keep in `workouts`, or null for all days
///
/// # Safety
///
/// All pointers must be null or valid for the duration of the call.
///
/// # Errors
///
/// - `BadRequest` for a null handle or invalid UTF-8
/// - `ValidationError` for an unknown day type
/// - `Unauthorized` without a session
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn archive_summary(app: *mut LocalApp, day: *const c_char) -> *const c_char {
    let app = match app_from_ptr(app, "archive_summary") {
        Ok(app) => app,
        Err(err) => return err,
    };

    let day = match optional_day(day) {
        Ok(day) => day,
        Err(err) => return err,
    };

    respond(app.require_user().map(|user| {
        let workouts = app.store().workouts_for_user(&user.id);
        ArchiveSummary::from_workouts(&workouts, day, Utc::now())
    }))
}

/// Syncs the environment and frees the handle.
///
/// # Safety
///
/// `app` must be null or a live handle from [`create_app`]. The pointer is
/// dangling afterwards and must not be used again.
///
/// # Errors
///
/// - `BadRequest` for a null handle
/// - `DatabaseError` when the final sync fails
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_app(app: *mut LocalApp) -> *const c_char {
    if app.is_null() {
        let error = AppResponse::BadRequest("Null app pointer passed to close_app".to_string());
        return response_to_c_string(&error);
    }

    let app = unsafe { Box::from_raw(app) };
    match app.into_store().into_backend().close_database() {
        Ok(()) => response_to_c_string(&AppResponse::success("Store closed successfully")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function of this library.
///
/// # Safety
///
/// `ptr` must be null or a string returned by this library that has not been
/// freed yet.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr as *mut c_char));
    }
}

/// Null means no filter; anything else must name a day type.
fn optional_day(day: *const c_char) -> Result<Option<DayType>, *const c_char> {
    if day.is_null() {
        return Ok(None);
    }

    match c_ptr_to_string(day, "day")?.parse::<DayType>() {
        Ok(day) => Ok(Some(day)),
        Err(e) => Err(response_to_c_string(&e)),
    }
}

fn app_from_ptr<'a>(app: *mut LocalApp, caller: &str) -> Result<&'a mut LocalApp, *const c_char> {
    match unsafe { app.as_mut() } {
        Some(app) => Ok(app),
        None => {
            let error = AppResponse::BadRequest(format!("Null app pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Wraps a successful value as `Ok(<json>)`, or passes the error through.
fn respond<T: Serialize>(result: Result<T, AppResponse>) -> *const c_char {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
            Err(e) => {
                let error = AppResponse::SerializationError(format!("Failed to serialize result: {e}"));
                response_to_c_string(&error)
            }
        },
        Err(e) => response_to_c_string(&e),
    }
}

/// Serializes the response to JSON and hands ownership of the C string to the
/// caller. Null if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Copies a C string argument, reporting null pointers and invalid UTF-8 as
/// `BadRequest` responses.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
