use crate::{
    config::Config,
    services::{
        analytics::Analytics, attempts::AttemptLog, catalog::QuizCatalog, coursework::Coursework,
        faculty::FacultyDirectory, roster::Roster,
    },
    store::{AttemptPolicy, Store},
};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self { store, config }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for QuizCatalog {
    fn from_ref(state: &AppState) -> Self {
        QuizCatalog::new(state.store.quizzes.clone())
    }
}

impl FromRef<AppState> for AttemptLog {
    fn from_ref(state: &AppState) -> Self {
        AttemptLog::new(
            &state.store,
            AttemptPolicy::from_flag(state.config.allow_retakes),
        )
    }
}

impl FromRef<AppState> for Analytics {
    fn from_ref(state: &AppState) -> Self {
        Analytics::new(&state.store)
    }
}

impl FromRef<AppState> for Roster {
    fn from_ref(state: &AppState) -> Self {
        Roster::new(state.store.learners.clone())
    }
}

impl FromRef<AppState> for Coursework {
    fn from_ref(state: &AppState) -> Self {
        Coursework::new(&state.store)
    }
}

impl FromRef<AppState> for FacultyDirectory {
    fn from_ref(state: &AppState) -> Self {
        FacultyDirectory::new(state.store.faculty.clone())
    }
}
