// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Minutes allowed for a quiz when the author does not set a limit.
pub const DEFAULT_TIME_LIMIT_MINUTES: i32 = 30;

/// Points awarded for a question when the author does not set a value.
pub const DEFAULT_QUESTION_POINTS: i32 = 1;

pub const MAX_QUESTIONS_PER_QUIZ: usize = 100;

/// Assignments due within this window get reminder notices.
pub const REMINDER_WINDOW_HOURS: i64 = 48;

/// Stored as the submission body when a learner only uploads a file.
pub const DEFAULT_SUBMISSION_CONTENT: &str = "File submission";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub rust_log: String,
    pub log_dir: String,
    pub server_port: u16,
    /// Whether a learner may submit the same quiz more than once.
    pub allow_retakes: bool,
    pub seed_sample_quizzes: bool,
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);

        let allow_retakes = flag("ALLOW_RETAKES", true);
        let seed_sample_quizzes = flag("SEED_SAMPLE_QUIZZES", false);

        let static_dir = env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty());

        Self {
            database_url,
            rust_log,
            log_dir,
            server_port,
            allow_retakes,
            seed_sample_quizzes,
            static_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            server_port: 3000,
            allow_retakes: true,
            seed_sample_quizzes: false,
            static_dir: None,
        }
    }
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_flag_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn default_config_allows_retakes() {
        let config = Config::default();
        assert!(config.allow_retakes);
        assert!(config.database_url.is_none());
    }
}
