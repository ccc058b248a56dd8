// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

/// Default number of results a user may hold per exam (no retakes).
pub const DEFAULT_MAX_ATTEMPTS_PER_EXAM: u32 = 1;

/// Default leaderboard size when the client does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Hard cap on leaderboard size.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// How many results one user may create for the same exam.
    pub max_attempts_per_exam: u32,
    /// Attempts made for each statistics write before it is given up on.
    pub stats_retry_attempts: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 86_400),
            rust_log,
            port: parse_or("PORT", 3000),
            max_attempts_per_exam: parse_or(
                "MAX_ATTEMPTS_PER_EXAM",
                DEFAULT_MAX_ATTEMPTS_PER_EXAM,
            ),
            stats_retry_attempts: parse_or("STATS_RETRY_ATTEMPTS", 3),
        }
    }

    pub fn attempt_policy(&self) -> AttemptPolicy {
        AttemptPolicy::new(self.max_attempts_per_exam)
    }
}

/// Reads an optional numeric variable, falling back when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", raw, key);
            default
        }),
        Err(_) => default,
    }
}

/// Retake rule applied by the submission processor.
///
/// With the default limit of 1 the first submission for a (user, exam)
/// pair is the only one ever stored; later submissions resolve to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    pub max_attempts_per_exam: u32,
}

impl AttemptPolicy {
    pub fn new(max_attempts_per_exam: u32) -> Self {
        Self {
            max_attempts_per_exam: max_attempts_per_exam.max(1),
        }
    }
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS_PER_EXAM)
    }
}
