//! Constraint registry: the single source of truth for field bounds and patterns.
//!
//! Every schema in [`crate::schemas`] pulls its limits from here. Length bounds
//! are inclusive character counts; numeric bounds are inclusive on both ends.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// User
// ============================================================================

pub mod user {
    /// Maximum length of an email address
    pub const EMAIL_MAX: usize = 255;

    /// Minimum username length
    pub const USERNAME_MIN: usize = 3;

    /// Maximum username length
    pub const USERNAME_MAX: usize = 50;

    /// Minimum password length for new passwords
    pub const PASSWORD_MIN: usize = 8;

    /// Maximum password length
    pub const PASSWORD_MAX: usize = 100;

    /// Maximum first/last name length
    pub const NAME_MAX: usize = 50;

    /// Maximum bio length
    pub const BIO_MAX: usize = 500;

    /// Minimum daily study goal in minutes
    pub const DAILY_GOAL_MIN: i32 = 5;

    /// Maximum daily study goal in minutes (8 hours)
    pub const DAILY_GOAL_MAX: i32 = 480;
}

// ============================================================================
// Skill
// ============================================================================

pub mod skill {
    pub const NAME_MIN: usize = 2;
    pub const NAME_MAX: usize = 50;
    pub const DESCRIPTION_MAX: usize = 1000;
    pub const CATEGORY_MIN: usize = 2;
    pub const CATEGORY_MAX: usize = 50;

    /// Accumulated experience points never go negative
    pub const EXPERIENCE_MIN: i32 = 0;

    pub const PROGRESS_MIN: f64 = 0.0;
    pub const PROGRESS_MAX: f64 = 100.0;
}

// ============================================================================
// Learning (study sessions, projects, goals, study plans)
// ============================================================================

pub mod learning {
    /// Shortest recordable study session in minutes
    pub const SESSION_DURATION_MIN: i32 = 1;

    /// Longest recordable study session in minutes (8 hours)
    pub const SESSION_DURATION_MAX: i32 = 480;

    pub const EFFICIENCY_MIN: i32 = 0;
    pub const EFFICIENCY_MAX: i32 = 100;

    pub const MOOD_MIN: i32 = 1;
    pub const MOOD_MAX: i32 = 5;

    pub const NOTES_MAX: usize = 1000;

    /// Title bounds shared by projects, goals and study plans
    pub const TITLE_MIN: usize = 2;
    pub const TITLE_MAX: usize = 100;

    /// Description bound shared by projects, goals and study plans
    pub const DESCRIPTION_MAX: usize = 2000;

    /// Maximum number of skills linked to one project
    pub const PROJECT_SKILLS_MAX: usize = 20;
}

// ============================================================================
// Community (communities, posts, reviews)
// ============================================================================

pub mod community {
    pub const NAME_MIN: usize = 3;
    pub const NAME_MAX: usize = 50;
    pub const DESCRIPTION_MAX: usize = 1000;

    pub const POST_TITLE_MIN: usize = 3;
    pub const POST_TITLE_MAX: usize = 200;
    pub const POST_CONTENT_MIN: usize = 10;
    pub const POST_CONTENT_MAX: usize = 10_000;

    pub const POST_TAGS_MAX: usize = 10;
    pub const TAG_MIN: usize = 1;
    pub const TAG_MAX: usize = 30;

    pub const REVIEW_TITLE_MIN: usize = 5;
    pub const REVIEW_TITLE_MAX: usize = 100;
    pub const REVIEW_CONTENT_MIN: usize = 10;
    pub const REVIEW_CONTENT_MAX: usize = 2000;

    pub const RATING_MIN: i32 = 1;
    pub const RATING_MAX: i32 = 5;
}

// ============================================================================
// Settings
// ============================================================================

pub mod settings {
    pub const DISPLAY_NAME_MIN: usize = 2;
    pub const DISPLAY_NAME_MAX: usize = 50;

    pub const TIMEZONE_MIN: usize = 1;
    pub const TIMEZONE_MAX: usize = 50;

    /// Language tags such as `en` or `pt-BR`
    pub const LANGUAGE_MIN: usize = 2;
    pub const LANGUAGE_MAX: usize = 10;

    /// Idle session timeout in minutes
    pub const SESSION_TIMEOUT_MIN: i32 = 5;
    pub const SESSION_TIMEOUT_MAX: i32 = 1440;

    pub const WEEKLY_GOAL_HOURS_MIN: i32 = 1;
    pub const WEEKLY_GOAL_HOURS_MAX: i32 = 168;
}

// ============================================================================
// Patterns
// ============================================================================

/// Username charset
pub const USERNAME_PATTERN_SRC: &str = r"^[a-zA-Z0-9_]+$";

/// 24-hour `HH:MM` time of day; the hour may be written with one digit
pub const TIME_OF_DAY_PATTERN_SRC: &str = r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$";

/// Opaque identifier: `c` followed by 24 lowercase alphanumerics
pub const OPAQUE_ID_PATTERN_SRC: &str = r"^c[a-z0-9]{24}$";

/// Fixed length of an opaque identifier
pub const OPAQUE_ID_LEN: usize = 25;

/// `#RRGGBB` colour
pub const HEX_COLOR_PATTERN_SRC: &str = r"^#[0-9a-fA-F]{6}$";

pub const EMAIL_PATTERN_SRC: &str =
    r"^[A-Za-z0-9](?:[A-Za-z0-9._%+-]*[A-Za-z0-9_%+-])?@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

pub static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(USERNAME_PATTERN_SRC).expect("username pattern is valid"));

pub static TIME_OF_DAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(TIME_OF_DAY_PATTERN_SRC).expect("time pattern is valid"));

pub static OPAQUE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(OPAQUE_ID_PATTERN_SRC).expect("id pattern is valid"));

pub static HEX_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(HEX_COLOR_PATTERN_SRC).expect("color pattern is valid"));

pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN_SRC).expect("email pattern is valid"));

// ============================================================================
// Compile-time Checks
// ============================================================================

const _: () = {
    assert!(user::USERNAME_MIN <= user::USERNAME_MAX);
    assert!(user::PASSWORD_MIN <= user::PASSWORD_MAX);
    assert!(user::DAILY_GOAL_MIN <= user::DAILY_GOAL_MAX);
    assert!(
        user::DAILY_GOAL_MAX == learning::SESSION_DURATION_MAX,
        "daily goal and session duration share the 8 hour cap"
    );
};

const _: () = {
    assert!(skill::NAME_MIN <= skill::NAME_MAX);
    assert!(skill::CATEGORY_MIN <= skill::CATEGORY_MAX);
    assert!(learning::TITLE_MIN <= learning::TITLE_MAX);
    assert!(learning::MOOD_MIN <= learning::MOOD_MAX);
};

const _: () = {
    assert!(community::NAME_MIN <= community::NAME_MAX);
    assert!(community::POST_TITLE_MIN <= community::POST_TITLE_MAX);
    assert!(community::POST_CONTENT_MIN <= community::POST_CONTENT_MAX);
    assert!(community::REVIEW_TITLE_MIN <= community::REVIEW_TITLE_MAX);
    assert!(community::RATING_MIN <= community::RATING_MAX);
    assert!(settings::SESSION_TIMEOUT_MIN <= settings::SESSION_TIMEOUT_MAX);
};
