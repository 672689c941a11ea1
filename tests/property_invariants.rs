//! Property-based invariants of the validation engine.
//!
//! - Length bounds accept exactly the inclusive range
//! - Closed token sets accept only declared tokens
//! - Validation is deterministic and its output validates again
//! - Times of day are accepted exactly when they denote a real clock time

use proptest::prelude::*;
use serde_json::json;
use skilltrack_schema::schemas::enums::{Difficulty, Role};
use skilltrack_schema::schemas::{community, skill, user};
use skilltrack_schema::validation::constants::{TIME_OF_DAY_PATTERN, user as limits};
use skilltrack_schema::validation::validate;
use strum::VariantNames;

fn registration(username: &str, role: &str) -> serde_json::Value {
    json!({
        "email": "jane@example.com",
        "username": username,
        "password": "correct-horse",
        "role": role,
    })
}

proptest! {
    #[test]
    fn username_length_matches_bounds(len in 0usize..80) {
        let username = "u".repeat(len);
        let outcome = validate(&user::create(), &registration(&username, "USER"));
        let in_range = (limits::USERNAME_MIN..=limits::USERNAME_MAX).contains(&len);
        prop_assert_eq!(outcome.is_valid(), in_range);
    }

    #[test]
    fn role_tokens_are_closed(token in "[A-Z_]{1,12}") {
        let outcome = validate(&user::create(), &registration("jane_doe", &token));
        let declared = Role::VARIANTS.iter().any(|v| *v == token);
        prop_assert_eq!(outcome.is_valid(), declared);
    }

    #[test]
    fn difficulty_tokens_are_closed(index in 0usize..Difficulty::VARIANTS.len()) {
        let input = json!({
            "name": "Rust",
            "category": "Languages",
            "difficulty": Difficulty::VARIANTS[index],
        });
        prop_assert!(validate(&skill::create(), &input).is_valid());
    }

    #[test]
    fn validation_is_deterministic(
        username in "[a-zA-Z0-9_ -]{0,60}",
        rating in -3i64..10,
    ) {
        let input = registration(&username, "MENTOR");
        prop_assert_eq!(validate(&user::create(), &input), validate(&user::create(), &input));

        let review = json!({
            "reviewerId": "cjld2cjxh0000qzrmn831i7rn",
            "revieweeId": "ckabcdefghijklmnopqrstuvw",
            "title": "Solid advice",
            "content": "Helped me understand traits.",
            "rating": rating,
        });
        let first = validate(&community::create_review(), &review);
        prop_assert_eq!(first.is_valid(), (1..=5).contains(&rating));
        prop_assert_eq!(first, validate(&community::create_review(), &review));
    }

    #[test]
    fn narrowed_output_is_a_fixed_point(
        username in "[a-zA-Z0-9_]{3,50}",
        extra in "[a-z]{1,10}",
    ) {
        let schema = user::create();
        let mut input = registration(&username, "USER");
        input[format!("x_{extra}")] = json!(true);

        let once = schema.parse_value(&input).unwrap();
        let twice = schema.parse_value(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn time_of_day_matches_clock(hour in 0u32..30, minute in 0u32..70, pad in any::<bool>()) {
        let text = if pad {
            format!("{hour:02}:{minute:02}")
        } else {
            format!("{hour}:{minute:02}")
        };
        let real = hour < 24 && minute < 60;
        prop_assert_eq!(TIME_OF_DAY_PATTERN.is_match(&text), real);
    }
}
