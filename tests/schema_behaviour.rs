//! End-to-end behaviour of the domain schemas: bounds, closed token sets,
//! update refinements, cross-field ordering and partial derivation.

use assert_matches::assert_matches;
use serde_json::{Value, json};
use skilltrack_schema::IssueKind;
use skilltrack_schema::schemas::enums::Role;
use skilltrack_schema::schemas::{
    NO_FIELDS_TO_UPDATE, community, learning, settings, skill, user,
};
use skilltrack_schema::validation::constants::TIME_OF_DAY_PATTERN;
use skilltrack_schema::validation::{DEFAULT_REGISTRY, ROOT_PATH, ValidationOutcome, validate};

const USER_ID: &str = "cjld2cjxh0000qzrmn831i7rn";
const OTHER_ID: &str = "ckabcdefghijklmnopqrstuvw";

fn registration(username: &str) -> Value {
    json!({
        "email": "jane@example.com",
        "username": username,
        "password": "correct-horse",
    })
}

fn review(rating: Value) -> Value {
    json!({
        "reviewerId": USER_ID,
        "revieweeId": OTHER_ID,
        "title": "Patient mentor",
        "content": "Explained lifetimes twice without sighing.",
        "rating": rating,
    })
}

fn study_plan(start: &str, end: &str) -> Value {
    json!({
        "userId": USER_ID,
        "title": "Weekend ownership drill",
        "startTime": start,
        "endTime": end,
    })
}

// =============================================================================
// Username bounds
// =============================================================================

#[test]
fn username_length_bounds_are_inclusive() {
    let schema = user::create();

    assert!(validate(&schema, &registration("abc")).is_valid());
    assert!(validate(&schema, &registration(&"a".repeat(50))).is_valid());

    let too_short = validate(&schema, &registration("ab"));
    let errors = too_short.errors().unwrap();
    assert_eq!(errors.fields(), vec!["username"]);
    assert_eq!(
        errors.as_slice()[0].message,
        "String must contain at least 3 character(s)"
    );

    let too_long = validate(&schema, &registration(&"a".repeat(51)));
    let errors = too_long.errors().unwrap();
    assert_eq!(errors.as_slice()[0].kind, IssueKind::TooBig);
}

#[test]
fn username_charset_is_enforced() {
    let outcome = validate(&user::create(), &registration("jane-doe"));
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.as_slice()[0].message, user::USERNAME_CHARSET_MESSAGE);
}

// =============================================================================
// Closed token sets
// =============================================================================

#[test]
fn role_accepts_only_declared_tokens() {
    let mut input = registration("jane_doe");
    input["role"] = json!("ADMIN");
    let created = validate(&user::create(), &input).into_result().unwrap();
    assert_eq!(created.role, Some(Role::Admin));

    input["role"] = json!("SUPERUSER");
    let outcome = validate(&user::create(), &input);
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.fields(), vec!["role"]);
    assert_eq!(errors.as_slice()[0].kind, IssueKind::InvalidEnumValue);
    assert!(errors.as_slice()[0].message.contains("received 'SUPERUSER'"));
}

#[test]
fn enum_tokens_are_case_sensitive() {
    let mut input = registration("jane_doe");
    input["role"] = json!("admin");
    assert!(!validate(&user::create(), &input).is_valid());
}

// =============================================================================
// Update schemas
// =============================================================================

#[test]
fn update_with_only_identifier_is_rejected() {
    let id_only = json!({"id": USER_ID});
    let cases = [
        validate(&user::update(), &id_only).errors().cloned(),
        validate(&skill::update(), &id_only).errors().cloned(),
        validate(&learning::update_goal(), &id_only).errors().cloned(),
        validate(&community::update_post(), &id_only).errors().cloned(),
    ];

    for errors in cases {
        let errors = errors.expect("id-only update must be rejected");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].field, ROOT_PATH);
        assert_eq!(errors.as_slice()[0].message, NO_FIELDS_TO_UPDATE);
        assert_eq!(errors.as_slice()[0].kind, IssueKind::CrossField);
    }
}

#[test]
fn update_with_one_changed_field_is_accepted() {
    let updated = validate(&skill::update(), &json!({"id": USER_ID, "category": "Systems"}))
        .into_result()
        .unwrap();
    assert_eq!(updated.category.as_deref(), Some("Systems"));
    assert!(updated.name.is_none());
}

#[test]
fn settings_update_is_keyed_by_user() {
    let outcome = validate(&settings::update(), &json!({"userId": USER_ID}));
    assert_eq!(
        outcome.errors().unwrap().as_slice()[0].message,
        NO_FIELDS_TO_UPDATE
    );

    let input = json!({"userId": USER_ID, "appearance": {"theme": "DARK"}});
    assert!(validate(&settings::update(), &input).is_valid());
}

// =============================================================================
// Cross-field ordering
// =============================================================================

#[test]
fn study_plan_end_must_follow_start() {
    let schema = learning::create_study_plan();

    assert!(validate(&schema, &study_plan("2025-03-01T17:00:00Z", "2025-03-01T18:00:00Z")).is_valid());

    for end in ["2025-03-01T17:00:00Z", "2025-03-01T16:59:59Z"] {
        let outcome = validate(&schema, &study_plan("2025-03-01T17:00:00Z", end));
        let errors = outcome.errors().unwrap();
        assert_eq!(errors.fields(), vec!["endTime"]);
        assert_eq!(errors.as_slice()[0].message, learning::END_BEFORE_START);
    }
}

#[test]
fn ordering_respects_utc_offsets() {
    // 18:30+02:00 is 16:30Z, before the start
    let outcome = validate(
        &learning::create_study_plan(),
        &study_plan("2025-03-01T17:00:00Z", "2025-03-01T18:30:00+02:00"),
    );
    assert!(!outcome.is_valid());
}

#[test]
fn refinement_waits_for_field_errors() {
    let outcome = validate(
        &learning::create_study_plan(),
        &study_plan("not a date", "2025-03-01T16:00:00Z"),
    );
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.fields(), vec!["startTime"]);
    assert_eq!(errors.as_slice()[0].message, "Invalid datetime");
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn validation_is_idempotent() {
    let input = registration("jane_doe");
    let first = validate(&user::create(), &input);
    let second = validate(&user::create(), &input);
    assert_eq!(first, second);

    let bad = registration("x");
    assert_eq!(validate(&user::create(), &bad), validate(&user::create(), &bad));
}

#[test]
fn validated_output_validates_again() {
    let schema = user::create();
    let mut input = registration("jane_doe");
    input["nickname"] = json!("stripped");

    let once = schema.parse_value(&input).unwrap();
    assert!(once.get("nickname").is_none());
    let twice = schema.parse_value(&once).unwrap();
    assert_eq!(once, twice);
}

// =============================================================================
// Partial derivation
// =============================================================================

#[test]
fn partial_skill_schema_keeps_field_rules() {
    let partial = skill::create().partial();

    assert!(partial.parse(&json!({})).is_ok());
    assert!(partial.parse(&json!({"category": "Languages"})).is_ok());

    let errors = partial.parse(&json!({"name": "A"})).unwrap_err();
    assert_eq!(errors.fields(), vec!["name"]);
    assert_eq!(errors.as_slice()[0].kind, IssueKind::TooSmall);
}

// =============================================================================
// Time of day and ratings
// =============================================================================

#[test]
fn time_of_day_pattern() {
    for accepted in ["23:59", "9:30", "00:00"] {
        assert!(TIME_OF_DAY_PATTERN.is_match(accepted), "{accepted}");
    }
    for rejected in ["24:00", "12:60", "noon"] {
        assert!(!TIME_OF_DAY_PATTERN.is_match(rejected), "{rejected}");
    }

    let outcome = validate(&settings::notification(), &json!({"reminderTime": "24:00"}));
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.as_slice()[0].message, settings::INVALID_TIME);
}

#[test]
fn quiet_hours_may_wrap_midnight() {
    let input = json!({"quietHours": {"start": "22:00", "end": "7:00"}});
    let parsed = validate(&settings::notification(), &input).into_result().unwrap();
    assert_eq!(parsed.quiet_hours.unwrap().end, "7:00");
}

#[test]
fn rating_bounds() {
    let schema = community::create_review();
    for rating in [1, 5] {
        assert!(validate(&schema, &review(json!(rating))).is_valid(), "{rating}");
    }
    for rating in [0, 6] {
        let outcome = validate(&schema, &review(json!(rating)));
        assert_eq!(outcome.errors().unwrap().fields(), vec!["rating"]);
    }

    let outcome = validate(&schema, &review(json!(4.5)));
    assert_matches!(outcome, ValidationOutcome::Invalid(errors) => {
        assert_eq!(errors.as_slice()[0].message, "Expected integer, received float");
    });
}

// =============================================================================
// Error attribution
// =============================================================================

fn user_skill(experience: Value) -> Value {
    json!({
        "userId": USER_ID,
        "skillId": OTHER_ID,
        "level": "NOVICE",
        "experience": experience,
        "progress": 12.5,
    })
}

#[test]
fn integer_overflow_is_reported_on_the_field() {
    let input = user_skill(json!(9_223_372_036_854_775_808u64));

    let outcome = validate(&skill::create_user_skill(), &input);
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.fields(), vec!["experience"]);
    assert_eq!(errors.as_slice()[0].kind, IssueKind::TooBig);

    let untyped = DEFAULT_REGISTRY.validate("user_skill.create", &input).unwrap();
    assert_eq!(untyped.errors(), Some(errors));

    let fits = user_skill(json!(i64::MAX));
    assert!(validate(&skill::create_user_skill(), &fits).is_valid());
    assert!(DEFAULT_REGISTRY.validate("user_skill.create", &fits).unwrap().is_valid());
}

#[test]
fn field_failures_never_use_the_root_path() {
    let payloads = [
        ("user_skill.create", user_skill(json!(-1))),
        ("user.create", registration("a b")),
        ("review.create", review(json!("five"))),
        ("study_plan.create", study_plan("yesterday", "today")),
        ("settings.update", json!({"userId": USER_ID, "security": {"sessionTimeout": 2}})),
    ];
    for (name, payload) in payloads {
        let outcome = DEFAULT_REGISTRY.validate(name, &payload).unwrap();
        let errors = outcome.errors().unwrap_or_else(|| panic!("{name} should reject"));
        assert!(errors.iter().all(|e| !e.is_form_level()), "{name}: {errors}");
    }
}

#[test]
fn empty_settings_section_is_not_an_update() {
    let outcome = validate(&settings::update(), &json!({"userId": USER_ID, "privacy": {}}));
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.fields(), vec!["privacy"]);
    assert_eq!(errors.as_slice()[0].message, NO_FIELDS_TO_UPDATE);

    let outcome = validate(
        &settings::update(),
        &json!({"userId": USER_ID, "privacy": {}, "appearance": {"compactMode": true}}),
    );
    assert_eq!(outcome.errors().unwrap().fields(), vec!["privacy"]);
}

#[test]
fn update_schemas_keep_create_bounds() {
    let cases = [
        ("user.update", json!({"id": USER_ID, "username": "ab"}), "username"),
        ("user.update", json!({"id": USER_ID, "dailyGoal": 481}), "dailyGoal"),
        ("project.update", json!({"id": USER_ID, "title": "A"}), "title"),
        ("project.update", json!({"id": USER_ID, "demoUrl": "ftp://example.com"}), "demoUrl"),
        ("study_session.update", json!({"id": USER_ID, "duration": 0}), "duration"),
        ("study_session.update", json!({"id": USER_ID, "mood": 6}), "mood"),
    ];
    for (name, payload, field) in cases {
        let outcome = DEFAULT_REGISTRY.validate(name, &payload).unwrap();
        let errors = outcome.errors().unwrap_or_else(|| panic!("{name} accepted {payload}"));
        assert_eq!(errors.fields(), vec![field], "{name}");
    }

    let within = DEFAULT_REGISTRY
        .validate("study_session.update", &json!({"id": USER_ID, "duration": 480}))
        .unwrap();
    assert!(within.is_valid());
}
