//! Serde roundtrip and JsonSchema validation tests for all entity types.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use schemars::schema_for;
use swipe_core::classification::ClassificationCode;
use swipe_core::entities::*;
use swipe_core::enums::*;
use swipe_core::geo::Coordinates;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-a3f8b2c1".into(),
        role: Role::Professional,
        display_name: "Atelier Dupont".into(),
        city: Some("Lyon".into()),
        address: Some("12 rue de la République".into()),
        coordinates: Some(Coordinates::new(45.764, 4.8357).unwrap()),
        classification_code: Some(ClassificationCode::parse("43.22A").unwrap()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    user_without_location_roundtrip,
    User,
    User {
        id: "usr-00000002".into(),
        role: Role::Individual,
        display_name: "Camille".into(),
        city: None,
        address: None,
        coordinates: None,
        classification_code: None,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    professional_detail_roundtrip,
    ProfessionalDetail,
    ProfessionalDetail {
        user_id: "usr-a3f8b2c1".into(),
        company_name: "Atelier Dupont SARL".into(),
        classification_code: Some(ClassificationCode::parse("43.22A").unwrap()),
        verified: true,
        tags: BTreeSet::from(["plomberie".to_string(), "urgence".to_string()]),
        category: Some("Bâtiment".into()),
    }
);

roundtrip_and_validate!(
    story_roundtrip,
    Content,
    Content {
        id: "cnt-0badf00d".into(),
        owner_id: "usr-00000002".into(),
        caption: Some("Fuite sous l'évier".into()),
        body: None,
        image_url: Some("stories/leak.jpg".into()),
        kind: ContentKind::Story,
        views: 12,
        expires_at: Some(Utc::now() + Duration::hours(24)),
        classification_code: Some(ClassificationCode::parse("43.22A").unwrap()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    match_record_roundtrip,
    MatchRecord,
    MatchRecord {
        id: "mtc-12345678".into(),
        actor_id: "usr-a3f8b2c1".into(),
        target_id: "usr-00000002".into(),
        action: SwipeAction::SuperLike,
        matched: false,
        content_id: Some("cnt-0badf00d".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    match_summary_roundtrip,
    MatchSummary,
    MatchSummary {
        match_id: "mtc-12345678".into(),
        other_user_id: "usr-00000002".into(),
        other_user_name: None,
        action: SwipeAction::Like,
        created_at: Utc::now(),
    }
);

#[test]
fn classification_code_serializes_as_plain_string() {
    let code = ClassificationCode::parse("62.01Z").unwrap();
    assert_eq!(serde_json::to_string(&code).unwrap(), "\"62.01Z\"");
}
