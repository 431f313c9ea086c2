//! Per-keyword constraint behavior: normalization of schema keyword values
//! and application against instances.

use jsv::error::Violation;
use jsv::registry::VERSION_DRAFT_6;
use serde_json::{Value, json};

fn violations(schema: Value, instance: Value) -> Vec<Violation> {
    jsv::validate(&schema, &instance, VERSION_DRAFT_6)
        .expect("validation setup should succeed")
        .violations
}

fn assert_valid(schema: Value, instance: Value) {
    let found = violations(schema, instance);
    assert!(found.is_empty(), "expected no violations, got: {:?}", found);
}

fn assert_violates(schema: Value, instance: Value, keyword: &str) {
    let found = violations(schema, instance);
    assert!(
        found.iter().any(|v| v.keyword == keyword),
        "expected a '{}' violation, got: {:?}",
        keyword,
        found
    );
}

// ─── Range family ───────────────────────────────────────────────────────────

#[test]
fn maximum_boundary_is_inclusive() {
    assert_valid(json!({"maximum": 10}), json!(10));
    assert_valid(json!({"maximum": 10}), json!(9.5));
    assert_violates(json!({"maximum": 10}), json!(10.5), "maximum");
}

#[test]
fn minimum_boundary_is_inclusive() {
    assert_valid(json!({"minimum": 0}), json!(0));
    assert_violates(json!({"minimum": 0}), json!(-0.5), "minimum");
}

#[test]
fn exclusive_maximum_violates_on_equality() {
    assert_violates(json!({"exclusiveMaximum": 10}), json!(10), "exclusiveMaximum");
    assert_valid(json!({"exclusiveMaximum": 10}), json!(9.99));
}

#[test]
fn exclusive_minimum_violates_on_equality() {
    assert_violates(json!({"exclusiveMinimum": 0}), json!(0), "exclusiveMinimum");
    assert_valid(json!({"exclusiveMinimum": 0}), json!(0.01));
}

#[test]
fn range_constraints_ignore_non_numeric_instances() {
    // A string instance never reaches the numeric constraints.
    assert_valid(json!({"maximum": 10}), json!("way past ten"));
}

#[test]
fn range_bound_must_be_a_number() {
    assert_violates(json!({"maximum": "10"}), json!(5), "maximum");
}

#[test]
fn multiple_of() {
    assert_valid(json!({"multipleOf": 3}), json!(9));
    assert_violates(json!({"multipleOf": 3}), json!(10), "multipleOf");
}

#[test]
fn multiple_of_must_be_strictly_positive() {
    assert_violates(json!({"multipleOf": 0}), json!(9), "multipleOf");
    assert_violates(json!({"multipleOf": -3}), json!(9), "multipleOf");
}

// ─── Size family normalization (wrong type / below zero) ────────────────────

#[test]
fn max_items_must_be_an_integer() {
    let found = violations(json!({"maxItems": "2"}), json!([1, 2, 3]));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].keyword, "maxItems");
    assert!(found[0].message.contains("expected an integer"));
}

#[test]
fn max_items_must_not_be_negative() {
    let found = violations(json!({"maxItems": -1}), json!([1, 2, 3]));
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("less than zero"));
}

#[test]
fn malformed_keyword_is_not_applied() {
    // The instance would violate maxItems=-1 under any reading; only the
    // normalization violation is reported, never a bogus application one.
    let found = violations(json!({"maxItems": -1}), json!([1, 2, 3]));
    assert_eq!(found.len(), 1);
}

#[test]
fn min_length_rejects_wrong_schema_type() {
    assert_violates(json!({"minLength": true}), json!("abc"), "minLength");
}

#[test]
fn integral_float_bounds_are_accepted_and_applied() {
    // 3.0 classifies as an integer, so it is a usable bound.
    assert_valid(json!({"maxItems": 3.0}), json!([1, 2, 3]));
    assert_violates(json!({"maxItems": 3.0}), json!([1, 2, 3, 4]), "maxItems");
    assert_violates(json!({"maxItems": -1.0}), json!([1]), "maxItems");
}

#[test]
fn fractional_bound_message_names_the_actual_value() {
    let found = violations(json!({"maxItems": 2.5}), json!([1, 2, 3]));
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("expected an integer"));
    assert!(found[0].message.contains("2.5"), "got: {}", found[0].message);
}

// ─── Strings ────────────────────────────────────────────────────────────────

#[test]
fn length_counts_unicode_scalars() {
    assert_valid(json!({"maxLength": 3}), json!("hél"));
    assert_valid(json!({"minLength": 5, "maxLength": 5}), json!("héllo"));
    assert_violates(json!({"maxLength": 4}), json!("héllo"), "maxLength");
}

#[test]
fn pattern_matching() {
    assert_valid(json!({"pattern": "^[a-z]+$"}), json!("abc"));
    assert_violates(json!({"pattern": "^[a-z]+$"}), json!("abc1"), "pattern");
}

#[test]
fn invalid_pattern_is_a_normalization_violation() {
    assert_violates(json!({"pattern": "["}), json!("abc"), "pattern");
}

#[test]
fn format_checks() {
    assert_valid(json!({"format": "ipv4"}), json!("192.168.0.1"));
    assert_violates(json!({"format": "ipv4"}), json!("192.168.0.999"), "format");

    assert_valid(json!({"format": "email"}), json!("a@example.com"));
    assert_violates(json!({"format": "email"}), json!("not-an-email"), "format");

    assert_valid(
        json!({"format": "date-time"}),
        json!("2017-06-21T09:30:00Z"),
    );
    assert_violates(json!({"format": "date-time"}), json!("yesterday"), "format");
}

#[test]
fn unsupported_format_name_is_a_normalization_violation() {
    assert_violates(json!({"format": "zip-code"}), json!("12345"), "format");
}

// ─── Arrays ─────────────────────────────────────────────────────────────────

#[test]
fn item_counts() {
    assert_valid(json!({"minItems": 1, "maxItems": 3}), json!([1, 2]));
    assert_violates(json!({"maxItems": 1}), json!([1, 2]), "maxItems");
    assert_violates(json!({"minItems": 3}), json!([1, 2]), "minItems");
}

#[test]
fn unique_items() {
    assert_valid(json!({"uniqueItems": true}), json!([1, 2, 3]));
    assert_valid(json!({"uniqueItems": false}), json!([1, 1]));
    assert_violates(json!({"uniqueItems": true}), json!([1, 2, 1]), "uniqueItems");
    // Equality is structural, not representational.
    assert_violates(
        json!({"uniqueItems": true}),
        json!([{"a": 1}, {"a": 1}]),
        "uniqueItems",
    );
}

#[test]
fn items_single_schema_applies_to_every_element() {
    let schema = json!({"items": {"type": "integer"}});
    assert_valid(schema.clone(), json!([1, 2, 3]));

    let found = violations(schema, json!([1, "two", 3.5]));
    let paths: Vec<_> = found.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["/1", "/2"]);
}

#[test]
fn items_tuple_form_is_positional() {
    let schema = json!({"items": [{"type": "string"}, {"type": "integer"}]});
    assert_valid(schema.clone(), json!(["a", 1]));
    assert_valid(schema.clone(), json!(["a", 1, "anything", null]));

    let found = violations(schema, json!([1, "b"]));
    let paths: Vec<_> = found.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["/0", "/1"]);
}

#[test]
fn additional_items_false_forbids_extra_elements() {
    let schema = json!({"items": [{"type": "string"}], "additionalItems": false});
    assert_valid(schema.clone(), json!(["a"]));
    assert_violates(schema, json!(["a", "b"]), "additionalItems");
}

#[test]
fn additional_items_schema_governs_extra_elements() {
    let schema = json!({
        "items": [{"type": "string"}],
        "additionalItems": {"type": "integer"}
    });
    assert_valid(schema.clone(), json!(["a", 1, 2]));

    let found = violations(schema, json!(["a", 1, "nope"]));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/2");
}

// ─── Objects ────────────────────────────────────────────────────────────────

#[test]
fn required_checks_presence_only() {
    let schema = json!({"required": ["name", "port"]});
    assert_valid(schema.clone(), json!({"name": null, "port": 0}));

    let found = violations(schema, json!({"name": "x"}));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].keyword, "required");
    assert!(found[0].message.contains("'port'"));
}

#[test]
fn properties_recurse_into_present_members_only() {
    let schema = json!({
        "properties": {
            "name": {"type": "string"},
            "port": {"type": "integer"}
        }
    });
    // Absent properties are not an error here; that is required's job.
    assert_valid(schema.clone(), json!({}));

    let found = violations(schema, json!({"name": 42}));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/name");
    assert_eq!(found[0].keyword, "type");
}

#[test]
fn property_counts() {
    assert_valid(json!({"maxProperties": 2}), json!({"a": 1, "b": 2}));
    assert_violates(
        json!({"maxProperties": 1}),
        json!({"a": 1, "b": 2}),
        "maxProperties",
    );
    assert_violates(json!({"minProperties": 1}), json!({}), "minProperties");
}

#[test]
fn property_dependencies() {
    let schema = json!({"dependencies": {"credit_card": ["billing_address"]}});
    assert_valid(schema.clone(), json!({"name": "x"}));
    assert_valid(
        schema.clone(),
        json!({"credit_card": "4111", "billing_address": "1 Main St"}),
    );

    let found = violations(schema, json!({"credit_card": "4111"}));
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("'billing_address'"));
}

#[test]
fn schema_dependencies_walk_the_whole_instance() {
    let schema = json!({
        "dependencies": {
            "credit_card": {"required": ["billing_address"]}
        }
    });
    assert_valid(
        schema.clone(),
        json!({"credit_card": "4111", "billing_address": "1 Main St"}),
    );
    assert_violates(schema, json!({"credit_card": "4111"}), "required");
}

#[test]
fn malformed_dependencies_value_is_flagged() {
    assert_violates(
        json!({"dependencies": {"a": 5}}),
        json!({"a": 1}),
        "dependencies",
    );
}

// ─── enum and type ──────────────────────────────────────────────────────────

#[test]
fn enum_membership() {
    let schema = json!({"enum": ["red", "green", 3, null]});
    assert_valid(schema.clone(), json!("red"));
    assert_valid(schema.clone(), json!(3));
    assert_valid(schema.clone(), json!(null));
    assert_violates(schema, json!("blue"), "enum");
}

#[test]
fn empty_enum_is_a_normalization_violation() {
    assert_violates(json!({"enum": []}), json!("anything"), "enum");
}

#[test]
fn type_single_form() {
    assert_valid(json!({"type": "string"}), json!("x"));
    assert_violates(json!({"type": "string"}), json!(5), "type");
}

#[test]
fn type_array_form_accepts_any_listed_type() {
    let schema = json!({"type": ["string", "null"]});
    assert_valid(schema.clone(), json!("x"));
    assert_valid(schema.clone(), json!(null));
    assert_violates(schema, json!(5), "type");
}

#[test]
fn integer_satisfies_number_but_not_conversely() {
    assert_valid(json!({"type": "number"}), json!(5));
    assert_valid(json!({"type": "integer"}), json!(5));
    assert_valid(json!({"type": "number"}), json!(5.5));
    assert_violates(json!({"type": "integer"}), json!(5.5), "type");
}

#[test]
fn unknown_type_name_is_a_normalization_violation() {
    assert_violates(json!({"type": "float"}), json!(5.5), "type");
}

// ─── Multiple violations per run ────────────────────────────────────────────

#[test]
fn traversal_continues_past_violations() {
    let schema = json!({
        "required": ["name"],
        "properties": {
            "port": {"type": "integer", "minimum": 1}
        }
    });
    let found = violations(schema, json!({"port": 0.5}));
    let keywords: Vec<_> = found.iter().map(|v| v.keyword.as_str()).collect();
    assert!(keywords.contains(&"required"));
    assert!(keywords.contains(&"type"));
    assert!(keywords.contains(&"minimum"));
}
