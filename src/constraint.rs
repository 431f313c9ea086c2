//! The built-in constraint catalog.
//!
//! Each variant is a stateless singleton bound to the keyword(s) it owns and
//! obeys a two-phase contract: [`normalize`](Constraint::normalize) checks
//! that the schema's own keyword value is well-formed, then
//! [`apply`](Constraint::apply) evaluates the keyword against a concrete
//! instance. Both phases report problems as violations through the context;
//! the walker skips `apply` when normalization flagged the keyword.

use crate::context::Context;
use crate::error::Error;
use crate::primitives::{PrimitiveType, matches_type, primitive_type_of};
use crate::walker::Walker;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

// ─── Cached format regexes ──────────────────────────────────────────────────

static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})$").unwrap()
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:\S*$").unwrap());

const KNOWN_FORMATS: &[&str] = &[
    "date-time", "email", "hostname", "ipv4", "ipv6", "uri", "regex",
];

/// A unit of validation logic bound to one or more schema keywords.
///
/// The catalog is a closed set: dispatch is by variant, and the registry owns
/// the authoritative ordered list (see [`crate::registry`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    Maximum,
    Minimum,
    ExclusiveMaximum,
    ExclusiveMinimum,
    MaxLength,
    MinLength,
    Pattern,
    Items,
    MaxItems,
    MinItems,
    UniqueItems,
    Required,
    Properties,
    Dependencies,
    Enum,
    Type,
    Format,
    MultipleOf,
    MinProperties,
    MaxProperties,
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

impl Constraint {
    /// The keyword(s) this constraint owns. A keyword belongs to exactly one
    /// constraint.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Constraint::Maximum => &["maximum"],
            Constraint::Minimum => &["minimum"],
            Constraint::ExclusiveMaximum => &["exclusiveMaximum"],
            Constraint::ExclusiveMinimum => &["exclusiveMinimum"],
            Constraint::MaxLength => &["maxLength"],
            Constraint::MinLength => &["minLength"],
            Constraint::Pattern => &["pattern"],
            Constraint::Items => &["items", "additionalItems"],
            Constraint::MaxItems => &["maxItems"],
            Constraint::MinItems => &["minItems"],
            Constraint::UniqueItems => &["uniqueItems"],
            Constraint::Required => &["required"],
            Constraint::Properties => &["properties"],
            Constraint::Dependencies => &["dependencies"],
            Constraint::Enum => &["enum"],
            Constraint::Type => &["type"],
            Constraint::Format => &["format"],
            Constraint::MultipleOf => &["multipleOf"],
            Constraint::MinProperties => &["minProperties"],
            Constraint::MaxProperties => &["maxProperties"],
            Constraint::AllOf => &["allOf"],
            Constraint::AnyOf => &["anyOf"],
            Constraint::OneOf => &["oneOf"],
            Constraint::Not => &["not"],
        }
    }

    /// Whether this constraint is meaningful for instances of `ty`.
    pub fn supports(self, ty: PrimitiveType) -> bool {
        use PrimitiveType::*;
        match self {
            Constraint::Maximum
            | Constraint::Minimum
            | Constraint::ExclusiveMaximum
            | Constraint::ExclusiveMinimum
            | Constraint::MultipleOf => matches!(ty, Integer | Number),
            Constraint::MaxLength
            | Constraint::MinLength
            | Constraint::Pattern
            | Constraint::Format => ty == String,
            Constraint::Items
            | Constraint::MaxItems
            | Constraint::MinItems
            | Constraint::UniqueItems => ty == Array,
            Constraint::Required
            | Constraint::Properties
            | Constraint::Dependencies
            | Constraint::MinProperties
            | Constraint::MaxProperties => ty == Object,
            Constraint::Enum
            | Constraint::Type
            | Constraint::AllOf
            | Constraint::AnyOf
            | Constraint::OneOf
            | Constraint::Not => true,
        }
    }

    /// Check that the schema's own keyword value is well-formed. Malformed
    /// values are recorded as violations; the return value tells the walker
    /// whether `apply` may run for this keyword.
    pub fn normalize(
        self,
        schema: &Map<String, Value>,
        ctx: &mut Context,
        _walker: &mut Walker<'_>,
    ) -> Result<bool, Error> {
        let ok = match self {
            Constraint::Maximum
            | Constraint::Minimum
            | Constraint::ExclusiveMaximum
            | Constraint::ExclusiveMinimum => normalize_number(self.keywords()[0], schema, ctx),
            Constraint::MultipleOf => normalize_positive_number("multipleOf", schema, ctx),
            Constraint::MaxLength
            | Constraint::MinLength
            | Constraint::MaxItems
            | Constraint::MinItems
            | Constraint::MinProperties
            | Constraint::MaxProperties => {
                normalize_non_negative_integer(self.keywords()[0], schema, ctx)
            }
            Constraint::Pattern => normalize_pattern(schema, ctx),
            Constraint::Items => normalize_items(schema, ctx),
            Constraint::UniqueItems => normalize_boolean("uniqueItems", schema, ctx),
            Constraint::Required => normalize_required(schema, ctx),
            Constraint::Properties => normalize_properties(schema, ctx),
            Constraint::Dependencies => normalize_dependencies(schema, ctx),
            Constraint::Enum => normalize_enum(schema, ctx),
            Constraint::Type => normalize_type(schema, ctx),
            Constraint::Format => normalize_format(schema, ctx),
            Constraint::AllOf | Constraint::AnyOf | Constraint::OneOf => {
                normalize_schema_array(self.keywords()[0], schema, ctx)
            }
            Constraint::Not => normalize_sub_schema("not", schema, ctx),
        };
        Ok(ok)
    }

    /// Evaluate the keyword against `instance`, recording violations into
    /// `ctx`. Failure is communicated exclusively through the context.
    pub fn apply(
        self,
        instance: &Value,
        schema: &Map<String, Value>,
        ctx: &mut Context,
        walker: &mut Walker<'_>,
    ) -> Result<(), Error> {
        match self {
            Constraint::Maximum => apply_range("maximum", instance, schema, ctx, |x, b| x > b),
            Constraint::Minimum => apply_range("minimum", instance, schema, ctx, |x, b| x < b),
            Constraint::ExclusiveMaximum => {
                apply_range("exclusiveMaximum", instance, schema, ctx, |x, b| x >= b)
            }
            Constraint::ExclusiveMinimum => {
                apply_range("exclusiveMinimum", instance, schema, ctx, |x, b| x <= b)
            }
            Constraint::MultipleOf => apply_multiple_of(instance, schema, ctx),
            Constraint::MaxLength => apply_length("maxLength", instance, schema, ctx),
            Constraint::MinLength => apply_length("minLength", instance, schema, ctx),
            Constraint::Pattern => apply_pattern(instance, schema, ctx),
            Constraint::Format => apply_format(instance, schema, ctx),
            Constraint::Items => return apply_items(instance, schema, ctx, walker),
            Constraint::MaxItems => apply_count("maxItems", instance, schema, ctx),
            Constraint::MinItems => apply_count("minItems", instance, schema, ctx),
            Constraint::UniqueItems => apply_unique_items(instance, schema, ctx),
            Constraint::Required => apply_required(instance, schema, ctx),
            Constraint::Properties => return apply_properties(instance, schema, ctx, walker),
            Constraint::Dependencies => return apply_dependencies(instance, schema, ctx, walker),
            Constraint::Enum => apply_enum(instance, schema, ctx),
            Constraint::Type => apply_type(instance, schema, ctx),
            Constraint::MinProperties => apply_count("minProperties", instance, schema, ctx),
            Constraint::MaxProperties => apply_count("maxProperties", instance, schema, ctx),
            Constraint::AllOf => return apply_all_of(instance, schema, ctx, walker),
            Constraint::AnyOf => return apply_any_of(instance, schema, ctx, walker),
            Constraint::OneOf => return apply_one_of(instance, schema, ctx, walker),
            Constraint::Not => return apply_not(instance, schema, ctx, walker),
        }
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    primitive_type_of(value).as_str()
}

// ─── Normalization helpers ──────────────────────────────────────────────────

fn normalize_number(keyword: &str, schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get(keyword) {
        Some(Value::Number(_)) => true,
        Some(other) => {
            ctx.add_violation(
                keyword,
                format!("invalid schema value: expected a number, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_positive_number(keyword: &str, schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    if !normalize_number(keyword, schema, ctx) {
        return false;
    }
    let value = schema.get(keyword).and_then(Value::as_f64).unwrap_or(0.0);
    if value <= 0.0 {
        ctx.add_violation(
            keyword,
            "invalid schema value: must be strictly greater than zero".to_string(),
        );
        return false;
    }
    true
}

fn normalize_non_negative_integer(
    keyword: &str,
    schema: &Map<String, Value>,
    ctx: &mut Context,
) -> bool {
    match schema.get(keyword) {
        // Integral floats like 3.0 classify as integers and are accepted.
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 => true,
            Some(f) if f.fract() == 0.0 => {
                ctx.add_violation(
                    keyword,
                    "invalid schema value: must not be less than zero".to_string(),
                );
                false
            }
            _ => {
                ctx.add_violation(
                    keyword,
                    format!("invalid schema value: expected an integer, got {}", n),
                );
                false
            }
        },
        Some(other) => {
            ctx.add_violation(
                keyword,
                format!(
                    "invalid schema value: expected an integer, got {}",
                    type_name(other)
                ),
            );
            false
        }
        None => false,
    }
}

fn normalize_boolean(keyword: &str, schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get(keyword) {
        Some(Value::Bool(_)) => true,
        Some(other) => {
            ctx.add_violation(
                keyword,
                format!("invalid schema value: expected a boolean, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_pattern(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get("pattern") {
        Some(Value::String(pattern)) => match Regex::new(pattern) {
            Ok(_) => true,
            Err(e) => {
                ctx.add_violation("pattern", format!("invalid schema value: bad regex: {}", e));
                false
            }
        },
        Some(other) => {
            ctx.add_violation(
                "pattern",
                format!("invalid schema value: expected a string, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_items(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    let mut ok = match schema.get("items") {
        Some(Value::Object(_)) | None => true,
        Some(Value::Array(subs)) => {
            let mut all_objects = true;
            for (i, sub) in subs.iter().enumerate() {
                if !sub.is_object() {
                    ctx.add_violation(
                        "items",
                        format!(
                            "invalid schema value: element {} must be a schema, got {}",
                            i,
                            type_name(sub)
                        ),
                    );
                    all_objects = false;
                }
            }
            all_objects
        }
        Some(other) => {
            ctx.add_violation(
                "items",
                format!(
                    "invalid schema value: expected a schema or an array of schemas, got {}",
                    type_name(other)
                ),
            );
            false
        }
    };

    match schema.get("additionalItems") {
        Some(Value::Bool(_)) | Some(Value::Object(_)) | None => {}
        Some(other) => {
            ctx.add_violation(
                "additionalItems",
                format!(
                    "invalid schema value: expected a boolean or a schema, got {}",
                    type_name(other)
                ),
            );
            ok = false;
        }
    }

    ok
}

fn normalize_required(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get("required") {
        Some(Value::Array(names)) => {
            if names.is_empty() {
                ctx.add_violation(
                    "required",
                    "invalid schema value: must not be empty".to_string(),
                );
                return false;
            }
            for (i, name) in names.iter().enumerate() {
                if !name.is_string() {
                    ctx.add_violation(
                        "required",
                        format!(
                            "invalid schema value: element {} must be a string, got {}",
                            i,
                            type_name(name)
                        ),
                    );
                    return false;
                }
            }
            true
        }
        Some(other) => {
            ctx.add_violation(
                "required",
                format!("invalid schema value: expected an array, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_properties(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get("properties") {
        Some(Value::Object(props)) => {
            let mut ok = true;
            for (name, sub) in props {
                if !sub.is_object() {
                    ctx.add_violation(
                        "properties",
                        format!(
                            "invalid schema value: property '{}' must be a schema, got {}",
                            name,
                            type_name(sub)
                        ),
                    );
                    ok = false;
                }
            }
            ok
        }
        Some(other) => {
            ctx.add_violation(
                "properties",
                format!("invalid schema value: expected an object, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_dependencies(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    let Some(value) = schema.get("dependencies") else {
        return false;
    };
    let Some(deps) = value.as_object() else {
        ctx.add_violation(
            "dependencies",
            format!("invalid schema value: expected an object, got {}", type_name(value)),
        );
        return false;
    };

    let mut ok = true;
    for (name, dep) in deps {
        match dep {
            Value::Object(_) => {}
            Value::Array(names) => {
                for (i, entry) in names.iter().enumerate() {
                    if !entry.is_string() {
                        ctx.add_violation(
                            "dependencies",
                            format!(
                                "invalid schema value: element {} of dependency '{}' must be a string, got {}",
                                i,
                                name,
                                type_name(entry)
                            ),
                        );
                        ok = false;
                    }
                }
            }
            other => {
                ctx.add_violation(
                    "dependencies",
                    format!(
                        "invalid schema value: dependency '{}' must be a schema or an array of property names, got {}",
                        name,
                        type_name(other)
                    ),
                );
                ok = false;
            }
        }
    }
    ok
}

fn normalize_enum(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get("enum") {
        Some(Value::Array(values)) if !values.is_empty() => true,
        Some(Value::Array(_)) => {
            ctx.add_violation("enum", "invalid schema value: must not be empty".to_string());
            false
        }
        Some(other) => {
            ctx.add_violation(
                "enum",
                format!("invalid schema value: expected an array, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_type(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    let check_name = |name: &Value, ctx: &mut Context| -> bool {
        match name.as_str().and_then(PrimitiveType::from_name) {
            Some(_) => true,
            None => {
                ctx.add_violation(
                    "type",
                    format!("invalid schema value: '{}' is not a primitive type", name),
                );
                false
            }
        }
    };

    match schema.get("type") {
        Some(name @ Value::String(_)) => check_name(name, ctx),
        Some(Value::Array(names)) => {
            let mut ok = !names.is_empty();
            if !ok {
                ctx.add_violation("type", "invalid schema value: must not be empty".to_string());
            }
            for name in names {
                ok &= check_name(name, ctx);
            }
            ok
        }
        Some(other) => {
            ctx.add_violation(
                "type",
                format!(
                    "invalid schema value: expected a string or an array of strings, got {}",
                    type_name(other)
                ),
            );
            false
        }
        None => false,
    }
}

fn normalize_format(schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get("format") {
        Some(Value::String(format)) => {
            if KNOWN_FORMATS.contains(&format.as_str()) {
                true
            } else {
                ctx.add_violation(
                    "format",
                    format!("invalid schema value: unsupported format '{}'", format),
                );
                false
            }
        }
        Some(other) => {
            ctx.add_violation(
                "format",
                format!("invalid schema value: expected a string, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_schema_array(keyword: &str, schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get(keyword) {
        Some(Value::Array(subs)) => {
            if subs.is_empty() {
                ctx.add_violation(
                    keyword,
                    "invalid schema value: must not be empty".to_string(),
                );
                return false;
            }
            let mut ok = true;
            for (i, sub) in subs.iter().enumerate() {
                if !sub.is_object() {
                    ctx.add_violation(
                        keyword,
                        format!(
                            "invalid schema value: element {} must be a schema, got {}",
                            i,
                            type_name(sub)
                        ),
                    );
                    ok = false;
                }
            }
            ok
        }
        Some(other) => {
            ctx.add_violation(
                keyword,
                format!("invalid schema value: expected an array, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

fn normalize_sub_schema(keyword: &str, schema: &Map<String, Value>, ctx: &mut Context) -> bool {
    match schema.get(keyword) {
        Some(Value::Object(_)) => true,
        Some(other) => {
            ctx.add_violation(
                keyword,
                format!("invalid schema value: expected a schema, got {}", type_name(other)),
            );
            false
        }
        None => false,
    }
}

// ─── Range family ───────────────────────────────────────────────────────────

fn apply_range(
    keyword: &str,
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    violates: impl Fn(f64, f64) -> bool,
) {
    let Some(x) = instance.as_f64() else { return };
    let Some(bound_value) = schema.get(keyword) else { return };
    let Some(bound) = bound_value.as_f64() else { return };

    if violates(x, bound) {
        let message = match keyword {
            "maximum" => format!("should be lesser than or equal to {}", bound_value),
            "minimum" => format!("should be greater than or equal to {}", bound_value),
            "exclusiveMaximum" => format!("should be lesser than {}", bound_value),
            _ => format!("should be greater than {}", bound_value),
        };
        ctx.add_violation(keyword, message);
    }
}

fn apply_multiple_of(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(x) = instance.as_f64() else { return };
    let Some(divisor_value) = schema.get("multipleOf") else { return };
    let Some(divisor) = divisor_value.as_f64() else { return };

    if x % divisor != 0.0 {
        ctx.add_violation(
            "multipleOf",
            format!("should be a multiple of {}", divisor_value),
        );
    }
}

// ─── Size family ────────────────────────────────────────────────────────────

fn apply_length(keyword: &str, instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(s) = instance.as_str() else { return };
    // Normalization guarantees a non-negative integral number, possibly in
    // float representation.
    let Some(limit) = schema.get(keyword).and_then(Value::as_f64) else { return };
    let length = s.chars().count() as f64;

    if keyword == "maxLength" && length > limit {
        ctx.add_violation(keyword, format!("should have at most {} characters", limit));
    } else if keyword == "minLength" && length < limit {
        ctx.add_violation(keyword, format!("should have at least {} characters", limit));
    }
}

fn apply_count(keyword: &str, instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let count = match instance {
        Value::Array(items) => items.len() as f64,
        Value::Object(map) => map.len() as f64,
        _ => return,
    };
    let Some(limit) = schema.get(keyword).and_then(Value::as_f64) else { return };

    let (unit, max) = match keyword {
        "maxItems" => ("elements", true),
        "minItems" => ("elements", false),
        "maxProperties" => ("properties", true),
        _ => ("properties", false),
    };

    if max && count > limit {
        ctx.add_violation(keyword, format!("should have at most {} {}", limit, unit));
    } else if !max && count < limit {
        ctx.add_violation(keyword, format!("should have at least {} {}", limit, unit));
    }
}

// ─── String constraints ─────────────────────────────────────────────────────

fn apply_pattern(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(s) = instance.as_str() else { return };
    let Some(pattern) = schema.get("pattern").and_then(Value::as_str) else { return };
    // Normalization already proved the pattern compiles.
    let Ok(re) = Regex::new(pattern) else { return };

    if !re.is_match(s) {
        ctx.add_violation("pattern", format!("should match pattern '{}'", pattern));
    }
}

fn apply_format(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(s) = instance.as_str() else { return };
    let Some(format) = schema.get("format").and_then(Value::as_str) else { return };

    let ok = match format {
        "date-time" => DATE_TIME_RE.is_match(s),
        "email" => EMAIL_RE.is_match(s),
        "hostname" => s.len() <= 253 && HOSTNAME_RE.is_match(s),
        "ipv4" => s.parse::<std::net::Ipv4Addr>().is_ok(),
        "ipv6" => s.parse::<std::net::Ipv6Addr>().is_ok(),
        "uri" => URI_RE.is_match(s),
        "regex" => Regex::new(s).is_ok(),
        _ => true,
    };

    if !ok {
        ctx.add_violation("format", format!("should match format '{}'", format));
    }
}

// ─── Array constraints ──────────────────────────────────────────────────────

fn apply_items(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(items) = instance.as_array() else {
        return Ok(());
    };

    match schema.get("items") {
        // Single schema: every element is walked against it.
        Some(sub @ Value::Object(_)) => {
            for (i, element) in items.iter().enumerate() {
                walk_element(sub, element, i, ctx, walker)?;
            }
        }
        // Tuple form: positional schemas, then the additionalItems regime.
        Some(Value::Array(positional)) => {
            for (i, element) in items.iter().enumerate() {
                if let Some(sub) = positional.get(i) {
                    walk_element(sub, element, i, ctx, walker)?;
                    continue;
                }
                match schema.get("additionalItems") {
                    Some(Value::Bool(false)) => {
                        ctx.add_violation(
                            "additionalItems",
                            format!(
                                "should not have more than {} elements",
                                positional.len()
                            ),
                        );
                        break;
                    }
                    Some(sub @ Value::Object(_)) => {
                        walk_element(sub, element, i, ctx, walker)?;
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    Ok(())
}

fn walk_element(
    sub: &Value,
    element: &Value,
    index: usize,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    ctx.push_segment(index.to_string());
    let result = walker.walk(sub, element, ctx);
    ctx.pop_segment();
    result
}

fn apply_unique_items(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    if schema.get("uniqueItems") != Some(&Value::Bool(true)) {
        return;
    }
    let Some(items) = instance.as_array() else { return };

    for (i, a) in items.iter().enumerate() {
        if items[..i].contains(a) {
            ctx.add_violation(
                "uniqueItems",
                format!("element {} is a duplicate, elements should be unique", i),
            );
            return;
        }
    }
}

// ─── Object constraints ─────────────────────────────────────────────────────

fn apply_required(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(map) = instance.as_object() else { return };
    let Some(names) = schema.get("required").and_then(Value::as_array) else { return };

    for name in names {
        if let Some(name) = name.as_str()
            && !map.contains_key(name)
        {
            ctx.add_violation("required", format!("property '{}' is required", name));
        }
    }
}

fn apply_properties(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(map) = instance.as_object() else {
        return Ok(());
    };
    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (name, sub) in props {
        if let Some(value) = map.get(name) {
            ctx.push_segment(name.clone());
            let result = walker.walk(sub, value, ctx);
            ctx.pop_segment();
            result?;
        }
    }

    Ok(())
}

fn apply_dependencies(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(map) = instance.as_object() else {
        return Ok(());
    };
    let Some(deps) = schema.get("dependencies").and_then(Value::as_object) else {
        return Ok(());
    };

    for (name, dep) in deps {
        if !map.contains_key(name) {
            continue;
        }
        match dep {
            // Property dependency: the named properties must also be present.
            Value::Array(names) => {
                for required in names {
                    if let Some(required) = required.as_str()
                        && !map.contains_key(required)
                    {
                        ctx.add_violation(
                            "dependencies",
                            format!(
                                "property '{}' is required by property '{}'",
                                required, name
                            ),
                        );
                    }
                }
            }
            // Schema dependency: the whole instance must satisfy it.
            Value::Object(_) => walker.walk(dep, instance, ctx)?,
            _ => {}
        }
    }

    Ok(())
}

// ─── Generic constraints ────────────────────────────────────────────────────

fn apply_enum(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let Some(values) = schema.get("enum").and_then(Value::as_array) else { return };

    if !values.contains(instance) {
        let allowed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        ctx.add_violation(
            "enum",
            format!("should be one of [{}]", allowed.join(", ")),
        );
    }
}

fn apply_type(instance: &Value, schema: &Map<String, Value>, ctx: &mut Context) {
    let declared: Vec<PrimitiveType> = match schema.get("type") {
        Some(Value::String(name)) => PrimitiveType::from_name(name).into_iter().collect(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(|n| n.as_str().and_then(PrimitiveType::from_name))
            .collect(),
        _ => return,
    };

    if declared.is_empty() {
        return;
    }

    if !declared.iter().any(|&ty| matches_type(instance, ty)) {
        let expected: Vec<&str> = declared.iter().map(|ty| ty.as_str()).collect();
        ctx.add_violation(
            "type",
            format!(
                "should be of type {}, got {}",
                expected.join(" or "),
                type_name(instance)
            ),
        );
    }
}

// ─── Logical composition ────────────────────────────────────────────────────

fn apply_all_of(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(subs) = schema.get("allOf").and_then(Value::as_array) else {
        return Ok(());
    };

    // Every branch must hold; all branch violations are reported.
    for sub in subs {
        walker.walk(sub, instance, ctx)?;
    }
    Ok(())
}

fn apply_any_of(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(subs) = schema.get("anyOf").and_then(Value::as_array) else {
        return Ok(());
    };

    for sub in subs {
        let mut trial = ctx.fork();
        walker.walk(sub, instance, &mut trial)?;
        if !trial.has_violations() {
            return Ok(());
        }
    }

    // Per-branch detail is deliberately not propagated: one aggregate
    // violation regardless of branch count.
    ctx.add_violation(
        "anyOf",
        "should match at least one of the given schemas".to_string(),
    );
    Ok(())
}

fn apply_one_of(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(subs) = schema.get("oneOf").and_then(Value::as_array) else {
        return Ok(());
    };

    let mut matched = 0;
    for sub in subs {
        let mut trial = ctx.fork();
        walker.walk(sub, instance, &mut trial)?;
        if !trial.has_violations() {
            matched += 1;
        }
    }

    if matched == 0 {
        ctx.add_violation(
            "oneOf",
            "should match exactly one of the given schemas, but matched none".to_string(),
        );
    } else if matched > 1 {
        ctx.add_violation(
            "oneOf",
            format!(
                "should match exactly one of the given schemas, but matched {}",
                matched
            ),
        );
    }
    Ok(())
}

fn apply_not(
    instance: &Value,
    schema: &Map<String, Value>,
    ctx: &mut Context,
    walker: &mut Walker<'_>,
) -> Result<(), Error> {
    let Some(sub) = schema.get("not") else {
        return Ok(());
    };

    let mut trial = ctx.fork();
    walker.walk(sub, instance, &mut trial)?;
    if !trial.has_violations() {
        ctx.add_violation("not", "should not match the given schema".to_string());
    }
    Ok(())
}
