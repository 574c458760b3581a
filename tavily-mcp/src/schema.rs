//! Structural input schemas and the validator that checks tool arguments
//! against them.
//!
//! A schema does two jobs: it validates a raw `serde_json::Value`, reporting
//! every violation rather than the first, and it renders itself as the JSON
//! Schema advertised to MCP clients in `tools/list`.

use std::fmt;

use serde_json::{Map, Value, json};

/// Shape a JSON value must have.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A string, optionally with a minimum length in characters.
    String {
        /// Minimum number of characters.
        min_length: Option<usize>,
    },
    /// Any JSON number.
    Number,
    /// An integral number within optional bounds.
    Integer {
        /// Inclusive lower bound.
        minimum: Option<i64>,
        /// Inclusive upper bound.
        maximum: Option<i64>,
    },
    /// `true` or `false`.
    Boolean,
    /// One of a closed set of string literals.
    Enum(&'static [&'static str]),
    /// An ordered sequence whose items all match `items`.
    Array {
        /// Schema of every item.
        items: Box<Schema>,
        /// Minimum number of items.
        min_items: Option<usize>,
        /// Maximum number of items.
        max_items: Option<usize>,
    },
    /// An object with named fields.
    Object(ObjectSchema),
}

impl Schema {
    /// Any string.
    pub const fn string() -> Self {
        Self::String { min_length: None }
    }

    /// A string with at least one character.
    pub const fn non_empty_string() -> Self {
        Self::String { min_length: Some(1) }
    }

    /// An integer in `1..=u32::MAX`.
    pub const fn positive_integer() -> Self {
        Self::Integer {
            minimum: Some(1),
            maximum: Some(u32::MAX as i64),
        }
    }

    /// An array of `items` with optional length bounds.
    pub fn array(items: Self, min_items: Option<usize>, max_items: Option<usize>) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items,
            max_items,
        }
    }

    /// Check `value`, appending every violation to `errors`.
    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        match self {
            Self::String { min_length } => {
                let Some(s) = value.as_str() else {
                    errors.push(FieldError::type_mismatch(path, "string", value));
                    return;
                };
                if let Some(min) = *min_length {
                    let len = s.chars().count();
                    if len < min {
                        errors.push(FieldError::new(
                            path,
                            FieldErrorKind::TooShort { min, actual: len },
                        ));
                    }
                }
            }
            Self::Number => {
                if !value.is_number() {
                    errors.push(FieldError::type_mismatch(path, "number", value));
                }
            }
            Self::Integer { minimum, maximum } => {
                let Some(n) = as_integer(value) else {
                    errors.push(FieldError::type_mismatch(path, "integer", value));
                    return;
                };
                let below = minimum.is_some_and(|min| n < i128::from(min));
                let above = maximum.is_some_and(|max| n > i128::from(max));
                if below || above {
                    errors.push(FieldError::new(
                        path,
                        FieldErrorKind::OutOfRange {
                            minimum: *minimum,
                            maximum: *maximum,
                            actual: n.to_string(),
                        },
                    ));
                }
            }
            Self::Boolean => {
                if !value.is_boolean() {
                    errors.push(FieldError::type_mismatch(path, "boolean", value));
                }
            }
            Self::Enum(allowed) => {
                let Some(s) = value.as_str() else {
                    errors.push(FieldError::type_mismatch(path, "string", value));
                    return;
                };
                if !allowed.contains(&s) {
                    errors.push(FieldError::new(
                        path,
                        FieldErrorKind::NotAllowed {
                            allowed: *allowed,
                            actual: s.to_string(),
                        },
                    ));
                }
            }
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let Some(values) = value.as_array() else {
                    errors.push(FieldError::type_mismatch(path, "array", value));
                    return;
                };
                if let Some(min) = *min_items
                    && values.len() < min
                {
                    errors.push(FieldError::new(
                        path,
                        FieldErrorKind::TooFewItems {
                            min,
                            actual: values.len(),
                        },
                    ));
                }
                if let Some(max) = *max_items
                    && values.len() > max
                {
                    errors.push(FieldError::new(
                        path,
                        FieldErrorKind::TooManyItems {
                            max,
                            actual: values.len(),
                        },
                    ));
                }
                for (i, item) in values.iter().enumerate() {
                    items.check(item, &format!("{path}[{i}]"), errors);
                }
            }
            Self::Object(object) => object.check(value, path, errors),
        }
    }

    /// Render as JSON Schema.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String { min_length } => {
                let mut schema = json!({ "type": "string" });
                if let Some(min) = min_length {
                    schema["minLength"] = json!(min);
                }
                schema
            }
            Self::Number => json!({ "type": "number" }),
            Self::Integer { minimum, maximum } => {
                let mut schema = json!({ "type": "integer" });
                if let Some(min) = minimum {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = maximum {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let mut schema = json!({ "type": "array", "items": items.to_json() });
                if let Some(min) = min_items {
                    schema["minItems"] = json!(min);
                }
                if let Some(max) = max_items {
                    schema["maxItems"] = json!(max);
                }
                schema
            }
            Self::Object(object) => Value::Object(object.to_json_object()),
        }
    }
}

/// Interpret `value` as an integer, rejecting fractional and float-encoded numbers.
fn as_integer(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

/// A named member of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key in the JSON object.
    pub name: &'static str,
    /// Human-readable description advertised to clients.
    pub description: &'static str,
    /// Shape of the value.
    pub schema: Schema,
    /// Whether the key must be present.
    pub required: bool,
}

/// An object with a fixed set of named fields. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Fields in declaration order.
    fields: Vec<Field>,
    /// Description of the object itself.
    description: Option<&'static str>,
}

impl ObjectSchema {
    /// An object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a description to the object.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Add a field that must be present.
    #[must_use]
    pub fn required(mut self, name: &'static str, description: &'static str, schema: Schema) -> Self {
        self.fields.push(Field {
            name,
            description,
            schema,
            required: true,
        });
        self
    }

    /// Add a field that may be absent or `null`.
    #[must_use]
    pub fn optional(mut self, name: &'static str, description: &'static str, schema: Schema) -> Self {
        self.fields.push(Field {
            name,
            description,
            schema,
            required: false,
        });
        self
    }

    /// Declared fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validate `value`, collecting every violation.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        self.check(value, "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(errors))
        }
    }

    /// Check `value` as an object, appending violations to `errors`.
    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        let Some(map) = value.as_object() else {
            errors.push(FieldError::type_mismatch(path, "object", value));
            return;
        };

        for field in &self.fields {
            let field_path = join_path(path, field.name);
            match map.get(field.name) {
                None | Some(Value::Null) if !field.required => {}
                None => errors.push(FieldError::new(field_path, FieldErrorKind::Missing)),
                Some(v) => field.schema.check(v, &field_path, errors),
            }
        }

        for key in map.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                errors.push(FieldError::new(join_path(path, key), FieldErrorKind::Unknown));
            }
        }
    }

    /// Render as a JSON Schema object.
    pub fn to_json_object(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut schema = field.schema.to_json();
            schema["description"] = json!(field.description);
            properties.insert(field.name.to_string(), schema);
        }

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        let mut object = Map::new();
        object.insert("type".into(), json!("object"));
        if let Some(description) = self.description {
            object.insert("description".into(), json!(description));
        }
        object.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            object.insert("required".into(), json!(required));
        }
        object.insert("additionalProperties".into(), json!(false));
        object
    }
}

/// Append `name` to a dotted path.
fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// JSON type name of `value`, for error messages.
const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What went wrong with a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field is absent.
    Missing,
    /// The value has the wrong JSON type.
    TypeMismatch {
        /// Expected type.
        expected: &'static str,
        /// Type that was supplied.
        actual: &'static str,
    },
    /// A string is not one of the permitted literals.
    NotAllowed {
        /// Permitted literals.
        allowed: &'static [&'static str],
        /// Supplied value.
        actual: String,
    },
    /// A number is outside its bounds.
    OutOfRange {
        /// Inclusive lower bound.
        minimum: Option<i64>,
        /// Inclusive upper bound.
        maximum: Option<i64>,
        /// Supplied value.
        actual: String,
    },
    /// A string is shorter than allowed.
    TooShort {
        /// Minimum length.
        min: usize,
        /// Supplied length.
        actual: usize,
    },
    /// An array has fewer items than allowed.
    TooFewItems {
        /// Minimum item count.
        min: usize,
        /// Supplied item count.
        actual: usize,
    },
    /// An array has more items than allowed.
    TooManyItems {
        /// Maximum item count.
        max: usize,
        /// Supplied item count.
        actual: usize,
    },
    /// The key is not part of the schema.
    Unknown,
    /// The value passed structural checks but could not be decoded.
    Invalid(String),
}

/// A violation at a specific path in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path to the offending value; empty for the input itself.
    pub path: String,
    /// Nature of the violation.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create an error at `path`.
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Shorthand for a [`FieldErrorKind::TypeMismatch`].
    fn type_mismatch(path: &str, expected: &'static str, value: &Value) -> Self {
        Self::new(
            path,
            FieldErrorKind::TypeMismatch {
                expected,
                actual: type_name(value),
            },
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "input"
        } else {
            &self.path
        };
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{path}: required field is missing"),
            FieldErrorKind::TypeMismatch { expected, actual } => {
                write!(f, "{path}: expected {expected}, got {actual}")
            }
            FieldErrorKind::NotAllowed { allowed, actual } => write!(
                f,
                "{path}: '{actual}' is not one of {}",
                allowed.join(", ")
            ),
            FieldErrorKind::OutOfRange {
                minimum,
                maximum,
                actual,
            } => match (minimum, maximum) {
                (Some(min), Some(max)) => {
                    write!(f, "{path}: {actual} is outside {min}..={max}")
                }
                (Some(min), None) => write!(f, "{path}: {actual} is less than {min}"),
                (None, Some(max)) => write!(f, "{path}: {actual} is greater than {max}"),
                (None, None) => write!(f, "{path}: {actual} is out of range"),
            },
            FieldErrorKind::TooShort { min, actual } => write!(
                f,
                "{path}: must be at least {min} characters, got {actual}"
            ),
            FieldErrorKind::TooFewItems { min, actual } => {
                write!(f, "{path}: must have at least {min} items, got {actual}")
            }
            FieldErrorKind::TooManyItems { max, actual } => {
                write!(f, "{path}: must have at most {max} items, got {actual}")
            }
            FieldErrorKind::Unknown => write!(f, "{path}: unknown field"),
            FieldErrorKind::Invalid(reason) => write!(f, "{path}: {reason}"),
        }
    }
}

/// Every violation found in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    /// Individual violations.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[&str] = &["red", "green"];

    fn sample() -> ObjectSchema {
        ObjectSchema::new()
            .required("name", "Name", Schema::non_empty_string())
            .optional(
                "settings",
                "Settings",
                Schema::Object(
                    ObjectSchema::new()
                        .optional("color", "Color", Schema::Enum(COLORS))
                        .optional("count", "Count", Schema::positive_integer())
                        .optional("ratio", "Ratio", Schema::Number)
                        .optional("enabled", "Enabled", Schema::Boolean),
                ),
            )
            .optional(
                "tags",
                "Tags",
                Schema::array(Schema::string(), Some(1), Some(2)),
            )
    }

    #[test]
    fn accepts_minimal_and_full_inputs() {
        let schema = sample();
        assert!(schema.validate(&json!({"name": "x"})).is_ok());
        assert!(
            schema
                .validate(&json!({
                    "name": "x",
                    "settings": {"color": "red", "count": 3, "ratio": 0.5, "enabled": false},
                    "tags": ["a", "b"]
                }))
                .is_ok()
        );
    }

    #[test]
    fn null_optional_is_absent() {
        assert!(
            sample()
                .validate(&json!({"name": "x", "settings": null}))
                .is_ok()
        );
    }

    #[test]
    fn missing_required_field() {
        let err = sample().validate(&json!({})).unwrap_err();
        assert_eq!(
            err.errors(),
            &[FieldError::new("name", FieldErrorKind::Missing)]
        );
        assert_eq!(err.to_string(), "name: required field is missing");
    }

    #[test]
    fn collects_every_violation() {
        let err = sample()
            .validate(&json!({
                "name": "",
                "settings": {"color": "blue", "count": 0, "ratio": "half", "enabled": 1, "extra": true},
                "tags": ["a", 2, "c"]
            }))
            .unwrap_err();

        let paths: Vec<&str> = err.errors().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "name",
                "settings.color",
                "settings.count",
                "settings.ratio",
                "settings.enabled",
                "settings.extra",
                "tags",
                "tags[1]",
            ]
        );
    }

    #[test]
    fn enum_violation_lists_allowed_values() {
        let err = sample()
            .validate(&json!({"name": "x", "settings": {"color": "blue"}}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "settings.color: 'blue' is not one of red, green"
        );
    }

    #[test]
    fn type_mismatch_reports_expected_and_actual() {
        let err = sample().validate(&json!({"name": 42})).unwrap_err();
        assert_eq!(err.to_string(), "name: expected string, got number");
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let err = sample()
            .validate(&json!({"name": "x", "settings": {"count": 2.5}}))
            .unwrap_err();
        assert_eq!(
            err.errors()[0].kind,
            FieldErrorKind::TypeMismatch {
                expected: "integer",
                actual: "number"
            }
        );
    }

    #[test]
    fn non_object_input() {
        let err = sample().validate(&json!("just a string")).unwrap_err();
        assert_eq!(err.to_string(), "input: expected object, got string");
    }

    #[test]
    fn renders_json_schema() {
        let rendered = Value::Object(sample().to_json_object());
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["name"]));
        assert_eq!(rendered["additionalProperties"], false);
        assert_eq!(rendered["properties"]["name"]["minLength"], 1);
        assert_eq!(
            rendered["properties"]["settings"]["properties"]["color"]["enum"],
            json!(["red", "green"])
        );
        assert_eq!(rendered["properties"]["tags"]["maxItems"], 2);
        assert_eq!(rendered["properties"]["tags"]["description"], "Tags");
    }
}
