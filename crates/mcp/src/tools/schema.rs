// Tool argument schemas and validation

use crate::error::ToolError;
use crate::protocol::{ToolAnnotations, ToolSchema};
use crate::tools::catalog::ToolName;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

/// Shape of one argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    String { max_len: Option<usize> },
    Integer { min: Option<i64>, max: Option<i64> },
    Number,
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    Enum(&'static [&'static str]),
    IntEnum(&'static [i64]),
    StringList { min: Option<usize>, max: Option<usize> },
    /// Nested object; `None` accepts any object as-is.
    Object(Option<&'static ObjectSpec>),
    ObjectList {
        item: Option<&'static ObjectSpec>,
        min: Option<usize>,
        max: Option<usize>,
    },
}

/// One named argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub description: &'static str,
    /// Sending this field overwrites the stored value instead of merging.
    pub replaces_whole_value: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
            replaces_whole_value: false,
        }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::String { max_len: None }, description)
    }

    pub const fn integer(
        name: &'static str,
        min: Option<i64>,
        max: Option<i64>,
        description: &'static str,
    ) -> Self {
        Self::new(name, FieldType::Integer { min, max }, description)
    }

    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Number, description)
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Boolean, description)
    }

    pub const fn date(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Date, description)
    }

    pub const fn one_of(
        name: &'static str,
        allowed: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, FieldType::Enum(allowed), description)
    }

    pub const fn int_one_of(name: &'static str, allowed: &'static [i64], description: &'static str) -> Self {
        Self::new(name, FieldType::IntEnum(allowed), description)
    }

    pub const fn string_list(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::StringList { min: None, max: None }, description)
    }

    pub const fn object(
        name: &'static str,
        spec: Option<&'static ObjectSpec>,
        description: &'static str,
    ) -> Self {
        Self::new(name, FieldType::Object(spec), description)
    }

    pub const fn object_list(
        name: &'static str,
        item: Option<&'static ObjectSpec>,
        min: Option<usize>,
        max: Option<usize>,
        description: &'static str,
    ) -> Self {
        Self::new(name, FieldType::ObjectList { item, min, max }, description)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn max_len(self, max: usize) -> Self {
        Self {
            ty: FieldType::String { max_len: Some(max) },
            ..self
        }
    }

    /// Item-count bounds for a string list.
    pub const fn list_bounds(self, min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            ty: FieldType::StringList { min, max },
            ..self
        }
    }

    pub const fn replaces_whole_value(self) -> Self {
        Self {
            replaces_whole_value: true,
            ..self
        }
    }
}

/// What to do with arguments no field claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFields {
    Forbid,
    Ignore,
}

/// Cross-field presence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    ExactlyOneOf(&'static [&'static str]),
    AtLeastOneOf(&'static [&'static str]),
    AtMostOneOf(&'static [&'static str]),
}

impl FieldGroup {
    fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::ExactlyOneOf(fields) | Self::AtLeastOneOf(fields) | Self::AtMostOneOf(fields) => fields,
        }
    }

    pub fn describe(&self) -> String {
        let listed = self.fields().join(", ");
        match self {
            Self::ExactlyOneOf(_) => format!("Provide exactly one of: {}.", listed),
            Self::AtLeastOneOf(_) => format!("Provide at least one of: {}.", listed),
            Self::AtMostOneOf(_) => format!("Provide at most one of: {}.", listed),
        }
    }

    fn check(&self, values: &Map<String, Value>, path: &str) -> Result<(), ToolError> {
        let fields = self.fields();
        let present = fields.iter().filter(|f| values.contains_key(**f)).count();
        let ok = match self {
            Self::ExactlyOneOf(_) => present == 1,
            Self::AtLeastOneOf(_) => present >= 1,
            Self::AtMostOneOf(_) => present <= 1,
        };

        if ok {
            Ok(())
        } else {
            Err(ToolError::validation(
                field_path(path, &fields.join("|")),
                format!("{} Got {}.", self.describe(), present),
            ))
        }
    }
}

/// Closed argument set of a tool or nested object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSpec {
    pub fields: &'static [FieldSpec],
    pub rules: &'static [FieldGroup],
    pub extra: ExtraFields,
}

impl ObjectSpec {
    /// Tools that take no arguments of their own.
    pub const NONE: Self = Self {
        fields: &[],
        rules: &[],
        extra: ExtraFields::Forbid,
    };

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// MCP behaviour hints plus the confirmation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolHints {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
    pub requires_confirmation: bool,
}

impl ToolHints {
    pub const READ_ONLY: Self = Self {
        read_only: true,
        destructive: false,
        idempotent: true,
        requires_confirmation: false,
    };
    pub const WRITE: Self = Self {
        read_only: false,
        destructive: false,
        idempotent: false,
        requires_confirmation: false,
    };
    pub const IDEMPOTENT_WRITE: Self = Self {
        idempotent: true,
        ..Self::WRITE
    };
    /// Permanent deletes.
    pub const DESTRUCTIVE: Self = Self {
        read_only: false,
        destructive: true,
        idempotent: true,
        requires_confirmation: true,
    };
    /// Delivers real mail; cannot be recalled.
    pub const SENDS_MAIL: Self = Self {
        idempotent: false,
        ..Self::DESTRUCTIVE
    };
}

/// Static contract of one tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub args: ObjectSpec,
    pub hints: ToolHints,
}

impl ToolSpec {
    /// JSON schema published in `tools/list`.
    pub fn input_schema(&self) -> Value {
        let mut schema = object_schema(&self.args, "");

        if let Some(properties) = schema["properties"].as_object_mut() {
            properties.insert(
                "api_key".to_string(),
                json_schema_string("Instantly API key for this call. Overrides any server-level key."),
            );
            if self.hints.requires_confirmation {
                properties.insert(
                    "confirm".to_string(),
                    json_schema_boolean("Must be true. Only set after the user explicitly approved this action."),
                );
            }
        }
        if self.hints.requires_confirmation {
            if let Some(required) = schema["required"].as_array_mut() {
                required.push(json!("confirm"));
            }
        }

        schema
    }

    pub fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations {
            read_only_hint: self.hints.read_only,
            destructive_hint: self.hints.destructive,
            idempotent_hint: self.hints.idempotent,
        }
    }

    pub fn to_schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
            annotations: Some(self.annotations()),
        }
    }
}

/// Arguments that passed validation, normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs {
    tool: ToolName,
    values: Map<String, Value>,
    warnings: Vec<String>,
}

impl ValidatedArgs {
    pub fn tool(&self) -> ToolName {
        self.tool
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// A field the schema marks required.
    pub fn required_str(&self, name: &str) -> Result<&str, ToolError> {
        self.str(name)
            .ok_or_else(|| ToolError::validation(name, "is required"))
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    pub fn strings(&self, name: &str) -> Option<Vec<String>> {
        self.values.get(name).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// Every validated field except `excluded`, as a JSON object.
    pub fn body_without(&self, excluded: &[&str]) -> Value {
        Value::Object(
            self.values
                .iter()
                .filter(|(key, _)| !excluded.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

/// Check `raw` against the tool's argument spec.
pub fn validate(tool: ToolName, raw: &Value) -> Result<ValidatedArgs, ToolError> {
    let mut warnings = Vec::new();
    let values = validate_object(&tool.spec().args, raw, "", &mut warnings)?;

    Ok(ValidatedArgs {
        tool,
        values,
        warnings,
    })
}

fn validate_object(
    spec: &ObjectSpec,
    raw: &Value,
    path: &str,
    warnings: &mut Vec<String>,
) -> Result<Map<String, Value>, ToolError> {
    let empty = Map::new();
    let input = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            let field = if path.is_empty() { "arguments" } else { path };
            return Err(ToolError::validation(field, "must be an object"));
        }
    };

    if spec.extra == ExtraFields::Forbid {
        if let Some(unknown) = input.keys().find(|key| spec.field(key).is_none()) {
            let accepted: Vec<&str> = spec.fields.iter().map(|f| f.name).collect();
            return Err(ToolError::validation(
                field_path(path, unknown),
                format!("unknown field. Accepted fields: {}", accepted.join(", ")),
            ));
        }
    }

    let mut values = Map::new();
    for field in spec.fields {
        let name = field_path(path, field.name);
        match input.get(field.name).filter(|value| !is_blank(value)) {
            None if field.required => return Err(ToolError::validation(name, "is required")),
            None => {}
            Some(value) => {
                let coerced = coerce(field, value, &name, warnings)?;
                if field.replaces_whole_value {
                    warnings.push(format!(
                        "'{}' replaces the entire stored value. Keys you did not send have been removed.",
                        name
                    ));
                }
                values.insert(field.name.to_string(), coerced);
            }
        }
    }

    for rule in spec.rules {
        rule.check(&values, path)?;
    }

    Ok(values)
}

fn coerce(
    field: &FieldSpec,
    value: &Value,
    name: &str,
    warnings: &mut Vec<String>,
) -> Result<Value, ToolError> {
    match field.ty {
        FieldType::String { max_len } => {
            let s = coerce_string(value, name)?;
            if let Some(max) = max_len {
                if s.chars().count() > max {
                    return Err(ToolError::validation(
                        name,
                        format!("must be at most {} characters", max),
                    ));
                }
            }
            Ok(Value::String(s))
        }
        FieldType::Integer { min, max } => {
            let n = coerce_integer(value, name)?;
            check_bounds(n, min, max, name)?;
            Ok(json!(n))
        }
        FieldType::Number => Ok(json!(coerce_number(value, name)?)),
        FieldType::Boolean => Ok(Value::Bool(coerce_bool(value, name)?)),
        FieldType::Date => {
            let s = coerce_string(value, name)?;
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                ToolError::validation(name, format!("'{}' is not a YYYY-MM-DD date", s))
            })?;
            Ok(Value::String(s))
        }
        FieldType::Enum(allowed) => {
            let s = coerce_string(value, name)?;
            if allowed.contains(&s.as_str()) {
                Ok(Value::String(s))
            } else {
                Err(ToolError::InvalidEnum {
                    field: name.to_string(),
                    value: s,
                    allowed: allowed.iter().map(|v| v.to_string()).collect(),
                })
            }
        }
        FieldType::IntEnum(allowed) => {
            let invalid = || ToolError::InvalidEnum {
                field: name.to_string(),
                value: scalar_text(value),
                allowed: allowed.iter().map(|v| v.to_string()).collect(),
            };
            let n = coerce_integer(value, name).map_err(|_| invalid())?;
            if allowed.contains(&n) {
                Ok(json!(n))
            } else {
                Err(invalid())
            }
        }
        FieldType::StringList { min, max } => {
            let items = match value {
                Value::Array(items) => {
                    let mut strings = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        if !is_blank(item) {
                            strings.push(coerce_string(item, &format!("{}[{}]", name, i))?);
                        }
                    }
                    strings
                }
                other => vec![coerce_string(other, name)?],
            };
            check_count(items.len(), min, max, name)?;
            Ok(json!(items))
        }
        FieldType::Object(Some(spec)) => Ok(Value::Object(validate_object(spec, value, name, warnings)?)),
        FieldType::Object(None) => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err(ToolError::validation(name, "must be an object")),
        },
        FieldType::ObjectList { item, min, max } => {
            let Value::Array(items) = value else {
                return Err(ToolError::validation(name, "must be an array of objects"));
            };
            check_count(items.len(), min, max, name)?;

            let mut validated = Vec::with_capacity(items.len());
            for (i, entry) in items.iter().enumerate() {
                let entry_path = format!("{}[{}]", name, i);
                match (item, entry) {
                    (Some(spec), _) => {
                        validated.push(Value::Object(validate_object(spec, entry, &entry_path, warnings)?))
                    }
                    (None, Value::Object(_)) => validated.push(entry.clone()),
                    (None, _) => return Err(ToolError::validation(entry_path, "must be an object")),
                }
            }
            Ok(Value::Array(validated))
        }
    }
}

fn field_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn coerce_string(value: &Value, name: &str) -> Result<String, ToolError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ToolError::validation(name, "must be a string")),
    }
}

fn coerce_integer(value: &Value, name: &str) -> Result<i64, ToolError> {
    let whole = |f: f64| (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64);
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    };
    parsed.ok_or_else(|| ToolError::validation(name, "must be an integer"))
}

fn coerce_number(value: &Value, name: &str) -> Result<f64, ToolError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| ToolError::validation(name, "must be a number"))
}

fn coerce_bool(value: &Value, name: &str) -> Result<bool, ToolError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ToolError::validation(name, "must be true or false")),
        },
        Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
        _ => Err(ToolError::validation(name, "must be true or false")),
    }
}

fn check_bounds(n: i64, min: Option<i64>, max: Option<i64>, name: &str) -> Result<(), ToolError> {
    let in_range = min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max);
    if in_range {
        return Ok(());
    }

    let message = match (min, max) {
        (Some(min), Some(max)) => format!("must be between {} and {}, got {}", min, max, n),
        (Some(min), None) => format!("must be at least {}, got {}", min, n),
        (None, Some(max)) => format!("must be at most {}, got {}", max, n),
        (None, None) => format!("is out of range, got {}", n),
    };
    Err(ToolError::validation(name, message))
}

fn check_count(len: usize, min: Option<usize>, max: Option<usize>, name: &str) -> Result<(), ToolError> {
    if let Some(min) = min {
        if len < min {
            return Err(ToolError::validation(
                name,
                format!("needs at least {} item(s), got {}", min, len),
            ));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(ToolError::validation(
                name,
                format!("accepts at most {} items, got {}", max, len),
            ));
        }
    }
    Ok(())
}

// Schema generation

fn object_schema(spec: &ObjectSpec, description: &str) -> Value {
    let mut properties = Map::new();
    for field in spec.fields {
        properties.insert(field.name.to_string(), field_schema(field));
    }
    let required: Vec<&str> = spec
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();

    let mut schema = json_schema_object(Value::Object(properties), required);
    if spec.extra == ExtraFields::Forbid {
        schema["additionalProperties"] = json!(false);
    }

    let mut notes: Vec<String> = Vec::new();
    if !description.is_empty() {
        notes.push(description.to_string());
    }
    notes.extend(spec.rules.iter().map(FieldGroup::describe));
    if !notes.is_empty() {
        schema["description"] = json!(notes.join(" "));
    }

    schema
}

fn field_schema(field: &FieldSpec) -> Value {
    let description = field.description;
    let mut schema = match field.ty {
        FieldType::String { max_len } => {
            let mut schema = json_schema_string(description);
            if let Some(max) = max_len {
                schema["maxLength"] = json!(max);
            }
            schema
        }
        FieldType::Integer { min, max } => {
            let mut schema = json_schema_integer(description);
            if let Some(min) = min {
                schema["minimum"] = json!(min);
            }
            if let Some(max) = max {
                schema["maximum"] = json!(max);
            }
            schema
        }
        FieldType::Number => json_schema_number(description),
        FieldType::Boolean => json_schema_boolean(description),
        FieldType::Date => {
            let mut schema = json_schema_string(description);
            schema["format"] = json!("date");
            schema
        }
        FieldType::Enum(allowed) => {
            let mut schema = json_schema_string(description);
            schema["enum"] = json!(allowed);
            schema
        }
        FieldType::IntEnum(allowed) => {
            let mut schema = json_schema_integer(description);
            schema["enum"] = json!(allowed);
            schema
        }
        FieldType::StringList { min, max } => {
            let mut schema = json_schema_array(json!({ "type": "string" }), description);
            set_item_bounds(&mut schema, min, max);
            schema
        }
        FieldType::Object(Some(spec)) => object_schema(spec, description),
        FieldType::Object(None) => json!({ "type": "object", "description": description }),
        FieldType::ObjectList { item, min, max } => {
            let items = match item {
                Some(spec) => object_schema(spec, ""),
                None => json!({ "type": "object" }),
            };
            let mut schema = json_schema_array(items, description);
            set_item_bounds(&mut schema, min, max);
            schema
        }
    };

    if field.replaces_whole_value {
        schema["x-replaces-entire-value"] = json!(true);
        schema["description"] = json!(format!(
            "WARNING: replaces the entire stored object, it is not merged. Include every existing key you want to keep. {}",
            description
        ));
    }

    schema
}

fn set_item_bounds(schema: &mut Value, min: Option<usize>, max: Option<usize>) {
    if let Some(min) = min {
        schema["minItems"] = json!(min);
    }
    if let Some(max) = max {
        schema["maxItems"] = json!(max);
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> Value {
    json!({
        "type": "integer",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    static INNER: ObjectSpec = ObjectSpec {
        fields: &[
            FieldSpec::string("html", "HTML body"),
            FieldSpec::string("text", "Plain body"),
        ],
        rules: &[FieldGroup::AtLeastOneOf(&["html", "text"])],
        extra: ExtraFields::Ignore,
    };

    static SAMPLE: ObjectSpec = ObjectSpec {
        fields: &[
            FieldSpec::string("id", "Identifier").required(),
            FieldSpec::string("subject", "Subject").max_len(10),
            FieldSpec::integer("limit", Some(1), Some(100), "Page size"),
            FieldSpec::boolean("flag", "Flag"),
            FieldSpec::date("start_date", "Start"),
            FieldSpec::one_of("mode", &["a", "b"], "Mode"),
            FieldSpec::int_one_of("status", &[1, 2, -1], "Status"),
            FieldSpec::string_list("tags", "Tags"),
            FieldSpec::object("body", Some(&INNER), "Body"),
            FieldSpec::object("vars", None, "Variables").replaces_whole_value(),
            FieldSpec::object_list("rows", Some(&INNER), Some(1), Some(2), "Rows"),
            FieldSpec::string("campaign_id", "Campaign"),
            FieldSpec::string("list_id", "List"),
        ],
        rules: &[FieldGroup::AtMostOneOf(&["campaign_id", "list_id"])],
        extra: ExtraFields::Forbid,
    };

    fn run(raw: Value) -> Result<(Map<String, Value>, Vec<String>), ToolError> {
        let mut warnings = Vec::new();
        validate_object(&SAMPLE, &raw, "", &mut warnings).map(|values| (values, warnings))
    }

    fn field_of(error: ToolError) -> String {
        match error {
            ToolError::Validation { field, .. } | ToolError::InvalidEnum { field, .. } => field,
            other => panic!("Expected a field error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_valid_arguments() {
        let (values, warnings) = run(json!({
            "id": "  abc  ",
            "limit": "25",
            "flag": "true",
            "start_date": "2024-01-31",
            "mode": "b",
            "status": -1,
            "tags": ["x", "", "y"],
            "body": {"text": "hi"},
            "rows": [{"html": "<p>1</p>"}],
        }))
        .unwrap();

        assert_eq!(values["id"], "abc");
        assert_eq!(values["limit"], 25);
        assert_eq!(values["flag"], true);
        assert_eq!(values["tags"], json!(["x", "y"]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let error = run(json!({"limit": 5})).unwrap_err();
        assert_eq!(field_of(error), "id");

        let error = run(json!({"id": "   "})).unwrap_err();
        assert_eq!(field_of(error), "id");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let error = run(json!({"id": "a", "surprise": 1})).unwrap_err();
        assert_eq!(field_of(error), "surprise");
    }

    #[test]
    fn test_bounds_and_lengths() {
        assert_eq!(field_of(run(json!({"id": "a", "limit": 0})).unwrap_err()), "limit");
        assert_eq!(field_of(run(json!({"id": "a", "limit": 101})).unwrap_err()), "limit");
        assert_eq!(field_of(run(json!({"id": "a", "limit": 2.5})).unwrap_err()), "limit");
        assert_eq!(
            field_of(run(json!({"id": "a", "subject": "much too long"})).unwrap_err()),
            "subject"
        );
        assert_eq!(field_of(run(json!({"id": "a", "start_date": "01/31/2024"})).unwrap_err()), "start_date");
    }

    #[test]
    fn test_enums() {
        match run(json!({"id": "a", "mode": "c"})).unwrap_err() {
            ToolError::InvalidEnum { field, value, allowed } => {
                assert_eq!(field, "mode");
                assert_eq!(value, "c");
                assert_eq!(allowed, vec!["a", "b"]);
            }
            other => panic!("Expected InvalidEnum, got {:?}", other),
        }

        assert!(matches!(
            run(json!({"id": "a", "status": 3})).unwrap_err(),
            ToolError::InvalidEnum { .. }
        ));
        assert!(run(json!({"id": "a", "status": "2"})).is_ok());
    }

    #[test]
    fn test_nested_rules_and_paths() {
        let error = run(json!({"id": "a", "body": {}})).unwrap_err();
        assert_eq!(field_of(error), "body.html|text");

        let error = run(json!({"id": "a", "rows": [{"text": "ok"}, {"html": 5, "text": []}]})).unwrap_err();
        assert_eq!(field_of(error), "rows[1].text");

        let error = run(json!({"id": "a", "rows": []})).unwrap_err();
        assert_eq!(field_of(error), "rows");
    }

    #[test]
    fn test_at_most_one_of() {
        let error = run(json!({"id": "a", "campaign_id": "c", "list_id": "l"})).unwrap_err();
        assert_eq!(field_of(error), "campaign_id|list_id");

        assert!(run(json!({"id": "a"})).is_ok());
    }

    #[test]
    fn test_replace_warning() {
        let (_, warnings) = run(json!({"id": "a", "vars": {"industry": "Tech"}})).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("vars"));
    }

    #[test]
    fn test_non_object_arguments() {
        assert_eq!(field_of(run(json!([1, 2])).unwrap_err()), "arguments");
    }

    #[test]
    fn test_generated_schema() {
        let schema = object_schema(&SAMPLE, "");

        assert_eq!(schema["required"], json!(["id"]));
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["limit"]["maximum"], 100);
        assert_eq!(schema["properties"]["mode"]["enum"], json!(["a", "b"]));
        assert_eq!(schema["properties"]["status"]["type"], "integer");
        assert_eq!(schema["properties"]["start_date"]["format"], "date");
        assert_eq!(schema["properties"]["rows"]["maxItems"], 2);
        assert_eq!(schema["properties"]["vars"]["x-replaces-entire-value"], true);
        assert!(schema["description"]
            .as_str()
            .unwrap()
            .contains("at most one of: campaign_id, list_id"));
        assert!(schema["properties"]["body"]["description"]
            .as_str()
            .unwrap()
            .contains("at least one of: html, text"));
    }
}
