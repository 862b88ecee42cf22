//! Schema check for ideas returned by the generator.
//!
//! The generator hands back raw JSON. Each value is checked field by field and
//! turned into a [`ProductIdea`], or rejected with a [`ValidationError`] saying
//! what was wrong. Optional fields fall back to values from the batch.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{IdeaScoring, ProductIdea};

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Values used for optional fields the generator left out.
#[derive(Debug, Clone)]
pub struct IdeaDefaults {
    pub category: String,
    pub source_names: Vec<String>,
    pub source_links: Vec<String>,
    pub now: DateTime<Utc>,
}

/// Validate one raw idea.
///
/// # Errors
///
/// Returns [`ValidationError`] when the value is not an object, a required
/// text field is missing or blank, or a scoring field is missing, non-numeric
/// or outside `0..=100`.
pub fn validate_idea(value: &Value, defaults: &IdeaDefaults) -> Result<ProductIdea, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(ProductIdea {
        name: required_text(obj, "name")?,
        elevator_pitch: required_text(obj, "elevatorPitch")?,
        target_audience: required_text(obj, "targetAudience")?,
        pain_point_solved: required_text(obj, "painPointSolved")?,
        solution_approach: required_text(obj, "solutionApproach")?,
        scoring: scoring(obj)?,
        tags: string_list(obj, "tags")?.unwrap_or_default(),
        category: optional_text(obj, "category")?.unwrap_or_else(|| defaults.category.clone()),
        source_names: string_list(obj, "sourceNames")?
            .unwrap_or_else(|| defaults.source_names.clone()),
        source_links: string_list(obj, "sourceLinks")?
            .unwrap_or_else(|| defaults.source_links.clone()),
        created_at: created_at(obj)?.unwrap_or(defaults.now),
    })
}

/// Validate a batch, keeping valid ideas in input order.
pub fn validate_ideas(
    values: &[Value],
    defaults: &IdeaDefaults,
) -> (Vec<ProductIdea>, Vec<ValidationError>) {
    let mut ideas = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        match validate_idea(value, defaults) {
            Ok(idea) => ideas.push(idea),
            Err(e) => {
                tracing::warn!(index = idx, category = %defaults.category, error = %e, "rejected generated idea");
                rejected.push(e);
            }
        }
    }
    (ideas, rejected)
}

fn required_text(obj: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match optional_text(obj, field)? {
        Some(text) => Ok(text),
        None => Err(ValidationError::MissingField(field)),
    }
}

/// `None` for absent, null or blank; an error for a non-string.
fn optional_text(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ValidationError::WrongType {
            field,
            reason: format!("expected a string, got {}", kind(other)),
        }),
    }
}

fn string_list(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, ValidationError> {
    let items = match obj.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::WrongType {
                field,
                reason: format!("expected an array of strings, got {}", kind(other)),
            })
        }
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::WrongType {
                    field,
                    reason: format!("array holds {}", kind(item)),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn created_at(obj: &Map<String, Value>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match obj.get("createdAt") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::WrongType {
                field: "createdAt",
                reason: e.to_string(),
            }),
        Some(other) => Err(ValidationError::WrongType {
            field: "createdAt",
            reason: format!("expected an RFC 3339 string, got {}", kind(other)),
        }),
    }
}

fn scoring(obj: &Map<String, Value>) -> Result<IdeaScoring, ValidationError> {
    let scoring = match obj.get("scoring") {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("scoring")),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ValidationError::WrongType {
                field: "scoring",
                reason: format!("expected an object, got {}", kind(other)),
            })
        }
    };

    Ok(IdeaScoring {
        overall: score(scoring, "overall", "scoring.overall")?,
        pain_severity: score(scoring, "painSeverity", "scoring.painSeverity")?,
        market_size: score(scoring, "marketSize", "scoring.marketSize")?,
        competition: score(scoring, "competition", "scoring.competition")?,
        implementation_difficulty: score(
            scoring,
            "implementationDifficulty",
            "scoring.implementationDifficulty",
        )?,
    })
}

fn score(
    scoring: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<f64, ValidationError> {
    let value = match scoring.get(key) {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(field)),
        Some(v) => v,
    };
    let number = value.as_f64().ok_or_else(|| ValidationError::WrongType {
        field,
        reason: format!("expected a number, got {}", kind(value)),
    })?;
    if !(SCORE_MIN..=SCORE_MAX).contains(&number) {
        return Err(ValidationError::OutOfRange {
            field,
            value: number.to_string(),
        });
    }
    Ok(number)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
