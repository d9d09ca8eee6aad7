//! Comment form validation
//!
//! Validation is a small rule table: each field maps to an ordered list of
//! predicate/message pairs. Running the table over raw input yields either the
//! cleaned value or a field → messages map suitable for a 400 response.
//!
//! The same table backs [`COMMENT_FORM`], the form descriptor the index page
//! renders, so the HTML form and the API enforce identical limits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 140;

/// Name of the comment text field
pub const TEXT_FIELD: &str = "text";

const REQUIRED_MESSAGE: &str = "This field is required.";
const TOO_LONG_MESSAGE: &str = "Field cannot be longer than 140 characters.";
const CONTROL_CHAR_MESSAGE: &str = "Field cannot contain control characters.";

/// Raw, unvalidated comment submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommentInput {
    /// Comment text as submitted, if present at all
    #[serde(default)]
    pub text: Option<String>,
}

impl CommentInput {
    /// Input carrying the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Field name → ordered list of error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// An empty error map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// True when no field has a message
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `field` has at least one message
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field, in rule order
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Fields and their messages, ordered by field name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

/// A single check applied to a field's raw value
struct Rule {
    check: fn(Option<&str>) -> bool,
    message: &'static str,
    /// Skip the field's remaining rules when this one fails
    halts: bool,
}

struct FieldRules {
    name: &'static str,
    rules: &'static [Rule],
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn within_max_length(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().chars().count() <= MAX_COMMENT_LENGTH)
}

/// Line breaks and tabs are allowed; NUL and other control characters are not
fn free_of_control_chars(value: Option<&str>) -> bool {
    value.map_or(true, |v| !v.chars().any(|c| c.is_control() && !c.is_whitespace()))
}

static COMMENT_RULES: &[FieldRules] = &[FieldRules {
    name: TEXT_FIELD,
    rules: &[
        Rule {
            check: is_present,
            message: REQUIRED_MESSAGE,
            halts: true,
        },
        Rule {
            check: within_max_length,
            message: TOO_LONG_MESSAGE,
            halts: false,
        },
        Rule {
            check: free_of_control_chars,
            message: CONTROL_CHAR_MESSAGE,
            halts: false,
        },
    ],
}];

fn field_value<'a>(input: &'a CommentInput, field: &str) -> Option<&'a str> {
    match field {
        TEXT_FIELD => input.text.as_deref(),
        _ => None,
    }
}

/// Validate a comment submission
///
/// Returns the trimmed text on success. Malformed input never panics; every
/// failure is reported through the returned error map.
pub fn validate_comment_input(raw: &CommentInput) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field in COMMENT_RULES {
        let value = field_value(raw, field.name);
        for rule in field.rules {
            if !(rule.check)(value) {
                errors.add(field.name, rule.message);
                if rule.halts {
                    break;
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(raw.text.as_deref().unwrap_or_default().trim().to_string())
}

/// Metadata for one form field, as rendered by the index page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Form field name
    pub name: &'static str,
    /// Label shown next to the input
    pub label: &'static str,
    /// Whether the field must be non-blank
    pub required: bool,
    /// Maximum length in characters, if any
    pub max_length: Option<usize>,
}

/// Unbound form description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormDescriptor {
    /// Fields in display order
    pub fields: &'static [FieldDescriptor],
}

/// The comment submission form
pub static COMMENT_FORM: FormDescriptor = FormDescriptor {
    fields: &[FieldDescriptor {
        name: TEXT_FIELD,
        label: "Comment",
        required: true,
        max_length: Some(MAX_COMMENT_LENGTH),
    }],
};
