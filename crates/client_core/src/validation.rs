use std::fmt;

use shared::domain::PostDraft;

pub const TITLE_MIN_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Body,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Body => "body",
        }
    }

    fn value(self, draft: &PostDraft) -> &str {
        match self {
            Field::Title => &draft.title,
            Field::Body => &draft.body,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required { message: String },
    MinLength { min: usize, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    fn check(&self, value: &str) -> Option<&str> {
        match self {
            Rule::Required { message } if value.is_empty() => Some(message.as_str()),
            // Length counts characters, not bytes.
            Rule::MinLength { min, message } if value.chars().count() < *min => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// One message per failing field, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    fields: Vec<(Field, Vec<Rule>)>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_form() -> Self {
        Self::new()
            .field(Field::Body, vec![Rule::required("Text is required")])
            .field(
                Field::Title,
                vec![
                    Rule::required("Title is required"),
                    Rule::min_length(TITLE_MIN_LEN, "Title must be at least 4 characters"),
                ],
            )
    }

    pub fn field(mut self, field: Field, rules: Vec<Rule>) -> Self {
        self.fields.push((field, rules));
        self
    }

    pub fn validate(&self, draft: &PostDraft) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|(field, rules)| {
                let value = field.value(draft);
                rules.iter().find_map(|rule| rule.check(value)).map(|message| FieldError {
                    field: *field,
                    message: message.to_string(),
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
