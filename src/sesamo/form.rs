use crate::sesamo::validate::{self, FieldRule, FormSubmission};

/// One declared field of a form and its ordered rule list.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: &'static str,
    pub rules: Vec<FieldRule>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(id: &'static str, rules: Vec<FieldRule>) -> Self {
        Self { id, rules }
    }
}

#[derive(Debug, Clone)]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
}

/// Aggregated validation state of one form. Carries a message (possibly
/// empty) for EVERY declared field so a rendering collaborator can both set
/// and clear error text; clearing stale errors from a previous attempt is
/// part of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidationOutcome {
    pub all_valid: bool,
    pub field_messages: Vec<(&'static str, String)>,
}

impl FormValidationOutcome {
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.field_messages
            .iter()
            .find(|(id, _)| *id == field)
            .map(|(_, message)| message.as_str())
    }
}

/// Runs the field validator over every declared field. Pure and idempotent:
/// the same submission always yields the same outcome. Submission may
/// proceed iff `all_valid`.
pub fn evaluate(form: &FormSpec, submission: &FormSubmission) -> FormValidationOutcome {
    let mut all_valid = true;
    let mut field_messages = Vec::with_capacity(form.fields.len());

    for field in &form.fields {
        let value = submission.get(field.id).map_or("", String::as_str);
        let result = validate::validate(&field.rules, value, submission);

        if !result.valid {
            all_valid = false;
        }

        field_messages.push((field.id, result.message));
    }

    FormValidationOutcome {
        all_valid,
        field_messages,
    }
}
