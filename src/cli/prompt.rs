use crate::sesamo::{flow::FlowStep, validate::FormSubmission};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, BufRead, Write};

/// Fields whose captured value stays wrapped in a [`SecretString`] until the
/// submission is built.
const SECRET_FIELDS: &[&str] = &["password", "password_two"];

fn is_secret(field: &str) -> bool {
    SECRET_FIELDS.contains(&field)
}

/// Prompts for every field of the step's form and returns the submission,
/// or `None` when stdin reaches EOF (the user abandoned the flow).
pub fn collect(step: FlowStep) -> Result<Option<FormSubmission>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    collect_from(step, &mut lines)
}

fn collect_from(
    step: FlowStep,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<FormSubmission>> {
    println!("[{}]", step.path());

    let mut submission = FormSubmission::new();

    for field in step.fields() {
        print!("{field}: ");
        io::stdout().flush().context("error flushing stdout")?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };

        let value = line.context("error reading input")?.trim_end().to_string();

        if is_secret(field) {
            // exposed only here, at the submission boundary
            let secret = SecretString::from(value);
            submission.insert((*field).to_string(), secret.expose_secret().to_string());
        } else {
            submission.insert((*field).to_string(), value);
        }
    }

    Ok(Some(submission))
}
