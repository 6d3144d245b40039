use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;

/// Raw field values of one form, keyed by field id. Fresh per step,
/// discarded once the step resolves.
pub type FormSubmission = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    #[must_use]
    pub fn fail(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}

/// A single check applied to a field value.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    EmailFormat,
    UppercaseAndDigit,
    UppercaseDigitSpecial,
    /// Value must equal the named field of the same submission.
    MatchesField(&'static str),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub rule: Rule,
    pub message: &'static str,
}

impl FieldRule {
    #[must_use]
    pub const fn new(rule: Rule, message: &'static str) -> Self {
        Self { rule, message }
    }
}

fn satisfies(rule: &Rule, value: &str, submission: &FormSubmission) -> bool {
    match rule {
        Rule::Required => !value.is_empty(),
        Rule::MinLength(min) => value.chars().count() >= *min,
        Rule::EmailFormat => Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .map_or(false, |re| re.is_match(value)),
        Rule::UppercaseAndDigit => {
            value.chars().any(|c| c.is_ascii_uppercase())
                && value.chars().any(|c| c.is_ascii_digit())
        }
        Rule::UppercaseDigitSpecial => {
            value.chars().any(|c| c.is_ascii_uppercase())
                && value.chars().any(|c| c.is_ascii_digit())
                && value.chars().any(|c| c == '_' || c == '-')
        }
        Rule::MatchesField(other) => submission
            .get(*other)
            .is_some_and(|expected| expected == value),
    }
}

/// Checks `value` against `rules` in declaration order and returns the FIRST
/// failing rule's message. Later rules are not consulted, so `Required`
/// always wins over shape checks.
pub fn validate(rules: &[FieldRule], value: &str, submission: &FormSubmission) -> ValidationResult {
    for field_rule in rules {
        if !satisfies(&field_rule.rule, value, submission) {
            return ValidationResult::fail(field_rule.message);
        }
    }

    ValidationResult::ok()
}

/// Named validation regime for the registration form. Two incompatible
/// regimes exist upstream; both are first-class and chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleProfile {
    Strict,
    Lenient,
}

impl RuleProfile {
    #[must_use]
    pub fn registration_login_rules(self) -> Vec<FieldRule> {
        match self {
            Self::Strict => vec![
                FieldRule::new(Rule::Required, "Enter your login!"),
                FieldRule::new(Rule::MinLength(5), "Login is too short!"),
                FieldRule::new(
                    Rule::UppercaseAndDigit,
                    "Login must contain an uppercase letter and a digit!",
                ),
            ],
            Self::Lenient => vec![
                FieldRule::new(Rule::Required, "Enter your login!"),
                FieldRule::new(Rule::MinLength(7), "Login is too short!"),
            ],
        }
    }

    #[must_use]
    pub fn registration_password_rules(self) -> Vec<FieldRule> {
        match self {
            Self::Strict => vec![
                FieldRule::new(Rule::Required, "Enter your password!"),
                FieldRule::new(Rule::MinLength(7), "Password is too short!"),
                FieldRule::new(
                    Rule::UppercaseDigitSpecial,
                    "Password must contain an uppercase letter, a digit and \"_\" or \"-\"!",
                ),
            ],
            Self::Lenient => vec![
                FieldRule::new(Rule::Required, "Enter your password!"),
                FieldRule::new(Rule::MinLength(10), "Password is too short!"),
            ],
        }
    }
}

impl FromStr for RuleProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(format!("invalid rule profile: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(pairs: &[(&str, &str)]) -> FormSubmission {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_required_takes_precedence() {
        // an empty value must report the required message even when later
        // rules would also fail
        let rules = RuleProfile::Strict.registration_password_rules();
        let result = validate(&rules, "", &FormSubmission::new());

        assert!(!result.valid);
        assert_eq!(result.message, "Enter your password!");
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let rules = RuleProfile::Strict.registration_login_rules();

        let result = validate(&rules, "ab", &FormSubmission::new());
        assert_eq!(result.message, "Login is too short!");

        let result = validate(&rules, "abcdef", &FormSubmission::new());
        assert_eq!(
            result.message,
            "Login must contain an uppercase letter and a digit!"
        );
    }

    #[test]
    fn test_strict_login_accepts_uppercase_and_digit() {
        let rules = RuleProfile::Strict.registration_login_rules();
        let result = validate(&rules, "ABCDE1", &FormSubmission::new());

        assert!(result.valid);
        assert_eq!(result.message, "");
    }

    #[test]
    fn test_lenient_login_is_length_only() {
        let rules = RuleProfile::Lenient.registration_login_rules();

        assert!(!validate(&rules, "abcdef", &FormSubmission::new()).valid);
        assert!(validate(&rules, "abcdefg", &FormSubmission::new()).valid);
    }

    #[test]
    fn test_strict_password_needs_special() {
        let rules = RuleProfile::Strict.registration_password_rules();

        let result = validate(&rules, "Aa1aaaa", &FormSubmission::new());
        assert_eq!(
            result.message,
            "Password must contain an uppercase letter, a digit and \"_\" or \"-\"!"
        );

        assert!(validate(&rules, "Aa1_aaaa", &FormSubmission::new()).valid);
        assert!(validate(&rules, "Aa1-aaaa", &FormSubmission::new()).valid);
    }

    #[test]
    fn test_lenient_password_is_length_only() {
        let rules = RuleProfile::Lenient.registration_password_rules();

        assert!(!validate(&rules, "short", &FormSubmission::new()).valid);
        assert!(validate(&rules, "aaaaaaaaaa", &FormSubmission::new()).valid);
    }

    #[test]
    fn test_email_format() {
        let rules = vec![
            FieldRule::new(Rule::Required, "Enter your email!"),
            FieldRule::new(Rule::EmailFormat, "Enter a valid email!"),
        ];

        assert!(validate(&rules, "user@example.com", &FormSubmission::new()).valid);
        assert!(validate(&rules, "u.ser_x-1@sub.example.org", &FormSubmission::new()).valid);

        for bad in ["bad-email", "user@", "@example.com", "user@example", "user@example.c"] {
            let result = validate(&rules, bad, &FormSubmission::new());
            assert!(!result.valid, "accepted {bad}");
            assert_eq!(result.message, "Enter a valid email!");
        }
    }

    #[test]
    fn test_matches_field() {
        let rules = vec![
            FieldRule::new(Rule::Required, "Repeat your password!"),
            FieldRule::new(Rule::MatchesField("password"), "Passwords do not match!"),
        ];

        let sub = submission(&[("password", "Secret1_")]);
        assert!(validate(&rules, "Secret1_", &sub).valid);

        let result = validate(&rules, "Secret2_", &sub);
        assert!(!result.valid);
        assert_eq!(result.message, "Passwords do not match!");

        // missing counterpart counts as a mismatch
        let result = validate(&rules, "Secret1_", &FormSubmission::new());
        assert!(!result.valid);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("strict".parse::<RuleProfile>(), Ok(RuleProfile::Strict));
        assert_eq!("LENIENT".parse::<RuleProfile>(), Ok(RuleProfile::Lenient));
        assert!("loose".parse::<RuleProfile>().is_err());
    }
}
