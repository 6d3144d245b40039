use crate::sesamo::{client::SuccessPolicy, validate::RuleProfile};
use std::path::PathBuf;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub base_url: String,
    pub profile: RuleProfile,
    pub policy: SuccessPolicy,
    pub prefs_path: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            profile: RuleProfile::Strict,
            policy: SuccessPolicy::SuccessClass,
            prefs_path: PathBuf::from(".sesamo.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("http://localhost:8000".to_string());

        assert_eq!(args.base_url, "http://localhost:8000");
        assert_eq!(args.profile, RuleProfile::Strict);
        assert_eq!(args.policy, SuccessPolicy::SuccessClass);
        assert_eq!(args.prefs_path, PathBuf::from(".sesamo.json"));
    }
}
