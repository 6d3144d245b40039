use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::sesamo::{client::SuccessPolicy, validate::RuleProfile};
use anyhow::{anyhow, Result};
use std::path::PathBuf;

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let base_url = matches
        .get_one("base-url")
        .map(|s: &String| s.to_string())
        .ok_or_else(|| anyhow!("missing required argument: --base-url"))?;

    let profile = matches
        .get_one("profile")
        .map_or("strict", |s: &String| s.as_str())
        .parse::<RuleProfile>()
        .map_err(|e| anyhow!(e))?;

    let policy = matches
        .get_one("policy")
        .map_or("success-class", |s: &String| s.as_str())
        .parse::<SuccessPolicy>()
        .map_err(|e| anyhow!(e))?;

    let prefs_path = matches
        .get_one("prefs")
        .map_or_else(|| PathBuf::from(".sesamo.json"), |s: &String| PathBuf::from(s));

    Ok(GlobalArgs {
        base_url,
        profile,
        policy,
        prefs_path,
    })
}

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    // global args resolve against the subcommand matches
    let globals = globals(sub_m)?;

    match name {
        "register" => Ok(Action::Register { globals }),
        "login" => {
            let remember_me = if sub_m.get_flag("remember-me") {
                Some(true)
            } else if sub_m.get_flag("no-remember-me") {
                Some(false)
            } else {
                None
            };

            Ok(Action::Login {
                globals,
                remember_me,
            })
        }
        "recover" => Ok(Action::Recover { globals }),
        _ => Err(anyhow!("unknown subcommand: {name}")),
    }
}
