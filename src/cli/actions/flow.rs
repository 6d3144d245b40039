use crate::cli::{actions::Action, globals::GlobalArgs, prompt};
use crate::sesamo::{
    client::Submitter,
    flow::{FlowController, FlowKind, FlowStep, Navigator, Presenter, StepOutcome},
    prefs::{FilePreferences, PreferenceStore, REMEMBER_ME},
};
use anyhow::Result;
use tracing::debug;

/// Console sinks for the controller's collaborators. Navigation prints the
/// target path; field errors and alerts go to the terminal.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go(&mut self, path: &str) {
        println!("-> {path}");
    }
}

struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn field_error(&mut self, field: &str, message: &str) {
        // an empty message clears the error; nothing to print on a terminal
        if !message.is_empty() {
            eprintln!("{field}: {message}");
        }
    }

    fn alert(&mut self, message: &str) {
        println!("! {message}");
    }
}

/// Handle the register, login and recover actions
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Register { globals } => run_flow(FlowKind::Registration, &globals, None).await,
        Action::Login {
            globals,
            remember_me,
        } => run_flow(FlowKind::Login, &globals, remember_me).await,
        Action::Recover { globals } => run_flow(FlowKind::Recovery, &globals, None).await,
    }
}

async fn run_flow(kind: FlowKind, globals: &GlobalArgs, remember_me: Option<bool>) -> Result<()> {
    let mut prefs = FilePreferences::open(&globals.prefs_path)?;

    // the flags toggle the persisted choice; absent flags leave it alone
    if let Some(value) = remember_me {
        prefs.set(REMEMBER_ME, value)?;
    }

    let remembered = prefs.get(REMEMBER_ME).unwrap_or(false);

    let submitter = Submitter::new(&globals.base_url, globals.policy)?;
    let mut navigator = ConsoleNavigator;
    let mut presenter = ConsolePresenter;

    let mut controller = FlowController::new(
        kind,
        globals.profile,
        &submitter,
        &mut navigator,
        &mut presenter,
    );

    while !controller.is_done() {
        let step = controller.current_step();

        // EOF on the prompt abandons the flow
        let Some(mut submission) = prompt::collect(step)? else {
            controller.cancel();
            break;
        };

        if step == FlowStep::Login {
            submission.insert("rememberMe".to_string(), remembered.to_string());
        }

        let outcome = controller.submit_step(submission).await;
        debug!(?outcome, "step resolved");

        if outcome == StepOutcome::Completed {
            break;
        }
    }

    Ok(())
}
