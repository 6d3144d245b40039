use crate::sesamo::client::{RemoteOutcome, Submitter};
use crate::sesamo::form::{self, FieldSpec, FormSpec};
use crate::sesamo::validate::{FieldRule, FormSubmission, Rule, RuleProfile};
use tracing::{debug, info, instrument, warn};

/// Navigation sink. The controller only hands it target paths; rendering a
/// page (or switching a prompt) is the collaborator's business.
pub trait Navigator {
    fn go(&mut self, path: &str);
}

/// Presentation sink. An empty `message` for a field clears that field's
/// error text; `alert` is a single blocking message.
pub trait Presenter {
    fn field_error(&mut self, field: &str, message: &str);
    fn alert(&mut self, message: &str);
}

/// One form-and-submit unit within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Register,
    ConfirmRegistration,
    Login,
    VerifyLogin,
    RequestRecovery,
    SubmitResetCode,
    SetNewPassword,
}

impl FlowStep {
    /// Page path and endpoint of the step; the two coincide.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Register => "/registration",
            Self::ConfirmRegistration => "/registration/confirm",
            Self::Login => "/authorization",
            Self::VerifyLogin => "/authorization/verification",
            Self::RequestRecovery => "/authorization/recover",
            Self::SubmitResetCode => "/authorization/recover/reset_code",
            Self::SetNewPassword => "/authorization/recover/reset_code/change_password",
        }
    }

    /// Declared form fields, in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Register => &["email", "login", "password", "password_two"],
            Self::Login => &["login", "password"],
            Self::RequestRecovery => &["user"],
            Self::ConfirmRegistration | Self::VerifyLogin | Self::SubmitResetCode => &["code"],
            Self::SetNewPassword => &["password", "password_two"],
        }
    }

    /// Payload fields may differ from form fields: login also carries the
    /// persisted rememberMe preference.
    #[must_use]
    pub const fn payload_fields(self) -> &'static [&'static str] {
        match self {
            Self::Login => &["login", "password", "rememberMe"],
            _ => self.fields(),
        }
    }

    /// Rule set of the step's form. Only registration is profile-sensitive;
    /// the code-entry steps check nothing beyond non-emptiness.
    #[must_use]
    pub fn form(self, profile: RuleProfile) -> FormSpec {
        let fields = match self {
            Self::Register => vec![
                FieldSpec::new(
                    "email",
                    vec![
                        FieldRule::new(Rule::Required, "Enter your email!"),
                        FieldRule::new(Rule::EmailFormat, "Enter a valid email!"),
                    ],
                ),
                FieldSpec::new("login", profile.registration_login_rules()),
                FieldSpec::new("password", profile.registration_password_rules()),
                FieldSpec::new(
                    "password_two",
                    vec![
                        FieldRule::new(Rule::Required, "Repeat your password!"),
                        FieldRule::new(Rule::MatchesField("password"), "Passwords do not match!"),
                    ],
                ),
            ],
            Self::Login => vec![
                FieldSpec::new(
                    "login",
                    vec![FieldRule::new(Rule::Required, "Enter your login!")],
                ),
                FieldSpec::new(
                    "password",
                    vec![FieldRule::new(Rule::Required, "Enter your password!")],
                ),
            ],
            Self::RequestRecovery => vec![FieldSpec::new(
                "user",
                vec![FieldRule::new(Rule::Required, "Enter your login or email!")],
            )],
            Self::ConfirmRegistration | Self::VerifyLogin | Self::SubmitResetCode => {
                vec![FieldSpec::new(
                    "code",
                    vec![FieldRule::new(Rule::Required, "Enter the code!")],
                )]
            }
            Self::SetNewPassword => vec![
                FieldSpec::new(
                    "password",
                    vec![FieldRule::new(Rule::Required, "Enter your password!")],
                ),
                FieldSpec::new(
                    "password_two",
                    vec![
                        FieldRule::new(Rule::Required, "Repeat your password!"),
                        FieldRule::new(Rule::MatchesField("password"), "Passwords do not match!"),
                    ],
                ),
            ],
        };

        FormSpec { fields }
    }

    fn payload(self, submission: &FormSubmission) -> Vec<(String, String)> {
        self.payload_fields()
            .iter()
            .map(|field| {
                (
                    (*field).to_string(),
                    submission.get(*field).cloned().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Whether a server rejection re-presents the step's own path. The flows
    /// are deliberately asymmetric here: the entry forms just remain.
    const fn reloads_on_failure(self) -> bool {
        !matches!(self, Self::Register | Self::Login)
    }
}

/// A named flow and its entry step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Registration,
    Login,
    Recovery,
}

impl FlowKind {
    #[must_use]
    pub const fn entry(self) -> FlowStep {
        match self {
            Self::Registration => FlowStep::Register,
            Self::Login => FlowStep::Login,
            Self::Recovery => FlowStep::RequestRecovery,
        }
    }
}

/// How one submission resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Local validation failed; nothing was sent.
    Blocked,
    /// The server rejected the submission; the step did not change.
    Failed,
    /// Moved to the next step of the flow.
    Advanced(FlowStep),
    /// The flow reached its terminal state.
    Completed,
    /// The flow is already terminal or cancelled; the submission was
    /// discarded without side effects.
    Ignored,
}

/// Typed state machine sequencing the steps of one flow. Owns nothing
/// outward: navigation and presentation happen through the injected
/// collaborators, the network through the submitter.
pub struct FlowController<'a, N: Navigator, P: Presenter> {
    step: FlowStep,
    profile: RuleProfile,
    submitter: &'a Submitter,
    navigator: &'a mut N,
    presenter: &'a mut P,
    done: bool,
}

impl<'a, N: Navigator, P: Presenter> FlowController<'a, N, P> {
    pub fn new(
        kind: FlowKind,
        profile: RuleProfile,
        submitter: &'a Submitter,
        navigator: &'a mut N,
        presenter: &'a mut P,
    ) -> Self {
        Self {
            step: kind.entry(),
            profile,
            submitter,
            navigator,
            presenter,
            done: false,
        }
    }

    #[must_use]
    pub const fn current_step(&self) -> FlowStep {
        self.step
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Abandoning a flow is a first-class transition: the in-memory
    /// submission is simply discarded, nothing to clean up.
    pub fn cancel(&mut self) {
        if !self.done {
            info!(step = ?self.step, "flow cancelled");
            self.done = true;
        }
    }

    /// Handles one submission of the current step's form: validate, gate,
    /// submit, then apply exactly the transition declared for this step.
    /// Terminal transitions are idempotent; a submit after completion is
    /// ignored.
    #[instrument(skip_all, fields(step = ?self.step))]
    pub async fn submit_step(&mut self, submission: FormSubmission) -> StepOutcome {
        if self.done {
            warn!("flow already resolved, discarding submission");

            return StepOutcome::Ignored;
        }

        let outcome = form::evaluate(&self.step.form(self.profile), &submission);

        // set AND clear error text for every declared field
        for (field, message) in &outcome.field_messages {
            self.presenter.field_error(field, message);
        }

        if !outcome.all_valid {
            debug!("submission blocked by local validation");

            return StepOutcome::Blocked;
        }

        let payload = self.step.payload(&submission);
        let remote = self.submitter.submit(self.step.path(), &payload).await;

        self.resolve(&remote)
    }

    fn resolve(&mut self, remote: &RemoteOutcome) -> StepOutcome {
        if !remote.succeeded {
            if let Some(message) = &remote.message {
                self.presenter.alert(message);
            }

            if self.step.reloads_on_failure() {
                self.navigator.go(self.step.path());
            }

            return StepOutcome::Failed;
        }

        match self.step {
            FlowStep::Register => self.advance(FlowStep::ConfirmRegistration),
            FlowStep::Login => self.advance(FlowStep::VerifyLogin),
            FlowStep::RequestRecovery => self.advance(FlowStep::SubmitResetCode),
            FlowStep::SubmitResetCode => self.advance(FlowStep::SetNewPassword),
            FlowStep::ConfirmRegistration => {
                self.presenter.alert("Registration successful!");
                self.complete(Some(FlowStep::Login.path()))
            }
            FlowStep::VerifyLogin => {
                self.presenter.alert("Success!");
                self.complete(None)
            }
            // back to the login entry once the password is changed
            FlowStep::SetNewPassword => self.complete(Some(FlowStep::Login.path())),
        }
    }

    fn advance(&mut self, next: FlowStep) -> StepOutcome {
        debug!(from = ?self.step, to = ?next, "advancing flow");
        self.navigator.go(next.path());
        self.step = next;

        StepOutcome::Advanced(next)
    }

    fn complete(&mut self, target: Option<&str>) -> StepOutcome {
        if let Some(path) = target {
            self.navigator.go(path);
        }

        info!(step = ?self.step, "flow completed");
        self.done = true;

        StepOutcome::Completed
    }
}
