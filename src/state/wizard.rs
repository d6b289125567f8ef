/// The check-in wizard step machine
///
/// The wizard is a linear, forward-only sequence of six panels. Each
/// "next" action is gated by the validator for the step being left;
/// when a gate fails the step does not change and exactly one reason
/// is reported. The only backwards-looking action is the photo retake,
/// which is a sub-state of the photo step and never changes the step.
use crate::state::draft::VisitorDraft;
use crate::validate::{self, ValidationError};

/// One panel of the wizard. Exactly one step is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Greeting panel with the sign-in button
    SignIn,
    /// First and last name entry
    Name,
    /// Email, phone, purpose of visit and meeting person
    Contact,
    /// Visitor agreement and confidentiality checkbox
    Agreement,
    /// Live camera preview, countdown and photo capture
    Photo,
    /// Summary panel with the finish button
    Welcome,
}

impl Step {
    /// Stable 1-based numbering, used for the progress header.
    pub fn number(self) -> u8 {
        match self {
            Step::SignIn => 1,
            Step::Name => 2,
            Step::Contact => 3,
            Step::Agreement => 4,
            Step::Photo => 5,
            Step::Welcome => 6,
        }
    }

    /// Total number of steps.
    pub const COUNT: u8 = 6;

    /// The step that follows this one.
    ///
    /// Panics when asked for the step after the last panel; the finish
    /// action submits instead of advancing, so reaching this is a bug
    /// in the caller.
    fn next(self) -> Step {
        match self {
            Step::SignIn => Step::Name,
            Step::Name => Step::Contact,
            Step::Contact => Step::Agreement,
            Step::Agreement => Step::Photo,
            Step::Photo => Step::Welcome,
            Step::Welcome => unreachable!("the welcome panel has no next step"),
        }
    }
}

/// Tracks the currently visible step.
///
/// The step is mutated only through `advance` and `reset`, so every
/// forward transition passes through its validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    step: Step,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    /// A fresh wizard, showing the sign-in panel.
    pub fn new() -> Self {
        WizardState { step: Step::SignIn }
    }

    /// The currently visible step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Validate the current step against the draft and move forward.
    ///
    /// On success returns the step that is now visible; the caller
    /// starts the camera when that step is `Step::Photo`. On failure
    /// the step is unchanged and the single blocking reason is
    /// returned, chosen by the step's fixed check order.
    pub fn advance(&mut self, draft: &VisitorDraft) -> Result<Step, ValidationError> {
        match self.step {
            // The greeting panel has nothing to validate.
            Step::SignIn => {}
            Step::Name => validate::validate_name(&draft.first_name, &draft.last_name)?,
            Step::Contact => validate::validate_contact(
                &draft.email,
                &draft.phone,
                &draft.purpose,
                &draft.finding,
            )?,
            Step::Agreement => {
                if !draft.agreed {
                    return Err(ValidationError::AgreementRequired);
                }
            }
            Step::Photo => {
                if draft.photo.is_none() {
                    return Err(ValidationError::PhotoMissing);
                }
            }
            Step::Welcome => unreachable!("the welcome panel has no next step"),
        }

        self.step = self.step.next();
        Ok(self.step)
    }

    /// Return to the sign-in panel. Used after a successful submission.
    pub fn reset(&mut self) {
        self.step = Step::SignIn;
    }
}
