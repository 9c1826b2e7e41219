//! Unsaved-changes navigation guard.

pub const UNSAVED_CHANGES_PROMPT: &str =
    "\nYour changes are not yet saved!\n\nClick OK discard changes, Cancel to continue editing.";

/// What the host must do before leaving the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    /// Ask the user; proceed only if they choose to discard.
    Confirm { message: &'static str },
}

/// The user's answer to the discard prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Discard,
    Cancel,
}

/// Blocks in-app and browser-level navigation while edits are unsaved.
pub struct NavigationGuard;

impl NavigationGuard {
    pub fn check(dirty: bool) -> NavigationDecision {
        if dirty {
            NavigationDecision::Confirm {
                message: UNSAVED_CHANGES_PROMPT,
            }
        } else {
            NavigationDecision::Proceed
        }
    }
}

impl NavigationDecision {
    pub fn is_blocking(&self) -> bool {
        matches!(self, NavigationDecision::Confirm { .. })
    }

    /// Whether navigation goes ahead given the user's answer.
    pub fn allows(&self, choice: PromptChoice) -> bool {
        match self {
            NavigationDecision::Proceed => true,
            NavigationDecision::Confirm { .. } => choice == PromptChoice::Discard,
        }
    }
}
