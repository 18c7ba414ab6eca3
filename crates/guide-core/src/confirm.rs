//! Yes/No Confirmation

/// Interactive yes/no prompt
pub trait Confirm {
    /// Show `prompt` and return whether the user accepted
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, for tests and non-interactive callers
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}
