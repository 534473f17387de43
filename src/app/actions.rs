//! Output produced by the event handler.
//!
//! The handler never writes to the terminal itself. It returns a `Vec<Action>`
//! and the composition root performs them in order.

/// A side effect for the shell to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Writes the text as-is. Rendered views are already newline-terminated.
    Print(String),

    /// Ends the input loop.
    Quit,
}

impl Action {
    /// Wraps a single message line.
    pub fn line(message: impl std::fmt::Display) -> Self {
        Self::Print(format!("{message}\n"))
    }
}
