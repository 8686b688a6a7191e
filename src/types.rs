/// What [`Binder::parse`](crate::Binder::parse) does when binding fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller. A help request is not an error.
    ContinueOnError,
    /// Report the error on the output sink and return [`Outcome::Fatal`].
    /// A help request returns [`Outcome::Help`].
    #[default]
    ExitOnError,
    /// Panic with the [`Error`](crate::Error) as payload, help requests included.
    PanicOnError,
}

/// How a successful [`Binder::parse`](crate::Binder::parse) call ended.
///
/// The binder never exits the process itself. Callers that want the
/// conventional behavior do:
///
/// ```ignore
/// if let Some(code) = binder.parse(&mut config, &args)?.exit_code() {
///     std::process::exit(code);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The config is fully bound.
    Continue,
    /// Usage was printed.
    Help,
    /// An error was reported on the output sink.
    Fatal,
}

impl Outcome {
    pub fn exit_code(self) -> Option<i32> {
        match self {
            Outcome::Continue => None,
            Outcome::Help => Some(0),
            Outcome::Fatal => Some(2),
        }
    }
}
