/// What the shell should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Regular command output
    Print(String),
    /// A non-fatal miss; the session goes on unchanged
    Report(String),
    Nothing,
    Clear,
    Quit,
}
