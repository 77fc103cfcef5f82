/// A line of user input split into a command name and its optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: String,
    pub argument: Option<&'a str>,
}

impl<'a> Invocation<'a> {
    /// Returns `None` for blank input. Tokens past the second are ignored.
    pub fn parse(input: &'a str) -> Option<Self> {
        let mut tokens = input.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        let argument = tokens.next();
        Some(Self { name, argument })
    }
}
