//! Dispatch of user input to navigator operations.

mod command_table;
mod invocation;
mod outcome;

pub use command_table::CommandTable;
pub use invocation::Invocation;
pub use outcome::Outcome;
