// Entry point invoked by the assistant's hook configuration, once per event.
// The payload arrives on stdin; everything worth reading goes to the log file
// in the data directory, since hook stdout is not shown to the user.

mod args;
mod commands;
pub mod types;

pub use args::Cli;
pub use commands::run;
