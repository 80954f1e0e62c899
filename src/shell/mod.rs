//! Subprocess execution, PATH lookup and privilege detection.

pub mod command;
pub mod path;
pub mod platform;
pub mod recording;
pub mod runner;

pub use command::{execute_streaming, CommandResult, Invocation, OutputCallback, OutputLine};
pub use path::{find_on_path, parse_system_path, resolve_tool_path};
pub use platform::{is_ci, is_elevated, Privilege};
pub use recording::RecordingRunner;
pub use runner::{CommandRunner, SystemRunner};
