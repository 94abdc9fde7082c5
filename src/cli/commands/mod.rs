//! One module per subcommand. Each exposes an `execute` entry point
//! called from `main`.

pub mod add;
pub mod completions;
pub mod install_hook;
pub mod list;
pub mod replace;
pub mod reverse;
pub mod rotate;
