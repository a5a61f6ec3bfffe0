pub mod console;
pub mod render;
pub mod watch;

pub use console::ConsoleStatusView;
pub use watch::TaskWatcher;
