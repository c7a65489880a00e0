//! Concrete implementations of svroll's external collaborators: the
//! supervisor process executor, the glob-based service enumerator, the
//! lock file check, and the stdio log sink.

pub mod enumerator;
pub mod executor;
pub mod lockfile;
pub mod log;

pub use enumerator::GlobServiceEnumerator;
pub use executor::ProcessRestartExecutor;
pub use lockfile::FileLockSource;
pub use log::StdioLogSink;
