//! Default implementations of the capability traits the core consumes.
//!
//! - [`dotnet`]: project discovery, outdated-dependency analysis, and
//!   upgrade application backed by the `dotnet` CLI
//! - [`console`]: operator-facing confirmation prompt and reporter
//!
//! The core never depends on these directly; they are wired in at startup
//! and replaced by mocks in tests.

pub mod console;
pub mod dotnet;
