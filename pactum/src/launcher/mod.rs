//! Launching work.
//!
//! A [`Launcher`] turns a work function and its input into a running task
//! and hands back a [`Promise`](crate::Promise) for the result. Every task
//! gets its own OS thread: there is no pool, no queue and no bound, so the
//! caller decides how much runs at once by how often it launches.
//!
//! Launchers are configured through [`LauncherBuilder`]; the crate-level
//! [`execute`](crate::execute) and [`fan_out`](crate::fan_out) use the
//! default configuration.

mod core;
mod policy;

pub(crate) mod builder;

pub use builder::LauncherBuilder;
pub use self::core::Launcher;
pub use policy::PanicPolicy;
