use super::{Launcher, PanicPolicy};

use std::sync::Arc;

/// Default prefix for task thread names.
pub(crate) const DEFAULT_NAME: &str = "pactum-task";

/// Builder for configuring and creating a [`Launcher`].
///
/// `LauncherBuilder` allows customizing how task threads are created and
/// how panics inside work are handled.
///
/// # Examples
///
/// ```rust,ignore
/// let launcher = LauncherBuilder::new()
///     .name("resize")
///     .stack_size(512 * 1024)
///     .panic_policy(PanicPolicy::Abort)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct LauncherBuilder {
    /// Prefix of task thread names.
    name: String,

    /// Stack size of task threads, platform default when `None`.
    stack_size: Option<usize>,

    /// Handling of panics inside work.
    panic_policy: PanicPolicy,
}

impl LauncherBuilder {
    /// Creates a new `LauncherBuilder` with default configuration.
    ///
    /// Threads are named `pactum-task-{n}`, use the platform stack size,
    /// and panics are isolated into promise errors.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            stack_size: None,
            panic_policy: PanicPolicy::default(),
        }
    }

    /// Sets the prefix of task thread names.
    ///
    /// Each thread is named `{prefix}-{n}`, where `n` is a process-wide
    /// task counter.
    pub fn name(mut self, prefix: impl Into<String>) -> Self {
        self.name = prefix.into();
        self
    }

    /// Sets the stack size of task threads, in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes == 0`.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "stack_size must be > 0");

        self.stack_size = Some(bytes);
        self
    }

    /// Sets how panics inside launched work are handled.
    pub fn panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }

    /// Builds the launcher with the configured options.
    pub fn build(self) -> Launcher {
        Launcher::new(Arc::from(self.name), self.stack_size, self.panic_policy)
    }
}

impl Default for LauncherBuilder {
    /// Creates a default `LauncherBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
