//! Immutable snapshot + reducer interface for editable domain state.

/// A versioned value that evolves by applying commands.
///
/// - **Decision and mutation are one step**: `apply(&self, cmd)` returns the
///   next snapshot and leaves `self` untouched.
/// - **Total**: commands that do not apply (unknown ids, out-of-range indices)
///   return an identical snapshot instead of an error.
///
/// Snapshots must not perform IO or side effects.
pub trait Snapshot: Clone {
    type Command: Clone + core::fmt::Debug;

    /// Monotonically increasing version, +1 per command that changed state.
    fn version(&self) -> u64;

    /// Produce the next snapshot from a single command.
    fn apply(&self, command: &Self::Command) -> Self;

    /// Fold a sequence of commands, left to right.
    fn apply_all<'a, I>(&self, commands: I) -> Self
    where
        I: IntoIterator<Item = &'a Self::Command>,
        Self::Command: 'a,
    {
        commands
            .into_iter()
            .fold(self.clone(), |state, command| state.apply(command))
    }
}
