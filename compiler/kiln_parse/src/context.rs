//! Parse context flags for context-sensitive parsing.

/// Context flags for parsing.
///
/// Multiple flags can be combined with [`ParseContext::with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseContext(u8);

impl ParseContext {
    /// No special context.
    pub const NONE: Self = Self(0);

    /// A `{` after a call does not start a trailing block argument.
    /// Set while parsing `if` conditions and `for` iterables so the brace
    /// belongs to the construct instead of the call.
    pub const NO_TRAILING_BLOCK: Self = Self(1 << 0);

    #[inline]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }
}
