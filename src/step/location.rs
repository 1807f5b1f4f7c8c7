//! Source location of step definitions.

use derive_more::with_trait::Display;

/// Source location a step definition was registered at.
///
/// Usually filled with the [`location!`] macro at the registration site;
/// shown in ambiguity warnings so colliding definitions can be told
/// apart.
///
/// [`location!`]: crate::location
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path of the file the definition lives in.
    pub path: &'static str,

    /// Line within the file.
    pub line: u32,

    /// Column within the line.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`].
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }
}

/// Captures the current source [`Location`], for attaching to a step
/// definition at its registration site.
///
/// [`Location`]: crate::step::Location
#[macro_export]
macro_rules! location {
    () => {
        $crate::step::Location::new(
            ::core::file!(),
            ::core::line!(),
            ::core::column!(),
        )
    };
}
