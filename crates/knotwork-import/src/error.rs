use thiserror::Error;

/// Errors that can occur while extracting a path from an SVG document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// The document is not well-formed XML.
    #[error("malformed SVG document: {0}")]
    Xml(String),

    /// No `<svg>` element was found.
    #[error("no <svg> element found")]
    MissingSvg,

    /// No `<path>` element with a `d` attribute was found.
    #[error("no <path> element with a `d` attribute found")]
    MissingPath,

    /// The root `<svg>` has neither `viewBox` nor `width`/`height`.
    #[error("the <svg> element has no viewBox or width/height")]
    MissingViewport,

    /// The viewport attributes could not be parsed.
    #[error("invalid viewport `{0}`")]
    InvalidViewport(String),

    /// A number in the path data could not be parsed.
    #[error("invalid number `{text}` at byte {offset} of path data")]
    InvalidNumber {
        /// The offending text.
        text: String,
        /// Byte offset in the `d` attribute.
        offset: usize,
    },

    /// Path data must start with a command letter.
    #[error("path data must start with a command, found `{0}`")]
    MissingCommand(String),

    /// A command letter that paths can contain but knots cannot use.
    #[error("unsupported path command `{0}`")]
    UnsupportedCommand(char),

    /// A command got a number of arguments that is not a positive
    /// multiple of its arity.
    #[error("path command `{command}` takes arguments in groups of {arity}, got {count}")]
    BadArgumentCount {
        /// The command letter.
        command: char,
        /// Numbers per repetition.
        arity: usize,
        /// Numbers supplied.
        count: usize,
    },
}
