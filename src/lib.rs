#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::fn_params_excessive_bools,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::too_many_lines
)]
#![deny(unsafe_code)]

mod error;
mod escape;
mod event;
mod parser;
mod source;
mod token;

pub use crate::error::*;
pub use crate::event::*;
pub use crate::parser::{Parser, ParserState};
pub use crate::source::TokenSource;
pub use crate::token::*;

/// The tag directive data: a shorthand handle and the prefix it
/// expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective {
    /// The tag handle.
    pub handle: String,
    /// The tag prefix.
    pub prefix: String,
}

/// The stream encoding, as detected by the reader.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Encoding {
    /// The default UTF-8 encoding.
    #[default]
    Utf8,
    /// The UTF-16-LE encoding with BOM.
    Utf16Le,
    /// The UTF-16-BE encoding with BOM.
    Utf16Be,
    /// The UTF-32-LE encoding with BOM.
    Utf32Le,
    /// The UTF-32-BE encoding with BOM.
    Utf32Be,
}

/// Scalar styles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ScalarStyle {
    /// The plain scalar style.
    Plain,
    /// The single-quoted scalar style.
    SingleQuoted,
    /// The double-quoted scalar style.
    DoubleQuoted,
    /// The literal scalar style.
    Literal,
    /// The folded scalar style.
    Folded,
}

/// Sequence styles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SequenceStyle {
    /// The block sequence style.
    Block,
    /// The flow sequence style.
    Flow,
}

/// Mapping styles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum MappingStyle {
    /// The block mapping style.
    Block,
    /// The flow mapping style.
    Flow,
}
