use crate::{Encoding, Mark, ScalarStyle};

/// The token structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token type.
    pub data: TokenData,
    /// The beginning of the token.
    pub start_mark: Mark,
    /// The end of the token.
    pub end_mark: Mark,
}

impl Token {
    /// Make a token from its data and source positions.
    pub fn new(data: TokenData, start_mark: Mark, end_mark: Mark) -> Token {
        Token {
            data,
            start_mark,
            end_mark,
        }
    }

    /// The fieldless kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.data.kind()
    }
}

/// The directive name classes recognised by the parser.
///
/// Reserved directives (anything other than `%YAML` and `%TAG`) are
/// surfaced as [`DirectiveKind::Other`] and ignored.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DirectiveKind {
    Yaml,
    Tag,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenData {
    /// A STREAM-START token.
    StreamStart {
        /// The detected stream encoding.
        encoding: Encoding,
    },
    /// A STREAM-END token.
    StreamEnd,
    /// A DIRECTIVE token (`%YAML`, `%TAG` or reserved).
    Directive {
        kind: DirectiveKind,
        /// The raw directive arguments. For a `%YAML` directive this is
        /// the version string; for `%TAG` it is the handle immediately
        /// followed by the prefix.
        value: String,
        /// Offset into `value` separating the tag handle from the prefix.
        /// Zero for non-`%TAG` directives.
        value_divider: usize,
    },
    /// A DOCUMENT-START token (`---`).
    DocumentStart,
    /// A DOCUMENT-END token (`...`).
    DocumentEnd,
    /// A BLOCK-SEQUENCE-START token.
    BlockSequenceStart,
    /// A BLOCK-MAPPING-START token.
    BlockMappingStart,
    /// A BLOCK-END token.
    BlockEnd,
    /// A FLOW-SEQUENCE-START token (`[`).
    FlowSequenceStart,
    /// A FLOW-SEQUENCE-END token (`]`).
    FlowSequenceEnd,
    /// A FLOW-MAPPING-START token (`{`).
    FlowMappingStart,
    /// A FLOW-MAPPING-END token (`}`).
    FlowMappingEnd,
    /// A BLOCK-ENTRY token (`-`).
    BlockEntry,
    /// A FLOW-ENTRY token (`,`).
    FlowEntry,
    /// A KEY token.
    Key,
    /// A VALUE token.
    Value,
    /// An ALIAS token (`*anchor`).
    Alias { value: String },
    /// An ANCHOR token (`&anchor`).
    Anchor { value: String },
    /// A TAG token.
    Tag {
        /// The raw tag: handle immediately followed by suffix.
        value: String,
        /// Offset into `value` separating the handle from the suffix.
        /// Zero for the verbatim `!<uri>` form.
        value_divider: usize,
    },
    /// A SCALAR token.
    Scalar {
        /// The scalar contents. Double-quoted scalars still carry their
        /// escape sequences undecoded.
        value: String,
        /// The scalar style.
        style: ScalarStyle,
    },
}

impl TokenData {
    /// The fieldless kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenData::StreamStart { .. } => TokenKind::StreamStart,
            TokenData::StreamEnd => TokenKind::StreamEnd,
            TokenData::Directive { .. } => TokenKind::Directive,
            TokenData::DocumentStart => TokenKind::DocumentStart,
            TokenData::DocumentEnd => TokenKind::DocumentEnd,
            TokenData::BlockSequenceStart => TokenKind::BlockSequenceStart,
            TokenData::BlockMappingStart => TokenKind::BlockMappingStart,
            TokenData::BlockEnd => TokenKind::BlockEnd,
            TokenData::FlowSequenceStart => TokenKind::FlowSequenceStart,
            TokenData::FlowSequenceEnd => TokenKind::FlowSequenceEnd,
            TokenData::FlowMappingStart => TokenKind::FlowMappingStart,
            TokenData::FlowMappingEnd => TokenKind::FlowMappingEnd,
            TokenData::BlockEntry => TokenKind::BlockEntry,
            TokenData::FlowEntry => TokenKind::FlowEntry,
            TokenData::Key => TokenKind::Key,
            TokenData::Value => TokenKind::Value,
            TokenData::Alias { .. } => TokenKind::Alias,
            TokenData::Anchor { .. } => TokenKind::Anchor,
            TokenData::Tag { .. } => TokenKind::Tag,
            TokenData::Scalar { .. } => TokenKind::Scalar,
        }
    }
}

/// The fieldless mirror of [`TokenData`], used for lookahead checks.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TokenKind {
    StreamStart,
    StreamEnd,
    Directive,
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    Alias,
    Anchor,
    Tag,
    Scalar,
}

impl TokenKind {
    /// The human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::StreamStart => "stream start",
            TokenKind::StreamEnd => "stream end",
            TokenKind::Directive => "directive",
            TokenKind::DocumentStart => "document start",
            TokenKind::DocumentEnd => "document end",
            TokenKind::BlockSequenceStart => "block sequence start",
            TokenKind::BlockMappingStart => "block mapping start",
            TokenKind::BlockEnd => "block end",
            TokenKind::FlowSequenceStart => "flow sequence start",
            TokenKind::FlowSequenceEnd => "flow sequence end",
            TokenKind::FlowMappingStart => "flow mapping start",
            TokenKind::FlowMappingEnd => "flow mapping end",
            TokenKind::BlockEntry => "block entry",
            TokenKind::FlowEntry => "flow entry",
            TokenKind::Key => "key",
            TokenKind::Value => "value",
            TokenKind::Alias => "alias",
            TokenKind::Anchor => "anchor",
            TokenKind::Tag => "tag",
            TokenKind::Scalar => "scalar",
        }
    }
}
