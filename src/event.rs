use crate::{Encoding, MappingStyle, Mark, ScalarStyle, SequenceStyle, TagDirective};

/// The event structure.
///
/// Events are the parser's sole output. Marks are copied from the tokens
/// the event originates from; `start_mark` never exceeds `end_mark`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The event data.
    pub data: EventData,
    /// The beginning of the event.
    pub start_mark: Mark,
    /// The end of the event.
    pub end_mark: Mark,
}

impl Event {
    /// The fieldless kind of this event.
    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    /// The stream parameters.
    StreamStart {
        /// The detected source encoding.
        encoding: Encoding,
    },
    StreamEnd,
    /// The document parameters.
    DocumentStart {
        /// The `%YAML` directive version string, if one was given.
        version: Option<String>,
        /// The `%TAG` directives declared by this document. Built-in
        /// handles are not repeated here.
        tag_directives: Vec<TagDirective>,
        /// Whether the document lacks a `---` indicator.
        implicit: bool,
    },
    /// The document end parameters.
    DocumentEnd {
        /// Whether the document lacks a `...` indicator.
        implicit: bool,
    },
    /// A reference to an anchored node. The anchor name is never empty.
    Alias {
        /// The anchor.
        anchor: String,
    },
    /// The scalar parameters.
    Scalar {
        /// The anchor.
        anchor: Option<String>,
        /// The resolved tag.
        tag: Option<String>,
        /// The decoded scalar value.
        value: String,
        /// Whether the tag may be omitted for the plain style.
        plain_implicit: bool,
        /// Whether the tag may be omitted for any non-plain style.
        quoted_implicit: bool,
        /// The scalar style.
        style: ScalarStyle,
    },
    /// The sequence parameters.
    SequenceStart {
        /// The anchor.
        anchor: Option<String>,
        /// The resolved tag.
        tag: Option<String>,
        /// Whether the tag may be omitted.
        implicit: bool,
        /// The sequence style.
        style: SequenceStyle,
    },
    SequenceEnd,
    /// The mapping parameters.
    MappingStart {
        /// The anchor.
        anchor: Option<String>,
        /// The resolved tag.
        tag: Option<String>,
        /// Whether the tag may be omitted.
        implicit: bool,
        /// The mapping style.
        style: MappingStyle,
    },
    MappingEnd,
}

impl EventData {
    /// The fieldless kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::StreamStart { .. } => EventKind::StreamStart,
            EventData::StreamEnd => EventKind::StreamEnd,
            EventData::DocumentStart { .. } => EventKind::DocumentStart,
            EventData::DocumentEnd { .. } => EventKind::DocumentEnd,
            EventData::Alias { .. } => EventKind::Alias,
            EventData::Scalar { .. } => EventKind::Scalar,
            EventData::SequenceStart { .. } => EventKind::SequenceStart,
            EventData::SequenceEnd => EventKind::SequenceEnd,
            EventData::MappingStart { .. } => EventKind::MappingStart,
            EventData::MappingEnd => EventKind::MappingEnd,
        }
    }
}

/// The fieldless mirror of [`EventData`], used with
/// [`Parser::check_event`](crate::Parser::check_event).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
}
