use crate::escape::decode_double_quoted;
use crate::{
    Event, EventData, EventKind, MappingStyle, Mark, ParserError, ScalarStyle, SequenceStyle,
    TagDirective, TokenData, TokenKind, TokenSource,
};

/// Tag shorthands in scope for every document unless overridden:
/// `%TAG ! !` and `%TAG !! tag:yaml.org,2002:`.
const DEFAULT_TAG_DIRECTIVES: [(&str, &str); 2] = [("!", "!"), ("!!", "tag:yaml.org,2002:")];

/// The event parser.
///
/// A `Parser` pulls tokens from a [`TokenSource`] and turns them into
/// [`Event`]s on demand, one per call. At most one event is ever
/// pre-computed: [`peek_event`](Parser::peek_event) materialises it
/// without consuming, [`next_event`](Parser::next_event) consumes it,
/// and [`check_event`](Parser::check_event) tests its kind. The parser
/// also implements [`Iterator`] over `Result<Event, ParserError>`.
///
/// The first grammar error is fatal; no recovery is attempted.
pub struct Parser<T> {
    /// The token source.
    scanner: T,
    /// The current parser state.
    state: ParserState,
    /// The stack of states to resume once the current production ends.
    states: Vec<ParserState>,
    /// The stack of marks, one per open collection.
    marks: Vec<Mark>,
    /// The pre-computed event, if any.
    pending: Option<Event>,
    /// The `%YAML` version of the current document.
    version: Option<String>,
    /// The tag directives in scope for the current document.
    tag_directives: Vec<TagDirective>,
}

/// The states of the parser.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[non_exhaustive]
pub enum ParserState {
    /// Expect STREAM-START.
    #[default]
    StreamStart,
    /// Expect the beginning of an implicit document.
    ImplicitDocumentStart,
    /// Expect DOCUMENT-START.
    DocumentStart,
    /// Expect the content of a document.
    DocumentContent,
    /// Expect DOCUMENT-END.
    DocumentEnd,
    /// Expect a block node.
    BlockNode,
    /// Expect a block node or an indentless sequence.
    BlockNodeOrIndentlessSequence,
    /// Expect a flow node.
    FlowNode,
    /// Expect the first entry of a block sequence.
    BlockSequenceFirstEntry,
    /// Expect an entry of a block sequence.
    BlockSequenceEntry,
    /// Expect an entry of an indentless sequence.
    IndentlessSequenceEntry,
    /// Expect the first key of a block mapping.
    BlockMappingFirstKey,
    /// Expect a block mapping key.
    BlockMappingKey,
    /// Expect a block mapping value.
    BlockMappingValue,
    /// Expect the first entry of a flow sequence.
    FlowSequenceFirstEntry,
    /// Expect an entry of a flow sequence.
    FlowSequenceEntry,
    /// Expect a key of a single-pair mapping inside a flow sequence.
    FlowSequenceEntryMappingKey,
    /// Expect a value of a single-pair mapping inside a flow sequence.
    FlowSequenceEntryMappingValue,
    /// Expect the end of a single-pair mapping inside a flow sequence.
    FlowSequenceEntryMappingEnd,
    /// Expect the first key of a flow mapping.
    FlowMappingFirstKey,
    /// Expect a key of a flow mapping.
    FlowMappingKey,
    /// Expect a value of a flow mapping.
    FlowMappingValue,
    /// Expect an empty value of a flow mapping.
    FlowMappingEmptyValue,
    /// Expect nothing.
    End,
}

impl<T: TokenSource> Parser<T> {
    /// Create a parser over the given token source.
    pub fn new(scanner: T) -> Parser<T> {
        Parser {
            scanner,
            state: ParserState::default(),
            states: Vec::with_capacity(16),
            marks: Vec::with_capacity(16),
            pending: None,
            version: None,
            tag_directives: Vec::with_capacity(16),
        }
    }

    /// Whether the final `stream-end` event has already been returned.
    pub fn is_finished(&self) -> bool {
        self.pending.is_none() && self.state == ParserState::End
    }

    /// Check the kind of the next event without consuming it.
    ///
    /// Materialises the next event if none is pending. Returns true if
    /// its kind is one of `kinds`, or if `kinds` is empty and any event
    /// is available. Once the stream has ended this returns false
    /// instead of failing.
    pub fn check_event(&mut self, kinds: &[EventKind]) -> Result<bool, ParserError> {
        if self.pending.is_none() {
            if self.is_finished() {
                return Ok(false);
            }
            self.pending = Some(self.state_machine()?);
        }
        let kind = self.pending.as_ref().unwrap().kind();
        Ok(kinds.is_empty() || kinds.contains(&kind))
    }

    /// Borrow the next event without consuming it.
    ///
    /// # Panics
    ///
    /// Panics if the stream has already ended; use
    /// [`check_event`](Parser::check_event) or
    /// [`is_finished`](Parser::is_finished) first.
    pub fn peek_event(&mut self) -> Result<&Event, ParserError> {
        assert!(
            !self.is_finished(),
            "peek_event called after the stream has ended"
        );
        if self.pending.is_none() {
            self.pending = Some(self.state_machine()?);
        }
        Ok(self.pending.as_ref().unwrap())
    }

    /// Consume and return the next event.
    ///
    /// # Panics
    ///
    /// Panics if the stream has already ended; use
    /// [`check_event`](Parser::check_event) or
    /// [`is_finished`](Parser::is_finished) first.
    pub fn next_event(&mut self) -> Result<Event, ParserError> {
        assert!(
            !self.is_finished(),
            "next_event called after the stream has ended"
        );
        match self.pending.take() {
            Some(event) => Ok(event),
            None => self.state_machine(),
        }
    }

    /// Run the state the parser is suspended in until it yields an event.
    fn state_machine(&mut self) -> Result<Event, ParserError> {
        match self.state {
            ParserState::StreamStart => self.parse_stream_start(),
            ParserState::ImplicitDocumentStart => self.parse_document_start(true),
            ParserState::DocumentStart => self.parse_document_start(false),
            ParserState::DocumentContent => self.parse_document_content(),
            ParserState::DocumentEnd => self.parse_document_end(),
            ParserState::BlockNode => self.parse_node(true, false),
            ParserState::BlockNodeOrIndentlessSequence => self.parse_node(true, true),
            ParserState::FlowNode => self.parse_node(false, false),
            ParserState::BlockSequenceFirstEntry => self.parse_block_sequence_entry(true),
            ParserState::BlockSequenceEntry => self.parse_block_sequence_entry(false),
            ParserState::IndentlessSequenceEntry => self.parse_indentless_sequence_entry(),
            ParserState::BlockMappingFirstKey => self.parse_block_mapping_key(true),
            ParserState::BlockMappingKey => self.parse_block_mapping_key(false),
            ParserState::BlockMappingValue => self.parse_block_mapping_value(),
            ParserState::FlowSequenceFirstEntry => self.parse_flow_sequence_entry(true),
            ParserState::FlowSequenceEntry => self.parse_flow_sequence_entry(false),
            ParserState::FlowSequenceEntryMappingKey => {
                self.parse_flow_sequence_entry_mapping_key()
            }
            ParserState::FlowSequenceEntryMappingValue => {
                self.parse_flow_sequence_entry_mapping_value()
            }
            ParserState::FlowSequenceEntryMappingEnd => self.parse_flow_sequence_entry_mapping_end(),
            ParserState::FlowMappingFirstKey => self.parse_flow_mapping_key(true),
            ParserState::FlowMappingKey => self.parse_flow_mapping_key(false),
            ParserState::FlowMappingValue => self.parse_flow_mapping_value(false),
            ParserState::FlowMappingEmptyValue => self.parse_flow_mapping_value(true),
            ParserState::End => panic!("event requested in the end state"),
        }
    }

    /// The next token's kind and marks, without consuming it.
    fn peek_token_info(&mut self) -> Result<(TokenKind, Mark, Mark), ParserError> {
        let token = self.scanner.peek_token()?;
        Ok((token.kind(), token.start_mark, token.end_mark))
    }

    fn empty_scalar(mark: Mark) -> Event {
        Event {
            data: EventData::Scalar {
                anchor: None,
                tag: None,
                value: String::new(),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            },
            start_mark: mark,
            end_mark: mark,
        }
    }

    fn parse_stream_start(&mut self) -> Result<Event, ParserError> {
        let (kind, start_mark, _) = self.peek_token_info()?;
        if kind != TokenKind::StreamStart {
            return Err(ParserError::Unexpected {
                expected: "stream start",
                found: kind.name(),
                mark: start_mark,
            });
        }
        debug_assert!(self.states.is_empty() && self.marks.is_empty());
        let token = self.scanner.get_token()?;
        let TokenData::StreamStart { encoding } = token.data else {
            unreachable!("token kind checked above")
        };
        self.state = ParserState::ImplicitDocumentStart;
        Ok(Event {
            data: EventData::StreamStart { encoding },
            start_mark: token.start_mark,
            end_mark: token.end_mark,
        })
    }

    fn parse_document_start(&mut self, implicit: bool) -> Result<Event, ParserError> {
        if !implicit {
            // Stray `...` markers between documents carry no content.
            while self.scanner.check_token(&[TokenKind::DocumentEnd])? {
                self.scanner.get_token()?;
            }
        }

        let (kind, start_mark, end_mark) = self.peek_token_info()?;

        if implicit
            && !matches!(
                kind,
                TokenKind::Directive | TokenKind::DocumentStart | TokenKind::StreamEnd
            )
        {
            self.process_directives()?;
            self.states.push(ParserState::DocumentEnd);
            self.state = ParserState::BlockNode;
            return Ok(Event {
                data: EventData::DocumentStart {
                    version: None,
                    tag_directives: Vec::new(),
                    implicit: true,
                },
                start_mark,
                end_mark,
            });
        }

        if kind == TokenKind::StreamEnd {
            let token = self.scanner.get_token()?;
            debug_assert!(self.states.is_empty(), "unfinished production at stream end");
            debug_assert!(self.marks.is_empty(), "open collection at stream end");
            self.state = ParserState::End;
            return Ok(Event {
                data: EventData::StreamEnd,
                start_mark: token.start_mark,
                end_mark: token.end_mark,
            });
        }

        let (version, tag_directives) = self.process_directives()?;
        let (kind, token_start, token_end) = self.peek_token_info()?;
        if kind != TokenKind::DocumentStart {
            return Err(ParserError::Unexpected {
                expected: "document start",
                found: kind.name(),
                mark: token_start,
            });
        }
        self.scanner.get_token()?;
        self.states.push(ParserState::DocumentEnd);
        self.state = ParserState::DocumentContent;
        Ok(Event {
            data: EventData::DocumentStart {
                version,
                tag_directives,
                implicit: false,
            },
            start_mark,
            end_mark: token_end,
        })
    }

    fn parse_document_content(&mut self) -> Result<Event, ParserError> {
        let (kind, start_mark, _) = self.peek_token_info()?;
        if matches!(
            kind,
            TokenKind::Directive
                | TokenKind::DocumentStart
                | TokenKind::DocumentEnd
                | TokenKind::StreamEnd
        ) {
            self.state = self.states.pop().unwrap();
            Ok(Self::empty_scalar(start_mark))
        } else {
            self.parse_node(true, false)
        }
    }

    fn parse_document_end(&mut self) -> Result<Event, ParserError> {
        let (kind, start_mark, _) = self.peek_token_info()?;
        let mut end_mark = start_mark;
        let mut implicit = true;
        if kind == TokenKind::DocumentEnd {
            end_mark = self.scanner.get_token()?.end_mark;
            implicit = false;
        }
        self.version = None;
        self.tag_directives.clear();
        self.state = ParserState::DocumentStart;
        Ok(Event {
            data: EventData::DocumentEnd { implicit },
            start_mark,
            end_mark,
        })
    }

    /// Consume the directive tokens preceding a document and rebuild the
    /// active tag-directive list.
    ///
    /// Returns the version and the directives the document itself
    /// declared; the built-in handles are merged into the active list
    /// afterwards so they keep resolving, but are not part of the
    /// returned list.
    fn process_directives(
        &mut self,
    ) -> Result<(Option<String>, Vec<TagDirective>), ParserError> {
        self.version = None;
        self.tag_directives.clear();

        while self.scanner.check_token(&[TokenKind::Directive])? {
            let token = self.scanner.get_token()?;
            let mark = token.start_mark;
            let TokenData::Directive {
                kind,
                value,
                value_divider,
            } = token.data
            else {
                unreachable!("token kind checked above")
            };
            match kind {
                crate::DirectiveKind::Yaml => {
                    if self.version.is_some() {
                        return Err(ParserError::DuplicateYamlDirective { mark });
                    }
                    if value.split('.').next() != Some("1") {
                        return Err(ParserError::IncompatibleVersion {
                            version: value,
                            mark,
                        });
                    }
                    self.version = Some(value);
                }
                crate::DirectiveKind::Tag => {
                    let (handle, prefix) = value.split_at(value_divider);
                    if self.tag_directives.iter().any(|d| d.handle == handle) {
                        return Err(ParserError::DuplicateTagHandle {
                            handle: String::from(handle),
                            mark,
                        });
                    }
                    self.tag_directives.push(TagDirective {
                        handle: String::from(handle),
                        prefix: String::from(prefix),
                    });
                }
                // Reserved directives are ignored.
                crate::DirectiveKind::Other => {}
            }
        }

        let emitted = self.tag_directives.clone();
        for (handle, prefix) in DEFAULT_TAG_DIRECTIVES {
            if !self.tag_directives.iter().any(|d| d.handle == handle) {
                self.tag_directives.push(TagDirective {
                    handle: String::from(handle),
                    prefix: String::from(prefix),
                });
            }
        }

        Ok((self.version.clone(), emitted))
    }

    /// Substitute a raw tag through the active directive list.
    fn resolve_tag(
        &self,
        raw: &str,
        divider: usize,
        node_mark: Mark,
        tag_mark: Mark,
    ) -> Result<String, ParserError> {
        let (handle, suffix) = raw.split_at(divider);
        if handle.is_empty() {
            // Verbatim `!<uri>` tags bypass handle resolution.
            return Ok(String::from(suffix));
        }
        for directive in &self.tag_directives {
            if directive.handle == handle {
                return Ok(format!("{}{}", directive.prefix, suffix));
            }
        }
        Err(ParserError::UndefinedTagHandle {
            handle: String::from(handle),
            context_mark: node_mark,
            mark: tag_mark,
        })
    }

    fn parse_node(&mut self, block: bool, indentless_sequence: bool) -> Result<Event, ParserError> {
        let (kind, token_start, _) = self.peek_token_info()?;

        if kind == TokenKind::Alias {
            let token = self.scanner.get_token()?;
            let TokenData::Alias { value } = token.data else {
                unreachable!("token kind checked above")
            };
            self.state = self.states.pop().unwrap();
            return Ok(Event {
                data: EventData::Alias { anchor: value },
                start_mark: token.start_mark,
                end_mark: token.end_mark,
            });
        }

        let mut anchor = None;
        let mut tag_token: Option<(String, usize)> = None;
        let mut tag_mark = Mark::default();
        let mut start_mark = token_start;
        let mut end_mark = token_start;

        // An anchor and a tag may both be present, in either order.
        if kind == TokenKind::Anchor {
            let token = self.scanner.get_token()?;
            let TokenData::Anchor { value } = token.data else {
                unreachable!("token kind checked above")
            };
            anchor = Some(value);
            start_mark = token.start_mark;
            end_mark = token.end_mark;
            if self.scanner.check_token(&[TokenKind::Tag])? {
                let token = self.scanner.get_token()?;
                let TokenData::Tag {
                    value,
                    value_divider,
                } = token.data
                else {
                    unreachable!("token kind checked above")
                };
                tag_mark = token.start_mark;
                end_mark = token.end_mark;
                tag_token = Some((value, value_divider));
            }
        } else if kind == TokenKind::Tag {
            let token = self.scanner.get_token()?;
            let TokenData::Tag {
                value,
                value_divider,
            } = token.data
            else {
                unreachable!("token kind checked above")
            };
            tag_mark = token.start_mark;
            start_mark = tag_mark;
            end_mark = token.end_mark;
            tag_token = Some((value, value_divider));
            if self.scanner.check_token(&[TokenKind::Anchor])? {
                let token = self.scanner.get_token()?;
                let TokenData::Anchor { value } = token.data else {
                    unreachable!("token kind checked above")
                };
                anchor = Some(value);
                end_mark = token.end_mark;
            }
        }

        let tag = match tag_token {
            Some((raw, divider)) => Some(self.resolve_tag(&raw, divider, start_mark, tag_mark)?),
            None => None,
        };

        let implicit = tag.is_none() || tag.as_deref() == Some("!");

        let (kind, token_start, token_end) = self.peek_token_info()?;

        if indentless_sequence && kind == TokenKind::BlockEntry {
            self.state = ParserState::IndentlessSequenceEntry;
            return Ok(Event {
                data: EventData::SequenceStart {
                    anchor,
                    tag,
                    implicit,
                    style: SequenceStyle::Block,
                },
                start_mark,
                end_mark: token_end,
            });
        }

        match kind {
            TokenKind::Scalar => {
                let token = self.scanner.get_token()?;
                let TokenData::Scalar { value, style } = token.data else {
                    unreachable!("token kind checked above")
                };
                let value = if style == ScalarStyle::DoubleQuoted {
                    decode_double_quoted(value)
                } else {
                    value
                };
                let plain_implicit =
                    style == ScalarStyle::Plain && tag.is_none() || tag.as_deref() == Some("!");
                let quoted_implicit = !plain_implicit && tag.is_none();
                self.state = self.states.pop().unwrap();
                Ok(Event {
                    data: EventData::Scalar {
                        anchor,
                        tag,
                        value,
                        plain_implicit,
                        quoted_implicit,
                        style,
                    },
                    start_mark,
                    end_mark: token.end_mark,
                })
            }
            TokenKind::FlowSequenceStart => {
                self.state = ParserState::FlowSequenceFirstEntry;
                Ok(Event {
                    data: EventData::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        style: SequenceStyle::Flow,
                    },
                    start_mark,
                    end_mark: token_end,
                })
            }
            TokenKind::FlowMappingStart => {
                self.state = ParserState::FlowMappingFirstKey;
                Ok(Event {
                    data: EventData::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        style: MappingStyle::Flow,
                    },
                    start_mark,
                    end_mark: token_end,
                })
            }
            TokenKind::BlockSequenceStart if block => {
                self.state = ParserState::BlockSequenceFirstEntry;
                Ok(Event {
                    data: EventData::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        style: SequenceStyle::Block,
                    },
                    start_mark,
                    end_mark: token_end,
                })
            }
            TokenKind::BlockMappingStart if block => {
                self.state = ParserState::BlockMappingFirstKey;
                Ok(Event {
                    data: EventData::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        style: MappingStyle::Block,
                    },
                    start_mark,
                    end_mark: token_end,
                })
            }
            _ if anchor.is_some() || tag.is_some() => {
                self.state = self.states.pop().unwrap();
                Ok(Event {
                    data: EventData::Scalar {
                        anchor,
                        tag,
                        value: String::new(),
                        plain_implicit: implicit,
                        quoted_implicit: false,
                        style: ScalarStyle::Plain,
                    },
                    start_mark,
                    end_mark,
                })
            }
            _ => Err(ParserError::Syntax {
                context: if block {
                    "a block node"
                } else {
                    "a flow node"
                },
                context_mark: start_mark,
                expected: "node content",
                found: kind.name(),
                mark: token_start,
            }),
        }
    }

    fn parse_block_sequence_entry(&mut self, first: bool) -> Result<Event, ParserError> {
        if first {
            let token = self.scanner.get_token()?;
            self.marks.push(token.start_mark);
        }

        let (kind, token_start, token_end) = self.peek_token_info()?;
        match kind {
            TokenKind::BlockEntry => {
                let mark = self.scanner.get_token()?.end_mark;
                if self
                    .scanner
                    .check_token(&[TokenKind::BlockEntry, TokenKind::BlockEnd])?
                {
                    self.state = ParserState::BlockSequenceEntry;
                    Ok(Self::empty_scalar(mark))
                } else {
                    self.states.push(ParserState::BlockSequenceEntry);
                    self.parse_node(true, false)
                }
            }
            TokenKind::BlockEnd => {
                self.scanner.get_token()?;
                self.state = self.states.pop().unwrap();
                self.marks.pop();
                Ok(Event {
                    data: EventData::SequenceEnd,
                    start_mark: token_start,
                    end_mark: token_end,
                })
            }
            _ => {
                let context_mark = self.marks.pop().unwrap();
                Err(ParserError::Syntax {
                    context: "a block collection",
                    context_mark,
                    expected: "block end",
                    found: kind.name(),
                    mark: token_start,
                })
            }
        }
    }

    fn parse_indentless_sequence_entry(&mut self) -> Result<Event, ParserError> {
        let (kind, token_start, _) = self.peek_token_info()?;
        if kind == TokenKind::BlockEntry {
            let mark = self.scanner.get_token()?.end_mark;
            if self.scanner.check_token(&[
                TokenKind::BlockEntry,
                TokenKind::Key,
                TokenKind::Value,
                TokenKind::BlockEnd,
            ])? {
                self.state = ParserState::IndentlessSequenceEntry;
                Ok(Self::empty_scalar(mark))
            } else {
                self.states.push(ParserState::IndentlessSequenceEntry);
                self.parse_node(true, false)
            }
        } else {
            // No closing token exists for an indentless sequence; its end
            // is zero-width.
            self.state = self.states.pop().unwrap();
            Ok(Event {
                data: EventData::SequenceEnd,
                start_mark: token_start,
                end_mark: token_start,
            })
        }
    }

    fn parse_block_mapping_key(&mut self, first: bool) -> Result<Event, ParserError> {
        if first {
            let token = self.scanner.get_token()?;
            self.marks.push(token.start_mark);
        }

        let (kind, token_start, token_end) = self.peek_token_info()?;
        match kind {
            TokenKind::Key => {
                let mark = self.scanner.get_token()?.end_mark;
                if self.scanner.check_token(&[
                    TokenKind::Key,
                    TokenKind::Value,
                    TokenKind::BlockEnd,
                ])? {
                    self.state = ParserState::BlockMappingValue;
                    Ok(Self::empty_scalar(mark))
                } else {
                    self.states.push(ParserState::BlockMappingValue);
                    self.parse_node(true, true)
                }
            }
            TokenKind::BlockEnd => {
                self.scanner.get_token()?;
                self.state = self.states.pop().unwrap();
                self.marks.pop();
                Ok(Event {
                    data: EventData::MappingEnd,
                    start_mark: token_start,
                    end_mark: token_end,
                })
            }
            _ => {
                let context_mark = self.marks.pop().unwrap();
                Err(ParserError::Syntax {
                    context: "a block mapping",
                    context_mark,
                    expected: "key",
                    found: kind.name(),
                    mark: token_start,
                })
            }
        }
    }

    fn parse_block_mapping_value(&mut self) -> Result<Event, ParserError> {
        let (kind, token_start, _) = self.peek_token_info()?;
        if kind == TokenKind::Value {
            let mark = self.scanner.get_token()?.end_mark;
            if self
                .scanner
                .check_token(&[TokenKind::Key, TokenKind::Value, TokenKind::BlockEnd])?
            {
                self.state = ParserState::BlockMappingKey;
                Ok(Self::empty_scalar(mark))
            } else {
                self.states.push(ParserState::BlockMappingKey);
                self.parse_node(true, true)
            }
        } else {
            self.state = ParserState::BlockMappingKey;
            Ok(Self::empty_scalar(token_start))
        }
    }

    fn parse_flow_sequence_entry(&mut self, first: bool) -> Result<Event, ParserError> {
        if first {
            let token = self.scanner.get_token()?;
            self.marks.push(token.start_mark);
        }

        if !self.scanner.check_token(&[TokenKind::FlowSequenceEnd])? {
            if !first {
                if self.scanner.check_token(&[TokenKind::FlowEntry])? {
                    self.scanner.get_token()?;
                } else {
                    let (kind, token_start, _) = self.peek_token_info()?;
                    let context_mark = self.marks.pop().unwrap();
                    return Err(ParserError::Syntax {
                        context: "a flow sequence",
                        context_mark,
                        expected: "',' or ']'",
                        found: kind.name(),
                        mark: token_start,
                    });
                }
            }
            if self.scanner.check_token(&[TokenKind::Key])? {
                // A `?` inside a flow sequence opens a single-pair
                // mapping with no properties of its own.
                let token = self.scanner.get_token()?;
                self.state = ParserState::FlowSequenceEntryMappingKey;
                return Ok(Event {
                    data: EventData::MappingStart {
                        anchor: None,
                        tag: None,
                        implicit: true,
                        style: MappingStyle::Flow,
                    },
                    start_mark: token.start_mark,
                    end_mark: token.end_mark,
                });
            }
            if !self.scanner.check_token(&[TokenKind::FlowSequenceEnd])? {
                self.states.push(ParserState::FlowSequenceEntry);
                return self.parse_node(false, false);
            }
        }

        let token = self.scanner.get_token()?;
        self.state = self.states.pop().unwrap();
        self.marks.pop();
        Ok(Event {
            data: EventData::SequenceEnd,
            start_mark: token.start_mark,
            end_mark: token.end_mark,
        })
    }

    fn parse_flow_sequence_entry_mapping_key(&mut self) -> Result<Event, ParserError> {
        let (kind, token_start, _) = self.peek_token_info()?;
        if matches!(
            kind,
            TokenKind::Value | TokenKind::FlowEntry | TokenKind::FlowSequenceEnd
        ) {
            self.state = ParserState::FlowSequenceEntryMappingValue;
            Ok(Self::empty_scalar(token_start))
        } else {
            self.states.push(ParserState::FlowSequenceEntryMappingValue);
            self.parse_node(false, false)
        }
    }

    fn parse_flow_sequence_entry_mapping_value(&mut self) -> Result<Event, ParserError> {
        if self.scanner.check_token(&[TokenKind::Value])? {
            self.scanner.get_token()?;
            if !self
                .scanner
                .check_token(&[TokenKind::FlowEntry, TokenKind::FlowSequenceEnd])?
            {
                self.states.push(ParserState::FlowSequenceEntryMappingEnd);
                return self.parse_node(false, false);
            }
        }
        let mark = self.scanner.peek_token()?.start_mark;
        self.state = ParserState::FlowSequenceEntryMappingEnd;
        Ok(Self::empty_scalar(mark))
    }

    fn parse_flow_sequence_entry_mapping_end(&mut self) -> Result<Event, ParserError> {
        let mark = self.scanner.peek_token()?.start_mark;
        self.state = ParserState::FlowSequenceEntry;
        Ok(Event {
            data: EventData::MappingEnd,
            start_mark: mark,
            end_mark: mark,
        })
    }

    fn parse_flow_mapping_key(&mut self, first: bool) -> Result<Event, ParserError> {
        if first {
            let token = self.scanner.get_token()?;
            self.marks.push(token.start_mark);
        }

        if !self.scanner.check_token(&[TokenKind::FlowMappingEnd])? {
            if !first {
                if self.scanner.check_token(&[TokenKind::FlowEntry])? {
                    self.scanner.get_token()?;
                } else {
                    let (kind, token_start, _) = self.peek_token_info()?;
                    let context_mark = self.marks.pop().unwrap();
                    return Err(ParserError::Syntax {
                        context: "a flow mapping",
                        context_mark,
                        expected: "',' or '}'",
                        found: kind.name(),
                        mark: token_start,
                    });
                }
            }
            if self.scanner.check_token(&[TokenKind::Key])? {
                self.scanner.get_token()?;
                if !self.scanner.check_token(&[
                    TokenKind::Value,
                    TokenKind::FlowEntry,
                    TokenKind::FlowMappingEnd,
                ])? {
                    self.states.push(ParserState::FlowMappingValue);
                    return self.parse_node(false, false);
                }
                let mark = self.scanner.peek_token()?.start_mark;
                self.state = ParserState::FlowMappingValue;
                return Ok(Self::empty_scalar(mark));
            }
            if !self.scanner.check_token(&[TokenKind::FlowMappingEnd])? {
                // A bare node is a key whose value is empty.
                self.states.push(ParserState::FlowMappingEmptyValue);
                return self.parse_node(false, false);
            }
        }

        let token = self.scanner.get_token()?;
        self.state = self.states.pop().unwrap();
        self.marks.pop();
        Ok(Event {
            data: EventData::MappingEnd,
            start_mark: token.start_mark,
            end_mark: token.end_mark,
        })
    }

    fn parse_flow_mapping_value(&mut self, empty: bool) -> Result<Event, ParserError> {
        if empty {
            let mark = self.scanner.peek_token()?.start_mark;
            self.state = ParserState::FlowMappingKey;
            return Ok(Self::empty_scalar(mark));
        }
        if self.scanner.check_token(&[TokenKind::Value])? {
            self.scanner.get_token()?;
            if !self
                .scanner
                .check_token(&[TokenKind::FlowEntry, TokenKind::FlowMappingEnd])?
            {
                self.states.push(ParserState::FlowMappingKey);
                return self.parse_node(false, false);
            }
        }
        let mark = self.scanner.peek_token()?.start_mark;
        self.state = ParserState::FlowMappingKey;
        Ok(Self::empty_scalar(mark))
    }
}

impl<T: TokenSource> Iterator for Parser<T> {
    type Item = Result<Event, ParserError>;

    /// Yield every event through `stream-end`, then `None`. The first
    /// error also ends the iteration.
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        match self.next_event() {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                self.pending = None;
                self.state = ParserState::End;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::EventKind::*;
    use crate::{DirectiveKind, Encoding, Token};

    fn plain(value: &str) -> TokenData {
        TokenData::Scalar {
            value: String::from(value),
            style: ScalarStyle::Plain,
        }
    }

    /// Assign each token a distinct one-line span so mark assertions can
    /// pick tokens out by line.
    fn tokens(data: impl IntoIterator<Item = TokenData>) -> VecDeque<Token> {
        data.into_iter()
            .enumerate()
            .map(|(i, data)| {
                let i = i as u64;
                Token::new(data, Mark::new(i, i, 0), Mark::new(i, i, 1))
            })
            .collect()
    }

    /// Wrap `body` in stream start/end tokens and parse it to the end.
    fn parse(body: Vec<TokenData>) -> Vec<Event> {
        try_parse(body).unwrap()
    }

    fn parse_err(body: Vec<TokenData>) -> ParserError {
        try_parse(body).unwrap_err()
    }

    fn try_parse(body: Vec<TokenData>) -> Result<Vec<Event>, ParserError> {
        let mut data = vec![TokenData::StreamStart {
            encoding: Encoding::Utf8,
        }];
        data.extend(body);
        data.push(TokenData::StreamEnd);
        Parser::new(tokens(data)).collect()
    }

    fn kinds(events: &[Event]) -> Vec<EventKind> {
        events.iter().map(Event::kind).collect()
    }

    fn scalar_values(events: &[Event]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match &event.data {
                EventData::Scalar { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_stream_has_no_documents() {
        let events = parse(vec![]);
        assert_eq!(kinds(&events), [StreamStart, StreamEnd]);
        assert_eq!(
            events[0].data,
            EventData::StreamStart {
                encoding: Encoding::Utf8
            }
        );
    }

    #[test]
    fn bare_scalar_document() {
        let events = parse(vec![plain("foo")]);
        assert_eq!(
            kinds(&events),
            [StreamStart, DocumentStart, Scalar, DocumentEnd, StreamEnd]
        );
        assert_eq!(
            events[1].data,
            EventData::DocumentStart {
                version: None,
                tag_directives: vec![],
                implicit: true,
            }
        );
        assert_eq!(
            events[2].data,
            EventData::Scalar {
                anchor: None,
                tag: None,
                value: String::from("foo"),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            }
        );
        assert_eq!(events[3].data, EventData::DocumentEnd { implicit: true });
    }

    #[test]
    fn explicit_document_with_directives() {
        let events = parse(vec![
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("1.1"),
                value_divider: 0,
            },
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value: String::from("!yaml!tag:yaml.org,2002:"),
                value_divider: 6,
            },
            TokenData::DocumentStart,
            TokenData::Tag {
                value: String::from("!yaml!str"),
                value_divider: 6,
            },
            plain("foo"),
        ]);
        assert_eq!(
            events[1].data,
            EventData::DocumentStart {
                version: Some(String::from("1.1")),
                tag_directives: vec![TagDirective {
                    handle: String::from("!yaml!"),
                    prefix: String::from("tag:yaml.org,2002:"),
                }],
                implicit: false,
            }
        );
        assert_eq!(
            events[2].data,
            EventData::Scalar {
                anchor: None,
                tag: Some(String::from("tag:yaml.org,2002:str")),
                value: String::from("foo"),
                plain_implicit: false,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            }
        );
        assert_eq!(events[3].data, EventData::DocumentEnd { implicit: true });
    }

    #[test]
    fn default_handles_resolve_alongside_custom_directives() {
        let events = parse(vec![
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value: String::from("!x!example.com/"),
                value_divider: 3,
            },
            TokenData::DocumentStart,
            TokenData::Tag {
                value: String::from("!!str"),
                value_divider: 2,
            },
            plain("foo"),
        ]);
        // Only the document's own directive is emitted; the defaults are
        // merged back into the active list.
        let EventData::DocumentStart { tag_directives, .. } = &events[1].data else {
            panic!("expected document start: {:?}", events[1]);
        };
        assert_eq!(tag_directives.len(), 1);
        assert_eq!(tag_directives[0].handle, "!x!");
        let EventData::Scalar { tag, .. } = &events[2].data else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(tag.as_deref(), Some("tag:yaml.org,2002:str"));
    }

    #[test]
    fn custom_handle_substitutes_prefix() {
        let events = parse(vec![
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value: String::from("!e!tag:example.com,2011:"),
                value_divider: 3,
            },
            TokenData::DocumentStart,
            TokenData::Tag {
                value: String::from("!e!widget"),
                value_divider: 3,
            },
            plain("x"),
        ]);
        let EventData::Scalar { tag, .. } = &events[2].data else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(tag.as_deref(), Some("tag:example.com,2011:widget"));
    }

    #[test]
    fn primary_handle_tag_stays_implicit() {
        let events = parse(vec![
            TokenData::Tag {
                value: String::from("!"),
                value_divider: 1,
            },
            plain("foo"),
        ]);
        let EventData::Scalar {
            tag,
            plain_implicit,
            quoted_implicit,
            ..
        } = &events[2].data
        else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(tag.as_deref(), Some("!"));
        assert!(*plain_implicit);
        assert!(!*quoted_implicit);
    }

    #[test]
    fn verbatim_tag_bypasses_resolution() {
        let events = parse(vec![
            TokenData::Tag {
                value: String::from("tag:example.com,2000:app/foo"),
                value_divider: 0,
            },
            plain("x"),
        ]);
        let EventData::Scalar { tag, .. } = &events[2].data else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(tag.as_deref(), Some("tag:example.com,2000:app/foo"));
    }

    #[test]
    fn block_sequence_with_empty_entry() {
        let events = parse(vec![
            TokenData::BlockSequenceStart,
            TokenData::BlockEntry,
            plain("a"),
            TokenData::BlockEntry,
            TokenData::BlockEntry,
            plain("c"),
            TokenData::BlockEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                SequenceStart,
                Scalar,
                Scalar,
                Scalar,
                SequenceEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
        assert_eq!(scalar_values(&events), ["a", "", "c"]);
        let EventData::SequenceStart { style, .. } = &events[2].data else {
            panic!("expected sequence start: {:?}", events[2]);
        };
        assert_eq!(*style, SequenceStyle::Block);
    }

    #[test]
    fn block_mapping_missing_values_synthesise_empty_scalars() {
        let events = parse(vec![
            TokenData::BlockMappingStart,
            TokenData::Key,
            plain("a"),
            TokenData::Value,
            plain("1"),
            TokenData::Key,
            plain("b"),
            TokenData::Key,
            TokenData::Value,
            plain("c"),
            TokenData::BlockEnd,
        ]);
        // `b` has no value and the third key itself is empty.
        assert_eq!(scalar_values(&events), ["a", "1", "b", "", "", "c"]);
        assert_eq!(events[2].kind(), MappingStart);
        assert_eq!(events[events.len() - 3].kind(), MappingEnd);
    }

    #[test]
    fn indentless_sequence_inside_mapping() {
        let events = parse(vec![
            TokenData::BlockMappingStart,
            TokenData::Key,
            plain("k"),
            TokenData::Value,
            TokenData::BlockEntry,
            plain("a"),
            TokenData::BlockEntry,
            plain("b"),
            TokenData::BlockEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                MappingStart,
                Scalar,
                SequenceStart,
                Scalar,
                Scalar,
                SequenceEnd,
                MappingEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
        // The sequence has no closing token; its end event is zero-width.
        assert_eq!(events[7].start_mark, events[7].end_mark);
    }

    #[test]
    fn flow_sequence_single_pair_mapping() {
        let events = parse(vec![
            TokenData::FlowSequenceStart,
            TokenData::Key,
            plain("a"),
            TokenData::Value,
            plain("b"),
            TokenData::FlowEntry,
            plain("c"),
            TokenData::FlowSequenceEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                SequenceStart,
                MappingStart,
                Scalar,
                Scalar,
                MappingEnd,
                Scalar,
                SequenceEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
        assert_eq!(
            events[3].data,
            EventData::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: MappingStyle::Flow,
            }
        );
        assert_eq!(scalar_values(&events), ["a", "b", "c"]);
    }

    #[test]
    fn flow_sequence_pair_without_value() {
        let events = parse(vec![
            TokenData::FlowSequenceStart,
            TokenData::Key,
            plain("a"),
            TokenData::FlowSequenceEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                SequenceStart,
                MappingStart,
                Scalar,
                Scalar,
                MappingEnd,
                SequenceEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
        assert_eq!(scalar_values(&events), ["a", ""]);
    }

    #[test]
    fn flow_mapping_entries_without_values() {
        let events = parse(vec![
            TokenData::FlowMappingStart,
            plain("a"),
            TokenData::FlowEntry,
            TokenData::Key,
            plain("k"),
            TokenData::FlowMappingEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                MappingStart,
                Scalar,
                Scalar,
                Scalar,
                Scalar,
                MappingEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
        assert_eq!(scalar_values(&events), ["a", "", "k", ""]);
    }

    #[test]
    fn empty_flow_collections() {
        let events = parse(vec![
            TokenData::FlowSequenceStart,
            TokenData::FlowSequenceEnd,
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                SequenceStart,
                SequenceEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );

        let events = parse(vec![TokenData::FlowMappingStart, TokenData::FlowMappingEnd]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                MappingStart,
                MappingEnd,
                DocumentEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn double_quoted_scalar_is_decoded() {
        let events = parse(vec![TokenData::Scalar {
            value: String::from(r"\x41\x0d\x0a"),
            style: ScalarStyle::DoubleQuoted,
        }]);
        let EventData::Scalar {
            value,
            plain_implicit,
            quoted_implicit,
            style,
            ..
        } = &events[2].data
        else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(value, "A\r\n");
        assert_eq!(*style, ScalarStyle::DoubleQuoted);
        assert!(!*plain_implicit);
        assert!(*quoted_implicit);
    }

    #[test]
    fn single_quoted_scalar_is_not_decoded() {
        let events = parse(vec![TokenData::Scalar {
            value: String::from(r"literal \n"),
            style: ScalarStyle::SingleQuoted,
        }]);
        assert_eq!(scalar_values(&events), [r"literal \n"]);
    }

    #[test]
    fn anchored_node_and_alias() {
        let events = parse(vec![
            TokenData::BlockSequenceStart,
            TokenData::BlockEntry,
            TokenData::Anchor {
                value: String::from("a"),
            },
            plain("x"),
            TokenData::BlockEntry,
            TokenData::Alias {
                value: String::from("a"),
            },
            TokenData::BlockEnd,
        ]);
        let EventData::Scalar { anchor, .. } = &events[3].data else {
            panic!("expected scalar: {:?}", events[3]);
        };
        assert_eq!(anchor.as_deref(), Some("a"));
        let EventData::Alias { anchor } = &events[4].data else {
            panic!("expected alias: {:?}", events[4]);
        };
        assert!(!anchor.is_empty());
        assert_eq!(anchor, "a");
    }

    #[test]
    fn node_properties_without_content_make_empty_scalar() {
        let events = parse(vec![
            TokenData::DocumentStart,
            TokenData::Anchor {
                value: String::from("a"),
            },
            TokenData::Tag {
                value: String::from("!!str"),
                value_divider: 2,
            },
            TokenData::DocumentEnd,
        ]);
        assert_eq!(
            events[2].data,
            EventData::Scalar {
                anchor: Some(String::from("a")),
                tag: Some(String::from("tag:yaml.org,2002:str")),
                value: String::new(),
                plain_implicit: false,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            }
        );
    }

    #[test]
    fn tag_may_precede_anchor() {
        let events = parse(vec![
            TokenData::Tag {
                value: String::from("!!int"),
                value_divider: 2,
            },
            TokenData::Anchor {
                value: String::from("n"),
            },
            plain("3"),
        ]);
        let EventData::Scalar { anchor, tag, .. } = &events[2].data else {
            panic!("expected scalar: {:?}", events[2]);
        };
        assert_eq!(anchor.as_deref(), Some("n"));
        assert_eq!(tag.as_deref(), Some("tag:yaml.org,2002:int"));
    }

    #[test]
    fn explicit_document_without_content_is_empty_scalar() {
        let events = parse(vec![TokenData::DocumentStart, TokenData::DocumentEnd]);
        assert_eq!(
            kinds(&events),
            [StreamStart, DocumentStart, Scalar, DocumentEnd, StreamEnd]
        );
        assert_eq!(
            events[2].data,
            EventData::Scalar {
                anchor: None,
                tag: None,
                value: String::new(),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            }
        );
        assert_eq!(events[3].data, EventData::DocumentEnd { implicit: false });
    }

    #[test]
    fn multiple_documents_alternate_start_end() {
        let events = parse(vec![
            TokenData::DocumentStart,
            plain("one"),
            TokenData::DocumentEnd,
            TokenData::DocumentStart,
            plain("two"),
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                Scalar,
                DocumentEnd,
                DocumentStart,
                Scalar,
                DocumentEnd,
                StreamEnd,
            ]
        );
        assert_eq!(events[3].data, EventData::DocumentEnd { implicit: false });
        assert_eq!(events[6].data, EventData::DocumentEnd { implicit: true });
    }

    #[test]
    fn stray_document_end_tokens_are_skipped() {
        let events = parse(vec![
            plain("one"),
            TokenData::DocumentEnd,
            TokenData::DocumentEnd,
            TokenData::DocumentStart,
            plain("two"),
        ]);
        assert_eq!(
            kinds(&events),
            [
                StreamStart,
                DocumentStart,
                Scalar,
                DocumentEnd,
                DocumentStart,
                Scalar,
                DocumentEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn duplicate_yaml_directive_fails() {
        let err = parse_err(vec![
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("1.1"),
                value_divider: 0,
            },
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("1.2"),
                value_divider: 0,
            },
            TokenData::DocumentStart,
            plain("x"),
        ]);
        assert!(matches!(err, ParserError::DuplicateYamlDirective { .. }));
    }

    #[test]
    fn incompatible_yaml_version_fails() {
        let err = parse_err(vec![
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("2.0"),
                value_divider: 0,
            },
            TokenData::DocumentStart,
            plain("x"),
        ]);
        assert!(
            matches!(err, ParserError::IncompatibleVersion { version, .. } if version == "2.0")
        );
    }

    #[test]
    fn future_minor_version_is_accepted() {
        let events = parse(vec![
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("1.3"),
                value_divider: 0,
            },
            TokenData::DocumentStart,
            plain("x"),
        ]);
        let EventData::DocumentStart { version, .. } = &events[1].data else {
            panic!("expected document start: {:?}", events[1]);
        };
        assert_eq!(version.as_deref(), Some("1.3"));
    }

    #[test]
    fn duplicate_tag_handle_fails() {
        let err = parse_err(vec![
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value: String::from("!x!one"),
                value_divider: 3,
            },
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value: String::from("!x!two"),
                value_divider: 3,
            },
            TokenData::DocumentStart,
            plain("x"),
        ]);
        assert!(matches!(err, ParserError::DuplicateTagHandle { handle, .. } if handle == "!x!"));
    }

    #[test]
    fn reserved_directives_are_ignored() {
        let events = parse(vec![
            TokenData::Directive {
                kind: DirectiveKind::Other,
                value: String::from("FOO bar"),
                value_divider: 0,
            },
            TokenData::DocumentStart,
            plain("x"),
        ]);
        let EventData::DocumentStart {
            version,
            tag_directives,
            ..
        } = &events[1].data
        else {
            panic!("expected document start: {:?}", events[1]);
        };
        assert_eq!(*version, None);
        assert!(tag_directives.is_empty());
    }

    #[test]
    fn undefined_tag_handle_fails_with_both_marks() {
        let mut parser = Parser::new(tokens(vec![
            TokenData::StreamStart {
                encoding: Encoding::Utf8,
            },
            TokenData::Tag {
                value: String::from("!foo!bar"),
                value_divider: 5,
            },
            plain("baz"),
            TokenData::StreamEnd,
        ]));
        parser.next_event().unwrap();
        parser.next_event().unwrap();
        let err = parser.next_event().unwrap_err();
        match err {
            ParserError::UndefinedTagHandle {
                handle,
                context_mark,
                mark,
            } => {
                assert_eq!(handle, "!foo!");
                // The tag is the node's first property, so the node
                // starts at the tag itself.
                assert_eq!(context_mark, mark);
                assert_eq!(mark.line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directives_require_explicit_document_start() {
        let err = parse_err(vec![
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value: String::from("1.2"),
                value_divider: 0,
            },
            plain("x"),
        ]);
        assert!(matches!(
            err,
            ParserError::Unexpected {
                expected: "document start",
                found: "scalar",
                ..
            }
        ));
    }

    #[test]
    fn unterminated_block_sequence_reports_opening() {
        let err = parse_err(vec![
            TokenData::BlockSequenceStart,
            TokenData::BlockEntry,
            plain("a"),
            TokenData::Key,
        ]);
        match err {
            ParserError::Syntax {
                context,
                context_mark,
                found,
                ..
            } => {
                assert_eq!(context, "a block collection");
                assert_eq!(context_mark.line, 1);
                assert_eq!(found, "key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn flow_sequence_missing_separator_fails() {
        let err = parse_err(vec![
            TokenData::FlowSequenceStart,
            plain("a"),
            plain("b"),
            TokenData::FlowSequenceEnd,
        ]);
        assert!(matches!(
            err,
            ParserError::Syntax {
                context: "a flow sequence",
                ..
            }
        ));
    }

    #[test]
    fn missing_node_content_fails() {
        let err = parse_err(vec![TokenData::FlowSequenceStart, TokenData::Value]);
        assert!(matches!(
            err,
            ParserError::Syntax {
                context: "a flow node",
                found: "value",
                ..
            }
        ));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut parser = Parser::new(tokens(vec![
            TokenData::StreamStart {
                encoding: Encoding::Utf8,
            },
            plain("x"),
            TokenData::StreamEnd,
        ]));
        assert!(parser.check_event(&[StreamStart]).unwrap());
        assert!(!parser.check_event(&[Scalar]).unwrap());
        let peeked = parser.peek_event().unwrap().clone();
        assert_eq!(parser.peek_event().unwrap(), &peeked);
        assert_eq!(parser.next_event().unwrap(), peeked);
        assert!(parser.check_event(&[]).unwrap());

        while !parser.is_finished() {
            parser.next_event().unwrap();
        }
        assert!(!parser.check_event(&[]).unwrap());
        assert!(!parser.check_event(&[Scalar]).unwrap());
    }

    #[test]
    #[should_panic(expected = "after the stream has ended")]
    fn next_event_after_stream_end_panics() {
        let mut parser = Parser::new(tokens(vec![
            TokenData::StreamStart {
                encoding: Encoding::Utf8,
            },
            TokenData::StreamEnd,
        ]));
        parser.next_event().unwrap();
        parser.next_event().unwrap();
        let _ = parser.next_event();
    }

    #[test]
    fn iterator_yields_all_events_then_fuses() {
        let mut parser = Parser::new(tokens(vec![
            TokenData::StreamStart {
                encoding: Encoding::Utf8,
            },
            plain("x"),
            TokenData::StreamEnd,
        ]));
        let mut count = 0;
        for event in parser.by_ref() {
            event.unwrap();
            count += 1;
        }
        assert_eq!(count, 5);
        assert!(parser.next().is_none());
    }

    #[test]
    fn parsing_is_deterministic() {
        let body = vec![
            TokenData::FlowMappingStart,
            TokenData::Key,
            plain("k"),
            TokenData::Value,
            TokenData::FlowSequenceStart,
            plain("a"),
            TokenData::FlowEntry,
            plain("b"),
            TokenData::FlowSequenceEnd,
            TokenData::FlowMappingEnd,
        ];
        assert_eq!(parse(body.clone()), parse(body));
    }

    #[test]
    fn start_end_events_nest_properly() {
        let events = parse(vec![
            TokenData::BlockMappingStart,
            TokenData::Key,
            plain("k"),
            TokenData::Value,
            TokenData::BlockSequenceStart,
            TokenData::BlockEntry,
            TokenData::FlowSequenceStart,
            TokenData::FlowMappingStart,
            TokenData::Key,
            plain("a"),
            TokenData::Value,
            plain("b"),
            TokenData::FlowMappingEnd,
            TokenData::FlowEntry,
            plain("c"),
            TokenData::FlowSequenceEnd,
            TokenData::BlockEnd,
            TokenData::BlockEnd,
        ]);

        let mut stack = Vec::new();
        for event in &events {
            assert!(event.start_mark.index <= event.end_mark.index);
            match event.kind() {
                StreamStart | DocumentStart | SequenceStart | MappingStart => {
                    stack.push(event.kind());
                }
                StreamEnd => assert_eq!(stack.pop(), Some(StreamStart)),
                DocumentEnd => assert_eq!(stack.pop(), Some(DocumentStart)),
                SequenceEnd => assert_eq!(stack.pop(), Some(SequenceStart)),
                MappingEnd => assert_eq!(stack.pop(), Some(MappingStart)),
                Alias | Scalar => {}
            }
        }
        assert!(stack.is_empty());

        for pair in events.windows(2) {
            assert!(pair[0].start_mark.index <= pair[1].start_mark.index);
        }
    }
}
