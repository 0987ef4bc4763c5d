use std::collections::VecDeque;

use crate::{ScannerError, Token, TokenKind};

/// The contract between the parser and an upstream scanner.
///
/// A scanner hands over tokens one at a time with one token of
/// lookahead: `peek_token` borrows the next token without consuming it,
/// `get_token` consumes it and transfers ownership of its payload to
/// the caller. Both fail with the scanner's own error if the stream
/// cannot produce another token.
pub trait TokenSource {
    /// Borrow the next token without consuming it.
    fn peek_token(&mut self) -> Result<&Token, ScannerError>;

    /// Consume and return the next token.
    fn get_token(&mut self) -> Result<Token, ScannerError>;

    /// Check the next token's kind without consuming it.
    ///
    /// An empty `kinds` slice matches any token.
    fn check_token(&mut self, kinds: &[TokenKind]) -> Result<bool, ScannerError> {
        let kind = self.peek_token()?.kind();
        Ok(kinds.is_empty() || kinds.contains(&kind))
    }
}

/// A pre-scanned token buffer. An exhausted queue reports
/// [`ScannerError::UnexpectedEof`].
impl TokenSource for VecDeque<Token> {
    fn peek_token(&mut self) -> Result<&Token, ScannerError> {
        self.front().ok_or(ScannerError::UnexpectedEof)
    }

    fn get_token(&mut self) -> Result<Token, ScannerError> {
        self.pop_front().ok_or(ScannerError::UnexpectedEof)
    }
}
