//! Lexical analyzer: turns a byte stream into tokens, one at a time.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;
use std::io::{self, Bytes};
use std::iter::Peekable;

use crate::token::Token;

/// Token source with a single-slot pushback buffer.
///
/// `get` drains the buffer before touching the input, so each grammar
/// production can return one token of lookahead via [`TokenStream::putback`].
/// The calculator surface is ASCII, so the stream reads raw bytes and reports
/// anything else as a bad token.
pub struct TokenStream<R: BufRead> {
    input: Peekable<Bytes<R>>,
    buffer: Option<Token>,

    // Scratch space for numbers and names.  Allocated here to reuse memory.
    buf: String,
}

impl<R: BufRead> TokenStream<R> {
    pub fn new(input: R) -> TokenStream<R> {
        TokenStream {
            input: input.bytes().peekable(),
            buffer: None,
            buf: String::new(),
        }
    }

    /// Return the next token, taking the pushed-back one first if present.
    pub fn get(&mut self) -> Result<Token, StreamError> {
        if let Some(token) = self.buffer.take() {
            return Ok(token);
        }

        loop {
            match self.input.next() {
                None => return Ok(Token::Eof),
                Some(Err(e)) => return Err(StreamError::Io(e)),
                Some(Ok(b)) => match b {
                    b' ' | b'\t' | b'\r' | b'\n' => (),
                    b'+' => return Ok(Token::Plus),
                    b'-' => return Ok(Token::Minus),
                    b'*' => return Ok(Token::Star),
                    b'/' => return Ok(Token::Slash),
                    b'%' => return Ok(Token::Percent),
                    b'(' => return Ok(Token::LeftParen),
                    b')' => return Ok(Token::RightParen),
                    b'=' => return Ok(Token::Equal),
                    b';' => return Ok(Token::Print),
                    b'q' => return Ok(Token::Quit),
                    b'0'..=b'9' | b'.' => return self.scan_number(b),
                    b if b.is_ascii_alphabetic() => return self.scan_name(b),
                    _ => return Err(StreamError::BadToken(b as char)),
                },
            };
        }
    }

    /// Store `token` so the next `get` returns it again.
    ///
    /// Only one token fits: callers must `get` before putting back again.
    pub fn putback(&mut self, token: Token) -> Result<(), StreamError> {
        if self.buffer.is_some() {
            return Err(StreamError::BufferFull);
        }
        self.buffer = Some(token);
        Ok(())
    }

    /// Discard input up to and including the next token of `delimiter`'s
    /// kind.  If the pushed-back token already is the delimiter, stop there;
    /// otherwise the buffer is dropped and raw bytes are skipped until the
    /// delimiter character is consumed or the input ends.
    ///
    /// Used to resynchronize after an error in the middle of a statement.
    pub fn ignore(&mut self, delimiter: &Token) -> Result<(), StreamError> {
        if let Some(token) = self.buffer.take() {
            if token.same_kind(delimiter) {
                return Ok(());
            }
        }

        let stop = match delimiter.glyph() {
            Some(ch) => ch as u8,
            None => return Ok(()),
        };
        loop {
            match self.input.next() {
                None => return Ok(()),
                Some(Err(e)) => return Err(StreamError::Io(e)),
                Some(Ok(b)) if b == stop => return Ok(()),
                Some(Ok(_)) => (),
            }
        }
    }

    fn scan_number(&mut self, first_byte: u8) -> Result<Token, StreamError> {
        self.buf.clear();
        self.buf.push(first_byte as char);
        loop {
            match self.input.peek() {
                Some(Ok(b)) if b.is_ascii_digit() || *b == b'.' => {
                    let b = self.next_byte_unchecked()?;
                    self.buf.push(b as char);
                }
                _ => break,
            }
        }

        let n = self
            .buf
            .parse::<f64>()
            .map_err(|_| StreamError::BadNumber(self.buf.clone()))?;
        Ok(Token::Number(n))
    }

    fn scan_name(&mut self, first_byte: u8) -> Result<Token, StreamError> {
        self.buf.clear();
        self.buf.push(first_byte as char);
        loop {
            match self.input.peek() {
                Some(Ok(b)) if b.is_ascii_alphanumeric() => {
                    let b = self.next_byte_unchecked()?;
                    self.buf.push(b as char);
                }
                _ => break,
            }
        }

        if self.buf == "let" {
            Ok(Token::Let)
        } else {
            Ok(Token::Name(self.buf.clone()))
        }
    }

    /// Return the next byte or error.  Panic on EOF.
    /// Use this after peek()ing only.
    fn next_byte_unchecked(&mut self) -> Result<u8, StreamError> {
        Ok(self.input.next().unwrap()?)
    }
}

impl<R: BufRead> fmt::Debug for TokenStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStream")
            .field("buffer", &self.buffer)
            .finish()
    }
}

#[derive(Debug)]
pub enum StreamError {
    Io(io::Error),
    /// Unrecognized input character.
    BadToken(char),
    /// Character sequence that looks like a number but does not parse.
    BadNumber(String),
    /// `putback` called while the one-slot buffer was occupied.
    BufferFull,
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::BadToken(_) | StreamError::BadNumber(_) | StreamError::BufferFull => None,
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Io(e) => write!(f, "read error: {}", e),
            StreamError::BadToken(ch) => write!(f, "bad token: '{}'", ch),
            StreamError::BadNumber(lit) => write!(f, "bad number literal: {}", lit),
            StreamError::BufferFull => write!(f, "putback() into a full buffer"),
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> StreamError {
        StreamError::Io(e)
    }
}
