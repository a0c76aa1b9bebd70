use std::fmt;
use std::mem;

/// "Words" produced by `TokenStream`.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Operators and punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LeftParen,
    RightParen,
    Equal,
    /// Statement terminator `;`, which also requests printing the result.
    Print,
    /// The `q` character; ends the session.
    Quit,

    // Keywords
    Let,

    Name(String),
    Number(f64),
}

impl Token {
    /// True when both tokens are of the same variant, payloads ignored.
    pub fn same_kind(&self, other: &Token) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// The single character this token is written as, if there is one.
    pub fn glyph(&self) -> Option<char> {
        match self {
            Token::Plus => Some('+'),
            Token::Minus => Some('-'),
            Token::Star => Some('*'),
            Token::Slash => Some('/'),
            Token::Percent => Some('%'),
            Token::LeftParen => Some('('),
            Token::RightParen => Some(')'),
            Token::Equal => Some('='),
            Token::Print => Some(';'),
            Token::Quit => Some('q'),
            Token::Eof | Token::Let | Token::Name(_) | Token::Number(_) => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Equal => write!(f, "="),
            Token::Print => write!(f, ";"),
            Token::Quit => write!(f, "q"),
            Token::Let => write!(f, "let"),
            Token::Name(name) => write!(f, "{}", name),
            Token::Number(n) => write!(f, "{}", n),
        }
    }
}
