use crate::strings;
use crate::tokens::{tokenize, SpecialChar, StringLiteral, Token, TokenizerError};
use crate::types::{build_map, MalInt, MalObject, MapError};
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a, 's> = Peekable<slice::Iter<'a, Token<'s>>>;

pub type Result<T = MalObject> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Tokenizer(TokenizerError),
    EndOfInput,
    UnexpectedCloser(char),
    OddMapEntries(usize),
    UnhashableKey(String),
    BadInteger(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "tokenizer failed: {}", e),
            Error::EndOfInput => write!(f, "unexpected EOF"),
            Error::UnexpectedCloser(c) => write!(f, "unexpected '{}'", c),
            Error::OddMapEntries(n) => {
                write!(f, "hash map literal needs an even number of entries, got {}", n)
            }
            Error::UnhashableKey(key) => {
                write!(f, "hash map keys must be strings or keywords, got {}", key)
            }
            Error::BadInteger(chars) => write!(f, "integer literal out of range: {}", chars),
        }
    }
}

impl From<TokenizerError> for Error {
    fn from(e: TokenizerError) -> Self {
        Self::Tokenizer(e)
    }
}

impl From<MapError> for Error {
    fn from(e: MapError) -> Self {
        match e {
            MapError::OddEntries(n) => Self::OddMapEntries(n),
            MapError::UnhashableKey(key) => Self::UnhashableKey(key),
        }
    }
}

/// Read the first form in `input`. Anything after it is ignored.
pub fn read_str(input: &str) -> Result {
    let tokens = tokenize(input)?;
    let mut reader = tokens.iter().peekable();
    let form = read_form(&mut reader);
    log::trace!("read {:?}", form);
    form
}

/// Whether `input` holds anything besides separators and comments.
pub fn has_form(input: &str) -> bool {
    match tokenize(input) {
        Ok(tokens) => tokens.iter().any(|t| !matches!(t, Token::Comment(_))),
        // Let the reader report it.
        Err(_) => true,
    }
}

fn peek<'s>(reader: &mut Reader<'_, 's>) -> Result<Token<'s>> {
    reader.peek().map(|token| **token).ok_or(Error::EndOfInput)
}

fn next<'s>(reader: &mut Reader<'_, 's>) -> Result<Token<'s>> {
    reader.next().copied().ok_or(Error::EndOfInput)
}

fn skip_comments(reader: &mut Reader) {
    while let Some(Token::Comment(_)) = reader.peek() {
        reader.next();
    }
}

fn read_form(reader: &mut Reader) -> Result {
    use SpecialChar::*;
    skip_comments(reader);
    match peek(reader)? {
        Token::SpecialChar(c @ CloseRoundBracket)
        | Token::SpecialChar(c @ CloseSquareBracket)
        | Token::SpecialChar(c @ CloseBraceBracket) => Err(Error::UnexpectedCloser(c.as_char())),
        Token::SpecialChar(OpenRoundBracket) => {
            read_sequence(reader, CloseRoundBracket).map(MalObject::wrap_list)
        }
        Token::SpecialChar(OpenSquareBracket) => {
            read_sequence(reader, CloseSquareBracket).map(MalObject::wrap_vector)
        }
        Token::SpecialChar(OpenBraceBracket) => {
            let entries = read_sequence(reader, CloseBraceBracket)?;
            Ok(build_map(entries)?)
        }
        Token::SpecialChar(Quote) => read_macro(reader, "quote"),
        Token::SpecialChar(Backtick) => read_macro(reader, "quasiquote"),
        Token::SpecialChar(Tilde) => read_macro(reader, "unquote"),
        Token::SpecialChar(AtSign) => read_macro(reader, "deref"),
        Token::SpliceUnquote => read_macro(reader, "splice-unquote"),
        _ => read_atom(reader),
    }
}

/// Consume an opening bracket, then forms up to and including `closer`.
fn read_sequence(reader: &mut Reader, closer: SpecialChar) -> Result<Vec<MalObject>> {
    next(reader)?;
    let mut elements = Vec::new();
    loop {
        skip_comments(reader);
        match peek(reader)? {
            Token::SpecialChar(c) if c == closer => {
                next(reader)?;
                break;
            }
            _ => elements.push(read_form(reader)?),
        }
    }
    Ok(elements)
}

fn read_macro(reader: &mut Reader, name: &str) -> Result {
    next(reader)?;
    let form = read_form(reader)?;
    Ok(MalObject::wrap_list(vec![MalObject::new_symbol(name), form]))
}

fn read_atom(reader: &mut Reader) -> Result {
    match next(reader)? {
        Token::PlainChars(chars) => read_plain_chars(chars),
        Token::StringLiteral(literal) => read_string(literal),
        other => Ok(MalObject::new_symbol(&other.to_string())),
    }
}

fn read_plain_chars(chars: &str) -> Result {
    lazy_static! {
        static ref INTEGER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
    }
    if INTEGER.is_match(chars) {
        return chars
            .parse::<MalInt>()
            .map(MalObject::Integer)
            .map_err(|_| Error::BadInteger(String::from(chars)));
    }
    if let Some(name) = chars.strip_prefix(':') {
        return Ok(MalObject::new_keyword(name));
    }
    Ok(match chars {
        "true" => MalObject::Bool(true),
        "false" => MalObject::Bool(false),
        "nil" => MalObject::Nil,
        _ => MalObject::new_symbol(chars),
    })
}

fn read_string(literal: StringLiteral) -> Result {
    match literal.payload() {
        Some(payload) => Ok(MalObject::new_string(&strings::build_string(payload))),
        None => Err(Error::EndOfInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &str) -> String {
        match read_str(input) {
            Ok(obj) => obj.to_string(),
            Err(e) => panic!("failed to read {:?}: {}", input, e),
        }
    }

    #[test]
    fn atoms() {
        assert_eq!(read_str("42").unwrap(), MalObject::Integer(42));
        assert_eq!(read_str("-7").unwrap(), MalObject::Integer(-7));
        assert_eq!(read_str("true").unwrap(), MalObject::Bool(true));
        assert_eq!(read_str("false").unwrap(), MalObject::Bool(false));
        assert_eq!(read_str("nil").unwrap(), MalObject::Nil);
        assert_eq!(read_str("abc").unwrap(), MalObject::new_symbol("abc"));
        assert_eq!(read_str("-").unwrap(), MalObject::new_symbol("-"));
        assert_eq!(read_str("-abc").unwrap(), MalObject::new_symbol("-abc"));
        assert_eq!(read_str(":kw").unwrap(), MalObject::new_keyword("kw"));
    }

    #[test]
    fn keywords_are_flagged_strings() {
        match read_str(":kw").unwrap() {
            MalObject::String(s) => {
                assert!(s.is_keyword());
                assert_eq!(s.as_str(), "kw");
            }
            other => panic!("expected a keyword, got {:?}", other),
        }
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(
            read_str(r#""a\nb \"q\" \\""#).unwrap(),
            MalObject::new_string("a\nb \"q\" \\")
        );
        assert_eq!(read_str(r#""""#).unwrap(), MalObject::new_string(""));
    }

    #[test]
    fn unterminated_string_is_end_of_input() {
        assert!(matches!(read_str(r#""abc"#), Err(Error::EndOfInput)));
        assert!(matches!(read_str(r#""abc\""#), Err(Error::EndOfInput)));
    }

    #[test]
    fn collections() {
        assert_eq!(round_trip("(+ 1 (* 2 3))"), "(+ 1 (* 2 3))");
        assert_eq!(round_trip("[1, 2 ,3]"), "[1 2 3]");
        assert_eq!(round_trip("( )"), "()");
        assert_eq!(round_trip("[]"), "[]");
        assert_eq!(round_trip("{:a (1 2)}"), "{:a (1 2)}");
        assert_eq!(round_trip(r#"{"k" [x]}"#), r#"{"k" [x]}"#);
    }

    #[test]
    fn reader_macros() {
        assert_eq!(round_trip("'a"), "(quote a)");
        assert_eq!(round_trip("`(a b)"), "(quasiquote (a b))");
        assert_eq!(round_trip("~a"), "(unquote a)");
        assert_eq!(round_trip("~@(1 2)"), "(splice-unquote (1 2))");
        assert_eq!(round_trip("@a"), "(deref a)");
        assert_eq!(round_trip("''a"), "(quote (quote a))");
    }

    #[test]
    fn missing_closer_is_end_of_input() {
        assert!(matches!(read_str("(1 2"), Err(Error::EndOfInput)));
        assert!(matches!(read_str("[1 [2]"), Err(Error::EndOfInput)));
        assert!(matches!(read_str("{:a 1"), Err(Error::EndOfInput)));
        assert!(matches!(read_str("'"), Err(Error::EndOfInput)));
    }

    #[test]
    fn stray_closer_is_rejected() {
        assert!(matches!(read_str(")"), Err(Error::UnexpectedCloser(')'))));
        assert!(matches!(read_str("(1 ]"), Err(Error::UnexpectedCloser(']'))));
        assert!(matches!(read_str("}"), Err(Error::UnexpectedCloser('}'))));
    }

    #[test]
    fn odd_map_is_malformed() {
        assert!(matches!(read_str("{1}"), Err(Error::OddMapEntries(1))));
        assert!(matches!(read_str("{:a 1 :b}"), Err(Error::OddMapEntries(3))));
    }

    #[test]
    fn non_string_map_key_is_rejected() {
        assert!(matches!(read_str("{1 2}"), Err(Error::UnhashableKey(_))));
    }

    #[test]
    fn integer_out_of_range() {
        assert!(matches!(
            read_str("99999999999999999999"),
            Err(Error::BadInteger(_))
        ));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(round_trip("; leading\n42"), "42");
        assert_eq!(round_trip("(1 ; inside\n 2)"), "(1 2)");
        assert_eq!(round_trip("(1 ; before closer\n)"), "(1)");
        assert!(matches!(read_str("; only a comment"), Err(Error::EndOfInput)));
    }

    #[test]
    fn empty_input_is_end_of_input() {
        assert!(matches!(read_str(""), Err(Error::EndOfInput)));
        assert!(matches!(read_str("   ,  "), Err(Error::EndOfInput)));
    }

    #[test]
    fn blank_lines_have_no_form() {
        assert!(!has_form(""));
        assert!(!has_form("  , ; just talk"));
        assert!(has_form("; talk\n x"));
        assert!(has_form(")"));
    }

    #[test]
    fn only_first_form_is_read() {
        assert_eq!(round_trip("1 2 3"), "1");
    }
}
