use regex::Regex;
use std::fmt;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum SpecialChar {
    OpenSquareBracket,
    CloseSquareBracket,
    OpenBraceBracket,
    CloseBraceBracket,
    OpenRoundBracket,
    CloseRoundBracket,
    Quote,
    Backtick,
    Tilde,
    Caret,
    AtSign,
}

impl SpecialChar {
    pub fn as_char(self) -> char {
        use SpecialChar::*;
        match self {
            OpenSquareBracket => '[',
            CloseSquareBracket => ']',
            OpenBraceBracket => '{',
            CloseBraceBracket => '}',
            OpenRoundBracket => '(',
            CloseRoundBracket => ')',
            Quote => '\'',
            Backtick => '`',
            Tilde => '~',
            Caret => '^',
            AtSign => '@',
        }
    }
}

/// A double-quoted literal exactly as it appeared in the source, quotes included.
/// It may be missing its closing quote: that is for the reader to reject.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct StringLiteral<'a> {
    raw: &'a str,
}

impl<'a> StringLiteral<'a> {
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The text between the quotes, or `None` if the literal is unterminated.
    pub fn payload(&self) -> Option<&'a str> {
        lazy_static! {
            static ref BALANCED: Regex = Regex::new(r#"^"(?:\\.|[^\\"])*"$"#).unwrap();
        }
        match BALANCED.is_match(self.raw) {
            // Both quotes are ASCII, so slicing one byte off either end is safe.
            true => Some(&self.raw[1..self.raw.len() - 1]),
            false => None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    SpliceUnquote,
    SpecialChar(SpecialChar),
    StringLiteral(StringLiteral<'a>),
    Comment(&'a str),
    PlainChars(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::SpliceUnquote => write!(f, "~@"),
            Token::SpecialChar(c) => write!(f, "{}", c.as_char()),
            Token::StringLiteral(s) => write!(f, "{}", s.raw),
            Token::Comment(text) => write!(f, ";{}", text),
            Token::PlainChars(chars) => write!(f, "{}", chars),
        }
    }
}

#[derive(Debug)]
pub enum TokenizerError {
    NoFirstCharacter,
    BadTildeMatch,
    NoCapture(String),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::NoFirstCharacter => write!(f, "no characters to parse token from"),
            TokenizerError::BadTildeMatch => write!(f, "bad tilde match"),
            TokenizerError::NoCapture(rest) => {
                write!(f, "token regex did not capture a token from {:?}", rest)
            }
        }
    }
}

fn create_token(captured: &str) -> Result<Token, TokenizerError> {
    use SpecialChar::*;
    let bytes = captured.as_bytes();
    let first_char = bytes.first().ok_or(TokenizerError::NoFirstCharacter)?;
    match first_char {
        // Splice unquote and special chars
        b'~' => {
            if bytes.len() == 1 {
                Ok(Token::SpecialChar(Tilde))
            } else if let Some(b'@') = bytes.get(1) {
                Ok(Token::SpliceUnquote)
            } else {
                Err(TokenizerError::BadTildeMatch)
            }
        }
        b'[' => Ok(Token::SpecialChar(OpenSquareBracket)),
        b'{' => Ok(Token::SpecialChar(OpenBraceBracket)),
        b'(' => Ok(Token::SpecialChar(OpenRoundBracket)),
        b']' => Ok(Token::SpecialChar(CloseSquareBracket)),
        b'}' => Ok(Token::SpecialChar(CloseBraceBracket)),
        b')' => Ok(Token::SpecialChar(CloseRoundBracket)),
        b'\'' => Ok(Token::SpecialChar(Quote)),
        b'`' => Ok(Token::SpecialChar(Backtick)),
        b'^' => Ok(Token::SpecialChar(Caret)),
        b'@' => Ok(Token::SpecialChar(AtSign)),
        b'"' => Ok(Token::StringLiteral(StringLiteral { raw: captured })),
        // Note that ; is ASCII so safe to slice on bytes even if the rest of the string is
        // non ASCII.
        b';' => Ok(Token::Comment(&captured[1..])),
        _ => Ok(Token::PlainChars(captured)),
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                          # ignore whitespace in this patern & allow comments
                ^[\s,]*                      # whitespace or commas, ignored
                (                            # token capture group
                    ~@                       # literal splice-unquote
                    |[\[\]{}()'`~^@]         # single special characters
                    |"(?:                    # string literal. its contents, not captured, include:
                        \\.                  #    escapes
                        |[^\\"]              #    anything which isn't a backslash or a quote
                      )*
                      "?                     #    possibly missing a closing quote
                    |;.*                     # comments
                    |[^\s\[\]{}('"`,;)]*     # zero or more plain characters
                )
                [\s,]*                       # whitespace or commas, ignored
            "#
        )
        .unwrap();
    }
    let mut input = input;
    let mut tokens = Vec::new();
    while !input.is_empty() {
        let caps = TOKEN_RE
            .captures(input)
            .ok_or_else(|| TokenizerError::NoCapture(String::from(input)))?;
        let (whole, token) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(token)) => (whole, token),
            _ => return Err(TokenizerError::NoCapture(String::from(input))),
        };
        if token.as_str().is_empty() {
            // Only trailing separators can produce an empty capture.
            if whole.end() == input.len() {
                break;
            }
            return Err(TokenizerError::NoCapture(String::from(input)));
        }
        tokens.push(create_token(token.as_str())?);
        input = &input[whole.end()..];
    }
    log::trace!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn simple_application() {
        assert_eq!(texts("(+ 1 2)"), vec!["(", "+", "1", "2", ")"]);
    }

    #[test]
    fn commas_and_whitespace_separate() {
        assert_eq!(texts("  [a,b ,, c]  "), vec!["[", "a", "b", "c", "]"]);
    }

    #[test]
    fn splice_unquote_beats_tilde() {
        let tokens = tokenize("~@xs ~x").unwrap();
        assert_eq!(tokens[0], Token::SpliceUnquote);
        assert_eq!(tokens[1], Token::PlainChars("xs"));
        assert_eq!(tokens[2], Token::SpecialChar(SpecialChar::Tilde));
    }

    #[test]
    fn reader_macro_characters() {
        assert_eq!(texts("'a `b ^c @d"), vec!["'", "a", "`", "b", "^", "c", "@", "d"]);
    }

    #[test]
    fn string_literal_keeps_escapes() {
        let tokens = tokenize(r#"(str "a \"b\" \\" x)"#).unwrap();
        match tokens[2] {
            Token::StringLiteral(s) => {
                assert_eq!(s.raw(), r#""a \"b\" \\""#);
                assert_eq!(s.payload(), Some(r#"a \"b\" \\"#));
            }
            ref other => panic!("expected a string literal, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_string_is_still_a_token() {
        let tokens = tokenize(r#""abc"#).unwrap();
        match tokens.as_slice() {
            [Token::StringLiteral(s)] => assert_eq!(s.payload(), None),
            other => panic!("unexpected tokens {:?}", other),
        }
        let tokens = tokenize(r#""abc\""#).unwrap();
        match tokens.as_slice() {
            [Token::StringLiteral(s)] => assert_eq!(s.payload(), None),
            other => panic!("unexpected tokens {:?}", other),
        }
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = tokenize("1 ; the rest (\n2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::PlainChars("1"),
                Token::Comment(" the rest ("),
                Token::PlainChars("2"),
            ]
        );
    }

    #[test]
    fn blank_input_has_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" ,\t\n").unwrap().is_empty());
    }

    #[test]
    fn plain_chars_stop_at_delimiters() {
        assert_eq!(texts("abc(def)g'h"), vec!["abc", "(", "def", ")", "g", "'", "h"]);
    }
}
