// Mal only defines the escapes \n, \" and \\ in a string literal. A backslash
// before any other character is kept verbatim, together with that character.

use bimap::BiMap;
use std::str::Chars;

lazy_static! {
    static ref ESCAPES: BiMap<char, char> = {
        let mut m = BiMap::new();
        m.insert('\\', '\\');
        m.insert('"', '"');
        m.insert('n', '\n');
        m
    };
}

struct StringBuilder<'a> {
    chars: Chars<'a>,
    pending: Option<char>,
}

impl<'a> StringBuilder<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars(),
            pending: None,
        }
    }
}

impl Iterator for StringBuilder<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(c) = self.pending.take() {
            return Some(c);
        }
        let decoded = match self.chars.next()? {
            '\\' => match self.chars.next() {
                None => '\\',
                Some(c) => match ESCAPES.get_by_left(&c) {
                    Some(&decoded) => decoded,
                    None => {
                        self.pending = Some(c);
                        '\\'
                    }
                },
            },
            c => c,
        };
        Some(decoded)
    }
}

/// Decode the body of a string literal in a single left-to-right pass, so an
/// escaped backslash can never start another escape.
pub(crate) fn build_string(src: &str) -> String {
    StringBuilder::new(src).collect()
}

struct StringPrinter<'a> {
    chars: Chars<'a>,
}

impl<'a> StringPrinter<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.chars() }
    }
}

impl Iterator for StringPrinter<'_> {
    type Item = (char, Option<char>);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.chars.next()?;
        let charseq = match ESCAPES.get_by_right(&next) {
            Some(&l) => ('\\', Some(l)),
            None => (next, None),
        };
        Some(charseq)
    }
}

pub(crate) fn string_repr(src: &str) -> String {
    let mut output = String::with_capacity(src.len() + 2);
    output.push('"');
    for (char1, char2) in StringPrinter::new(src) {
        output.push(char1);
        if let Some(char2) = char2 {
            output.push(char2)
        };
    }
    output.push('"');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_escapes() {
        assert_eq!(build_string(r#"a\"b\"c"#), "a\"b\"c");
        assert_eq!(build_string(r"line\nbreak"), "line\nbreak");
        assert_eq!(build_string(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn escaped_backslash_does_not_start_an_escape() {
        // \\n is a backslash followed by the letter n, not a newline.
        assert_eq!(build_string(r"\\n"), "\\n");
        assert_eq!(build_string(r#"\\\""#), "\\\"");
    }

    #[test]
    fn unknown_escapes_are_kept() {
        assert_eq!(build_string(r"tab\there"), "tab\\there");
    }

    #[test]
    fn repr_inverts_decoding() {
        let text = "say \"hi\"\\\n";
        assert_eq!(string_repr(text), r#""say \"hi\"\\\n""#);
        let repr = string_repr(text);
        assert_eq!(build_string(&repr[1..repr.len() - 1]), text);
    }
}
