//! Script-consistency check for guess submissions.
//!
//! Every word must draw its letters from a single script family — Latin or
//! Cyrillic. Digits and common punctuation are neutral and never break a
//! word; any character outside those classes makes the submission invalid.

const SEPARATORS: &str = "-%&_–—.!?,;:()[]<>#$/\\'\"";

#[derive(Clone, Copy, PartialEq)]
enum Script {
    Latin,
    Cyrillic,
}

fn script_of(c: char) -> Option<Script> {
    if c.is_ascii_alphabetic() {
        Some(Script::Latin)
    } else if ('\u{0400}'..='\u{04FF}').contains(&c) || c == '\u{00EB}' || c == '\u{00CB}' {
        // U+00EB/U+00CB: ë/Ë, accepted as a stand-in for ё.
        Some(Script::Cyrillic)
    } else {
        None
    }
}

pub fn consistent_alphabet(text: &str) -> bool {
    let mut word_script: Option<Script> = None;
    for c in text.chars() {
        if c.is_whitespace() || SEPARATORS.contains(c) {
            word_script = None;
            continue;
        }
        if c.is_ascii_digit() {
            continue;
        }
        match script_of(c) {
            None => return false,
            Some(script) => match word_script {
                None => word_script = Some(script),
                Some(current) if current != script => return false,
                Some(_) => {}
            },
        }
    }
    true
}
