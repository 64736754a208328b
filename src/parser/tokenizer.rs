use super::locations::Coords;
use crate::error::{Error, Result};
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;

#[derive(Clone, Default, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) coords: Coords,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub(crate) fn endmarker(coords: Coords) -> Self {
        Self {
            typ: TokenType::ENDMARKER,
            lexeme: String::new(),
            coords,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenType {
    COMMENT,
    WHITESPACE,
    STRING,
    LPAR,
    RPAR,
    NUMBER,
    ATOM,
    BINDING,
    #[default]
    ENDMARKER,
}

impl TokenType {
    /// Comments and whitespace separate list elements but are never
    /// elements themselves.
    pub fn is_separator(self) -> bool {
        matches!(self, Self::COMMENT | Self::WHITESPACE)
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::COMMENT | Self::WHITESPACE => "whitespace",
            Self::STRING => "string",
            Self::LPAR => "parenleft",
            Self::RPAR => "parenright",
            Self::NUMBER => "number",
            Self::ATOM => "atom",
            Self::BINDING => "binding",
            Self::ENDMARKER => "eof",
        };
        write!(f, "{}", name)
    }
}

const S_SPACE_CHARS: &str = r"\f\n\r\t\v ";
const S_NAME_CHARS: &str = concatcp!(r"[^()", S_SPACE_CHARS, r"]+");

const S_COMMENT: &str = r"^#[^\n]*";
const S_WHITESPACE: &str = concatcp!(r"^[", S_SPACE_CHARS, r"]+");
const S_STRING: &str = r#"^"(?s:[^"\\]|\\.)*""#;
const S_LPAR: &str = r"^\(";
const S_RPAR: &str = r"^\)";
const S_NUMBER: &str = r"^[-+]?[0-9]+(?:\.[0-9]+)?";
const S_ATOM: &str = concatcp!(r"^'", S_NAME_CHARS);
const S_BINDING: &str = concatcp!(r"^", S_NAME_CHARS);

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Error compiling regex.")
}

/// Tried in order against the remaining input; the first match wins.
static PATTERNS: Lazy<[(Regex, TokenType); 8]> = Lazy::new(|| {
    [
        (compile(S_COMMENT), TokenType::COMMENT),
        (compile(S_WHITESPACE), TokenType::WHITESPACE),
        (compile(S_STRING), TokenType::STRING),
        (compile(S_LPAR), TokenType::LPAR),
        (compile(S_RPAR), TokenType::RPAR),
        (compile(S_NUMBER), TokenType::NUMBER),
        (compile(S_ATOM), TokenType::ATOM),
        (compile(S_BINDING), TokenType::BINDING),
    ]
});

pub struct Tokenizer {
    tokens: Vec<Token>,
    file: Rc<str>,
    line: usize,
    column: usize,
}

impl Tokenizer {
    pub fn new(file: &str) -> Self {
        Self {
            tokens: vec![],
            file: Rc::from(file),
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self, input: &str) -> Result<()> {
        let mut rest = input;
        while !rest.is_empty() {
            match self.find_by_regex(rest) {
                Some(len) => rest = &rest[len..],
                None => {
                    return Err(Error::tokenize(
                        format!("Cannot match {:?}", rest),
                        self.coords(),
                    ))
                }
            }
        }
        Ok(())
    }

    pub fn finalize(self) -> Vec<Token> {
        self.tokens
    }

    fn coords(&self) -> Coords {
        Coords::new(self.file.clone(), self.line, self.column)
    }

    fn find_by_regex(&mut self, rest: &str) -> Option<usize> {
        let (m, typ) = PATTERNS
            .iter()
            .find_map(|(regex, typ)| regex.find(rest).map(|m| (m, *typ)))?;
        let lexeme = m.as_str();
        self.tokens.push(Token {
            typ,
            lexeme: lexeme.to_string(),
            coords: self.coords(),
        });
        self.advance(lexeme);
        Some(m.end())
    }

    fn advance(&mut self, lexeme: &str) {
        match lexeme.rfind('\n') {
            Some(pos) => {
                self.line += lexeme.matches('\n').count();
                self.column = 1 + lexeme[pos + 1..].chars().count();
            }
            None => self.column += lexeme.chars().count(),
        }
    }
}

pub fn tokenize_string(input: &str, file: &str) -> Result<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(file);
    tokenizer.tokenize(input)?;
    let tokens = tokenizer.finalize();
    log::debug!("tokenized {} into {} tokens", file, tokens.len());
    Ok(tokens)
}
