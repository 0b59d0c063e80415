//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Comments are blanked out by [`strip_comments`] before classification starts,
//! so a comment body can never satisfy another token pattern while line and
//! column numbers of the surviving tokens stay exact.
//!
//! Classification walks an ordered list of recognizers at every cursor
//! position; the first recognizer that matches wins. Characters no recognizer
//! accepts become [`TokenKind::Unknown`] tokens instead of errors, so the
//! later stages can keep going on partial information.

use std::fmt;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    PreprocessorInclude,
    PreprocessorDefine,
    PreprocessorConditional,
    Keyword,
    Identifier,
    Number,
    String,
    Char,
    Operator,
    Delimiter,
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::PreprocessorInclude => "include directive",
            TokenKind::PreprocessorDefine => "define directive",
            TokenKind::PreprocessorConditional => "conditional directive",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Char => "char literal",
            TokenKind::Operator => "operator",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A classified piece of source text with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// True if this token has the given kind and exact lexeme.
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(TokenKind::Keyword, keyword)
    }

    pub fn is_delimiter(&self, delimiter: &str) -> bool {
        self.is(TokenKind::Delimiter, delimiter)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.is(TokenKind::Operator, operator)
    }

    /// Column just past the last character of the lexeme (single-line lexemes).
    pub fn end_column(&self) -> usize {
        self.column + self.lexeme.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' at {}:{}",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}

/// Reserved words recognized as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "int", "char", "float", "double", "struct", "union", "void", "if", "else", "for", "while",
    "return", "switch", "case", "break", "continue", "const", "typedef", "extern", "static",
    "auto", "register", "do", "long", "short", "unsigned", "signed", "sizeof", "enum", "goto",
    "default", "volatile",
];

// Longest first, so a multi-character operator always beats its prefix.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "->", "<<", ">>", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|",
    "^", "~", "?", ".",
];

const DELIMITERS: &[char] = &['(', ')', '{', '}', '[', ']', ';', ',', ':'];

const CONDITIONAL_DIRECTIVES: &[&str] = &["if", "ifdef", "ifndef", "elif", "else", "endif"];

/// A recognizer inspects the input at the cursor without consuming anything
/// and reports the token kind plus its length in characters.
type Recognizer = fn(&Lexer) -> Option<(TokenKind, usize)>;

const RECOGNIZERS: &[Recognizer] = &[
    Lexer::directive,
    Lexer::keyword,
    Lexer::identifier,
    Lexer::number,
    Lexer::string_literal,
    Lexer::char_literal,
    Lexer::operator,
    Lexer::delimiter,
];

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Replace every comment character with a space, keeping newlines.
///
/// The output has exactly as many characters as the input, so positions
/// computed on it are positions in the original text. String and character
/// literals are skipped, which keeps `"http://example.com"` intact.
pub fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            State::Code => match (c, next) {
                ('/', Some('/')) => {
                    out.push_str("  ");
                    state = State::LineComment;
                    i += 2;
                    continue;
                }
                ('/', Some('*')) => {
                    out.push_str("  ");
                    state = State::BlockComment;
                    i += 2;
                    continue;
                }
                ('"', _) | ('\'', _) => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Str(quote) => {
                if c == '\\' && next.is_some_and(|n| n != '\n') {
                    out.push(c);
                    out.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                out.push(c);
                if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && next == Some('/') {
                    out.push_str("  ");
                    state = State::Code;
                    i += 2;
                    continue;
                }
                out.push(if c == '\n' { '\n' } else { ' ' });
            }
        }
        i += 1;
    }

    out
}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(source: &str) -> Self {
        Self {
            input: strip_comments(source).chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Consumes the lexer, so no state can leak into a later invocation.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            let (line, column) = (self.line, self.column);
            let (kind, len) = RECOGNIZERS
                .iter()
                .find_map(|recognize| recognize(&self))
                .unwrap_or((TokenKind::Unknown, 1));

            let lexeme: String = (0..len).filter_map(|_| self.advance()).collect();
            tokens.push(Token::new(kind, lexeme, line, column));
        }

        tracing::trace!(count = tokens.len(), "tokenized source");
        tokens
    }

    /// `#include`, `#define`, conditionals; any other directive is one
    /// `Unknown` token spanning the whole line.
    fn directive(&self) -> Option<(TokenKind, usize)> {
        if self.peek() != Some('#') {
            return None;
        }

        let end = self.directive_end();
        let text: String = self.input[self.position..end].iter().collect();
        let body = text[1..].trim_start();
        let name: String = body
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let line_len = text.trim_end().chars().count();

        let kind = match name.as_str() {
            "include" => {
                let rest = body[name.len()..].trim_start();
                let close = match rest.chars().next() {
                    Some('<') => '>',
                    Some('"') => '"',
                    _ => return Some((TokenKind::Unknown, line_len)),
                };
                let offset = text.chars().count() - rest.chars().count();
                return match rest.chars().skip(1).position(|c| c == close) {
                    Some(idx) => Some((TokenKind::PreprocessorInclude, offset + idx + 2)),
                    None => Some((TokenKind::Unknown, line_len)),
                };
            }
            "define" => TokenKind::PreprocessorDefine,
            n if CONDITIONAL_DIRECTIVES.contains(&n) => TokenKind::PreprocessorConditional,
            _ => TokenKind::Unknown,
        };

        Some((kind, line_len))
    }

    /// End of a logical preprocessor line, following `\`-newline continuations.
    fn directive_end(&self) -> usize {
        let mut pos = self.position;
        while pos < self.input.len() {
            if self.input[pos] == '\n' {
                let continued = self.input[self.position..pos]
                    .iter()
                    .rev()
                    .find(|c| !matches!(c, ' ' | '\t' | '\r'))
                    == Some(&'\\');
                if !continued {
                    break;
                }
            }
            pos += 1;
        }
        pos
    }

    fn word_len(&self) -> usize {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.input[self.position..]
                .iter()
                .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
                .count(),
            _ => 0,
        }
    }

    fn keyword(&self) -> Option<(TokenKind, usize)> {
        let len = self.word_len();
        if len == 0 {
            return None;
        }
        let word: String = self.input[self.position..self.position + len].iter().collect();
        KEYWORDS
            .contains(&word.as_str())
            .then_some((TokenKind::Keyword, len))
    }

    fn identifier(&self) -> Option<(TokenKind, usize)> {
        match self.word_len() {
            0 => None,
            len => Some((TokenKind::Identifier, len)),
        }
    }

    /// Decimal, hexadecimal and floating literals with optional suffixes.
    fn number(&self) -> Option<(TokenKind, usize)> {
        if !self.peek()?.is_ascii_digit() {
            return None;
        }

        let mut len = 0;
        if self.peek() == Some('0') && matches!(self.peek_ahead(1), Some('x' | 'X')) {
            len = 2;
            while self.peek_ahead(len).is_some_and(|c| c.is_ascii_hexdigit()) {
                len += 1;
            }
        } else {
            while self.peek_ahead(len).is_some_and(|c| c.is_ascii_digit()) {
                len += 1;
            }
            if self.peek_ahead(len) == Some('.') {
                len += 1;
                while self.peek_ahead(len).is_some_and(|c| c.is_ascii_digit()) {
                    len += 1;
                }
            }
            if matches!(self.peek_ahead(len), Some('e' | 'E')) {
                let sign = usize::from(matches!(self.peek_ahead(len + 1), Some('+' | '-')));
                if self.peek_ahead(len + 1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                    len += 1 + sign;
                    while self.peek_ahead(len).is_some_and(|c| c.is_ascii_digit()) {
                        len += 1;
                    }
                }
            }
        }

        while matches!(self.peek_ahead(len), Some('u' | 'U' | 'l' | 'L' | 'f' | 'F')) {
            len += 1;
        }

        Some((TokenKind::Number, len))
    }

    /// Length of a quoted literal starting at the cursor, or `None` when it is
    /// not closed before the end of the line.
    fn quoted_len(&self, quote: char) -> Option<usize> {
        if self.peek() != Some(quote) {
            return None;
        }
        let mut len = 1;
        loop {
            match self.peek_ahead(len)? {
                '\n' => return None,
                '\\' => len += 2,
                c if c == quote => return Some(len + 1),
                _ => len += 1,
            }
        }
    }

    fn string_literal(&self) -> Option<(TokenKind, usize)> {
        self.quoted_len('"').map(|len| (TokenKind::String, len))
    }

    fn char_literal(&self) -> Option<(TokenKind, usize)> {
        self.quoted_len('\'').map(|len| (TokenKind::Char, len))
    }

    fn operator(&self) -> Option<(TokenKind, usize)> {
        OPERATORS.iter().find_map(|op| {
            op.chars()
                .enumerate()
                .all(|(i, c)| self.peek_ahead(i) == Some(c))
                .then(|| (TokenKind::Operator, op.len()))
        })
    }

    fn delimiter(&self) -> Option<(TokenKind, usize)> {
        DELIMITERS
            .contains(&self.peek()?)
            .then_some((TokenKind::Delimiter, 1))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }
}
