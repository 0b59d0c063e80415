//! Best-effort structural parser
//!
//! Builds a partial [`Program`] from a token stream in one forward pass over a
//! single cursor. Only a handful of shapes are recognized: includes, defines,
//! and functions returning one of [`RETURN_TYPES`] whose bodies contain
//! declarations and returns. Every other token range is kept as a
//! [`Verbatim`] node carrying its original text, so nothing the parser does
//! not understand is lost on the way to emission.
//!
//! The parser never fails and never moves its cursor backwards. Lookahead is
//! used to decide whether a statement has a recognized shape before anything
//! is consumed.

use crate::parser::ast::*;
use crate::parser::lexer::{tokenize, Token, TokenKind};

/// Type keywords that may start a function definition or a declaration.
pub const RETURN_TYPES: &[&str] = &["int", "void", "float", "char", "double"];

/// Parse a token sequence into a [`Program`].
pub fn parse(tokens: Vec<Token>) -> Program {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse source text.
pub fn parse_source(source: &str) -> Program {
    parse(tokenize(source))
}

/// Single-pass parser for the recognized C subset
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    /// Parse the entire program.
    ///
    /// Unrecognized tokens between two recognized items are merged into one
    /// [`Item::Verbatim`].
    pub fn parse_program(mut self) -> Program {
        let mut program = Program::new();
        let mut verbatim_start: Option<usize> = None;

        while !self.is_at_end() {
            let start = self.position;
            match self.parse_item() {
                Some(item) => {
                    if let Some(from) = verbatim_start.take() {
                        program.items.push(Item::Verbatim(self.verbatim(from, start)));
                    }
                    program.items.push(item);
                }
                None => {
                    verbatim_start.get_or_insert(start);
                    if self.position == start {
                        self.advance();
                    }
                }
            }
        }

        if let Some(from) = verbatim_start {
            program.items.push(Item::Verbatim(self.verbatim(from, self.position)));
        }

        tracing::trace!(items = program.items.len(), "parsed program");
        program
    }

    /// Try to parse one recognized top-level item at the cursor.
    ///
    /// On `None` the tokens consumed so far belong to the surrounding verbatim
    /// range.
    fn parse_item(&mut self) -> Option<Item> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::PreprocessorInclude => {
                let location = location_of(token);
                let header = include_header(&token.lexeme);
                self.advance();
                Some(Item::Include(Include { header, location }))
            }
            TokenKind::PreprocessorDefine => {
                let text = token.lexeme.clone();
                self.advance();
                Some(Item::Define(text))
            }
            TokenKind::Keyword if RETURN_TYPES.contains(&token.lexeme.as_str()) => {
                self.parse_function().map(Item::Function)
            }
            _ => None,
        }
    }

    /// Parse function definition: type name(params) { body }
    fn parse_function(&mut self) -> Option<Function> {
        let location = location_of(self.peek()?);
        let mut return_type = self.advance()?.lexeme.clone();
        while self.check_operator("*") {
            self.advance();
            return_type.push('*');
        }

        if self.peek()?.kind != TokenKind::Identifier {
            return None;
        }
        let name = self.advance()?.lexeme.clone();

        if !self.check_delimiter("(") {
            return None;
        }
        self.advance();
        let params = self.parse_parameter_list()?;

        // A prototype or anything else that is not followed by a body stays verbatim
        if !self.check_delimiter("{") {
            return None;
        }
        self.advance();
        let body = self.parse_body();

        Some(Function {
            name,
            return_type,
            params,
            body,
            location,
        })
    }

    /// Parse parameters up to and including the first `)`.
    ///
    /// Every iteration consumes a token, so malformed lists still terminate.
    /// `None` when the list is not closed or a segment is not a plain
    /// `<type> <name>` parameter (`...`, unnamed or function-pointer
    /// parameters); the whole function is then kept verbatim.
    fn parse_parameter_list(&mut self) -> Option<Vec<Parameter>> {
        let mut segments: Vec<Vec<Token>> = vec![Vec::new()];
        let mut closed = false;

        while let Some(token) = self.peek() {
            if token.is_delimiter(")") {
                self.advance();
                closed = true;
                break;
            }
            if token.is_delimiter("{") || token.is_delimiter(";") {
                break;
            }
            let token = token.clone();
            self.advance();

            if token.is_delimiter(",") {
                segments.push(Vec::new());
            } else if let Some(segment) = segments.last_mut() {
                segment.push(token);
            }
        }

        if !closed {
            return None;
        }
        match segments.as_slice() {
            [only] if only.is_empty() => Some(Vec::new()),
            [only] if only.len() == 1 && only[0].is_keyword("void") => Some(Vec::new()),
            _ => segments.iter().map(|segment| parameter_from(segment)).collect(),
        }
    }

    /// Parse statements up to and including the function's closing brace.
    fn parse_body(&mut self) -> Vec<Statement> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            if self.check_delimiter("}") {
                self.advance();
                break;
            }

            let statement = match self.parse_declaration() {
                Some(statement) => statement,
                None => match self.parse_return() {
                    Some(statement) => statement,
                    None => self.skip_statement(),
                },
            };
            body.push(statement);
        }

        body
    }

    /// `<type> <name> ;` or `<type> <name> = <expr> ;`
    fn parse_declaration(&mut self) -> Option<Statement> {
        let token = self.peek()?;
        if token.kind != TokenKind::Keyword || !RETURN_TYPES.contains(&token.lexeme.as_str()) {
            return None;
        }

        let mut offset = 1;
        let mut var_type = token.lexeme.clone();
        while self.peek_ahead(offset).is_some_and(|t| t.is_operator("*")) {
            var_type.push('*');
            offset += 1;
        }

        let name = self.peek_ahead(offset)?;
        if name.kind != TokenKind::Identifier {
            return None;
        }
        let name = name.lexeme.clone();
        offset += 1;

        let next = self.peek_ahead(offset)?;
        let (init_start, end) = if next.is_delimiter(";") {
            (None, offset)
        } else if next.is_operator("=") {
            let end = self.find_terminator(offset + 1, true)?;
            (Some(offset + 1), end)
        } else {
            return None;
        };

        let init = init_start.map(|from| {
            render_tokens(&self.tokens[self.position + from..self.position + end])
        });
        if init.as_deref() == Some("") {
            return None;
        }

        self.position += end + 1;
        Some(Statement::VariableDeclaration {
            var_type,
            name,
            init,
        })
    }

    /// `return ;` or `return <expr> ;`
    fn parse_return(&mut self) -> Option<Statement> {
        if !self.peek()?.is_keyword("return") {
            return None;
        }

        let end = self.find_terminator(1, false)?;
        let value = render_tokens(&self.tokens[self.position + 1..self.position + end]);
        self.position += end + 1;

        Some(Statement::ReturnStatement {
            value: (!value.is_empty()).then_some(value),
        })
    }

    /// Offset of the `;` ending a simple statement, looking ahead from `from`.
    ///
    /// Braces disqualify the statement; with `single_declarator` a top-level
    /// comma does as well, so `int a = 1, b;` is left to the verbatim path.
    fn find_terminator(&self, from: usize, single_declarator: bool) -> Option<usize> {
        let mut parens = 0usize;
        let mut offset = from;

        while let Some(token) = self.peek_ahead(offset) {
            match (token.kind, token.lexeme.as_str()) {
                (TokenKind::Delimiter, ";") if parens == 0 => return Some(offset),
                (TokenKind::Delimiter, "{" | "}") => return None,
                (TokenKind::Delimiter, "(" | "[") => parens += 1,
                (TokenKind::Delimiter, ")" | "]") => parens = parens.saturating_sub(1),
                (TokenKind::Delimiter, ",") if single_declarator && parens == 0 => return None,
                (
                    TokenKind::PreprocessorInclude
                    | TokenKind::PreprocessorDefine
                    | TokenKind::PreprocessorConditional,
                    _,
                ) => return None,
                _ => {}
            }
            offset += 1;
        }

        None
    }

    /// Skip one unrecognized statement and keep its text.
    ///
    /// Brace depth is tracked so a nested block's `}` closes the block, not
    /// the function. A `}` at depth zero belongs to the function and is left
    /// for [`Parser::parse_body`].
    fn skip_statement(&mut self) -> Statement {
        let start = self.position;
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            if token.is_delimiter("{") {
                depth += 1;
            } else if token.is_delimiter("}") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    if self.check_delimiter(";") {
                        self.advance();
                    }
                    break;
                }
            } else if token.is_delimiter(";") && depth == 0 {
                self.advance();
                break;
            }
            self.advance();
        }

        Statement::Verbatim(self.verbatim(start, self.position))
    }

    fn verbatim(&self, from: usize, to: usize) -> Verbatim {
        let tokens = &self.tokens[from..to];
        Verbatim {
            text: render_tokens(tokens),
            location: tokens.first().map(location_of).unwrap_or_default(),
        }
    }

    fn check_delimiter(&self, delimiter: &str) -> bool {
        self.peek().is_some_and(|t| t.is_delimiter(delimiter))
    }

    fn check_operator(&self, operator: &str) -> bool {
        self.peek().is_some_and(|t| t.is_operator(operator))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

fn location_of(token: &Token) -> SourceLocation {
    SourceLocation::new(token.line, token.column)
}

/// `#include <stdio.h>` -> `<stdio.h>`
fn include_header(lexeme: &str) -> String {
    lexeme
        .find(['<', '"'])
        .map(|idx| lexeme[idx..].trim().to_string())
        .unwrap_or_default()
}

/// Build a parameter from the tokens between two commas.
///
/// The last identifier is the name, the tokens before it the type, the
/// tokens after it the array suffix. Anything else yields `None`.
fn parameter_from(segment: &[Token]) -> Option<Parameter> {
    let name_idx = segment
        .iter()
        .rposition(|t| t.kind == TokenKind::Identifier)?;
    if name_idx == 0 {
        return None;
    }

    let (type_tokens, suffix) = (&segment[..name_idx], &segment[name_idx + 1..]);
    let type_ok = type_tokens.iter().all(|t| {
        matches!(t.kind, TokenKind::Keyword | TokenKind::Identifier) || t.is_operator("*")
    });
    let suffix_ok = suffix.iter().all(|t| {
        t.is_delimiter("[") || t.is_delimiter("]") || t.kind == TokenKind::Number
    });
    if !type_ok || !suffix_ok {
        return None;
    }

    Some(Parameter {
        param_type: join_type(type_tokens),
        name: segment[name_idx].lexeme.clone(),
        suffix: suffix.iter().map(|t| t.lexeme.as_str()).collect(),
    })
}

/// Join type tokens, attaching `*` to the preceding word: `const char*`.
pub fn join_type(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() && !token.is_operator("*") {
            out.push(' ');
        }
        out.push_str(&token.lexeme);
    }
    out
}

/// Reassemble tokens into text that follows their original layout.
///
/// Tokens on the same line are separated by one space when the source had a
/// gap between them; a token on a later line starts a new line indented to its
/// original column. At most one blank line is kept between tokens.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = prev {
            let prev_end_line = prev.line + prev.lexeme.matches('\n').count();
            if token.line > prev_end_line {
                let breaks = (token.line - prev_end_line).min(2);
                out.push_str(&"\n".repeat(breaks));
                out.push_str(&" ".repeat(token.column.saturating_sub(1)));
            } else if token.column > prev.end_column() {
                out.push(' ');
            }
        }
        out.push_str(&token.lexeme);
        prev = Some(token);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function<'a>(program: &'a Program, name: &str) -> &'a Function {
        program
            .functions()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("function {} not parsed", name))
    }

    #[test]
    fn test_empty_token_sequence() {
        let program = parse(Vec::new());
        assert!(program.is_empty());
        assert_eq!(program.coverage(), Coverage::default());
    }

    #[test]
    fn test_includes_and_defines_in_order() {
        let program = parse_source(
            "#include <stdio.h>\n#define MAX_SIZE 100\n#include \"util.h\"\n#define MIN 1\n",
        );

        let headers: Vec<&str> = program.includes().map(|i| i.header.as_str()).collect();
        assert_eq!(headers, ["<stdio.h>", "\"util.h\""]);
        let defines: Vec<&str> = program.defines().collect();
        assert_eq!(defines, ["#define MAX_SIZE 100", "#define MIN 1"]);
        assert!(program.coverage().is_complete());
    }

    #[test]
    fn test_function_signature_and_body() {
        let program = parse_source(
            r#"
            int add(int a, const char *name, int values[]) {
                int total;
                float ratio = 0.5;
                return a + 1;
            }
            "#,
        );

        let add = function(&program, "add");
        assert_eq!(add.return_type, "int");
        assert_eq!(add.params.len(), 3);
        assert_eq!(add.params[0].param_type, "int");
        assert_eq!(add.params[0].name, "a");
        assert_eq!(add.params[1].param_type, "const char*");
        assert_eq!(add.params[1].name, "name");
        assert_eq!(add.params[2].suffix, "[]");
        assert_eq!(
            add.body,
            vec![
                Statement::VariableDeclaration {
                    var_type: "int".into(),
                    name: "total".into(),
                    init: None,
                },
                Statement::VariableDeclaration {
                    var_type: "float".into(),
                    name: "ratio".into(),
                    init: Some("0.5".into()),
                },
                Statement::ReturnStatement {
                    value: Some("a + 1".into()),
                },
            ]
        );
    }

    #[test]
    fn test_void_parameter_list() {
        let program = parse_source("void run(void) { return; }");

        let run = function(&program, "run");
        assert!(run.params.is_empty());
        assert_eq!(run.body, vec![Statement::ReturnStatement { value: None }]);
    }

    #[test]
    fn test_nested_block_does_not_end_function() {
        let program = parse_source(
            r#"
            int check(int x) {
                if (x > 0) {
                    x = x - 1;
                }
                int after;
                return x;
            }
            int second() { return 2; }
            "#,
        );

        let check = function(&program, "check");
        assert_eq!(check.body.len(), 3);
        assert!(matches!(&check.body[0], Statement::Verbatim(v) if v.text.starts_with("if (x > 0) {")));
        assert!(matches!(
            &check.body[1],
            Statement::VariableDeclaration { name, .. } if name == "after"
        ));
        assert!(matches!(
            &check.body[2],
            Statement::ReturnStatement { value: Some(v) } if v == "x"
        ));
        assert_eq!(function(&program, "second").body.len(), 1);
    }

    #[test]
    fn test_deeply_nested_blocks() {
        let program = parse_source(
            "int f() { while (1) { if (a) { b(); } else { c(); } } return 0; }",
        );

        let f = function(&program, "f");
        assert!(matches!(
            f.body.last(),
            Some(Statement::ReturnStatement { value: Some(v) }) if v == "0"
        ));
    }

    #[test]
    fn test_malformed_parameters_terminate() {
        let program = parse_source("int f(int, , char) { return 1; }");
        assert_eq!(program.functions().count(), 0);
        assert!(!program.coverage().is_complete());

        let program = parse_source("int g(int a");
        assert_eq!(program.functions().count(), 0);
        assert_eq!(program.coverage().verbatim, 1);
    }

    #[test]
    fn test_unsupported_parameters_keep_function_verbatim() {
        for source in [
            "int sum(int n, ...) {\n    return n;\n}",
            "void apply(int (*fn)(int), int x) { return; }",
            "int first(int) { return 0; }",
        ] {
            let program = parse_source(source);
            assert_eq!(program.functions().count(), 0, "{}", source);
            assert!(!program.coverage().is_complete());
        }

        let program = parse_source("int sum(int n, ...) {\n    return n;\n}");
        assert!(matches!(
            &program.items[0],
            Item::Verbatim(v) if v.text.starts_with("int sum(int n, ...)")
        ));
    }

    #[test]
    fn test_prototype_is_kept_verbatim() {
        let program = parse_source("int square(int x);\nint main() { return 0; }");

        assert!(matches!(&program.items[0], Item::Verbatim(v) if v.text == "int square(int x);"));
        assert_eq!(function(&program, "main").name, "main");
    }

    #[test]
    fn test_struct_definition_is_verbatim() {
        let program = parse_source("struct Point {\n    int x;\n    int y;\n};\n");

        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            Item::Verbatim(v) => {
                assert_eq!(v.text, "struct Point {\n    int x;\n    int y;\n};");
                assert_eq!(v.location, SourceLocation::new(1, 1));
            }
            other => panic!("expected verbatim, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_return_type() {
        let program = parse_source("char *name() { return \"x\"; }");
        assert_eq!(function(&program, "name").return_type, "char*");
    }

    #[test]
    fn test_unterminated_body_still_yields_function() {
        let program = parse_source("int main() { int x; printf(\"hi\");");

        let main = function(&program, "main");
        assert_eq!(main.body.len(), 2);
    }

    #[test]
    fn test_garbage_input_terminates() {
        let program = parse_source("} } ) ( ; int int ( { @ # $ return");
        assert!(program.functions().count() <= 1);
        assert!(!program.is_empty());
    }

    #[test]
    fn test_render_tokens_keeps_layout() {
        let tokens = tokenize("if (a) {\n    b = 1;\n}");
        assert_eq!(render_tokens(&tokens), "if (a) {\n    b = 1;\n}");
    }
}
