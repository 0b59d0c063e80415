// AST (Abstract Syntax Tree) definitions for the C to C++ transpiler

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// `#include` directive; `header` keeps its delimiters (`<stdio.h>`, `"a.h"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub header: String,
    pub location: SourceLocation,
}

impl Include {
    /// True for `<...>` system headers.
    pub fn is_system(&self) -> bool {
        self.header.starts_with('<')
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub param_type: String,
    pub name: String,
    /// Declarator tokens after the name, e.g. `[]`
    pub suffix: String,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

/// Statements the parser understands inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    VariableDeclaration {
        var_type: String,
        name: String,
        init: Option<String>,
    },
    ReturnStatement {
        value: Option<String>,
    },
    /// Anything else, kept as its original text.
    Verbatim(Verbatim),
}

/// A token range the parser did not recognize, carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verbatim {
    pub text: String,
    pub location: SourceLocation,
}

/// Top-level item, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Include(Include),
    /// Raw `#define` text, unstructured
    Define(String),
    Function(Function),
    Verbatim(Verbatim),
}

/// How much of a program the parser captured structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coverage {
    pub structured: usize,
    pub verbatim: usize,
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        self.verbatim == 0
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn includes(&self) -> impl Iterator<Item = &Include> {
        self.items.iter().filter_map(|item| match item {
            Item::Include(include) => Some(include),
            _ => None,
        })
    }

    pub fn defines(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Item::Define(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            _ => None,
        })
    }

    /// Count structured versus verbatim nodes, including function bodies.
    pub fn coverage(&self) -> Coverage {
        let mut coverage = Coverage::default();
        for item in &self.items {
            match item {
                Item::Verbatim(_) => coverage.verbatim += 1,
                Item::Function(function) => {
                    coverage.structured += 1;
                    for statement in &function.body {
                        match statement {
                            Statement::Verbatim(_) => coverage.verbatim += 1,
                            _ => coverage.structured += 1,
                        }
                    }
                }
                Item::Include(_) | Item::Define(_) => coverage.structured += 1,
            }
        }
        coverage
    }
}
