//! Structural emission: [`Program`] → C++ text
//!
//! Items are written in source order. System includes go through the header
//! table, so `<stdio.h>` comes out as `<iostream>` and `<cstdio>`; everything
//! else is written as parsed. Consecutive preprocessor lines stay together,
//! other items are separated by a blank line, and once `<iostream>` has been
//! emitted a `using namespace std;` line closes the directive block.

use crate::parser::ast::{Function, Include, Item, Parameter, Program, Statement};
use crate::rewrite::headers;

const INDENT: &str = "    ";

/// Emit a whole program. The result always ends with a newline unless the
/// program is empty.
pub fn emit_program(program: &Program) -> String {
    let mut out = String::new();
    let mut prev: Option<&Item> = None;
    let mut iostream = false;
    let mut using_emitted = false;

    for item in &program.items {
        let directive = matches!(item, Item::Include(_) | Item::Define(_));
        if iostream && !using_emitted && !directive {
            out.push_str("\n\nusing namespace std;");
            using_emitted = true;
            prev = None;
        }

        if let Some(prev) = prev {
            let prev_directive = matches!(prev, Item::Include(_) | Item::Define(_));
            out.push_str(if directive && prev_directive { "\n" } else { "\n\n" });
        } else if !out.is_empty() {
            out.push_str("\n\n");
        }

        match item {
            Item::Include(include) => {
                let lines = emit_include(include);
                iostream |= lines.contains("#include <iostream>");
                out.push_str(&lines);
            }
            Item::Define(text) => out.push_str(text),
            Item::Function(function) => out.push_str(&emit_function(function)),
            Item::Verbatim(verbatim) => out.push_str(&verbatim.text),
        }
        prev = Some(item);
    }

    if iostream && !using_emitted {
        out.push_str("\n\nusing namespace std;");
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// One or more `#include` lines for a parsed include.
pub fn emit_include(include: &Include) -> String {
    include
        .header
        .strip_prefix('<')
        .and_then(|h| h.strip_suffix('>'))
        .filter(|_| include.is_system())
        .and_then(headers::mapped_includes)
        .unwrap_or_else(|| format!("#include {}", include.header))
}

pub fn emit_function(function: &Function) -> String {
    let params: Vec<String> = function.params.iter().map(emit_parameter).collect();
    let mut out = format!(
        "{} {}({}) {{\n",
        function.return_type,
        function.name,
        params.join(", ")
    );
    for statement in &function.body {
        out.push_str(INDENT);
        out.push_str(&emit_statement(statement));
        out.push('\n');
    }
    out.push('}');
    out
}

fn emit_parameter(param: &Parameter) -> String {
    format!("{} {}{}", param.param_type, param.name, param.suffix)
}

/// A single statement without leading indentation. Verbatim statements keep
/// the layout of their continuation lines.
pub fn emit_statement(statement: &Statement) -> String {
    match statement {
        Statement::VariableDeclaration {
            var_type,
            name,
            init: Some(init),
        } => format!("{} {} = {};", var_type, name, init),
        Statement::VariableDeclaration {
            var_type,
            name,
            init: None,
        } => format!("{} {};", var_type, name),
        Statement::ReturnStatement { value: Some(value) } => format!("return {};", value),
        Statement::ReturnStatement { value: None } => "return;".to_string(),
        Statement::Verbatim(verbatim) => verbatim.text.clone(),
    }
}
