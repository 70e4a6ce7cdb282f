//! Canonical document printer.
//!
//! Parse followed by print yields a canonical, whitespace-normalized form:
//! two-space indentation, one selection per line, single spaces between
//! tokens. Fingerprints are derived from this text, so the layout must stay
//! deterministic.

use std::fmt::Write as _;

use crate::ast::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, InlineFragment,
    OperationDefinition, OperationKind, Selection, SelectionSet, Type, Value,
};

/// Render the canonical query text for a document.
#[must_use]
pub fn print(document: &Document) -> String {
    let mut out = String::new();
    for (index, definition) in document.definitions.iter().enumerate() {
        if index > 0 {
            out.push_str("\n\n");
        }
        match definition {
            Definition::Operation(operation) => print_operation(&mut out, operation),
            Definition::Fragment(fragment) => print_fragment(&mut out, fragment),
        }
    }
    out.push('\n');
    out
}

fn print_operation(out: &mut String, operation: &OperationDefinition) {
    let is_shorthand = operation.kind == OperationKind::Query
        && operation.name.is_none()
        && operation.variable_definitions.is_empty()
        && operation.directives.is_empty();

    if !is_shorthand {
        out.push_str(operation.kind.as_str());
        if let Some(name) = &operation.name {
            out.push(' ');
            out.push_str(name);
        }
        if !operation.variable_definitions.is_empty() {
            out.push('(');
            for (index, variable) in operation.variable_definitions.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "${}: ", variable.name);
                print_type(out, &variable.ty);
                if let Some(default) = &variable.default_value {
                    out.push_str(" = ");
                    print_value(out, default);
                }
            }
            out.push(')');
        }
        print_directives(out, &operation.directives);
        out.push(' ');
    }
    print_selection_set(out, &operation.selection_set, 0);
}

fn print_fragment(out: &mut String, fragment: &FragmentDefinition) {
    let _ = write!(out, "fragment {} on {}", fragment.name, fragment.type_condition);
    print_directives(out, &fragment.directives);
    out.push(' ');
    print_selection_set(out, &fragment.selection_set, 0);
}

fn print_selection_set(out: &mut String, set: &SelectionSet, depth: usize) {
    out.push_str("{\n");
    for selection in &set.selections {
        indent(out, depth + 1);
        match selection {
            Selection::Field(field) => print_field(out, field, depth + 1),
            Selection::FragmentSpread(spread) => {
                let _ = write!(out, "...{}", spread.name);
                print_directives(out, &spread.directives);
            }
            Selection::InlineFragment(fragment) => {
                print_inline_fragment(out, fragment, depth + 1);
            }
        }
        out.push('\n');
    }
    indent(out, depth);
    out.push('}');
}

fn print_field(out: &mut String, field: &Field, depth: usize) {
    if let Some(alias) = &field.alias {
        let _ = write!(out, "{alias}: ");
    }
    out.push_str(&field.name);
    print_arguments(out, &field.arguments);
    print_directives(out, &field.directives);
    if !field.selection_set.is_empty() {
        out.push(' ');
        print_selection_set(out, &field.selection_set, depth);
    }
}

fn print_inline_fragment(out: &mut String, fragment: &InlineFragment, depth: usize) {
    out.push_str("...");
    if let Some(type_condition) = &fragment.type_condition {
        let _ = write!(out, " on {type_condition}");
    }
    print_directives(out, &fragment.directives);
    out.push(' ');
    print_selection_set(out, &fragment.selection_set, depth);
}

fn print_arguments(out: &mut String, arguments: &[Argument]) {
    if arguments.is_empty() {
        return;
    }
    out.push('(');
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: ", argument.name);
        print_value(out, &argument.value);
    }
    out.push(')');
}

fn print_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        let _ = write!(out, " @{}", directive.name);
        print_arguments(out, &directive.arguments);
    }
}

fn print_type(out: &mut String, ty: &Type) {
    match ty {
        Type::Named(name) => out.push_str(name),
        Type::List(inner) => {
            out.push('[');
            print_type(out, inner);
            out.push(']');
        }
        Type::NonNull(inner) => {
            print_type(out, inner);
            out.push('!');
        }
    }
}

fn print_value(out: &mut String, value: &Value) {
    match value {
        Value::Variable(name) => {
            let _ = write!(out, "${name}");
        }
        Value::Int(int) => {
            let _ = write!(out, "{int}");
        }
        Value::Float(float) => print_float(out, *float),
        Value::String(string) => {
            // JSON string escaping matches GraphQL string literals.
            let _ = write!(out, "\"{}\"", escape_string(string));
        }
        Value::Boolean(boolean) => {
            let _ = write!(out, "{boolean}");
        }
        Value::Null => out.push_str("null"),
        Value::Enum(name) => out.push_str(name),
        Value::List(values) => {
            out.push('[');
            for (index, item) in values.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                print_value(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (index, (name, item)) in fields.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{name}: ");
                print_value(out, item);
            }
            out.push('}');
        }
    }
}

fn print_float(out: &mut String, value: f64) {
    let mut text = format!("{value}");
    if !text.contains('.') && !text.contains('e') && !text.contains('E') {
        text.push_str(".0");
    }
    out.push_str(&text);
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
