//! Extraction of the exported config object from source text.
//!
//! The file is parsed with oxc and walked as an AST. Nothing in the file is
//! ever evaluated: literals become [`ConfigValue`]s, every other expression
//! is kept as its source text.

use std::ops::Range;
use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpressionElement, AssignmentTarget, BindingPatternKind, Declaration, Expression,
    ObjectExpression, ObjectPropertyKind, Program, PropertyKey, PropertyKind, Statement,
    VariableDeclaration,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::error::ConfigError;
use crate::value::{ConfigValue, Object};

/// How identifiers may be chased back to their declarations.
const MAX_BINDING_DEPTH: usize = 8;

/// How the config file exposes its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// `export default { ... }`
    EsModule,
    /// `module.exports = { ... }`
    CommonJs,
}

impl std::fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleFormat::EsModule => f.write_str("export default"),
            ModuleFormat::CommonJs => f.write_str("module.exports"),
        }
    }
}

/// Source language of the config file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFlavor {
    TypeScript,
    JavaScript,
}

impl ConfigFlavor {
    /// Pick the flavor for a config path.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => ConfigFlavor::TypeScript,
            _ => ConfigFlavor::JavaScript,
        }
    }

    fn source_type(self) -> SourceType {
        match self {
            ConfigFlavor::TypeScript => SourceType::ts(),
            ConfigFlavor::JavaScript => SourceType::mjs(),
        }
    }
}

/// The exported config object and where it sits in the source.
#[derive(Debug, Clone)]
pub struct ExtractedConfig {
    /// Export style the file uses
    pub format: ModuleFormat,

    /// The object literal, as data
    pub object: Object,

    /// Byte range of the object literal in the source text
    pub span: Range<usize>,
}

/// Parse `source` and isolate its exported config object.
///
/// Accepts `export default <object>` and `module.exports = <object>`, where
/// the object may be wrapped in parentheses, `satisfies T` or `as T`, or be
/// an identifier bound to an object by a top-level declaration.
pub fn extract_config(source: &str, flavor: ConfigFlavor) -> Result<ExtractedConfig, ConfigError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, flavor.source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(ConfigError::parse("<source>", format!("syntax error: {}", message)));
    }

    let program = &ret.program;
    let (format, exported) = find_export(program, source)?;

    let Some(object) = resolve_object(program, exported, 0) else {
        return Err(ConfigError::parse(
            "<source>",
            format!(
                "{} at {} is not an object literal",
                format,
                line_col(source, exported.span())
            ),
        ));
    };

    tracing::debug!(
        "Found {} config object at {}",
        format,
        line_col(source, object.span)
    );

    Ok(ExtractedConfig {
        format,
        object: convert_object(object, source),
        span: object.span.start as usize..object.span.end as usize,
    })
}

/// Locate the exported expression. The last export assignment wins.
fn find_export<'b, 'a>(
    program: &'b Program<'a>,
    source: &str,
) -> Result<(ModuleFormat, &'b Expression<'a>), ConfigError> {
    let mut found = None;

    for stmt in &program.body {
        match stmt {
            Statement::ExportDefaultDeclaration(decl) => match decl.declaration.as_expression() {
                Some(expr) => found = Some((ModuleFormat::EsModule, expr)),
                None => {
                    return Err(ConfigError::parse(
                        "<source>",
                        format!(
                            "export default at {} is a declaration, not a config object",
                            line_col(source, decl.span)
                        ),
                    ))
                }
            },
            Statement::ExpressionStatement(stmt) => {
                if let Expression::AssignmentExpression(assign) = &stmt.expression {
                    if is_module_exports(&assign.left) {
                        found = Some((ModuleFormat::CommonJs, &assign.right));
                    }
                }
            }
            _ => {}
        }
    }

    found.ok_or_else(|| {
        ConfigError::parse(
            "<source>",
            "no `export default` or `module.exports =` found",
        )
    })
}

fn is_module_exports(target: &AssignmentTarget<'_>) -> bool {
    match target {
        AssignmentTarget::StaticMemberExpression(member) => {
            member.property.name.as_str() == "exports"
                && matches!(&member.object, Expression::Identifier(id) if id.name.as_str() == "module")
        }
        _ => false,
    }
}

/// Unwrap the exported expression down to an object literal.
fn resolve_object<'b, 'a>(
    program: &'b Program<'a>,
    expr: &'b Expression<'a>,
    depth: usize,
) -> Option<&'b ObjectExpression<'a>> {
    if depth > MAX_BINDING_DEPTH {
        return None;
    }

    match expr {
        Expression::ObjectExpression(obj) => Some(&**obj),
        Expression::ParenthesizedExpression(paren) => {
            resolve_object(program, &paren.expression, depth)
        }
        Expression::TSSatisfiesExpression(satisfies) => {
            resolve_object(program, &satisfies.expression, depth)
        }
        Expression::TSAsExpression(cast) => resolve_object(program, &cast.expression, depth),
        Expression::Identifier(ident) => {
            let init = find_binding(program, ident.name.as_str())?;
            resolve_object(program, init, depth + 1)
        }
        _ => None,
    }
}

/// Find the initializer of a top-level `const`/`let`/`var` binding,
/// exported or not.
fn find_binding<'b, 'a>(program: &'b Program<'a>, name: &str) -> Option<&'b Expression<'a>> {
    program.body.iter().find_map(|stmt| match stmt {
        Statement::VariableDeclaration(decl) => binding_init(decl, name),
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => binding_init(decl, name),
            _ => None,
        },
        _ => None,
    })
}

fn binding_init<'b, 'a>(
    decl: &'b VariableDeclaration<'a>,
    name: &str,
) -> Option<&'b Expression<'a>> {
    decl.declarations
        .iter()
        .find_map(|declarator| match &declarator.id.kind {
            BindingPatternKind::BindingIdentifier(ident) if ident.name.as_str() == name => {
                declarator.init.as_ref()
            }
            _ => None,
        })
}

fn convert_object(obj: &ObjectExpression<'_>, source: &str) -> Object {
    let mut object = Object::new();

    for member in &obj.properties {
        match member {
            ObjectPropertyKind::ObjectProperty(prop) => {
                let plain = !prop.computed
                    && !prop.shorthand
                    && !prop.method
                    && matches!(prop.kind, PropertyKind::Init);

                match static_key(&prop.key).filter(|_| plain) {
                    Some(key) => object.push_property(key, convert_expression(&prop.value, source)),
                    None => object.push_verbatim(text(source, prop.span)),
                }
            }
            ObjectPropertyKind::SpreadProperty(spread) => {
                object.push_verbatim(text(source, spread.span));
            }
        }
    }

    object
}

fn static_key(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::StringLiteral(lit) if !lit.lone_surrogates => Some(lit.value.to_string()),
        PropertyKey::NumericLiteral(lit) => numeric_key(lit.value),
        _ => None,
    }
}

/// Property name of a numeric key, as JavaScript would stringify it.
///
/// Only the range where that matches Rust's shortest float formatting is
/// accepted; other numeric keys are kept verbatim.
fn numeric_key(value: f64) -> Option<String> {
    let in_plain_range = value == 0.0 || (1e-6..1e21).contains(&value);
    (value.is_finite() && in_plain_range).then(|| format!("{}", value))
}

fn convert_expression(expr: &Expression<'_>, source: &str) -> ConfigValue {
    match expr {
        Expression::NullLiteral(_) => ConfigValue::Null,
        Expression::BooleanLiteral(lit) => ConfigValue::Bool(lit.value),
        Expression::NumericLiteral(lit) => ConfigValue::Number(text(source, lit.span)),
        Expression::StringLiteral(lit) if !lit.lone_surrogates => {
            ConfigValue::String(lit.value.to_string())
        }
        Expression::ArrayExpression(array) => ConfigValue::Array(
            array
                .elements
                .iter()
                .map(|element| convert_element(element, source))
                .collect(),
        ),
        Expression::ObjectExpression(obj) => ConfigValue::Object(convert_object(obj, source)),
        other => ConfigValue::Verbatim(text(source, other.span())),
    }
}

fn convert_element(element: &ArrayExpressionElement<'_>, source: &str) -> ConfigValue {
    match element {
        ArrayExpressionElement::SpreadElement(spread) => {
            ConfigValue::Verbatim(text(source, spread.span))
        }
        ArrayExpressionElement::Elision(_) => ConfigValue::Verbatim(String::new()),
        other => match other.as_expression() {
            Some(expr) => convert_expression(expr, source),
            None => ConfigValue::Verbatim(String::new()),
        },
    }
}

fn text(source: &str, span: Span) -> String {
    span.source_text(source).to_string()
}

/// 1-based `line:column` of a span start, for error messages.
fn line_col(source: &str, span: Span) -> String {
    let offset = (span.start as usize).min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
    format!("{}:{}", line, column)
}
