//! Compilation and evaluation of individual rules
//!
//! Every rule is compiled and activated on its own: a fresh CEL context exposes
//! `value` (the attribute named by the rule's key), `pr` (the aggregate
//! record) and the string extension functions. Anything that prevents a rule
//! from producing a boolean is a defect.

use super::string_functions;
use super::{AttributeEnvironment, Disposition, EvaluationOutcome, Rule};
use cel_interpreter::{Context, Program, Value};
use cel_parser::ast::{EntryExpr, Expr, IdedExpr};

const LOG_TARGET: &str = "   rules";

/// Name of the per-rule binding
pub const VALUE_BINDING: &str = "value";

/// Name of the aggregate record binding
pub const PR_BINDING: &str = "pr";

/// Type names that resolve without a declaration
const TYPE_NAMES: [&str; 10] = ["bool", "bytes", "double", "int", "list", "map", "null_type", "string", "type", "uint"];

/// Evaluate a single rule against the bound pull request attributes
#[must_use]
pub fn evaluate(rule: &Rule, env: &AttributeEnvironment) -> EvaluationOutcome {
    let disposition = match evaluate_expression(rule, env) {
        Ok(true) => Disposition::Passed,
        Ok(false) => Disposition::Failed(rule.failure_message()),
        Err(defect) => Disposition::Defect(defect),
    };

    log::debug!(target: LOG_TARGET, "rule '{}': {disposition:?}", rule.key());
    EvaluationOutcome::new(rule.key(), disposition)
}

fn evaluate_expression(rule: &Rule, env: &AttributeEnvironment) -> Result<bool, String> {
    if rule.expression().trim().is_empty() {
        return Err("CEL is empty".to_string());
    }

    let program = compile(rule.expression()).map_err(|e| format!("failed to compile CEL: {e}"))?;
    let context = build_activation(rule.key(), env).map_err(|e| format!("failed to create program: {e}"))?;
    let result = program.execute(&context).map_err(|e| format!("failed to evaluate CEL: {e}"))?;

    match result {
        Value::Bool(b) => Ok(b),
        other => Err(format!("CEL returned non-boolean value: {}", render_value(&other))),
    }
}

/// Parse an expression and check that it only reads declared variables
fn compile(expression: &str) -> Result<Program, String> {
    let program = Program::compile(expression).map_err(|e| e.to_string())?;
    let ast = cel_parser::Parser::default().parse(expression).map_err(|e| e.to_string())?;

    let mut scope = vec![VALUE_BINDING.to_string(), PR_BINDING.to_string()];
    match undeclared_reference(&ast, &mut scope) {
        Some(name) => Err(format!("undeclared reference to '{name}'")),
        None => Ok(program),
    }
}

/// The first identifier that is neither a binding, a type name, nor a comprehension variable in scope
fn undeclared_reference(expr: &IdedExpr, scope: &mut Vec<String>) -> Option<String> {
    match &expr.expr {
        Expr::Ident(name) => {
            let declared = name.starts_with('@') || TYPE_NAMES.contains(&name.as_str()) || scope.contains(name);
            (!declared).then(|| name.clone())
        }
        Expr::Call(call) => call
            .target
            .iter()
            .map(|target| &**target)
            .chain(&call.args)
            .find_map(|arg| undeclared_reference(arg, scope)),
        Expr::Comprehension(comp) => {
            if let Some(name) = undeclared_reference(&comp.iter_range, scope) {
                return Some(name);
            }
            if let Some(name) = undeclared_reference(&comp.accu_init, scope) {
                return Some(name);
            }

            let depth = scope.len();
            scope.push(comp.iter_var.clone());
            scope.extend(comp.iter_var2.clone());
            scope.push(comp.accu_var.clone());
            let found = [&comp.loop_cond, &comp.loop_step, &comp.result]
                .into_iter()
                .find_map(|body| undeclared_reference(body, scope));
            scope.truncate(depth);
            found
        }
        Expr::List(list) => list.elements.iter().find_map(|element| undeclared_reference(element, scope)),
        Expr::Map(map) => map.entries.iter().find_map(|entry| undeclared_in_entry(&entry.expr, scope)),
        Expr::Struct(object) => object.entries.iter().find_map(|entry| undeclared_in_entry(&entry.expr, scope)),
        Expr::Select(select) => undeclared_reference(&select.operand, scope),
        Expr::Literal(_) | Expr::Unspecified => None,
    }
}

fn undeclared_in_entry(entry: &EntryExpr, scope: &mut Vec<String>) -> Option<String> {
    match entry {
        EntryExpr::StructField(field) => undeclared_reference(&field.value, scope),
        EntryExpr::MapEntry(entry) => undeclared_reference(&entry.key, scope).or_else(|| undeclared_reference(&entry.value, scope)),
    }
}

fn build_activation(key: &str, env: &AttributeEnvironment) -> Result<Context<'static>, String> {
    let mut context = Context::default();
    string_functions::register(&mut context);

    context
        .add_variable(VALUE_BINDING, env.value_for(key))
        .map_err(|e| e.to_string())?;
    context.add_variable(PR_BINDING, env.record()).map_err(|e| e.to_string())?;

    Ok(context)
}

/// Plain-text rendering of a CEL value for error messages
///
/// Strings appear without quotes, lists as `[a b]` and maps as `map[k:v]` with sorted keys.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Bytes(bytes) => format!("{bytes:?}").replace(',', ""),
        Value::List(items) => format!("[{}]", items.iter().map(render_value).collect::<Vec<_>>().join(" ")),
        Value::Map(map) => {
            let mut entries: Vec<String> = map
                .map
                .iter()
                .map(|(key, value)| format!("{key}:{}", render_value(value)))
                .collect();
            entries.sort();
            format!("map[{}]", entries.join(" "))
        }
        other => format!("{other:?}"),
    }
}
