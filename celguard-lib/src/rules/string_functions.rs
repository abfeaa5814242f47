//! String extension functions available to rule expressions
//!
//! These are called as methods on a string (or, for `join`, on a list of
//! strings). Indices count Unicode code points, not bytes.
//!
//! | Function | Result |
//! |----------|--------|
//! | `s.charAt(i)` | The code point at `i`; `""` when `i` equals the length |
//! | `s.indexOf(sub[, offset])` | First index of `sub` at or after `offset`, or `-1` |
//! | `s.lastIndexOf(sub[, offset])` | Last index of `sub` at or before `offset`, or `-1` |
//! | `s.lowerAscii()` / `s.upperAscii()` | `s` with ASCII letters converted |
//! | `s.replace(old, new[, n])` | `s` with the first `n` (default all) occurrences replaced |
//! | `s.split(sep[, n])` | Up to `n` (default all) substrings separated by `sep` |
//! | `s.substring(start[, end])` | The code points in `[start, end)` |
//! | `s.trim()` | `s` without leading and trailing whitespace |
//! | `list.join([sep])` | The strings of `list` joined by `sep` (default `""`) |

use cel_interpreter::extractors::{Arguments, This};
use cel_interpreter::{Context, ExecutionError, FunctionContext, Value};
use std::sync::Arc;

type Result<T, E = ExecutionError> = core::result::Result<T, E>;

/// Register every string extension function on `context`
pub fn register(context: &mut Context<'_>) {
    context.add_function("charAt", char_at);
    context.add_function("indexOf", index_of);
    context.add_function("lastIndexOf", last_index_of);
    context.add_function("lowerAscii", lower_ascii);
    context.add_function("upperAscii", upper_ascii);
    context.add_function("replace", replace);
    context.add_function("split", split);
    context.add_function("substring", substring);
    context.add_function("trim", trim);
    context.add_function("join", join);
}

fn char_at(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 1, 1)?;
    let chars: Vec<char> = this.chars().collect();
    let index = index_arg(ftx, &args[0], chars.len())?;

    Ok(chars.get(index).map_or_else(String::new, char::to_string).into())
}

fn index_of(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 1, 2)?;
    let needle: Vec<char> = string_arg(ftx, &args[0])?.chars().collect();
    let haystack: Vec<char> = this.chars().collect();
    let offset = match args.get(1) {
        Some(arg) => index_arg(ftx, arg, haystack.len())?,
        None => 0,
    };

    let last_start = haystack.len().checked_sub(needle.len());
    let found = last_start.and_then(|last| (offset..=last).find(|&i| haystack[i..i + needle.len()] == *needle));
    position(ftx, found)
}

fn last_index_of(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 1, 2)?;
    let needle: Vec<char> = string_arg(ftx, &args[0])?.chars().collect();
    let haystack: Vec<char> = this.chars().collect();
    let offset = match args.get(1) {
        Some(arg) => index_arg(ftx, arg, haystack.len())?,
        None => haystack.len(),
    };

    let last_start = haystack.len().checked_sub(needle.len());
    let found = last_start.and_then(|last| (0..=offset.min(last)).rev().find(|&i| haystack[i..i + needle.len()] == *needle));
    position(ftx, found)
}

fn lower_ascii(This(this): This<Arc<String>>) -> String {
    this.to_ascii_lowercase()
}

fn upper_ascii(This(this): This<Arc<String>>) -> String {
    this.to_ascii_uppercase()
}

fn replace(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 2, 3)?;
    let from = string_arg(ftx, &args[0])?;
    let to = string_arg(ftx, &args[1])?;

    let replaced = match limit_arg(ftx, args.get(2))? {
        Some(n) => this.replacen(from.as_str(), to.as_str(), n),
        None => this.replace(from.as_str(), to.as_str()),
    };
    Ok(replaced.into())
}

fn split(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 1, 2)?;
    let separator = string_arg(ftx, &args[0])?;
    let limit = limit_arg(ftx, args.get(1))?;

    let parts: Vec<String> = match (separator.is_empty(), limit) {
        (_, Some(0)) => Vec::new(),
        (true, limit) => split_chars(&this, limit),
        (false, Some(n)) => this.splitn(n, separator.as_str()).map(str::to_string).collect(),
        (false, None) => this.split(separator.as_str()).map(str::to_string).collect(),
    };
    Ok(parts.into())
}

fn substring(ftx: &FunctionContext, This(this): This<Arc<String>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 1, 2)?;
    let chars: Vec<char> = this.chars().collect();
    let start = index_arg(ftx, &args[0], chars.len())?;
    let end = match args.get(1) {
        Some(arg) => index_arg(ftx, arg, chars.len())?,
        None => chars.len(),
    };

    if start > end {
        return Err(ftx.error(format!("invalid substring range. start: {start}, end: {end}")));
    }
    Ok(chars[start..end].iter().collect::<String>().into())
}

fn trim(This(this): This<Arc<String>>) -> String {
    this.trim().to_string()
}

fn join(ftx: &FunctionContext, This(this): This<Arc<Vec<Value>>>, Arguments(args): Arguments) -> Result<Value> {
    let args = method_args(ftx, &args, 0, 1)?;
    let separator = match args.first() {
        Some(arg) => string_arg(ftx, arg)?,
        None => Arc::default(),
    };

    let parts = this
        .iter()
        .map(|item| string_arg(ftx, item).map(|s| s.as_str().to_string()))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(separator.as_str()).into())
}

/// The arguments after the receiver, checked against the accepted arity
///
/// When called as a global function the receiver is the first argument.
fn method_args<'a>(ftx: &FunctionContext, args: &'a [Value], min: usize, max: usize) -> Result<&'a [Value]> {
    let args = if ftx.this.is_some() { args } else { args.get(1..).unwrap_or_default() };

    if (min..=max).contains(&args.len()) {
        Ok(args)
    } else {
        Err(ExecutionError::InvalidArgumentCount {
            expected: max,
            actual: args.len(),
        })
    }
}

fn string_arg(ftx: &FunctionContext, value: &Value) -> Result<Arc<String>> {
    match value {
        Value::String(s) => Ok(Arc::clone(s)),
        other => Err(ftx.error(format!("expected a string, got {other:?}"))),
    }
}

/// An index into a sequence of `len` code points; `len` itself is allowed
fn index_arg(ftx: &FunctionContext, value: &Value, len: usize) -> Result<usize> {
    let Value::Int(index) = value else {
        return Err(ftx.error(format!("expected an int, got {value:?}")));
    };

    usize::try_from(*index)
        .ok()
        .filter(|&i| i <= len)
        .ok_or_else(|| ftx.error(format!("index out of range: {index}")))
}

/// An optional count where negative values mean "no limit"
fn limit_arg(ftx: &FunctionContext, value: Option<&Value>) -> Result<Option<usize>> {
    match value {
        None => Ok(None),
        Some(Value::Int(n)) => Ok(usize::try_from(*n).ok()),
        Some(other) => Err(ftx.error(format!("expected an int, got {other:?}"))),
    }
}

fn position(ftx: &FunctionContext, found: Option<usize>) -> Result<Value> {
    found.map_or(Ok(Value::Int(-1)), |i| i64::try_from(i).map(Value::Int).map_err(|e| ftx.error(e)))
}

fn split_chars(text: &str, limit: Option<usize>) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    match limit {
        Some(n) if n < chars.len() => {
            let mut parts: Vec<String> = chars[..n - 1].iter().map(char::to_string).collect();
            parts.push(chars[n - 1..].iter().collect());
            parts
        }
        _ => chars.iter().map(char::to_string).collect(),
    }
}
