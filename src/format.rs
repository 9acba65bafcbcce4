//! Positional placeholder substitution
//!
//! Templates use `{0}`, `{1}`, ... for arguments and `{{` / `}}` for literal
//! braces. A placeholder whose index has no argument is left as written, so a
//! bad template never stops a string from being displayed.

use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::OnceLock;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{|\}\}|\{(\d+)\}").expect("placeholder pattern is valid"))
}

/// Substitute positional arguments into `template`
pub fn format_positional<T: Display>(template: &str, args: &[T]) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| match &caps[0] {
            "{{" => "{".to_string(),
            "}}" => "}".to_string(),
            whole => caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| whole.to_string()),
        })
        .into_owned()
}
