//! Help text rendering.
//!
//! Renders the usage line and the argument, option and subcommand listings
//! for one command. Hidden subcommands are never listed; a topic restricts
//! the listing to subcommands tagged with it.

use std::fmt::Write;

use crate::types::{Command, ParamType, Parameter};

/// Renders help for `command`, reached through `path` (root first).
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let say = Command::builder("say")
///     .help("Print the input")
///     .add_parameters([
///         ParameterConfig::positional("input", ParamType::String)
///             .required()
///             .repeatable(0)
///             .with_help("Words to print"),
///         ParameterConfig::flag("repeat-count", ParamType::Number)
///             .with_short("n")
///             .with_default(1),
///     ])
///     .build()
///     .unwrap();
///
/// let help = render_help(&say, &["app", "say"], None);
/// assert!(help.starts_with("Usage: app say [options] <input>...\n"));
/// assert!(help.contains("-n, --repeat-count <number>"));
/// assert!(help.contains("(default: 1)"));
/// ```
pub fn render_help(command: &Command, path: &[&str], topic: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", usage_line(command, path));

    if let Some(help) = command.help() {
        let _ = write!(out, "\n{help}\n");
    }

    let arguments: Vec<(String, String)> = command
        .positionals()
        .map(|param| (positional_usage(param), describe(param)))
        .collect();
    write_section(&mut out, "Arguments", &arguments);

    let options: Vec<(String, String)> = command
        .flags()
        .map(|param| (flag_usage(param), describe(param)))
        .collect();
    write_section(&mut out, "Options", &options);

    let commands: Vec<(String, String)> = listed_subcommands(command, topic)
        .map(|sub| (sub.name().to_string(), sub.help().unwrap_or_default().to_string()))
        .collect();
    write_section(&mut out, "Commands", &commands);

    out
}

fn listed_subcommands<'a>(
    command: &'a Command,
    topic: Option<&'a str>,
) -> impl Iterator<Item = &'a Command> {
    command
        .visible_subcommands()
        .filter(move |sub| topic.is_none_or(|t| sub.has_topic(t)))
}

fn usage_line(command: &Command, path: &[&str]) -> String {
    let mut parts: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    if command.flags().next().is_some() {
        parts.push("[options]".to_string());
    }
    parts.extend(command.positionals().map(positional_usage));
    if command.visible_subcommands().next().is_some() {
        parts.push("<command>".to_string());
    }
    format!("Usage: {}", parts.join(" "))
}

fn positional_usage(param: &Parameter) -> String {
    let ellipsis = if param.is_repeatable() { "..." } else { "" };
    if param.is_required() {
        format!("<{}>{ellipsis}", param.name())
    } else {
        format!("[<{}>{ellipsis}]", param.name())
    }
}

fn flag_usage(param: &Parameter) -> String {
    let mut usage = match (param.short(), param.long()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => param.name().to_string(),
    };
    if param.param_type() != ParamType::Boolean {
        let _ = write!(usage, " <{}>", param.param_type());
    }
    usage
}

fn describe(param: &Parameter) -> String {
    let mut notes: Vec<String> = param.help().map(String::from).into_iter().collect();
    if param.is_required() {
        notes.push("(required)".to_string());
    }
    if !param.is_repeatable() && !param.default().is_null() {
        notes.push(format!("(default: {})", param.default()));
    }
    match param.limit() {
        None => notes.push("(repeatable)".to_string()),
        Some(1) => {}
        Some(n) => notes.push(format!("(up to {n} times)")),
    }
    notes.join(" ")
}

fn write_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    let _ = write!(out, "\n{title}:\n");
    for (left, right) in rows {
        let line = format!("  {left:<width$}  {right}");
        let _ = writeln!(out, "{}", line.trim_end());
    }
}
