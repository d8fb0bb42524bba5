//! Shell completion candidates.

use crate::resolve::resolve;
use crate::types::Command;

/// Lists completions for the last word of `words`.
///
/// The last word is the partial word under the cursor and may be empty. The
/// words before it are resolved against the tree; candidates are the visible
/// children of the resolved command (only while no non-command word has been
/// typed) followed by its flag spellings, all filtered by prefix.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let say = Command::builder("say")
///     .add_parameter(ParameterConfig::flag("repeat-count", ParamType::Number).with_short("n"))
///     .build()
///     .unwrap();
/// let stop = Command::builder("stop").build().unwrap();
/// let root = Command::builder("app").add_subcommands([say, stop]).build().unwrap();
///
/// assert_eq!(complete(&root, &["s"]), vec!["say", "stop"]);
/// assert_eq!(complete(&root, &["say", "--r"]), vec!["--repeat-count"]);
/// assert_eq!(complete(&root, &["say", ""]), vec!["-n", "--repeat-count"]);
/// ```
pub fn complete<S: AsRef<str>>(root: &Command, words: &[S]) -> Vec<String> {
    let (current, preceding) = match words.split_last() {
        Some((last, rest)) => (last.as_ref(), rest),
        None => ("", words),
    };
    let resolution = resolve(root, preceding);
    let command = resolution.command;

    let mut candidates: Vec<String> = Vec::new();
    if resolution.remaining.is_empty() {
        candidates.extend(command.visible_subcommands().map(|c| c.name().to_string()));
    }
    candidates.extend(command.flags().flat_map(|p| p.flag_keys()));

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| c.starts_with(current) && seen.insert(c.clone()));
    candidates
}
