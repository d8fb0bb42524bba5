//! Command-tree resolution.
//!
//! Walks input tokens down the tree while each one names a child of the
//! current command. Matching is greedy and never backtracks: a positional
//! value that happens to equal a child name selects that child.

use tracing::debug;

use crate::types::Command;

/// Result of walking tokens down a command tree.
#[derive(Debug, Clone)]
pub struct Resolution<'a, 't, S> {
    /// Deepest command addressed by the tokens.
    pub command: &'a Command,
    /// Command names from the root down to `command`, root included.
    pub path: Vec<&'a str>,
    /// Tokens left after the last consumed command name.
    pub remaining: &'t [S],
}

/// Finds the deepest command addressed by a prefix of `tokens`.
///
/// Never fails: if the first token names no child, the root is returned with
/// every token remaining.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Command, resolve};
///
/// let loud = Command::builder("loud").build().unwrap();
/// let say = Command::builder("say").add_subcommand(loud).build().unwrap();
/// let root = Command::builder("app").add_subcommand(say).build().unwrap();
///
/// let r = resolve(&root, &["say", "loud", "x"]);
/// assert_eq!(r.command.name(), "loud");
/// assert_eq!(r.path, vec!["app", "say", "loud"]);
/// assert_eq!(r.remaining, &["x"]);
///
/// let r = resolve(&root, &["say", "unknown", "x"]);
/// assert_eq!(r.command.name(), "say");
/// assert_eq!(r.remaining, &["unknown", "x"]);
/// ```
pub fn resolve<'a, 't, S: AsRef<str>>(root: &'a Command, tokens: &'t [S]) -> Resolution<'a, 't, S> {
    let mut command = root;
    let mut path = vec![root.name()];
    let mut consumed = 0;

    for token in tokens {
        let Some(child) = command.subcommand(token.as_ref()) else {
            break;
        };
        debug!(parent = command.name(), child = child.name(), "descending into subcommand");
        command = child;
        path.push(child.name());
        consumed += 1;
    }

    Resolution {
        command,
        path,
        remaining: &tokens[consumed..],
    }
}
