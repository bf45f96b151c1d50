// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Root shell evaluator feeding command lines into the namespace.
// Author: Lukas Bower

//! Root shell evaluator feeding command lines into the namespace.

use log::{debug, info};

use crate::command::Command;
use crate::error::VmshError;
use crate::namespace::{Namespace, NamespaceOptions, Value};

/// Owner of the live topology and entry point for command evaluation.
#[derive(Debug, Clone, Default)]
pub struct Vmsh {
    namespace: Namespace,
}

impl Vmsh {
    /// Build a shell with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a shell using the supplied options.
    #[must_use]
    pub fn with_options(options: NamespaceOptions) -> Self {
        Self {
            namespace: Namespace::new(options),
        }
    }

    /// Discard the topology and rebuild a pristine tree with the same options.
    pub fn reset(&mut self) {
        self.namespace = Namespace::new(self.namespace.options().clone());
        info!("topology reset");
    }

    /// Borrow the live namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Evaluate one command line.
    ///
    /// Blank lines evaluate to [`Value::Unit`]. An address without path
    /// segments dispatches on the root shell itself.
    pub fn evaluate(&mut self, line: &str) -> Result<Value, VmshError> {
        let Some(command) = Command::parse(line) else {
            return Ok(Value::Unit);
        };
        debug!("evaluate {line:?}");
        let root = self.namespace.root();
        let target = self.namespace.resolve(root, command.path())?;
        self.namespace
            .dispatch(target, command.operator(), command.args())
    }

    /// Render a value as output lines.
    #[must_use]
    pub fn render(&self, value: &Value) -> Vec<String> {
        self.namespace.render(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_asks_to_exit() {
        let mut shell = Vmsh::new();
        assert_eq!(shell.evaluate("quit"), Ok(Value::Exit));
    }

    #[test]
    fn root_label_and_listing() {
        let mut shell = Vmsh::new();
        let label = shell.evaluate("label").expect("label");
        assert_eq!(shell.render(&label), ["vmsh"]);
        let listing = shell.evaluate("list").expect("list");
        assert_eq!(shell.render(&listing), ["switch", "vm", "wire"]);
    }

    #[test]
    fn reset_restores_pristine_tree() {
        let mut shell = Vmsh::new();
        let pristine = shell.namespace().node_count();
        shell.evaluate("vm/create web1").expect("create");
        assert!(shell.namespace().node_count() > pristine);
        shell.reset();
        assert_eq!(shell.namespace().node_count(), pristine);
        let err = shell.evaluate("vm/web1/label").expect_err("gone");
        assert!(err.to_string().contains("web1"));
    }

    #[test]
    fn options_rename_root() {
        let mut shell = Vmsh::with_options(NamespaceOptions {
            root_label: "lab".to_owned(),
            ..NamespaceOptions::default()
        });
        let err = shell.evaluate("bogus").expect_err("unknown");
        assert_eq!(err.to_string(), "lab: unknown operator 'bogus'");
    }
}
