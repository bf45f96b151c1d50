// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Shell command line grammar.
// Author: Lukas Bower

//! Shell command line grammar.
//!
//! A line is `<address> [args...]`. The address is a `/`-separated chain of
//! labels whose final segment names the operator: `vm/create web1`,
//! `vm/web1/nic/0/label`, `quit`. An address without path segments addresses
//! the root shell.

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command<'a> {
    path: Vec<&'a str>,
    operator: Option<&'a str>,
    args: Vec<&'a str>,
}

impl<'a> Command<'a> {
    /// Parse a raw line, returning `None` when it holds no tokens.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let address = tokens.next()?;
        let mut path = split_path(address);
        let operator = path.pop();
        Some(Self {
            path,
            operator,
            args: tokens.collect(),
        })
    }

    /// Labels leading from the root to the target node.
    #[must_use]
    pub fn path(&self) -> &[&'a str] {
        &self.path
    }

    /// Operator keyword, absent for an address such as `/`.
    #[must_use]
    pub fn operator(&self) -> Option<&'a str> {
        self.operator
    }

    /// Positional operator arguments.
    #[must_use]
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }
}

/// Split an address into labels, ignoring empty segments.
#[must_use]
pub fn split_path(address: &str) -> Vec<&str> {
    address
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}
