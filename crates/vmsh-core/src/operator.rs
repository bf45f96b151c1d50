// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Canonical operator inventory and per-kind dispatch tables.
// Author: Lukas Bower

//! Canonical operator inventory and per-kind dispatch tables.

use core::fmt;

/// Canonical list of operators understood by vmsh nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Operator {
    /// `label`
    Label,
    /// `list`
    List,
    /// `destroy`
    Destroy,
    /// `create`
    Create,
    /// `mac`
    Mac,
    /// `file`
    File,
    /// `peer`
    Peer,
    /// `attach`
    Attach,
    /// `connect`
    Connect,
    /// `disconnect`
    Disconnect,
    /// `endpoints`
    Endpoints,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Number of operators known to the engine.
pub const OPERATOR_COUNT: usize = 13;

/// All operators in canonical order.
pub const ALL_OPERATORS: [Operator; OPERATOR_COUNT] = [
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Create,
    Operator::Mac,
    Operator::File,
    Operator::Peer,
    Operator::Attach,
    Operator::Connect,
    Operator::Disconnect,
    Operator::Endpoints,
    Operator::Help,
    Operator::Quit,
];

/// Operators every node carries.
pub const BUILTIN_OPERATORS: [Operator; 3] = [Operator::Label, Operator::List, Operator::Destroy];

impl Operator {
    /// Return the operator keyword.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::List => "list",
            Self::Destroy => "destroy",
            Self::Create => "create",
            Self::Mac => "mac",
            Self::File => "file",
            Self::Peer => "peer",
            Self::Attach => "attach",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Endpoints => "endpoints",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    /// Usage string in the shell grammar, relative to the addressed node.
    #[must_use]
    pub const fn usage(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::List => "list",
            Self::Destroy => "destroy",
            Self::Create => "create [id] [args...]",
            Self::Mac => "mac",
            Self::File => "file",
            Self::Peer => "peer",
            Self::Attach => "attach <path> [alias]",
            Self::Connect => "connect <name> <name>",
            Self::Disconnect => "disconnect",
            Self::Endpoints => "endpoints",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    /// Most positional arguments the operator accepts.
    ///
    /// `None` when the bound depends on the target: `create` takes the
    /// product's constructor arguments and `connect` reports surplus names as
    /// a wrong arity.
    #[must_use]
    pub const fn max_args(self) -> Option<usize> {
        match self {
            Self::Create | Self::Connect => None,
            Self::Attach => Some(2),
            Self::Label
            | Self::List
            | Self::Destroy
            | Self::Mac
            | Self::File
            | Self::Peer
            | Self::Disconnect
            | Self::Endpoints
            | Self::Help
            | Self::Quit => Some(0),
        }
    }

    /// Parse an operator keyword.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        ALL_OPERATORS.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for op in ALL_OPERATORS {
            assert_eq!(Operator::parse(op.name()), Some(op));
        }
    }

    #[test]
    fn argument_bounds() {
        assert_eq!(Operator::Label.max_args(), Some(0));
        assert_eq!(Operator::Attach.max_args(), Some(2));
        assert_eq!(Operator::Create.max_args(), None);
        assert_eq!(Operator::Connect.max_args(), None);
    }

    #[test]
    fn parse_rejects_unknown_and_case_variants() {
        assert_eq!(Operator::parse("Create"), None);
        assert_eq!(Operator::parse(""), None);
        assert_eq!(Operator::parse("rm"), None);
    }
}
