// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Error taxonomy surfaced by the vmsh namespace engine.
// Author: Lukas Bower

//! Error taxonomy surfaced by the vmsh namespace engine.
//!
//! Every failure carries an [`ErrorKind`] and a breadcrumb trail. Each level of
//! the tree that passes a failure upwards prepends its own label, so the final
//! message reads from the root down to the node where the failure occurred.

use std::collections::VecDeque;

use thiserror::Error;

use crate::entity::EntityKind;

/// Classification of an engine failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A label is already registered in the target symbol table.
    #[error("duplicate symbol '{0}'")]
    DuplicateSymbol(String),
    /// Path resolution reached a node without the requested child.
    #[error("no such symbol '{label}' in '{node}'")]
    NoSuchSymbol {
        /// Label that could not be found.
        label: String,
        /// Label of the node searched.
        node: String,
    },
    /// The command named no operator.
    #[error("missing operator")]
    MissingOperator,
    /// The operator is not supported by the target node.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    /// A required argument was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    /// A disk image path could not be opened for reading.
    #[error("cannot read '{path}': {reason}")]
    UnreadableFile {
        /// Path supplied by the caller.
        path: String,
        /// Operating system failure description.
        reason: String,
    },
    /// Two endpoints of the same concrete kind were paired.
    #[error("cannot connect {0} to {0}")]
    IncompatibleEndpoint(EntityKind),
    /// A wire was asked to connect a name it does not hold.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    /// A wire was asked to connect a node without endpoint capability.
    #[error("'{0}' is not connectable")]
    NotConnectable(String),
    /// A wire connects exactly two endpoints.
    #[error("a wire connects exactly 2 endpoints, got {0}")]
    WrongArity(usize),
    /// An endpoint or wire already holds a link.
    #[error("'{0}' is already connected")]
    AlreadyConnected(String),
    /// Labels must be non-empty and free of `/` to stay addressable.
    #[error("invalid label '{0}'")]
    InvalidLabel(String),
    /// An operator received more arguments than it accepts.
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    /// Built-in nodes refuse destruction.
    #[error("I cannot be destroyed")]
    Undestroyable,
    /// Engine defect; never caused by user input.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure returned by namespace operations, annotated with a breadcrumb trail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}{}", trail_prefix(.trail), .kind)]
pub struct VmshError {
    kind: ErrorKind,
    trail: VecDeque<String>,
}

impl VmshError {
    /// Construct an error without breadcrumb annotations.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trail: VecDeque::new(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Prefix the breadcrumb with the label of the level re-raising the failure.
    #[must_use]
    pub fn within(mut self, label: &str) -> Self {
        self.trail.push_front(label.to_owned());
        self
    }

    /// Prefix the breadcrumb with a full root-to-node label path.
    #[must_use]
    pub fn within_path<I>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: DoubleEndedIterator,
    {
        labels
            .into_iter()
            .rev()
            .fold(self, |err, label| err.within(&label))
    }

    /// Return the failure classification.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the breadcrumb trail, root first.
    pub fn trail(&self) -> impl Iterator<Item = &str> {
        self.trail.iter().map(String::as_str)
    }

    /// True when the failure signals an engine defect rather than user error.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ErrorKind::Internal(_))
    }
}

impl From<ErrorKind> for VmshError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

fn trail_prefix(trail: &VecDeque<String>) -> String {
    if trail.is_empty() {
        return String::new();
    }
    let mut prefix = trail.iter().cloned().collect::<Vec<_>>().join("/");
    prefix.push_str(": ");
    prefix
}
