// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Addressable node and symbol table primitives.
// Author: Lukas Bower

//! Addressable node and symbol table primitives.

use core::fmt;
use std::collections::BTreeMap;

use crate::entity::{Entity, EntityKind};
use crate::error::ErrorKind;

/// Handle to a node stored in a [`crate::Namespace`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Construct a handle from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reject labels a `/`-separated path could never reach.
pub fn validate_label(label: &str) -> Result<(), ErrorKind> {
    if label.is_empty() || label.contains('/') {
        return Err(ErrorKind::InvalidLabel(label.to_owned()));
    }
    Ok(())
}

/// Entry in a symbol table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Symbol {
    /// Child owned by the table's node.
    Owned(NodeId),
    /// Non-owning reference to a node owned elsewhere.
    Alias(NodeId),
}

impl Symbol {
    /// Node the entry refers to.
    #[must_use]
    pub fn target(self) -> NodeId {
        match self {
            Self::Owned(id) | Self::Alias(id) => id,
        }
    }

    /// True for non-owning entries.
    #[must_use]
    pub fn is_alias(self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

/// Label to node mapping private to a single node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Register `symbol` under `label`, refusing unaddressable labels and duplicates.
    pub fn register(&mut self, label: &str, symbol: Symbol) -> Result<(), ErrorKind> {
        validate_label(label)?;
        if self.entries.contains_key(label) {
            return Err(ErrorKind::DuplicateSymbol(label.to_owned()));
        }
        self.entries.insert(label.to_owned(), symbol);
        Ok(())
    }

    /// Look up the entry registered under `label`.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<Symbol> {
        self.entries.get(label).copied()
    }

    /// True when `label` is taken.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.entries
            .iter()
            .map(|(label, symbol)| (label.as_str(), *symbol))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert into a table under construction whose labels are known distinct.
    pub(crate) fn bind(&mut self, label: &str, symbol: Symbol) {
        self.entries.insert(label.to_owned(), symbol);
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Symbol) -> bool) {
        self.entries.retain(|_, symbol| keep(*symbol));
    }
}

/// Addressable entity in the topology tree.
#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    parent: Option<NodeId>,
    symbols: SymbolTable,
    entity: Entity,
}

impl Node {
    pub(crate) fn new(
        label: String,
        parent: Option<NodeId>,
        symbols: SymbolTable,
        entity: Entity,
    ) -> Self {
        Self {
            label,
            parent,
            symbols,
            entity,
        }
    }

    /// Label unique among the node's siblings.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Owning node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's symbol table.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Kind-specific payload.
    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub(crate) fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    /// Concrete kind of the node.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    /// Shell rendering of the node.
    #[must_use]
    pub fn display(&self) -> String {
        self.entity.display(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_labels_are_refused() {
        let mut table = SymbolTable::default();
        table
            .register("0", Symbol::Owned(NodeId::from_raw(1)))
            .expect("first registration");
        let err = table
            .register("0", Symbol::Alias(NodeId::from_raw(2)))
            .expect_err("duplicate");
        assert_eq!(err, ErrorKind::DuplicateSymbol("0".to_owned()));
        assert_eq!(table.lookup("0"), Some(Symbol::Owned(NodeId::from_raw(1))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unaddressable_labels_are_refused() {
        let mut table = SymbolTable::default();
        for label in ["a/b", "/", ""] {
            let err = table
                .register(label, Symbol::Alias(NodeId::from_raw(4)))
                .expect_err("unaddressable");
            assert_eq!(err, ErrorKind::InvalidLabel(label.to_owned()));
        }
        assert!(table.is_empty());
        assert_eq!(validate_label("switch.sw0.port.0"), Ok(()));
    }

    #[test]
    fn retain_drops_matching_targets() {
        let mut table = SymbolTable::default();
        table
            .register("a", Symbol::Owned(NodeId::from_raw(1)))
            .expect("a");
        table
            .register("b", Symbol::Alias(NodeId::from_raw(2)))
            .expect("b");
        table.retain(|symbol| symbol.target() != NodeId::from_raw(2));
        assert!(table.contains("a"));
        assert!(!table.contains("b"));
    }
}
