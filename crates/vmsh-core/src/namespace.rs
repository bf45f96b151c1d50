// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Arena-backed topology namespace with resolution and operator dispatch.
// Author: Lukas Bower

//! Arena-backed topology namespace with resolution and operator dispatch.
//!
//! Nodes live in a single arena keyed by [`NodeId`]. Ownership follows the
//! symbol tables: a node owns the children registered as [`Symbol::Owned`].
//! Parent links, endpoint peers, wire pairs and wire aliases are plain handles
//! and never keep a node alive.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use crate::command::split_path;
use crate::endpoint::{check_compatible, Endpoint};
use crate::entity::{Entity, Wire, ALL_KINDS, DEFAULT_MAC};
use crate::error::{ErrorKind, VmshError};
use crate::factory::Factory;
use crate::node::{validate_label, Node, NodeId, Symbol, SymbolTable};
use crate::operator::Operator;

/// Label given to the root shell unless configured otherwise.
pub const DEFAULT_ROOT_LABEL: &str = "vmsh";

/// Construction-time settings for a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceOptions {
    /// Label of the root shell; leads every breadcrumb.
    pub root_label: String,
    /// MAC assigned to NICs created without one.
    pub default_mac: String,
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_owned(),
            default_mac: DEFAULT_MAC.to_owned(),
        }
    }
}

/// Result of a dispatched operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Nothing to report.
    Unit,
    /// Scalar text.
    Text(String),
    /// A single node.
    Node(NodeId),
    /// A list of nodes.
    Nodes(Vec<NodeId>),
    /// The shell asked to terminate.
    Exit,
}

/// Topology tree rooted at the vmsh shell node.
#[derive(Debug, Clone)]
pub struct Namespace {
    nodes: BTreeMap<NodeId, Node>,
    next_node: u64,
    root: NodeId,
    options: NamespaceOptions,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(NamespaceOptions::default())
    }
}

impl Namespace {
    /// Build a namespace holding the root shell and its `vm`, `switch` and `wire` factories.
    #[must_use]
    pub fn new(options: NamespaceOptions) -> Self {
        let mut namespace = Self {
            nodes: BTreeMap::new(),
            next_node: 0,
            root: NodeId::from_raw(0),
            options,
        };
        let label = namespace.options.root_label.clone();
        namespace.root = namespace.spawn(None, label, Entity::Shell);
        namespace
    }

    /// Settings the namespace was built with.
    #[must_use]
    pub fn options(&self) -> &NamespaceOptions {
        &self.options
    }

    /// Handle of the root shell.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node by handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, factories included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Peer of an endpoint node, if connected.
    #[must_use]
    pub fn peer(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.entity().as_endpoint()?.peer()
    }

    /// Connected pair of a wire node, if any.
    #[must_use]
    pub fn wire_endpoints(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match self.node(id)?.entity() {
            Entity::Wire(wire) => wire.endpoints(),
            _ => None,
        }
    }

    /// Factory payload of a factory node.
    #[must_use]
    pub fn factory(&self, id: NodeId) -> Option<&Factory> {
        match self.node(id)?.entity() {
            Entity::Factory(factory) => Some(factory),
            _ => None,
        }
    }

    /// Register a new owned child under `parent`.
    pub fn register_child(
        &mut self,
        parent: NodeId,
        label: &str,
        entity: Entity,
    ) -> Result<NodeId, VmshError> {
        validate_label(label)?;
        if self.get(parent)?.symbols().contains(label) {
            return Err(ErrorKind::DuplicateSymbol(label.to_owned()).into());
        }
        let child = self.spawn(Some(parent), label.to_owned(), entity);
        self.get_mut(parent)?
            .symbols_mut()
            .register(label, Symbol::Owned(child))?;
        Ok(child)
    }

    /// Resolve `path` left to right starting at `from`.
    ///
    /// Every level prefixes failures with its own label, so the error reads as
    /// a breadcrumb from `from` down to the node that lacked the symbol.
    pub fn resolve(&self, from: NodeId, path: &[&str]) -> Result<NodeId, VmshError> {
        let node = self.get(from)?;
        let Some((head, rest)) = path.split_first() else {
            return Ok(from);
        };
        let result = match node.symbols().lookup(head) {
            Some(symbol) => self.resolve(symbol.target(), rest),
            None => Err(ErrorKind::NoSuchSymbol {
                label: (*head).to_owned(),
                node: node.label().to_owned(),
            }
            .into()),
        };
        result.map_err(|err| err.within(node.label()))
    }

    /// Children of a node, aliases included.
    pub fn list(&self, id: NodeId) -> Result<Vec<NodeId>, VmshError> {
        Ok(self
            .get(id)?
            .symbols()
            .iter()
            .map(|(_, symbol)| symbol.target())
            .collect())
    }

    /// Labels from the root down to `id`, following parent links.
    #[must_use]
    pub fn trail(&self, id: NodeId) -> Vec<String> {
        let mut labels = Vec::new();
        let mut cursor = self.nodes.get(&id);
        while let Some(node) = cursor {
            labels.push(node.label().to_owned());
            cursor = node.parent().and_then(|parent| self.nodes.get(&parent));
        }
        labels.reverse();
        labels
    }

    /// Invoke `operator` on `target`.
    ///
    /// Failures raised here carry the target's breadcrumb; failures that
    /// already hold one (from a nested resolution) pass through untouched.
    ///
    /// The breadcrumb follows the target's owner chain, not the path used to
    /// reach it: an endpoint addressed through a wire alias reports its home
    /// path, such as `vmsh/vm/web1/nic/0`.
    pub fn dispatch(
        &mut self,
        target: NodeId,
        operator: Option<&str>,
        args: &[&str],
    ) -> Result<Value, VmshError> {
        let trail = self.trail(target);
        self.apply(target, operator, args).map_err(|err| {
            if err.trail().next().is_some() {
                err
            } else {
                err.within_path(trail)
            }
        })
    }

    /// Render a value the way the shell prints it, one entry per line.
    #[must_use]
    pub fn render(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Unit | Value::Exit => Vec::new(),
            Value::Text(text) => text.lines().map(str::to_owned).collect(),
            Value::Node(id) => self.node(*id).map(Node::display).into_iter().collect(),
            Value::Nodes(ids) => ids
                .iter()
                .filter_map(|id| self.node(*id))
                .map(Node::display)
                .collect(),
        }
    }

    fn apply(
        &mut self,
        target: NodeId,
        operator: Option<&str>,
        args: &[&str],
    ) -> Result<Value, VmshError> {
        let name = operator
            .filter(|name| !name.is_empty())
            .ok_or(ErrorKind::MissingOperator)?;
        let kind = self.get(target)?.kind();
        let op = Operator::parse(name)
            .filter(|op| kind.supports(*op))
            .ok_or_else(|| ErrorKind::UnknownOperator(name.to_owned()))?;
        if let Some(extra) = op.max_args().and_then(|max| args.get(max)) {
            return Err(ErrorKind::UnexpectedArgument((*extra).to_owned()).into());
        }
        debug!("dispatch {op} on {kind} {target} args={args:?}");
        match op {
            Operator::Label => Ok(Value::Text(self.get(target)?.label().to_owned())),
            Operator::List => self.list(target).map(Value::Nodes),
            Operator::Destroy => self.destroy(target),
            Operator::Create => self.create(target, args).map(Value::Node),
            Operator::Mac => match self.get(target)?.entity() {
                Entity::Nic(nic) => Ok(Value::Text(nic.mac().to_owned())),
                _ => Err(table_mismatch(op, target)),
            },
            Operator::File => match self.get(target)?.entity() {
                Entity::Disk(disk) => Ok(Value::Text(disk.file().to_owned())),
                _ => Err(table_mismatch(op, target)),
            },
            Operator::Peer => Ok(Value::Nodes(self.peer(target).into_iter().collect())),
            Operator::Attach => self.attach(target, args),
            Operator::Connect => self.connect(target, args),
            Operator::Disconnect => self.disconnect(target),
            Operator::Endpoints => Ok(Value::Nodes(
                self.wire(target)?
                    .endpoints()
                    .map(|(a, b)| vec![a, b])
                    .unwrap_or_default(),
            )),
            Operator::Help => Ok(help()),
            Operator::Quit => Ok(Value::Exit),
        }
    }

    fn create(&mut self, factory_id: NodeId, args: &[&str]) -> Result<NodeId, VmshError> {
        let (requested, ctor_args) = match args.split_first() {
            Some((id, rest)) => (Some(*id), rest),
            None => (None, args),
        };
        let factory = match self.get_mut(factory_id)?.entity_mut() {
            Entity::Factory(factory) => factory,
            _ => return Err(table_mismatch(Operator::Create, factory_id)),
        };
        let kind = factory.kind();
        if let Some(extra) = ctor_args.get(kind.constructor_args()) {
            return Err(ErrorKind::UnexpectedArgument((*extra).to_owned()).into());
        }
        if let Some(requested) = requested {
            validate_label(requested)?;
        }
        // The label is issued before construction, so a failed construction
        // still consumes a generated id.
        let label = factory.issue_label(requested);
        let entity = Entity::construct(kind, ctor_args, &self.options.default_mac)?;
        let id = self.register_child(factory_id, &label, entity)?;
        info!("created {kind} {label} ({id})");
        Ok(id)
    }

    fn attach(&mut self, wire_id: NodeId, args: &[&str]) -> Result<Value, VmshError> {
        let address = args.first().ok_or(ErrorKind::MissingArgument("path"))?;
        let path = split_path(address);
        let target = self.resolve(self.root, &path)?;
        let alias = match args.get(1) {
            Some(alias) => (*alias).to_owned(),
            None => path.join("."),
        };
        if alias.is_empty() {
            return Err(ErrorKind::MissingArgument("alias").into());
        }
        self.get_mut(wire_id)?
            .symbols_mut()
            .register(&alias, Symbol::Alias(target))?;
        info!("attached {address} to wire {wire_id} as {alias}");
        Ok(Value::Node(target))
    }

    fn connect(&mut self, wire_id: NodeId, args: &[&str]) -> Result<Value, VmshError> {
        let wire_node = self.get(wire_id)?;
        let mut ends = Vec::with_capacity(2);
        for name in args {
            let symbol = wire_node
                .symbols()
                .lookup(name)
                .ok_or_else(|| ErrorKind::InvalidEndpoint((*name).to_owned()))?;
            let endpoint = self
                .get(symbol.target())?
                .entity()
                .as_endpoint()
                .ok_or_else(|| ErrorKind::NotConnectable((*name).to_owned()))?;
            ends.push((symbol.target(), endpoint.endpoint_kind(), endpoint.peer(), *name));
        }
        let (a, b) = match ends.as_slice() {
            [a, b] => (*a, *b),
            other => return Err(ErrorKind::WrongArity(other.len()).into()),
        };
        check_compatible(a.1, b.1)?;
        if self.wire(wire_id)?.endpoints().is_some() {
            return Err(ErrorKind::AlreadyConnected(wire_node.label().to_owned()).into());
        }
        for (_, _, peer, name) in [a, b] {
            if peer.is_some() {
                return Err(ErrorKind::AlreadyConnected(name.to_owned()).into());
            }
        }
        self.endpoint_mut(a.0)?.connect(b.0, b.1)?;
        self.endpoint_mut(b.0)?.connect(a.0, a.1)?;
        self.wire_mut(wire_id)?.set_endpoints((a.0, b.0));
        info!("wire {wire_id} connected {} <-> {}", a.3, b.3);
        Ok(Value::Nodes(vec![a.0, b.0]))
    }

    fn disconnect(&mut self, wire_id: NodeId) -> Result<Value, VmshError> {
        let Some((a, b)) = self.wire_mut(wire_id)?.take_endpoints() else {
            return Ok(Value::Unit);
        };
        for end in [a, b] {
            if let Some(endpoint) = self
                .nodes
                .get_mut(&end)
                .and_then(|node| node.entity_mut().as_endpoint_mut())
            {
                endpoint.disconnect();
            }
        }
        info!("wire {wire_id} disconnected {a} <-> {b}");
        Ok(Value::Unit)
    }

    fn destroy(&mut self, target: NodeId) -> Result<Value, VmshError> {
        let node = self.get(target)?;
        if node.kind().is_builtin() {
            return Err(ErrorKind::Undestroyable.into());
        }
        let label = node.label().to_owned();
        let doomed = self.subtree(target);
        let severed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(id, node)| match node.entity() {
                Entity::Wire(wire) => {
                    doomed.contains(*id) || doomed.iter().any(|gone| wire.touches(*gone))
                }
                _ => false,
            })
            .map(|(id, _)| *id)
            .collect();
        for wire in severed {
            self.disconnect(wire)?;
        }
        for node in self.nodes.values_mut() {
            node.symbols_mut()
                .retain(|symbol| !doomed.contains(&symbol.target()));
        }
        for id in &doomed {
            self.nodes.remove(id);
        }
        info!("destroyed {label} ({} nodes)", doomed.len());
        Ok(Value::Unit)
    }

    fn subtree(&self, top: NodeId) -> BTreeSet<NodeId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(
                    node.symbols()
                        .iter()
                        .filter(|(_, symbol)| !symbol.is_alias())
                        .map(|(_, symbol)| symbol.target()),
                );
            }
        }
        seen
    }

    fn spawn(&mut self, parent: Option<NodeId>, label: String, entity: Entity) -> NodeId {
        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        let mut symbols = SymbolTable::default();
        for &(name, product) in entity.kind().child_factories() {
            let factory = self.spawn(
                Some(id),
                name.to_owned(),
                Entity::Factory(Factory::new(product)),
            );
            symbols.bind(name, Symbol::Owned(factory));
        }
        self.nodes
            .insert(id, Node::new(label, parent, symbols, entity));
        id
    }

    fn get(&self, id: NodeId) -> Result<&Node, VmshError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| VmshError::internal(format!("dangling node handle {id}")))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, VmshError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| VmshError::internal(format!("dangling node handle {id}")))
    }

    fn wire(&self, id: NodeId) -> Result<&Wire, VmshError> {
        match self.get(id)?.entity() {
            Entity::Wire(wire) => Ok(wire),
            _ => Err(VmshError::internal(format!("{id} is not a wire"))),
        }
    }

    fn wire_mut(&mut self, id: NodeId) -> Result<&mut Wire, VmshError> {
        match self.get_mut(id)?.entity_mut() {
            Entity::Wire(wire) => Ok(wire),
            _ => Err(VmshError::internal(format!("{id} is not a wire"))),
        }
    }

    fn endpoint_mut(&mut self, id: NodeId) -> Result<&mut dyn Endpoint, VmshError> {
        self.get_mut(id)?
            .entity_mut()
            .as_endpoint_mut()
            .ok_or_else(|| VmshError::internal(format!("{id} is not an endpoint")))
    }
}

fn table_mismatch(op: Operator, id: NodeId) -> VmshError {
    VmshError::internal(format!("operator {op} dispatched to incompatible node {id}"))
}

fn help() -> Value {
    let mut lines = vec!["usage: [path/]operator [args...]".to_owned()];
    for kind in ALL_KINDS {
        let usage: Vec<&str> = kind.operators().iter().map(|op| op.usage()).collect();
        lines.push(format!("  {:<8}{}", kind.name(), usage.join(" | ")));
    }
    Value::Text(lines.join("\n"))
}
