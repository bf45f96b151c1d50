// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Concrete topology entity kinds and their operator tables.
// Author: Lukas Bower

//! Concrete topology entity kinds and their operator tables.

use core::fmt;
use std::fs::File;

use crate::endpoint::{Endpoint, Link};
use crate::error::ErrorKind;
use crate::factory::Factory;
use crate::node::NodeId;
use crate::operator::Operator;

/// MAC address assigned to NICs created without one.
pub const DEFAULT_MAC: &str = "52:54:00:0d:ae:36";

const SHELL_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Help,
    Operator::Quit,
];
const FACTORY_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Create,
];
const CONTAINER_OPERATORS: &[Operator] = &[Operator::Label, Operator::List, Operator::Destroy];
const NIC_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Mac,
    Operator::Peer,
];
const DISK_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::File,
];
const PORT_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Peer,
];
const WIRE_OPERATORS: &[Operator] = &[
    Operator::Label,
    Operator::List,
    Operator::Destroy,
    Operator::Attach,
    Operator::Connect,
    Operator::Disconnect,
    Operator::Endpoints,
];

/// Concrete kind of a node in the topology tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EntityKind {
    /// Root shell.
    Shell,
    /// Child factory.
    Factory,
    /// Virtual machine.
    Vm,
    /// Network interface.
    Nic,
    /// Disk image.
    Disk,
    /// Virtual switch.
    Switch,
    /// Switch port.
    Port,
    /// Link between two endpoints.
    Wire,
}

/// Every kind, in canonical order.
pub const ALL_KINDS: [EntityKind; 8] = [
    EntityKind::Shell,
    EntityKind::Factory,
    EntityKind::Vm,
    EntityKind::Nic,
    EntityKind::Disk,
    EntityKind::Switch,
    EntityKind::Port,
    EntityKind::Wire,
];

impl EntityKind {
    /// Lower-case name used in displays and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Factory => "factory",
            Self::Vm => "vm",
            Self::Nic => "nic",
            Self::Disk => "disk",
            Self::Switch => "switch",
            Self::Port => "port",
            Self::Wire => "wire",
        }
    }

    /// Dispatch table for the kind.
    #[must_use]
    pub const fn operators(self) -> &'static [Operator] {
        match self {
            Self::Shell => SHELL_OPERATORS,
            Self::Factory => FACTORY_OPERATORS,
            Self::Vm | Self::Switch => CONTAINER_OPERATORS,
            Self::Nic => NIC_OPERATORS,
            Self::Disk => DISK_OPERATORS,
            Self::Port => PORT_OPERATORS,
            Self::Wire => WIRE_OPERATORS,
        }
    }

    /// True when the kind supports `op`.
    #[must_use]
    pub fn supports(self, op: Operator) -> bool {
        self.operators().contains(&op)
    }

    /// Factories pre-registered under every node of this kind.
    #[must_use]
    pub const fn child_factories(self) -> &'static [(&'static str, EntityKind)] {
        match self {
            Self::Shell => &[
                ("vm", EntityKind::Vm),
                ("switch", EntityKind::Switch),
                ("wire", EntityKind::Wire),
            ],
            Self::Vm => &[("nic", EntityKind::Nic), ("disk", EntityKind::Disk)],
            Self::Switch => &[("port", EntityKind::Port)],
            Self::Factory | Self::Nic | Self::Disk | Self::Port | Self::Wire => &[],
        }
    }

    /// Constructor arguments a factory passes on after the id.
    #[must_use]
    pub const fn constructor_args(self) -> usize {
        match self {
            Self::Nic | Self::Disk => 1,
            _ => 0,
        }
    }

    /// Built-in kinds refuse `destroy`.
    #[must_use]
    pub const fn is_builtin(self) -> bool {
        matches!(self, Self::Shell | Self::Factory)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Network interface attached to a VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nic {
    mac: String,
    link: Link,
}

impl Nic {
    /// Construct a NIC with the supplied MAC address.
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            link: Link::default(),
        }
    }

    /// MAC address of the interface.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }
}

impl Endpoint for Nic {
    fn endpoint_kind(&self) -> EntityKind {
        EntityKind::Nic
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

/// Disk image backed by a host file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    file: String,
}

impl Disk {
    /// Validate that `path` can be opened for reading and wrap it.
    ///
    /// The check runs once, at creation; the file is not watched afterwards.
    pub fn open(path: &str) -> Result<Self, ErrorKind> {
        File::open(path).map_err(|err| ErrorKind::UnreadableFile {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            file: path.to_owned(),
        })
    }

    /// Host path of the backing file.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }
}

/// Switch port.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Port {
    link: Link,
}

impl Endpoint for Port {
    fn endpoint_kind(&self) -> EntityKind {
        EntityKind::Port
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

/// Wire joining two endpoints.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Wire {
    endpoints: Option<(NodeId, NodeId)>,
}

impl Wire {
    /// Connected pair, if any.
    #[must_use]
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        self.endpoints
    }

    /// True when the wire holds `id` as one of its ends.
    #[must_use]
    pub fn touches(&self, id: NodeId) -> bool {
        matches!(self.endpoints, Some((a, b)) if a == id || b == id)
    }

    pub(crate) fn set_endpoints(&mut self, pair: (NodeId, NodeId)) {
        self.endpoints = Some(pair);
    }

    pub(crate) fn take_endpoints(&mut self) -> Option<(NodeId, NodeId)> {
        self.endpoints.take()
    }
}

/// Kind-specific payload carried by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// Root shell.
    Shell,
    /// Child factory.
    Factory(Factory),
    /// Virtual machine.
    Vm,
    /// Network interface.
    Nic(Nic),
    /// Disk image.
    Disk(Disk),
    /// Virtual switch.
    Switch,
    /// Switch port.
    Port(Port),
    /// Wire.
    Wire(Wire),
}

impl Entity {
    /// Build a product of a factory from its constructor arguments.
    pub fn construct(kind: EntityKind, args: &[&str], default_mac: &str) -> Result<Self, ErrorKind> {
        match kind {
            EntityKind::Vm => Ok(Self::Vm),
            EntityKind::Nic => Ok(Self::Nic(Nic::new(
                args.first().copied().unwrap_or(default_mac),
            ))),
            EntityKind::Disk => {
                let path = args.first().ok_or(ErrorKind::MissingArgument("file"))?;
                Disk::open(path).map(Self::Disk)
            }
            EntityKind::Switch => Ok(Self::Switch),
            EntityKind::Port => Ok(Self::Port(Port::default())),
            EntityKind::Wire => Ok(Self::Wire(Wire::default())),
            EntityKind::Shell | EntityKind::Factory => Err(ErrorKind::Internal(format!(
                "{kind} cannot be manufactured"
            ))),
        }
    }

    /// Concrete kind of the payload.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Shell => EntityKind::Shell,
            Self::Factory(_) => EntityKind::Factory,
            Self::Vm => EntityKind::Vm,
            Self::Nic(_) => EntityKind::Nic,
            Self::Disk(_) => EntityKind::Disk,
            Self::Switch => EntityKind::Switch,
            Self::Port(_) => EntityKind::Port,
            Self::Wire(_) => EntityKind::Wire,
        }
    }

    /// Endpoint view, when the kind can be wired.
    #[must_use]
    pub fn as_endpoint(&self) -> Option<&dyn Endpoint> {
        match self {
            Self::Nic(nic) => Some(nic),
            Self::Port(port) => Some(port),
            _ => None,
        }
    }

    /// Mutable endpoint view, when the kind can be wired.
    pub fn as_endpoint_mut(&mut self) -> Option<&mut dyn Endpoint> {
        match self {
            Self::Nic(nic) => Some(nic),
            Self::Port(port) => Some(port),
            _ => None,
        }
    }

    /// Render the node for shell output.
    #[must_use]
    pub fn display(&self, label: &str) -> String {
        match self {
            Self::Vm => format!("vm/{label}"),
            Self::Nic(nic) => format!("nic/{label}: {}", nic.mac()),
            Self::Disk(disk) => format!("disk/{label}: {}", disk.file()),
            _ => label.to_owned(),
        }
    }
}
