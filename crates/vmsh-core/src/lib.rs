// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Topology namespace engine behind the vmsh shell.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Topology namespace engine behind the vmsh shell.
//!
//! The engine models virtual machines, NICs, disks, switches, ports and wires
//! as nodes in a path-addressed tree. Every node owns a private symbol table
//! and answers a fixed set of operators; factories manufacture typed children
//! and hand out identifiers; NICs and ports implement the [`Endpoint`]
//! capability so wires can pair them.
//!
//! ```
//! use vmsh_core::{Value, Vmsh};
//!
//! let mut shell = Vmsh::new();
//! shell.evaluate("vm/create web1").unwrap();
//! shell.evaluate("vm/web1/nic/create").unwrap();
//! let label = shell.evaluate("vm/web1/nic/0/label").unwrap();
//! assert_eq!(label, Value::Text("0".to_owned()));
//! ```

pub mod command;
pub mod endpoint;
pub mod entity;
pub mod error;
pub mod factory;
pub mod namespace;
pub mod node;
pub mod operator;
mod shell;

pub use command::Command;
pub use endpoint::{Endpoint, Link};
pub use entity::{Disk, Entity, EntityKind, Nic, Port, Wire, DEFAULT_MAC};
pub use error::{ErrorKind, VmshError};
pub use factory::Factory;
pub use namespace::{Namespace, NamespaceOptions, Value, DEFAULT_ROOT_LABEL};
pub use node::{Node, NodeId, Symbol, SymbolTable};
pub use operator::Operator;
pub use shell::Vmsh;
