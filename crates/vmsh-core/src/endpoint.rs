// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Endpoint capability allowing nodes to be paired by a wire.
// Author: Lukas Bower

//! Endpoint capability allowing nodes to be paired by a wire.
//!
//! The capability is independent of the tree: a node kind that can be wired
//! embeds a [`Link`] and implements [`Endpoint`]. Connections are recorded as
//! non-owning [`NodeId`] handles and are made symmetric by the wire, which
//! calls [`Endpoint::connect`] on both sides.

use crate::entity::EntityKind;
use crate::error::ErrorKind;
use crate::node::NodeId;

/// Peer slot held by every endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Link {
    peer: Option<NodeId>,
}

/// Behaviour shared by nodes that can be paired with exactly one peer.
pub trait Endpoint {
    /// Concrete kind used to reject same-kind links.
    fn endpoint_kind(&self) -> EntityKind;

    /// Borrow the peer slot.
    fn link(&self) -> &Link;

    /// Mutably borrow the peer slot.
    fn link_mut(&mut self) -> &mut Link;

    /// Return the connected peer, if any.
    fn peer(&self) -> Option<NodeId> {
        self.link().peer
    }

    /// Point this endpoint at `other`. One-directional; the wire makes it symmetric.
    fn connect(&mut self, other: NodeId, other_kind: EntityKind) -> Result<(), ErrorKind> {
        check_compatible(self.endpoint_kind(), other_kind)?;
        self.link_mut().peer = Some(other);
        Ok(())
    }

    /// Clear this endpoint's peer and return the previous one.
    fn disconnect(&mut self) -> Option<NodeId> {
        self.link_mut().peer.take()
    }
}

/// Endpoints may only be paired with a different concrete kind.
pub fn check_compatible(kind: EntityKind, other: EntityKind) -> Result<(), ErrorKind> {
    if kind == other {
        return Err(ErrorKind::IncompatibleEndpoint(other));
    }
    Ok(())
}
