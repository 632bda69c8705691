//! Authority/observer roles and the per-state presence machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the replication boundary a call is made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The side that originates transitions (server or host).
    Authority,
    /// A side that reacts to replicated changes.
    Observer,
}

impl Role {
    /// Map a host callback's `as_server` flag onto a role.
    pub fn from_authority(as_authority: bool) -> Self {
        if as_authority {
            Role::Authority
        } else {
            Role::Observer
        }
    }

    pub fn is_authority(self) -> bool {
        matches!(self, Role::Authority)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Authority => f.write_str("authority"),
            Role::Observer => f.write_str("observer"),
        }
    }
}

/// Which roles currently have a state entered.
///
/// The two per-role flags are modelled as a single value so that the
/// network-level edges (first role in, last role out) are explicit
/// transitions rather than a derived OR of two booleans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Absent,
    AuthorityOnly,
    ObserverOnly,
    Both,
}

/// Network-level edge produced by a presence transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkEdge {
    /// Neither role was entered before; one now is.
    Rising,
    /// One role was entered before; neither now is.
    Falling,
    /// The OR of both roles did not change.
    Unchanged,
}

impl Presence {
    pub fn is_entered(self, role: Role) -> bool {
        match (self, role) {
            (Presence::Both, _) => true,
            (Presence::AuthorityOnly, Role::Authority) => true,
            (Presence::ObserverOnly, Role::Observer) => true,
            _ => false,
        }
    }

    /// Logical OR of both roles.
    pub fn is_network_entered(self) -> bool {
        !matches!(self, Presence::Absent)
    }

    /// Mark `role` as entered.
    ///
    /// Returns `None` when `role` is already entered; the presence is left
    /// untouched in that case.
    pub fn enter(self, role: Role) -> Option<(Presence, NetworkEdge)> {
        let next = match (self, role) {
            (Presence::Absent, Role::Authority) => Presence::AuthorityOnly,
            (Presence::Absent, Role::Observer) => Presence::ObserverOnly,
            (Presence::ObserverOnly, Role::Authority) => Presence::Both,
            (Presence::AuthorityOnly, Role::Observer) => Presence::Both,
            _ => return None,
        };
        Some((next, self.edge_to(next)))
    }

    /// Clear `role`.
    ///
    /// Returns `None` when `role` was not entered.
    pub fn exit(self, role: Role) -> Option<(Presence, NetworkEdge)> {
        let next = match (self, role) {
            (Presence::AuthorityOnly, Role::Authority) => Presence::Absent,
            (Presence::ObserverOnly, Role::Observer) => Presence::Absent,
            (Presence::Both, Role::Authority) => Presence::ObserverOnly,
            (Presence::Both, Role::Observer) => Presence::AuthorityOnly,
            _ => return None,
        };
        Some((next, self.edge_to(next)))
    }

    fn edge_to(self, next: Presence) -> NetworkEdge {
        match (self.is_network_entered(), next.is_network_entered()) {
            (false, true) => NetworkEdge::Rising,
            (true, false) => NetworkEdge::Falling,
            _ => NetworkEdge::Unchanged,
        }
    }
}
