use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MemberState {
    Alive,
    Departed,
}

/// A single member in the cluster.
///
/// Used as a map key and for display by the coordinator; never mutated by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClusterMember {
    pub id: MemberId,
    pub address: IpAddr,
    pub port: u16,
    pub role: String,
    /// Whether the member owns partitions of the cache service.
    pub storage_enabled: bool,
}

impl ClusterMember {
    pub fn storage(id: impl Into<MemberId>, addr: SocketAddr) -> Self {
        Self {
            id: id.into(),
            address: addr.ip(),
            port: addr.port(),
            role: "StorageNode".to_string(),
            storage_enabled: true,
        }
    }

    pub fn client(id: impl Into<MemberId>, addr: SocketAddr) -> Self {
        Self {
            id: id.into(),
            address: addr.ip(),
            port: addr.port(),
            role: "Coordinator".to_string(),
            storage_enabled: false,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClusterMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member(Id={}, Address={}, Role={})",
            self.id,
            self.socket_addr(),
            self.role
        )
    }
}

/// Directory changes published by the membership service. Only departures are
/// announced; joins take effect on the next `storage_members()` read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    Departed(MemberId),
}
