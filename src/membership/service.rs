use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

use super::types::{ClusterMember, MemberId, MemberState, MembershipEvent};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Read side of the membership directory, as consumed by the coordinator.
pub trait MembershipDirectory: Send + Sync {
    /// Name of the cache service the directory describes.
    fn service_name(&self) -> &str;

    /// Alive members that own storage partitions, sorted by id.
    fn storage_members(&self) -> Vec<ClusterMember>;
}

#[derive(Debug, Clone)]
struct MemberEntry {
    member: ClusterMember,
    state: MemberState,
}

/// In-memory membership directory for one cache service.
pub struct MembershipService {
    service_name: String,
    pub local_member: ClusterMember,
    members: Arc<DashMap<MemberId, MemberEntry>>,
    events: broadcast::Sender<MembershipEvent>,
}

impl MembershipService {
    pub fn new(service_name: impl Into<String>, local_member: ClusterMember) -> Arc<Self> {
        let members = Arc::new(DashMap::new());
        members.insert(
            local_member.id.clone(),
            MemberEntry {
                member: local_member.clone(),
                state: MemberState::Alive,
            },
        );
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Arc::new(Self {
            service_name: service_name.into(),
            local_member,
            members,
            events,
        })
    }

    /// Adds (or revives) a member.
    pub fn join(&self, member: ClusterMember) {
        info!("Member joining service {}: {}", self.service_name, member);

        self.members.insert(
            member.id.clone(),
            MemberEntry {
                member,
                state: MemberState::Alive,
            },
        );

        info!("Cluster size now: {}", self.alive_count());
    }

    /// Marks a member as departed. Returns `false` if it was unknown or already gone.
    pub fn leave(&self, id: &MemberId) -> bool {
        let departed = match self.members.get_mut(id) {
            Some(mut entry) if entry.state == MemberState::Alive => {
                entry.state = MemberState::Departed;
                info!("Member left service {}: {}", self.service_name, entry.member);
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!("Leave for unknown member {}", id);
                false
            }
        };

        if departed {
            // No receivers simply means no fetch is in flight.
            let _ = self.events.send(MembershipEvent::Departed(id.clone()));
        }
        departed
    }

    pub fn get_member(&self, id: &MemberId) -> Option<ClusterMember> {
        self.members.get(id).map(|entry| entry.member.clone())
    }

    pub fn is_alive(&self, id: &MemberId) -> bool {
        self.members
            .get(id)
            .map(|entry| entry.state == MemberState::Alive)
            .unwrap_or(false)
    }

    pub fn get_alive_members(&self) -> Vec<ClusterMember> {
        let mut alive: Vec<ClusterMember> = self
            .members
            .iter()
            .filter(|entry| entry.value().state == MemberState::Alive)
            .map(|entry| entry.value().member.clone())
            .collect();
        alive.sort_by(|a, b| a.id.cmp(&b.id));
        alive
    }

    pub fn alive_count(&self) -> usize {
        self.members
            .iter()
            .filter(|entry| entry.value().state == MemberState::Alive)
            .count()
    }

    /// Subscribes to join/departure events from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }
}

impl MembershipDirectory for MembershipService {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn storage_members(&self) -> Vec<ClusterMember> {
        self.get_alive_members()
            .into_iter()
            .filter(|member| member.storage_enabled)
            .collect()
    }
}
