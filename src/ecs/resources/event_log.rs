use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::time::SimTime;

/// Kind tag for externally observable simulation occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimEventKind {
    AlertnessChanged,
    GlobalAlertChanged,
    Sighting,
    NoiseEmitted,
    UnitSpawned,
    UnitDespawned,
    GateLock,
    CitizenFled,
    MemoryShared,
}

/// One timestamped record with a free-form JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub id: u64,
    pub kind: SimEventKind,
    pub timestamp: SimTime,
    pub description: String,
    pub data: serde_json::Value,
}

/// Accumulates simulation events for host tooling and tests.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
    next_id: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: SimEventKind,
        timestamp: SimTime,
        description: impl Into<String>,
        data: serde_json::Value,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(SimEvent {
            id,
            kind,
            timestamp,
            description: description.into(),
            data,
        });
        id
    }

    pub fn of_kind(&self, kind: SimEventKind) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn count_of(&self, kind: SimEventKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
