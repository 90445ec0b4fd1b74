use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::mem::Discriminant;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;

use super::clock::SimClock;
use super::components::CitizenState;
use super::systems::noise::NoiseLog;
use super::time::SimTime;

/// A continuation scheduled against the simulation clock. Replaces
/// engine coroutines: deterministic, testable by advancing the virtual
/// clock, and cancellable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Drop a retained noise event from the debug overlay log.
    ExpireNoise { noise_id: u64 },
    /// Return a fleeing citizen to idle.
    CalmCitizen { citizen: Entity },
}

type TaskKey = (Discriminant<TaskKind>, u64);

impl TaskKind {
    /// Cancellation key: kind plus owning entity/id. Scheduling a task
    /// with the same key replaces the in-flight one.
    fn key(&self) -> TaskKey {
        let owner = match self {
            Self::ExpireNoise { noise_id } => *noise_id,
            Self::CalmCitizen { citizen } => citizen.to_bits(),
        };
        (std::mem::discriminant(self), owner)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct ScheduledTask {
    fire_at: SimTime,
    seq: u64,
    task: TaskKind,
}

// Min-heap ordering on (fire_at, seq); seq breaks same-tick ties in
// scheduling order.
impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of timed continuations, drained each tick by
/// `run_due_tasks` in `SimPhase::PostUpdate`.
#[derive(Resource, Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<ScheduledTask>,
    cancelled: HashSet<u64>,
    latest_by_key: HashMap<TaskKey, u64>,
    next_seq: u64,
}

impl TaskQueue {
    /// Schedule a task, cancelling any pending task with the same kind
    /// and owner (implicit cancellation on restart).
    pub fn schedule(&mut self, fire_at: SimTime, task: TaskKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(previous) = self.latest_by_key.insert(task.key(), seq) {
            self.cancelled.insert(previous);
        }
        self.heap.push(ScheduledTask { fire_at, seq, task });
    }

    /// Cancel any pending task for this kind/owner.
    pub fn cancel(&mut self, task: &TaskKind) {
        if let Some(seq) = self.latest_by_key.remove(&task.key()) {
            self.cancelled.insert(seq);
        }
    }

    /// Pop every non-cancelled task due at or before `now`, in
    /// (fire time, scheduling order).
    pub fn pop_due(&mut self, now: SimTime) -> Vec<TaskKind> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|head| head.fire_at <= now) {
            let Some(fired) = self.heap.pop() else {
                break;
            };
            if self.cancelled.remove(&fired.seq) {
                continue;
            }
            if self.latest_by_key.get(&fired.task.key()) == Some(&fired.seq) {
                self.latest_by_key.remove(&fired.task.key());
            }
            due.push(fired.task);
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }
}

/// Exclusive system executing all due continuations for this tick.
/// Operations on entities destroyed in the meantime are silent no-ops.
pub fn run_due_tasks(world: &mut World) {
    let now = world.resource::<SimClock>().time;
    let due = world.resource_mut::<TaskQueue>().pop_due(now);
    for task in due {
        match task {
            TaskKind::ExpireNoise { noise_id } => {
                world.resource_mut::<NoiseLog>().remove(noise_id);
            }
            TaskKind::CalmCitizen { citizen } => {
                if let Some(mut state) = world.get_mut::<CitizenState>(citizen)
                    && matches!(*state, CitizenState::Flee(_))
                {
                    *state = CitizenState::Idle;
                }
            }
        }
    }
}
