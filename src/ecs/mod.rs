pub mod api;
pub mod app;
pub mod clock;
pub mod components;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
pub mod tasks;
pub mod test_helpers;
pub mod time;

pub use app::{
    build_sim_app, build_sim_app_deterministic, build_sim_app_seeded, build_sim_app_with_executor,
};
pub use clock::SimClock;
pub use components::{
    Citizen, CitizenMemory, CitizenState, EscalationUnit, Gate, Guard, GuardAlertLevel,
    GuardKnowledge, GuardModifiers, GuardState, Personality, Position, SocialCooldown, Suspicion,
};
pub use conditions::every_second;
pub use events::{
    AlertnessChanged, GateLockChanged, GlobalAlertChanged, GuardAlerted, MoveOrder, MoveUrgency,
    NoiseHeard, SpawnRequest,
};
pub use plugin::SimPlugin;
pub use resources::{
    Difficulty, EventLog, GlobalAlert, GlobalAlertConfig, GuardAlertConfig, GuardAlertness,
    PlayerPosition, SimConfig, SimEvent, SimEventKind, SimRng, SpatialGrid, StateEffects,
};
pub use schedule::{DomainSet, SimPhase, SimTick, configure_sim_schedule};
pub use systems::noise::{NoiseConfig, NoiseLog};
pub use systems::perception::MemoryConfig;
pub use tasks::{TaskKind, TaskQueue};
pub use time::{SimTime, TICK_SECONDS, TICKS_PER_SECOND};
