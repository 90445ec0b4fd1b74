pub mod alert_state;
pub mod event_log;
pub mod sim_resources;
pub mod spatial;

pub use alert_state::{
    GlobalAlert, GlobalAlertConfig, GuardAlertConfig, GuardAlertness, StateEffects,
};
pub use event_log::{EventLog, SimEvent, SimEventKind};
pub use sim_resources::{
    BehaviorRng, Difficulty, PersonalityRng, PlayerPosition, SimConfig, SimRng, SocialRng,
    distribute_rng,
};
pub use spatial::{SpatialGrid, sync_spatial_index};
