use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::clock::SimClock;
use super::events::{
    AlertnessChanged, GateLockChanged, GlobalAlertChanged, GuardAlerted, MoveOrder, NoiseHeard,
    SpawnRequest,
};
use super::resources::{
    BehaviorRng, Difficulty, EventLog, GlobalAlert, GlobalAlertConfig, GuardAlertConfig,
    GuardAlertness, PersonalityRng, PlayerPosition, SimConfig, SimRng, SocialRng, SpatialGrid,
    distribute_rng,
};
use super::schedule::{SimPhase, configure_sim_schedule};
use super::systems::noise::{NoiseConfig, NoiseLog};
use super::systems::perception::MemoryConfig;
use super::tasks::TaskQueue;

/// Build a headless Bevy app with simulation clock, core resources, and
/// message types. Domain systems come from `SimPlugin`.
///
/// Manual tick control:
/// ```no_run
/// # use citywatch::ecs::{build_sim_app, SimTick};
/// let mut app = build_sim_app();
/// for _ in 0..600 {  // 1 minute of 100 ms ticks
///     app.world_mut().run_schedule(SimTick);
/// }
/// ```
pub fn build_sim_app() -> App {
    build_sim_app_seeded(SimConfig::default().seed)
}

/// Build a headless Bevy app with a specific RNG seed and multi-threaded executor.
pub fn build_sim_app_seeded(seed: u64) -> App {
    build_sim_app_with_executor(seed, ExecutorKind::MultiThreaded)
}

/// Build a headless Bevy app with single-threaded executor for reproducible determinism.
///
/// Use this when exact RNG consumption order across ticks must be identical across runs.
pub fn build_sim_app_deterministic(seed: u64) -> App {
    build_sim_app_with_executor(seed, ExecutorKind::SingleThreaded)
}

/// Build a headless Bevy app with a specific executor kind.
pub fn build_sim_app_with_executor(seed: u64, executor: ExecutorKind) -> App {
    let mut app = App::empty();

    let config = SimConfig {
        seed,
        ..SimConfig::default()
    };

    // Core resources
    app.insert_resource(SimClock::new());
    app.insert_resource(EventLog::new());
    app.insert_resource(SpatialGrid::new(config.cell_size));
    app.insert_resource(TaskQueue::default());
    app.insert_resource(SimRng {
        rng: SmallRng::seed_from_u64(seed),
        seed,
    });
    app.insert_resource(config);

    // Domain state and tuning
    app.init_resource::<NoiseConfig>();
    app.init_resource::<NoiseLog>();
    app.init_resource::<MemoryConfig>();
    app.init_resource::<GuardAlertConfig>();
    app.init_resource::<GuardAlertness>();
    app.init_resource::<GlobalAlertConfig>();
    app.init_resource::<GlobalAlert>();
    app.init_resource::<PlayerPosition>();
    app.init_resource::<Difficulty>();

    // Per-domain RNG resources (reseeded each tick by distribute_rng)
    app.init_resource::<PersonalityRng>();
    app.init_resource::<SocialRng>();
    app.init_resource::<BehaviorRng>();

    // Register message types
    MessageRegistry::register_message::<AlertnessChanged>(app.world_mut());
    MessageRegistry::register_message::<GlobalAlertChanged>(app.world_mut());
    MessageRegistry::register_message::<GuardAlerted>(app.world_mut());
    MessageRegistry::register_message::<NoiseHeard>(app.world_mut());
    MessageRegistry::register_message::<SpawnRequest>(app.world_mut());
    MessageRegistry::register_message::<GateLockChanged>(app.world_mut());
    MessageRegistry::register_message::<MoveOrder>(app.world_mut());

    // Build schedule with message rotation + RNG distribution
    let mut schedule = configure_sim_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SimPhase::PreUpdate));
    schedule.add_systems(distribute_rng.in_set(SimPhase::PreUpdate));
    app.add_schedule(schedule);
    app
}
