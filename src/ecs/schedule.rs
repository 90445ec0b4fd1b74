use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for the main simulation tick.
/// Run manually each frame via `app.world_mut().run_schedule(SimTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimTick;

/// Ordered phases within each simulation tick.
///
/// Systems are assigned to phases via `.in_set(SimPhase::Update)` etc.
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Last,
}

/// Per-domain system sets within `SimPhase::Update`.
///
/// Cross-domain ordering:
/// ```text
/// Spatial → Noise → Perception → Social → GuardAlert → GlobalAlert → Behavior
/// ```
///
/// Alert transitions are applied before dependent behavior systems run,
/// so every agent observes a consistent level for the tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSet {
    Spatial,
    Noise,
    Perception,
    Social,
    GuardAlert,
    GlobalAlert,
    Behavior,
}

fn configure_domain_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(DomainSet::Spatial.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::Noise.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::Perception.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::Social.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::GuardAlert.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::GlobalAlert.in_set(SimPhase::Update));
    schedule.configure_sets(DomainSet::Behavior.in_set(SimPhase::Update));

    schedule.configure_sets(DomainSet::Noise.after(DomainSet::Spatial));
    schedule.configure_sets(DomainSet::Perception.after(DomainSet::Noise));
    schedule.configure_sets(DomainSet::Social.after(DomainSet::Perception));
    schedule.configure_sets(DomainSet::GuardAlert.after(DomainSet::Social));
    schedule.configure_sets(DomainSet::GlobalAlert.after(DomainSet::GuardAlert));
    schedule.configure_sets(DomainSet::Behavior.after(DomainSet::GlobalAlert));
}

/// Build a configured `SimTick` schedule with phase ordering.
pub fn configure_sim_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(SimTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            SimPhase::PreUpdate,
            SimPhase::Update,
            SimPhase::PostUpdate,
            SimPhase::Last,
        )
            .chain(),
    );
    configure_domain_ordering(&mut schedule);
    schedule.add_systems(advance_clock.in_set(SimPhase::Last));
    schedule
}
