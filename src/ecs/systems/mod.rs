pub mod behavior;
pub mod global_alert;
pub mod guard_alert;
pub mod noise;
pub mod perception;
pub mod social;
