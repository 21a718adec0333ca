//! Session domain module.
//!
//! This module contains the session aggregate, its phase machine, the
//! reconciliation (merge) logic, the scripted demo state machine, and
//! the side-effect types merges emit.
//!
//! # Module Structure
//!
//! - `model`: the root `Session` aggregate
//! - `phase`: the `SessionPhase` state machine
//! - `reconciler`: merge functions shared by the live and demo paths
//! - `demo`: demo script, cursor helpers, walkthrough types
//! - `effects`: timed side effects returned by merges

pub mod demo;
mod effects;
mod model;
mod phase;
pub mod reconciler;

pub use demo::{DemoEntry, DemoOpening, DemoScript, DemoStatus, GuideSide, GuideStep, ScriptedResponse};
pub use effects::{
    DEMO_THINKING_DELAY, STORY_EVENT_SOUND_DELAY, TimedEffect, TurnEffect, WORLD_CLUE_SOUND_DELAY,
};
pub use model::Session;
pub use phase::SessionPhase;
pub use reconciler::{TurnReport, DEMO_CONCLUDED_LINE, INITIAL_WORLD_MOOD};
