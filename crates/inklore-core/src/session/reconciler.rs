//! Session reconciliation.
//!
//! Every mutation of the [`Session`] aggregate goes through the merge
//! functions in this module. Results from the live backend and from the
//! scripted demo flow through the same `apply_interaction`, which is
//! what keeps the two paths behaviorally indistinguishable.
//!
//! Merge functions are pure over `(session, result)`; side effects come
//! back as an ordered [`TimedEffect`] list for the caller to dispatch
//! after the merge commits.

use super::demo::{DemoOpening, DemoStatus};
use super::effects::{
    STORY_EVENT_SOUND_DELAY, TimedEffect, TurnEffect, WORLD_CLUE_SOUND_DELAY,
};
use super::model::Session;
use super::phase::SessionPhase;
use crate::gateway::{InitResponse, InteractResponse};
use crate::story::{HistoryItem, HistoryRole, LocationChangeKind, SoundEffect, WorldContext};

/// World mood seeded before the first interaction result arrives.
pub const INITIAL_WORLD_MOOD: &str = "calm and quiet";

/// Event line appended when the demo script runs out of responses.
pub const DEMO_CONCLUDED_LINE: &str =
    "That wraps up the demo! Tap the restart button to bring your own character to life.";

/// Outcome of merging one interaction result.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// Ordered side effects to dispatch after the merge commits.
    pub effects: Vec<TimedEffect>,
    /// The blueprint reached full progress this turn; the session is
    /// left in `loading` for the caller to finish with a summary.
    pub blueprint_complete: bool,
}

/// Moves the session into `loading` and clears any prior failure.
pub fn begin_loading(session: &mut Session) {
    session.phase = SessionPhase::Loading;
    session.failure_message = None;
}

/// Opens a turn: appends the user's message to the log before any
/// round trip so the history reflects the request immediately, bumps
/// the turn counter, and suspends input.
///
/// The live path clears the previous cinematic image here; the demo
/// path leaves it for the merge to replace.
pub fn begin_turn(session: &mut Session, message: &str, clear_cinematic: bool) -> Vec<TimedEffect> {
    if clear_cinematic {
        session.cinematic_image_url = None;
    }
    begin_loading(session);
    session.turn += 1;
    session
        .history
        .push(HistoryItem::new(HistoryRole::User, message));
    vec![TimedEffect::immediate(TurnEffect::Sound(
        SoundEffect::SendMessage,
    ))]
}

/// Merges a successful initialization result into a fresh session.
///
/// `portrait_ref` is the display reference for the uploaded image; it
/// becomes the first `user` history item so presentation can render
/// the portrait from the log.
pub fn apply_init(
    session: &mut Session,
    response: InitResponse,
    portrait_ref: impl Into<String>,
) -> Vec<TimedEffect> {
    let InitResponse {
        character,
        emotion_state,
        mood_label,
        world_seed,
        blueprint_state,
        blueprint_info,
        ambient_sound,
        ambient_animation,
    } = response;

    let world_context = WorldContext::from_seed(&world_seed);
    let arrival_line = format!(
        "{} comes to life in {}!",
        character.name, world_context.current_location_name
    );

    session.emotion_state = Some(emotion_state.clamped());
    session.blueprint_state = Some(blueprint_state);
    session.ambient_sound = Some(ambient_sound);
    session.ambient_animation = Some(ambient_animation);
    session.mood_label = mood_label;
    session.world_mood = INITIAL_WORLD_MOOD.to_string();
    session.character = Some(character);

    session.history = vec![
        HistoryItem::new(HistoryRole::User, portrait_ref),
        HistoryItem::new(HistoryRole::Event, arrival_line),
        HistoryItem::new(HistoryRole::World, blueprint_info.first_fragment.clone()),
    ];

    session.blueprint_info = Some(blueprint_info);
    session.world_context = Some(world_context);
    session.phase = SessionPhase::Interactive;

    vec![TimedEffect::immediate(TurnEffect::Sound(SoundEffect::Init))]
}

/// Merges one interaction result, live or scripted.
///
/// On completion (`progress >= 100`) the session stays in `loading`
/// so the caller can fetch the closing summary; otherwise the phase
/// returns to `resume`.
pub fn apply_interaction(
    session: &mut Session,
    interaction: InteractResponse,
    cinematic_image_url: Option<String>,
    resume: SessionPhase,
) -> TurnReport {
    let InteractResponse {
        character_reply,
        story_event,
        blueprint_fragment,
        updated_emotion_state,
        mood_label,
        updated_blueprint_state,
        world_update,
        ambient_sound,
        ambient_animation,
    } = interaction;

    let mut effects = Vec::new();

    session.emotion_state = Some(updated_emotion_state.clamped());
    session.blueprint_state = Some(updated_blueprint_state);
    session.mood_label = mood_label;
    session.world_mood = world_update.world_mood;
    session.ambient_sound = Some(ambient_sound);
    session.ambient_animation = Some(ambient_animation);

    session.cinematic_image_url = cinematic_image_url;
    if session.cinematic_image_url.is_some() {
        effects.push(TimedEffect::immediate(TurnEffect::Sound(
            SoundEffect::CinematicMoment,
        )));
    }

    let location_change = world_update.location_change;
    if location_change.kind != LocationChangeKind::None {
        if let Some(context) = session.world_context.as_mut() {
            if let Some(name) = location_change.new_location_name {
                context.current_location_name = name;
            }
            if let Some(description) = location_change.new_location_description {
                context.current_location_description = description;
            }
        }
    }

    if let Some(reply) = character_reply.filter(|text| !text.is_empty()) {
        session
            .history
            .push(HistoryItem::new(HistoryRole::Character, reply.clone()));
        effects.push(TimedEffect::immediate(TurnEffect::Sound(
            SoundEffect::CharacterReply,
        )));
        effects.push(TimedEffect::immediate(TurnEffect::Speech {
            text: reply,
            mood: session.mood_label.clone(),
        }));
    }

    if let Some(event) = story_event.filter(|text| !text.is_empty()) {
        session
            .history
            .push(HistoryItem::new(HistoryRole::Event, event));
        effects.push(TimedEffect::after(
            STORY_EVENT_SOUND_DELAY,
            TurnEffect::Sound(SoundEffect::StoryEvent),
        ));
    }

    if let Some(fragment) = blueprint_fragment.filter(|f| !f.from_blueprint.is_empty()) {
        session
            .history
            .push(HistoryItem::new(HistoryRole::World, fragment.from_blueprint));
        effects.push(TimedEffect::after(
            WORLD_CLUE_SOUND_DELAY,
            TurnEffect::Sound(SoundEffect::WorldClue),
        ));
    }

    let blueprint_complete = session
        .blueprint_state
        .map(|state| state.is_complete())
        .unwrap_or(false);

    if !blueprint_complete {
        session.phase = resume;
    }

    TurnReport {
        effects,
        blueprint_complete,
    }
}

/// Finishes a completed story with its closing reflection.
pub fn complete_session(session: &mut Session, summary: impl Into<String>) {
    session.success_summary = Some(summary.into());
    session.phase = SessionPhase::Success;
}

/// Records a backend failure. Nothing merged before the failure is
/// rolled back; the user's message stays in the log.
pub fn fail_session(session: &mut Session, message: impl Into<String>) {
    session.failure_message = Some(message.into());
    session.phase = SessionPhase::Error;
}

/// Seeds the session wholesale from the demo's fixed opening snapshot.
pub fn enter_demo(session: &mut Session, opening: DemoOpening) -> Vec<TimedEffect> {
    let DemoOpening {
        character,
        emotion_state,
        blueprint_state,
        blueprint_info,
        world_context,
        history,
        mood_label,
        world_mood,
        ambient_sound,
        ambient_animation,
    } = opening;

    session.character = Some(character);
    session.emotion_state = Some(emotion_state);
    session.blueprint_state = Some(blueprint_state);
    session.blueprint_info = Some(blueprint_info);
    session.world_context = Some(world_context);
    session.history = history;
    session.mood_label = mood_label;
    session.world_mood = world_mood;
    session.ambient_sound = Some(ambient_sound);
    session.ambient_animation = Some(ambient_animation);
    session.cinematic_image_url = None;
    session.failure_message = None;
    session.demo_step = 0;
    session.demo_status = DemoStatus::Guide;
    session.phase = SessionPhase::Demo;

    vec![TimedEffect::immediate(TurnEffect::Sound(SoundEffect::Init))]
}

/// Marks the script exhausted and appends the user's literal message
/// plus the fixed concluding line. No state merge happens.
pub fn conclude_demo(session: &mut Session, message: &str) {
    session.demo_status = DemoStatus::Ended;
    session
        .history
        .push(HistoryItem::new(HistoryRole::User, message));
    session
        .history
        .push(HistoryItem::new(HistoryRole::Event, DEMO_CONCLUDED_LINE));
}

/// Advances the guided walkthrough one step.
pub fn advance_guide(session: &mut Session) {
    if session.demo_status == DemoStatus::Guide {
        session.demo_step += 1;
    }
}

/// Ends the guided walkthrough and hands the cursor to the story.
pub fn end_guide(session: &mut Session) {
    if session.demo_status == DemoStatus::Guide {
        session.demo_status = DemoStatus::Story;
        session.demo_step = 0;
    }
}
