//! Hand-authored demo fixtures.
//!
//! A fixed opening snapshot plus a fixed conversation script let the
//! full interaction loop run deterministically with no backend. The
//! scripted payloads are shaped exactly like live interaction results
//! and flow through the same merge logic.

use once_cell::sync::Lazy;

use inklore_core::gateway::InteractResponse;
use inklore_core::session::{DemoEntry, DemoOpening, DemoScript, GuideSide, GuideStep, ScriptedResponse};
use inklore_core::story::{
    AmbientAnimation, AmbientSound, BlueprintFragment, BlueprintInfo, BlueprintState, Character,
    CinematicMoment, EmotionState, HistoryItem, HistoryRole, LocationChange, WorldContext,
    WorldUpdate,
};

/// Placeholder portrait shown as the demo character's drawing.
pub const DEMO_PORTRAIT_IMAGE: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><rect width='100' height='100' fill='%230f172a'/><circle cx='50' cy='36' r='16' fill='white'/><circle cx='44' cy='33' r='2.5' fill='black'/><circle cx='56' cy='33' r='2.5' fill='black'/><path d='M46 42 a 5 2.5 0 0 0 8 0' fill='none' stroke='black' stroke-width='1.5'/><path d='M30 84 C 30 58, 70 58, 70 84 Z' fill='white'/></svg>";

/// Placeholder illustration substituted for live image generation.
pub const DEMO_CINEMATIC_IMAGE: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><rect width='100' height='100' fill='%231e293b'/><rect x='14' y='18' width='26' height='20' rx='3' fill='%2394a3b8'/><path d='M27 38 L27 58' stroke='%2338bdf8' stroke-width='3'/><path d='M27 58 L70 58' stroke='%2338bdf8' stroke-width='3'/><rect x='52' y='62' width='34' height='16' rx='3' fill='%234ade80'/><rect x='16' y='62' width='28' height='16' rx='3' fill='%234ade80'/></svg>";

/// Closing reflection for the scripted story; the demo never calls the
/// summary endpoint.
pub const DEMO_SUCCESS_SUMMARY: &str = "By asking one practical question at a time, you helped Juniper \
turn a blank memory into a working design again. That patient, piece-by-piece approach is exactly how \
scattered ideas become finished plans.";

/// The demo's fixed opening snapshot.
pub static DEMO_OPENING: Lazy<DemoOpening> = Lazy::new(|| {
    let character = Character {
        name: "Juniper".to_string(),
        short_title: "the Weekend Builder".to_string(),
        description: "A hands-on maker who sketched a clever watering setup for the balcony \
                      garden, then lost every detail of how it was supposed to work."
            .to_string(),
        archetype: "The Tinkerer".to_string(),
        traits: vec![
            "Practical".to_string(),
            "Patient".to_string(),
            "Forgetful".to_string(),
            "Resourceful".to_string(),
        ],
    };

    let blueprint_info = BlueprintInfo {
        title: "The Balcony Rain Garden Blueprint".to_string(),
        summary: "A gravity-fed watering design for a row of balcony planters, with the tank \
                  size, tubing, and flow control all missing."
            .to_string(),
        first_fragment: "A pencil note in the sketch corner reads 'gravity feed - no pump'. \
                         Where does the water start?"
            .to_string(),
    };

    DemoOpening {
        emotion_state: EmotionState {
            courage: 30.0,
            fear: 40.0,
            curiosity: 60.0,
            happiness: 15.0,
        },
        blueprint_state: BlueprintState {
            progress: 0.0,
            understanding: 5.0,
            complexity: 20.0,
        },
        world_context: WorldContext {
            world_name: "The Balcony Workshop".to_string(),
            world_description: "A narrow balcony doubling as a workshop, planters along the \
                                railing and a half-finished sketch taped to the wall."
                .to_string(),
            current_location_name: "The Potting Bench".to_string(),
            current_location_description: "A bench with coiled tubing, a pencil sketch, and an \
                                           empty space where the main idea used to be."
                .to_string(),
        },
        mood_label: "Focused but Foggy".to_string(),
        world_mood: "Calm and orderly".to_string(),
        ambient_sound: AmbientSound {
            sound_cue: "static_hum".to_string(),
            description: "A faint hum of the city below the balcony.".to_string(),
        },
        ambient_animation: AmbientAnimation {
            animation_cue: "drifting_dust".to_string(),
            description: "Morning light catches dust drifting over the bench.".to_string(),
        },
        history: vec![
            HistoryItem::new(HistoryRole::User, DEMO_PORTRAIT_IMAGE),
            HistoryItem::new(
                HistoryRole::Event,
                "Juniper, the Weekend Builder, frowns at the half-erased sketch on the wall.",
            ),
            HistoryItem::new(HistoryRole::World, blueprint_info.first_fragment.clone()),
        ],
        character,
        blueprint_info,
    }
});

/// The fixed demo conversation.
pub static DEMO_SCRIPT: Lazy<DemoScript> = Lazy::new(|| DemoScript {
    entries: vec![
        suggested("A gravity feed needs a reservoir up high. How big was the tank?"),
        scripted(ScriptedResponse {
            interaction: InteractResponse {
                character_reply: Some(
                    "Up high, yes! There was a shelf above the door... and a bucket. No, \
                     bigger - a container. I wrote a number on its side in marker."
                        .to_string(),
                ),
                story_event: Some(
                    "Juniper drags a stool over and peers at the shelf above the balcony door. \
                     A faded ring of marker ink is just visible on the dusty shelf board."
                        .to_string(),
                ),
                blueprint_fragment: Some(fragment(
                    "The sketch's corner resolves: '20 L, top shelf'. The reservoir was a \
                     twenty-liter container above the door.",
                )),
                updated_emotion_state: EmotionState {
                    courage: 45.0,
                    fear: 25.0,
                    curiosity: 75.0,
                    happiness: 30.0,
                },
                mood_label: "Puzzling it out".to_string(),
                updated_blueprint_state: BlueprintState {
                    progress: 30.0,
                    understanding: 35.0,
                    complexity: 30.0,
                },
                world_update: world_update("Intriguing"),
                ambient_sound: AmbientSound {
                    sound_cue: "processor_whirr".to_string(),
                    description: "The soft scrape of a stool across the balcony tiles.".to_string(),
                },
                ambient_animation: AmbientAnimation {
                    animation_cue: "drifting_dust".to_string(),
                    description: "Dust swirls where the shelf was disturbed.".to_string(),
                },
            },
            cinematic: false,
        }),
        suggested("Twenty liters up top. What carried the water down to the planters?"),
        scripted(ScriptedResponse {
            interaction: InteractResponse {
                character_reply: Some(
                    "Tubing! The coil on the bench - that's it. Four-millimeter drip line, one \
                     run along the railing with a little spur into each planter."
                        .to_string(),
                ),
                story_event: Some(
                    "Juniper uncoils the tubing along the railing. It reaches the last planter \
                     with half a meter to spare, exactly as if it had been cut for this."
                        .to_string(),
                ),
                blueprint_fragment: Some(fragment(
                    "A measurement surfaces on the sketch: '4 mm drip line, 1 spur per planter'. \
                     The delivery route is drawn back in.",
                )),
                updated_emotion_state: EmotionState {
                    courage: 70.0,
                    fear: 10.0,
                    curiosity: 65.0,
                    happiness: 60.0,
                },
                mood_label: "Recalling".to_string(),
                updated_blueprint_state: BlueprintState {
                    progress: 80.0,
                    understanding: 85.0,
                    complexity: 15.0,
                },
                world_update: world_update("Clarifying"),
                ambient_sound: AmbientSound {
                    sound_cue: "system_restore".to_string(),
                    description: "Tubing clicks softly into the railing guides.".to_string(),
                },
                ambient_animation: AmbientAnimation {
                    animation_cue: "glowing_cave".to_string(),
                    description: "The balcony seems to brighten as the layout takes shape.".to_string(),
                },
            },
            cinematic: true,
        }),
        suggested("Almost there. How did the design keep the planters from flooding?"),
        scripted(ScriptedResponse {
            interaction: InteractResponse {
                character_reply: Some(
                    "That was the clever part - a small inline valve under the tank, opened a \
                     quarter turn, and an overflow saucer under each planter. Slow, steady, \
                     spill-proof. That's the whole design!"
                        .to_string(),
                ),
                story_event: Some(
                    "Juniper fits the valve under the imagined tank position and sets a saucer \
                     under each planter. The sketch on the wall finally reads as one complete plan."
                        .to_string(),
                ),
                blueprint_fragment: Some(fragment(
                    "PROJECT COMPLETE: 'The Balcony Rain Garden' (20 L gravity tank, 4 mm drip \
                     line with one spur per planter, quarter-turn valve, overflow saucers) is \
                     restored.",
                )),
                updated_emotion_state: EmotionState {
                    courage: 95.0,
                    fear: 5.0,
                    curiosity: 20.0,
                    happiness: 95.0,
                },
                mood_label: "Accomplished".to_string(),
                updated_blueprint_state: BlueprintState {
                    progress: 100.0,
                    understanding: 100.0,
                    complexity: 0.0,
                },
                world_update: world_update("Triumphant"),
                ambient_sound: AmbientSound {
                    sound_cue: "system_restore".to_string(),
                    description: "A satisfied quiet settles over the balcony.".to_string(),
                },
                ambient_animation: AmbientAnimation {
                    animation_cue: "starry_night".to_string(),
                    description: "The finished plan seems to glow on the wall.".to_string(),
                },
            },
            cinematic: false,
        }),
    ],
});

/// Walkthrough callouts shown before the scripted story begins.
pub static GUIDE_STEPS: Lazy<Vec<GuideStep>> = Lazy::new(|| {
    vec![
        step(
            "guide-character-portrait",
            GuideSide::Right,
            "It's Alive!",
            "Your drawing becomes the story's main character, breathing quietly at the edge of \
             the scene.",
        ),
        step(
            "guide-character-card",
            GuideSide::Right,
            "Your Character",
            "Name, personality, and traits are invented from the drawing itself.",
        ),
        step(
            "guide-emotion-meters",
            GuideSide::Right,
            "Emotion Meters",
            "Courage, fear, curiosity, and happiness shift with every exchange; they shape how \
             the character responds to you.",
        ),
        step(
            "guide-blueprint-tracker",
            GuideSide::Left,
            "The Blueprint",
            "The forgotten plan being reconstructed. Good questions raise progress and \
             understanding; new puzzles raise complexity.",
        ),
        step(
            "guide-world-display",
            GuideSide::Top,
            "The Living World",
            "The world has its own mood, and the scene can move or transform as the story turns.",
        ),
        step(
            "guide-chat-log",
            GuideSide::Top,
            "The Story Unfolds",
            "Your messages, the character's replies, and key events all land here in order.",
        ),
        step(
            "guide-chat-input",
            GuideSide::Top,
            "Drive the Story",
            "Type here to talk to the Character, the World, or Both, and watch how each reacts.",
        ),
    ]
});

/// Returns a fresh copy of the demo script.
pub fn script() -> DemoScript {
    DEMO_SCRIPT.clone()
}

/// Returns a fresh copy of the demo opening snapshot.
pub fn opening() -> DemoOpening {
    DEMO_OPENING.clone()
}

/// Returns a fresh copy of the walkthrough steps.
pub fn guide_steps() -> Vec<GuideStep> {
    GUIDE_STEPS.clone()
}

fn suggested(line: &str) -> DemoEntry {
    DemoEntry::User {
        line: line.to_string(),
    }
}

fn scripted(response: ScriptedResponse) -> DemoEntry {
    DemoEntry::Response(Box::new(response))
}

fn fragment(text: &str) -> BlueprintFragment {
    BlueprintFragment {
        from_blueprint: text.to_string(),
        understanding_delta: 0.0,
        progress_delta: 0.0,
        complexity_delta: 0.0,
    }
}

fn world_update(mood: &str) -> WorldUpdate {
    WorldUpdate {
        world_mood: mood.to_string(),
        location_change: LocationChange::default(),
        cinematic_moment: CinematicMoment::default(),
    }
}

fn step(anchor: &str, side: GuideSide, title: &str, body: &str) -> GuideStep {
    GuideStep {
        anchor: anchor.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_ends_in_a_completed_blueprint() {
        let script = script();
        assert_eq!(script.response_count(), 3);

        let mut cursor = 0;
        let mut last_progress = 0.0;
        while let Some((index, payload)) = script.next_response(cursor) {
            let progress = payload.interaction.updated_blueprint_state.progress;
            assert!(progress > last_progress, "script progress must climb");
            last_progress = progress;
            cursor = index + 1;
        }
        assert!(last_progress >= 100.0);
    }

    #[test]
    fn test_opening_history_leads_with_the_portrait() {
        let opening = opening();
        assert_eq!(opening.history.len(), 3);
        assert_eq!(opening.history[0].role, HistoryRole::User);
        assert_eq!(opening.history[0].text, DEMO_PORTRAIT_IMAGE);
        assert_eq!(
            opening.history[2].text,
            opening.blueprint_info.first_fragment
        );
    }

    #[test]
    fn test_exactly_one_cinematic_turn() {
        let script = script();
        let cinematic_count = script
            .entries
            .iter()
            .filter(|entry| matches!(entry, DemoEntry::Response(payload) if payload.cinematic))
            .count();
        assert_eq!(cinematic_count, 1);
    }

    #[test]
    fn test_guide_has_a_step_for_every_panel() {
        assert_eq!(GUIDE_STEPS.len(), 7);
        assert!(GUIDE_STEPS.iter().all(|step| !step.anchor.is_empty()));
    }
}
