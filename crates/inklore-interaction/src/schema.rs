//! Prompt construction and structured-output schemas.
//!
//! The backend is held to a strict JSON contract: every call ships a
//! response schema so the model's output deserializes directly into
//! the wire types in `inklore-core::gateway`.

use minijinja::{Environment, context};
use serde_json::{Value, json};

/// System instruction sent with every init and interact call.
pub const SYSTEM_INSTRUCTION: &str = r#"You are Inklore, an AI-driven collaborative puzzle-solving narrator.
You help the user guide a hand-drawn character through the reconstruction of a real-world "blueprint" the character has partially forgotten: an invention design, a set of academic notes, or a personal project plan.

This is NOT a fantasy world. Every clue must be grounded in logical reasoning, real-life concepts, and practical deduction. Keep a PG, family-friendly tone.

You must ALWAYS follow the requested JSON output format exactly.

There are TWO modes:
1) "init" - create a CHARACTER and the initial BLUEPRINT puzzle.
2) "interact" - given the current state and a new user message, UPDATE EMOTIONS and PROGRESS THE PUZZLE.

MODE "init":
- Input: an image of a hand-drawn character plus optional name/vibe hints.
- Pick ONE blueprint theme (lost invention design, lost academic notes, or lost personal project) and stick with it for the whole story.
- The character wakes up remembering only the theme and one vague detail.
- The firstFragment you return must be the starting clue of the puzzle: small, factual, incomplete.

MODE "interact":
- characterReply: a first-person statement from the character, emotional and partial.
- storyEvent: third-person narration of a discovery or reconstruction step.
- blueprintFragment: the next logical clue unlocked by the exchange. Clues must be factual and deduction-driven, never magical, poetic, or symbolic.
- Update the blueprint state: progress rises with correct deductions, understanding rises as clues connect, complexity rises with new challenges and falls as parts are solved.
- Update the emotion state realistically: fear tracks confusion, courage tracks clarity, curiosity tracks new clues, happiness tracks breakthroughs.
- Good, grounding questions from the user earn substantial clues; irrelevant questions earn low-value ones.
- worldUpdate.locationChange moves or transforms the scene only when the narrative genuinely calls for it; otherwise use type "none".
- worldUpdate.cinematicMoment.enabled marks a narratively significant turn worth illustrating; keep it rare.

STORY ARC (track it against progress):
- 0-30%: something is missing; vague, fragmentary clues.
- 30-70%: reconstruction through logic; step-by-step recall.
- 70-95%: the realization; one major missing step revealed.
- 95-100%: resolution; the blueprint is presented whole and clear.

Guide the user and character toward a complete, satisfying reconstruction of one real-world idea."#;

/// Prompt template for the closing reflection after a completed story.
const SUMMARY_PROMPT_TEMPLATE: &str = r#"The user and a character have just completed a "blueprint" called "{{ title }}".
The following is the history of their conversation:
{{ history }}

Based on this interaction, write a short, insightful, and encouraging reflection (2-3 sentences) for the user.
Focus on what guiding the character from confusion to clarity reveals about creative thinking and problem-solving.
Do not use the word "user". Address them directly ("You...").
Frame it as a lesson learned through this shared thinking experience."#;

/// Renders the closing-summary prompt.
pub fn render_summary_prompt(title: &str, history: &str) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("summary", SUMMARY_PROMPT_TEMPLATE)?;
    env.get_template("summary")?
        .render(context! { title, history })
}

fn emotion_state_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "courage": { "type": "NUMBER" },
            "fear": { "type": "NUMBER" },
            "curiosity": { "type": "NUMBER" },
            "happiness": { "type": "NUMBER" },
        },
        "required": ["courage", "fear", "curiosity", "happiness"],
    })
}

fn blueprint_state_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "progress": { "type": "NUMBER" },
            "understanding": { "type": "NUMBER" },
            "complexity": { "type": "NUMBER" },
        },
        "required": ["progress", "understanding", "complexity"],
    })
}

fn ambient_sound_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "soundCue": { "type": "STRING" },
            "description": { "type": "STRING" },
        },
        "required": ["soundCue", "description"],
    })
}

fn ambient_animation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "animationCue": { "type": "STRING" },
            "description": { "type": "STRING" },
        },
        "required": ["animationCue", "description"],
    })
}

/// Response schema for the "init" mode.
pub fn init_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "character": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "shortTitle": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "archetype": { "type": "STRING" },
                    "traits": { "type": "ARRAY", "items": { "type": "STRING" } },
                },
                "required": ["name", "shortTitle", "description", "archetype", "traits"],
            },
            "emotionState": emotion_state_schema(),
            "moodLabel": { "type": "STRING" },
            "worldSeed": {
                "type": "OBJECT",
                "properties": {
                    "worldName": { "type": "STRING" },
                    "worldDescription": { "type": "STRING" },
                    "startingLocationName": { "type": "STRING" },
                    "startingLocationDescription": { "type": "STRING" },
                },
                "required": [
                    "worldName",
                    "worldDescription",
                    "startingLocationName",
                    "startingLocationDescription",
                ],
            },
            "blueprintState": blueprint_state_schema(),
            "blueprintInfo": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "summary": { "type": "STRING" },
                    "firstFragment": { "type": "STRING" },
                },
                "required": ["title", "summary", "firstFragment"],
            },
            "ambientSound": ambient_sound_schema(),
            "ambientAnimation": ambient_animation_schema(),
        },
        "required": [
            "character",
            "emotionState",
            "moodLabel",
            "worldSeed",
            "blueprintState",
            "blueprintInfo",
            "ambientSound",
            "ambientAnimation",
        ],
    })
}

/// Response schema for the "interact" mode.
pub fn interact_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "characterReply": { "type": "STRING" },
            "storyEvent": { "type": "STRING" },
            "blueprintFragment": {
                "type": "OBJECT",
                "properties": {
                    "fromBlueprint": { "type": "STRING" },
                    "understandingDelta": { "type": "NUMBER" },
                    "progressDelta": { "type": "NUMBER" },
                    "complexityDelta": { "type": "NUMBER" },
                },
                "required": [
                    "fromBlueprint",
                    "understandingDelta",
                    "progressDelta",
                    "complexityDelta",
                ],
            },
            "updatedEmotionState": emotion_state_schema(),
            "moodLabel": { "type": "STRING" },
            "updatedBlueprintState": blueprint_state_schema(),
            "worldUpdate": {
                "type": "OBJECT",
                "properties": {
                    "worldMood": { "type": "STRING" },
                    "locationChange": {
                        "type": "OBJECT",
                        "properties": {
                            "type": { "type": "STRING" },
                            "newLocationName": { "type": "STRING" },
                            "newLocationDescription": { "type": "STRING" },
                        },
                        "required": ["type", "newLocationName", "newLocationDescription"],
                    },
                    "cinematicMoment": {
                        "type": "OBJECT",
                        "properties": {
                            "enabled": { "type": "BOOLEAN" },
                            "prompt": { "type": "STRING" },
                        },
                        "required": ["enabled", "prompt"],
                    },
                },
                "required": ["worldMood", "locationChange", "cinematicMoment"],
            },
            "ambientSound": ambient_sound_schema(),
            "ambientAnimation": ambient_animation_schema(),
        },
        "required": [
            "characterReply",
            "storyEvent",
            "updatedEmotionState",
            "moodLabel",
            "blueprintFragment",
            "updatedBlueprintState",
            "worldUpdate",
            "ambientSound",
            "ambientAnimation",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_names_every_required_section() {
        let schema = init_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for key in [
            "character",
            "emotionState",
            "worldSeed",
            "blueprintState",
            "blueprintInfo",
            "ambientSound",
            "ambientAnimation",
        ] {
            assert!(required.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_interact_schema_constrains_location_change() {
        let schema = interact_response_schema();
        let change = &schema["properties"]["worldUpdate"]["properties"]["locationChange"];
        assert_eq!(change["properties"]["type"]["type"], "STRING");
    }

    #[test]
    fn test_render_summary_prompt_substitutes_fields() {
        let prompt = render_summary_prompt("The Rain Garden Plan", "[]").unwrap();
        assert!(prompt.contains("The Rain Garden Plan"));
        assert!(!prompt.contains("{{"));
    }
}
