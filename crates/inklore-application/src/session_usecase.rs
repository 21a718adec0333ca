//! Session use case implementation.
//!
//! `SessionUseCase` owns the session aggregate and routes user intents
//! to either the live gateway or the scripted demo engine. Both paths
//! share the reconciler's merge logic; this module only sequences the
//! calls, dispatches the resulting timed effects, and keeps the
//! ambient bed in sync with the phase machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use inklore_core::gateway::{InteractRequest, MessageTarget, StoryGateway};
use inklore_core::session::{
    DEMO_THINKING_DELAY, DemoOpening, DemoScript, GuideStep, Session, SessionPhase, TimedEffect,
    TurnEffect, reconciler,
};

use crate::demo;
use crate::port::{CommunicationMode, PresentationPort};

/// Fixed user-facing message for a failed initialization.
pub const INIT_FAILURE_MESSAGE: &str = "Failed to bring the character to life. The storyteller \
may be under heavy load. Please try again.";

/// Fixed user-facing message for a failed interaction or summary.
pub const INTERACTION_FAILURE_MESSAGE: &str =
    "An unexpected event occurred. The story is paused.";

/// Ambient bed played while the very first initialization is pending.
const MENU_AMBIENT_CUE: &str = "menu_hum";

/// A character upload from the presentation layer.
///
/// `portrait_ref` is whatever reference presentation can render again
/// later (a data or object URL); it is stored in the narrative log
/// while the raw bytes go to the backend.
#[derive(Debug, Clone)]
pub struct CharacterUpload {
    pub image_base64: String,
    pub mime_type: String,
    pub portrait_ref: String,
    pub name_hint: String,
    pub vibe_hint: String,
}

/// Owns one session and the full presentation-facing event surface.
pub struct SessionUseCase {
    /// The root aggregate; mutated only through the reconciler.
    session: RwLock<Session>,
    /// Generative backend collaborator.
    gateway: Arc<dyn StoryGateway>,
    /// Side-effect surface on the presentation layer.
    port: Arc<dyn PresentationPort>,
    demo_script: DemoScript,
    demo_opening: DemoOpening,
    guide_steps: Vec<GuideStep>,
    communication_mode: RwLock<CommunicationMode>,
    /// Orthogonal to session state; suppresses sound and speech only.
    muted: Arc<AtomicBool>,
}

impl SessionUseCase {
    /// Creates a use case with the built-in demo fixtures.
    pub fn new(gateway: Arc<dyn StoryGateway>, port: Arc<dyn PresentationPort>) -> Self {
        Self::with_fixtures(gateway, port, demo::script(), demo::opening())
    }

    /// Creates a use case with explicit demo fixtures.
    pub fn with_fixtures(
        gateway: Arc<dyn StoryGateway>,
        port: Arc<dyn PresentationPort>,
        demo_script: DemoScript,
        demo_opening: DemoOpening,
    ) -> Self {
        Self {
            session: RwLock::new(Session::new()),
            gateway,
            port,
            demo_script,
            demo_opening,
            guide_steps: demo::guide_steps(),
            communication_mode: RwLock::new(CommunicationMode::Text),
            muted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a read-only copy of the session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// The walkthrough steps the demo guide renders.
    pub fn guide_steps(&self) -> &[GuideStep] {
        &self.guide_steps
    }

    pub async fn communication_mode(&self) -> CommunicationMode {
        *self.communication_mode.read().await
    }

    /// Switches between text and voice replies.
    ///
    /// Ignored while a request is outstanding; voice is unavailable in
    /// the demo.
    pub async fn set_communication_mode(&self, mode: CommunicationMode) {
        let phase = self.session.read().await.phase;
        if phase == SessionPhase::Loading {
            return;
        }
        if phase == SessionPhase::Demo && mode == CommunicationMode::Voice {
            return;
        }
        *self.communication_mode.write().await = mode;
    }

    /// Flips the mute switch and returns the new state.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.load(Ordering::Relaxed);
        self.muted.store(muted, Ordering::Relaxed);
        muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// Brings an uploaded character to life and opens the story.
    ///
    /// Presentation guarantees an image is present; this method does
    /// not re-validate the upload.
    pub async fn create_session(&self, upload: CharacterUpload) {
        let session_id = {
            let mut session = self.session.write().await;
            if session.phase != SessionPhase::Init {
                return;
            }
            reconciler::begin_loading(&mut session);
            session.id.clone()
        };
        self.port.set_ambient(Some(MENU_AMBIENT_CUE.to_string()));

        let result = self
            .gateway
            .init_session(
                &upload.image_base64,
                &upload.mime_type,
                &upload.name_hint,
                &upload.vibe_hint,
            )
            .await;

        match result {
            Ok(response) => {
                let effects = {
                    let mut session = self.session.write().await;
                    // A restart while the call was in flight wins.
                    if session.id != session_id {
                        return;
                    }
                    reconciler::apply_init(&mut session, response, upload.portrait_ref)
                };
                self.dispatch(effects);
            }
            Err(err) => {
                tracing::error!("Session initialization failed: {err}");
                let mut session = self.session.write().await;
                if session.id == session_id {
                    reconciler::fail_session(&mut session, INIT_FAILURE_MESSAGE);
                }
            }
        }
        self.sync_ambient().await;
    }

    /// Routes a user message to the live backend or the demo script,
    /// depending on the phase. Silently ignored in any phase that does
    /// not accept input.
    pub async fn send_message(&self, message: &str, target: MessageTarget) {
        let phase = self.session.read().await.phase;
        match phase {
            SessionPhase::Demo => self.send_demo_message(message).await,
            SessionPhase::Interactive => self.send_live_message(message, target).await,
            _ => {}
        }
    }

    async fn send_live_message(&self, message: &str, target: MessageTarget) {
        let (request, session_id, turn, effects) = {
            let mut session = self.session.write().await;
            if !session.is_ready() {
                // Torn-down state mid-flight is an inconsistency, not a
                // valid business case.
                tracing::warn!("Interaction requested on an incomplete session");
                return;
            }
            let (
                Some(character),
                Some(emotion_state),
                Some(blueprint_state),
                Some(world_context),
            ) = (
                session.character.clone(),
                session.emotion_state,
                session.blueprint_state,
                session.world_context.clone(),
            )
            else {
                return;
            };

            let effects = reconciler::begin_turn(&mut session, message, true);
            let request = InteractRequest {
                character,
                emotion_state,
                blueprint_state,
                world_context,
                history: session.history.clone(),
                message: message.to_string(),
                target,
                mood_label: session.mood_label.clone(),
            };
            (request, session.id.clone(), session.turn, effects)
        };
        self.dispatch(effects);

        match self.gateway.interact(request).await {
            Ok(outcome) => {
                let report = {
                    let mut session = self.session.write().await;
                    if session.id != session_id || session.turn != turn {
                        return;
                    }
                    reconciler::apply_interaction(
                        &mut session,
                        outcome.interaction,
                        outcome.cinematic_image_url,
                        SessionPhase::Interactive,
                    )
                };
                let speech = self.dispatch(report.effects);

                if let Some((text, mood)) = speech {
                    if self.communication_mode().await == CommunicationMode::Voice {
                        self.speak_reply(session_id.clone(), turn, &text, &mood).await;
                    }
                }

                if report.blueprint_complete {
                    self.finish_story(&session_id).await;
                }
            }
            Err(err) => {
                tracing::error!("Interaction failed: {err}");
                let mut session = self.session.write().await;
                if session.id == session_id {
                    reconciler::fail_session(&mut session, INTERACTION_FAILURE_MESSAGE);
                }
            }
        }
        self.sync_ambient().await;
    }

    /// Voice delivery of a character reply, awaited within the turn.
    /// A restart or a newer turn must not be spoken over.
    async fn speak_reply(&self, session_id: String, turn: u64, text: &str, mood: &str) {
        let Some(audio) = self.gateway.synthesize_speech(text, mood).await else {
            return;
        };
        let session = self.session.read().await;
        if session.id == session_id && session.turn == turn && !self.is_muted() {
            self.port.play_speech(turn, audio);
        }
    }

    /// Requests the closing reflection and transitions into success.
    async fn finish_story(&self, session_id: &str) {
        let (history, blueprint_info) = {
            let session = self.session.read().await;
            (session.history.clone(), session.blueprint_info.clone())
        };
        let Some(blueprint_info) = blueprint_info else {
            return;
        };

        match self.gateway.summarize(&history, &blueprint_info).await {
            Ok(summary) => {
                let mut session = self.session.write().await;
                if session.id == session_id {
                    reconciler::complete_session(&mut session, summary);
                }
            }
            Err(err) => {
                tracing::error!("Success summary failed: {err}");
                let mut session = self.session.write().await;
                if session.id == session_id {
                    reconciler::fail_session(&mut session, INTERACTION_FAILURE_MESSAGE);
                }
            }
        }
    }

    async fn send_demo_message(&self, message: &str) {
        let next = {
            let session = self.session.read().await;
            self.demo_script
                .next_response(session.demo_step)
                .map(|(index, payload)| (index, payload.clone()))
        };

        let Some((index, scripted)) = next else {
            let mut session = self.session.write().await;
            reconciler::conclude_demo(&mut session, message);
            return;
        };

        let (session_id, turn, effects) = {
            let mut session = self.session.write().await;
            let effects = reconciler::begin_turn(&mut session, message, false);
            session.demo_step = index + 1;
            (session.id.clone(), session.turn, effects)
        };
        self.dispatch(effects);

        // Fixed pause so the scripted path feels like a live round trip.
        tokio::time::sleep(DEMO_THINKING_DELAY).await;

        let report = {
            let mut session = self.session.write().await;
            if session.id != session_id || session.turn != turn {
                return;
            }
            let cinematic = scripted
                .cinematic
                .then(|| demo::DEMO_CINEMATIC_IMAGE.to_string());
            reconciler::apply_interaction(
                &mut session,
                scripted.interaction,
                cinematic,
                SessionPhase::Demo,
            )
        };
        self.dispatch(report.effects);

        if report.blueprint_complete {
            let mut session = self.session.write().await;
            if session.id == session_id {
                reconciler::complete_session(&mut session, demo::DEMO_SUCCESS_SUMMARY);
            }
        }
        self.sync_ambient().await;
    }

    /// Seeds the scripted story and opens the guided walkthrough.
    pub async fn start_demo(&self) {
        let effects = {
            let mut session = self.session.write().await;
            if session.phase != SessionPhase::Init {
                return;
            }
            reconciler::enter_demo(&mut session, self.demo_opening.clone())
        };
        // Voice is unavailable in the demo.
        *self.communication_mode.write().await = CommunicationMode::Text;
        self.dispatch(effects);
        self.sync_ambient().await;
    }

    /// Advances the walkthrough overlay one step.
    pub async fn advance_demo_guide(&self) {
        let mut session = self.session.write().await;
        reconciler::advance_guide(&mut session);
    }

    /// Closes the walkthrough and hands the cursor to the story.
    pub async fn end_demo_guide(&self) {
        let mut session = self.session.write().await;
        reconciler::end_guide(&mut session);
    }

    /// Tears the session down to an empty aggregate, from any phase.
    pub async fn restart(&self) {
        {
            let mut session = self.session.write().await;
            session.reset();
        }
        *self.communication_mode.write().await = CommunicationMode::Text;
        self.sync_ambient().await;
    }

    /// Dispatches timed effects after a merge commits. Delayed sounds
    /// are spawned and never gate the turn; a speech effect is handed
    /// back for the caller to route through voice mode.
    fn dispatch(&self, effects: Vec<TimedEffect>) -> Option<(String, String)> {
        let mut speech = None;
        for timed in effects {
            let delay = timed.delay;
            match timed.effect {
                TurnEffect::Sound(sound) => {
                    if delay.is_zero() {
                        if !self.is_muted() {
                            self.port.play_sound(sound);
                        }
                    } else {
                        let port = Arc::clone(&self.port);
                        let muted = Arc::clone(&self.muted);
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            if !muted.load(Ordering::Relaxed) {
                                port.play_sound(sound);
                            }
                        });
                    }
                }
                TurnEffect::Speech { text, mood } => speech = Some((text, mood)),
            }
        }
        speech
    }

    /// Keeps the looping ambient bed in step with the phase machine.
    async fn sync_ambient(&self) {
        let session = self.session.read().await;
        let cue = match session.phase {
            SessionPhase::Loading if session.character.is_none() => {
                Some(MENU_AMBIENT_CUE.to_string())
            }
            SessionPhase::Loading | SessionPhase::Interactive | SessionPhase::Demo => session
                .ambient_sound
                .as_ref()
                .map(|sound| sound.sound_cue.clone()),
            SessionPhase::Init | SessionPhase::Error | SessionPhase::Success => None,
        };
        self.port.set_ambient(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use inklore_core::gateway::{
        GatewayError, InitResponse, InteractOutcome, InteractResponse,
    };
    use inklore_core::story::{
        AmbientAnimation, AmbientSound, BlueprintFragment, BlueprintInfo, BlueprintState,
        Character, CinematicMoment, EmotionState, HistoryItem, HistoryRole, LocationChange,
        SoundEffect, WorldContext, WorldSeed, WorldUpdate,
    };

    // Mock presentation port that records everything it is asked to do.
    #[derive(Default)]
    struct RecordingPort {
        sounds: Mutex<Vec<SoundEffect>>,
        speech_turns: Mutex<Vec<u64>>,
        ambient: Mutex<Vec<Option<String>>>,
    }

    impl PresentationPort for RecordingPort {
        fn play_sound(&self, effect: SoundEffect) {
            self.sounds.lock().unwrap().push(effect);
        }

        fn play_speech(&self, turn: u64, _audio: Vec<u8>) {
            self.speech_turns.lock().unwrap().push(turn);
        }

        fn set_ambient(&self, cue: Option<String>) {
            self.ambient.lock().unwrap().push(cue);
        }
    }

    // Mock gateway fed with scripted results.
    struct MockGateway {
        init: Mutex<Option<InitResponse>>,
        interactions: Mutex<VecDeque<InteractOutcome>>,
        speech_audio: Option<Vec<u8>>,
        summary: String,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                init: Mutex::new(Some(init_response())),
                interactions: Mutex::new(VecDeque::new()),
                speech_audio: None,
                summary: "A patient line of questions rebuilt the design.".to_string(),
            }
        }

        fn failing() -> Self {
            Self {
                init: Mutex::new(None),
                interactions: Mutex::new(VecDeque::new()),
                speech_audio: None,
                summary: String::new(),
            }
        }

        fn queue_interaction(&self, outcome: InteractOutcome) {
            self.interactions.lock().unwrap().push_back(outcome);
        }
    }

    #[async_trait]
    impl StoryGateway for MockGateway {
        async fn init_session(
            &self,
            _image_base64: &str,
            _mime_type: &str,
            _name_hint: &str,
            _vibe_hint: &str,
        ) -> Result<InitResponse, GatewayError> {
            self.init
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| GatewayError::execution_failed("scripted init failure"))
        }

        async fn interact(
            &self,
            _request: InteractRequest,
        ) -> Result<InteractOutcome, GatewayError> {
            self.interactions
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::execution_failed("scripted interact failure"))
        }

        async fn synthesize_speech(&self, _text: &str, _mood_label: &str) -> Option<Vec<u8>> {
            self.speech_audio.clone()
        }

        async fn summarize(
            &self,
            _history: &[HistoryItem],
            _blueprint: &BlueprintInfo,
        ) -> Result<String, GatewayError> {
            Ok(self.summary.clone())
        }
    }

    fn emotions(value: f32) -> EmotionState {
        EmotionState {
            courage: value,
            fear: value,
            curiosity: value,
            happiness: value,
        }
    }

    fn init_response() -> InitResponse {
        InitResponse {
            character: Character {
                name: "Wren".to_string(),
                short_title: "the Patient Tinkerer".to_string(),
                description: "A careful builder.".to_string(),
                archetype: "The Maker".to_string(),
                traits: vec!["Curious".to_string()],
            },
            emotion_state: emotions(50.0),
            mood_label: "Uncertain".to_string(),
            world_seed: WorldSeed {
                world_name: "The Workshop".to_string(),
                world_description: "A cluttered bench.".to_string(),
                starting_location_name: "The Drafting Corner".to_string(),
                starting_location_description: "A stool and a lamp.".to_string(),
            },
            blueprint_state: BlueprintState {
                progress: 0.0,
                understanding: 5.0,
                complexity: 20.0,
            },
            blueprint_info: BlueprintInfo {
                title: "The Rain Garden Plan".to_string(),
                summary: "A watering design with missing details.".to_string(),
                first_fragment: "A sketch corner reads 'gravity feed?'".to_string(),
            },
            ambient_sound: AmbientSound {
                sound_cue: "static_hum".to_string(),
                description: "a low hum".to_string(),
            },
            ambient_animation: AmbientAnimation {
                animation_cue: "drifting_dust".to_string(),
                description: "dust in the light".to_string(),
            },
        }
    }

    fn interaction(progress: f32) -> InteractOutcome {
        InteractOutcome {
            interaction: InteractResponse {
                character_reply: Some("I remember part of it now.".to_string()),
                story_event: Some("Wren pulls a notebook off the shelf.".to_string()),
                blueprint_fragment: Some(BlueprintFragment {
                    from_blueprint: "A margin note: 'one liter per day'.".to_string(),
                    understanding_delta: 10.0,
                    progress_delta: 10.0,
                    complexity_delta: -5.0,
                }),
                updated_emotion_state: emotions(60.0),
                mood_label: "Hopeful".to_string(),
                updated_blueprint_state: BlueprintState {
                    progress,
                    understanding: 40.0,
                    complexity: 15.0,
                },
                world_update: WorldUpdate {
                    world_mood: "Brightening".to_string(),
                    location_change: LocationChange::default(),
                    cinematic_moment: CinematicMoment::default(),
                },
                ambient_sound: AmbientSound {
                    sound_cue: "processor_whirr".to_string(),
                    description: "a whirr".to_string(),
                },
                ambient_animation: AmbientAnimation {
                    animation_cue: "glowing_cave".to_string(),
                    description: "a glow".to_string(),
                },
            },
            cinematic_image_url: None,
        }
    }

    fn upload() -> CharacterUpload {
        CharacterUpload {
            image_base64: "aW1hZ2U=".to_string(),
            mime_type: "image/png".to_string(),
            portrait_ref: "blob:portrait".to_string(),
            name_hint: String::new(),
            vibe_hint: String::new(),
        }
    }

    fn usecase(gateway: MockGateway) -> (SessionUseCase, Arc<RecordingPort>) {
        let port = Arc::new(RecordingPort::default());
        let usecase = SessionUseCase::new(Arc::new(gateway), port.clone());
        (usecase, port)
    }

    #[tokio::test]
    async fn test_create_session_opens_the_story() {
        let (usecase, port) = usecase(MockGateway::new());

        usecase.create_session(upload()).await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Interactive);
        assert_eq!(session.history.len(), 3);
        assert_eq!(session.history[0].role, HistoryRole::User);
        assert_eq!(session.history[0].text, "blob:portrait");
        assert!(port.sounds.lock().unwrap().contains(&SoundEffect::Init));
        assert_eq!(
            port.ambient.lock().unwrap().last().unwrap().as_deref(),
            Some("static_hum")
        );
    }

    #[tokio::test]
    async fn test_create_session_failure_enters_error_phase() {
        let (usecase, port) = usecase(MockGateway::failing());

        usecase.create_session(upload()).await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Error);
        assert_eq!(session.failure_message.as_deref(), Some(INIT_FAILURE_MESSAGE));
        // The ambient bed stops on error.
        assert_eq!(port.ambient.lock().unwrap().last().unwrap(), &None);
    }

    #[tokio::test]
    async fn test_send_message_never_strands_loading() {
        let gateway = MockGateway::new();
        gateway.queue_interaction(interaction(40.0));
        let (usecase, _port) = usecase(gateway);

        usecase.create_session(upload()).await;
        usecase
            .send_message("What was the feed rate?", MessageTarget::Character)
            .await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Interactive);
        // user message + reply + event + clue
        assert_eq!(session.history.len(), 7);
        assert_eq!(session.history[3].role, HistoryRole::User);
        assert_eq!(session.history[4].role, HistoryRole::Character);
    }

    #[tokio::test]
    async fn test_send_message_failure_keeps_user_line() {
        let (usecase, _port) = usecase(MockGateway::new());

        usecase.create_session(upload()).await;
        // No queued interaction: the gateway call fails.
        usecase
            .send_message("Is anyone there?", MessageTarget::Both)
            .await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Error);
        assert_eq!(
            session.failure_message.as_deref(),
            Some(INTERACTION_FAILURE_MESSAGE)
        );
        let last = session.history.last().unwrap();
        assert_eq!(last.role, HistoryRole::User);
        assert_eq!(last.text, "Is anyone there?");
    }

    #[tokio::test]
    async fn test_completed_blueprint_ends_in_success_with_summary() {
        let gateway = MockGateway::new();
        gateway.queue_interaction(interaction(100.0));
        let (usecase, _port) = usecase(gateway);

        usecase.create_session(upload()).await;
        usecase
            .send_message("That must be the last piece!", MessageTarget::Character)
            .await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Success);
        assert_eq!(
            session.success_summary.as_deref(),
            Some("A patient line of questions rebuilt the design.")
        );
    }

    #[tokio::test]
    async fn test_voice_mode_plays_speech_keyed_by_turn() {
        let gateway = MockGateway {
            speech_audio: Some(vec![1, 2, 3]),
            ..MockGateway::new()
        };
        gateway.queue_interaction(interaction(40.0));
        let (usecase, port) = usecase(gateway);

        usecase.create_session(upload()).await;
        usecase
            .set_communication_mode(CommunicationMode::Voice)
            .await;
        usecase
            .send_message("Tell me more.", MessageTarget::Character)
            .await;

        assert_eq!(*port.speech_turns.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_text_mode_never_speaks() {
        let gateway = MockGateway {
            speech_audio: Some(vec![1, 2, 3]),
            ..MockGateway::new()
        };
        gateway.queue_interaction(interaction(40.0));
        let (usecase, port) = usecase(gateway);

        usecase.create_session(upload()).await;
        usecase
            .send_message("Tell me more.", MessageTarget::Character)
            .await;

        assert!(port.speech_turns.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_messages_rejected_outside_input_phases() {
        let (usecase, port) = usecase(MockGateway::new());

        usecase
            .send_message("hello?", MessageTarget::Character)
            .await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Init);
        assert!(session.history.is_empty());
        assert!(port.sounds.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_applies_scripted_responses_regardless_of_input() {
        let (usecase, _port) = usecase(MockGateway::failing());

        usecase.start_demo().await;
        usecase.end_demo_guide().await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Demo);
        assert!(session.is_ready());

        // Arbitrary text still consumes the scripted responses in order.
        usecase
            .send_message("complete nonsense", MessageTarget::World)
            .await;
        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Demo);
        assert_eq!(session.blueprint_state.unwrap().progress, 30.0);

        usecase.send_message("more nonsense", MessageTarget::World).await;
        let session = usecase.snapshot().await;
        assert_eq!(session.blueprint_state.unwrap().progress, 80.0);
        // The cinematic turn substitutes the placeholder illustration.
        assert_eq!(
            session.cinematic_image_url.as_deref(),
            Some(demo::DEMO_CINEMATIC_IMAGE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_completes_into_scripted_success() {
        let (usecase, _port) = usecase(MockGateway::failing());

        usecase.start_demo().await;
        usecase.end_demo_guide().await;
        for _ in 0..3 {
            usecase.send_message("next", MessageTarget::Character).await;
        }

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Success);
        assert_eq!(
            session.success_summary.as_deref(),
            Some(demo::DEMO_SUCCESS_SUMMARY)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_demo_script_concludes_without_merging() {
        use inklore_core::session::DemoStatus;

        // Keep only the first suggested line and scripted response so
        // the demo runs dry before the blueprint completes.
        let mut script = demo::script();
        script.entries.truncate(2);
        let (gateway, port) = (MockGateway::failing(), Arc::new(RecordingPort::default()));
        let usecase = SessionUseCase::with_fixtures(
            Arc::new(gateway),
            port.clone(),
            script,
            demo::opening(),
        );

        usecase.start_demo().await;
        usecase.end_demo_guide().await;
        usecase.send_message("first", MessageTarget::Character).await;

        let before = usecase.snapshot().await;
        usecase.send_message("second", MessageTarget::Character).await;

        let session = usecase.snapshot().await;
        assert_eq!(session.demo_status, DemoStatus::Ended);
        assert_eq!(session.phase, SessionPhase::Demo);
        // Only the literal message and the concluding line were added.
        assert_eq!(session.history.len(), before.history.len() + 2);
        assert_eq!(session.emotion_state, before.emotion_state);
        assert_eq!(session.blueprint_state, before.blueprint_state);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_guide_steps_then_hands_off_to_story() {
        use inklore_core::session::DemoStatus;

        let (usecase, _port) = usecase(MockGateway::failing());
        usecase.start_demo().await;

        usecase.advance_demo_guide().await;
        usecase.advance_demo_guide().await;
        assert_eq!(usecase.snapshot().await.demo_step, 2);

        usecase.end_demo_guide().await;
        let session = usecase.snapshot().await;
        assert_eq!(session.demo_status, DemoStatus::Story);
        assert_eq!(session.demo_step, 0);
    }

    #[tokio::test]
    async fn test_restart_is_total_from_any_phase() {
        let gateway = MockGateway::new();
        gateway.queue_interaction(interaction(100.0));
        let (usecase, port) = usecase(gateway);

        usecase.create_session(upload()).await;
        usecase.send_message("finish it", MessageTarget::Character).await;
        assert_eq!(usecase.snapshot().await.phase, SessionPhase::Success);

        usecase.restart().await;

        let session = usecase.snapshot().await;
        assert_eq!(session.phase, SessionPhase::Init);
        assert!(session.character.is_none());
        assert!(session.history.is_empty());
        assert!(session.success_summary.is_none());
        assert_eq!(port.ambient.lock().unwrap().last().unwrap(), &None);
        assert_eq!(usecase.communication_mode().await, CommunicationMode::Text);
    }

    #[tokio::test]
    async fn test_mute_suppresses_sound_dispatch() {
        let (usecase, port) = usecase(MockGateway::new());

        assert!(usecase.toggle_mute());
        usecase.create_session(upload()).await;

        assert!(port.sounds.lock().unwrap().is_empty());
        assert!(!usecase.toggle_mute());
    }
}
