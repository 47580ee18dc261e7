//! Session controller driven through its channels, with the test standing in
//! for the narration pipeline

mod common;

use aijolot::audio::AudioHandle;
use aijolot::integration::{
    NarrationCommand, NarrationEvent, NotificationLevel, RequestTag, ScreenMode,
    SessionController,
};
use aijolot::location::{LocationSource, ResolvedLocation};
use aijolot::messages::{RevealState, Sender};
use aijolot::narration::{
    InformationStyle, InitialNarration, NarrationContext, NarrationResult,
};
use aijolot::places::PlaceSuggestion;
use aijolot::session::ScrollRequest;
use aijolot::speech::{CaptureEvent, ChannelCapture, VoiceCapture};
use aijolot::NarratorError;
use common::controller;
use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

fn initial_tag(commands: &Receiver<NarrationCommand>) -> RequestTag {
    match commands.try_recv() {
        Ok(NarrationCommand::Initial { tag, .. }) => tag,
        other => panic!("expected an initial request, got {:?}", other),
    }
}

fn follow_up(commands: &Receiver<NarrationCommand>) -> (RequestTag, String, String) {
    loop {
        match commands.try_recv() {
            Ok(NarrationCommand::FollowUp {
                tag,
                context,
                question,
                ..
            }) => return (tag, context.location.description().to_string(), question),
            Ok(_) => continue,
            Err(e) => panic!("expected a follow-up request: {}", e),
        }
    }
}

fn initial_ready(tag: RequestTag, place: &str, text: &str, audio: bool) -> NarrationEvent {
    NarrationEvent::InitialReady {
        tag,
        narration: InitialNarration {
            result: NarrationResult {
                text: text.to_string(),
                audio: audio.then(|| AudioHandle::mpeg(vec![1, 2, 3])),
                warning: None,
            },
            context: NarrationContext {
                location: ResolvedLocation::new(place, LocationSource::Text, None),
                language: "en".to_string(),
                style: InformationStyle::Curious,
                user_id: "3f2b9c1e-0000-4000-8000-000000000000".to_string(),
                coordinates: None,
            },
        },
    }
}

fn answer(tag: RequestTag, text: &str) -> NarrationEvent {
    NarrationEvent::FollowUpReady {
        tag,
        result: NarrationResult {
            text: text.to_string(),
            audio: None,
            warning: None,
        },
    }
}

/// Form submitted and narrated; returns the controller in conversing mode
fn conversing(
    place: &str,
) -> (
    SessionController,
    Receiver<NarrationCommand>,
    crossbeam_channel::Sender<NarrationEvent>,
) {
    let (mut controller, commands, events) = controller();
    controller.set_query(place);
    assert!(controller.submit_form());
    let tag = loop {
        match commands.try_recv() {
            Ok(NarrationCommand::Initial { tag, .. }) => break tag,
            Ok(_) => continue,
            Err(e) => panic!("no initial request: {}", e),
        }
    };
    events
        .send(initial_ready(tag, place, "Once upon a time.", true))
        .unwrap();
    controller.poll_events();
    (controller, commands, events)
}

#[test]
fn test_narrative_switches_to_conversation() {
    let (mut controller, commands, events) = controller();
    assert_eq!(controller.mode(), ScreenMode::CollectingInput);

    controller.set_query("x");
    assert!(controller.submit_form());
    assert!(controller.is_narrating());
    let tag = initial_tag(&commands);

    events
        .send(initial_ready(tag, "x", "Hi", false))
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.mode(), ScreenMode::Conversing);
    assert!(!controller.is_narrating());
    assert_eq!(controller.context().unwrap().location.description(), "x");

    let turns = controller.session().turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].sender, Sender::Assistant);
    assert_eq!(turns[0].reveal_state, RevealState::Revealing);
    assert_eq!(
        controller.notifications.last().map(|n| n.title.as_str()),
        Some("Narrative ready")
    );
}

#[test]
fn test_reveal_settles_after_ticks() {
    let (mut controller, _commands, _events) = conversing("Lisbon");
    let start = Instant::now();

    let total: usize = (1..=200)
        .map(|ms| controller.tick(start + Duration::from_millis(ms * 30)))
        .sum();
    assert_eq!(total, "Once upon a time.".chars().count());

    let turn = controller.session().initial_narrative().unwrap();
    assert!(turn.is_settled());
    assert_eq!(turn.visible_text(), "Once upon a time.");
    assert!(controller.session().headline_audio().is_some());
}

#[test]
fn test_view_is_asked_to_scroll_when_turns_change() {
    let (mut controller, commands, _events) = conversing("Lisbon");
    assert_eq!(controller.take_scroll_request(), Some(ScrollRequest::Bottom));

    let start = Instant::now();
    controller.tick(start + Duration::from_secs(60));
    assert_eq!(controller.take_scroll_request(), Some(ScrollRequest::Bottom));
    assert_eq!(controller.take_scroll_request(), None);

    controller.question_input = "Where is the castle?".to_string();
    controller.submit_question().unwrap();
    follow_up(&commands);
    assert!(controller.is_answering());
    assert_eq!(controller.take_scroll_request(), Some(ScrollRequest::Bottom));
}

#[test]
fn test_follow_up_carries_the_resolved_place() {
    let (mut controller, commands, events) = conversing("Lisbon");
    assert!(controller.can_send_question());

    controller.question_input = "  What is the tram route?  ".to_string();
    controller.submit_question().unwrap();
    assert!(controller.question_input.is_empty());
    assert!(controller.is_answering());
    assert!(!controller.can_send_question());

    let (tag, place, question) = follow_up(&commands);
    assert_eq!(place, "Lisbon");
    assert_eq!(question, "What is the tram route?");

    let turns = controller.session().turns();
    assert_eq!(turns.last().unwrap().sender, Sender::User);
    assert_eq!(turns.last().unwrap().text, "What is the tram route?");

    events.send(answer(tag, "Tram 28.")).unwrap();
    controller.poll_events();

    assert!(!controller.is_answering());
    let turns = controller.session().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2].text, "Tram 28.");
    // The new answer took over the typewriter; the narrative is shown in full
    assert!(turns[0].is_settled());
    assert_eq!(turns[2].reveal_state, RevealState::Revealing);
}

#[test]
fn test_only_one_follow_up_outstanding() {
    let (mut controller, commands, _events) = conversing("Rome");

    controller.question_input = "First?".to_string();
    controller.submit_question().unwrap();
    controller.question_input = "Second?".to_string();
    assert!(matches!(
        controller.submit_question(),
        Err(NarratorError::FollowUpPending)
    ));

    let follow_ups = commands
        .try_iter()
        .filter(|c| matches!(c, NarrationCommand::FollowUp { .. }))
        .count();
    assert_eq!(follow_ups, 1);
    assert_eq!(controller.question_input, "Second?");
    assert_eq!(controller.session().len(), 2);
}

#[test]
fn test_blank_question_is_rejected() {
    let (mut controller, commands, _events) = conversing("Rome");

    controller.question_input = "   ".to_string();
    assert!(matches!(
        controller.submit_question(),
        Err(NarratorError::EmptyQuestion)
    ));
    assert!(commands
        .try_iter()
        .all(|c| !matches!(c, NarrationCommand::FollowUp { .. })));
    assert_eq!(controller.session().len(), 1);
}

#[test]
fn test_stale_answer_after_new_exploration_is_dropped() {
    let (mut controller, commands, _events) = conversing("Cairo");

    controller.question_input = "Who built the pyramids?".to_string();
    controller.submit_question().unwrap();
    let (tag, _, _) = follow_up(&commands);

    controller.explore_new_location();
    assert_eq!(controller.mode(), ScreenMode::CollectingInput);
    assert!(controller.session().is_empty());
    assert!(controller.context().is_none());

    let before = controller.notifications.len();
    assert!(!controller.handle_event(answer(tag, "Too late."), Instant::now()));
    assert!(controller.session().is_empty());
    assert_eq!(controller.notifications.len(), before);
}

#[test]
fn test_stale_narrative_is_dropped() {
    let (mut controller, commands, _events) = controller();
    controller.set_query("Oslo");
    controller.submit_form();
    let tag = initial_tag(&commands);

    controller.explore_new_location();
    assert!(!controller.handle_event(
        initial_ready(tag, "Oslo", "Fjords.", false),
        Instant::now()
    ));
    assert_eq!(controller.mode(), ScreenMode::CollectingInput);
    assert!(controller.can_submit_form());
}

#[test]
fn test_failure_re_enables_the_form() {
    let (mut controller, commands, events) = controller();
    controller.set_query("Atlantis");
    controller.submit_form();
    let tag = initial_tag(&commands);

    events
        .send(NarrationEvent::Failed {
            tag,
            error: NarratorError::NarrationServiceFailed("status 500: boom".to_string()),
        })
        .unwrap();
    controller.poll_events();

    assert!(controller.can_submit_form());
    assert_eq!(controller.mode(), ScreenMode::CollectingInput);
    let note = controller.notifications.last().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
}

#[test]
fn test_audio_warning_is_shown_but_narrative_kept() {
    let (mut controller, commands, events) = controller();
    controller.set_query("Vienna");
    controller.submit_form();
    let tag = initial_tag(&commands);

    let mut event = initial_ready(tag, "Vienna", "Waltzes.", false);
    if let NarrationEvent::InitialReady { narration, .. } = &mut event {
        narration.result.warning = Some(NarratorError::SynthesisFailed("quota".to_string()));
    }
    events.send(event).unwrap();
    controller.poll_events();

    assert_eq!(controller.mode(), ScreenMode::Conversing);
    assert!(controller
        .notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Warning));
}

#[test]
fn test_transcript_is_submitted_as_question() {
    let (capture, controls, recognizer) = ChannelCapture::new();
    let (controller, commands, events) = conversing("Kyoto");
    let mut controller = controller.with_capture(VoiceCapture::new(Box::new(capture)));

    controller.toggle_recording();
    assert!(controller.capture().is_recording());
    assert!(!controller.can_send_question());
    assert!(controls.try_recv().is_ok());

    recognizer
        .send(CaptureEvent::Transcript("Which temple is oldest?".to_string()))
        .unwrap();
    controller.poll_events();

    assert!(!controller.capture().is_recording());
    let (tag, place, question) = follow_up(&commands);
    assert_eq!(place, "Kyoto");
    assert_eq!(question, "Which temple is oldest?");

    events.send(answer(tag, "Kiyomizu-dera.")).unwrap();
    controller.poll_events();
    assert_eq!(controller.session().len(), 3);
}

#[test]
fn test_transcript_while_answering_is_kept_and_notified() {
    let (capture, _controls, recognizer) = ChannelCapture::new();
    let (controller, commands, _events) = conversing("Kyoto");
    let mut controller = controller.with_capture(VoiceCapture::new(Box::new(capture)));

    controller.question_input = "Who founded the city?".to_string();
    controller.submit_question().unwrap();
    follow_up(&commands);

    controller.toggle_recording();
    recognizer
        .send(CaptureEvent::Transcript("And the shrines?".to_string()))
        .unwrap();
    controller.poll_events();

    assert!(commands
        .try_iter()
        .all(|c| !matches!(c, NarrationCommand::FollowUp { .. })));
    assert_eq!(controller.question_input, "And the shrines?");
    let note = controller.notifications.last().unwrap();
    assert_eq!(note.level, NotificationLevel::Warning);
    assert_eq!(note.message, NarratorError::FollowUpPending.user_message());
}

#[test]
fn test_follow_up_audio_warning_keeps_the_answer() {
    let (mut controller, commands, events) = conversing("Lisbon");
    controller.question_input = "What happened in 1755?".to_string();
    controller.submit_question().unwrap();
    let (tag, _, _) = follow_up(&commands);

    events
        .send(NarrationEvent::FollowUpReady {
            tag,
            result: NarrationResult {
                text: "A great earthquake.".to_string(),
                audio: None,
                warning: Some(NarratorError::SynthesisFailed("quota".to_string())),
            },
        })
        .unwrap();
    controller.poll_events();

    assert!(!controller.is_answering());
    let turns = controller.session().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2].sender, Sender::Assistant);
    assert_eq!(turns[2].text, "A great earthquake.");
    assert!(turns[2].audio.is_none());
    assert!(controller
        .notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Warning && n.title == "Audio unavailable"));
    assert!(controller.can_send_question());
}

#[test]
fn test_denied_microphone_notifies() {
    let (capture, _controls, recognizer) = ChannelCapture::new();
    let (controller, _commands, _events) = conversing("Kyoto");
    let mut controller = controller.with_capture(VoiceCapture::new(Box::new(capture)));

    controller.toggle_recording();
    recognizer.send(CaptureEvent::PermissionDenied).unwrap();
    controller.poll_events();

    assert!(!controller.capture().is_recording());
    assert!(matches!(
        controller.capture().session().last_error,
        Some(NarratorError::CapturePermissionDenied)
    ));
    assert_eq!(
        controller.notifications.last().map(|n| n.level),
        Some(NotificationLevel::Error)
    );
}

#[test]
fn test_suggestions_follow_the_latest_query() {
    let (mut controller, commands, events) = controller();
    controller.set_query("Ba");
    let first = match commands.try_recv() {
        Ok(NarrationCommand::Autocomplete { tag, .. }) => tag,
        other => panic!("expected autocomplete, got {:?}", other),
    };
    controller.set_query("Bar");
    let second = match commands.try_recv() {
        Ok(NarrationCommand::Autocomplete { tag, .. }) => tag,
        other => panic!("expected autocomplete, got {:?}", other),
    };

    let place = |name: &str| PlaceSuggestion {
        description: name.to_string(),
        id: name.to_lowercase(),
    };
    events
        .send(NarrationEvent::Suggestions {
            tag: second,
            result: Ok(vec![place("Barcelona, Spain")]),
        })
        .unwrap();
    events
        .send(NarrationEvent::Suggestions {
            tag: first,
            result: Ok(vec![place("Bath, UK")]),
        })
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.suggestions().len(), 1);
    assert_eq!(controller.suggestions()[0].description, "Barcelona, Spain");

    let chosen = controller.suggestions()[0].clone();
    controller.select_suggestion(&chosen);
    assert_eq!(controller.form().query_text(), "Barcelona, Spain");
    assert!(controller.suggestions().is_empty());
}

#[test]
fn test_lookup_failure_leaves_no_suggestions() {
    let (mut controller, commands, events) = controller();
    controller.set_query("Pa");
    let tag = match commands.try_recv() {
        Ok(NarrationCommand::Autocomplete { tag, .. }) => tag,
        other => panic!("expected autocomplete, got {:?}", other),
    };

    events
        .send(NarrationEvent::Suggestions {
            tag,
            result: Err(NarratorError::AutocompleteFailed("REQUEST_DENIED".to_string())),
        })
        .unwrap();
    controller.poll_events();

    assert!(controller.suggestions().is_empty());
    assert!(controller.notifications.is_empty());
}

#[test]
fn test_language_change_reaches_follow_ups() {
    let (mut controller, commands, _events) = conversing("Paris");
    controller.set_language("fr");

    controller.question_input = "Quelle heure?".to_string();
    controller.submit_question().unwrap();

    let context = commands
        .try_iter()
        .find_map(|c| match c {
            NarrationCommand::FollowUp { context, .. } => Some(context),
            _ => None,
        })
        .unwrap();
    assert_eq!(context.language, "fr");
    assert_eq!(controller.settings().language, "fr");
}

#[test]
fn test_explore_restores_default_style() {
    let (controller, _commands, _events) = conversing("Dublin");
    let mut controller = controller.with_default_style(InformationStyle::Legends);
    controller.set_style(InformationStyle::Historical);

    controller.explore_new_location();

    assert_eq!(controller.form().information_style, "Legends");
    assert!(controller.form().location.is_none());
    assert!(controller.question_input.is_empty());
}
