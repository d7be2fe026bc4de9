//! Property tests over random stimulus sequences.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use cookflow_core::{
    Config, CookingSession, Gesture, GestureReading, Phase, SessionContext, SessionEvent,
    SessionStateMachine, Step, TimelineEventKind,
};

fn navigation_event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        Just(SessionEvent::Init),
        Just(SessionEvent::Loaded),
        Just(SessionEvent::LoadError {
            message: "offline".into()
        }),
        Just(SessionEvent::Start),
        Just(SessionEvent::Pause),
        Just(SessionEvent::Resume),
        Just(SessionEvent::NextStep),
        Just(SessionEvent::PrevStep),
        Just(SessionEvent::StepComplete),
        Just(SessionEvent::RecipeComplete),
        Just(SessionEvent::TimerDone),
        Just(SessionEvent::VoiceCommand { text: "next".into() }),
        Just(SessionEvent::Gesture {
            gesture: Gesture::ThumbUp,
            confidence: 0.9
        }),
        Just(SessionEvent::SetVoiceReady { ready: true }),
        Just(SessionEvent::SetDetectorReady { ready: false }),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    proptest::sample::select(Gesture::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Input {
    Event(SessionEvent),
    Gesture(Gesture),
    Voice(&'static str),
    Tick,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        3 => Just(Input::Tick),
        2 => proptest::sample::select(vec![
            SessionEvent::Start,
            SessionEvent::Pause,
            SessionEvent::Resume,
            SessionEvent::NextStep,
            SessionEvent::PrevStep,
        ])
        .prop_map(Input::Event),
        1 => gesture().prop_map(Input::Gesture),
        1 => proptest::sample::select(vec!["next", "back", "pause", "resume", "hmm"])
            .prop_map(Input::Voice),
    ]
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec((0u64..4, any::<bool>(), any::<bool>()), 1..6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (duration, auto, deduct))| {
                let mut step = Step::new(format!("s{i}"), format!("Step {i}"), duration);
                step.auto_advance = auto;
                if deduct {
                    step = step.with_ingredient("salt", 1.0, "g");
                }
                step
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn next_step_counts_up_then_completes(total in 1usize..30, presses in 0usize..40) {
        let mut m = SessionStateMachine::new();
        m.send(SessionEvent::SetTotalSteps { total });
        m.send(SessionEvent::Start);

        for _ in 0..presses {
            let before = m.current_step();
            let was_cooking = m.phase() == Phase::Cooking;
            let had_next = m.context().has_next_step();
            let accepted = m.send(SessionEvent::NextStep).is_some();

            if !was_cooking {
                prop_assert!(!accepted);
                prop_assert_eq!(m.phase(), Phase::Complete);
                prop_assert_eq!(m.current_step(), before);
            } else if had_next {
                prop_assert_eq!(m.current_step(), before + 1);
                prop_assert_eq!(m.phase(), Phase::Cooking);
            } else {
                prop_assert_eq!(m.phase(), Phase::Complete);
                prop_assert_eq!(m.current_step(), total - 1);
            }
        }
        prop_assert_eq!(m.phase() == Phase::Complete, presses >= total);
    }

    #[test]
    fn gestures_inside_cooldown_are_rejected(delta_ms in 0i64..=1200, later in gesture()) {
        let mut m = SessionStateMachine::new();
        m.send(SessionEvent::SetTotalSteps { total: 2 });
        m.send(SessionEvent::Start);
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        m.send_at(SessionEvent::Gesture { gesture: Gesture::Victory, confidence: 1.0 }, t0);

        let rejected = m.send_at(
            SessionEvent::Gesture { gesture: later, confidence: 1.0 },
            t0 + Duration::milliseconds(delta_ms),
        );
        prop_assert!(rejected.is_none());
        prop_assert_eq!(m.context().last_gesture, Some(Gesture::Victory));
        prop_assert_eq!(m.context().last_gesture_at, Some(t0));
    }

    #[test]
    fn gestures_after_cooldown_are_accepted(delta_ms in 1201i64..60_000, later in gesture()) {
        let mut m = SessionStateMachine::new();
        m.send(SessionEvent::Start);
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        m.send_at(SessionEvent::Gesture { gesture: Gesture::Victory, confidence: 1.0 }, t0);

        let t1 = t0 + Duration::milliseconds(delta_ms);
        let later_event = SessionEvent::Gesture { gesture: later, confidence: 1.0 };
        prop_assert!(m.send_at(later_event, t1).is_some());
        prop_assert_eq!(m.context().last_gesture, Some(later));
        prop_assert_eq!(m.context().last_gesture_at, Some(t1));
    }

    #[test]
    fn machine_invariants_hold(total in 1usize..8, events in proptest::collection::vec(navigation_event(), 0..60)) {
        let mut m = SessionStateMachine::new();
        m.send(SessionEvent::SetTotalSteps { total });
        for event in events {
            let was_complete = m.is_complete();
            let before = m.context().clone();
            m.send(event);

            prop_assert_ne!(m.phase(), Phase::StepTransitioning);
            if matches!(m.phase(), Phase::Cooking | Phase::Paused | Phase::Complete) {
                prop_assert!(m.current_step() < total);
            }
            if was_complete {
                prop_assert_eq!(m.phase(), Phase::Complete);
                prop_assert_eq!(m.current_step(), before.current_step);
            }
        }
    }

    #[test]
    fn exit_from_anywhere_resets(total in 1usize..8, events in proptest::collection::vec(navigation_event(), 0..40)) {
        let mut m = SessionStateMachine::new();
        m.send(SessionEvent::SetTotalSteps { total });
        for event in events {
            m.send(event);
        }
        prop_assert!(m.send(SessionEvent::Exit).is_some());
        prop_assert_eq!(m.phase(), Phase::Idle);
        prop_assert_eq!(m.context(), &SessionContext::default());
        m.send(SessionEvent::Init);
        prop_assert_eq!(m.current_step(), 0);
    }

    #[test]
    fn cooking_session_stays_in_lockstep(steps in steps(), inputs in proptest::collection::vec(input(), 0..80)) {
        let step_count = steps.len();
        let mut session = CookingSession::new(&Config::default());
        session.load_steps(steps);

        let mut recipe_completions = 0;
        let mut deductions = 0;
        let mut completions = 0;
        for input in inputs {
            let outcome = match input {
                Input::Event(event) => session.handle(event),
                Input::Gesture(gesture) => session.handle_gesture(GestureReading { gesture, confidence: 0.99 }),
                Input::Voice(text) => session.handle_voice(text),
                Input::Tick => session.tick(),
            };
            recipe_completions += outcome.events.iter().filter(|e| e.kind == TimelineEventKind::RecipeComplete).count();
            deductions += outcome.events.iter().filter(|e| e.kind == TimelineEventKind::InventoryDeduct).count();
            completions += outcome.events.iter().filter(|e| e.kind == TimelineEventKind::StepComplete).count();

            prop_assert!(session.in_lockstep());
            prop_assert!(session.engine().current_index() < step_count);
            if session.phase() == Phase::Complete {
                prop_assert!(!session.engine().is_running());
            }
        }
        prop_assert!(recipe_completions <= 1);
        prop_assert!(deductions <= completions);
        prop_assert!(deductions <= step_count);
    }
}
