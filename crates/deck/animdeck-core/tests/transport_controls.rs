use animdeck_core::{
    Command, Deck, DeckConfig, HeadlessHost, PlayState, PlaybackSession, PropertyValue,
    StatusReadout,
};
use approx::assert_relative_eq;

fn deck_on(preset: &str) -> (HeadlessHost, Deck<HeadlessHost, Vec<StatusReadout>>) {
    let host = HeadlessHost::demo();
    let cfg = DeckConfig {
        initial_preset: None,
        ..DeckConfig::default()
    };
    let mut deck = Deck::new(host.clone(), Vec::new(), cfg).unwrap();
    deck.switch_to(preset).unwrap();
    (host, deck)
}

#[test]
fn seek_fraction_maps_onto_duration() {
    let (_host, deck) = deck_on("reveal");
    assert!(deck.controls().seek_to_fraction(0.5));
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(1000.0)));
    assert!(deck.controls().seek_to_fraction(1.0));
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(2000.0)));
}

#[test]
fn seek_is_not_clamped() {
    let (_host, mut deck) = deck_on("reveal");
    assert!(deck.controls().seek_to_fraction(1.5));
    let r = deck.tick().readout.unwrap();
    assert_eq!(r.current_time, "3000");
    assert_eq!(r.play_state, "finished");
    assert_eq!(r.progress_label, "100%");
}

#[test]
fn timeline_click_seeks_proportionally() {
    let (_host, deck) = deck_on("svg-transform");
    assert!(deck.controls().seek_from_click(60.0, 240.0));
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(750.0)));
}

#[test]
fn speed_shortcuts_compose_back_to_original() {
    let (_host, deck) = deck_on("svg-css");
    let controls = deck.controls();
    assert!(controls.speed_up());
    assert_relative_eq!(deck.manager().with_active(|s| s.playback_rate()).unwrap(), 2.0);
    assert!(controls.speed_down());
    assert_relative_eq!(deck.manager().with_active(|s| s.playback_rate()).unwrap(), 1.0);
}

#[test]
fn speed_compounds_without_bound() {
    let (_host, deck) = deck_on("svg-css");
    for _ in 0..10 {
        deck.controls().speed_up();
    }
    assert_relative_eq!(
        deck.manager().with_active(|s| s.playback_rate()).unwrap(),
        1024.0
    );
}

#[test]
fn pause_then_play_resumes_from_same_time() {
    let (host, deck) = deck_on("svg-circle-radius");
    host.advance(400.0);
    deck.controls().pause();
    host.advance(900.0);
    assert_eq!(
        deck.manager().with_active(|s| (s.play_state(), s.current_time())),
        Some((PlayState::Paused, Some(400.0)))
    );
    deck.controls().play();
    host.advance(100.0);
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(500.0)));
}

#[test]
fn reverse_at_end_heads_back_to_start() {
    let (host, deck) = deck_on("svg-circle-radius");
    deck.controls().finish();
    deck.controls().reverse();
    host.advance(500.0);
    assert_eq!(
        deck.manager().with_active(|s| (s.play_state(), s.current_time())),
        Some((PlayState::Running, Some(1500.0)))
    );
}

#[test]
fn reverse_mid_playback_runs_back_from_current_time() {
    let (host, deck) = deck_on("svg-circle-radius");
    host.advance(500.0);
    assert!(deck.controls().reverse());
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(500.0)));
    host.advance(100.0);
    assert_eq!(
        deck.manager().with_active(|s| (s.play_state(), s.current_time())),
        Some((PlayState::Running, Some(400.0)))
    );
}

#[test]
fn reverse_after_speed_up_keeps_magnitude() {
    let (host, deck) = deck_on("svg-circle-radius");
    host.advance(500.0);
    assert!(deck.controls().speed_multiply(2.0));
    host.advance(100.0);
    assert!(deck.controls().reverse());
    assert_relative_eq!(deck.manager().with_active(|s| s.playback_rate()).unwrap(), -2.0);
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(700.0)));
    host.advance(100.0);
    assert_eq!(
        deck.manager().with_active(|s| (s.play_state(), s.current_time())),
        Some((PlayState::Running, Some(500.0)))
    );
}

#[test]
fn cancel_reverts_target() {
    let (host, deck) = deck_on("svg-circle-radius");
    host.advance(1000.0);
    assert!(deck.controls().cancel());
    assert_eq!(
        host.computed_value("svg-circle", "r"),
        Some(PropertyValue::Number(50.0))
    );
}

#[test]
fn controls_follow_the_latest_switch() {
    let (_host, mut deck) = deck_on("reveal");
    deck.switch_to("svg-transform").unwrap();
    assert!(deck.controls().apply(&Command::SeekHalf));
    assert_eq!(deck.manager().with_active(|s| s.current_time()), Some(Some(1500.0)));
}
