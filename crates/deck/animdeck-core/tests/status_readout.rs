use animdeck_core::{Deck, DeckConfig, HeadlessHost, NullReadout, StatusReadout};

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
fn reveal_finish_scenario() {
    let (_host, mut deck) = deck_on("reveal");
    deck.controls().finish();
    let r = deck.tick().readout.unwrap();
    assert_eq!(r.current_time, "2000");
    assert_eq!(r.play_state, "finished");
    assert_eq!(r.progress, 100.0);
    assert_eq!(r.progress_label, "100%");
    assert_eq!(r.elapsed, "00:02");
}

#[test]
fn circle_cancel_scenario() {
    let (host, mut deck) = deck_on("svg-circle-radius");
    host.advance(700.0);
    deck.controls().cancel();
    let r = deck.tick().readout.unwrap();
    assert_eq!(r.play_state, "idle");
    assert_eq!(r.current_time, "0");
    deck.tick();
    assert_eq!(
        host.computed_value("svg-circle", "r").and_then(|v| v.as_f64()),
        Some(50.0)
    );
}

#[test]
fn transform_seek_half_scenario() {
    let (_host, mut deck) = deck_on("svg-transform");
    deck.controls().seek_to_fraction(0.5);
    let r = deck.tick().readout.unwrap();
    assert_eq!(r.current_time, "1500");
    assert_eq!(r.duration, "3000");
    assert_eq!(r.total, "00:03");
}

#[test]
fn progress_never_decreases_while_running_forward() {
    let (host, mut deck) = deck_on("svg-css");
    deck.controls().speed_up();
    let mut last = -1.0;
    for _ in 0..30 {
        host.advance(100.0);
        let p = deck.tick().readout.unwrap().progress;
        assert!(p >= last, "{p} < {last}");
        assert!((0.0..=100.0).contains(&p));
        last = p;
    }
    assert_eq!(last, 100.0);
    assert_eq!(deck.poller().surface().len(), 30);
}

#[test]
fn empty_slot_keeps_last_readout() {
    let host = HeadlessHost::new();
    let cfg = DeckConfig {
        initial_preset: None,
        ..DeckConfig::default()
    };
    let mut deck = Deck::new(host, NullReadout, cfg).unwrap();
    assert!(deck.tick().readout.is_none());
    assert!(deck.poller().last().is_none());
}

#[test]
fn finish_is_reported_once() {
    let (host, mut deck) = deck_on("reveal");
    host.advance(2100.0);
    let first = deck.tick();
    assert_eq!(first.events.len(), 1);
    host.advance(100.0);
    assert!(deck.tick().events.is_empty());
    assert_eq!(deck.poller().interval_ms(), 100);
}
