use serde_json::to_string_pretty;

use animdeck_core::{Command, Deck, DeckConfig, HeadlessHost, StatusReadout};

/// Drive the deck against the in-memory host and print what the status
/// panel would show.
fn main() -> anyhow::Result<()> {
    let host = HeadlessHost::demo();
    let cfg = DeckConfig::from_json(r#"{ "initial_preset": "svg-transform" }"#)?;
    let step = f64::from(cfg.poll_interval_ms);
    let mut deck = Deck::new(host.clone(), Vec::<StatusReadout>::new(), cfg)?;
    deck.start()?;

    let script = [
        (5, Command::SpeedUp),
        (5, Command::Pause),
        (2, Command::SeekHalf),
        (2, Command::Play),
        (10, Command::Reverse),
        (3, Command::Finish),
    ];
    for (ticks, cmd) in script {
        for _ in 0..ticks {
            host.advance(step);
            deck.tick();
        }
        deck.controls().apply(&cmd);
        let tick = deck.tick();
        if let Some(r) = tick.readout {
            println!(
                "{:<12} {:>9} {:>5}ms {:>4} {}x  {}",
                format!("{cmd:?}"),
                r.play_state,
                r.current_time,
                r.progress_label,
                r.playback_rate,
                host.computed_value("svg-transform-rect", "transform")
                    .map(|v| format!("{v:?}"))
                    .unwrap_or_default()
            );
        }
    }

    deck.switch_to("svg-circle-radius")?;
    host.advance(step);
    let last = deck.tick();
    println!("Final readout:\n{}", to_string_pretty(&last.readout)?);
    Ok(())
}
