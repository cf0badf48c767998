//! Control Surface: transport commands against whatever session is active.
//!
//! Commands resolve the session at call time through a [`SessionSource`].
//! With no session they do nothing and return `false`.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::DeckConfig;
use crate::error::DeckError;
use crate::host::PlaybackSession;
use crate::manager::SessionReader;

/// Where a control surface finds its session.
pub trait SessionSource {
    type Session: PlaybackSession;

    fn with_active<R>(&self, f: impl FnOnce(&mut Self::Session) -> R) -> Option<R>;
}

impl<S: PlaybackSession> SessionSource for SessionReader<S> {
    type Session = S;

    fn with_active<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        SessionReader::with_active(self, f)
    }
}

/// A single session bound at wiring time. Later switches are not seen.
#[derive(Debug)]
pub struct FixedSession<S> {
    session: Rc<RefCell<S>>,
}

impl<S> FixedSession<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
        }
    }

    pub fn shared(session: Rc<RefCell<S>>) -> Self {
        Self { session }
    }
}

impl<S> Clone for FixedSession<S> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
        }
    }
}

impl<S: PlaybackSession> SessionSource for FixedSession<S> {
    type Session = S;

    fn with_active<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut guard = self.session.try_borrow_mut().ok()?;
        Some(f(&mut *guard))
    }
}

/// Serializable form of every control action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    Reverse,
    Cancel,
    Finish,
    Seek { fraction: f64 },
    SeekHalf,
    Speed { factor: f64 },
    SpeedUp,
    SpeedDown,
    TimelineClick { x: f64, width: f64 },
}

fn report(action: &str, result: Result<(), DeckError>) {
    if let Err(e) = result {
        log::warn!("{action} refused: {e}");
    }
}

#[derive(Debug, Clone)]
pub struct ControlSurface<Src> {
    source: Src,
    speed_up_factor: f64,
    speed_down_factor: f64,
    seek_shortcut_fraction: f64,
}

impl<Src: SessionSource> ControlSurface<Src> {
    pub fn new(source: Src) -> Self {
        Self::with_config(source, &DeckConfig::default())
    }

    pub fn with_config(source: Src, cfg: &DeckConfig) -> Self {
        Self {
            source,
            speed_up_factor: cfg.speed_up_factor,
            speed_down_factor: cfg.speed_down_factor,
            seek_shortcut_fraction: cfg.seek_shortcut_fraction,
        }
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    pub fn apply(&self, command: &Command) -> bool {
        match *command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Reverse => self.reverse(),
            Command::Cancel => self.cancel(),
            Command::Finish => self.finish(),
            Command::Seek { fraction } => self.seek_to_fraction(fraction),
            Command::SeekHalf => self.seek_half(),
            Command::Speed { factor } => self.speed_multiply(factor),
            Command::SpeedUp => self.speed_up(),
            Command::SpeedDown => self.speed_down(),
            Command::TimelineClick { x, width } => self.seek_from_click(x, width),
        }
    }

    pub fn play(&self) -> bool {
        self.source
            .with_active(|s| {
                report("play", s.play());
                log::info!("play");
            })
            .is_some()
    }

    pub fn pause(&self) -> bool {
        self.source
            .with_active(|s| {
                report("pause", s.pause());
                log::info!("pause");
            })
            .is_some()
    }

    pub fn reverse(&self) -> bool {
        self.source
            .with_active(|s| {
                report("reverse", s.reverse());
                log::info!("reverse");
            })
            .is_some()
    }

    pub fn cancel(&self) -> bool {
        self.source
            .with_active(|s| {
                s.cancel();
                log::info!("cancel");
            })
            .is_some()
    }

    pub fn finish(&self) -> bool {
        self.source
            .with_active(|s| {
                report("finish", s.finish());
                log::info!("finish");
            })
            .is_some()
    }

    /// Set current time to `fraction × duration`. The fraction is not clamped;
    /// non-finite fractions are rejected and return `false`.
    pub fn seek_to_fraction(&self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            log::warn!("seek ignored: fraction {fraction} is not finite");
            return false;
        }
        self.source
            .with_active(|s| {
                let time = s.duration_ms() * fraction;
                s.set_current_time(time);
                log::info!("seek to {:.1}% ({:.0}ms)", fraction * 100.0, time);
            })
            .is_some()
    }

    pub fn seek_half(&self) -> bool {
        self.seek_to_fraction(self.seek_shortcut_fraction)
    }

    /// Seek from a click at `x` on a timeline track `width` wide.
    pub fn seek_from_click(&self, x: f64, width: f64) -> bool {
        self.seek_to_fraction(x / width)
    }

    /// Multiply the playback rate by `factor`. Rates compound and are not
    /// bounded.
    pub fn speed_multiply(&self, factor: f64) -> bool {
        if !factor.is_finite() {
            log::warn!("speed change ignored: factor {factor} is not finite");
            return false;
        }
        self.source
            .with_active(|s| {
                let rate = s.playback_rate() * factor;
                s.set_playback_rate(rate);
                log::info!("playback rate now {rate}x");
            })
            .is_some()
    }

    pub fn speed_up(&self) -> bool {
        self.speed_multiply(self.speed_up_factor)
    }

    pub fn speed_down(&self) -> bool {
        self.speed_multiply(self.speed_down_factor)
    }
}
