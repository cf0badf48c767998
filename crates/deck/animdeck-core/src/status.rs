//! Status Poller: periodic read-and-render of the active session's timing.

use serde::{Deserialize, Serialize};

use crate::config::DeckConfig;
use crate::control::SessionSource;
use crate::host::{PlayState, PlaybackSession};

/// Raw timing fields read from a session in one poll.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub play_state: PlayState,
    /// Unset current time reads as 0.
    pub current_time_ms: f64,
    pub duration_ms: f64,
    pub playback_rate: f64,
}

impl StatusSnapshot {
    pub fn read<S: PlaybackSession + ?Sized>(session: &S) -> Self {
        Self {
            play_state: session.play_state(),
            current_time_ms: session.current_time().unwrap_or(0.0),
            duration_ms: session.duration_ms(),
            playback_rate: session.playback_rate(),
        }
    }

    /// Progress in percent, clamped to [0, 100]; 0 for an empty timeline.
    pub fn progress_percent(&self) -> f64 {
        if self.duration_ms > 0.0 {
            (self.current_time_ms / self.duration_ms * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Format milliseconds as `mm:ss`, flooring to whole seconds.
pub fn format_mm_ss(ms: f64) -> String {
    let total_seconds = if ms.is_finite() && ms > 0.0 {
        (ms / 1000.0).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Text the readout surface displays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusReadout {
    pub snapshot: StatusSnapshot,
    pub progress: f64,
    /// CSS width of the progress bar, e.g. `"37.5%"`.
    pub progress_width: String,
    /// Whole-percent label, e.g. `"38%"`.
    pub progress_label: String,
    pub elapsed: String,
    pub total: String,
    pub play_state: String,
    pub current_time: String,
    pub duration: String,
    pub playback_rate: String,
}

impl From<StatusSnapshot> for StatusReadout {
    fn from(snapshot: StatusSnapshot) -> Self {
        let progress = snapshot.progress_percent();
        Self {
            progress,
            progress_width: format!("{progress}%"),
            progress_label: format!("{progress:.0}%"),
            elapsed: format_mm_ss(snapshot.current_time_ms),
            total: format_mm_ss(snapshot.duration_ms),
            play_state: snapshot.play_state.name().to_string(),
            current_time: format!("{:.0}", snapshot.current_time_ms),
            duration: format!("{:.0}", snapshot.duration_ms),
            playback_rate: format!("{:.1}", snapshot.playback_rate),
            snapshot,
        }
    }
}

/// Sink for rendered readouts (DOM panel, terminal, test recorder).
pub trait ReadoutSurface {
    fn render(&mut self, readout: &StatusReadout);
}

/// Discards every readout.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullReadout;

impl ReadoutSurface for NullReadout {
    fn render(&mut self, _readout: &StatusReadout) {}
}

/// Records every readout in order.
impl ReadoutSurface for Vec<StatusReadout> {
    fn render(&mut self, readout: &StatusReadout) {
        self.push(readout.clone());
    }
}

pub struct StatusPoller<Src, R> {
    source: Src,
    surface: R,
    interval_ms: u32,
    last: Option<StatusReadout>,
}

impl<Src: SessionSource, R: ReadoutSurface> StatusPoller<Src, R> {
    pub fn new(source: Src, surface: R, cfg: &DeckConfig) -> Self {
        Self {
            source,
            surface,
            interval_ms: cfg.poll_interval_ms,
            last: None,
        }
    }

    /// Poll cadence.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Read the active session and render it. With no session nothing is
    /// rendered and the previous readout stays in place.
    pub fn poll(&mut self) -> Option<&StatusReadout> {
        let snapshot = self.source.with_active(|s| StatusSnapshot::read(&*s))?;
        let readout = StatusReadout::from(snapshot);
        log::debug!(
            "status {} {}/{} ({})",
            readout.play_state,
            readout.current_time,
            readout.duration,
            readout.progress_label
        );
        self.surface.render(&readout);
        self.last = Some(readout);
        self.last.as_ref()
    }

    /// Last rendered readout.
    pub fn last(&self) -> Option<&StatusReadout> {
        self.last.as_ref()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(current: f64, duration: f64) -> StatusSnapshot {
        StatusSnapshot {
            play_state: PlayState::Running,
            current_time_ms: current,
            duration_ms: duration,
            playback_rate: 1.0,
        }
    }

    #[test]
    fn mm_ss_floors_seconds() {
        assert_eq!(format_mm_ss(0.0), "00:00");
        assert_eq!(format_mm_ss(1999.0), "00:01");
        assert_eq!(format_mm_ss(3000.0), "00:03");
        assert_eq!(format_mm_ss(61_500.0), "01:01");
        assert_eq!(format_mm_ss(-20.0), "00:00");
        assert_eq!(format_mm_ss(f64::NAN), "00:00");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(snap(2500.0, 2000.0).progress_percent(), 100.0);
        assert_eq!(snap(-10.0, 2000.0).progress_percent(), 0.0);
        assert_eq!(snap(500.0, 0.0).progress_percent(), 0.0);
        assert_eq!(snap(500.0, 2000.0).progress_percent(), 25.0);
    }

    #[test]
    fn readout_fields() {
        let r = StatusReadout::from(StatusSnapshot {
            play_state: PlayState::Paused,
            current_time_ms: 500.0,
            duration_ms: 2000.0,
            playback_rate: 1.5,
        });
        assert_eq!(r.progress_width, "25%");
        assert_eq!(r.progress_label, "25%");
        assert_eq!(r.elapsed, "00:00");
        assert_eq!(r.total, "00:02");
        assert_eq!(r.play_state, "paused");
        assert_eq!(r.current_time, "500");
        assert_eq!(r.duration, "2000");
        assert_eq!(r.playback_rate, "1.5");
    }

    #[test]
    fn raw_time_is_rounded_but_bar_is_clamped() {
        let r = StatusReadout::from(snap(2999.6, 2000.0));
        assert_eq!(r.current_time, "3000");
        assert_eq!(r.elapsed, "00:02");
        assert_eq!(r.progress_width, "100%");
        assert_eq!(r.progress_label, "100%");
    }
}
