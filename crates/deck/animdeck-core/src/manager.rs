//! Session Manager and the active session slot.
//!
//! The slot holds at most one session. `SessionManager` is its only writer;
//! everything else reads through a `SessionReader`, which looks the session
//! up on every call so it always sees the latest switch.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::DeckError;
use crate::factory;
use crate::host::{AnimationHost, PlaybackSession, SessionEvent};
use crate::preset::PresetId;

#[derive(Debug)]
struct Active<S> {
    preset: PresetId,
    session: S,
}

type Slot<S> = Rc<RefCell<Option<Active<S>>>>;

/// Read/command handle onto the active session slot.
#[derive(Debug)]
pub struct SessionReader<S> {
    slot: Slot<S>,
}

impl<S> Clone for SessionReader<S> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<S> SessionReader<S> {
    /// Run `f` against the active session. `None` when the slot is empty.
    pub fn with_active<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let Ok(mut guard) = self.slot.try_borrow_mut() else {
            log::warn!("active session is busy; ignoring re-entrant access");
            return None;
        };
        guard.as_mut().map(|active| f(&mut active.session))
    }

    pub fn active_preset(&self) -> Option<PresetId> {
        active_preset(&self.slot)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.try_borrow().map_or(false, |g| g.is_none())
    }
}

fn active_preset<S>(slot: &Slot<S>) -> Option<PresetId> {
    slot.try_borrow()
        .ok()
        .and_then(|g| g.as_ref().map(|a| a.preset))
}

fn log_events(preset: Option<PresetId>, events: &[SessionEvent]) {
    let name = preset.map_or("-", |p| p.as_str());
    for event in events {
        match event {
            SessionEvent::Finished => log::info!("animation finished: {name}"),
            SessionEvent::Canceled => log::info!("animation canceled: {name}"),
        }
    }
}

/// Owns the host and the active slot; switching presets goes through here.
pub struct SessionManager<H: AnimationHost> {
    host: H,
    slot: Slot<H::Session>,
}

impl<H: AnimationHost> SessionManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Reader handle for collaborators (control surface, status poller).
    pub fn reader(&self) -> SessionReader<H::Session> {
        SessionReader {
            slot: Rc::clone(&self.slot),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn active_preset(&self) -> Option<PresetId> {
        active_preset(&self.slot)
    }

    pub fn with_active<R>(&self, f: impl FnOnce(&mut H::Session) -> R) -> Option<R> {
        self.reader().with_active(f)
    }

    /// Switch to the preset named `id`.
    ///
    /// The previous session is canceled before `id` is even parsed, so a
    /// failed switch still leaves the old target reverted. On failure the
    /// canceled session stays in the slot and no new one is installed.
    pub fn switch_to(&mut self, id: &str) -> Result<PresetId, DeckError> {
        self.cancel_active();
        self.host.clear_selection();

        let preset = match id.parse::<PresetId>() {
            Ok(p) => p,
            Err(e) => {
                log::error!("switch aborted: {e}");
                return Err(e);
            }
        };
        self.install(preset)
    }

    /// Like [`switch_to`](Self::switch_to) for an already-parsed preset.
    pub fn switch_to_preset(&mut self, preset: PresetId) -> Result<PresetId, DeckError> {
        self.cancel_active();
        self.host.clear_selection();
        self.install(preset)
    }

    fn cancel_active(&mut self) {
        let mut slot = self.slot.borrow_mut();
        if let Some(active) = slot.as_mut() {
            active.session.cancel();
            let events = active.session.take_events();
            log_events(Some(active.preset), &events);
        }
    }

    fn install(&mut self, preset: PresetId) -> Result<PresetId, DeckError> {
        let result = self.build(preset);
        let session = match result {
            Ok(s) => s,
            Err(e) => {
                log::error!("switch aborted: {e}");
                return Err(e);
            }
        };

        *self.slot.borrow_mut() = Some(Active { preset, session });
        self.host.mark_selected(preset);

        if let Some(Err(e)) = self.with_active(|s| s.play()) {
            log::warn!("{preset}: play refused: {e}");
        }
        log::info!("switched to animation: {preset}");
        Ok(preset)
    }

    fn build(&mut self, preset: PresetId) -> Result<H::Session, DeckError> {
        let target = self.host.resolve_target(preset.target_id()).ok_or_else(|| {
            DeckError::UnresolvableTarget {
                preset: preset.as_str().to_string(),
                target_id: preset.target_id().to_string(),
            }
        })?;
        factory::create_session(&mut self.host, preset, &target)
    }

    /// Collect and log notifications raised by the active session.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let preset = self.active_preset();
        let events = self.with_active(|s| s.take_events()).unwrap_or_default();
        log_events(preset, &events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use crate::host::PlayState;

    #[test]
    fn reader_sees_later_switches() {
        let mut mgr = SessionManager::new(HeadlessHost::demo());
        let reader = mgr.reader();
        assert!(reader.is_empty());

        mgr.switch_to("reveal").unwrap();
        assert_eq!(reader.active_preset(), Some(PresetId::Reveal));

        mgr.switch_to("svg-transform").unwrap();
        assert_eq!(reader.active_preset(), Some(PresetId::SvgTransform));
        assert_eq!(reader.with_active(|s| s.duration_ms()), Some(3000.0));
    }

    #[test]
    fn failed_switch_keeps_canceled_session() {
        let mut mgr = SessionManager::new(HeadlessHost::demo());
        mgr.switch_to("svg-circle-radius").unwrap();
        let err = mgr.switch_to("nope").unwrap_err();
        assert!(matches!(err, DeckError::UnknownPreset { .. }));
        assert_eq!(mgr.active_preset(), Some(PresetId::SvgCircleRadius));
        assert_eq!(mgr.with_active(|s| s.play_state()), Some(PlayState::Idle));
        assert!(mgr.host().selected().is_empty());
    }

    #[test]
    fn reentrant_access_is_refused() {
        let mut mgr = SessionManager::new(HeadlessHost::demo());
        mgr.switch_to("reveal").unwrap();
        let reader = mgr.reader();
        let inner = reader.clone();
        let nested = reader.with_active(|_| inner.with_active(|_| ()));
        assert_eq!(nested, Some(None));
    }
}
