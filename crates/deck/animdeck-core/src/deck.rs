//! Deck: wires host, session manager, control surface and status poller.

use crate::config::DeckConfig;
use crate::control::ControlSurface;
use crate::error::DeckError;
use crate::host::{AnimationHost, SessionEvent};
use crate::manager::{SessionManager, SessionReader};
use crate::preset::PresetId;
use crate::status::{ReadoutSurface, StatusPoller, StatusReadout};

pub type Controls<H> = ControlSurface<SessionReader<<H as AnimationHost>::Session>>;
pub type Poller<H, R> = StatusPoller<SessionReader<<H as AnimationHost>::Session>, R>;

/// One page's worth of animation playback.
pub struct Deck<H: AnimationHost, R> {
    cfg: DeckConfig,
    manager: SessionManager<H>,
    controls: Controls<H>,
    poller: Poller<H, R>,
}

/// Result of one poll cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    pub readout: Option<StatusReadout>,
    pub events: Vec<SessionEvent>,
}

impl<H: AnimationHost, R: ReadoutSurface> Deck<H, R> {
    pub fn new(host: H, surface: R, cfg: DeckConfig) -> Result<Self, DeckError> {
        cfg.validate()?;
        let manager = SessionManager::new(host);
        let controls = ControlSurface::with_config(manager.reader(), &cfg);
        let poller = StatusPoller::new(manager.reader(), surface, &cfg);
        Ok(Self {
            cfg,
            manager,
            controls,
            poller,
        })
    }

    /// Switch to the configured initial preset, if any.
    pub fn start(&mut self) -> Result<Option<PresetId>, DeckError> {
        let started = match self.cfg.initial() {
            Some(preset) => Some(self.manager.switch_to_preset(preset)?),
            None => None,
        };
        log::info!("animation deck started");
        Ok(started)
    }

    pub fn switch_to(&mut self, id: &str) -> Result<PresetId, DeckError> {
        self.manager.switch_to(id)
    }

    /// One poll cycle: render the readout, then collect session notifications.
    pub fn tick(&mut self) -> Tick {
        let readout = self.poller.poll().cloned();
        let events = self.manager.drain_events();
        Tick { readout, events }
    }

    pub fn controls(&self) -> &Controls<H> {
        &self.controls
    }

    pub fn manager(&self) -> &SessionManager<H> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SessionManager<H> {
        &mut self.manager
    }

    pub fn poller(&self) -> &Poller<H, R> {
        &self.poller
    }

    pub fn config(&self) -> &DeckConfig {
        &self.cfg
    }
}
