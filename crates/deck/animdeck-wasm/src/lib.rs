use std::cell::RefCell;
use std::rc::Rc;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use animdeck_core::{Command, Deck, DeckConfig, DeckError, StatusSnapshot};

pub mod dom;
pub mod logging;
pub mod panel;

use dom::{DomHost, DomReadout};
use panel::SharedDeck;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn deck_err(e: DeckError) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct AnimDeck {
    inner: SharedDeck,
    interval: Option<i32>,
}

#[wasm_bindgen]
impl AnimDeck {
    /// Create a deck bound to the current document. Pass a config object or
    /// undefined/null for defaults.
    /// Example:
    ///   new AnimDeck({ poll_interval_ms: 50, initial_preset: "svg-css" })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AnimDeck, JsError> {
        logging::init(log::LevelFilter::Info);

        let cfg: DeckConfig = if jsvalue_is_undefined_or_null(&config) {
            DeckConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let document = dom::document()?;
        let deck = Deck::new(
            DomHost::new(document.clone()),
            DomReadout::new(document),
            cfg,
        )
        .map_err(deck_err)?;
        Ok(AnimDeck {
            inner: Rc::new(RefCell::new(deck)),
            interval: None,
        })
    }

    /// Build the control panel inside `container_id`, wire preset selectors,
    /// buttons, timeline and the status poll, then start the initial preset.
    pub fn mount(&mut self, container_id: &str) -> Result<(), JsError> {
        let document = dom::document()?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsError::new(&format!("container '{container_id}' not found")))?;
        let js = |e: JsValue| JsError::new(&format!("mount failed: {e:?}"));

        panel::build(&document, &container).map_err(js)?;
        let sections = panel::wire_sections(&document, &self.inner).map_err(js)?;
        panel::wire_controls(&document, &self.inner).map_err(js)?;
        if self.interval.is_none() {
            let every = self.inner.borrow().config().poll_interval_ms;
            self.interval = Some(panel::start_polling(&self.inner, every).map_err(js)?);
        }
        log::info!("control panel mounted with {sections} preset selectors");

        // A failed initial switch is logged and leaves the panel usable.
        let _ = self.inner.borrow_mut().start();
        Ok(())
    }

    /// Switch presets. Returns the canonical preset id.
    #[wasm_bindgen(js_name = switch_to)]
    pub fn switch_to(&self, id: &str) -> Result<String, JsError> {
        let preset = self.inner.borrow_mut().switch_to(id).map_err(deck_err)?;
        Ok(preset.as_str().to_string())
    }

    /// Canonical id of the active preset, if any.
    #[wasm_bindgen(js_name = active_preset)]
    pub fn active_preset(&self) -> Option<String> {
        self.inner
            .borrow()
            .manager()
            .active_preset()
            .map(|p| p.as_str().to_string())
    }

    pub fn play(&self) -> bool {
        self.inner.borrow().controls().play()
    }

    pub fn pause(&self) -> bool {
        self.inner.borrow().controls().pause()
    }

    pub fn reverse(&self) -> bool {
        self.inner.borrow().controls().reverse()
    }

    pub fn cancel(&self) -> bool {
        self.inner.borrow().controls().cancel()
    }

    pub fn finish(&self) -> bool {
        self.inner.borrow().controls().finish()
    }

    #[wasm_bindgen(js_name = seek_to_fraction)]
    pub fn seek_to_fraction(&self, fraction: f64) -> bool {
        self.inner.borrow().controls().seek_to_fraction(fraction)
    }

    #[wasm_bindgen(js_name = speed_multiply)]
    pub fn speed_multiply(&self, factor: f64) -> bool {
        self.inner.borrow().controls().speed_multiply(factor)
    }

    /// Apply a command object, e.g. `{ cmd: "seek", fraction: 0.25 }`.
    pub fn apply(&self, command: JsValue) -> Result<bool, JsError> {
        let cmd: Command =
            swb::from_value(command).map_err(|e| JsError::new(&format!("command error: {e}")))?;
        Ok(self.inner.borrow().controls().apply(&cmd))
    }

    /// Run one poll cycle now and return the rendered readout (or null).
    pub fn tick(&self) -> Result<JsValue, JsError> {
        let tick = self.inner.borrow_mut().tick();
        swb::to_value(&tick.readout).map_err(|e| JsError::new(&format!("readout error: {e}")))
    }

    /// Current timing snapshot of the active session (or null).
    pub fn status(&self) -> Result<JsValue, JsError> {
        let snapshot = self
            .inner
            .borrow()
            .manager()
            .with_active(|s| StatusSnapshot::read(&*s));
        swb::to_value(&snapshot).map_err(|e| JsError::new(&format!("status error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
