//! Headless host: an in-memory scene and a manual clock.
//!
//! Reproduces the observable timing model of the browser's animation engine
//! (start/hold time, signed rate, auto-rewind, finished hold, fill) so the
//! deck can run in tests and native demos. Cloning a `HeadlessHost` yields
//! another handle onto the same clock and scene.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::DeckError;
use crate::host::{AnimationHost, PlayState, PlaybackSession, SessionEvent, TargetElement};
use crate::keyframes::{EffectSpec, FillMode, PropertyValue};
use crate::preset::PresetId;

/// Description of one element placed in the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneElement {
    pub id: String,
    pub attrs: Vec<(String, PropertyValue)>,
    pub path_length: Option<f64>,
}

impl SceneElement {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn path_length(mut self, length: f64) -> Self {
        self.path_length = Some(length);
        self
    }

    fn base(&self, name: &str) -> Option<&PropertyValue> {
        self.attrs
            .iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }
}

/// Timing state shared between a session and the element it animates.
#[derive(Debug)]
struct Timing {
    clock: Rc<Cell<f64>>,
    duration: f64,
    fill: FillMode,
    start_time: Option<f64>,
    hold_time: Option<f64>,
    rate: f64,
}

impl Timing {
    fn now(&self) -> f64 {
        self.clock.get()
    }

    fn at_limit(&self, t: f64) -> bool {
        (self.rate > 0.0 && t >= self.duration) || (self.rate < 0.0 && t <= 0.0)
    }

    fn current_time(&self) -> Option<f64> {
        if let Some(hold) = self.hold_time {
            return Some(hold);
        }
        let start = self.start_time?;
        let raw = (self.now() - start) * self.rate;
        // Playback that runs past an edge holds at that edge.
        Some(if self.rate > 0.0 && raw >= self.duration {
            self.duration
        } else if self.rate < 0.0 && raw <= 0.0 {
            0.0
        } else {
            raw
        })
    }

    fn play_state(&self) -> PlayState {
        let Some(ct) = self.current_time() else {
            return PlayState::Idle;
        };
        if self.start_time.is_none() {
            PlayState::Paused
        } else if self.at_limit(ct) {
            PlayState::Finished
        } else {
            PlayState::Running
        }
    }

    /// Resume the clock from `t` at the current rate.
    fn anchor(&mut self, t: f64) {
        let now = self.now();
        if self.rate == 0.0 {
            self.start_time = Some(now);
            self.hold_time = Some(t);
        } else {
            self.start_time = Some(now - t / self.rate);
            self.hold_time = if self.at_limit(t) { Some(t) } else { None };
        }
    }

    fn play(&mut self) {
        let ct = self.current_time();
        let d = self.duration;
        let rewind = if self.rate > 0.0 {
            match ct {
                Some(t) if (0.0..d).contains(&t) => None,
                _ => Some(0.0),
            }
        } else if self.rate < 0.0 {
            match ct {
                Some(t) if t > 0.0 && t <= d => None,
                _ => Some(d),
            }
        } else if ct.is_none() {
            Some(0.0)
        } else {
            None
        };
        let t = rewind.or(ct).unwrap_or(0.0);
        self.anchor(t);
    }

    fn pause(&mut self) {
        let t = self.current_time().unwrap_or(if self.rate < 0.0 {
            self.duration
        } else {
            0.0
        });
        self.hold_time = Some(t);
        self.start_time = None;
    }

    fn seek(&mut self, t: f64) {
        if self.start_time.is_none() {
            self.hold_time = Some(t);
        } else {
            self.anchor(t);
        }
    }

    fn set_rate(&mut self, rate: f64) {
        let ct = self.current_time();
        self.rate = rate;
        if let Some(t) = ct {
            self.seek(t);
        }
    }

    /// Iteration progress with fill applied; `None` means the effect does not apply.
    fn progress(&self) -> Option<f64> {
        let ct = self.current_time()?;
        let d = self.duration;
        let before = ct < 0.0 || (ct == 0.0 && self.rate < 0.0);
        let after = ct > d || (ct == d && self.rate >= 0.0);
        if before {
            self.fill.fills_backwards().then_some(0.0)
        } else if after {
            self.fill.fills_forwards().then_some(1.0)
        } else if d > 0.0 {
            Some(ct / d)
        } else {
            Some(1.0)
        }
    }
}

#[derive(Debug)]
struct AppliedEffect {
    timing: Rc<RefCell<Timing>>,
    spec: EffectSpec,
}

#[derive(Debug)]
struct ElementState {
    element: SceneElement,
    effect: Option<AppliedEffect>,
}

#[derive(Debug, Default)]
struct Scene {
    elements: Vec<ElementState>,
    selectors: Vec<(PresetId, bool)>,
}

impl Scene {
    fn find(&self, id: &str) -> Option<&ElementState> {
        self.elements.iter().find(|e| e.element.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut ElementState> {
        self.elements.iter_mut().find(|e| e.element.id == id)
    }
}

/// In-memory rendering surface and animation engine.
#[derive(Clone, Debug, Default)]
pub struct HeadlessHost {
    clock: Rc<Cell<f64>>,
    scene: Rc<RefCell<Scene>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene holding every preset's target and a selector per preset.
    pub fn demo() -> Self {
        let host = Self::new();
        host.insert(SceneElement::new("erasable-image").attr("clipPath", "none"));
        host.insert(
            SceneElement::new("svg-rect")
                .attr("width", 120.0)
                .attr("height", 120.0)
                .attr("rx", 0.0)
                .attr("ry", 0.0),
        );
        host.insert(
            SceneElement::new("svg-path")
                .attr("strokeDashoffset", 0.0)
                .path_length(400.0),
        );
        host.insert(SceneElement::new("svg-circle").attr("r", 50.0));
        host.insert(
            SceneElement::new("svg-css-rect")
                .attr("fill", "rgba(0, 0, 0, 1)")
                .attr("opacity", 1.0)
                .attr("transform", "none"),
        );
        host.insert(SceneElement::new("svg-transform-rect").attr("transform", "none"));
        for preset in PresetId::ALL {
            host.add_selector(preset);
        }
        host
    }

    pub fn insert(&self, element: SceneElement) {
        let mut scene = self.scene.borrow_mut();
        if let Some(existing) = scene.find_mut(&element.id) {
            existing.element = element;
        } else {
            scene.elements.push(ElementState {
                element,
                effect: None,
            });
        }
    }

    /// Take an element out of the scene. Returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let mut scene = self.scene.borrow_mut();
        let before = scene.elements.len();
        scene.elements.retain(|e| e.element.id != id);
        scene.elements.len() != before
    }

    pub fn add_selector(&self, preset: PresetId) {
        let mut scene = self.scene.borrow_mut();
        if !scene.selectors.iter().any(|(p, _)| *p == preset) {
            scene.selectors.push((preset, false));
        }
    }

    /// Selectors currently carrying the "selected" marker.
    pub fn selected(&self) -> Vec<PresetId> {
        self.scene
            .borrow()
            .selectors
            .iter()
            .filter(|(_, on)| *on)
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn now(&self) -> f64 {
        self.clock.get()
    }

    /// Move the shared clock forward by `dt_ms`.
    pub fn advance(&self, dt_ms: f64) {
        self.clock.set(self.clock.get() + dt_ms);
    }

    /// What the element currently shows for `property`: the animated value
    /// while an effect applies, else the element's own attribute.
    pub fn computed_value(&self, id: &str, property: &str) -> Option<PropertyValue> {
        let scene = self.scene.borrow();
        let state = scene.find(id)?;
        if let Some(effect) = &state.effect {
            let progress = effect.timing.borrow().progress();
            if let Some(p) = progress {
                if let Some(v) = effect.spec.sample(property, p) {
                    return Some(v);
                }
            }
        }
        state.element.base(property).cloned()
    }
}

/// Snapshot of an element handed to the factory.
#[derive(Clone, Debug)]
pub struct HeadlessTarget {
    element: SceneElement,
}

impl TargetElement for HeadlessTarget {
    fn id(&self) -> String {
        self.element.id.clone()
    }

    fn attribute_f64(&self, name: &str) -> Option<f64> {
        self.element.base(name).and_then(PropertyValue::as_f64)
    }

    fn total_length(&self) -> Option<f64> {
        self.element.path_length
    }
}

#[derive(Debug)]
pub struct HeadlessSession {
    target_id: String,
    timing: Rc<RefCell<Timing>>,
    events: Vec<SessionEvent>,
    finish_reported: bool,
}

impl HeadlessSession {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

impl PlaybackSession for HeadlessSession {
    fn play(&mut self) -> Result<(), DeckError> {
        self.timing.borrow_mut().play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DeckError> {
        self.timing.borrow_mut().pause();
        Ok(())
    }

    fn reverse(&mut self) -> Result<(), DeckError> {
        let mut t = self.timing.borrow_mut();
        // Flip around the current time, then resume in the new direction.
        let rate = -t.rate;
        t.set_rate(rate);
        t.play();
        Ok(())
    }

    fn cancel(&mut self) {
        let mut t = self.timing.borrow_mut();
        if t.current_time().is_some() {
            self.events.push(SessionEvent::Canceled);
        }
        t.start_time = None;
        t.hold_time = None;
        self.finish_reported = false;
    }

    fn finish(&mut self) -> Result<(), DeckError> {
        let mut t = self.timing.borrow_mut();
        if t.rate == 0.0 {
            return Err(DeckError::playback(
                "cannot finish an animation with a playback rate of 0",
            ));
        }
        let limit = if t.rate > 0.0 { t.duration } else { 0.0 };
        t.anchor(limit);
        Ok(())
    }

    fn set_current_time(&mut self, time_ms: f64) {
        self.timing.borrow_mut().seek(time_ms);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.timing.borrow_mut().set_rate(rate);
    }

    fn play_state(&self) -> PlayState {
        self.timing.borrow().play_state()
    }

    fn current_time(&self) -> Option<f64> {
        self.timing.borrow().current_time()
    }

    fn duration_ms(&self) -> f64 {
        self.timing.borrow().duration
    }

    fn playback_rate(&self) -> f64 {
        self.timing.borrow().rate
    }

    fn take_events(&mut self) -> Vec<SessionEvent> {
        let finished = self.play_state() == PlayState::Finished;
        if finished && !self.finish_reported {
            self.events.push(SessionEvent::Finished);
        }
        self.finish_reported = finished;
        std::mem::take(&mut self.events)
    }
}

impl AnimationHost for HeadlessHost {
    type Target = HeadlessTarget;
    type Session = HeadlessSession;

    fn resolve_target(&self, id: &str) -> Option<HeadlessTarget> {
        self.scene.borrow().find(id).map(|s| HeadlessTarget {
            element: s.element.clone(),
        })
    }

    fn create_session(
        &mut self,
        target: &HeadlessTarget,
        effect: EffectSpec,
    ) -> Result<HeadlessSession, DeckError> {
        let timing = Rc::new(RefCell::new(Timing {
            clock: Rc::clone(&self.clock),
            duration: effect.timing.duration_ms,
            fill: effect.timing.fill,
            start_time: None,
            hold_time: None,
            rate: 1.0,
        }));
        let mut scene = self.scene.borrow_mut();
        let state = scene
            .find_mut(&target.element.id)
            .ok_or_else(|| {
                DeckError::playback(format!("element '{}' left the scene", target.element.id))
            })?;
        state.effect = Some(AppliedEffect {
            timing: Rc::clone(&timing),
            spec: effect,
        });
        Ok(HeadlessSession {
            target_id: target.element.id.clone(),
            timing,
            events: Vec::new(),
            finish_reported: false,
        })
    }

    fn clear_selection(&mut self) {
        for (_, on) in self.scene.borrow_mut().selectors.iter_mut() {
            *on = false;
        }
    }

    fn mark_selected(&mut self, preset: PresetId) {
        for (p, on) in self.scene.borrow_mut().selectors.iter_mut() {
            if *p == preset {
                *on = true;
            }
        }
    }
}
