//! Browser host: DOM elements as targets, `Animation` as the session.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Animation, AnimationEffect, AnimationPlayState, AnimationTimeline, Document, Element,
    HtmlElement, KeyframeEffect, KeyframeEffectOptions, SvgGeometryElement,
};

use animdeck_core::{
    AnimationHost, DeckError, EffectSpec, Keyframe, PlayState, PlaybackSession, PresetId,
    PropertyValue, ReadoutSurface, SessionEvent, StatusReadout, TargetElement,
};

/// Class of the clickable preset selectors.
pub const SECTION_SELECTOR: &str = ".demo-section";
/// Attribute on a selector naming its preset.
pub const PRESET_ATTRIBUTE: &str = "data-animation";
/// Class marking the selected selector.
pub const ACTIVE_CLASS: &str = "active";

fn js_err(context: &str, e: JsValue) -> DeckError {
    DeckError::playback(format!("{context}: {e:?}"))
}

pub fn document() -> Result<Document, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("no document available"))
}

/// Every element matching `selector`, in document order.
pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

#[derive(Clone, Debug)]
pub struct DomTarget {
    element: Element,
}

impl TargetElement for DomTarget {
    fn id(&self) -> String {
        self.element.id()
    }

    fn attribute_f64(&self, name: &str) -> Option<f64> {
        self.element
            .get_attribute(name)
            .and_then(|v| v.trim().parse().ok())
    }

    fn total_length(&self) -> Option<f64> {
        self.element
            .dyn_ref::<SvgGeometryElement>()
            .map(|g| f64::from(g.get_total_length()))
    }
}

fn keyframe_object(frame: &Keyframe) -> Result<Object, DeckError> {
    let obj = Object::new();
    for (name, value) in &frame.props {
        let v = match value {
            PropertyValue::Number(n) => JsValue::from_f64(*n),
            PropertyValue::Text(s) => JsValue::from_str(s),
        };
        Reflect::set(&obj, &JsValue::from_str(name), &v)
            .map_err(|e| js_err("keyframe", e))?;
    }
    Ok(obj)
}

fn effect_options(spec: &EffectSpec) -> Result<KeyframeEffectOptions, DeckError> {
    let obj = Object::new();
    Reflect::set(
        &obj,
        &JsValue::from_str("duration"),
        &JsValue::from_f64(spec.timing.duration_ms),
    )
    .map_err(|e| js_err("duration", e))?;
    Reflect::set(
        &obj,
        &JsValue::from_str("fill"),
        &JsValue::from_str(spec.timing.fill.name()),
    )
    .map_err(|e| js_err("fill", e))?;
    Ok(obj.unchecked_into::<KeyframeEffectOptions>())
}

/// Notifications collected from one animation's event handlers.
///
/// A cancel issued through [`DomSession::cancel`] is reported at once, and
/// the platform `cancel` event it later triggers is swallowed.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SessionEvent>,
    pending_cancels: u32,
}

impl EventQueue {
    pub fn finished(&mut self) {
        self.events.push(SessionEvent::Finished);
    }

    pub fn cancel_requested(&mut self) {
        self.events.push(SessionEvent::Canceled);
        self.pending_cancels += 1;
    }

    /// The platform dispatched `cancel`.
    pub fn cancel_dispatched(&mut self) {
        if self.pending_cancels > 0 {
            self.pending_cancels -= 1;
        } else {
            self.events.push(SessionEvent::Canceled);
        }
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

/// One `Animation` on the document timeline.
pub struct DomSession {
    animation: Animation,
    duration_ms: f64,
    events: Rc<RefCell<EventQueue>>,
    _on_finish: Closure<dyn FnMut()>,
    _on_cancel: Closure<dyn FnMut()>,
}

impl DomSession {
    pub fn animation(&self) -> &Animation {
        &self.animation
    }
}

impl Drop for DomSession {
    fn drop(&mut self) {
        self.animation.set_onfinish(None);
        self.animation.set_oncancel(None);
    }
}

impl PlaybackSession for DomSession {
    fn play(&mut self) -> Result<(), DeckError> {
        self.animation.play().map_err(|e| js_err("play", e))
    }

    fn pause(&mut self) -> Result<(), DeckError> {
        self.animation.pause().map_err(|e| js_err("pause", e))
    }

    fn reverse(&mut self) -> Result<(), DeckError> {
        self.animation.reverse().map_err(|e| js_err("reverse", e))
    }

    fn cancel(&mut self) {
        if self.animation.play_state() != AnimationPlayState::Idle {
            self.events.borrow_mut().cancel_requested();
        }
        self.animation.cancel();
    }

    fn finish(&mut self) -> Result<(), DeckError> {
        self.animation.finish().map_err(|e| js_err("finish", e))
    }

    fn set_current_time(&mut self, time_ms: f64) {
        self.animation.set_current_time(Some(time_ms));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.animation.set_playback_rate(rate);
    }

    fn play_state(&self) -> PlayState {
        match self.animation.play_state() {
            AnimationPlayState::Running => PlayState::Running,
            AnimationPlayState::Paused => PlayState::Paused,
            AnimationPlayState::Finished => PlayState::Finished,
            _ => PlayState::Idle,
        }
    }

    fn current_time(&self) -> Option<f64> {
        self.animation.current_time()
    }

    fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    fn playback_rate(&self) -> f64 {
        self.animation.playback_rate()
    }

    fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.borrow_mut().drain()
    }
}

/// The page: target lookup, animation construction, selector markers.
#[derive(Clone, Debug)]
pub struct DomHost {
    document: Document,
}

impl DomHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn sections(&self) -> Vec<Element> {
        query_all(&self.document, SECTION_SELECTOR)
    }
}

impl AnimationHost for DomHost {
    type Target = DomTarget;
    type Session = DomSession;

    fn resolve_target(&self, id: &str) -> Option<DomTarget> {
        self.document
            .get_element_by_id(id)
            .map(|element| DomTarget { element })
    }

    fn create_session(
        &mut self,
        target: &DomTarget,
        effect: EffectSpec,
    ) -> Result<DomSession, DeckError> {
        let frames = Array::new();
        let from_frame: Object = keyframe_object(&effect.from)?;
        let to_frame: Object = keyframe_object(&effect.to)?;
        frames.push(&from_frame);
        frames.push(&to_frame);
        let frames_obj: &Object = frames.as_ref();
        let options = effect_options(&effect)?;

        let keyframe_effect =
            KeyframeEffect::new_with_opt_element_and_keyframes_and_keyframe_effect_options(
                Some(&target.element),
                Some(frames_obj),
                &options,
            )
            .map_err(|e| js_err("KeyframeEffect", e))?;
        let timeline = self.document.timeline();
        let as_effect: &AnimationEffect = keyframe_effect.as_ref();
        let as_timeline: &AnimationTimeline = timeline.as_ref();
        let animation = Animation::new_with_effect_and_timeline(Some(as_effect), Some(as_timeline))
            .map_err(|e| js_err("Animation", e))?;

        let events = Rc::new(RefCell::new(EventQueue::default()));
        let queue = Rc::clone(&events);
        let on_finish = Closure::<dyn FnMut()>::new(move || {
            queue.borrow_mut().finished();
        });
        animation.set_onfinish(Some(on_finish.as_ref().unchecked_ref()));
        let queue = Rc::clone(&events);
        let on_cancel = Closure::<dyn FnMut()>::new(move || {
            queue.borrow_mut().cancel_dispatched();
        });
        animation.set_oncancel(Some(on_cancel.as_ref().unchecked_ref()));

        Ok(DomSession {
            animation,
            duration_ms: effect.timing.duration_ms,
            events,
            _on_finish: on_finish,
            _on_cancel: on_cancel,
        })
    }

    fn clear_selection(&mut self) {
        for section in self.sections() {
            let _ = section.class_list().remove_1(ACTIVE_CLASS);
        }
    }

    fn mark_selected(&mut self, preset: PresetId) {
        for section in self.sections() {
            let matches = section
                .get_attribute(PRESET_ATTRIBUTE)
                .and_then(|id| id.parse::<PresetId>().ok())
                == Some(preset);
            if matches {
                let _ = section.class_list().add_1(ACTIVE_CLASS);
            }
        }
    }
}

/// Element ids the readout writes into.
pub mod ids {
    pub const PROGRESS_BAR: &str = "progress-bar";
    pub const TIME_INDICATOR: &str = "time-indicator";
    pub const CURRENT_TIME: &str = "current-time";
    pub const TOTAL_DURATION: &str = "total-duration";
    pub const PLAY_STATE: &str = "status-playstate";
    pub const STATUS_CURRENT_TIME: &str = "status-currenttime";
    pub const STATUS_DURATION: &str = "status-duration";
    pub const STATUS_PLAYBACK_RATE: &str = "status-playbackrate";
    pub const TIMELINE: &str = "timeline-container";
}

/// Writes readouts into the control panel. Missing elements are skipped.
#[derive(Clone, Debug)]
pub struct DomReadout {
    document: Document,
}

impl DomReadout {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

impl ReadoutSurface for DomReadout {
    fn render(&mut self, r: &StatusReadout) {
        if let Some(bar) = self
            .document
            .get_element_by_id(ids::PROGRESS_BAR)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = bar.style().set_property("width", &r.progress_width);
        }
        self.set_text(ids::TIME_INDICATOR, &r.progress_label);
        self.set_text(ids::CURRENT_TIME, &r.elapsed);
        self.set_text(ids::TOTAL_DURATION, &r.total);
        self.set_text(ids::PLAY_STATE, &r.play_state);
        self.set_text(ids::STATUS_CURRENT_TIME, &r.current_time);
        self.set_text(ids::STATUS_DURATION, &r.duration);
        self.set_text(ids::STATUS_PLAYBACK_RATE, &r.playback_rate);
    }
}
