//! Control panel markup and event wiring.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

use animdeck_core::{Command, Deck};

use crate::dom::{ids, query_all, DomHost, DomReadout, PRESET_ATTRIBUTE, SECTION_SELECTOR};

pub type SharedDeck = Rc<RefCell<Deck<DomHost, DomReadout>>>;

const PANEL_HTML: &str = r#"
<h3>Animation Deck</h3>
<div class="timeline">
  <div class="timeline-labels">
    <span id="current-time">00:00</span>
    <span id="total-duration">00:00</span>
  </div>
  <div id="timeline-container">
    <div id="progress-bar" style="width: 0%">
      <span id="time-indicator">0%</span>
    </div>
  </div>
</div>
<div id="status">
  <div>State: <span id="status-playstate">idle</span></div>
  <div>Time: <span id="status-currenttime">0</span>ms</div>
  <div>Duration: <span id="status-duration">0</span>ms</div>
  <div>Rate: <span id="status-playbackrate">1</span>x</div>
</div>
<div class="controls">
  <button id="btn-play">Play</button>
  <button id="btn-pause">Pause</button>
  <button id="btn-reverse">Reverse</button>
  <button id="btn-cancel">Cancel</button>
  <button id="btn-finish">Finish</button>
  <button id="btn-seek-50">Seek 50%</button>
  <button id="btn-speed-up">2x Speed</button>
  <button id="btn-speed-down">0.5x Speed</button>
</div>
"#;

/// Button ids and the command each one issues.
pub const BUTTONS: [(&str, Command); 8] = [
    ("btn-play", Command::Play),
    ("btn-pause", Command::Pause),
    ("btn-reverse", Command::Reverse),
    ("btn-cancel", Command::Cancel),
    ("btn-finish", Command::Finish),
    ("btn-seek-50", Command::SeekHalf),
    ("btn-speed-up", Command::SpeedUp),
    ("btn-speed-down", Command::SpeedDown),
];

/// Build the panel and append it to `container`.
pub fn build(doc: &Document, container: &Element) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_class_name("animdeck-panel");
    panel.set_inner_html(PANEL_HTML);
    container.append_child(&panel)?;
    Ok(panel)
}

/// Apply a command to the shared deck, skipping if a handler is already running.
pub fn dispatch(deck: &SharedDeck, command: &Command) {
    match deck.try_borrow() {
        Ok(d) => {
            d.controls().apply(command);
        }
        Err(_) => log::warn!("deck busy; dropped {command:?}"),
    }
}

fn listen(
    target: &Element,
    event: &str,
    handler: Closure<dyn FnMut(web_sys::Event)>,
) -> Result<(), JsValue> {
    target.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    handler.forget();
    Ok(())
}

/// Selecting a `.demo-section` switches to the preset it names.
pub fn wire_sections(doc: &Document, deck: &SharedDeck) -> Result<usize, JsValue> {
    let sections = query_all(doc, SECTION_SELECTOR);
    for section in &sections {
        let id = section.get_attribute(PRESET_ATTRIBUTE).unwrap_or_default();
        let deck = Rc::clone(deck);
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            match deck.try_borrow_mut() {
                // Errors are already logged by the manager.
                Ok(mut d) => {
                    let _ = d.switch_to(&id);
                }
                Err(_) => log::warn!("deck busy; dropped switch to {id}"),
            }
        });
        listen(section, "click", handler)?;
    }
    Ok(sections.len())
}

/// Transport buttons plus click-to-seek on the timeline track.
pub fn wire_controls(doc: &Document, deck: &SharedDeck) -> Result<(), JsValue> {
    for (id, command) in BUTTONS {
        let Some(button) = doc.get_element_by_id(id) else {
            continue;
        };
        let deck = Rc::clone(deck);
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            dispatch(&deck, &command);
        });
        listen(&button, "click", handler)?;
    }

    if let Some(track) = doc.get_element_by_id(ids::TIMELINE) {
        let deck = Rc::clone(deck);
        let track_ref = track.clone();
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = track_ref.get_bounding_client_rect();
            let x = f64::from(mouse.client_x()) - rect.left();
            dispatch(
                &deck,
                &Command::TimelineClick {
                    x,
                    width: rect.width(),
                },
            );
        });
        listen(&track, "click", handler)?;
    }
    Ok(())
}

/// Poll the deck on the configured cadence. Returns the interval handle.
pub fn start_polling(deck: &SharedDeck, interval_ms: u32) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let deck = Rc::clone(deck);
    let tick = Closure::<dyn FnMut()>::new(move || {
        if let Ok(mut d) = deck.try_borrow_mut() {
            d.tick();
        }
    });
    let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
    let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        timeout,
    )?;
    tick.forget();
    Ok(handle)
}
