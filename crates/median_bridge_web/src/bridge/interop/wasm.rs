use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use super::*;
use crate::detect::BRIDGE_OBJECT;

type InboundClosure = Closure<dyn FnMut(JsValue)>;

thread_local! {
    static GLOBALS: RefCell<BTreeMap<String, InboundClosure>> = RefCell::new(BTreeMap::new());
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn webkit_handler() -> Option<JsValue> {
    let webkit = property(&js_sys::global(), "webkit")?;
    let handlers = property(&webkit, "messageHandlers")?;
    property(&handlers, BRIDGE_OBJECT)
}

fn injected_interface() -> Option<JsValue> {
    property(&js_sys::global(), BRIDGE_OBJECT)
}

pub fn host_transport() -> Option<HostTransport> {
    if webkit_handler().is_some() {
        Some(HostTransport::WebkitMessageHandler)
    } else if injected_interface().is_some() {
        Some(HostTransport::InjectedInterface)
    } else {
        None
    }
}

fn call_post_message(target: &JsValue, message: &JsValue) -> Result<(), String> {
    let post = property(target, "postMessage")
        .ok_or_else(|| "host bridge has no postMessage".to_string())?
        .dyn_into::<Function>()
        .map_err(|_| "host bridge postMessage is not callable".to_string())?;
    post.call1(target, message)
        .map(|_| ())
        .map_err(js_error_to_string)
}

pub fn post_to_host(transport: HostTransport, message: &Value) -> Result<(), String> {
    match transport {
        HostTransport::WebkitMessageHandler => {
            let handler =
                webkit_handler().ok_or_else(|| "webkit message handler unavailable".to_string())?;
            let value = message
                .serialize(&Serializer::json_compatible())
                .map_err(|e| e.to_string())?;
            call_post_message(&handler, &value)
        }
        HostTransport::InjectedInterface => {
            let bridge =
                injected_interface().ok_or_else(|| "injected bridge unavailable".to_string())?;
            let text = serde_json::to_string(message).map_err(|e| e.to_string())?;
            call_post_message(&bridge, &JsValue::from_str(&text))
        }
    }
}

fn decode_payload(payload: JsValue) -> Value {
    if payload.is_undefined() || payload.is_null() {
        return Value::Null;
    }
    from_value::<Value>(payload).unwrap_or_else(|err| {
        log::warn!("host payload is not plain data: {err}");
        Value::Null
    })
}

// A global may be retracted from inside its own invocation, so closures are released on a later
// task rather than while JS is still running them.
fn release_later<T: 'static>(closure: T) {
    wasm_bindgen_futures::spawn_local(async move {
        drop(closure);
    });
}

pub fn install_global(name: &str, route: InboundRoute) -> Result<(), String> {
    let label = name.to_string();
    let closure = InboundClosure::wrap(Box::new(move |payload: JsValue| {
        if !route.deliver(decode_payload(payload)) {
            log::trace!("host call to `{label}` reached no live handler");
        }
    }));
    Reflect::set(
        &js_sys::global(),
        &JsValue::from_str(name),
        closure.as_ref(),
    )
    .map_err(js_error_to_string)?;
    let replaced = GLOBALS.with(|globals| globals.borrow_mut().insert(name.to_string(), closure));
    if let Some(previous) = replaced {
        release_later(previous);
    }
    Ok(())
}

pub fn remove_global(name: &str) {
    let Some(closure) = GLOBALS.with(|globals| globals.borrow_mut().remove(name)) else {
        return;
    };
    if let Err(err) = Reflect::delete_property(&js_sys::global(), &JsValue::from_str(name)) {
        log::warn!(
            "failed to remove global `{name}`: {}",
            js_error_to_string(err)
        );
    }
    release_later(closure);
}

pub fn installed_globals() -> Vec<String> {
    GLOBALS.with(|globals| globals.borrow().keys().cloned().collect())
}

pub fn set_interval(
    interval: Duration,
    mut tick: Box<dyn FnMut() -> TickControl>,
) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let timeout_ms = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX);

    let handle = Rc::new(Cell::new(None::<i32>));
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let timer_window = window.clone();
    let timer_handle = Rc::clone(&handle);
    let timer_slot = Rc::clone(&slot);
    let on_tick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        if tick() == TickControl::Continue {
            return;
        }
        if let Some(id) = timer_handle.take() {
            timer_window.clear_interval_with_handle(id);
        }
        if let Some(closure) = timer_slot.borrow_mut().take() {
            release_later(closure);
        }
    }));

    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            on_tick.as_ref().unchecked_ref(),
            timeout_ms,
        )
        .map_err(js_error_to_string)?;
    handle.set(Some(id));
    *slot.borrow_mut() = Some(on_tick);
    Ok(())
}
