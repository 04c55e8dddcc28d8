//! Glue between the workflow and the browser: timers, clipboard, alerts.

use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::optimizer::{Timer, Workflow, WorkflowHandle};

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl WorkflowHandle for RwSignal<Workflow> {
    fn apply<R>(&self, f: impl FnOnce(&mut Workflow) -> R) -> Option<R> {
        self.try_update(f)
    }
}

/// `window.setTimeout` / `clearTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    /// Timeout id plus the callback it points at; dropping it frees the callback.
    type Handle = Option<(i32, Closure<dyn FnMut()>)>;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle {
        let window = web_sys::window()?;
        let closure = Closure::once(move || callback());
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay.as_millis() as i32,
            )
            .ok()?;
        Some((id, closure))
    }

    fn cancel(&self, handle: Self::Handle) {
        let Some((id, closure)) = handle else {
            return;
        };
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(id);
        }
        drop(closure);
    }
}

/// Blocking notification, like `window.alert`.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub async fn write_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "No window".to_string())?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.map(|_| ()).map_err(js_error)
}
