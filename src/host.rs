use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Request, RequestInit, RequestMode};

// Window globals the embedding page may provide. All host integration is
// duck-typed the same way: missing globals simply disable the affordance.
const BOOT_GLOBAL: &str = "__SUTORI_BOOT";
const DATA_GLOBAL: &str = "__SUTORI_DATA";
const ANALYTICS_URL_GLOBAL: &str = "__SUTORI_ANALYTICS_URL";

fn window_global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(value)
}

fn call_boot(method: &str, args: &[JsValue]) {
    let Some(value) = window_global(BOOT_GLOBAL) else {
        return;
    };
    let Ok(boot) = value.dyn_into::<js_sys::Object>() else {
        return;
    };
    let Ok(member) = Reflect::get(&boot, &JsValue::from_str(method)) else {
        return;
    };
    let Ok(func) = member.dyn_into::<Function>() else {
        return;
    };
    let array = js_sys::Array::new();
    for arg in args {
        array.push(arg);
    }
    let _ = func.apply(&boot, &array);
}

pub(crate) fn ready() {
    call_boot("ready", &[]);
}

pub(crate) fn fail(code: &str, message: &str) {
    call_boot(
        "fail",
        &[JsValue::from_str(code), JsValue::from_str(message)],
    );
}

/// Story payload injected by the host page, if any.
pub(crate) fn story_payload() -> Option<String> {
    window_global(DATA_GLOBAL).and_then(|value| value.as_string())
}

pub(crate) fn analytics_endpoint() -> Option<String> {
    let value = window_global(ANALYTICS_URL_GLOBAL)?.as_string()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Hands a deep link (wa.me, mailto) to the host environment. The engine
/// performs no network I/O for replies.
pub(crate) fn open_external(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window
        .open_with_url_and_target(url, "_blank")
        .is_err()
    {
        gloo::console::log!("host: open failed", url);
    }
}

pub(crate) fn share_available() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();
    Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false)
}

/// Delegates to the host's native share capability. Unavailable hosts are a
/// no-op; a rejected share leaves playback untouched.
pub(crate) fn share(title: &str, text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    let Ok(member) = Reflect::get(&navigator, &JsValue::from_str("share")) else {
        return;
    };
    let Ok(func) = member.dyn_into::<Function>() else {
        return;
    };
    let data = js_sys::Object::new();
    let _ = Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(title));
    let _ = Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(text));
    let Ok(result) = func.call1(&navigator, &data) else {
        gloo::console::log!("host: share call failed");
        return;
    };
    if let Ok(promise) = result.dyn_into::<js_sys::Promise>() {
        spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                gloo::console::log!("host: share dismissed");
            }
        });
    }
}

/// Fire-and-forget POST of one analytics event body. Failures are logged and
/// never retried; playback is never blocked on the sink.
pub(crate) fn post_analytics(endpoint: &str, body: String) {
    let endpoint = endpoint.to_string();
    spawn_local(async move {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));
        let request = match Request::new_with_str_and_init(&endpoint, &opts) {
            Ok(request) => request,
            Err(_) => {
                gloo::console::log!("analytics: bad request", endpoint);
                return;
            }
        };
        if request
            .headers()
            .set("Content-Type", "application/json")
            .is_err()
        {
            gloo::console::log!("analytics: header set failed");
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        if JsFuture::from(window.fetch_with_request(&request))
            .await
            .is_err()
        {
            gloo::console::log!("analytics: post failed", endpoint);
        }
    });
}
