use std::cell::Cell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Interval;
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlVideoElement, KeyboardEvent, MouseEvent, TouchEvent};
use yew::prelude::*;

use sutori_core::{Story, StoryContent};

mod analytics_sink;
mod catalog;
mod host;
mod viewer_core;

use viewer_core::ViewerCore;

const TICK_INTERVAL_MS: u32 = 16;

#[derive(Properties)]
struct AppProps {
    core: Rc<ViewerCore>,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

fn touch_point(event: &TouchEvent) -> Option<(f64, f64)> {
    let touch = event.changed_touches().get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn surface_width(surface: &NodeRef) -> f64 {
    if let Some(element) = surface.cast::<HtmlElement>() {
        let width = element.client_width() as f64;
        if width > 0.0 {
            return width;
        }
    }
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn owner_initial(display_name: &str) -> String {
    display_name
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn segment_fill(segment: usize, index: usize, progress: f64) -> f64 {
    if segment < index {
        1.0
    } else if segment == index {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn render_progress_track(index: usize, progress: f64, count: usize) -> Html {
    let segments: Html = (0..count)
        .map(|segment| {
            let style = format!("width: {:.2}%;", segment_fill(segment, index, progress) * 100.0);
            html! {
                <div class="progress-segment" key={segment.to_string()}>
                    <div class="progress-fill" style={style} />
                </div>
            }
        })
        .collect();
    html! { <div class="progress-track">{segments}</div> }
}

fn render_story_content(core: &Rc<ViewerCore>, story: &Story) -> Html {
    match &story.content {
        StoryContent::Image { url } => html! {
            <img class="story-image" src={url.clone()} key={story.id.to_string()} />
        },
        StoryContent::Video { url } => {
            let story_id = story.id.clone();
            let core = core.clone();
            let on_loaded_metadata = Callback::from(move |event: Event| {
                let Some(video) = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlVideoElement>().ok())
                else {
                    return;
                };
                let seconds = video.duration();
                if seconds.is_finite() && seconds > 0.0 {
                    core.report_video_duration(&story_id, seconds * 1000.0);
                }
            });
            html! {
                <video
                    class="story-video"
                    src={url.clone()}
                    key={story.id.to_string()}
                    autoplay={true}
                    muted={true}
                    playsinline={true}
                    onloadedmetadata={on_loaded_metadata}
                />
            }
        }
        StoryContent::Text { text, background } => {
            let style = format!("background-color: {background};");
            html! {
                <div class="story-text" style={style} key={story.id.to_string()}>
                    <p>{text.clone()}</p>
                </div>
            }
        }
    }
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let core = props.core.clone();
    let snapshot = use_state(|| core.snapshot());
    let surface_ref = use_node_ref();

    {
        let core = core.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            let reader = core.clone();
            let subscription = core.subscribe(Rc::new(move || {
                snapshot.set(reader.snapshot());
            }));
            move || drop(subscription)
        });
    }

    {
        let core = core.clone();
        use_effect_with((), move |_| {
            let last = Rc::new(Cell::new(Date::now()));
            let interval = Interval::new(TICK_INTERVAL_MS, move || {
                let now = Date::now();
                let delta = now - last.get();
                last.set(now);
                core.tick(delta, now);
            });
            move || drop(interval)
        });
    }

    let viewer_open = snapshot.playback.is_some();

    {
        let core = core.clone();
        use_effect_with(viewer_open, move |viewer_open| {
            let mut listener = None;
            if *viewer_open {
                let window = web_sys::window().expect("window available");
                let options = EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                };
                listener = Some(EventListener::new_with_options(
                    &window,
                    "keydown",
                    options,
                    move |event: &Event| {
                        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        if event.repeat() {
                            return;
                        }
                        let now = Date::now();
                        match event.key().as_str() {
                            "ArrowRight" => core.advance(now),
                            "ArrowLeft" => core.retreat(now),
                            "Escape" => core.close_viewer(),
                            " " => {
                                core.toggle_pause();
                                event.prevent_default();
                            }
                            _ => {}
                        }
                    },
                ));
            }
            move || drop(listener)
        });
    }

    {
        let core = core.clone();
        let surface_ref = surface_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window available");

            let up_core = core.clone();
            let up_surface = surface_ref.clone();
            let up_listener = EventListener::new_with_options(
                &window,
                "mouseup",
                EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                },
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    if !up_core.gesture_active() {
                        return;
                    }
                    up_core.gesture_finish(
                        event.client_x() as f64,
                        event.client_y() as f64,
                        surface_width(&up_surface),
                        Date::now(),
                    );
                },
            );

            let touch_core = core.clone();
            let touch_surface = surface_ref.clone();
            let touch_end_listener = EventListener::new_with_options(
                &window,
                "touchend",
                EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                },
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    if !touch_core.gesture_active() {
                        return;
                    }
                    let Some((x, y)) = touch_point(event) else {
                        touch_core.gesture_cancel(Date::now());
                        return;
                    };
                    touch_core.gesture_finish(x, y, surface_width(&touch_surface), Date::now());
                },
            );

            let cancel_core = core.clone();
            let touch_cancel_listener = EventListener::new_with_options(
                &window,
                "touchcancel",
                EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                },
                move |_: &Event| {
                    cancel_core.gesture_cancel(Date::now());
                },
            );

            move || {
                drop(up_listener);
                drop(touch_end_listener);
                drop(touch_cancel_listener);
            }
        });
    }

    let owners = core.owners();
    let owner_strip: Html = owners
        .iter()
        .enumerate()
        .map(|(index, owner)| {
            let consumed = snapshot.consumed.get(index).copied().unwrap_or(false);
            let selected = snapshot.active_owner == Some(index);
            let class = classes!(
                "owner-chip",
                consumed.then_some("consumed"),
                selected.then_some("selected"),
            );
            let onclick = {
                let core = core.clone();
                Callback::from(move |_: MouseEvent| {
                    core.select_owner(index, Date::now());
                })
            };
            let avatar = match &owner.avatar_url {
                Some(url) => html! { <img class="owner-avatar" src={url.clone()} /> },
                None => html! {
                    <span class="owner-avatar owner-initial">
                        {owner_initial(&owner.display_name)}
                    </span>
                },
            };
            html! {
                <button class={class} {onclick} key={index.to_string()}>
                    {avatar}
                    <span class="owner-name">{owner.display_name.clone()}</span>
                </button>
            }
        })
        .collect();

    let viewer = if let (Some(playback), Some(story), Some(owner_index)) = (
        snapshot.playback,
        core.current_story(),
        snapshot.active_owner,
    ) {
        let owner = owners.get(owner_index).cloned();
        let owner_name = owner
            .as_ref()
            .map(|owner| owner.display_name.clone())
            .unwrap_or_default();

        let on_mouse_down = {
            let core = core.clone();
            Callback::from(move |event: MouseEvent| {
                event.prevent_default();
                core.gesture_begin(event.client_x() as f64, event.client_y() as f64, Date::now());
            })
        };
        let on_touch_start = {
            let core = core.clone();
            Callback::from(move |event: TouchEvent| {
                if let Some((x, y)) = touch_point(&event) {
                    core.gesture_begin(x, y, Date::now());
                }
            })
        };
        let on_toggle_pause = {
            let core = core.clone();
            Callback::from(move |_: MouseEvent| core.toggle_pause())
        };
        let on_close = {
            let core = core.clone();
            Callback::from(move |_: MouseEvent| core.close_viewer())
        };

        let whatsapp_button = owner
            .as_ref()
            .filter(|owner| owner.whatsapp_number.is_some())
            .map(|_| {
                let core = core.clone();
                let onclick = Callback::from(move |_: MouseEvent| {
                    if let Some(url) = core.whatsapp_reply(Date::now()) {
                        host::open_external(&url);
                    }
                });
                html! { <button class="reply-button" {onclick}>{"Reply on WhatsApp"}</button> }
            });
        let email_button = owner
            .as_ref()
            .filter(|owner| owner.email.is_some())
            .map(|_| {
                let core = core.clone();
                let onclick = Callback::from(move |_: MouseEvent| {
                    if let Some(url) = core.email_reply(Date::now()) {
                        host::open_external(&url);
                    }
                });
                html! { <button class="reply-button" {onclick}>{"Reply by email"}</button> }
            });
        let share_button = host::share_available().then(|| {
            let name = owner_name.clone();
            let onclick = Callback::from(move |_: MouseEvent| {
                host::share(&name, &format!("Check out {name}'s stories"));
            });
            html! { <button class="share-button" {onclick}>{"Share"}</button> }
        });

        let pause_label = if playback.is_paused { "Resume" } else { "Pause" };

        html! {
            <div class="viewer-overlay">
                <div class="viewer-header">
                    {render_progress_track(
                        playback.current_index,
                        playback.progress_ratio,
                        playback.story_count,
                    )}
                    <div class="viewer-controls">
                        <span class="viewer-owner">{owner_name}</span>
                        <button class="pause-button" onclick={on_toggle_pause}>{pause_label}</button>
                        {share_button.unwrap_or_default()}
                        <button class="close-button" onclick={on_close}>{"✕"}</button>
                    </div>
                </div>
                <div
                    class="viewer-surface"
                    ref={surface_ref.clone()}
                    onmousedown={on_mouse_down}
                    ontouchstart={on_touch_start}
                >
                    {render_story_content(&core, &story)}
                </div>
                <div class="viewer-footer">
                    {whatsapp_button.unwrap_or_default()}
                    {email_button.unwrap_or_default()}
                </div>
            </div>
        }
    } else {
        Html::default()
    };

    html! {
        <div class="sutori-app">
            <div class="owner-strip">{owner_strip}</div>
            {viewer}
        </div>
    }
}

fn load_sequences() -> Vec<sutori_core::StorySequence> {
    match host::story_payload() {
        Some(payload) => match catalog::sequences_from_json(&payload) {
            Ok(sequences) if !sequences.is_empty() => sequences,
            Ok(_) => {
                gloo::console::log!("payload: no playable owners, using demo catalog");
                catalog::demo_sequences()
            }
            Err(err) => {
                gloo::console::log!("payload: decode failed", err.to_string());
                host::fail("payload", &err.to_string());
                catalog::demo_sequences()
            }
        },
        None => catalog::demo_sequences(),
    }
}

fn main() {
    let core = ViewerCore::new(load_sequences(), analytics_sink::sink_from_host());
    yew::Renderer::<App>::with_props(AppProps { core }).render();
    host::ready();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn segment_fill_tracks_the_active_segment() {
        assert_eq!(segment_fill(0, 2, 0.4), 1.0);
        assert_eq!(segment_fill(1, 2, 0.4), 1.0);
        assert_eq!(segment_fill(2, 2, 0.4), 0.4);
        assert_eq!(segment_fill(3, 2, 0.4), 0.0);
    }

    #[wasm_bindgen_test]
    fn segment_fill_clamps_runaway_progress() {
        assert_eq!(segment_fill(0, 0, 1.7), 1.0);
        assert_eq!(segment_fill(0, 0, -0.3), 0.0);
    }

    #[wasm_bindgen_test]
    fn owner_initial_falls_back_for_empty_names() {
        assert_eq!(owner_initial("mika"), "M");
        assert_eq!(owner_initial(""), "?");
    }
}
