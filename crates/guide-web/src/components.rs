//! UI Components

use chrono::{DateTime, Utc};
use guide_core::{format_relative, Location, Message};
use leptos::prelude::*;

/// One transcript row: avatar, verbatim text and relative time
#[component]
pub fn ChatMessage(
    message: Message,
    /// Clock the relative-time label is computed against
    now: ReadSignal<DateTime<Utc>>,
) -> impl IntoView {
    let mut class = String::from(if message.is_user {
        "message user-message"
    } else {
        "message bot-message"
    });
    if message.error {
        class.push_str(" error-message");
    }
    let avatar = if message.is_user { "👤" } else { "🤖" };
    let timestamp = message.timestamp;

    view! {
        <div class=class>
            <div class="message-avatar">{avatar}</div>
            <div class="message-content">
                <div class="message-text">{message.text}</div>
                <div class="message-timestamp">
                    {move || format_relative(timestamp, now.get())}
                </div>
            </div>
        </div>
    }
}

/// Fixed map region with one clickable marker per location
///
/// The region comes from the `MapConfig` in context; clicking a marker
/// toggles a popup with the location's name.
#[component]
pub fn MapView(
    locations: Vec<Location>,
    #[prop(default = 800.0)] width: f64,
    #[prop(default = 500.0)] height: f64,
) -> impl IntoView {
    let config = use_context::<guide_core::GuideConfig>().unwrap_or_default();
    let layout = config.map.layout(width, height, &locations);
    let selected = RwSignal::new(None::<usize>);
    let size = layout.tile_size;

    let tiles = layout
        .tiles
        .into_iter()
        .map(|tile| {
            view! {
                <img
                    class="map-tile"
                    src=tile.url
                    alt=""
                    style=format!(
                        "position:absolute;left:{}px;top:{}px;width:{size}px;height:{size}px",
                        tile.left, tile.top,
                    )
                />
            }
        })
        .collect_view();

    let markers = layout
        .markers
        .into_iter()
        .enumerate()
        .map(|(idx, marker)| {
            let name = marker.name.clone();
            let marker_style =
                format!("position:absolute;left:{}px;top:{}px", marker.left, marker.top);
            let popup_style = marker_style.clone();
            view! {
                <button
                    class="map-marker"
                    title=marker.name
                    style=marker_style
                    on:click=move |_| {
                        selected.update(|s| *s = if *s == Some(idx) { None } else { Some(idx) });
                    }
                >
                    "📍"
                </button>
                <Show when=move || selected.get() == Some(idx)>
                    <div class="map-popup" style=popup_style.clone()>
                        {name.clone()}
                    </div>
                </Show>
            }
        })
        .collect_view();

    view! {
        <div
            class="map-container"
            style=format!("position:relative;overflow:hidden;width:{width}px;height:{height}px")
        >
            {tiles}
            {markers}
            <div class="map-attribution">"© OpenStreetMap contributors"</div>
        </div>
    }
}
