//! Chat Page

use std::time::Duration;

use chrono::Utc;
use guide_core::{ChatBackend, ChatSession, GuideConfig};
use leptos::html::Div;
use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions};

use crate::api::HttpChatBackend;
use crate::browser::{BrowserConfirm, BrowserStorage};
use crate::components::ChatMessage;

/// How often relative timestamps are refreshed
const CLOCK_TICK: Duration = Duration::from_secs(30);

#[component]
pub fn ChatInterface() -> impl IntoView {
    let config = use_context::<GuideConfig>().unwrap_or_default();
    let endpoint = StoredValue::new(config.chat_endpoint());

    // web_sys::Storage is !Send, so the session lives in thread-local storage.
    let session = RwSignal::new_local(ChatSession::restore(BrowserStorage::open(), &config));

    // Transcript is append-only until cleared, so its length tracks every change.
    let message_count = Memo::new(move |_| session.with(|s| s.messages().len()));
    let awaiting = Memo::new(move |_| session.with(ChatSession::is_awaiting));
    let can_send = Memo::new(move |_| session.with(ChatSession::can_send));

    let (now, set_now) = signal(Utc::now());
    if let Ok(handle) = set_interval_with_handle(move || set_now.set(Utc::now()), CLOCK_TICK) {
        on_cleanup(move || handle.clear());
    }

    let messages_end = NodeRef::<Div>::new();
    Effect::new(move |_| {
        message_count.track();
        awaiting.track();
        if let Some(end) = messages_end.get() {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            end.scroll_into_view_with_scroll_into_view_options(&options);
        }
    });

    let send = move || {
        let Some(turn) = session.try_update(ChatSession::submit).flatten() else {
            return;
        };
        let backend = HttpChatBackend::new(endpoint.get_value());

        leptos::task::spawn_local(async move {
            let outcome = backend.send(turn.text()).await;
            // Signal is disposed once the component unmounts
            if session.try_update(|s| s.settle(turn, outcome)).is_none() {
                tracing::debug!("Chat unmounted before reply arrived, dropping it");
            }
        });
    };

    let clear = move |_| {
        session.update(|s| {
            s.clear_history(&BrowserConfirm);
        });
    };

    view! {
        <div class="chat-container">
            <div class="chat-toolbar">
                <button
                    class="clear-history"
                    on:click=clear
                    disabled=move || message_count.get() == 0
                >
                    "Borrar historial"
                </button>
            </div>

            <div class="messages">
                <For
                    each=move || {
                        message_count.track();
                        session.with_untracked(|s| s.messages().to_vec()).into_iter().enumerate()
                    }
                    key=|(idx, _)| *idx
                    children=move |(_, msg)| view! { <ChatMessage message=msg now=now /> }
                />
                <Show when=move || awaiting.get()>
                    <div class="message bot-message loading">
                        <div class="message-avatar">"🤖"</div>
                        <div class="typing-indicator">
                            <span></span>
                            <span></span>
                            <span></span>
                        </div>
                    </div>
                </Show>
                <div node_ref=messages_end></div>
            </div>

            <div class="input-area">
                <input
                    type="text"
                    placeholder="Escribe tu mensaje..."
                    prop:value=move || session.with(|s| s.input().to_owned())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        session.update(|s| s.set_input(text));
                    }
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" && !ev.shift_key() {
                            ev.prevent_default();
                            send();
                        }
                    }
                    disabled=move || awaiting.get()
                />
                <button on:click=move |_| send() disabled=move || !can_send.get()>
                    "Enviar"
                </button>
            </div>
        </div>
    }
}
