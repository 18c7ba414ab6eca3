//! Main App Component

use guide_core::GuideConfig;
use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{ChatInterface, MapPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_context(GuideConfig::default());

    view! {
        <Router>
            <div class="App">
                <header class="app-header">
                    <h1>"Guía de Puerto Rico"</h1>
                    <nav>
                        <A href="/">"Chat"</A>
                        <A href="/mapa">"Mapa"</A>
                    </nav>
                </header>
                <main class="app">
                    <Routes fallback=|| view! { <p>"Página no encontrada"</p> }>
                        <Route path=path!("/") view=ChatInterface />
                        <Route path=path!("/mapa") view=MapPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
