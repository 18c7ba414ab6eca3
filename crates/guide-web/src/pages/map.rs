//! Map Page

use guide_core::Location;
use leptos::prelude::*;

use crate::components::MapView;

fn landmarks() -> Vec<Location> {
    vec![
        Location::new(18.4707, -66.1236, "Castillo San Felipe del Morro"),
        Location::new(18.2957, -65.7879, "El Yunque"),
        Location::new(18.3402, -67.2499, "Rincón"),
        Location::new(18.0111, -66.6141, "Ponce"),
        Location::new(18.1097, -65.4420, "Vieques"),
    ]
}

#[component]
pub fn MapPage() -> impl IntoView {
    view! {
        <section class="map-page">
            <MapView locations=landmarks() />
        </section>
    }
}
