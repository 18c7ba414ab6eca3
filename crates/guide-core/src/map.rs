//! Map Layout
//!
//! The map view is a pure function of a location list: a fixed viewport over
//! slippy-map tiles (Web Mercator, 256 px) with one marker per location. This
//! module computes where every tile image and marker goes; the web crate only
//! positions elements.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mercator latitude limit, keeps the projection finite near the poles
const MAX_SIN_LAT: f64 = 0.9999;

/// Deepest zoom served by slippy-map tile servers
pub const MAX_ZOOM: u8 = 22;

/// A geographic point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named point supplied by the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: name.into(),
        }
    }

    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Pixel coordinates in the projected world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fixed map region and tile source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Center of the viewport
    #[serde(default = "default_center")]
    pub center: LatLng,

    /// Slippy-map zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile URL with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url_template: String,

    /// Values substituted for `{s}`
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Edge length of a tile in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
}

fn default_center() -> LatLng { LatLng::new(18.2208, -66.5901) }
fn default_zoom() -> u8 { 9 }
fn default_tile_url() -> String { "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into() }
fn default_subdomains() -> Vec<String> { vec!["a".into(), "b".into(), "c".into()] }
fn default_tile_size() -> u32 { 256 }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            tile_url_template: default_tile_url(),
            subdomains: default_subdomains(),
            tile_size: default_tile_size(),
        }
    }
}

/// One tile image and its offset from the viewport's top-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct TilePlacement {
    pub url: String,
    pub left: f64,
    pub top: f64,
}

/// One marker and its offset from the viewport's top-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerPlacement {
    pub name: String,
    pub left: f64,
    pub top: f64,
}

/// Everything needed to draw the map for one viewport size
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    pub tile_size: f64,
    pub tiles: Vec<TilePlacement>,
    pub markers: Vec<MarkerPlacement>,
}

impl MapConfig {
    /// Configured zoom clamped to `0..=MAX_ZOOM`
    pub fn effective_zoom(&self) -> u8 {
        self.zoom.min(MAX_ZOOM)
    }

    fn world_size(&self) -> f64 {
        f64::from(self.tile_size) * 2f64.powi(i32::from(self.effective_zoom()))
    }

    /// Project a point to world pixels at this zoom
    pub fn project(&self, point: LatLng) -> Point {
        let scale = self.world_size();
        let sin_lat = point.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);

        Point {
            x: (point.lng + 180.0) / 360.0 * scale,
            y: (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale,
        }
    }

    /// URL of tile `(x, y)` at zoom `z`
    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = (x as usize + y as usize) % self.subdomains.len();
            self.subdomains[idx].as_str()
        };

        self.tile_url_template
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Lay out tiles and markers for a `width` x `height` viewport
    pub fn layout(&self, width: f64, height: f64, locations: &[Location]) -> MapLayout {
        let tile = f64::from(self.tile_size);
        let center = self.project(self.center);
        let origin = Point {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
        };

        // Tile indices are small (2^zoom) so the float/int casts are exact.
        let zoom = self.effective_zoom();
        let tiles_per_axis = 1i64 << zoom;
        let first_x = (origin.x / tile).floor() as i64;
        let last_x = ((origin.x + width) / tile).ceil() as i64;
        let first_y = ((origin.y / tile).floor() as i64).max(0);
        let last_y = (((origin.y + height) / tile).ceil() as i64).min(tiles_per_axis);

        let mut tiles = Vec::new();
        for ty in first_y..last_y {
            for tx in first_x..last_x {
                let wrapped_x = tx.rem_euclid(tiles_per_axis);
                tiles.push(TilePlacement {
                    url: self.tile_url(wrapped_x as u32, ty as u32, zoom),
                    left: tx as f64 * tile - origin.x,
                    top: ty as f64 * tile - origin.y,
                });
            }
        }

        let markers = locations
            .iter()
            .map(|loc| {
                let p = self.project(loc.position());
                MarkerPlacement {
                    name: loc.name.clone(),
                    left: p.x - origin.x,
                    top: p.y - origin.y,
                }
            })
            .collect();

        MapLayout {
            width,
            height,
            tile_size: tile,
            tiles,
            markers,
        }
    }
}
