// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Leaflet page output for a [`MapRenderDescriptor`].

use crate::config::MapConfig;
use crate::geo::Coordinate;
use crate::render::{MapRenderDescriptor, MarkerKind, MarkerSpec, Popup};
use std::fmt::Write;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// JSON string literal that is also safe inside a `<script>` element.
fn js_str(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn latlng(c: &Coordinate) -> String {
    format!("[{}, {}]", c.lat, c.lon)
}

pub fn popup_html(popup: &Popup) -> String {
    let mut html = String::from("<table>");
    for (label, value) in &popup.rows {
        html.push_str("<tr><th>");
        html.push_str(&html_escape::encode_text(label));
        html.push_str("</th><td>");
        html.push_str(&html_escape::encode_text(value));
        html.push_str("</td></tr>");
    }
    html.push_str("</table>");
    html
}

fn marker_js(out: &mut String, marker: &MarkerSpec) {
    let popup = format!(
        ".bindPopup({}, {{maxWidth: {}}})",
        js_str(&popup_html(&marker.popup)),
        marker.popup.max_width
    );
    match &marker.kind {
        MarkerKind::Airport { style } => {
            let _ = writeln!(
                out,
                "L.circleMarker({}, {{radius: {}, color: {}, fill: {}, fillColor: {}}}){}.addTo(map);",
                latlng(&marker.position),
                style.radius_px,
                js_str(&style.color),
                style.fill,
                js_str(&style.fill_color),
                popup
            );
        }
        MarkerKind::Flight { icon } => {
            let options = match &icon.asset {
                Some(asset) => format!(
                    ", {{icon: L.icon({{iconUrl: {}, iconSize: [{}, {}]}})}}",
                    js_str(&asset.data_uri()),
                    icon.size.0,
                    icon.size.1
                ),
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "L.marker({}{}){}.addTo(map);",
                latlng(&marker.position),
                options,
                popup
            );
        }
    }
}

/// A complete HTML document whose map fills its container.
pub fn render_html(descriptor: &MapRenderDescriptor, config: &MapConfig) -> String {
    let mut script = String::new();
    let _ = writeln!(
        script,
        "const map = L.map(\"map\", {{center: {}, zoom: {}, zoomSnap: 0.1}});",
        latlng(&descriptor.center),
        descriptor.zoom
    );
    let _ = writeln!(
        script,
        "L.tileLayer({}, {{attribution: {}, subdomains: \"abcd\", maxZoom: 20}}).addTo(map);",
        js_str(&config.tiles_url),
        js_str(&config.tiles_attribution)
    );
    for marker in &descriptor.markers {
        marker_js(&mut script, marker);
    }
    if let Some(overlay) = &descriptor.overlay {
        let _ = writeln!(
            script,
            "L.circle({}, {{radius: {}, color: {}}}).addTo(map);",
            latlng(&overlay.center),
            overlay.radius_m,
            js_str(&config.overlay_color)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>Flight Map Dashboard</title>
<link rel="stylesheet" href="{css}"/>
<script src="{js}"></script>
<style>
html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
#map {{ width: 100%; height: {height}; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
{script}</script>
</body>
</html>
"#,
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        height = html_escape::encode_text(&config.map_height),
        script = script
    )
}
