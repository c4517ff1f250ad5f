// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Marker icon assets.
//!
//! Every asset owns its PNG bytes. Rotating an icon produces a new buffer and
//! never touches the source asset or any file, so builds running back to back
//! (or at the same time) cannot see each other's rotated images.

use crate::error::IconError;
use base64::{engine::general_purpose, Engine as _};
use log::debug;
use std::path::PathBuf;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

/// Name of the base flight marker icon.
pub const FLIGHT_ICON: &str = "airplane";

const BUILTIN_SIZE: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    pub name: String,
    pub png: Vec<u8>,
}

impl IconAsset {
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }
}

pub trait IconProvider {
    fn get_icon(&self, name: &str) -> Result<IconAsset, IconError>;

    /// Returns a copy of `asset` turned `degrees` clockwise about its center.
    fn rotate(&self, asset: &IconAsset, degrees: f64) -> Result<IconAsset, IconError>;
}

/// Rasterizes icons in memory with tiny-skia.
///
/// `<icon_dir>/<name>.png` overrides the built-in artwork when present.
#[derive(Debug, Clone, Default)]
pub struct RasterIconProvider {
    icon_dir: Option<PathBuf>,
}

impl RasterIconProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon_dir(icon_dir: Option<PathBuf>) -> Self {
        Self { icon_dir }
    }

    fn load_override(&self, name: &str) -> Option<Result<IconAsset, IconError>> {
        let path = self.icon_dir.as_ref()?.join(format!("{}.png", name));
        if !path.exists() {
            return None;
        }
        debug!("Loading icon override — path={}", path.display());
        let result = std::fs::read(&path)
            .map_err(|e| IconError::RenderUnavailable(format!("{}: {}", path.display(), e)))
            .and_then(|png| {
                // Reject files we could not rotate later
                Pixmap::decode_png(&png).map_err(|e| {
                    IconError::RenderUnavailable(format!("{}: {}", path.display(), e))
                })?;
                Ok(IconAsset {
                    name: name.to_string(),
                    png,
                })
            });
        Some(result)
    }
}

impl IconProvider for RasterIconProvider {
    fn get_icon(&self, name: &str) -> Result<IconAsset, IconError> {
        if let Some(result) = self.load_override(name) {
            return result;
        }
        match name {
            FLIGHT_ICON => Ok(IconAsset {
                name: name.to_string(),
                png: draw_airplane()?,
            }),
            other => Err(IconError::RenderUnavailable(format!(
                "no icon named '{}'",
                other
            ))),
        }
    }

    fn rotate(&self, asset: &IconAsset, degrees: f64) -> Result<IconAsset, IconError> {
        if !degrees.is_finite() {
            return Err(IconError::RenderUnavailable(format!(
                "{}: rotation {} is not finite",
                asset.name, degrees
            )));
        }
        let src = Pixmap::decode_png(&asset.png)
            .map_err(|e| IconError::RenderUnavailable(format!("{}: {}", asset.name, e)))?;
        let (w, h) = (src.width(), src.height());
        let mut dst = Pixmap::new(w, h)
            .ok_or_else(|| IconError::RenderUnavailable(format!("{}: empty image", asset.name)))?;

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_rotate_at(degrees as f32, w as f32 / 2.0, h as f32 / 2.0);
        dst.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);

        let png = dst
            .encode_png()
            .map_err(|e| IconError::RenderUnavailable(format!("{}: {}", asset.name, e)))?;
        Ok(IconAsset {
            name: asset.name.clone(),
            png,
        })
    }
}

/// Top-down airplane silhouette, nose up.
fn draw_airplane() -> Result<Vec<u8>, IconError> {
    let unavailable = || IconError::RenderUnavailable("built-in airplane".to_string());

    let outline: [(f32, f32); 18] = [
        (32.0, 2.0),
        (35.0, 8.0),
        (35.0, 24.0),
        (60.0, 38.0),
        (60.0, 43.0),
        (35.0, 36.0),
        (35.0, 50.0),
        (43.0, 57.0),
        (43.0, 61.0),
        (32.0, 58.0),
        (21.0, 61.0),
        (21.0, 57.0),
        (29.0, 50.0),
        (29.0, 36.0),
        (4.0, 43.0),
        (4.0, 38.0),
        (29.0, 24.0),
        (29.0, 8.0),
    ];

    let mut pb = PathBuilder::new();
    pb.move_to(outline[0].0, outline[0].1);
    for &(x, y) in &outline[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    let path = pb.finish().ok_or_else(unavailable)?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(200, 30, 30, 255);
    paint.anti_alias = true;

    let mut pixmap = Pixmap::new(BUILTIN_SIZE, BUILTIN_SIZE).ok_or_else(unavailable)?;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    pixmap.encode_png().map_err(|_| unavailable())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(asset: &IconAsset, x: u32, y: u32) -> u8 {
        let pixmap = Pixmap::decode_png(&asset.png).unwrap();
        pixmap.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn test_builtin_airplane() {
        let provider = RasterIconProvider::new();
        let icon = provider.get_icon(FLIGHT_ICON).unwrap();
        let pixmap = Pixmap::decode_png(&icon.png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (64, 64));
        // Fuselage is filled, corners are empty
        assert_eq!(alpha_at(&icon, 32, 30), 255);
        assert_eq!(alpha_at(&icon, 1, 1), 0);
    }

    #[test]
    fn test_unknown_icon_is_unavailable() {
        let provider = RasterIconProvider::new();
        assert!(matches!(
            provider.get_icon("zeppelin"),
            Err(IconError::RenderUnavailable(_))
        ));
    }

    #[test]
    fn test_rotate_turns_clockwise() {
        let provider = RasterIconProvider::new();
        let icon = provider.get_icon(FLIGHT_ICON).unwrap();
        // Left wingtip sits at (6, 40); a quarter turn clockwise moves it up to (23, 6)
        assert_eq!(alpha_at(&icon, 23, 6), 0);
        assert!(alpha_at(&icon, 6, 40) > 200);

        let rotated = provider.rotate(&icon, 90.0).unwrap();
        assert!(alpha_at(&rotated, 23, 6) > 200);
        assert_ne!(rotated.png, icon.png);
    }

    #[test]
    fn test_rotate_leaves_source_untouched() {
        let provider = RasterIconProvider::new();
        let icon = provider.get_icon(FLIGHT_ICON).unwrap();
        let before = icon.clone();

        let a = provider.rotate(&icon, 45.0).unwrap();
        let b = provider.rotate(&icon, 200.0).unwrap();
        let a_again = provider.rotate(&icon, 45.0).unwrap();

        assert_eq!(icon, before);
        assert_ne!(a.png, b.png);
        assert_eq!(a, a_again);
    }

    #[test]
    fn test_rotate_rejects_garbage() {
        let provider = RasterIconProvider::new();
        let bogus = IconAsset {
            name: "broken".to_string(),
            png: vec![1, 2, 3],
        };
        assert!(matches!(
            provider.rotate(&bogus, 10.0),
            Err(IconError::RenderUnavailable(_))
        ));
    }

    #[test]
    fn test_rotate_rejects_non_finite_angle() {
        let provider = RasterIconProvider::new();
        let icon = provider.get_icon(FLIGHT_ICON).unwrap();
        for degrees in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                provider.rotate(&icon, degrees),
                Err(IconError::RenderUnavailable(_))
            ));
        }
    }

    #[test]
    fn test_icon_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        std::fs::write(dir.path().join("airplane.png"), pixmap.encode_png().unwrap()).unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

        let provider = RasterIconProvider::with_icon_dir(Some(dir.path().to_path_buf()));
        let icon = provider.get_icon(FLIGHT_ICON).unwrap();
        let decoded = Pixmap::decode_png(&icon.png).unwrap();
        assert_eq!(decoded.width(), 8);

        assert!(provider.get_icon("broken").is_err());
    }

    #[test]
    fn test_data_uri() {
        let asset = IconAsset {
            name: "x".to_string(),
            png: b"TEST".to_vec(),
        };
        assert_eq!(asset.data_uri(), "data:image/png;base64,VEVTVA==");
    }
}
