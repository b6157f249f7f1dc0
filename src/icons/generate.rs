use crate::ReportError;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::info;

/// Side length of a generated icon, in pixels
pub const ICON_PIXELS: u32 = 32;

/// The built-in icon set, drawn from simple pixel rules on a transparent background
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IconShape {
    Check,
    Close,
    Book,
    Target,
    Rocket,
}

impl IconShape {
    pub const ALL: [IconShape; 5] = [
        IconShape::Check,
        IconShape::Close,
        IconShape::Book,
        IconShape::Target,
        IconShape::Rocket,
    ];

    /// The glyph this icon replaces in message text
    pub fn token(&self) -> &'static str {
        match self {
            IconShape::Check => "✅",
            IconShape::Close => "❌",
            IconShape::Book => "📚",
            IconShape::Target => "🎯",
            IconShape::Rocket => "🚀",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            IconShape::Check => "check.png",
            IconShape::Close => "close.png",
            IconShape::Book => "book.png",
            IconShape::Target => "target.png",
            IconShape::Rocket => "rocket.png",
        }
    }

    fn colour(&self) -> Rgba<u8> {
        match self {
            IconShape::Check => Rgba([0, 255, 0, 255]),
            IconShape::Close => Rgba([255, 0, 0, 255]),
            IconShape::Book => Rgba([0, 0, 255, 255]),
            IconShape::Target => Rgba([255, 165, 0, 255]),
            IconShape::Rocket => Rgba([128, 0, 128, 255]),
        }
    }

    /// Whether the pixel at column `x`, row `y` is painted
    fn covers(&self, x: u32, y: u32) -> bool {
        match self {
            IconShape::Check => {
                ((5..=12).contains(&x) && (8..=14).contains(&y))
                    || ((8..=24).contains(&x) && (14..=20).contains(&y))
            }
            IconShape::Close => {
                let corner = |v: u32| (5..=12).contains(&v) || (20..=27).contains(&v);
                corner(x) && corner(y)
            }
            IconShape::Book => (5..=27).contains(&x) && (5..=27).contains(&y),
            IconShape::Target => {
                let dx = x as f64 - 16.0;
                let dy = y as f64 - 16.0;
                let distance = (dx * dx + dy * dy).sqrt();
                (8.0..=12.0).contains(&distance)
            }
            IconShape::Rocket => (8..=24).contains(&x) && (5..=27).contains(&y),
        }
    }

    pub fn render(&self) -> RgbaImage {
        let colour = self.colour();
        RgbaImage::from_fn(ICON_PIXELS, ICON_PIXELS, |x, y| {
            if self.covers(x, y) {
                colour
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }
}

/// Render every built-in icon into `dir` as PNG, creating the directory if needed.
/// Returns the written paths.
pub fn write_default_icons<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(IconShape::ALL.len());
    for shape in IconShape::ALL {
        let path = dir.join(shape.file_name());
        shape.render().save(&path)?;
        info!(path = %path.display(), "wrote icon");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;

    fn painted(shape: IconShape) -> usize {
        shape.render().pixels().filter(|p| p.0[3] == 255).count()
    }

    #[test]
    fn shapes_paint_expected_pixel_counts() {
        // check: 8x7 + 17x7 minus the 5 pixel overlap at row 14
        assert_eq!(painted(IconShape::Check), 56 + 119 - 5);
        assert_eq!(painted(IconShape::Close), 4 * 64);
        assert_eq!(painted(IconShape::Book), 23 * 23);
        assert_eq!(painted(IconShape::Rocket), 17 * 23);
    }

    #[test]
    fn target_is_a_ring() {
        let image = IconShape::Target.render();
        assert_eq!(image.get_pixel(16, 16).0[3], 0);
        assert_eq!(*image.get_pixel(16, 6), Rgba([255, 165, 0, 255]));
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn writes_every_icon_as_png() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let target = dir.path().join("images");
        let written = write_default_icons(&target).expect("can write icons");
        assert_eq!(written.len(), 5);
        for path in written {
            let decoded = image::open(&path).expect("written icon decodes");
            assert_eq!((decoded.width(), decoded.height()), (ICON_PIXELS, ICON_PIXELS));
        }
    }
}
