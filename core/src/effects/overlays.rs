//! Full-screen overlays drawn after every particle layer.

use crate::render::{Canvas, Fill, Rgba};

const GRAIN_SPECKS: usize = 2000;

/// Dark rows of height 2 every 4 logical pixels.
pub(super) fn scanlines(canvas: &mut Canvas, width: f32, height: f32) {
    let shade = Fill::Solid(Rgba::BLACK.with_alpha(0.3));
    let mut y = 0.0;
    while y < height {
        canvas.fill_rect(0.0, y, width, 2.0, &shade);
        y += 4.0;
    }
}

/// Darkened corners: clear inside a third of the height, 80% black at the rim.
pub(super) fn vignette(canvas: &mut Canvas, width: f32, height: f32) {
    let fill = Fill::radial(
        (width / 2.0, height / 2.0),
        height,
        &[
            (1.0 / 3.0, Rgba::BLACK.with_alpha(0.0)),
            (1.0, Rgba::BLACK.with_alpha(0.8)),
        ],
    );
    canvas.fill_rect(0.0, 0.0, width, height, &fill);
}

/// Single-pixel white and black specks at positions derived from `seed`.
pub(super) fn film_grain(canvas: &mut Canvas, width: f32, height: f32, seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    for color in [Rgba::WHITE, Rgba::BLACK] {
        let speck = Fill::Solid(color.with_alpha(0.1));
        for _ in 0..GRAIN_SPECKS {
            canvas.fill_rect(rng.f32() * width, rng.f32() * height, 1.0, 1.0, &speck);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanlines_alternate_rows() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.clear(Rgba::WHITE);
        scanlines(&mut canvas, 8.0, 8.0);
        let dark = canvas.pixel(3, 1).unwrap();
        let clear = canvas.pixel(3, 2).unwrap();
        assert!(dark[0] < 200);
        assert_eq!(clear, [255, 255, 255, 255]);
    }

    #[test]
    fn test_vignette_leaves_centre_untouched() {
        let mut canvas = Canvas::new(90, 60).unwrap();
        canvas.clear(Rgba::WHITE);
        vignette(&mut canvas, 90.0, 60.0);
        assert_eq!(canvas.pixel(45, 30).unwrap(), [255, 255, 255, 255]);
        assert!(canvas.pixel(0, 0).unwrap()[0] < 200);
    }

    #[test]
    fn test_grain_is_reproducible_per_seed() {
        let mut a = Canvas::new(32, 32).unwrap();
        let mut b = Canvas::new(32, 32).unwrap();
        a.clear(Rgba::rgb8(128, 128, 128));
        b.clear(Rgba::rgb8(128, 128, 128));
        film_grain(&mut a, 32.0, 32.0, 42);
        film_grain(&mut b, 32.0, 32.0, 42);
        assert_eq!(a.to_rgba8(), b.to_rgba8());

        let mut c = Canvas::new(32, 32).unwrap();
        c.clear(Rgba::rgb8(128, 128, 128));
        film_grain(&mut c, 32.0, 32.0, 43);
        assert_ne!(a.to_rgba8(), c.to_rgba8());
    }
}
