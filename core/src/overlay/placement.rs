//! Where overlay images land on the logical canvas.

/// Logical-space rectangle `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an image to cover the whole canvas, centred and cropped.
pub fn cover(image_w: f32, image_h: f32, canvas_w: f32, canvas_h: f32) -> Option<Placement> {
    if !(image_w > 0.0 && image_h > 0.0) {
        return None;
    }
    let scale = (canvas_w / image_w).max(canvas_h / image_h);
    let width = image_w * scale;
    let height = image_h * scale;
    Some(Placement {
        x: (canvas_w - width) / 2.0,
        y: (canvas_h - height) / 2.0,
        width,
        height,
    })
}

/// Logo and sticker placement.
///
/// The width is 15% of the shorter canvas side times `scale`, the height
/// follows the image aspect ratio, and `pos_x`/`pos_y` are percentages of
/// the free space left of and above the image.
pub fn anchored(
    image_w: f32,
    image_h: f32,
    canvas_w: f32,
    canvas_h: f32,
    scale: f32,
    pos_x: f32,
    pos_y: f32,
) -> Option<Placement> {
    if !(image_w > 0.0 && image_h > 0.0) {
        return None;
    }
    let width = canvas_w.min(canvas_h) * 0.15 * scale;
    let height = width / (image_w / image_h);
    Some(Placement {
        x: (canvas_w - width) * (pos_x / 100.0),
        y: (canvas_h - height) * (pos_y / 100.0),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_crops_wide_image() {
        let p = cover(400.0, 100.0, 1920.0, 1080.0).unwrap();
        assert_eq!(p.height, 1080.0);
        assert_eq!(p.width, 4320.0);
        assert_eq!(p.x, -1200.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_anchored_corners() {
        let top_right = anchored(100.0, 50.0, 1920.0, 1080.0, 1.0, 95.0, 5.0).unwrap();
        assert_eq!(top_right.width, 162.0);
        assert_eq!(top_right.height, 81.0);
        assert!((top_right.x - (1920.0 - 162.0) * 0.95).abs() < 1e-3);

        let origin = anchored(100.0, 100.0, 1920.0, 1080.0, 2.0, 0.0, 0.0).unwrap();
        assert_eq!((origin.x, origin.y, origin.width), (0.0, 0.0, 324.0));
    }

    #[test]
    fn test_degenerate_image_is_skipped() {
        assert!(cover(0.0, 10.0, 100.0, 100.0).is_none());
        assert!(anchored(10.0, 0.0, 100.0, 100.0, 1.0, 50.0, 50.0).is_none());
    }
}
