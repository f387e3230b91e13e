//! Software drawing surface backed by a `tiny_skia::Pixmap`.
//!
//! Drawing happens in *logical* coordinates (the 1920x1080 working
//! resolution by default). A base transform maps logical space onto the
//! device pixmap, so the same draw code renders a 720p export or a tiny
//! test surface. On top of the base sits a save/restore stack of
//! transform + global alpha, mirroring an immediate-mode 2D context.

use tiny_skia::{
    BlendMode, FillRule, FilterQuality, GradientStop, IntRect, LineCap, LineJoin, LinearGradient,
    Paint, Path, PathBuilder, Pixmap, PixmapPaint, PixmapRef, Point, RadialGradient, Rect, Shader,
    SpreadMode, Stroke, Transform,
};

use super::color::Rgba;

/// Errors raised by the drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to allocate a {0}x{1} surface")]
    Allocation(u32, u32),
    #[error("blit region lies outside the surface")]
    InvalidRegion,
}

/// Paint source for fills and strokes.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    Linear {
        start: (f32, f32),
        end: (f32, f32),
        stops: Vec<(f32, Rgba)>,
    },
    /// Radial gradient centred on `center`; stop 0.0 is the centre, 1.0 the rim.
    Radial {
        center: (f32, f32),
        radius: f32,
        stops: Vec<(f32, Rgba)>,
    },
}

impl Fill {
    pub fn linear(start: (f32, f32), end: (f32, f32), stops: &[(f32, Rgba)]) -> Self {
        Fill::Linear {
            start,
            end,
            stops: stops.to_vec(),
        }
    }

    pub fn radial(center: (f32, f32), radius: f32, stops: &[(f32, Rgba)]) -> Self {
        Fill::Radial {
            center,
            radius,
            stops: stops.to_vec(),
        }
    }

    fn shader(&self, opacity: f32) -> Option<Shader<'static>> {
        let stops = |stops: &[(f32, Rgba)]| -> Vec<GradientStop> {
            stops
                .iter()
                .map(|(pos, c)| GradientStop::new(*pos, c.with_alpha(c.a * opacity).to_skia()))
                .collect()
        };

        match self {
            Fill::Solid(c) => Some(Shader::SolidColor(c.with_alpha(c.a * opacity).to_skia())),
            Fill::Linear { start, end, stops: s } => LinearGradient::new(
                Point::from_xy(start.0, start.1),
                Point::from_xy(end.0, end.1),
                stops(s),
                SpreadMode::Pad,
                Transform::identity(),
            ),
            Fill::Radial {
                center,
                radius,
                stops: s,
            } => {
                if *radius <= 0.0 {
                    return None;
                }
                let c = Point::from_xy(center.0, center.1);
                RadialGradient::new(c, c, *radius, stops(s), SpreadMode::Pad, Transform::identity())
            }
        }
    }
}

impl From<Rgba> for Fill {
    fn from(color: Rgba) -> Self {
        Fill::Solid(color)
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Transform,
    alpha: f32,
}

/// Immediate-mode drawing surface.
pub struct Canvas {
    pixmap: Pixmap,
    width: f32,
    height: f32,
    base: Transform,
    state: DrawState,
    stack: Vec<DrawState>,
    bounds: Option<[f32; 4]>,
}

impl Canvas {
    /// Surface whose logical size equals its pixel size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_working_size(width, height, width as f32, height as f32)
    }

    /// Surface of `device_width x device_height` pixels addressed in a
    /// `logical_width x logical_height` coordinate space.
    pub fn with_working_size(
        device_width: u32,
        device_height: u32,
        logical_width: f32,
        logical_height: f32,
    ) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(device_width, device_height)
            .ok_or(RenderError::Allocation(device_width, device_height))?;
        if logical_width <= 0.0 || logical_height <= 0.0 {
            return Err(RenderError::Allocation(device_width, device_height));
        }
        let base = Transform::from_scale(
            device_width as f32 / logical_width,
            device_height as f32 / logical_height,
        );
        Ok(Self {
            pixmap,
            width: logical_width,
            height: logical_height,
            base,
            state: DrawState {
                transform: base,
                alpha: 1.0,
            },
            stack: Vec::new(),
            bounds: None,
        })
    }

    /// Logical width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn device_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn device_height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Straight-alpha RGBA of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Whole surface as straight-alpha RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    // ------------------------------------------------------------------
    // State stack
    // ------------------------------------------------------------------

    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Depth of the save stack (0 when balanced).
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.pre_scale(sx, sy);
    }

    /// Rotate by `radians` about the current origin.
    pub fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform.pre_concat(Transform::from_rotate(radians.to_degrees()));
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    // ------------------------------------------------------------------
    // Geometry tracking
    // ------------------------------------------------------------------

    /// Device-space bounding box `[left, top, right, bottom]` of everything
    /// drawn since the last [`Canvas::reset_bounds`].
    pub fn drawn_bounds(&self) -> Option<[f32; 4]> {
        self.bounds
    }

    pub fn reset_bounds(&mut self) {
        self.bounds = None;
    }

    fn note_bounds(&mut self, rect: Rect, inflate: f32) {
        let mut points = [
            Point::from_xy(rect.left() - inflate, rect.top() - inflate),
            Point::from_xy(rect.right() + inflate, rect.top() - inflate),
            Point::from_xy(rect.left() - inflate, rect.bottom() + inflate),
            Point::from_xy(rect.right() + inflate, rect.bottom() + inflate),
        ];
        self.state.transform.map_points(&mut points);
        let mut b = self.bounds.unwrap_or([f32::MAX, f32::MAX, f32::MIN, f32::MIN]);
        for p in points {
            b[0] = b[0].min(p.x);
            b[1] = b[1].min(p.y);
            b[2] = b[2].max(p.x);
            b[3] = b[3].max(p.y);
        }
        self.bounds = Some(b);
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn paint(&self, fill: &Fill) -> Option<Paint<'static>> {
        let mut paint = Paint::default();
        paint.shader = fill.shader(self.state.alpha)?;
        paint.anti_alias = true;
        Some(paint)
    }

    /// Fill the whole device surface, ignoring transform and alpha.
    pub fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: &Fill) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let (Some(rect), Some(paint)) = (Rect::from_xywh(x, y, w, h), self.paint(fill)) else {
            return;
        };
        self.pixmap.fill_rect(rect, &paint, self.state.transform, None);
        self.note_bounds(rect, 0.0);
    }

    pub fn fill_path(&mut self, path: &Path, fill: &Fill) {
        let Some(paint) = self.paint(fill) else {
            return;
        };
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.state.transform, None);
        self.note_bounds(path.bounds(), 0.0);
    }

    pub fn stroke_path(&mut self, path: &Path, fill: &Fill, width: f32) {
        self.stroke_with(path, fill, width, LineCap::Butt);
    }

    pub fn stroke_path_round(&mut self, path: &Path, fill: &Fill, width: f32) {
        self.stroke_with(path, fill, width, LineCap::Round);
    }

    fn stroke_with(&mut self, path: &Path, fill: &Fill, width: f32, cap: LineCap) {
        if width <= 0.0 {
            return;
        }
        let Some(paint) = self.paint(fill) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: cap,
            line_join: if cap == LineCap::Round {
                LineJoin::Round
            } else {
                LineJoin::Miter
            },
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.state.transform, None);
        self.note_bounds(path.bounds(), width * 0.5);
    }

    /// Soft halo under a stroke, standing in for a canvas shadow blur.
    ///
    /// Halos are not geometry and do not extend [`Canvas::drawn_bounds`].
    pub fn glow_path(&mut self, path: &Path, color: Rgba, width: f32, blur: f32) {
        if blur <= 0.0 {
            return;
        }
        let bounds = self.bounds;
        for (spread, strength) in [(1.0, 0.12), (0.5, 0.2)] {
            let halo = color.with_alpha(color.a * strength);
            self.stroke_path_round(path, &Fill::Solid(halo), width + blur * spread * 2.0);
        }
        self.bounds = bounds;
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: &Fill) {
        if !(radius > 0.0) {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill_path(&path, fill);
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: &Fill, width: f32) {
        if !(radius > 0.0) {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.stroke_path(&path, fill, width);
        }
    }

    /// Filled circle with a soft halo of `blur` logical pixels.
    pub fn glow_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba, blur: f32) {
        if blur > 0.0 && radius > 0.0 {
            let bounds = self.bounds;
            self.fill_circle(cx, cy, radius + blur, &Fill::Solid(color.with_alpha(color.a * 0.15)));
            self.fill_circle(
                cx,
                cy,
                radius + blur * 0.5,
                &Fill::Solid(color.with_alpha(color.a * 0.25)),
            );
            self.bounds = bounds;
        }
        self.fill_circle(cx, cy, radius, &Fill::Solid(color));
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), fill: &Fill, width: f32, round: bool) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else {
            return;
        };
        if round {
            self.stroke_path_round(&path, fill, width);
        } else {
            self.stroke_path(&path, fill, width);
        }
    }

    /// Draw `image` scaled into the logical rectangle `(x, y, w, h)`.
    pub fn draw_image(&mut self, image: PixmapRef<'_>, x: f32, y: f32, w: f32, h: f32, opacity: f32) {
        if w <= 0.0 || h <= 0.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let transform = self
            .state
            .transform
            .pre_translate(x, y)
            .pre_scale(w / image.width() as f32, h / image.height() as f32);
        let paint = PixmapPaint {
            opacity: (opacity * self.state.alpha).clamp(0.0, 1.0),
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        self.pixmap.draw_pixmap(0, 0, image, &paint, transform, None);
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.note_bounds(rect, 0.0);
        }
    }

    /// Copy an untransformed logical region of the surface back onto itself
    /// at `(dx, dy)` under the current transform.
    ///
    /// The source is clipped to the surface; an empty intersection is an error.
    pub fn blit_region(
        &mut self,
        source: (f32, f32, f32, f32),
        dx: f32,
        dy: f32,
    ) -> Result<(), RenderError> {
        let (sx, sy, sw, sh) = source;
        let scale_x = self.base.sx;
        let scale_y = self.base.sy;

        let left = (sx * scale_x).floor().max(0.0);
        let top = (sy * scale_y).floor().max(0.0);
        let right = ((sx + sw) * scale_x).ceil().min(self.pixmap.width() as f32);
        let bottom = ((sy + sh) * scale_y).ceil().min(self.pixmap.height() as f32);
        if !(right > left && bottom > top) {
            return Err(RenderError::InvalidRegion);
        }

        let rect = IntRect::from_xywh(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
        .ok_or(RenderError::InvalidRegion)?;
        let slice = self
            .pixmap
            .clone_rect(rect)
            .ok_or(RenderError::InvalidRegion)?;

        let dest_x = dx + (left / scale_x - sx);
        let dest_y = dy + (top / scale_y - sy);
        self.draw_image(
            slice.as_ref(),
            dest_x,
            dest_y,
            (right - left) / scale_x,
            (bottom - top) / scale_y,
            1.0,
        );
        Ok(())
    }
}

/// Build a pixmap from straight-alpha RGBA bytes.
pub fn pixmap_from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation(width, height))?;
    if rgba.len() != pixmap.data().len() {
        return Err(RenderError::Allocation(width, height));
    }
    for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(rgba.chunks_exact(4)) {
        let alpha = src[3] as u16;
        dst[0] = ((src[0] as u16 * alpha + 127) / 255) as u8;
        dst[1] = ((src[1] as u16 * alpha + 127) / 255) as u8;
        dst[2] = ((src[2] as u16 * alpha + 127) / 255) as u8;
        dst[3] = src[3];
    }
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_fill_rect() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.clear(Rgba::BLACK);
        canvas.fill_rect(0.0, 0.0, 4.0, 8.0, &Fill::Solid(Rgba::rgb8(255, 0, 0)));
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(6, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_logical_space_scales_to_device() {
        let mut canvas = Canvas::with_working_size(10, 10, 100.0, 100.0).unwrap();
        canvas.clear(Rgba::BLACK);
        canvas.fill_rect(50.0, 0.0, 50.0, 100.0, &Fill::Solid(Rgba::WHITE));
        assert_eq!(canvas.pixel(2, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(7, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_restore_transform_and_alpha() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.save();
        canvas.translate(5.0, 0.0);
        canvas.set_alpha(0.5);
        canvas.restore();
        assert_eq!(canvas.alpha(), 1.0);
        assert_eq!(canvas.save_depth(), 0);

        canvas.clear(Rgba::BLACK);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, &Fill::Solid(Rgba::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.fill_rect(0.0, 0.0, 0.0, 5.0, &Fill::Solid(Rgba::WHITE));
        canvas.fill_circle(5.0, 5.0, 0.0, &Fill::Solid(Rgba::WHITE));
        canvas.stroke_circle(5.0, 5.0, -1.0, &Fill::Solid(Rgba::WHITE), 2.0);
        assert!(canvas.drawn_bounds().is_none());
    }

    #[test]
    fn test_blit_region_copies_slice() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.clear(Rgba::BLACK);
        canvas.fill_rect(0.0, 0.0, 2.0, 10.0, &Fill::Solid(Rgba::WHITE));
        canvas.blit_region((0.0, 0.0, 10.0, 3.0), 5.0, 0.0).unwrap();
        assert_eq!(canvas.pixel(6, 1), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(6, 8), Some([0, 0, 0, 255]));
        assert!(canvas.blit_region((0.0, 20.0, 10.0, 3.0), 0.0, 0.0).is_err());
    }

    #[test]
    fn test_pixmap_from_rgba8_premultiplies() {
        let pixmap = pixmap_from_rgba8(1, 1, &[255, 0, 0, 128]).unwrap();
        assert_eq!(pixmap.data(), &[128, 0, 0, 128]);
        assert!(pixmap_from_rgba8(2, 2, &[0; 4]).is_err());
    }
}
