use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use log::warn;

use crate::builder::QR;
use crate::metadata::ECLevel;
use crate::utils::error::{QRError, QRResult};

// Render configuration
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingShape {
    Square,
    Rounded,
}

/// Centered logo overlay, drawn over a contrasting backing shape.
#[derive(Debug, Clone)]
pub struct Logo {
    pub image: RgbaImage,
    /// Side of the backing as a fraction of the rendered width, within (0, 1)
    pub size: f32,
    pub backing: BackingShape,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Pixels per module, at least 1
    pub module_size: u32,
    /// Quiet zone width in modules
    pub quiet_zone: u32,
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
    pub logo: Option<Logo>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: 4,
            foreground: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
            logo: None,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> QRResult<()> {
        if self.module_size == 0 {
            return Err(QRError::InvalidConfig("Module size must be at least 1".into()));
        }
        if let Some(logo) = &self.logo {
            if !(logo.size > 0.0 && logo.size < 1.0) {
                return Err(QRError::InvalidConfig(format!(
                    "Logo size fraction must be within (0, 1): {}",
                    logo.size
                )));
            }
        }
        Ok(())
    }
}

// Rasterizer
//------------------------------------------------------------------------------

impl QR {
    /// Rasterizes the matrix into a colored pixel buffer. The module colors
    /// carry no minimum EC guarantee for a logo; picking a level that covers
    /// the obscured area is the caller's responsibility.
    pub fn render(&self, config: &RenderConfig) -> QRResult<RgbaImage> {
        config.validate()?;

        if config.logo.is_some() && self.ec_level() < ECLevel::Q {
            warn!(
                "Rendering a logo over a {:?} level symbol; Q or H tolerates occlusion better",
                self.ec_level()
            );
        }

        let module_sz = config.module_size;
        let qz_sz = config.quiet_zone * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = RgbaImage::from_pixel(total_sz, total_sz, config.background);
        for i in 0..qr_sz {
            for j in 0..qr_sz {
                let r = (i / module_sz) as i16;
                let c = (j / module_sz) as i16;
                let px = self.get(r, c).select(config.foreground, config.background);
                canvas.put_pixel(qz_sz + j, qz_sz + i, px);
            }
        }

        if let Some(logo) = &config.logo {
            overlay_logo(&mut canvas, logo, config.background);
        }

        Ok(canvas)
    }
}

fn overlay_logo(canvas: &mut RgbaImage, logo: &Logo, backing_clr: Rgba<u8>) {
    let rect = logo_rect(canvas.width(), logo.size);
    draw_backing(canvas, rect, logo.backing, backing_clr);

    let margin = (rect.width() / 10).max(1);
    let inner = rect.width().saturating_sub(2 * margin).max(1);
    let scaled = imageops::resize(&logo.image, inner, inner, imageops::FilterType::Lanczos3);
    imageops::overlay(
        canvas,
        &scaled,
        rect.left() as i64 + margin as i64,
        rect.top() as i64 + margin as i64,
    );
}

/// Centered square region the logo backing occupies.
pub(crate) fn logo_rect(canvas_sz: u32, fraction: f32) -> Rect {
    let side = ((canvas_sz as f32 * fraction).round() as u32).clamp(1, canvas_sz);
    let offset = ((canvas_sz - side) / 2) as i32;
    Rect::at(offset, offset).of_size(side, side)
}

fn draw_backing(canvas: &mut RgbaImage, rect: Rect, shape: BackingShape, clr: Rgba<u8>) {
    match shape {
        BackingShape::Square => draw_filled_rect_mut(canvas, rect, clr),
        BackingShape::Rounded => {
            let radius = rect.width() / 4;
            // Too small to show rounding
            if radius == 0 {
                draw_filled_rect_mut(canvas, rect, clr);
                return;
            }
            let (l, t) = (rect.left(), rect.top());
            let (w, h) = (rect.width(), rect.height());
            draw_filled_rect_mut(
                canvas,
                Rect::at(l + radius as i32, t).of_size(w - 2 * radius, h),
                clr,
            );
            draw_filled_rect_mut(
                canvas,
                Rect::at(l, t + radius as i32).of_size(w, h - 2 * radius),
                clr,
            );
            let r = radius as i32;
            let corners = [
                (l + r, t + r),
                (l + w as i32 - r - 1, t + r),
                (l + r, t + h as i32 - r - 1),
                (l + w as i32 - r - 1, t + h as i32 - r - 1),
            ];
            for center in corners {
                draw_filled_circle_mut(canvas, center, r, clr);
            }
        }
    }
}
