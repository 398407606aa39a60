use image::{GrayImage, Luma};
use std::ops::Deref;

use crate::mask::MaskPattern;
use crate::metadata::*;
use crate::utils::bitstream::BitStream;
use crate::utils::error::{QRError, QRResult};
use crate::utils::iter::EncRegionIter;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        debug_assert!(matches!(ver, Version::Normal(1..=40)), "Invalid version");

        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&m| matches!(*m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the finder with its separator around center (r, c), the ring
    // nearest the edge clamped to the separator
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                let m =
                    if j & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(r1, j, m);
            }
        } else {
            for i in r1..=r2 {
                let m =
                    if i & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(i, c1, m);
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Centers overlapping the finder patterns are skipped
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // All ones, so the encoding region iterator sees these as taken before
    // the mask is chosen
    pub(crate) fn reserve_format_area(&mut self) {
        self.draw_format_info(((1u32 << FORMAT_INFO_BIT_LEN) - 1) as u32);
    }

    pub(crate) fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_MAIN,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_SIDE,
        );
        // Dark module, always set beside the bottom left finder
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if matches!(self.ver, Version::Normal(7..=40)) {
            let ver_info = self.ver.info();
            self.draw_number(
                ver_info,
                VERSION_INFO_BIT_LEN,
                Module::Version(Color::Light),
                Module::Version(Color::Dark),
                &VERSION_INFO_COORDS_BL,
            );
            self.draw_number(
                ver_info,
                VERSION_INFO_BIT_LEN,
                Module::Version(Color::Light),
                Module::Version(Color::Dark),
                &VERSION_INFO_COORDS_TR,
            );
        }
    }

    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use super::QR;
    use crate::metadata::{ECLevel, Version};

    #[test]
    fn test_version_info_1() {
        let mut qr = QR::new(Version::Normal(1), ECLevel::L);
        qr.draw_version_info();
        assert!(qr.to_debug_str().chars().all(|c| c == '.' || c == '\n'));
    }

    #[test]
    fn test_version_info_7() {
        let mut qr = QR::new(Version::Normal(7), ECLevel::L);
        qr.draw_version_info();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ..................................VVv........\n\
             ..................................VvV........\n\
             ..................................VvV........\n\
             ..................................Vvv........\n\
             ..................................vvv........\n\
             ..................................VVV........\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             VVVVvV.......................................\n\
             VvvvvV.......................................\n\
             vVVvvV.......................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n"
        );
    }

    #[test]
    fn test_reserve_format_info() {
        let mut qr = QR::new(Version::Normal(1), ECLevel::L);
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }

    #[test]
    fn test_all_function_patterns_and_qr_info() {
        let mut qr = QR::new(Version::Normal(7), ECLevel::L);
        qr.draw_all_function_patterns();
        qr.draw_version_info();
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffFm.........................VVvFfffffff\n\
             fFFFFFfFm.........................VvVFfFFFFFf\n\
             fFfffFfFm.........................VvVFfFfffFf\n\
             fFfffFfFm.........................VvvFfFfffFf\n\
             fFfffFfFm...........fffff.........vvvFfFfffFf\n\
             fFFFFFfFm...........fFFFf.........VVVFfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFFm...........fFFFf............FFFFFFFF\n\
             mmmmmmfmm...........fffff............mmmmmmmm\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ....fffff...........fffff...........fffff....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fFfFf...........fFfFf...........fFfFf....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fffff...........fffff...........fffff....\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             VVVVvVf......................................\n\
             VvvvvVF......................................\n\
             vVVvvVf.............fffff...........fffff....\n\
             FFFFFFFFm...........fFFFf...........fFFFf....\n\
             fffffffFm...........fFfFf...........fFfFf....\n\
             fFFFFFfFm...........fFFFf...........fFFFf....\n\
             fFfffFfFm...........fffff...........fffff....\n\
             fFfffFfFm....................................\n\
             fFfffFfFm....................................\n\
             fFFFFFfFm....................................\n\
             fffffffFm....................................\n"
        );
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Reserves the info areas and lays the payload bits into the encoding
    /// region. The payload must fill the region exactly, any mismatch aborts
    /// the build rather than emit a corrupt symbol.
    pub fn draw_encoding_region(&mut self, payload: &BitStream) -> QRResult<()> {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload)?;

        if let Some(pos) = self.grid.iter().position(|&m| m == Module::Empty) {
            return Err(QRError::InvariantViolation(format!(
                "Unfilled module at ({}, {})",
                pos / self.w,
                pos % self.w
            )));
        }
        Ok(())
    }

    fn draw_payload(&mut self, payload: &BitStream) -> QRResult<()> {
        let exp_bits = self.ver.total_codewords() << 3;
        if payload.len() != exp_bits {
            return Err(QRError::InvariantViolation(format!(
                "Payload is {} bits, encoding region expects {exp_bits}",
                payload.len()
            )));
        }

        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload.iter() {
            let (r, c) = coords.next().ok_or_else(|| {
                QRError::InvariantViolation("Encoding region exhausted before payload".into())
            })?;
            let module = Module::Data(if bit { Color::Dark } else { Color::Light });
            self.set(r, c, module);
        }
        self.fill_remainder_bits(&mut coords);

        debug_assert!(coords.next().is_none(), "Encoding region not exhausted");
        Ok(())
    }

    // Remainder bits are always light
    fn fill_remainder_bits(&mut self, coords: &mut EncRegionIter) {
        let n = self.ver.remainder_bits();
        for (r, c) in coords.take(n) {
            self.set(r, c, Module::Data(Color::Light));
        }
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = format_info(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::QR;
    use crate::mask::MaskPattern;
    use crate::metadata::{Color, ECLevel, Version};
    use crate::utils::bitstream::BitStream;
    use crate::utils::error::QRError;

    fn full_payload(ver: Version) -> BitStream {
        let bits = ver.total_codewords() << 3;
        let mut bs = BitStream::new(bits);
        for i in 0..bits {
            bs.push(i & 1 == 0);
        }
        bs
    }

    #[test]
    fn test_draw_encoding_region_fills_grid() {
        for v in [1, 2, 7, 14, 21, 28, 35] {
            let ver = Version::Normal(v);
            let mut qr = QR::new(ver, ECLevel::L);
            qr.draw_all_function_patterns();
            qr.draw_encoding_region(&full_payload(ver)).unwrap();
        }
    }

    #[test]
    fn test_draw_encoding_region_payload_too_short() {
        let ver = Version::Normal(1);
        let mut qr = QR::new(ver, ECLevel::L);
        qr.draw_all_function_patterns();
        let payload = BitStream::new(8);
        let res = qr.draw_encoding_region(&payload);
        assert!(matches!(res, Err(QRError::InvariantViolation(_))));
    }

    #[test]
    fn test_apply_mask_flips_data_only() {
        let ver = Version::Normal(1);
        let mut qr = QR::new(ver, ECLevel::L);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&full_payload(ver)).unwrap();
        let before = qr.clone();
        qr.apply_mask(MaskPattern::new(0));
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                match before.get(r, c) {
                    super::Module::Data(clr) if (r + c) & 1 == 0 => {
                        assert_eq!(*qr.get(r, c), !clr, "({r}, {c})");
                    }
                    super::Module::Data(clr) => {
                        assert_eq!(*qr.get(r, c), clr, "({r}, {c})");
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_apply_mask_writes_format_info() {
        let ver = Version::Normal(1);
        let mut qr = QR::new(ver, ECLevel::M);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&full_payload(ver)).unwrap();
        qr.apply_mask(MaskPattern::new(0));
        // M with mask 0 is 0x5412, msb at (8, 0)
        let exp = 0x5412;
        for (i, (r, c)) in crate::metadata::FORMAT_INFO_COORDS_QR_MAIN.iter().enumerate() {
            let bit = exp >> (14 - i) & 1 == 1;
            let clr = if bit { Color::Dark } else { Color::Light };
            assert_eq!(*qr.get(*r, *c), clr, "bit {i}");
        }
        assert_eq!(*qr.get(-8, 8), Color::Dark);
    }
}

// Render
//------------------------------------------------------------------------------

impl QR {
    /// Renders to a grayscale image with the standard 4 module quiet zone.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = 4 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::new(total_sz, total_sz);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.put_pixel(j, i, Luma([255]));
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                let pixel = self.get(r as i16, c as i16).select(Luma([0]), Luma([255]));
                canvas.put_pixel(j, i, pixel);
            }
        }

        canvas
    }

    /// Renders to a terminal printable string, one char per module.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = 4 * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push(' ');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}
