//! # qrforge
//!
//! A Rust library for generating QR codes (ISO/IEC 18004) with Reed-Solomon
//! error correction and customizable rendering. The pipeline is explicit and
//! staged: data encoding, version selection, error correction, matrix
//! building, mask selection and rasterization, each independently testable.
//!
//! ## Features
//!
//! - **QR Code Generation**: Versions 1-40 with numeric, alphanumeric and byte
//!   segments chosen by an optimal mixed-mode segmenter
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H) with
//!   standard block interleaving
//! - **Mask Selection**: All 8 masks scored with the four penalty rules,
//!   lowest penalty wins
//! - **Rendering**: Colored pixel images at any module scale, optional quiet
//!   zone, and a centered logo overlay with a contrasting backing shape
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! let img = qr.to_image(4); // 4x scale factor
//! img.save("simple_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskPattern, QRBuilder, RenderConfig, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::Normal(2)) // If not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::M)        // If not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))   // If not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = qr.render(&RenderConfig::default())?;
//! img.save("configured_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logo Overlay
//!
//! Rendering with a logo obscures part of the symbol; choosing an error
//! correction level that covers the obscured area (typically `Q` or `H` for
//! logos up to a quarter of the width) is the caller's responsibility.
//!
//! ```rust,no_run
//! use qrforge::{BackingShape, ECLevel, Logo, QRBuilder, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logo = image::open("logo.png")?.to_rgba8();
//! let qr = QRBuilder::new(b"https://example.com").ec_level(ECLevel::H).build()?;
//! let img = qr.render(&RenderConfig {
//!     logo: Some(Logo { image: logo, size: 0.2, backing: BackingShape::Rounded }),
//!     ..Default::default()
//! })?;
//! img.save("logo_qr.png")?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod codec;
pub mod mask;
pub mod metadata;
pub mod render;
pub(crate) mod utils;

pub use builder::{QRBuilder, QR};
pub use mask::MaskPattern;
pub use metadata::{Color, ECLevel, Version};
pub use render::{BackingShape, Logo, RenderConfig};
pub use utils::bitstream::BitStream;
pub use utils::error::{QRError, QRResult};
