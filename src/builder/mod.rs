pub mod ec;
mod qr;

pub use qr::{Module, QR};

use log::debug;

use crate::codec::{encode, encode_with_version};
use crate::mask::{apply_best_mask, MaskPattern};
use crate::metadata::{ECLevel, Version};
use crate::utils::bitstream::BitStream;
use crate::utils::error::{QRError, QRResult};

use self::ec::{ecc, interleave};

/// Builds a [`QR`] from raw data, choosing version and mask where the caller
/// leaves them unset.
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {}, Ec level: {:?} }}", *v, self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        // Encode data optimally
        debug!("Encoding data...");
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, v, self.ec_level)?, v),
            None => encode(self.data, self.ec_level)?,
        };

        // Compute error correction codewords and interleave
        debug!("Constructing payload with ecc & interleaving...");
        let total_codewords = version.total_codewords();
        let mut payload = BitStream::new(total_codewords << 3);
        let (data_blocks, ecc_blocks) = ecc(encoded_data.data(), version, self.ec_level);
        payload.extend(&interleave(&data_blocks));
        payload.extend(&interleave(&ecc_blocks));

        // Construct QR
        debug!("Drawing functional patterns...");
        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();

        debug!("Drawing encoding region...");
        qr.draw_encoding_region(&payload)?;

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        let total_modules = version.width() * version.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            "QR generated: version {version}, mask {}, dark balance {}%",
            *mask,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }
}
