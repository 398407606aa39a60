#[cfg(test)]
mod qr_proptests {

    use prop::string::string_regex;
    use proptest::prelude::*;

    use qrforge::{ECLevel, QRBuilder};

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn qr_strategy(regex: String) -> impl Strategy<Value = (ECLevel, String)> {
        ec_level_strategy().prop_flat_map(move |ecl| {
            let pattern = format!(r"{}{{1,120}}", regex);
            string_regex(&pattern).unwrap().prop_map(move |data| (ecl, data))
        })
    }

    fn roundtrip(data: &str, ecl: ECLevel) -> String {
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
        let mut img = rqrr::PreparedImage::prepare(qr.to_image(3));
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_meta, content) = grids[0].decode().expect("Failed to read QR");
        content
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proptest_numeric(params in qr_strategy("[0-9]".to_string())) {
            let (ecl, data) = params;
            prop_assert_eq!(data.clone(), roundtrip(&data, ecl));
        }

        #[test]
        fn proptest_alphanumeric(params in qr_strategy(r"[0-9A-Z $%*+\-./:]".to_string())) {
            let (ecl, data) = params;
            prop_assert_eq!(data.clone(), roundtrip(&data, ecl));
        }

        #[test]
        fn proptest_byte(params in qr_strategy("[ -~]".to_string())) {
            let (ecl, data) = params;
            prop_assert_eq!(data.clone(), roundtrip(&data, ecl));
        }
    }
}

#[cfg(test)]
mod qr_tests {
    use test_case::test_case;

    use qrforge::{ECLevel, QRBuilder, QRError, Version};

    fn decode(img: image::GrayImage) -> (rqrr::MetaData, String) {
        let mut img = rqrr::PreparedImage::prepare(img);
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        grids[0].decode().expect("Failed to read QR")
    }

    #[test_case("Hello, world!".to_string(), Version::Normal(1), ECLevel::L; "test_qr_1")]
    #[test_case("TEST".to_string(), Version::Normal(1), ECLevel::M; "test_qr_2")]
    #[test_case("12345".to_string(), Version::Normal(1), ECLevel::Q; "test_qr_3")]
    #[test_case("OK".to_string(), Version::Normal(1), ECLevel::H; "test_qr_4")]
    #[test_case("URL: https://example.com/a?b=c&d=e".repeat(3).to_string(), Version::Normal(7), ECLevel::L; "test_qr_5")]
    #[test_case("A11111111111111".repeat(11).to_string(), Version::Normal(7), ECLevel::M; "test_qr_6")]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3).to_string(), Version::Normal(7), ECLevel::Q; "test_qr_7")]
    #[test_case("1234567890".repeat(15).to_string(), Version::Normal(7), ECLevel::H; "test_qr_8")]
    #[test_case("URL: https://example.com/a?b=c&d=e".repeat(7).to_string(), Version::Normal(10), ECLevel::L; "test_qr_9")]
    #[test_case("A11111111111111".repeat(20).to_string(), Version::Normal(10), ECLevel::M; "test_qr_10")]
    #[test_case("aAAAAAAAAA1111111111111111AAAAAAAAAAa".repeat(4).to_string(), Version::Normal(10), ECLevel::Q; "test_qr_11")]
    #[test_case("1234567890".repeat(28).to_string(), Version::Normal(10), ECLevel::H; "test_qr_12")]
    #[test_case("URL: https://example.com/a?b=c&d=e".repeat(40).to_string(), Version::Normal(27), ECLevel::L; "test_qr_13")]
    #[test_case("A111111111111111".repeat(100).to_string(), Version::Normal(27), ECLevel::M; "test_qr_14")]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(20).to_string(), Version::Normal(27), ECLevel::Q; "test_qr_15")]
    #[test_case("1234567890".repeat(145).to_string(), Version::Normal(27), ECLevel::H; "test_qr_16")]
    #[test_case("URL: https://example.com/a?b=c&d=e".repeat(80).to_string(), Version::Normal(40), ECLevel::L; "test_qr_17")]
    #[test_case("A111111111111111".repeat(97).to_string(), Version::Normal(40), ECLevel::M; "test_qr_18")]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(42).to_string(), Version::Normal(40), ECLevel::Q; "test_qr_19")]
    #[test_case("1234567890".repeat(305).to_string(), Version::Normal(40), ECLevel::H; "test_qr_20")]
    fn test_qr(data: String, ver: Version, ecl: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes()).version(ver).ec_level(ecl).build().unwrap();

        let (meta, decoded) = decode(qr.to_image(3));
        assert_eq!(*ver, meta.version.0 as usize);
        assert_eq!(data, decoded);
    }

    #[test]
    fn test_hello_world_reference_codewords() {
        // Published v1-Q worked example
        let (bs, ver): (qrforge::BitStream, Version) =
            qrforge::codec::encode(b"HELLO WORLD", ECLevel::Q).unwrap();
        assert_eq!(ver, Version::Normal(1));
        assert_eq!(bs.data(), [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236]);

        let (data_blocks, ecc_blocks) = qrforge::builder::ec::ecc(bs.data(), ver, ECLevel::Q);
        assert_eq!(data_blocks.len(), 1);
        assert_eq!(ecc_blocks[0], [168, 72, 22, 82, 217, 54, 156, 0, 46, 15, 180, 122, 16]);
    }

    #[test]
    fn test_deterministic_build() {
        let a = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
        let b = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a.to_str(1), b.to_str(1));
    }

    #[test]
    fn test_capacity_boundary_v1_h() {
        // v1-H fits 17 numeric digits, not 18
        let ok = "1".repeat(17);
        let qr = QRBuilder::new(ok.as_bytes())
            .version(Version::Normal(1))
            .ec_level(ECLevel::H)
            .build();
        assert!(qr.is_ok());

        let too_long = "1".repeat(18);
        let res = QRBuilder::new(too_long.as_bytes())
            .version(Version::Normal(1))
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res.err(), Some(QRError::DataTooLong));
    }

    #[test_case(0; "mask_0")]
    #[test_case(2; "mask_2")]
    #[test_case(5; "mask_5")]
    #[test_case(7; "mask_7")]
    fn test_qr_with_fixed_mask(mask: u8) {
        let data = "FIXED MASK ROUNDTRIP".to_string();
        let qr = QRBuilder::new(data.as_bytes())
            .ec_level(ECLevel::M)
            .mask(qrforge::MaskPattern::new(mask))
            .build()
            .unwrap();
        let (_meta, decoded) = decode(qr.to_image(3));
        assert_eq!(data, decoded);
    }
}

#[cfg(test)]
mod render_tests {
    use image::{Rgba, RgbaImage};

    use qrforge::{BackingShape, ECLevel, Logo, QRBuilder, RenderConfig};

    #[test]
    fn test_render_roundtrip() {
        let data = "RENDERED ROUNDTRIP";
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::M).build().unwrap();
        let img = qr.render(&RenderConfig::default()).unwrap();
        let gray = image::DynamicImage::ImageRgba8(img).to_luma8();

        let mut img = rqrr::PreparedImage::prepare(gray);
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_meta, decoded) = grids[0].decode().unwrap();
        assert_eq!(data, decoded);
    }

    #[test]
    fn test_render_with_logo_roundtrip() {
        let data = "LOGO ROUNDTRIP AT LEVEL H";
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::H).build().unwrap();
        let logo = Logo {
            image: RgbaImage::from_pixel(32, 32, Rgba([220, 40, 40, 255])),
            size: 0.15,
            backing: BackingShape::Rounded,
        };
        let config = RenderConfig { module_size: 10, logo: Some(logo), ..Default::default() };
        let img = qr.render(&config).unwrap();
        let gray = image::DynamicImage::ImageRgba8(img).to_luma8();

        let mut img = rqrr::PreparedImage::prepare(gray);
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_meta, decoded) = grids[0].decode().unwrap();
        assert_eq!(data, decoded);
    }
}
