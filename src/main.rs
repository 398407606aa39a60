use std::error::Error;

use qrforge::{ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let data = std::env::args().nth(1).unwrap_or_else(|| "Hello, world!".to_string());

    let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::M).build()?;
    println!("{}", qr.to_str(1));

    if let Some(path) = std::env::args().nth(2) {
        qr.to_image(10).save(&path)?;
        println!("Saved to {path}");
    }

    Ok(())
}
