//! Local rendering of provisioning URIs as QR codes. Nothing here touches
//! the network.

use base64::{engine::general_purpose::STANDARD, Engine};
use qrcode::{
    render::{svg, unicode},
    QrCode,
};

use crate::error::{OtpError, Result};

const SVG_MIN_SIZE: u32 = 200;

fn encode(data: &str) -> Result<QrCode> {
    QrCode::new(data.as_bytes()).map_err(|err| OtpError::QrCode(err.to_string()))
}

/// Half-block text rendering for terminals with a dark background.
pub fn render_terminal(data: &str) -> Result<String> {
    Ok(encode(data)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

pub fn render_svg(data: &str) -> Result<String> {
    Ok(encode(data)?
        .render::<svg::Color>()
        .min_dimensions(SVG_MIN_SIZE, SVG_MIN_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// SVG rendering wrapped in a `data:` URI, ready for an `<img src>`.
pub fn render_svg_data_uri(data: &str) -> Result<String> {
    let svg = render_svg(data)?;
    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
}
