//! Document renderer: a stored record becomes a standalone HTML page, and a
//! text payload (usually that page's path) becomes a QR code PNG.
//!
//! Both functions are pure; saving the bytes is the caller's job (the CLI
//! uses [`crate::db::write_atomic`]).

use std::fmt::Write as _;
use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::QrCode;

use crate::{size, ArtifactRecord, AppError, AppResult};

/// Target edge for rendered QR codes. Whole-module rendering rounds up, so
/// the emitted image is the smallest module multiple at or above this.
pub const QR_TARGET_PX: u32 = 200;

const STYLE: &str = "\
            body {
                font-family: Arial, sans-serif;
                background-color: #E0F0FD;
                color: #0D47A1;
                margin: 20px;
            }
            h1, h2 {
                color: #0D47A1;
            }
            .section {
                margin-bottom: 20px;
            }
            .image {
                margin: 10px 0;
            }
            .biblio, .tags {
                background-color: #BBDEFB;
                padding: 10px;
                border-radius: 5px;
            }";

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a record as a self-contained UTF-8 HTML document.
///
/// Sections (description, images, references, location, size, tags) appear
/// only when their data is present — an absent section is omitted outright,
/// never rendered as an empty shell.
pub fn render_html(record: &ArtifactRecord) -> String {
    let title = escape_html(&record.title);
    let mut body = String::new();
    let _ = write!(body, "        <h1>{title}</h1>\n");

    if !record.description.is_empty() {
        let _ = write!(
            body,
            "        <div class=\"section\">\n            <h2>Description</h2>\n            <p>{}</p>\n        </div>\n",
            escape_html(&record.description)
        );
    }

    if !record.images.is_empty() {
        body.push_str("        <div class=\"section\">\n            <h2>Images</h2>\n");
        for image in &record.images {
            let _ = write!(
                body,
                "            <div class=\"image\"><p>{}</p></div>\n",
                escape_html(image)
            );
        }
        body.push_str("        </div>\n");
    }

    if !record.references.is_empty() {
        body.push_str(
            "        <div class=\"section\">\n            <h2>Bibliographic References</h2>\n            <div class=\"biblio\">\n                <ul>\n",
        );
        for reference in &record.references {
            let _ = write!(
                body,
                "                    <li>{}</li>\n",
                escape_html(reference)
            );
        }
        body.push_str("                </ul>\n            </div>\n        </div>\n");
    }

    if let Some(location) = &record.location {
        let _ = write!(
            body,
            "        <div class=\"section\">\n            <h2>Location</h2>\n            <p>{}</p>\n        </div>\n",
            escape_html(location)
        );
    }

    if !record.size.is_empty() {
        let _ = write!(
            body,
            "        <div class=\"section\">\n            <h2>Size</h2>\n            <p>{}</p>\n        </div>\n",
            escape_html(&size::format(&record.size))
        );
    }

    if !record.tags.is_empty() {
        let tags: Vec<String> = record.tags.iter().map(|tag| escape_html(tag)).collect();
        let _ = write!(
            body,
            "        <div class=\"section\">\n            <h2>Tags</h2>\n            <div class=\"tags\">\n                {}\n            </div>\n        </div>\n",
            tags.join(", ")
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>{title}</title>\n    <style>\n{STYLE}\n    </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Encode `payload` as a QR code and return the PNG bytes.
///
/// The payload is structural (a path or URL), so it must survive a decode
/// by any standard QR reader byte for byte.
pub fn render_qr(payload: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::new(payload.as_bytes()).map_err(|err| {
        AppError::new("RENDER/QR_ENCODE", err.to_string())
            .with_context("payload_len", payload.len().to_string())
    })?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_TARGET_PX, QR_TARGET_PX)
        .build();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| AppError::new("RENDER/PNG_ENCODE", err.to_string()))?;
    Ok(bytes)
}
