//! Profile photo and QR code preparation.
//!
//! Both are fail-soft: a photo that does not decode is skipped and a QR payload
//! that does not encode leaves only its text behind. Neither aborts a render.

use std::sync::Arc;

use printpdf::image_crate::{self, DynamicImage};
use qrcode::QrCode;
use tracing::warn;

use crate::layout::{Align, ImageBlock, QrBlock};

/// 0.95in square.
pub const PROFILE_IMAGE_SIZE: f32 = 68.4;
pub const QR_SIZE: f32 = 62.0;

/// Decodes PNG/JPEG bytes into an opaque RGB image ready for embedding.
pub fn decode_profile_image(bytes: &[u8]) -> Option<DynamicImage> {
    if bytes.is_empty() {
        return None;
    }
    match image_crate::load_from_memory(bytes) {
        Ok(img) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        Err(e) => {
            warn!(error = %e, bytes = bytes.len(), "skipping undecodable profile image");
            None
        }
    }
}

pub fn profile_image_block(bytes: Option<&[u8]>, align: Align) -> Option<ImageBlock> {
    let image = decode_profile_image(bytes?)?;
    Some(ImageBlock {
        image: Arc::new(image),
        width: PROFILE_IMAGE_SIZE,
        height: PROFILE_IMAGE_SIZE,
        align,
    })
}

/// Encodes `payload` as a QR symbol. `None` when it exceeds QR capacity.
pub fn qr_block(payload: &str, align: Align) -> Option<QrBlock> {
    match QrCode::new(payload.as_bytes()) {
        Ok(code) => {
            let modules_per_side = code.width();
            let dark = code
                .to_colors()
                .into_iter()
                .map(|c| c == qrcode::Color::Dark)
                .collect();
            Some(QrBlock {
                dark,
                modules_per_side,
                size: QR_SIZE,
                align,
            })
        }
        Err(e) => {
            warn!(error = %e, chars = payload.len(), "QR payload could not be encoded");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::image_crate::GenericImageView;

    #[test]
    fn test_png_decodes_to_rgb() {
        let img = decode_profile_image(&fixtures::tiny_png()).unwrap();
        assert_eq!((img.width(), img.height()), (1, 1));
        assert!(matches!(img, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_garbage_image_is_skipped() {
        assert!(decode_profile_image(b"definitely not an image").is_none());
        assert!(profile_image_block(Some(&[]), Align::Left).is_none());
        assert!(profile_image_block(None, Align::Left).is_none());
    }

    #[test]
    fn test_profile_block_is_fixed_size() {
        let block = profile_image_block(Some(&fixtures::tiny_png()), Align::Center).unwrap();
        assert_eq!(block.width, PROFILE_IMAGE_SIZE);
        assert_eq!(block.align, Align::Center);
    }

    #[test]
    fn test_qr_grid_is_square() {
        let qr = qr_block("https://ada.dev", Align::Left).unwrap();
        assert_eq!(qr.dark.len(), qr.modules_per_side * qr.modules_per_side);
        assert!(qr.dark.iter().any(|d| *d));
        assert_eq!(qr.size, QR_SIZE);
    }

    #[test]
    fn test_oversized_qr_payload_fails_soft() {
        assert!(qr_block(&"x".repeat(5000), Align::Left).is_none());
    }
}
