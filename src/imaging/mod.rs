//! Image intake: upload validation, decoding and model preprocessing.

mod transform;
mod validate;

pub use transform::{ImageTensor, ImageTransform};
pub use validate::{
    DecodedImage, ImageRejection, check_content_type, decode_image, validate_and_decode,
};
