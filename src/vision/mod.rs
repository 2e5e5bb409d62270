pub mod encoder;
pub mod recognition;

pub use encoder::{encode_image, EncodedImage};
pub use recognition::{FoodRecognizer, RecognitionClient};
