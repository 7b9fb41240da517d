//! Session pod derivation from a request id and an image reference.
mod image;
pub use image::ImageRef;

mod pod;
pub use pod::SessionPodSpec;
