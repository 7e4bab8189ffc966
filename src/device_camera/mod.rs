pub mod impl_fake;
pub mod impl_image_dir;
#[cfg(feature = "camera-v4l")]
pub mod impl_v4l;
pub mod interface;
#[cfg(any(test, feature = "camera-v4l"))]
pub mod pixel_format;
