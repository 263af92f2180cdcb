#[cfg(feature = "audio")]
pub mod impl_cpal;
pub mod impl_fake;
pub mod interface;
