use crate::asset_pool::SoundAsset;

pub trait DeviceSpeaker {
    /// Starts playback and returns without waiting for it to finish.
    fn play(&self, sound: &SoundAsset) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn is_playing(&self) -> bool;
}
