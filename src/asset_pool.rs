use crate::config::{AssetSource, Config};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("the {kind} pool must contain at least one asset")]
    EmptyPool { kind: &'static str },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Clone)]
pub struct ImageAsset {
    pub name: String,
    pub image: RgbaImage,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("name", &self.name)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

#[derive(Clone)]
pub struct SoundAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SoundAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundAsset")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Read-only images and sounds, loaded once and indexed by position.
#[derive(Debug, Clone)]
pub struct AssetPool {
    images: Vec<ImageAsset>,
    sounds: Vec<SoundAsset>,
}

/// `image3.jpg`, `sound11.mp3`, ...
pub fn asset_file_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}{}.{}", prefix, index, extension)
}

impl AssetPool {
    pub fn new(images: Vec<ImageAsset>, sounds: Vec<SoundAsset>) -> Result<Self, AssetError> {
        if images.is_empty() {
            return Err(AssetError::EmptyPool { kind: "image" });
        }
        if sounds.is_empty() {
            return Err(AssetError::EmptyPool { kind: "sound" });
        }
        Ok(Self { images, sounds })
    }

    pub fn from_config(config: &Config) -> Result<Self, AssetError> {
        match &config.asset_source {
            AssetSource::Directory(dir) => Self::load(
                dir,
                config.image_pool_size,
                &config.image_extension,
                config.sound_pool_size,
                &config.sound_extension,
            ),
            AssetSource::Placeholder => {
                Self::placeholder(config.image_pool_size, config.sound_pool_size)
            }
        }
    }

    pub fn load(
        dir: &Path,
        image_count: usize,
        image_extension: &str,
        sound_count: usize,
        sound_extension: &str,
    ) -> Result<Self, AssetError> {
        let images = (0..image_count)
            .map(|index| {
                let name = asset_file_name("image", index, image_extension);
                let path = dir.join(&name);
                let bytes = read(&path)?;
                let image = image::load_from_memory(&bytes)
                    .map_err(|source| AssetError::Decode {
                        path: path.clone(),
                        source,
                    })?
                    .to_rgba8();
                Ok(ImageAsset { name, image })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        let sounds = (0..sound_count)
            .map(|index| {
                let name = asset_file_name("sound", index, sound_extension);
                let bytes = read(&dir.join(&name))?;
                Ok(SoundAsset { name, bytes })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        Self::new(images, sounds)
    }

    /// Flat-colored images and silent sounds for running without bundled assets.
    pub fn placeholder(image_count: usize, sound_count: usize) -> Result<Self, AssetError> {
        let images = (0..image_count)
            .map(|index| {
                let shade = ((index * 255) / image_count.max(1)) as u8;
                ImageAsset {
                    name: asset_file_name("image", index, "placeholder"),
                    image: RgbaImage::from_pixel(64, 64, Rgba([shade, 64, 255 - shade, 255])),
                }
            })
            .collect();

        let sounds = (0..sound_count)
            .map(|index| SoundAsset {
                name: asset_file_name("sound", index, "placeholder"),
                bytes: Vec::new(),
            })
            .collect();

        Self::new(images, sounds)
    }

    #[allow(dead_code)]
    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    #[allow(dead_code)]
    pub fn sounds(&self) -> &[SoundAsset] {
        &self.sounds
    }

    pub fn image(&self, index: usize) -> Option<&ImageAsset> {
        self.images.get(index)
    }

    pub fn sound(&self, index: usize) -> Option<&SoundAsset> {
        self.sounds.get(index)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}
