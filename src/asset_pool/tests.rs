use super::*;
use image::{ImageFormat, Rgb, RgbImage};

fn write_assets(dir: &Path, images: usize, sounds: usize) {
    for index in 0..images {
        let image = RgbImage::from_pixel(8, 8, Rgb([index as u8, 0, 0]));
        image
            .save_with_format(dir.join(asset_file_name("image", index, "png")), ImageFormat::Png)
            .unwrap();
    }
    for index in 0..sounds {
        std::fs::write(dir.join(asset_file_name("sound", index, "mp3")), [index as u8; 4]).unwrap();
    }
}

#[test]
fn test_file_name_convention() {
    assert_eq!(asset_file_name("image", 0, "jpg"), "image0.jpg");
    assert_eq!(asset_file_name("sound", 11, "mp3"), "sound11.mp3");
}

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), 3, 2);

    let pool = AssetPool::load(dir.path(), 3, "png", 2, "mp3").unwrap();

    assert_eq!(pool.images().len(), 3);
    assert_eq!(pool.sounds().len(), 2);
    assert_eq!(pool.images()[2].name, "image2.png");
    assert_eq!(pool.images()[1].image.dimensions(), (8, 8));
    assert_eq!(pool.sound(1).unwrap().bytes, vec![1u8; 4]);
    assert!(pool.sound(2).is_none());
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), 2, 2);

    let result = AssetPool::load(dir.path(), 3, "png", 2, "mp3");

    match result {
        Err(AssetError::Read { path, .. }) => assert!(path.ends_with("image2.png")),
        other => panic!("Unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_undecodable_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path(), 0, 1);
    std::fs::write(dir.path().join("image0.png"), b"not an image").unwrap();

    let result = AssetPool::load(dir.path(), 1, "png", 1, "mp3");

    assert!(matches!(result, Err(AssetError::Decode { .. })));
}

#[test]
fn test_empty_pool_fails() {
    assert!(matches!(
        AssetPool::placeholder(0, 4),
        Err(AssetError::EmptyPool { kind: "image" })
    ));
    assert!(matches!(
        AssetPool::placeholder(4, 0),
        Err(AssetError::EmptyPool { kind: "sound" })
    ));
}

#[test]
fn test_placeholder_pool_matches_sizes() {
    let pool = AssetPool::placeholder(12, 5).unwrap();
    assert_eq!(pool.images().len(), 12);
    assert_eq!(pool.sounds().len(), 5);
}
