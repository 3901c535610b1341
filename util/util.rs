#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::RgbImage;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbImage)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    image.into_rgb8(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbImage)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths = entries
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

pub const BENCH_DIR: &str = "img/bench";

pub fn load_image_dir_relative_to_root(dir: impl AsRef<Path>) -> Vec<(String, RgbImage)> {
    // assume current exe path is something like: target/build/deps/current_exe
    let exe = std::env::current_exe().unwrap();
    let root = exe
        .parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap();

    load_image_dir(root.join(dir.as_ref()))
}

/// A smooth gradient where nearly every pixel is a distinct color (worst case for the cache).
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ])
    })
}

/// Blocks of random flat colors, similar to a cartoon or a logo (best case for the cache).
pub fn flat_image(width: u32, height: u32) -> RgbImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    let colors = (0..64)
        .map(|_| image::Rgb([rng.gen(), rng.gen(), rng.gen()]))
        .collect::<Vec<_>>();

    RgbImage::from_fn(width, height, |x, y| colors[((x / 16 + y / 16) % 64) as usize])
}

static BENCH_IMAGES: OnceLock<Vec<(String, RgbImage)>> = OnceLock::new();

pub fn load_benchmark_images() -> Vec<(String, RgbImage)> {
    let mut images = vec![
        ("gradient".to_owned(), gradient_image(640, 360)),
        ("flat".to_owned(), flat_image(640, 360)),
    ];
    images.extend(load_image_dir_relative_to_root(BENCH_DIR));
    images
}

pub fn benchmark_images() -> &'static [(String, RgbImage)] {
    BENCH_IMAGES.get_or_init(load_benchmark_images)
}
