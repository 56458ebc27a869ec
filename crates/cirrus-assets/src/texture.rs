//! Texture discovery and decoding.
//!
//! The proxy texture is the first image found in a fixed list of
//! directories. Any failure yields a small magenta image so the scene keeps
//! rendering and the problem is visible.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::AssetError;

/// Directories searched, in order, under each search root.
pub const TEXTURE_SUBDIRS: [&str; 3] = ["textures/cube_textures", "textures", "textures/skybox"];
/// Accepted extensions, compared case-insensitively.
pub const TEXTURE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tga"];

const MAGENTA: [u8; 4] = [255, 0, 255, 255];

/// Decoded RGBA8 image, rows bottom-up so `v = 0` samples the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// File the pixels came from; `None` for the fallback.
    pub source: Option<PathBuf>,
}

impl TextureImage {
    /// 2×2 magenta placeholder.
    pub fn missing() -> Self {
        Self {
            width: 2,
            height: 2,
            rgba: MAGENTA.repeat(4),
            source: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source.is_none()
    }
}

/// Decode an image file to RGBA8, flipped vertically.
pub fn decode_texture(path: &Path) -> Result<TextureImage, AssetError> {
    let image = image::open(path)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .flipv()
        .to_rgba8();
    Ok(TextureImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
        source: Some(path.to_path_buf()),
    })
}

fn has_texture_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            TEXTURE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Where to look for the proxy texture.
#[derive(Clone, Debug)]
pub struct TextureSearch {
    roots: Vec<PathBuf>,
}

impl TextureSearch {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The working directory, then the directory holding the executable.
    pub fn from_environment() -> Self {
        let mut roots = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            && !roots.contains(&exe_dir)
        {
            roots.push(exe_dir);
        }
        Self { roots }
    }

    /// Candidate files in search order. Entries within a directory are
    /// sorted by name.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in &self.roots {
            for sub in TEXTURE_SUBDIRS {
                let dir = root.join(sub);
                let Ok(entries) = fs::read_dir(&dir) else {
                    continue;
                };
                debug!(dir = %dir.display(), "Searching for textures");
                let mut files: Vec<PathBuf> = entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && has_texture_extension(p))
                    .collect();
                files.sort();
                found.extend(files);
            }
        }
        found
    }

    /// Decode the first candidate that loads, or the magenta fallback.
    pub fn load_first(&self) -> TextureImage {
        for path in self.candidates() {
            match decode_texture(&path) {
                Ok(texture) => {
                    info!(
                        path = %path.display(),
                        width = texture.width,
                        height = texture.height,
                        "Texture loaded"
                    );
                    return texture;
                }
                Err(e) => warn!("{e}"),
            }
        }
        warn!("No usable texture found, using magenta fallback");
        TextureImage::missing()
    }
}
