use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a mesh or texture. Never fatal: callers log and fall back.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to import {}: {source}", path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to load OBJ {}: {source}", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("{} contains no mesh primitives", .0.display())]
    NoMesh(PathBuf),

    #[error("first primitive in {} has no vertex positions", .0.display())]
    MissingPositions(PathBuf),

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
