//! CPU-side meshes and textures: the unit cube, glTF import and texture
//! discovery. Nothing here touches the GPU.

mod error;
mod mesh;
mod texture;

pub use error::AssetError;
pub use mesh::{ImportedAsset, MeshData, Vertex, import_mesh, unit_cube};
pub use texture::{
    TEXTURE_EXTENSIONS, TEXTURE_SUBDIRS, TextureImage, TextureSearch, decode_texture,
};
