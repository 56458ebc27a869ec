//! Indexed triangle meshes.

use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use tracing::{debug, info};

use crate::AssetError;

/// Vertex shared by the cube proxies and imported meshes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

impl Vertex {
    pub const fn white(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            color: WHITE,
            uv,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Unit cube centred on the origin, 8 shared corners, white.
pub fn unit_cube() -> MeshData {
    let vertices = vec![
        Vertex::white([-0.5, -0.5, 0.5], [0.0, 0.0]),
        Vertex::white([0.5, -0.5, 0.5], [1.0, 0.0]),
        Vertex::white([0.5, 0.5, 0.5], [1.0, 1.0]),
        Vertex::white([-0.5, 0.5, 0.5], [0.0, 1.0]),
        Vertex::white([-0.5, -0.5, -0.5], [1.0, 0.0]),
        Vertex::white([0.5, -0.5, -0.5], [0.0, 0.0]),
        Vertex::white([0.5, 0.5, -0.5], [0.0, 1.0]),
        Vertex::white([-0.5, 0.5, -0.5], [1.0, 1.0]),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0,
        4, 5, 6, 6, 7, 4,
        7, 3, 0, 0, 4, 7,
        6, 5, 1, 1, 2, 6,
        3, 7, 6, 6, 2, 3,
        0, 5, 4, 0, 1, 5,
    ];
    MeshData { vertices, indices }
}

/// Load a mesh from a Wavefront OBJ, glTF or GLB file, chosen by extension.
///
/// Vertices are white; UVs default to zero when the file has none.
pub fn import_mesh(path: &Path) -> Result<MeshData, AssetError> {
    let is_obj = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    let mesh = if is_obj {
        import_obj(path)?
    } else {
        import_gltf(path)?
    };
    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "Mesh imported"
    );
    Ok(mesh)
}

/// First model of an OBJ file, triangulated with a single index buffer.
fn import_obj(path: &Path) -> Result<MeshData, AssetError> {
    let (models, _materials) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;
    let model = models
        .into_iter()
        .find(|m| !m.mesh.positions.is_empty())
        .ok_or_else(|| AssetError::NoMesh(path.to_path_buf()))?;

    let mesh = model.mesh;
    let vertices = mesh
        .positions
        .chunks_exact(3)
        .enumerate()
        .map(|(i, p)| {
            let uv = match mesh.texcoords.get(i * 2..i * 2 + 2) {
                Some(&[u, v]) => [u, v],
                _ => [0.0, 0.0],
            };
            Vertex::white([p[0], p[1], p[2]], uv)
        })
        .collect();

    Ok(MeshData {
        vertices,
        indices: mesh.indices,
    })
}

/// First primitive of the first mesh in a glTF or GLB file. Primitives
/// without an index buffer are indexed sequentially.
fn import_gltf(path: &Path) -> Result<MeshData, AssetError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Import {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let primitive = document
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .next()
        .ok_or_else(|| AssetError::NoMesh(path.to_path_buf()))?;
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions(path.to_path_buf()))?
        .collect();
    let mut uvs = reader.read_tex_coords(0).map(|tc| tc.into_f32());
    let vertices: Vec<Vertex> = positions
        .into_iter()
        .map(|p| {
            let uv = uvs.as_mut().and_then(|it| it.next()).unwrap_or([0.0, 0.0]);
            Vertex::white(p, uv)
        })
        .collect();

    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => {
            debug!(path = %path.display(), "No index buffer, using sequential indices");
            (0..vertices.len() as u32).collect()
        }
    };

    Ok(MeshData { vertices, indices })
}

/// A mesh placed in the editor scene.
#[derive(Clone, Debug)]
pub struct ImportedAsset {
    pub name: String,
    pub source: PathBuf,
    pub position: Vec3,
    pub mesh: MeshData,
}

impl ImportedAsset {
    /// Import `path` and place it at the origin, named after the file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let mesh = import_mesh(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            source: path.to_path_buf(),
            position: Vec3::ZERO,
            mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// One triangle: positions then UVs, little-endian f32.
    const TRIANGLE_BUFFER: &str =
        "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/";

    fn triangle_gltf(with_uv: bool) -> String {
        let uv_attr = if with_uv { r#", "TEXCOORD_0": 1"# } else { "" };
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [{{ "byteLength": 60, "uri": "data:application/octet-stream;base64,{TRIANGLE_BUFFER}" }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0, 0, 0], "max": [1, 1, 0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }}
  ],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0{uv_attr} }} }}] }}]
}}"#
        )
    }

    #[test]
    fn test_unit_cube_shape() {
        let cube = unit_cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
        assert!(cube.vertices.iter().all(|v| v.color == WHITE));
        let (lo, hi) = cube.bounds().unwrap();
        assert_eq!(lo, Vec3::splat(-0.5));
        assert_eq!(hi, Vec3::splat(0.5));
    }

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_import_triangle_with_uvs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.gltf");
        fs::write(&path, triangle_gltf(true)).unwrap();

        let mesh = import_mesh(&path).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
        assert_eq!(mesh.vertices[0].color, WHITE);
    }

    #[test]
    fn test_import_without_uvs_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.gltf");
        fs::write(&path, triangle_gltf(false)).unwrap();

        let mesh = import_mesh(&path).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_mesh(&dir.path().join("nope.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn test_garbage_is_import_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gltf");
        fs::write(&path, "this is not gltf").unwrap();
        let err = import_mesh(&path).unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }), "got {err:?}");
    }

    #[test]
    fn test_document_without_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gltf");
        fs::write(&path, r#"{ "asset": { "version": "2.0" } }"#).unwrap();
        let err = import_mesh(&path).unwrap_err();
        assert!(matches!(err, AssetError::NoMesh(_)), "got {err:?}");
    }

    const QUAD_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_import_obj_triangulates_faces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.OBJ");
        fs::write(&path, QUAD_OBJ).unwrap();

        let mesh = import_mesh(&path).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(mesh.vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_obj_without_uvs_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mesh = import_mesh(&path).unwrap();
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn test_missing_obj_is_obj_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_mesh(&dir.path().join("nope.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }), "got {err:?}");
    }

    #[test]
    fn test_imported_asset_named_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rock.gltf");
        fs::write(&path, triangle_gltf(true)).unwrap();
        let asset = ImportedAsset::load(&path).unwrap();
        assert_eq!(asset.name, "rock.gltf");
        assert_eq!(asset.position, Vec3::ZERO);
    }
}
