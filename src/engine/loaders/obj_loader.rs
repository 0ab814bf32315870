use std::fs::File;
use std::io::{ BufRead, BufReader };
use std::path::Path;

use log::{ debug, info };
use serde::{ Deserialize, Serialize };

use crate::engine::components::mesh::{ MeshData, VertexLayout };
use crate::engine::error::{ RenderError, RenderResult };

/// Which vertex layout to emit, or infer it from the file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LayoutChoice {
    #[default]
    Auto,
    /// Per-vertex colors, unlit.
    #[value(name = "c3f_v3f")]
    C3fV3f,
    /// Texture coordinates and normals, lit.
    #[value(name = "t2f_n3f_v3f")]
    T2fN3fV3f,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

fn format_error(what: impl std::fmt::Display) -> RenderError {
    RenderError::AssetFormat(what.to_string())
}

/// Loads an OBJ file as one non-indexed triangle list. Materials referenced
/// by the file are ignored.
pub fn load_mesh(path: &Path, choice: LayoutChoice) -> RenderResult<MeshData> {
    info!("loading mesh {}", path.display());
    let file = File::open(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    load_mesh_from_reader(&mut reader, choice).map_err(|e| match e {
        RenderError::AssetFormat(msg) => RenderError::AssetFormat(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

pub fn load_mesh_from_reader<R: BufRead>(reader: &mut R, choice: LayoutChoice) -> RenderResult<MeshData> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::GenericFailure)
    }).map_err(|e| format_error(format!("failed to parse OBJ: {e}")))?;

    if models.is_empty() {
        return Err(format_error("OBJ contains no geometry"));
    }

    let layout = resolve_layout(&models, choice)?;
    let width = layout.record_width();
    let total_indices: usize = models
        .iter()
        .map(|m| m.mesh.indices.len())
        .sum();
    let mut floats = Vec::with_capacity(total_indices * width);

    for model in &models {
        append_records(model, layout, &mut floats)?;
        debug!("group `{}`: {} vertices", model.name, model.mesh.indices.len());
    }

    let data = MeshData::from_interleaved(layout, &floats)?;
    info!("mesh has {} triangles in {} groups ({:?})", data.triangle_count, models.len(), layout);
    Ok(data)
}

fn has_texcoords_and_normals(model: &tobj::Model) -> bool {
    !model.mesh.texcoords.is_empty() && !model.mesh.normals.is_empty()
}

fn has_colors(model: &tobj::Model) -> bool {
    !model.mesh.vertex_color.is_empty()
}

fn resolve_layout(models: &[tobj::Model], choice: LayoutChoice) -> RenderResult<VertexLayout> {
    match choice {
        LayoutChoice::C3fV3f => Ok(VertexLayout::C3fV3f),
        LayoutChoice::T2fN3fV3f => Ok(VertexLayout::T2fN3fV3f),
        LayoutChoice::Auto => {
            if models.iter().all(has_texcoords_and_normals) {
                Ok(VertexLayout::T2fN3fV3f)
            } else if models.iter().all(has_colors) {
                Ok(VertexLayout::C3fV3f)
            } else {
                Err(
                    format_error(
                        "cannot infer a vertex layout: groups need texcoords and normals, or vertex colors"
                    )
                )
            }
        }
    }
}

fn fetch<'a>(
    model: &tobj::Model,
    data: &'a [f32],
    what: &str,
    index: usize,
    components: usize
) -> RenderResult<&'a [f32]> {
    data.get(index * components..(index + 1) * components).ok_or_else(|| {
        format_error(format!("group `{}` has no {} for vertex {}", model.name, what, index))
    })
}

/// Appends one record per index, fields in layout order.
fn append_records(model: &tobj::Model, layout: VertexLayout, out: &mut Vec<f32>) -> RenderResult<()> {
    let mesh = &model.mesh;
    let missing = |what: &str| format_error(format!("group `{}` has no {}", model.name, what));

    match layout {
        VertexLayout::T2fN3fV3f => {
            if mesh.texcoords.is_empty() {
                return Err(missing("texture coordinates"));
            }
            if mesh.normals.is_empty() {
                return Err(missing("normals"));
            }
        }
        VertexLayout::C3fV3f => {
            if mesh.vertex_color.is_empty() {
                return Err(missing("vertex colors"));
            }
        }
    }

    for &index in &mesh.indices {
        let i = index as usize;
        match layout {
            VertexLayout::T2fN3fV3f => {
                out.extend_from_slice(fetch(model, &mesh.texcoords, "texture coordinates", i, 2)?);
                out.extend_from_slice(fetch(model, &mesh.normals, "normal", i, 3)?);
            }
            VertexLayout::C3fV3f => {
                out.extend_from_slice(fetch(model, &mesh.vertex_color, "color", i, 3)?);
            }
        }
        out.extend_from_slice(fetch(model, &mesh.positions, "position", i, 3)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::mesh::VertexAttribute;
    use std::io::Cursor;

    const QUAD: &str = "\
o quad
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const COLORED_TRIANGLE: &str = "\
v 0.0 0.0 0.0 1.0 0.0 0.0
v 1.0 0.0 0.0 0.0 1.0 0.0
v 0.0 1.0 0.0 0.0 0.0 1.0
f 1 2 3
";

    fn load(source: &str, choice: LayoutChoice) -> RenderResult<MeshData> {
        load_mesh_from_reader(&mut Cursor::new(source.as_bytes()), choice)
    }

    #[test]
    fn quad_is_triangulated_into_lit_layout() {
        let mesh = load(QUAD, LayoutChoice::Auto).unwrap();

        assert_eq!(mesh.layout, VertexLayout::T2fN3fV3f);
        assert_eq!(mesh.triangle_count, 2);
        assert_eq!(mesh.stream(VertexAttribute::Position).unwrap().len(), 6 * 3);
        assert_eq!(mesh.stream(VertexAttribute::TexCoord).unwrap().len(), 6 * 2);
        assert!(
            mesh
                .stream(VertexAttribute::Normal)
                .unwrap()
                .chunks(3)
                .all(|n| n == [0.0, 0.0, 1.0])
        );
        // First corner of the first triangle keeps its own texcoord.
        assert_eq!(&mesh.stream(VertexAttribute::Position).unwrap()[..3], &[-1.0, -1.0, 0.0]);
        assert_eq!(&mesh.stream(VertexAttribute::TexCoord).unwrap()[..2], &[0.0, 0.0]);
    }

    #[test]
    fn vertex_colors_infer_color_layout() {
        let mesh = load(COLORED_TRIANGLE, LayoutChoice::Auto).unwrap();

        assert_eq!(mesh.layout, VertexLayout::C3fV3f);
        assert_eq!(mesh.triangle_count, 1);
        assert_eq!(mesh.stream(VertexAttribute::Color).unwrap(), &[
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ]);
    }

    #[test]
    fn groups_are_concatenated() {
        let two_groups = format!("{QUAD}o second\nf 1/1/1 2/2/1 3/3/1\n");
        let mesh = load(&two_groups, LayoutChoice::T2fN3fV3f).unwrap();
        assert_eq!(mesh.triangle_count, 3);
    }

    #[test]
    fn missing_attributes_are_format_errors() {
        let bare = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert!(matches!(load(bare, LayoutChoice::Auto), Err(RenderError::AssetFormat(_))));
        assert!(matches!(load(bare, LayoutChoice::T2fN3fV3f), Err(RenderError::AssetFormat(_))));
        assert!(matches!(load(QUAD, LayoutChoice::C3fV3f), Err(RenderError::AssetFormat(_))));
    }

    #[test]
    fn empty_file_is_a_format_error() {
        assert!(matches!(load("", LayoutChoice::Auto), Err(RenderError::AssetFormat(_))));
        assert!(matches!(load("# nothing here\n", LayoutChoice::Auto), Err(RenderError::AssetFormat(_))));
    }

    #[test]
    fn bundled_cube_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/meshes/cube.obj");
        let mesh = load_mesh(&path, LayoutChoice::Auto).unwrap();
        assert_eq!(mesh.layout, VertexLayout::T2fN3fV3f);
        assert_eq!(mesh.triangle_count, 12);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_mesh(Path::new("does/not/exist.obj"), LayoutChoice::Auto).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
