//! Model loading: parts, material groups and the OBJ directive parser

use crate::error::{IndexKind, ObjError, Result};
use crate::geometry::{Aabb, Face, Point3};
use crate::material::{Material, MaterialId, MaterialLibrary, load_mtl};
use crate::render::{DrawCall, GroupBuffers, GroupKey, RenderBackend};
use crate::texture::{ImageTextureLoader, TextureLoader};
use crate::tokenize::{parse_f32, parse_triple, split, split_line_whitespace};
use glam::{Mat4, Vec3};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Options for controlling how a model is assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reuse a part's existing group when `usemtl` names a material the part
    /// already has a group for, instead of starting another group
    pub merge_material_groups: bool,
    /// Store the `v` component of `vt` negated, converting from the file's
    /// bottom-up texture space to a top-down one
    pub flip_texture_v: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            merge_material_groups: true,
            flip_texture_v: true,
        }
    }
}

/// Faces sharing one material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialGroup {
    pub material: MaterialId,
    pub faces: Vec<Face>,
}

impl MaterialGroup {
    pub fn new(material: MaterialId) -> Self {
        Self {
            material,
            faces: Vec::new(),
        }
    }
}

/// A named, independently transformable piece of a model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    /// Name from `g`/`o`, empty for the synthesized anonymous part
    pub name: String,
    pub groups: Vec<MaterialGroup>,
    bounds: Aabb,
    center: Vec3,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
            bounds: Aabb::EMPTY,
            center: Vec3::ZERO,
        }
    }

    /// Bounds over every face of every group
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Pivot the part rotates about, the midpoint of its bounds
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    /// Recompute bounds and center from the current faces
    pub fn compute_bounds(&mut self) {
        let mut bounds = Aabb::EMPTY;
        for face in self.groups.iter().flat_map(|g| &g.faces) {
            bounds.extend_face(face);
        }
        self.bounds = bounds;
        self.center = bounds.center();
    }
}

/// A loaded model: material registry plus ordered parts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    materials: MaterialLibrary,
    parts: Vec<Part>,
}

impl Model {
    /// Load a model from a file with default options, decoding textures as PNG
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default(), &ImageTextureLoader)
    }

    /// Load a model from a file
    ///
    /// `mtllib` files are resolved against the directory part of `path`.
    pub fn load_with<P: AsRef<Path>>(
        path: P,
        options: &LoadOptions,
        textures: &dyn TextureLoader,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ObjError::FileSystem(path.to_owned(), e))?;
        log::debug!("Loading model {}", path.display());
        Self::parse(
            BufReader::new(file),
            &directory_prefix(path),
            options,
            textures,
        )
    }

    /// Parse model directives from a reader
    ///
    /// `base_dir` is the directory `mtllib` names are resolved against.
    pub fn parse<R: BufRead>(
        reader: R,
        base_dir: &Path,
        options: &LoadOptions,
        textures: &dyn TextureLoader,
    ) -> Result<Self> {
        let mut parser = ObjParser::new(base_dir, options, textures);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            parser.parse_line(index + 1, &line)?;
        }
        Ok(parser.finish())
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Find a part by name
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Find the index of a part by name
    pub fn part_index(&self, name: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.name == name)
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Total number of triangles over all parts
    pub fn face_count(&self) -> usize {
        self.parts.iter().map(Part::face_count).sum()
    }

    /// Union of every part's bounds
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for part in &self.parts {
            let part_bounds = part.bounds();
            if !part_bounds.is_empty() {
                bounds.extend_point(part_bounds.min);
                bounds.extend_point(part_bounds.max);
            }
        }
        bounds
    }

    /// Hand every group's buffers to the backend
    pub fn upload<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for (part_index, part) in self.parts.iter().enumerate() {
            for (group_index, group) in part.groups.iter().enumerate() {
                let Some(material) = self.materials.get(group.material) else {
                    log::warn!(
                        "Group {} of part '{}' references unknown material {:?}",
                        group_index,
                        part.name,
                        group.material
                    );
                    continue;
                };
                let buffers = GroupBuffers::build(group, material);
                backend.upload(GroupKey::new(part_index, group_index), &buffers);
            }
        }
    }

    /// Draw every part untransformed
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for part_index in 0..self.parts.len() {
            self.draw_part(part_index, Mat4::IDENTITY, backend);
        }
    }

    /// Draw every group of one part with the given transform
    ///
    /// Out-of-range indices draw nothing.
    pub fn draw_part<B: RenderBackend + ?Sized>(
        &self,
        part_index: usize,
        transform: Mat4,
        backend: &mut B,
    ) {
        let Some(part) = self.parts.get(part_index) else {
            return;
        };
        for (group_index, group) in part.groups.iter().enumerate() {
            backend.draw(&DrawCall {
                key: GroupKey::new(part_index, group_index),
                vertex_count: group.faces.len() * 3,
                texture: self.materials.material_texture(group.material),
                transform,
            });
        }
    }
}

/// Directory component of a model path: everything before the last `/` or
/// `\`. A bare file name yields an empty path, resolving against the working
/// directory.
pub fn directory_prefix(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    match text.rfind(['/', '\\']) {
        Some(0) => PathBuf::from(&text[..1]),
        Some(position) => PathBuf::from(&text[..position]),
        None => PathBuf::new(),
    }
}

/// Incremental state of one model parse
struct ObjParser<'a> {
    base_dir: &'a Path,
    options: &'a LoadOptions,
    textures: &'a dyn TextureLoader,
    vertices: Vec<Point3>,
    tex_coords: Vec<Point3>,
    materials: MaterialLibrary,
    parts: Vec<Part>,
    current_part: Option<usize>,
    current_group: Option<usize>,
    /// Material of the last `usemtl`, carried across `g`/`o`
    current_material: MaterialId,
}

impl<'a> ObjParser<'a> {
    fn new(base_dir: &'a Path, options: &'a LoadOptions, textures: &'a dyn TextureLoader) -> Self {
        Self {
            base_dir,
            options,
            textures,
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            materials: MaterialLibrary::new(),
            parts: Vec::new(),
            current_part: None,
            current_group: None,
            current_material: MaterialId::DEFAULT,
        }
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let tokens = split_line_whitespace(line);
        let Some(directive) = tokens.first() else {
            return Ok(());
        };
        if directive.starts_with('#') {
            return Ok(());
        }

        match directive.as_str() {
            "mtllib" => {
                if tokens.len() < 2 {
                    return Err(ObjError::parse(line_no, "mtllib without a file name"));
                }
                for name in &tokens[1..] {
                    load_mtl(&mut self.materials, self.base_dir, name, self.textures)?;
                }
            }
            "v" => {
                let [x, y, z] =
                    parse_triple(&tokens, 1).map_err(|m| ObjError::parse(line_no, m))?;
                self.vertices.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let coord = self.parse_tex_coord(line_no, &tokens)?;
                self.tex_coords.push(coord);
            }
            "g" | "o" => {
                let name = tokens.get(1).map(String::as_str).unwrap_or_default();
                self.parts.push(Part::new(name));
                self.current_part = Some(self.parts.len() - 1);
                self.current_group = None;
            }
            "usemtl" => {
                let name = tokens
                    .get(1)
                    .ok_or_else(|| ObjError::parse(line_no, "usemtl without a name"))?;
                let material =
                    self.materials
                        .find(name)
                        .ok_or_else(|| ObjError::UnknownMaterial {
                            line: line_no,
                            name: name.clone(),
                        })?;
                self.current_material = material;
                self.current_group = None;
            }
            "f" => self.parse_face(line_no, &tokens)?,
            other => {
                log::trace!("Ignoring OBJ directive '{}' on line {}", other, line_no);
            }
        }
        Ok(())
    }

    fn parse_tex_coord(&self, line_no: usize, tokens: &[String]) -> Result<Point3> {
        if tokens.len() < 3 {
            return Err(ObjError::parse(
                line_no,
                format!("vt expects at least 2 numbers, found {}", tokens.len() - 1),
            ));
        }
        let number = |token: &str| parse_f32(token).map_err(|m| ObjError::parse(line_no, m));
        let u = number(&tokens[1])?;
        let v = number(&tokens[2])?;
        let w = match tokens.get(3) {
            Some(token) => number(token)?,
            None => 0.0,
        };
        let v = if self.options.flip_texture_v { -v } else { v };
        Ok(Vec3::new(u, v, w))
    }

    fn parse_face(&mut self, line_no: usize, tokens: &[String]) -> Result<()> {
        let refs = &tokens[1..];
        if refs.len() < 3 {
            return Err(ObjError::parse(
                line_no,
                format!("face needs at least 3 vertices, found {}", refs.len()),
            ));
        }
        if refs.len() > 4 {
            log::warn!(
                "Face on line {} has {} vertices, only the first 4 are used",
                line_no,
                refs.len()
            );
        }

        let corners = refs
            .iter()
            .take(4)
            .map(|r| self.resolve_ref(line_no, r))
            .collect::<Result<Vec<_>>>()?;

        let triangle = |i: usize, j: usize, k: usize| {
            let (a, ta) = corners[i];
            let (b, tb) = corners[j];
            let (c, tc) = corners[k];
            Face::new(a, b, c).with_tex_coords(ta, tb, tc)
        };

        let mut faces = vec![triangle(0, 1, 2)];
        if corners.len() == 4 {
            faces.push(triangle(2, 3, 0));
        }

        let group = self.open_group();
        group.faces.extend(faces);
        Ok(())
    }

    /// Resolve `v`, `v/t`, `v//n` or `v/t/n` into a position and texture coordinate
    fn resolve_ref(&self, line_no: usize, reference: &str) -> Result<(Point3, Option<Point3>)> {
        let fields = split(reference, '/');
        let vertex_field = fields.first().copied().unwrap_or_default();
        let position = lookup(line_no, IndexKind::Vertex, vertex_field, &self.vertices)?;
        let tex_coord = match fields.get(1) {
            Some(field) if !field.is_empty() => Some(lookup(
                line_no,
                IndexKind::TexCoord,
                field,
                &self.tex_coords,
            )?),
            _ => None,
        };
        Ok((position, tex_coord))
    }

    fn current_part(&mut self) -> usize {
        match self.current_part {
            Some(index) => index,
            None => {
                log::debug!("Synthesizing anonymous part");
                self.parts.push(Part::new(""));
                let index = self.parts.len() - 1;
                self.current_part = Some(index);
                self.current_group = None;
                index
            }
        }
    }

    /// Point `current_group` at a group of `material` in the current part
    fn select_group(&mut self, material: MaterialId) {
        let part_index = self.current_part();
        let merge = self.options.merge_material_groups;
        let part = &mut self.parts[part_index];
        let existing = if merge {
            part.groups.iter().position(|g| g.material == material)
        } else {
            None
        };
        let group_index = existing.unwrap_or_else(|| {
            part.groups.push(MaterialGroup::new(material));
            part.groups.len() - 1
        });
        self.current_group = Some(group_index);
    }

    fn open_group(&mut self) -> &mut MaterialGroup {
        let part_index = self.current_part();
        if self.current_group.is_none() {
            self.select_group(self.current_material);
        }
        let group_index = self.current_group.unwrap_or_default();
        &mut self.parts[part_index].groups[group_index]
    }

    fn finish(mut self) -> Model {
        for part in &mut self.parts {
            part.groups.retain(|g| !g.faces.is_empty());
            part.compute_bounds();
        }

        let model = Model {
            materials: self.materials,
            parts: self.parts,
        };
        log::debug!(
            "Parsed model: {} vertices, {} texture coordinates, {} parts, {} faces, {} materials",
            self.vertices.len(),
            self.tex_coords.len(),
            model.parts.len(),
            model.face_count(),
            model.materials.len()
        );
        model
    }
}

/// Resolve a 1-based index into `pool`
fn lookup(line_no: usize, kind: IndexKind, field: &str, pool: &[Point3]) -> Result<Point3> {
    let index: i64 = field
        .parse()
        .map_err(|_| ObjError::parse(line_no, format!("invalid {kind} index '{field}'")))?;
    let invalid = || ObjError::InvalidIndex {
        line: line_no,
        kind,
        index,
        len: pool.len(),
    };
    let zero_based = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(invalid)?;
    pool.get(zero_based).copied().ok_or_else(invalid)
}
