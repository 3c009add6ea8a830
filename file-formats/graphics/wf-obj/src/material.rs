//! Materials and the MTL library sub-loader

use crate::error::{ObjError, Result};
use crate::texture::{Texture, TextureId, TextureLoader};
use crate::tokenize::{parse_f32, parse_triple, split_line_whitespace};
use glam::Vec3;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::BufRead;
use std::path::Path;

/// Name of the fallback material at [`MaterialId::DEFAULT`]
pub const DEFAULT_MATERIAL_NAME: &str = "Default";

/// Handle of a material inside a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// The synthetic white "Default" material
    pub const DEFAULT: Self = Self(0);
}

/// Surface appearance of a material group
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub name: String,
    /// Ambient color (`Ka`)
    pub ambient: Vec3,
    /// Diffuse color (`Kd`), the only color the render buffers use
    pub diffuse: Vec3,
    /// Specular color (`Ks`)
    pub specular: Vec3,
    /// 0.0 is opaque (`d` / `Tr`)
    pub transparency: f32,
    /// Diffuse texture (`map_Kd`)
    pub texture: Option<TextureId>,
}

impl Material {
    /// Create a white material with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ZERO,
            transparency: 0.0,
            texture: None,
        }
    }

    /// RGBA vertex color used for upload, alpha forced to 1
    pub fn vertex_color(&self) -> [f32; 4] {
        [self.diffuse.x, self.diffuse.y, self.diffuse.z, 1.0]
    }
}

/// Registry of every material and texture a model uses
///
/// Index 0 always holds the "Default" material. Names are resolved through a
/// map; when a name is declared twice the first declaration keeps it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    names: HashMap<String, MaterialId>,
    textures: Vec<Texture>,
}

impl MaterialLibrary {
    /// Create a library holding only the Default material
    pub fn new() -> Self {
        let mut library = Self {
            materials: Vec::new(),
            names: HashMap::new(),
            textures: Vec::new(),
        };
        library.push(Material::new(DEFAULT_MATERIAL_NAME));
        library
    }

    /// Append a material and return its handle
    pub fn push(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        match self.names.entry(material.name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(id);
            }
            Entry::Occupied(_) => {
                log::warn!(
                    "Material '{}' declared more than once, keeping the first declaration",
                    material.name
                );
            }
        }
        self.materials.push(material);
        id
    }

    /// Store a texture and return its handle
    pub fn push_texture(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        id
    }

    /// Resolve a material name
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    /// Texture bound to a material, if any
    pub fn material_texture(&self, id: MaterialId) -> Option<&Texture> {
        self.get(id)?.texture.and_then(|t| self.texture(t))
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Number of materials, Default included
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials
    ///
    /// A library built with [`MaterialLibrary::new`] starts with the Default
    /// material, so only a deserialized library can be empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn last_mut(&mut self, line: usize, directive: &str) -> Result<&mut Material> {
        // Index 0 is the synthetic Default, never the target of a directive
        if self.materials.len() <= 1 {
            return Err(ObjError::NoCurrentMaterial {
                line,
                directive: directive.to_string(),
            });
        }
        let last = self.materials.len() - 1;
        Ok(&mut self.materials[last])
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `<prefix>/<file_name>` into `library`
pub fn load_mtl(
    library: &mut MaterialLibrary,
    prefix: &Path,
    file_name: &str,
    textures: &dyn TextureLoader,
) -> Result<()> {
    let path = prefix.join(file_name);
    let file = std::fs::File::open(&path).map_err(|e| ObjError::FileSystem(path.clone(), e))?;
    log::debug!("Loading material library {}", path.display());
    parse_mtl(
        library,
        std::io::BufReader::new(file),
        prefix,
        textures,
    )
}

/// Parse MTL directives from `reader` into `library`.
///
/// `prefix` is the directory `map_Kd` file names are resolved against.
pub fn parse_mtl<R: BufRead>(
    library: &mut MaterialLibrary,
    reader: R,
    prefix: &Path,
    textures: &dyn TextureLoader,
) -> Result<()> {
    let first_new = library.len();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let tokens = split_line_whitespace(&line);
        let Some(directive) = tokens.first() else {
            continue;
        };

        match directive.as_str() {
            "newmtl" => {
                let name = tokens
                    .get(1)
                    .ok_or_else(|| ObjError::parse(line_no, "newmtl without a name"))?;
                library.push(Material::new(name.as_str()));
            }
            "Kd" | "Ka" | "Ks" => {
                let [r, g, b] =
                    parse_triple(&tokens, 1).map_err(|m| ObjError::parse(line_no, m))?;
                let material = library.last_mut(line_no, directive)?;
                let color = Vec3::new(r, g, b);
                match directive.as_str() {
                    "Kd" => material.diffuse = color,
                    "Ka" => material.ambient = color,
                    _ => material.specular = color,
                }
            }
            "d" | "Tr" => {
                let value = tokens
                    .get(1)
                    .ok_or_else(|| ObjError::parse(line_no, format!("{directive} without a value")))
                    .and_then(|t| parse_f32(t).map_err(|m| ObjError::parse(line_no, m)))?;
                let material = library.last_mut(line_no, directive)?;
                material.transparency = if directive == "d" { 1.0 - value } else { value };
            }
            "map_Kd" => {
                // Options such as `-s 1 1 1` precede the file name
                let file_name = tokens
                    .last()
                    .filter(|_| tokens.len() > 1)
                    .ok_or_else(|| ObjError::parse(line_no, "map_Kd without a file name"))?;
                library.last_mut(line_no, directive)?;
                let texture = textures.load(&prefix.join(file_name))?;
                let id = library.push_texture(texture);
                let material = library.last_mut(line_no, directive)?;
                if material.texture.is_some() {
                    log::warn!(
                        "Material '{}' binds map_Kd twice, using {}",
                        material.name,
                        file_name
                    );
                }
                material.texture = Some(id);
            }
            other => {
                log::trace!("Ignoring MTL directive '{}' on line {}", other, line_no);
            }
        }
    }

    log::debug!(
        "Parsed {} materials ({} textures total)",
        library.len() - first_new,
        library.textures().len()
    );
    Ok(())
}
