/// Loader for the tag based scene description format
use std::fs;
use std::path::{Path, PathBuf};

use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector3};

use crate::color::Color;
use crate::error::{ParseError, ParseErrorKind, RenderError};
use crate::light::{Attenuation, Light};
use crate::material::{Material, MaterialId};
use crate::primitive::{Cylinder, Sphere, TriangleBuilder, VertexRef};
use crate::scene::{DepthCue, Scene};
use crate::texture::{Texture, TextureId};
use crate::Float;

/// Internal representation of the parse state
#[derive(Default)]
struct ParseState {
    /// Material that objects declared from now on use
    current_material: Option<MaterialId>,
    eye: bool,
    viewdir: bool,
    updir: bool,
    hfov: bool,
    imsize: bool,
    bkgcolor: bool,
}

impl ParseState {
    fn new() -> ParseState {
        ParseState {
            ..Default::default()
        }
    }

    fn material(&self, tag: &str) -> Result<MaterialId, ParseErrorKind> {
        self.current_material
            .ok_or_else(|| ParseErrorKind::MissingMaterial(tag.to_string()))
    }

    /// First required parameter that never appeared
    fn missing(&self, scene: &Scene) -> Option<&'static str> {
        let required = [
            (self.eye, "eye"),
            (self.viewdir, "viewdir"),
            (self.updir, "updir"),
            (self.hfov, "hfov"),
            (self.imsize, "imsize"),
            (self.bkgcolor, "bkgcolor"),
            (!scene.primitives.is_empty(), "object"),
        ];
        required
            .iter()
            .find(|(present, _)| !present)
            .map(|(_, name)| *name)
    }
}

fn invalid(tag: &str) -> ParseErrorKind {
    ParseErrorKind::InvalidFormat(tag.to_string())
}

/// Parse exactly one of the allowed numbers of floats
fn parse_floats(tag: &str, args: &[&str], counts: &[usize]) -> Result<Vec<Float>, ParseErrorKind> {
    if !counts.contains(&args.len()) {
        return Err(invalid(tag));
    }
    args.iter()
        .map(|arg| arg.parse::<Float>().map_err(|_| invalid(tag)))
        .collect()
}

fn parse_float3(tag: &str, args: &[&str]) -> Result<[Float; 3], ParseErrorKind> {
    let v = parse_floats(tag, args, &[3])?;
    Ok([v[0], v[1], v[2]])
}

fn parse_direction(tag: &str, v: &[Float]) -> Result<Vector3<Float>, ParseErrorKind> {
    let dir = Vector3::new(v[0], v[1], v[2]);
    if dir.magnitude2() == 0.0 {
        Err(ParseErrorKind::ZeroDirection(tag.to_string()))
    } else {
        Ok(dir)
    }
}

fn parse_light(tag: &str, v: &[Float]) -> Result<Light, ParseErrorKind> {
    let color = Color::new(v[4], v[5], v[6]);
    if v[3] == 1.0 {
        Ok(Light::positional(Point3::new(v[0], v[1], v[2]), color))
    } else if v[3] == 0.0 {
        Ok(Light::directional(parse_direction(tag, &v[..3])?, color))
    } else {
        Err(invalid(tag))
    }
}

fn parse_material(tag: &str, v: &[Float]) -> Result<Material, ParseErrorKind> {
    let (opacity, refraction_i) = if v.len() == 12 {
        (v[10], v[11])
    } else {
        (1.0, 1.0)
    };
    if opacity < 0.0 || opacity > 1.0 || refraction_i <= 0.0 {
        return Err(invalid(tag));
    }
    Ok(Material {
        diffuse: Color::new(v[0], v[1], v[2]),
        specular: Color::new(v[3], v[4], v[5]),
        ka: v[6],
        kd: v[7],
        ks: v[8],
        shininess: v[9],
        opacity,
        refraction_i,
        texture: None,
    })
}

/// Convert a 1-based index to 0-based and check it against the declared count
fn parse_index(tag: &str, item: &str, len: usize) -> Result<usize, ParseErrorKind> {
    let index: i64 = item.parse().map_err(|_| invalid(tag))?;
    if index < 1 || index as usize > len {
        return Err(ParseErrorKind::IndexOutOfRange {
            tag: tag.to_string(),
            index,
            len,
        });
    }
    Ok((index - 1) as usize)
}

/// Parse one p, p/t, p//n or p/t/n group of a face
fn parse_vertex_ref(tag: &str, item: &str, scene: &Scene) -> Result<VertexRef, ParseErrorKind> {
    let parts: Vec<&str> = item.split('/').collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return Err(invalid(tag));
    }
    let mesh = &scene.mesh;
    let position = parse_index(tag, parts[0], mesh.positions.len())?;
    let tex_coords = match parts.get(1) {
        Some(t) if !t.is_empty() => Some(parse_index(tag, t, mesh.tex_coords.len())?),
        // p/ and p/t/ are malformed, p//n is not
        Some(_) if parts.len() == 2 => return Err(invalid(tag)),
        _ => None,
    };
    let normal = match parts.get(2) {
        Some(n) if !n.is_empty() => Some(parse_index(tag, n, mesh.normals.len())?),
        Some(_) => return Err(invalid(tag)),
        None => None,
    };
    Ok(VertexRef {
        position,
        tex_coords,
        normal,
    })
}

fn parse_line(
    tag: &str,
    args: &[&str],
    scene: &mut Scene,
    state: &mut ParseState,
    base_dir: &Path,
) -> Result<(), ParseErrorKind> {
    match tag {
        "eye" => {
            let [x, y, z] = parse_float3(tag, args)?;
            scene.eye = Point3::new(x, y, z);
            state.eye = true;
        }
        "viewdir" => {
            let [x, y, z] = parse_float3(tag, args)?;
            scene.viewdir = Vector3::new(x, y, z);
            state.viewdir = true;
        }
        "updir" => {
            let [x, y, z] = parse_float3(tag, args)?;
            scene.updir = Vector3::new(x, y, z);
            state.updir = true;
        }
        "hfov" => {
            let v = parse_floats(tag, args, &[1])?;
            if v[0] <= 0.0 || v[0] >= 180.0 {
                return Err(invalid(tag));
            }
            scene.hfov = v[0];
            state.hfov = true;
        }
        "imsize" => {
            if args.len() != 2 {
                return Err(invalid(tag));
            }
            let mut size = [0u32; 2];
            for (s, arg) in size.iter_mut().zip(args) {
                let v: i64 = arg.parse().map_err(|_| invalid(tag))?;
                if v <= 0 || v > i64::from(u32::MAX) {
                    return Err(ParseErrorKind::InvalidImageSize);
                }
                *s = v as u32;
            }
            scene.width = size[0];
            scene.height = size[1];
            state.imsize = true;
        }
        "bkgcolor" => {
            let [r, g, b] = parse_float3(tag, args)?;
            scene.background = Color::new(r, g, b);
            state.bkgcolor = true;
        }
        "mtlcolor" => {
            let v = parse_floats(tag, args, &[10, 12])?;
            scene.materials.push(parse_material(tag, &v)?);
            state.current_material = Some(MaterialId(scene.materials.len() - 1));
        }
        "texture" => {
            if args.len() != 1 {
                return Err(invalid(tag));
            }
            let MaterialId(current) = state.material(tag)?;
            let path: PathBuf = base_dir.join(args[0]);
            let texture = Texture::from_image_path(&path)
                .map_err(|source| ParseErrorKind::Texture {
                    path: path.clone(),
                    source,
                })?;
            log::debug!("loaded texture {:?} {:?}", path, texture);
            scene.textures.push(texture);
            let mut material = scene.materials[current].clone();
            material.texture = Some(TextureId(scene.textures.len() - 1));
            scene.materials.push(material);
            state.current_material = Some(MaterialId(scene.materials.len() - 1));
        }
        "sphere" => {
            let v = parse_floats(tag, args, &[4])?;
            let material = state.material(tag)?;
            if v[3] <= 0.0 {
                return Err(invalid(tag));
            }
            let center = Point3::new(v[0], v[1], v[2]);
            scene
                .primitives
                .push(Sphere::new(center, v[3], material).into());
        }
        "cylinder" => {
            let v = parse_floats(tag, args, &[8])?;
            let material = state.material(tag)?;
            let axis = parse_direction(tag, &v[3..6])?;
            if v[6] <= 0.0 || v[7] <= 0.0 {
                return Err(invalid(tag));
            }
            let base = Point3::new(v[0], v[1], v[2]);
            scene
                .primitives
                .push(Cylinder::new(base, axis, v[6], v[7], material).into());
        }
        "light" => {
            let v = parse_floats(tag, args, &[7])?;
            scene.lights.push(parse_light(tag, &v)?);
        }
        "attlight" => {
            let v = parse_floats(tag, args, &[10])?;
            let attenuation = Attenuation::new(v[7], v[8], v[9]);
            scene
                .lights
                .push(parse_light(tag, &v)?.with_attenuation(attenuation));
        }
        "depthcueing" => {
            let v = parse_floats(tag, args, &[7])?;
            if v[5] <= v[6] {
                return Err(invalid(tag));
            }
            scene.depth_cue = Some(DepthCue {
                color: Color::new(v[0], v[1], v[2]),
                a_max: v[3],
                a_min: v[4],
                dist_max: v[5],
                dist_min: v[6],
            });
        }
        "v" => {
            let [x, y, z] = parse_float3(tag, args)?;
            scene.mesh.positions.push(Point3::new(x, y, z));
        }
        "vn" => {
            let v = parse_float3(tag, args)?;
            let n = parse_direction(tag, &v)?;
            scene.mesh.normals.push(n.normalize());
        }
        "vt" => {
            let v = parse_floats(tag, args, &[2])?;
            scene.mesh.tex_coords.push(Point2::new(v[0], v[1]));
        }
        "f" => {
            if args.len() != 3 {
                return Err(invalid(tag));
            }
            let material = state.material(tag)?;
            let mut builder = TriangleBuilder::new();
            for item in args {
                builder.add_vertex(parse_vertex_ref(tag, item, scene)?);
            }
            let triangle = builder.build(material).map_err(|_| invalid(tag))?;
            scene.primitives.push(triangle.into());
        }
        _ => return Err(ParseErrorKind::UnknownTag(tag.to_string())),
    }
    Ok(())
}

/// Parse a scene description, relative paths are resolved against base_dir
pub fn parse_scene(source: &str, base_dir: &Path) -> Result<Scene, ParseError> {
    let mut scene = Scene::default();
    let mut state = ParseState::new();
    for (i, line) in source.lines().enumerate() {
        let mut split_line = line.split_whitespace();
        // Find the keyword of the line
        let tag = match split_line.next() {
            Some(tag) if !tag.starts_with('#') => tag,
            _ => continue,
        };
        let args: Vec<&str> = split_line.collect();
        parse_line(tag, &args, &mut scene, &mut state, base_dir)
            .map_err(|kind| ParseError::new(i + 1, kind))?;
    }
    if let Some(name) = state.missing(&scene) {
        return Err(ParseError::new(0, ParseErrorKind::MissingParameter(name)));
    }
    Ok(scene)
}

/// Load a scene file found at the given path
pub fn load_scene(path: &Path) -> Result<Scene, RenderError> {
    let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = parse_scene(&source, base_dir)?;
    if scene.lights.is_empty() {
        log::warn!("{:?} has no lights, only ambient shading", path);
    }
    Ok(scene)
}
