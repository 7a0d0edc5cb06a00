//! Model decoding and asynchronous loading.
//!
//! Each requested asset is decoded on a detached worker thread and
//! delivered through a oneshot channel; the app polls [`AssetLoader`] once
//! per frame and joins completed loads into the scene. There is no ordering
//! guarantee between loads, so scene code guards each model independently.

use std::ops::Range;
use std::path::{Path, PathBuf};

use futures::channel::oneshot;
use thiserror::Error;

use crate::anim::{Channel, ChannelTarget, Clip, Interpolation};

/// Errors raised while decoding a model asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unsupported asset format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to decode glTF asset: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("failed to decode OBJ asset: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("mesh primitive has no vertex positions")]
    MissingPositions,
    #[error("asset worker terminated before delivering a result")]
    WorkerLost,
}

/// Flat triangle geometry for one mesh primitive.
#[derive(Debug)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

/// One scene-graph node of the decoded asset.
#[derive(Debug)]
pub struct NodeData {
    pub parent: Option<usize>,
    pub translation: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Indices into [`ModelData::meshes`] drawn at this node.
    pub meshes: Range<usize>,
}

/// A fully decoded model: geometry, node hierarchy, and animation clips.
#[derive(Debug)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub nodes: Vec<NodeData>,
    pub clips: Vec<Clip>,
}

/// Decodes a model file, dispatching on its extension.
///
/// Supports binary/text glTF (`.glb`, `.gltf`) including animation clips,
/// and OBJ (`.obj`) as clip-less geometry.
pub fn load_model(path: &Path) -> Result<ModelData, AssetError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("glb") | Some("gltf") => load_gltf(path),
        Some("obj") => load_obj(path),
        _ => Err(AssetError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn load_gltf(path: &Path) -> Result<ModelData, AssetError> {
    let (document, buffers, _images) = gltf::import(path)?;

    // Flatten every primitive into one mesh list, remembering which slice
    // of it each glTF mesh occupies.
    let mut meshes = Vec::new();
    let mut mesh_ranges = Vec::new();
    for mesh in document.meshes() {
        let start = meshes.len();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<f32> = reader
                .read_positions()
                .ok_or(AssetError::MissingPositions)?
                .flatten()
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..(positions.len() / 3) as u32).collect(),
            };

            let normals: Vec<f32> = match reader.read_normals() {
                Some(normals) => normals.flatten().collect(),
                None => compute_vertex_normals(&positions, &indices),
            };

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            meshes.push(MeshData {
                positions,
                normals,
                indices,
                base_color,
            });
        }
        mesh_ranges.push(start..meshes.len());
    }

    // Parent links: glTF stores children only
    let node_count = document.nodes().count();
    let mut parents: Vec<Option<usize>> = vec![None; node_count];
    for node in document.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    let nodes = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            let meshes = node
                .mesh()
                .map(|m| mesh_ranges[m.index()].clone())
                .unwrap_or(0..0);
            NodeData {
                parent: parents[node.index()],
                translation,
                rotation,
                scale,
                meshes,
            }
        })
        .collect();

    let clips = document
        .animations()
        .map(|animation| read_clip(&animation, &buffers))
        .collect();

    Ok(ModelData {
        meshes,
        nodes,
        clips,
    })
}

fn read_clip(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> Clip {
    let mut channels = Vec::new();
    let mut duration = 0.0f32;

    for channel in animation.channels() {
        let target = match channel.target().property() {
            gltf::animation::Property::Translation => ChannelTarget::Translation,
            gltf::animation::Property::Rotation => ChannelTarget::Rotation,
            gltf::animation::Property::Scale => ChannelTarget::Scale,
            gltf::animation::Property::MorphTargetWeights => continue,
        };

        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        if let Some(&last) = times.last() {
            duration = duration.max(last);
        }

        let Some(outputs) = reader.read_outputs() else {
            continue;
        };
        let mut values: Vec<[f32; 4]> = match outputs {
            gltf::animation::util::ReadOutputs::Translations(t) => {
                t.map(|v| [v[0], v[1], v[2], 0.0]).collect()
            }
            gltf::animation::util::ReadOutputs::Scales(s) => {
                s.map(|v| [v[0], v[1], v[2], 0.0]).collect()
            }
            gltf::animation::util::ReadOutputs::Rotations(r) => r.into_f32().collect(),
            gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => {
                // Cubic samplers store in-tangent / value / out-tangent
                // triples; keep the values and interpolate linearly.
                values = values.iter().skip(1).step_by(3).copied().collect();
                Interpolation::Linear
            }
        };

        if values.len() != times.len() {
            continue;
        }

        channels.push(Channel {
            node: channel.target().node().index(),
            target,
            interpolation,
            times,
            values,
        });
    }

    Clip {
        name: animation.name().unwrap_or("clip").to_string(),
        duration,
        channels,
    }
}

fn load_obj(path: &Path) -> Result<ModelData, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_default();

    let mut meshes = Vec::new();
    for model in &models {
        let mesh = &model.mesh;

        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            compute_vertex_normals(&mesh.positions, &mesh.indices)
        };

        let base_color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(|mtl| {
                let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
                [
                    diffuse[0],
                    diffuse[1],
                    diffuse[2],
                    mtl.dissolve.unwrap_or(1.0),
                ]
            })
            .unwrap_or([0.8, 0.8, 0.8, 1.0]);

        meshes.push(MeshData {
            positions: mesh.positions.clone(),
            normals,
            indices: mesh.indices.clone(),
            base_color,
        });
    }

    // OBJ has no scene graph: one root node owning every mesh
    let nodes = vec![NodeData {
        parent: None,
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
        meshes: 0..meshes.len(),
    }];

    Ok(ModelData {
        meshes,
        nodes,
        clips: Vec::new(),
    })
}

/// Area-weighted vertex normals for geometry that ships without them.
fn compute_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut normals = vec![0.0f32; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let v = |i: usize| {
            cgmath::Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };
        let face = cgmath::Vector3::cross(v(i1) - v(i0), v(i2) - v(i0));

        for &i in &[i0, i1, i2] {
            normals[i * 3] += face.x;
            normals[i * 3 + 1] += face.y;
            normals[i * 3 + 2] += face.z;
        }
    }

    for n in normals.chunks_exact_mut(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 0.0 {
            n[0] /= len;
            n[1] /= len;
            n[2] /= len;
        }
    }

    normals
}

struct PendingLoad {
    name: String,
    receiver: oneshot::Receiver<Result<ModelData, AssetError>>,
}

/// Tracks in-flight background loads.
///
/// `request` spawns a worker thread per asset; `poll` drains whatever has
/// completed since the previous frame.
pub struct AssetLoader {
    pending: Vec<PendingLoad>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Begins decoding `path` in the background under the given model name.
    pub fn request(&mut self, name: &str, path: PathBuf) {
        log::info!("loading model '{}' from {}", name, path.display());

        let (sender, receiver) = oneshot::channel();
        std::thread::spawn(move || {
            let _ = sender.send(load_model(&path));
        });

        self.pending.push(PendingLoad {
            name: name.to_string(),
            receiver,
        });
    }

    /// Returns every load that has resolved since the last poll.
    pub fn poll(&mut self) -> Vec<(String, Result<ModelData, AssetError>)> {
        let mut completed = Vec::new();

        self.pending.retain_mut(|load| match load.receiver.try_recv() {
            Ok(Some(result)) => {
                completed.push((std::mem::take(&mut load.name), result));
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => {
                completed.push((
                    std::mem::take(&mut load.name),
                    Err(AssetError::WorkerLost),
                ));
                false
            }
        });

        completed
    }

    /// True when no loads are in flight.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}
