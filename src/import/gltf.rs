//! GLTF 导入适配器（需要启用 gltf feature）
//!
//! 把 glTF 文档映射到标准化 IR：节点树、逐点直接属性层、
//! 蒙皮关节 → 权重绑定三元组、动画采样器 → 帧单位关键帧通道。
//! 核心算法不直接接触任何 glTF 类型。

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec2, Vec3};

use super::{
    AttributeLayer, BindPose, BoneBinding, ImportedAnimation, ImportedChannel, ImportedMesh,
    ImportedNode, ImportedScene,
};
use crate::animation::keyframe::Keyframe;
use crate::core::error::{ImportError, ImportResult};

/// 动画通道从秒换算到帧单位使用的固定采样率（帧/秒）
pub const SAMPLE_RATE: f32 = 30.0;

/// 从 glTF 文档与缓冲区构建导入场景
///
/// # 示例
/// ```ignore
/// let (document, buffers, _) = gltf::import("model.gltf")?;
/// let scene = load_scene(&document, &buffers)?;
/// ```
pub fn load_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> ImportResult<ImportedScene> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::NoScene)?;

    // 多个根节点时插入一个虚拟根
    let mut roots: Vec<ImportedNode> = scene.nodes().map(build_node).collect();
    let root = if roots.len() == 1 {
        roots.remove(0)
    } else {
        let mut synthetic = ImportedNode::new("root", Mat4::IDENTITY);
        synthetic.children = roots;
        synthetic
    };

    let mut meshes = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        let skin = node.skin();
        for (index, primitive) in mesh.primitives().enumerate() {
            meshes.push(read_primitive(&mesh, skin.as_ref(), index, &primitive, buffers)?);
        }
    }

    let animations = document
        .animations()
        .map(|anim| read_animation(&anim, buffers))
        .collect();

    Ok(ImportedScene {
        root,
        meshes,
        animations,
    })
}

fn build_node(node: gltf::Node) -> ImportedNode {
    let mut imported = ImportedNode::new(
        node_name(&node),
        Mat4::from_cols_array_2d(&node.transform().matrix()),
    );
    imported.children = node.children().map(build_node).collect();
    imported
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

fn read_primitive(
    mesh: &gltf::Mesh,
    skin: Option<&gltf::Skin>,
    primitive_index: usize,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> ImportResult<ImportedMesh> {
    let base_name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
    let name = if primitive_index == 0 {
        base_name
    } else {
        format!("{}_{}", base_name, primitive_index)
    };

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let points: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| ImportError::MissingPositions(name.clone()))?
        .map(Vec3::from)
        .collect();

    // glTF 图元已经是纯三角形
    let flat_indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..points.len() as u32).collect(),
    };
    let faces: Vec<Vec<u32>> = flat_indices
        .chunks_exact(3)
        .map(|corners| corners.to_vec())
        .collect();

    let normals = reader
        .read_normals()
        .map(|iter| AttributeLayer::per_point(iter.map(Vec3::from).collect()));

    let uvs = reader
        .read_tex_coords(0)
        .map(|coords| {
            vec![AttributeLayer::per_point(
                coords.into_f32().map(Vec2::from).collect(),
            )]
        })
        .unwrap_or_default();

    // 切线为 vec4，w 分量给出副切线的手性
    let (tangents, bitangents) = match (reader.read_tangents(), &normals) {
        (Some(raw), Some(normal_layer)) => {
            let raw: Vec<[f32; 4]> = raw.collect();
            let tangent_values: Vec<Vec3> =
                raw.iter().map(|t| Vec3::new(t[0], t[1], t[2])).collect();
            let bitangent_values: Vec<Vec3> = raw
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let normal = normal_layer.get(i).unwrap_or(Vec3::ZERO);
                    normal.cross(Vec3::new(t[0], t[1], t[2])) * t[3]
                })
                .collect();
            (
                Some(AttributeLayer::per_point(tangent_values)),
                Some(AttributeLayer::per_point(bitangent_values)),
            )
        }
        _ => (None, None),
    };

    let mut weights = Vec::new();
    let mut bind_poses = Vec::new();
    if let Some(skin) = skin {
        let joint_names: Vec<String> = skin.joints().map(|joint| node_name(&joint)).collect();

        let skin_reader =
            skin.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
        let inverse_bind_matrices: Vec<Mat4> = skin_reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_else(|| vec![Mat4::IDENTITY; joint_names.len()]);

        for (joint, offset) in joint_names.iter().zip(&inverse_bind_matrices) {
            bind_poses.push(BindPose {
                bone: joint.clone(),
                offset: *offset,
            });
        }

        if let (Some(joints), Some(joint_weights)) = (reader.read_joints(0), reader.read_weights(0))
        {
            for (point, (ids, ws)) in joints.into_u16().zip(joint_weights.into_f32()).enumerate() {
                for (id, weight) in ids.iter().zip(ws.iter()) {
                    if *weight <= 0.0 {
                        continue;
                    }
                    match joint_names.get(*id as usize) {
                        Some(bone) => weights.push(BoneBinding {
                            bone: bone.clone(),
                            point: point as u32,
                            weight: *weight,
                        }),
                        None => log::warn!(
                            "joint index {} out of range in skin of mesh '{}'",
                            id,
                            name
                        ),
                    }
                }
            }
        }
    }

    let mut imported = ImportedMesh::new(name);
    imported.points = points;
    imported.faces = faces;
    imported.normals = normals;
    imported.uvs = uvs;
    imported.tangents = tangents;
    imported.bitangents = bitangents;
    imported.weights = weights;
    imported.bind_poses = bind_poses;
    Ok(imported)
}

fn read_animation(anim: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> ImportedAnimation {
    let name = anim
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", anim.index()));

    let mut channels: Vec<ImportedChannel> = Vec::new();
    let mut rests: Vec<(Vec3, Quat, Vec3)> = Vec::new();
    let mut channel_index: HashMap<String, usize> = HashMap::new();
    let mut max_time = 0.0f32;

    for channel in anim.channels() {
        let target = channel.target().node();
        let bone = node_name(&target);

        let reader =
            channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else { continue };
        let times: Vec<f32> = inputs.collect();
        if let Some(&last) = times.last() {
            max_time = max_time.max(last);
        }
        let Some(outputs) = reader.read_outputs() else { continue };

        let slot = *channel_index.entry(bone.clone()).or_insert_with(|| {
            let (translation, rotation, scale) = target.transform().decomposed();
            rests.push((
                Vec3::from(scale),
                Quat::from_array(rotation),
                Vec3::from(translation),
            ));
            channels.push(ImportedChannel {
                bone,
                ..Default::default()
            });
            channels.len() - 1
        });

        match outputs {
            gltf::animation::util::ReadOutputs::Scales(values) => {
                channels[slot].scale_keys = times
                    .iter()
                    .zip(values)
                    .map(|(&t, v)| Keyframe::new(t * SAMPLE_RATE, Vec3::from(v)))
                    .collect();
            }
            gltf::animation::util::ReadOutputs::Rotations(values) => {
                channels[slot].rotation_keys = times
                    .iter()
                    .zip(values.into_f32())
                    .map(|(&t, q)| Keyframe::new(t * SAMPLE_RATE, Quat::from_array(q)))
                    .collect();
            }
            gltf::animation::util::ReadOutputs::Translations(values) => {
                channels[slot].translation_keys = times
                    .iter()
                    .zip(values)
                    .map(|(&t, v)| Keyframe::new(t * SAMPLE_RATE, Vec3::from(v)))
                    .collect();
            }
            gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => {
                log::debug!("morph target channel for '{}' ignored", channels[slot].bone);
            }
        }
    }

    // 未动画化的通道用目标节点的静止变换补一个关键帧，
    // 保证每条轨道都可采样
    for (slot, channel) in channels.iter_mut().enumerate() {
        let (scale, rotation, translation) = rests[slot];
        if channel.scale_keys.is_empty() {
            channel.scale_keys.push(Keyframe::new(0.0, scale));
        }
        if channel.rotation_keys.is_empty() {
            channel.rotation_keys.push(Keyframe::new(0.0, rotation));
        }
        if channel.translation_keys.is_empty() {
            channel.translation_keys.push(Keyframe::new(0.0, translation));
        }
    }

    ImportedAnimation {
        name,
        duration_frames: max_time * SAMPLE_RATE,
        ticks_per_second: SAMPLE_RATE,
        channels,
    }
}
