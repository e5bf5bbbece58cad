//! 蒙皮网格构建器
//!
//! 导入格式因 UV/切线缝合会产生远多于几何点的逐面角"顶点"。
//! 构建器把多边形面扇形三角化、逐面角展开属性下标，再在每个几何点
//! 内做属性相等性去重，最终产出最小化的顶点缓冲区、三角形下标表
//! 与每顶点骨骼权重。源数据只读，除输出缓冲区外无副作用。

use glam::{Vec2, Vec3};
use std::collections::HashMap;

use super::vertex::SkinnedVertex;
use super::weights::VertexWeights;
use crate::core::error::{SkinningError, SkinningResult};
use crate::import::{AttributeLayer, ImportedMesh};
use crate::skeleton::Skeleton;

// ============================================================================
// 构建中间结构
// ============================================================================

/// 临时逐面角顶点：几何点下标 + 各属性层解析出的值下标
struct TempVert {
    point: u32,
    normal: usize,
    uv: usize,
    tangent: usize,
    bitangent: usize,
    /// 共享此顶点的 (三角形, 角槽位) 引用
    tris: Vec<(usize, usize)>,
}

/// 临时三角形，顶点下标在去重后被改写为最终值
struct TempTri {
    verts: [u32; 3],
}

// ============================================================================
// 蒙皮网格
// ============================================================================

/// 去重后的蒙皮网格：扁平属性数组 + 三角形下标表
///
/// 不变量：`indices.len() == 3 * num_triangles`，所有下标 < `num_vertices`，
/// 去重后的顶点数 ≤ 原始逐面角数。
#[derive(Debug, Clone, Default)]
pub struct SkinnedMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub weights: Vec<VertexWeights>,
    pub indices: Vec<u32>,
    pub num_vertices: usize,
    pub num_triangles: usize,
}

impl SkinnedMesh {
    /// 从导入网格与骨骼层级构建
    pub fn build(mesh: &ImportedMesh, skeleton: &Skeleton) -> SkinningResult<SkinnedMesh> {
        if mesh.faces.is_empty() {
            return Err(SkinningError::NoPolygons(mesh.name.clone()));
        }

        // UV：只使用第一层
        let has_uvs = !mesh.uvs.is_empty();
        if !has_uvs {
            log::warn!("mesh '{}' has no texture coordinates", mesh.name);
        } else if mesh.uvs.len() > 1 {
            log::warn!(
                "mesh '{}' has multiple UV sets, only using first one",
                mesh.name
            );
        }
        let uv_layer = mesh.uvs.first();

        // 法线：缺失时按几何点重建（面积加权）
        let generated_normals;
        let normal_layer = match &mesh.normals {
            Some(layer) => layer,
            None => {
                log::warn!("mesh '{}' has no normals, generating them", mesh.name);
                generated_normals = generate_point_normals(&mesh.points, &mesh.faces);
                &generated_normals
            }
        };

        // 切线：两层都在才参与去重判据，否则补零
        let tangent_layers = match (mesh.tangents.as_ref(), mesh.bitangents.as_ref()) {
            (Some(tangent), Some(bitangent)) => Some((tangent, bitangent)),
            _ => {
                log::debug!("mesh '{}' has no tangents", mesh.name);
                None
            }
        };
        let has_tangents = tangent_layers.is_some();

        // 1. 扇形三角化 + 2. 逐面角展开
        let mut temp_verts: Vec<Vec<TempVert>> =
            (0..mesh.points.len()).map(|_| Vec::new()).collect();
        let mut temp_tris: Vec<TempTri> = Vec::new();

        let mut corner_base: u32 = 0;
        let mut num_triangles = 0usize;
        for face in &mesh.faces {
            for j in 2..face.len() {
                let corners = [corner_base, corner_base + j as u32 - 1, corner_base + j as u32];
                let face_points = [face[0], face[j - 1], face[j]];

                temp_tris.push(TempTri { verts: face_points });

                for slot in 0..3 {
                    let point = face_points[slot];
                    let corner = corners[slot];
                    if point as usize >= mesh.points.len() {
                        return Err(SkinningError::PointOutOfRange {
                            mesh: mesh.name.clone(),
                            point,
                        });
                    }

                    let (tangent, bitangent) = match tangent_layers {
                        Some((tl, bl)) => {
                            (tl.value_index(point, corner), bl.value_index(point, corner))
                        }
                        None => (0, 0),
                    };

                    temp_verts[point as usize].push(TempVert {
                        point,
                        normal: normal_layer.value_index(point, corner),
                        uv: uv_layer.map_or(0, |layer| layer.value_index(point, corner)),
                        tangent,
                        bitangent,
                        tris: vec![(num_triangles, slot)],
                    });
                }

                num_triangles += 1;
            }
            corner_base += face.len() as u32;
        }

        // 3. 每个几何点内按属性下标相等做 O(k²) 去重
        let mut old_num_vertices = 0usize;
        let mut num_vertices = 0usize;
        let mut dupl_verts = 0usize;
        for verts in &mut temp_verts {
            old_num_vertices += verts.len();
            let mut i = 0;
            while i < verts.len() {
                let mut j = i + 1;
                while j < verts.len() {
                    let mut duplicate = verts[j].normal == verts[i].normal;
                    if has_uvs {
                        duplicate = duplicate && verts[j].uv == verts[i].uv;
                    }
                    if has_tangents {
                        duplicate = duplicate
                            && verts[j].tangent == verts[i].tangent
                            && verts[j].bitangent == verts[i].bitangent;
                    }
                    if duplicate {
                        let merged = verts.remove(j);
                        verts[i].tris.extend(merged.tris);
                        dupl_verts += 1;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
            num_vertices += verts.len();
        }
        log::debug!("{} vertex duplications", dupl_verts);

        // 5. 权重解析：未知骨骼名是该网格的硬失败，权重整体清零
        let point_weights = if mesh.weights.is_empty() {
            None
        } else {
            match Self::resolve_weights(mesh, skeleton) {
                Ok(weights) => Some(weights),
                Err(err) => {
                    log::error!("ignoring weights of mesh '{}': {}", mesh.name, err);
                    None
                }
            }
        };

        // 4. 按合并顺序物化最终数组，同时改写三角形的角 → 顶点引用
        let mut out = SkinnedMesh {
            positions: Vec::with_capacity(num_vertices),
            normals: Vec::with_capacity(num_vertices),
            tex_coords: Vec::with_capacity(num_vertices),
            tangents: Vec::with_capacity(num_vertices),
            bitangents: Vec::with_capacity(num_vertices),
            weights: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_triangles * 3),
            num_vertices,
            num_triangles,
        };

        let mut curr_vert: u32 = 0;
        for verts in &temp_verts {
            for vert in verts {
                for &(tri, slot) in &vert.tris {
                    temp_tris[tri].verts[slot] = curr_vert;
                }

                out.positions.push(mesh.points[vert.point as usize]);
                out.normals
                    .push(normal_layer.get(vert.normal).unwrap_or(Vec3::ZERO));
                out.tex_coords.push(match uv_layer {
                    Some(layer) => layer.get(vert.uv).unwrap_or(Vec2::ZERO),
                    None => Vec2::ZERO,
                });
                match tangent_layers {
                    Some((tl, bl)) => {
                        out.tangents.push(tl.get(vert.tangent).unwrap_or(Vec3::ZERO));
                        out.bitangents
                            .push(bl.get(vert.bitangent).unwrap_or(Vec3::ZERO));
                    }
                    None => {
                        out.tangents.push(Vec3::ZERO);
                        out.bitangents.push(Vec3::ZERO);
                    }
                }
                out.weights.push(match &point_weights {
                    Some(weights) => weights[vert.point as usize],
                    None => VertexWeights::default(),
                });

                curr_vert += 1;
            }
        }

        // 6. 由改写后的角 → 顶点映射重建三角形下标表
        for tri in &temp_tris {
            out.indices.extend_from_slice(&tri.verts);
        }

        log::debug!(
            "number of vertices reduced from {} to {}",
            old_num_vertices,
            num_vertices
        );

        Ok(out)
    }

    /// 经骨骼名 → 蒙皮下标映射解析绑定列表
    ///
    /// 每个几何点按到达顺序累积最多 4 条贡献；骨架中不存在的骨骼名
    /// 说明绑定数据与骨架不一致，立即失败。
    fn resolve_weights(
        mesh: &ImportedMesh,
        skeleton: &Skeleton,
    ) -> SkinningResult<Vec<VertexWeights>> {
        let mut bone_mapping: HashMap<String, i32> = HashMap::new();
        skeleton.collect_indices(&mut bone_mapping);

        let mut weights = vec![VertexWeights::default(); mesh.points.len()];
        for binding in &mesh.weights {
            let bone_index = *bone_mapping
                .get(&binding.bone)
                .ok_or_else(|| SkinningError::UnknownBone(binding.bone.clone()))?;

            match weights.get_mut(binding.point as usize) {
                Some(slot) => slot.add_bone_data(bone_index, binding.weight),
                None => {
                    return Err(SkinningError::PointOutOfRange {
                        mesh: mesh.name.clone(),
                        point: binding.point,
                    })
                }
            }
        }

        Ok(weights)
    }

    /// 扁平化为渲染层可直接上传的顶点缓冲区
    pub fn copy_to_buffer(&self) -> Vec<SkinnedVertex> {
        (0..self.num_vertices)
            .map(|v| SkinnedVertex {
                position: self.positions[v].to_array(),
                uv: self.tex_coords[v].to_array(),
                normal: self.normals[v].to_array(),
                tangent: self.tangents[v].to_array(),
                bitangent: self.bitangents[v].to_array(),
                bone_weights: self.weights[v].weights,
                bone_ids: self.weights[v].ids,
            })
            .collect()
    }
}

/// 由面几何重建按几何点映射的面积加权法线层
fn generate_point_normals(points: &[Vec3], faces: &[Vec<u32>]) -> AttributeLayer<Vec3> {
    let mut accumulated = vec![Vec3::ZERO; points.len()];

    for face in faces {
        for j in 2..face.len() {
            let (a, b, c) = (face[0], face[j - 1], face[j]);
            let (Some(&pa), Some(&pb), Some(&pc)) = (
                points.get(a as usize),
                points.get(b as usize),
                points.get(c as usize),
            ) else {
                continue;
            };

            // 未归一化的叉积长度正比于三角形面积
            let face_normal = (pb - pa).cross(pc - pa);
            for index in [a, b, c] {
                accumulated[index as usize] += face_normal;
            }
        }
    }

    for normal in &mut accumulated {
        *normal = normal.normalize_or_zero();
    }

    AttributeLayer::per_point(accumulated)
}
