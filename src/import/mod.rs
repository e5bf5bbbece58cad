//! 导入中间表示（IR）
//!
//! 各第三方格式对"节点/网格/动画"的原生表示能力集互有重叠但并不一致，
//! 本模块定义统一的中间表示，由格式专用适配器（如 [`gltf`]）产出，
//! 使骨骼与蒙皮算法保持格式无关。

use glam::{Mat4, Vec2, Vec3};

use crate::animation::keyframe::Keyframe;

#[cfg(feature = "gltf")]
pub mod gltf;

// ============================================================================
// 场景与节点
// ============================================================================

/// 导入的场景：节点树 + 网格 + 动画轨道
#[derive(Debug, Clone, Default)]
pub struct ImportedScene {
    /// 节点树根
    pub root: ImportedNode,
    /// 网格列表
    pub meshes: Vec<ImportedMesh>,
    /// 动画列表
    pub animations: Vec<ImportedAnimation>,
}

/// 导入的节点（相对父节点的变换）
#[derive(Debug, Clone)]
pub struct ImportedNode {
    /// 节点名称
    pub name: String,
    /// 相对父节点的局部变换
    pub transform: Mat4,
    /// 非变形的 IK 辅助末端节点标记，构建骨骼时会被剪除
    pub effector: bool,
    /// 子节点
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            effector: false,
            children: Vec::new(),
        }
    }
}

impl Default for ImportedNode {
    fn default() -> Self {
        Self::new("none", Mat4::IDENTITY)
    }
}

// ============================================================================
// 属性层
// ============================================================================

/// 属性层映射模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMode {
    /// 每个几何点一个属性
    PerPoint,
    /// 每个面角一个属性
    PerCorner,
}

/// 属性层引用模式
#[derive(Debug, Clone)]
pub enum ReferenceMode {
    /// 映射键直接作为值下标
    Direct,
    /// 映射键先经过索引表
    IndexToDirect(Vec<u32>),
}

/// 网格属性层（法线、UV、切线等）
///
/// 每层独立声明自己的映射与引用模式，蒙皮构建器必须逐层解析。
#[derive(Debug, Clone)]
pub struct AttributeLayer<T> {
    /// 属性值表
    pub values: Vec<T>,
    /// 映射模式
    pub mapping: MappingMode,
    /// 引用模式
    pub reference: ReferenceMode,
}

impl<T: Copy> AttributeLayer<T> {
    /// 按几何点映射的直接层
    pub fn per_point(values: Vec<T>) -> Self {
        Self {
            values,
            mapping: MappingMode::PerPoint,
            reference: ReferenceMode::Direct,
        }
    }

    /// 按面角映射的直接层
    pub fn per_corner(values: Vec<T>) -> Self {
        Self {
            values,
            mapping: MappingMode::PerCorner,
            reference: ReferenceMode::Direct,
        }
    }

    /// 解析一个面角的属性值下标
    ///
    /// `point` 是几何点下标，`corner` 是展开后的全局面角下标。
    pub fn value_index(&self, point: u32, corner: u32) -> usize {
        let key = match self.mapping {
            MappingMode::PerPoint => point as usize,
            MappingMode::PerCorner => corner as usize,
        };
        match &self.reference {
            ReferenceMode::Direct => key,
            ReferenceMode::IndexToDirect(indices) => match indices.get(key) {
                Some(&index) => index as usize,
                None => {
                    log::warn!("attribute index {} out of range, using 0", key);
                    0
                }
            },
        }
    }

    /// 读取属性值
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }
}

// ============================================================================
// 网格
// ============================================================================

/// 骨骼权重绑定：(骨骼名, 几何点, 权重) 三元组
#[derive(Debug, Clone)]
pub struct BoneBinding {
    pub bone: String,
    pub point: u32,
    pub weight: f32,
}

/// 骨骼绑定姿态：骨骼名 → 偏移（逆绑定）矩阵
#[derive(Debug, Clone)]
pub struct BindPose {
    pub bone: String,
    pub offset: Mat4,
}

/// 导入的网格
///
/// 面以"每面角点下标列表"的形式给出，可以是任意多边形；
/// 属性层可选，缺失的层由蒙皮构建器补零或重建。
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    /// 网格名称
    pub name: String,
    /// 几何点位置
    pub points: Vec<Vec3>,
    /// 每个面的角点下标
    pub faces: Vec<Vec<u32>>,
    /// 法线层
    pub normals: Option<AttributeLayer<Vec3>>,
    /// UV 层（可能有多层，只使用第一层）
    pub uvs: Vec<AttributeLayer<Vec2>>,
    /// 切线层
    pub tangents: Option<AttributeLayer<Vec3>>,
    /// 副切线层
    pub bitangents: Option<AttributeLayer<Vec3>>,
    /// 骨骼权重绑定
    pub weights: Vec<BoneBinding>,
    /// 骨骼绑定姿态（偏移矩阵）
    pub bind_poses: Vec<BindPose>,
}

impl ImportedMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            faces: Vec::new(),
            normals: None,
            uvs: Vec::new(),
            tangents: None,
            bitangents: None,
            weights: Vec::new(),
            bind_poses: Vec::new(),
        }
    }
}

// ============================================================================
// 动画
// ============================================================================

/// 导入的单骨骼动画通道
///
/// 三个轨道相互独立，长度与时间戳都可以不同。
#[derive(Debug, Clone, Default)]
pub struct ImportedChannel {
    /// 目标骨骼名称
    pub bone: String,
    /// 缩放关键帧（帧单位时间）
    pub scale_keys: Vec<Keyframe<Vec3>>,
    /// 旋转关键帧
    pub rotation_keys: Vec<Keyframe<glam::Quat>>,
    /// 平移关键帧
    pub translation_keys: Vec<Keyframe<Vec3>>,
}

/// 导入的动画轨道
#[derive(Debug, Clone)]
pub struct ImportedAnimation {
    /// 动画名称
    pub name: String,
    /// 总帧数（帧单位）
    pub duration_frames: f32,
    /// 采样率（帧/秒），非正值表示来源未指定
    pub ticks_per_second: f32,
    /// 每骨骼通道
    pub channels: Vec<ImportedChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_point_direct_layer() {
        let layer = AttributeLayer::per_point(vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(layer.value_index(2, 7), 2);
        assert_eq!(layer.get(2), Some(Vec3::Z));
    }

    #[test]
    fn test_per_corner_direct_layer() {
        let layer = AttributeLayer::per_corner(vec![Vec2::ZERO; 8]);
        assert_eq!(layer.value_index(2, 7), 7);
    }

    #[test]
    fn test_index_to_direct_layer() {
        let layer = AttributeLayer {
            values: vec![Vec3::X, Vec3::Y],
            mapping: MappingMode::PerCorner,
            reference: ReferenceMode::IndexToDirect(vec![1, 1, 0]),
        };
        assert_eq!(layer.value_index(0, 0), 1);
        assert_eq!(layer.value_index(0, 2), 0);
        // 越界退回 0
        assert_eq!(layer.value_index(0, 9), 0);
    }
}
