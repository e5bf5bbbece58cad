//! 骨骼姿态
//!
//! 姿态是骨骼名 → 局部变换的稀疏映射：只包含被采样片段实际动画化的骨骼。
//! 支持混合、并集叠加、整体缩放以及按子树的部分覆盖。

use std::collections::HashMap;
use std::ops::{Add, AddAssign, Mul, MulAssign};

use super::transform::BoneTransform;
use crate::skeleton::Skeleton;

/// 稀疏骨骼姿态
#[derive(Debug, Clone, Default)]
pub struct Pose {
    transforms: HashMap<String, BoneTransform>,
}

impl Pose {
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn get_transform(&self, name: &str) -> Option<&BoneTransform> {
        self.transforms.get(name)
    }

    pub fn set_transform(&mut self, name: &str, transform: BoneTransform) {
        self.transforms.insert(name.to_string(), transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BoneTransform)> {
        self.transforms.iter()
    }

    /// 与另一个姿态混合
    ///
    /// 双方共有的骨骼按因子插值，仅 `other` 拥有的骨骼被原样并入。
    pub fn blend(&mut self, other: &Pose, factor: f32) {
        for (name, transform) in &other.transforms {
            match self.transforms.get_mut(name) {
                Some(existing) => *existing = existing.blend(transform, factor),
                None => {
                    self.transforms.insert(name.clone(), *transform);
                }
            }
        }
    }

    /// 用 `other` 覆盖 `subtree_root` 及其所有后代骨骼的条目
    ///
    /// 其余条目保持不变，用于上半身/下半身之类的分区动画覆盖。
    /// `other` 中缺失的子树骨骼保留原值。
    pub fn partial_replace(&mut self, other: &Pose, skeleton: &Skeleton, subtree_root: &str) {
        let Some(root) = skeleton.find_index(subtree_root) else {
            log::warn!("subtree root '{}' not found in skeleton", subtree_root);
            return;
        };
        self.replace_recursive(other, skeleton, root);
    }

    fn replace_recursive(&mut self, other: &Pose, skeleton: &Skeleton, bone_index: usize) {
        let bone = &skeleton.bones[bone_index];
        if let Some(transform) = other.get_transform(&bone.name) {
            self.transforms.insert(bone.name.clone(), *transform);
        }
        for &child in &bone.children {
            self.replace_recursive(other, skeleton, child);
        }
    }
}

/// 并集叠加：共有骨骼逐条目相加，其余并入
impl AddAssign<&Pose> for Pose {
    fn add_assign(&mut self, rhs: &Pose) {
        for (name, transform) in &rhs.transforms {
            match self.transforms.get_mut(name) {
                Some(existing) => *existing += *transform,
                None => {
                    self.transforms.insert(name.clone(), *transform);
                }
            }
        }
    }
}

impl Add<&Pose> for Pose {
    type Output = Pose;

    fn add(mut self, rhs: &Pose) -> Pose {
        self += rhs;
        self
    }
}

/// 将包含的每个变换向恒等缩放
impl MulAssign<f32> for Pose {
    fn mul_assign(&mut self, factor: f32) {
        for transform in self.transforms.values_mut() {
            *transform *= factor;
        }
    }
}

impl Mul<f32> for Pose {
    type Output = Pose;

    fn mul(mut self, factor: f32) -> Pose {
        self *= factor;
        self
    }
}
