//! 骨骼局部变换
//!
//! 缩放/旋转/平移三元组及其混合、叠加运算。
//! 不变量：任何混合或叠加之后旋转保持归一化。

use glam::{Mat4, Quat, Vec3};
use std::ops::{Add, AddAssign, Mul, MulAssign};

/// 骨骼变换
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneTransform {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

impl BoneTransform {
    pub fn new(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }

    /// 转换为 4x4 矩阵，应用顺序为 平移 ∘ 旋转 ∘ 缩放
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// 从 4x4 矩阵分解
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            scale,
            rotation,
            translation,
        }
    }

    /// 与另一个变换混合
    ///
    /// 缩放与平移线性插值，旋转球面插值。
    pub fn blend(&self, other: &Self, factor: f32) -> Self {
        Self {
            scale: self.scale.lerp(other.scale, factor),
            rotation: self.rotation.slerp(other.rotation, factor).normalize(),
            translation: self.translation.lerp(other.translation, factor),
        }
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// 叠加运算，用于附加姿态分层
///
/// 缩放与平移逐分量相加，旋转为四元数乘法（后乘 `rhs`）。
impl Add for BoneTransform {
    type Output = BoneTransform;

    fn add(self, rhs: BoneTransform) -> BoneTransform {
        BoneTransform {
            scale: self.scale + rhs.scale,
            rotation: (rhs.rotation * self.rotation).normalize(),
            translation: self.translation + rhs.translation,
        }
    }
}

impl AddAssign for BoneTransform {
    fn add_assign(&mut self, rhs: BoneTransform) {
        *self = *self + rhs;
    }
}

/// 按因子向恒等变换缩放，用于部分权重混合
///
/// `factor == 0` 得到恒等变换，`factor == 1` 保持不变。
impl Mul<f32> for BoneTransform {
    type Output = BoneTransform;

    fn mul(self, factor: f32) -> BoneTransform {
        BoneTransform {
            scale: Vec3::ONE.lerp(self.scale, factor),
            rotation: Quat::IDENTITY.slerp(self.rotation, factor).normalize(),
            translation: self.translation * factor,
        }
    }
}

impl MulAssign<f32> for BoneTransform {
    fn mul_assign(&mut self, factor: f32) {
        *self = *self * factor;
    }
}
