//! 骨骼节点
//!
//! 节点以竞技场（arena）方式存储在 [`super::Skeleton`] 的扁平数组里，
//! 子节点通过数组下标引用，避免树重建时的悬垂引用。

use glam::Mat4;

/// 表示"未绑定蒙皮数据"的骨骼下标
pub const UNBOUND: i32 = -1;

/// 骨骼节点
#[derive(Clone, Debug)]
pub struct Bone {
    /// 骨骼名称（骨架内唯一）
    pub name: String,
    /// 父骨骼竞技场下标（None 表示根骨骼）
    pub parent: Option<usize>,
    /// 子骨骼竞技场下标列表
    pub children: Vec<usize>,
    /// 静止姿态下相对父骨骼的局部变换
    pub rest_transform: Mat4,
    /// 偏移（逆绑定）矩阵：将顶点从网格绑定空间变换到骨骼局部空间
    pub offset_matrix: Mat4,
    /// 稳定的蒙皮下标：-1 表示未绑定，否则为稠密的 0..N
    pub index: i32,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, rest_transform: Mat4) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            rest_transform,
            offset_matrix: Mat4::IDENTITY,
            index: UNBOUND,
        }
    }

    /// 该骨骼是否参与蒙皮
    pub fn is_bound(&self) -> bool {
        self.index >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bone_is_unbound() {
        let bone = Bone::new("root", None, Mat4::IDENTITY);
        assert_eq!(bone.index, UNBOUND);
        assert!(!bone.is_bound());
        assert_eq!(bone.offset_matrix, Mat4::IDENTITY);
    }
}
