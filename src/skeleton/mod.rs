//! 骨骼层级
//!
//! 从导入节点树构建具名骨骼的竞技场树，第二遍从网格绑定数据
//! 分配偏移矩阵与稠密蒙皮下标，之后不可变。
//! 遍历均为深度优先，与竞技场的先序存储顺序一致。

use std::collections::{HashMap, HashSet};

use glam::Mat4;

use crate::animation::pose::Pose;
use crate::core::error::{SkeletonError, SkeletonResult};
use crate::import::{ImportedNode, ImportedScene};

pub mod bone;

pub use bone::{Bone, UNBOUND};

/// 骨骼层级
///
/// 骨骼以深度优先先序存放在 `bones` 中，`bones[0]` 是根。
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    /// 所有骨骼（竞技场）
    pub bones: Vec<Bone>,
    /// 已绑定蒙皮下标的骨骼数量
    bound_bones: usize,
}

impl Skeleton {
    /// 从导入节点树递归构建
    ///
    /// 保留父子关系与局部静止变换；被标记为非变形末端的
    /// effector 节点会被剪除，以免污染动画骨骼查找。
    pub fn build(root: &ImportedNode) -> SkeletonResult<Skeleton> {
        let mut skeleton = Skeleton::default();
        let mut seen = HashSet::new();
        skeleton.insert_node(root, None, &mut seen)?;
        Ok(skeleton)
    }

    /// 从完整场景构建并绑定
    ///
    /// 先构建层级，再按首次出现顺序收集所有网格的绑定姿态
    /// （同名骨骼去重），最后分配偏移矩阵与蒙皮下标。
    pub fn from_scene(scene: &ImportedScene) -> SkeletonResult<Skeleton> {
        let mut skeleton = Self::build(&scene.root)?;

        let mut offsets: HashMap<String, Mat4> = HashMap::new();
        for mesh in &scene.meshes {
            for bind in &mesh.bind_poses {
                offsets.entry(bind.bone.clone()).or_insert(bind.offset);
            }
        }

        skeleton.assign_binding(&offsets);
        Ok(skeleton)
    }

    fn insert_node(
        &mut self,
        node: &ImportedNode,
        parent: Option<usize>,
        seen: &mut HashSet<String>,
    ) -> SkeletonResult<usize> {
        if !seen.insert(node.name.clone()) {
            return Err(SkeletonError::DuplicateBoneName(node.name.clone()));
        }

        let index = self.bones.len();
        self.bones.push(Bone::new(&node.name, parent, node.transform));

        for child in &node.children {
            if child.effector && child.children.is_empty() {
                log::debug!("{} is effector, ignoring it", child.name);
                continue;
            }
            let child_index = self.insert_node(child, Some(index), seen)?;
            self.bones[index].children.push(child_index);
        }

        Ok(index)
    }

    /// 分配绑定数据：深度优先，为映射中出现的骨骼设置偏移矩阵
    /// 并按分配顺序给出从 0 开始的稠密下标；其余骨骼保持 -1 与单位偏移。
    pub fn assign_binding(&mut self, offsets: &HashMap<String, Mat4>) {
        let mut next_index = 0;
        for bone in &mut self.bones {
            match offsets.get(&bone.name) {
                Some(offset) => {
                    bone.offset_matrix = *offset;
                    bone.index = next_index;
                    next_index += 1;
                }
                None => {
                    bone.offset_matrix = Mat4::IDENTITY;
                    bone.index = UNBOUND;
                }
            }
        }
        self.bound_bones = next_index as usize;
    }

    /// 深度优先查找第一个同名骨骼
    pub fn find(&self, name: &str) -> Option<&Bone> {
        // 竞技场按先序存储，线性扫描即深度优先顺序
        self.bones.iter().find(|bone| bone.name == name)
    }

    /// 深度优先查找第一个同名骨骼的竞技场下标
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// 收集所有骨骼的名称 → 蒙皮下标映射（包含 -1 条目）
    pub fn collect_indices(&self, out: &mut HashMap<String, i32>) {
        for bone in &self.bones {
            out.insert(bone.name.clone(), bone.index);
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 已绑定蒙皮下标的骨骼数量，即矩阵调色板的长度
    pub fn bound_bone_count(&self) -> usize {
        self.bound_bones
    }

    /// 深度优先累积骨骼矩阵
    ///
    /// 每个骨骼的局部变换取姿态条目（若存在），否则退回静止变换——
    /// 只动画化部分骨骼的片段因此仍能为其余骨骼产出正确矩阵。
    /// `final = parent * local`；已绑定骨骼写入
    /// `out[index] = final * offset`（偏移矩阵先于层级合成作用在
    /// 骨骼局部空间，这是标准的线性混合蒙皮矩阵顺序）。
    pub fn accumulate_matrices(&self, out: &mut [Mat4], pose: &Pose, parent: Mat4) {
        if !self.bones.is_empty() {
            self.accumulate_recursive(0, out, pose, parent);
        }
    }

    /// 便捷入口：以单位矩阵为根父矩阵，返回长度等于绑定骨骼数的调色板
    pub fn bone_matrices(&self, pose: &Pose) -> Vec<Mat4> {
        let mut out = vec![Mat4::IDENTITY; self.bound_bones];
        self.accumulate_matrices(&mut out, pose, Mat4::IDENTITY);
        out
    }

    fn accumulate_recursive(&self, index: usize, out: &mut [Mat4], pose: &Pose, parent: Mat4) {
        let bone = &self.bones[index];

        let local = match pose.get_transform(&bone.name) {
            Some(transform) => transform.to_matrix(),
            None => bone.rest_transform,
        };

        let finalized = parent * local;

        if bone.index >= 0 {
            if let Some(slot) = out.get_mut(bone.index as usize) {
                *slot = finalized * bone.offset_matrix;
            }
        }

        for &child in &bone.children {
            self.accumulate_recursive(child, out, pose, finalized);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::transform::BoneTransform;
    use glam::{Quat, Vec3};

    fn three_bone_tree() -> ImportedNode {
        let head = ImportedNode::new("head", Mat4::IDENTITY);
        let mut spine = ImportedNode::new("spine", Mat4::from_translation(Vec3::Y));
        spine.children = vec![head];
        let mut root = ImportedNode::new("root", Mat4::IDENTITY);
        root.children = vec![spine];
        root
    }

    #[test]
    fn test_build_preserves_hierarchy() {
        let skeleton = Skeleton::build(&three_bone_tree()).unwrap();
        assert_eq!(skeleton.bone_count(), 3);
        let root = &skeleton.bones[0];
        assert_eq!(root.name, "root");
        assert_eq!(root.parent, None);
        let spine = skeleton.find("spine").unwrap();
        assert_eq!(spine.parent, Some(0));
        assert_eq!(spine.rest_transform, Mat4::from_translation(Vec3::Y));
    }

    #[test]
    fn test_build_prunes_effectors() {
        let mut effector = ImportedNode::new("ik_hand", Mat4::IDENTITY);
        effector.effector = true;
        let mut root = ImportedNode::new("root", Mat4::IDENTITY);
        root.children = vec![effector, ImportedNode::new("arm", Mat4::IDENTITY)];

        let skeleton = Skeleton::build(&root).unwrap();
        assert_eq!(skeleton.bone_count(), 2);
        assert!(skeleton.find("ik_hand").is_none());
    }

    #[test]
    fn test_effector_with_children_is_kept() {
        // 只有无子节点的 effector 才是 IK 末端标记
        let mut effector = ImportedNode::new("not_a_leaf", Mat4::IDENTITY);
        effector.effector = true;
        effector.children = vec![ImportedNode::new("hand", Mat4::IDENTITY)];
        let mut root = ImportedNode::new("root", Mat4::IDENTITY);
        root.children = vec![effector];

        let skeleton = Skeleton::build(&root).unwrap();
        assert_eq!(skeleton.bone_count(), 3);
    }

    #[test]
    fn test_duplicate_name_is_error() {
        let mut root = ImportedNode::new("root", Mat4::IDENTITY);
        root.children = vec![
            ImportedNode::new("arm", Mat4::IDENTITY),
            ImportedNode::new("arm", Mat4::IDENTITY),
        ];
        assert_eq!(
            Skeleton::build(&root).unwrap_err(),
            SkeletonError::DuplicateBoneName("arm".to_string())
        );
    }

    #[test]
    fn test_collect_indices_covers_all_bones() {
        let mut skeleton = Skeleton::build(&three_bone_tree()).unwrap();
        let mut offsets = HashMap::new();
        offsets.insert("spine".to_string(), Mat4::IDENTITY);
        offsets.insert("head".to_string(), Mat4::IDENTITY);
        skeleton.assign_binding(&offsets);

        let mut indices = HashMap::new();
        skeleton.collect_indices(&mut indices);
        assert_eq!(indices.len(), 3);
        assert_eq!(indices["root"], UNBOUND);

        // 绑定下标是 [0, B) 的稠密排列
        let mut bound: Vec<i32> = indices.values().copied().filter(|&i| i >= 0).collect();
        bound.sort_unstable();
        assert_eq!(bound, vec![0, 1]);
        assert_eq!(skeleton.bound_bone_count(), 2);
    }

    #[test]
    fn test_assign_binding_is_depth_first_dense() {
        let mut skeleton = Skeleton::build(&three_bone_tree()).unwrap();
        let mut offsets = HashMap::new();
        for name in ["root", "spine", "head"] {
            offsets.insert(name.to_string(), Mat4::IDENTITY);
        }
        skeleton.assign_binding(&offsets);
        assert_eq!(skeleton.find("root").unwrap().index, 0);
        assert_eq!(skeleton.find("spine").unwrap().index, 1);
        assert_eq!(skeleton.find("head").unwrap().index, 2);
    }

    #[test]
    fn test_identity_skeleton_empty_pose_yields_offsets() {
        // 全单位静止变换 + 空姿态：父链坍缩为单位阵，结果即各自的偏移矩阵
        let mut child = ImportedNode::new("child", Mat4::IDENTITY);
        child.children = vec![];
        let mut root = ImportedNode::new("root", Mat4::IDENTITY);
        root.children = vec![child];
        let mut skeleton = Skeleton::build(&root).unwrap();

        let mut offsets = HashMap::new();
        offsets.insert("root".to_string(), Mat4::from_translation(Vec3::X));
        offsets.insert("child".to_string(), Mat4::from_translation(Vec3::Z));
        skeleton.assign_binding(&offsets);

        let palette = skeleton.bone_matrices(&Pose::new());
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0], Mat4::from_translation(Vec3::X));
        assert_eq!(palette[1], Mat4::from_translation(Vec3::Z));
    }

    #[test]
    fn test_pose_overrides_rest_transform() {
        let mut skeleton = Skeleton::build(&three_bone_tree()).unwrap();
        let mut offsets = HashMap::new();
        offsets.insert("head".to_string(), Mat4::IDENTITY);
        skeleton.assign_binding(&offsets);

        let mut pose = Pose::new();
        pose.set_transform(
            "spine",
            BoneTransform::new(Vec3::ONE, Quat::IDENTITY, Vec3::new(5.0, 0.0, 0.0)),
        );

        let palette = skeleton.bone_matrices(&pose);
        // head 自己静止（单位），spine 被姿态平移，父链传递到 head
        assert!(palette[0]
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_rest_fallback_for_unanimated_bones() {
        let mut skeleton = Skeleton::build(&three_bone_tree()).unwrap();
        let mut offsets = HashMap::new();
        offsets.insert("spine".to_string(), Mat4::IDENTITY);
        skeleton.assign_binding(&offsets);

        // 空姿态：spine 的最终矩阵来自静止变换
        let palette = skeleton.bone_matrices(&Pose::new());
        assert_eq!(palette[0], Mat4::from_translation(Vec3::Y));
    }
}
