//! 动画服务层
//!
//! 遵循DDD贫血模型，将"时间 → 骨骼矩阵调色板"的编排逻辑封装在Service中。

use glam::Mat4;

use super::clip::AnimationClip;
use super::pose::Pose;
use crate::import::ImportedScene;
use crate::skeleton::Skeleton;

/// 动画服务 - 封装动画业务逻辑
///
/// 遵循贫血模型设计原则：
/// - Skeleton / AnimationClip (Data): 纯数据结构
/// - AnimationService (Service): 封装业务逻辑
/// - 渲染循环 (Orchestration): 调度编排
pub struct AnimationService;

impl AnimationService {
    /// 计算指定时刻的蒙皮矩阵调色板
    ///
    /// 时间按片段时长取小数部分实现环绕播放；调色板被调整为
    /// 骨架绑定骨骼数并按稳定蒙皮下标写入。
    pub fn calculate_matrices(
        skeleton: &Skeleton,
        clip: &AnimationClip,
        time_seconds: f32,
        transforms: &mut Vec<Mat4>,
    ) {
        transforms.resize(skeleton.bound_bone_count(), Mat4::IDENTITY);

        if clip.duration() <= 0.0 {
            log::warn!("clip '{}' has zero duration, using rest pose", clip.name());
            skeleton.accumulate_matrices(transforms, &Pose::new(), Mat4::IDENTITY);
            return;
        }

        let normalized_time = (time_seconds / clip.duration()).fract();
        let pose = clip.calculate_pose(normalized_time);

        skeleton.accumulate_matrices(transforms, &pose, Mat4::IDENTITY);
    }

    /// 计算静止姿态的蒙皮矩阵调色板
    pub fn calculate_rest_matrices(skeleton: &Skeleton, transforms: &mut Vec<Mat4>) {
        transforms.resize(skeleton.bound_bone_count(), Mat4::IDENTITY);
        skeleton.accumulate_matrices(transforms, &Pose::new(), Mat4::IDENTITY);
    }

    /// 包装场景中导入的全部动画轨道
    pub fn load_animations(scene: &ImportedScene) -> Vec<AnimationClip> {
        if scene.animations.is_empty() {
            log::warn!("scene contains no animations!");
        }

        scene
            .animations
            .iter()
            .map(AnimationClip::from_imported)
            .collect()
    }
}
