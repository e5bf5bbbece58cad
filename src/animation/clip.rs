//! 动画片段
//!
//! `BoneAnimation` 持有单根骨骼的三条关键帧轨道；
//! `AnimationClip` 是具名的骨骼动画集合，在归一化时间上求值出姿态。

use glam::{Quat, Vec3};

use super::keyframe::KeyframeTrack;
use super::pose::Pose;
use super::transform::BoneTransform;
use crate::core::error::SamplingResult;
use crate::import::{ImportedAnimation, ImportedChannel};

/// 来源未指定采样率时使用的默认帧率
pub const DEFAULT_FPS: f32 = 25.0;

// ============================================================================
// 单骨骼动画
// ============================================================================

/// 单骨骼的三通道关键帧动画
///
/// 以骨骼名标识；名称与骨骼的匹配发生在姿态应用时而非构建时，
/// 未匹配的名称会被静默忽略，以容忍只覆盖部分骨架的动画。
#[derive(Debug, Clone, Default)]
pub struct BoneAnimation {
    /// 目标骨骼名称
    pub name: String,
    /// 缩放轨道
    pub scale_keys: KeyframeTrack<Vec3>,
    /// 旋转轨道
    pub rotation_keys: KeyframeTrack<Quat>,
    /// 平移轨道
    pub translation_keys: KeyframeTrack<Vec3>,
}

impl BoneAnimation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale_keys: KeyframeTrack::new(),
            rotation_keys: KeyframeTrack::new(),
            translation_keys: KeyframeTrack::new(),
        }
    }

    /// 从导入通道构建
    pub fn from_channel(channel: &ImportedChannel) -> Self {
        Self {
            name: channel.bone.clone(),
            scale_keys: KeyframeTrack::from_keys(channel.scale_keys.clone()),
            rotation_keys: KeyframeTrack::from_keys(channel.rotation_keys.clone()),
            translation_keys: KeyframeTrack::from_keys(channel.translation_keys.clone()),
        }
    }

    /// 在指定帧采样三条轨道，合成一个局部变换
    pub fn calculate_transform(&self, frame: f32) -> SamplingResult<BoneTransform> {
        Ok(BoneTransform::new(
            self.scale_keys.sample(frame)?,
            self.rotation_keys.sample(frame)?,
            self.translation_keys.sample(frame)?,
        ))
    }
}

// ============================================================================
// 动画片段
// ============================================================================

/// 骨骼动画片段
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// 片段名称
    pub name: String,
    /// 总帧数
    pub num_frames: u32,
    /// 帧率（帧/秒）
    pub fps: f32,
    /// 持续时间（秒）= 帧数 / 帧率
    pub duration: f32,
    /// 每骨骼动画
    pub bone_anims: Vec<BoneAnimation>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, num_frames: u32, fps: f32) -> Self {
        let fps = if fps > 0.0 { fps } else { DEFAULT_FPS };
        Self {
            name: name.into(),
            num_frames,
            fps,
            duration: num_frames as f32 / fps,
            bone_anims: Vec::new(),
        }
    }

    /// 从导入的动画轨道构建
    pub fn from_imported(anim: &ImportedAnimation) -> Self {
        let mut clip = Self::new(
            anim.name.clone(),
            anim.duration_frames as u32,
            anim.ticks_per_second,
        );
        clip.bone_anims = anim.channels.iter().map(BoneAnimation::from_channel).collect();
        clip
    }

    /// 在归一化时间 [0, 1) 上求值姿态
    ///
    /// 环绕播放由调用方预先归一化时间完成，本方法不做循环。
    /// 单个骨骼的采样错误被记录并跳过该骨骼，不影响其余条目。
    pub fn calculate_pose(&self, normalized_time: f32) -> Pose {
        let mut pose = Pose::new();

        let curr_frame = normalized_time * self.num_frames as f32;

        for bone_anim in &self.bone_anims {
            match bone_anim.calculate_transform(curr_frame) {
                Ok(transform) => pose.set_transform(&bone_anim.name, transform),
                Err(err) => {
                    log::error!(
                        "failed to sample bone '{}' in clip '{}': {}",
                        bone_anim.name,
                        self.name,
                        err
                    );
                }
            }
        }

        pose
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
