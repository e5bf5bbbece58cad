//! 动画系统模块
//!
//! 提供关键帧采样、骨骼动画片段与姿态代数。
//!
//! ## 功能特性
//!
//! - 泛型关键帧轨道，向量线性插值、四元数球面插值
//! - 每骨骼三通道（缩放/旋转/平移）独立采样
//! - 动画片段在归一化时间上求值出稀疏姿态
//! - 姿态混合、叠加、缩放与子树覆盖
//! - 时间 → 骨骼矩阵调色板的服务入口

pub mod blend;
pub mod clip;
pub mod keyframe;
pub mod pose;
pub mod service;
pub mod transform;

pub use clip::{AnimationClip, BoneAnimation, DEFAULT_FPS};
pub use keyframe::{Interpolate, Keyframe, KeyframeTrack};
pub use pose::Pose;
pub use service::AnimationService;
pub use transform::BoneTransform;
