//! 统一错误处理模块
//!
//! 提供动画与蒙皮子系统的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **结构性错误** (`SkeletonError`, `SkinningError`): 输入数据与骨骼不一致
//! - **采样契约错误** (`SamplingError`): 调用方违反采样前置条件（空轨道、越界帧）
//! - **导入错误** (`ImportError`): 外部格式适配器无法产出场景
//!
//! `SkelAnimError` 可以同时处理以上所有层的错误。

use thiserror::Error;

/// 子系统顶层错误类型
#[derive(Error, Debug)]
pub enum SkelAnimError {
    #[error("Skeleton error: {0}")]
    Skeleton(#[from] SkeletonError),

    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Skinning error: {0}")]
    Skinning(#[from] SkinningError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

/// 骨骼层级错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkeletonError {
    #[error("Duplicate bone name in skeleton: {0}")]
    DuplicateBoneName(String),
}

/// 关键帧采样错误
///
/// 这些错误代表调用方的逻辑缺陷而非输入数据缺陷，采样会响亮地失败。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Cannot sample an empty keyframe track")]
    EmptyTrack,

    #[error("Frame {frame} is past the last keyframe at {last}")]
    FrameOutOfRange { frame: f32, last: f32 },
}

/// 蒙皮构建错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkinningError {
    #[error("Mesh '{0}' contains no polygons")]
    NoPolygons(String),

    #[error("Bone '{0}' referenced by weight binding does not exist in the skeleton")]
    UnknownBone(String),

    #[error("Point index {point} out of range in mesh '{mesh}'")]
    PointOutOfRange { mesh: String, point: u32 },
}

/// 导入适配器错误
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Document contains no scene")]
    NoScene,

    #[error("Mesh '{0}' has no position data")]
    MissingPositions(String),
}

/// 结果类型别名
pub type SkelAnimResult<T> = Result<T, SkelAnimError>;
pub type SkeletonResult<T> = Result<T, SkeletonError>;
pub type SamplingResult<T> = Result<T, SamplingError>;
pub type SkinningResult<T> = Result<T, SkinningError>;
pub type ImportResult<T> = Result<T, ImportError>;
