//! # Skelanim
//!
//! Skeletal animation and mesh skinning core.
//!
//! ## Features
//!
//! - **Bone Hierarchy**: Arena-based bone tree with offset matrices and stable dense indices
//! - **Keyframe Sampling**: Per-channel scale/rotation/translation tracks with lerp/slerp interpolation
//! - **Pose Algebra**: Sparse per-bone poses with blend, additive layering and subtree overrides
//! - **Mesh Skinning**: Attribute-equality vertex deduplication and 4-bone weight assignment
//! - **Importer IR**: Format-agnostic scene/mesh/animation records, with an optional glTF adapter
//!
//! ## Architecture Design
//!
//! The crate follows the **Anemic Domain Model (贫血模型)** pattern:
//! - **Data**: plain structs ([`skeleton::Skeleton`], [`animation::AnimationClip`],
//!   [`skinning::SkinnedMesh`]) holding state only
//! - **Service**: business logic as static methods ([`animation::AnimationService`])
//! - **Orchestration**: the caller's render loop schedules sampling and matrix accumulation
//!
//! ### Example
//!
//! ```ignore
//! use skelanim::animation::AnimationService;
//! use skelanim::skeleton::Skeleton;
//!
//! let skeleton = Skeleton::from_scene(&scene)?;
//! let clips = AnimationService::load_animations(&scene);
//! let mut palette = Vec::new();
//! AnimationService::calculate_matrices(&skeleton, &clips[0], time, &mut palette);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types shared by all subsystems
//! - [`import`]: Normalized importer intermediate representation
//! - [`skeleton`]: Bone hierarchy construction and matrix accumulation
//! - [`animation`]: Keyframe tracks, clips, poses and blend helpers
//! - [`skinning`]: Skinned vertex buffer construction
//! - [`cache`]: Caller-owned cache of built meshes

/// Core error types shared by all subsystems
pub mod core;
/// Normalized importer intermediate representation and format adapters
pub mod import;
/// Bone hierarchy construction and matrix accumulation
pub mod skeleton;
/// Keyframe tracks, animation clips, poses and blend helpers
pub mod animation;
/// Skinned vertex buffer construction with deduplication
pub mod skinning;
/// Caller-owned cache of built skinned meshes
pub mod cache;
