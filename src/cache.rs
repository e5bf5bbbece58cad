//! 蒙皮结果缓存
//!
//! 由调用方持有的"文件键 → 已构建网格"缓存，避免重复构建同一资产。
//! 并发契约：命中路径只取读锁（多读者），未命中路径持写锁构建并插入
//! （单写者），同键的重复构建不会发生；这是本 crate 唯一的共享状态。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::error::SkinningResult;
use crate::skinning::SkinnedMesh;

/// 已构建蒙皮网格的缓存
#[derive(Debug, Default)]
pub struct MeshCache {
    entries: RwLock<HashMap<String, Arc<SkinnedMesh>>>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询缓存
    pub fn get(&self, key: &str) -> Option<Arc<SkinnedMesh>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// 命中即返回，未命中则在写锁内构建并插入
    ///
    /// 构建失败不会被缓存，下次查询会重试。
    pub fn get_or_build<F>(&self, key: &str, build: F) -> SkinningResult<Arc<SkinnedMesh>>
    where
        F: FnOnce() -> SkinningResult<SkinnedMesh>,
    {
        if let Some(mesh) = self.get(key) {
            return Ok(mesh);
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // 等待写锁期间可能已有其他写者完成构建
        if let Some(mesh) = entries.get(key) {
            return Ok(Arc::clone(mesh));
        }

        let mesh = Arc::new(build()?);
        entries.insert(key.to_string(), Arc::clone(&mesh));
        Ok(mesh)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存，已被调用方持有的 Arc 不受影响
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
