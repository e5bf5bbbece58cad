//! 蒙皮顶点数据
//!
//! 渲染层直接上传的扁平顶点布局；本 crate 不负责 GPU 上传。

use super::weights::VertexWeights;

/// 蒙皮顶点（包含骨骼下标与权重）
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    /// 位置
    pub position: [f32; 3],
    /// 纹理坐标
    pub uv: [f32; 2],
    /// 法线
    pub normal: [f32; 3],
    /// 切线
    pub tangent: [f32; 3],
    /// 副切线
    pub bitangent: [f32; 3],
    /// 骨骼权重（最多 4 个）
    pub bone_weights: [f32; 4],
    /// 骨骼蒙皮下标（-1 表示空槽位指向未绑定骨骼）
    pub bone_ids: [i32; 4],
}

impl SkinnedVertex {
    pub fn new(
        position: [f32; 3],
        uv: [f32; 2],
        normal: [f32; 3],
        tangent: [f32; 3],
        bitangent: [f32; 3],
        weights: VertexWeights,
    ) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent,
            bitangent,
            bone_weights: weights.weights,
            bone_ids: weights.ids,
        }
    }

    /// 归一化骨骼权重
    pub fn normalize_weights(&mut self) {
        let sum: f32 = self.bone_weights.iter().sum();
        if sum > 0.0001 {
            let inv_sum = 1.0 / sum;
            for w in &mut self.bone_weights {
                *w *= inv_sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skinned_vertex_size() {
        // 确保顶点大小符合预期：14 个 f32 + vec4 权重 + ivec4 下标
        assert_eq!(std::mem::size_of::<SkinnedVertex>(), 88);
    }

    #[test]
    fn test_normalize_weights() {
        let mut weights = VertexWeights::default();
        weights.add_bone_data(0, 0.5);
        weights.add_bone_data(1, 0.3);
        let mut vertex = SkinnedVertex::new(
            [0.0; 3],
            [0.0; 2],
            [0.0, 1.0, 0.0],
            [0.0; 3],
            [0.0; 3],
            weights,
        );

        vertex.normalize_weights();

        let sum: f32 = vertex.bone_weights.iter().sum();
        assert!((sum - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_weights_all_zero_is_noop() {
        let mut vertex = SkinnedVertex::new(
            [0.0; 3],
            [0.0; 2],
            [0.0; 3],
            [0.0; 3],
            [0.0; 3],
            VertexWeights::default(),
        );
        vertex.normalize_weights();
        assert_eq!(vertex.bone_weights, [0.0; 4]);
    }
}
