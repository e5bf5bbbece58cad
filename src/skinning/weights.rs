//! 顶点骨骼权重
//!
//! 固定 4 槽位的硬件蒙皮容量：每个几何点按到达顺序累积
//! (骨骼下标, 权重) 对，超出容量的贡献被丢弃并记录警告。

/// 每顶点最多参与蒙皮的骨骼数（硬件蒙皮约定，不可配置）
pub const MAX_BONE_INFLUENCES: usize = 4;

/// 单个顶点的骨骼权重记录
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexWeights {
    /// 骨骼蒙皮下标
    pub ids: [i32; MAX_BONE_INFLUENCES],
    /// 对应权重，空槽位为 0
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexWeights {
    /// 按到达顺序填入一条骨骼贡献
    ///
    /// 前 4 条保留，之后的贡献被丢弃并警告。
    pub fn add_bone_data(&mut self, bone_id: i32, weight: f32) {
        for slot in 0..MAX_BONE_INFLUENCES {
            if self.weights[slot] == 0.0 {
                self.ids[slot] = bone_id;
                self.weights[slot] = weight;
                return;
            }
        }

        log::warn!(
            "vertex already has {} bone influences, dropping weight {} of bone {}",
            MAX_BONE_INFLUENCES,
            weight,
            bone_id
        );
    }

    /// 已占用的槽位数
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_arrival_order() {
        let mut weights = VertexWeights::default();
        weights.add_bone_data(3, 0.5);
        weights.add_bone_data(1, 0.3);
        assert_eq!(weights.ids[0], 3);
        assert_eq!(weights.weights[0], 0.5);
        assert_eq!(weights.ids[1], 1);
        assert_eq!(weights.influence_count(), 2);
    }

    #[test]
    fn test_drops_contributions_past_capacity() {
        let mut weights = VertexWeights::default();
        for bone in 0..6 {
            weights.add_bone_data(bone, 0.1 + bone as f32 * 0.01);
        }
        // 前 4 条按到达顺序保留，第 5、6 条被丢弃
        assert_eq!(weights.ids, [0, 1, 2, 3]);
        assert_eq!(weights.influence_count(), 4);
        assert!((weights.weights[3] - 0.13).abs() < 1e-6);
    }
}
