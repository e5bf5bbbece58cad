//! 蒙皮模块
//!
//! 把导入网格的逐面角属性转换为去重后的 GPU 顶点缓冲区：
//! - `mesh` - 扇形三角化、属性相等性去重、权重解析
//! - `weights` - 每顶点最多 4 骨骼的权重记录
//! - `vertex` - 扁平的 GPU 顶点布局

pub mod mesh;
pub mod vertex;
pub mod weights;

pub use mesh::SkinnedMesh;
pub use vertex::SkinnedVertex;
pub use weights::{VertexWeights, MAX_BONE_INFLUENCES};
