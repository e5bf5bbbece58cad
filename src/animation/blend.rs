//! 混合因子曲线
//!
//! 调用方在混合两个姿态前用这些标量函数整形混合因子。
//! `linear`/`smoothstep`/`swap` 接受 [0, 2] 的周期输入，产生往返波形。

use std::f32::consts::PI;

/// 余弦缓动：0.5 * (1 - cos(πx))
pub fn cosine(x: f32) -> f32 {
    0.5 * (1.0 - (x * PI).cos())
}

/// 三角波：在 [0, 2] 上从 0 升到 1 再降回 0
pub fn linear(x: f32) -> f32 {
    let x = x % 2.0;
    1.0 - (x - 1.0).abs()
}

/// 三角波上的平滑阶梯：3x² - 2x³
pub fn smoothstep(x: f32) -> f32 {
    let x = linear(x);
    3.0 * x * x - 2.0 * x * x * x
}

/// 方波：后半周期为 1，前半为 0
pub fn swap(x: f32) -> f32 {
    let x = x % 2.0;
    if x > 0.5 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_endpoints() {
        assert!(cosine(0.0).abs() < 1e-6);
        assert!((cosine(1.0) - 1.0).abs() < 1e-6);
        assert!((cosine(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_linear_triangle_wave() {
        assert!((linear(0.5) - 0.5).abs() < 1e-6);
        assert!((linear(1.0) - 1.0).abs() < 1e-6);
        assert!((linear(1.5) - 0.5).abs() < 1e-6);
        assert!(linear(2.0).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_midpoint() {
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-6);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert!(smoothstep(0.0).abs() < 1e-6);
    }

    #[test]
    fn test_swap_square_wave() {
        assert_eq!(swap(0.25), 0.0);
        assert_eq!(swap(0.75), 1.0);
        assert_eq!(swap(2.25), 0.0);
    }
}
