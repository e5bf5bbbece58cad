//! 关键帧轨道
//!
//! 时间以帧为单位（非归一化）。轨道采样使用线性扫描定位当前片段，
//! 空轨道和越界帧都是调用方的契约违规，以错误形式响亮地失败。

use glam::{Quat, Vec3};

use crate::core::error::{SamplingError, SamplingResult};

/// 可插值的关键帧值类型
pub trait Interpolate: Copy {
    fn interpolate(a: Self, b: Self, factor: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(a: Self, b: Self, factor: f32) -> Self {
        a * (1.0 - factor) + b * factor
    }
}

impl Interpolate for Quat {
    fn interpolate(a: Self, b: Self, factor: f32) -> Self {
        a.slerp(b, factor).normalize()
    }
}

/// 关键帧
#[derive(Debug, Clone, Copy)]
pub struct Keyframe<T> {
    /// 时间（帧单位）
    pub time: f32,
    /// 值
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// 关键帧轨道
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack<T> {
    /// 关键帧列表，按时间升序
    pub keys: Vec<Keyframe<T>>,
}

impl<T: Interpolate> KeyframeTrack<T> {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn from_keys(keys: Vec<Keyframe<T>>) -> Self {
        Self { keys }
    }

    /// 追加关键帧，时间必须单调递增
    pub fn push(&mut self, time: f32, value: T) {
        self.keys.push(Keyframe::new(time, value));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 定位当前片段的下界：最后一个满足 `frame < keys[i + 1].time` 的下标
    fn find_key(&self, frame: f32) -> SamplingResult<usize> {
        if self.keys.is_empty() {
            return Err(SamplingError::EmptyTrack);
        }

        for i in 0..self.keys.len() - 1 {
            if frame < self.keys[i + 1].time {
                return Ok(i);
            }
        }

        Err(SamplingError::FrameOutOfRange {
            frame,
            last: self.keys[self.keys.len() - 1].time,
        })
    }

    /// 在指定帧采样
    ///
    /// 单关键帧轨道无条件返回该值；多关键帧轨道定位片段后插值，
    /// 插值因子不做截断，早于首帧的时间按片段外推。
    pub fn sample(&self, frame: f32) -> SamplingResult<T> {
        if self.keys.len() == 1 {
            return Ok(self.keys[0].value);
        }

        let last_index = self.find_key(frame)?;
        let next_index = last_index + 1;

        let delta_time = self.keys[next_index].time - self.keys[last_index].time;
        let factor = (frame - self.keys[last_index].time) / delta_time;

        Ok(T::interpolate(
            self.keys[last_index].value,
            self.keys[next_index].value,
            factor,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_key_track() -> KeyframeTrack<Vec3> {
        KeyframeTrack::from_keys(vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(10.0, Vec3::new(10.0, 0.0, 0.0)),
        ])
    }

    #[test]
    fn test_single_keyframe_returns_value_unconditionally() {
        let track = KeyframeTrack::from_keys(vec![Keyframe::new(3.0, Vec3::splat(7.0))]);
        assert_eq!(track.sample(-100.0).unwrap(), Vec3::splat(7.0));
        assert_eq!(track.sample(0.0).unwrap(), Vec3::splat(7.0));
        assert_eq!(track.sample(1000.0).unwrap(), Vec3::splat(7.0));
    }

    #[test]
    fn test_sample_at_first_key_is_exact() {
        let track = two_key_track();
        assert_eq!(track.sample(0.0).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_sample_midpoint() {
        let track = two_key_track();
        let v = track.sample(5.0).unwrap();
        assert!(v.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_sample_approaches_last_key() {
        let track = two_key_track();
        let v = track.sample(10.0 - 1e-3).unwrap();
        assert!(v.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-2));
    }

    #[test]
    fn test_empty_track_fails() {
        let track = KeyframeTrack::<Vec3>::new();
        assert_eq!(track.sample(0.0), Err(SamplingError::EmptyTrack));
    }

    #[test]
    fn test_frame_past_last_key_fails() {
        let track = two_key_track();
        assert!(matches!(
            track.sample(10.0),
            Err(SamplingError::FrameOutOfRange { .. })
        ));
        assert!(matches!(
            track.sample(11.0),
            Err(SamplingError::FrameOutOfRange { .. })
        ));
    }

    #[test]
    fn test_quat_interpolation_is_normalized() {
        let track = KeyframeTrack::from_keys(vec![
            Keyframe::new(0.0, Quat::IDENTITY),
            Keyframe::new(10.0, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        ]);
        let q = track.sample(5.0).unwrap();
        assert!(q.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4), 1e-5));
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn test_interpolation_matches_blend_factor(frame in 0.0f32..9.99) {
            let track = two_key_track();
            let v = track.sample(frame).unwrap();
            // 两关键帧 {0, 10} 之间的采样等价于按 frame/10 混合
            prop_assert!((v.x - frame).abs() < 1e-3);
        }
    }
}
