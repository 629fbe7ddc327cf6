//! 影格變換產生器：每個效果都是以 progress 為變數的封閉式公式。

use crate::domain::model::{Effect, FrameDescriptor, Settings, Transform};
use std::f64::consts::PI;

/// 第 `index` 張影格在序列中的位置，範圍 [0, 1]。只有一張(或零張)時回傳 0
pub fn progress_at(index: u32, total: u32) -> f64 {
    if total <= 1 {
        return 0.0;
    }
    f64::from(index) / f64::from(total - 1)
}

pub fn generate_transform(effect: Effect, progress: f64, intensity: f64) -> Transform {
    match effect {
        Effect::PanZoom => Transform {
            scale: 1.0 + progress * intensity / 100.0,
            translate_x: (progress * PI).sin() * (intensity / 2.0),
            translate_y: Some(-progress * (intensity / 4.0)),
            rotate: None,
            blur: None,
        },
        Effect::Parallax => Transform {
            scale: 1.0 + (progress * PI * 2.0).sin() * intensity / 200.0,
            translate_x: (progress * PI * 2.0).cos() * (intensity / 3.0),
            translate_y: Some((progress * PI * 4.0).sin() * (intensity / 5.0)),
            rotate: None,
            blur: None,
        },
        Effect::MotionBlur => Transform {
            scale: 1.0 + progress * 0.1,
            translate_x: progress * (intensity / 2.0),
            translate_y: None,
            rotate: None,
            blur: Some((1.0 - (progress - 0.5).abs() * 2.0) * (intensity / 50.0)),
        },
        Effect::CharacterAnimate => Transform {
            scale: 1.0 + (progress * PI).sin() * (intensity / 150.0),
            translate_x: (progress * PI * 3.0).sin() * (intensity / 4.0),
            translate_y: Some((progress * PI * 2.0).cos() * (intensity / 6.0)),
            rotate: Some((progress * PI * 2.0).sin() * (intensity / 50.0)),
            blur: None,
        },
    }
}

pub fn generate_transform_by_name(effect: &str, progress: f64, intensity: f64) -> Transform {
    generate_transform(Effect::from_name(effect), progress, intensity)
}

/// 依設定產生整段序列，設定會先被夾回允許範圍
pub fn generate_frames(image: &str, settings: &Settings) -> Vec<FrameDescriptor> {
    let settings = settings.normalized();

    (0..settings.frame_count)
        .map(|i| {
            let progress = progress_at(i, settings.frame_count);
            FrameDescriptor {
                source_image_reference: image.to_string(),
                progress,
                transform: generate_transform(settings.effect, progress, settings.motion_intensity),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn samples() -> impl Iterator<Item = f64> {
        (0..=100).map(|i| f64::from(i) / 100.0)
    }

    fn intensities() -> [f64; 3] {
        [10.0, 50.0, 100.0]
    }

    #[test]
    fn test_progress_at_endpoints() {
        assert_eq!(progress_at(0, 8), 0.0);
        assert_eq!(progress_at(7, 8), 1.0);
        assert!((progress_at(2, 5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_progress_at_single_frame_does_not_divide_by_zero() {
        assert_eq!(progress_at(0, 1), 0.0);
        assert_eq!(progress_at(0, 0), 0.0);
    }

    #[test]
    fn test_pan_zoom_ranges() {
        for intensity in intensities() {
            for p in samples() {
                let t = generate_transform(Effect::PanZoom, p, intensity);
                assert!(t.scale >= 1.0 - EPS && t.scale <= 1.0 + intensity / 100.0 + EPS);
                assert!(t.translate_x >= -EPS && t.translate_x <= intensity / 2.0 + EPS);
                let ty = t.translate_y.unwrap();
                assert!(ty <= EPS && ty >= -intensity / 4.0 - EPS);
                assert!(t.rotate.is_none() && t.blur.is_none());
            }
        }
    }

    #[test]
    fn test_parallax_ranges() {
        for intensity in intensities() {
            for p in samples() {
                let t = generate_transform(Effect::Parallax, p, intensity);
                assert!((t.scale - 1.0).abs() <= intensity / 200.0 + EPS);
                assert!(t.translate_x.abs() <= intensity / 3.0 + EPS);
                assert!(t.translate_y.unwrap().abs() <= intensity / 5.0 + EPS);
            }
        }
    }

    #[test]
    fn test_motion_blur_ranges() {
        for intensity in intensities() {
            for p in samples() {
                let t = generate_transform(Effect::MotionBlur, p, intensity);
                assert!(t.scale >= 1.0 - EPS && t.scale <= 1.1 + EPS);
                assert!(t.translate_x >= -EPS && t.translate_x <= intensity / 2.0 + EPS);
                let blur = t.blur.unwrap();
                assert!(blur >= -EPS && blur <= intensity / 50.0 + EPS);
                assert!(t.translate_y.is_none());
            }
        }

        // 模糊在序列中間最強
        let mid = generate_transform(Effect::MotionBlur, 0.5, 50.0);
        assert!((mid.blur.unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_character_animate_ranges() {
        for intensity in intensities() {
            for p in samples() {
                let t = generate_transform(Effect::CharacterAnimate, p, intensity);
                assert!(t.scale >= 1.0 - EPS && t.scale <= 1.0 + intensity / 150.0 + EPS);
                assert!(t.translate_x.abs() <= intensity / 4.0 + EPS);
                assert!(t.translate_y.unwrap().abs() <= intensity / 6.0 + EPS);
                assert!(t.rotate.unwrap().abs() <= intensity / 50.0 + EPS);
            }
        }
    }

    #[test]
    fn test_unknown_effect_matches_pan_zoom() {
        for p in samples() {
            assert_eq!(
                generate_transform_by_name("does-not-exist", p, 42.0),
                generate_transform(Effect::PanZoom, p, 42.0)
            );
        }
    }

    #[test]
    fn test_pan_zoom_endpoint_values() {
        let start = generate_transform(Effect::PanZoom, 0.0, 50.0);
        assert_eq!(start.scale, 1.0);
        assert_eq!(start.translate_x, 0.0);

        let end = generate_transform(Effect::PanZoom, 1.0, 50.0);
        assert!((end.scale - 1.5).abs() < EPS);
        assert!((end.translate_y.unwrap() + 12.5).abs() < EPS);
    }

    #[test]
    fn test_generate_frames_spacing() {
        let settings = Settings {
            frame_count: 5,
            motion_intensity: 40.0,
            effect: Effect::Parallax,
        };
        let frames = generate_frames("img", &settings);
        assert_eq!(frames.len(), 5);
        let progress: Vec<f64> = frames.iter().map(|f| f.progress).collect();
        assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(frames.iter().all(|f| f.source_image_reference == "img"));
    }

    #[test]
    fn test_generate_frames_clamps_single_frame_request() {
        let settings = Settings {
            frame_count: 1,
            ..Settings::default()
        };
        let frames = generate_frames("img", &settings);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].progress, 0.0);
        assert_eq!(frames[3].progress, 1.0);
    }
}
