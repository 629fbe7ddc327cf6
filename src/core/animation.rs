use crate::core::transform::generate_frames;
use crate::domain::model::{GenerateRequest, GenerateResponse};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_string;

/// 解析請求本文。格式錯誤屬於非預期錯誤 (500)，不是 400
pub fn parse_request(body: &[u8]) -> Result<GenerateRequest> {
    let request: GenerateRequest = serde_json::from_slice(body)?;
    Ok(request)
}

pub fn generate_animation(request: &GenerateRequest) -> Result<GenerateResponse> {
    let image = validate_required_string("image", &request.image)?;

    let settings = request.settings.normalized();
    if !request.settings.is_within_range() {
        tracing::warn!(
            "⚠️ Settings out of range (frameCount={}, motionIntensity={}), clamped to frameCount={}, motionIntensity={}",
            request.settings.frame_count,
            request.settings.motion_intensity,
            settings.frame_count,
            settings.motion_intensity
        );
    }

    let frames = generate_frames(image, &settings);
    tracing::debug!(
        "Generated {} frames with effect {}",
        frames.len(),
        settings.effect
    );

    Ok(GenerateResponse {
        success: true,
        frame_count: frames.len(),
        frames,
        settings,
    })
}

pub fn handle_generate(body: &[u8]) -> Result<GenerateResponse> {
    let request = parse_request(body)?;
    generate_animation(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Effect;
    use crate::utils::error::ErrorCategory;

    #[test]
    fn test_generate_with_settings() {
        let body = br#"{"image":"data:image/png;base64,AAAA","settings":{"frameCount":6,"motionIntensity":30,"effect":"character-animate"}}"#;
        let response = handle_generate(body).unwrap();

        assert!(response.success);
        assert_eq!(response.frame_count, 6);
        assert_eq!(response.frames.len(), 6);
        assert_eq!(response.settings.effect, Effect::CharacterAnimate);
        assert_eq!(response.settings.motion_intensity, 30.0);
        assert!(response.frames[0].transform.rotate.is_some());
    }

    #[test]
    fn test_missing_image_is_client_error() {
        let err = handle_generate(br#"{"settings":{"frameCount":8}}"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);

        let err = handle_generate(br#"{"image":""}"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_invalid_body_is_internal_error() {
        let err = handle_generate(b"not json").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_missing_settings_uses_defaults() {
        let response = handle_generate(br#"{"image":"img"}"#).unwrap();
        assert_eq!(response.frame_count, 8);
        assert_eq!(response.settings.effect, Effect::PanZoom);
    }

    #[test]
    fn test_single_frame_request_does_not_crash() {
        let response =
            handle_generate(br#"{"image":"img","settings":{"frameCount":1}}"#).unwrap();
        assert_eq!(response.frame_count, 4);
        assert!(response.frames.iter().all(|f| f.progress.is_finite()));
    }
}
