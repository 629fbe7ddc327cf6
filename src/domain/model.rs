use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const FRAME_COUNT_RANGE: RangeInclusive<u32> = 4..=16;
pub const MOTION_INTENSITY_RANGE: RangeInclusive<f64> = 10.0..=100.0;
pub const DEFAULT_FRAME_COUNT: u32 = 8;
pub const DEFAULT_MOTION_INTENSITY: f64 = 50.0;

/// 動畫效果。未知名稱一律視為 `pan-zoom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Effect {
    #[default]
    PanZoom,
    Parallax,
    MotionBlur,
    CharacterAnimate,
}

impl Effect {
    pub const ALL: [Effect; 4] = [
        Effect::PanZoom,
        Effect::Parallax,
        Effect::MotionBlur,
        Effect::CharacterAnimate,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "parallax" => Effect::Parallax,
            "motion-blur" => Effect::MotionBlur,
            "character-animate" => Effect::CharacterAnimate,
            _ => Effect::PanZoom,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::PanZoom => "pan-zoom",
            Effect::Parallax => "parallax",
            Effect::MotionBlur => "motion-blur",
            Effect::CharacterAnimate => "character-animate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Effect::PanZoom => "Pan & Zoom",
            Effect::Parallax => "Parallax Layers",
            Effect::MotionBlur => "Motion Blur",
            Effect::CharacterAnimate => "Character Animation",
        }
    }
}

impl From<String> for Effect {
    fn from(name: String) -> Self {
        Effect::from_name(&name)
    }
}

impl From<Effect> for String {
    fn from(effect: Effect) -> Self {
        effect.name().to_string()
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_frame_count")]
    pub frame_count: u32,
    pub motion_intensity: f64,
    pub effect: Effect,
}

/// 接受任何 JSON 數字：負數視為 0，小數無條件進位(與 `i < frameCount` 迴圈的張數一致)，
/// 之後再由 `Settings::normalized` 夾回範圍
fn deserialize_frame_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.ceil().max(0.0) as u32)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            motion_intensity: DEFAULT_MOTION_INTENSITY,
            effect: Effect::default(),
        }
    }
}

impl Settings {
    /// 把數值夾回允許範圍內
    pub fn normalized(&self) -> Self {
        Self {
            frame_count: self
                .frame_count
                .clamp(*FRAME_COUNT_RANGE.start(), *FRAME_COUNT_RANGE.end()),
            motion_intensity: self.motion_intensity.clamp(
                *MOTION_INTENSITY_RANGE.start(),
                *MOTION_INTENSITY_RANGE.end(),
            ),
            effect: self.effect,
        }
    }

    pub fn is_within_range(&self) -> bool {
        FRAME_COUNT_RANGE.contains(&self.frame_count)
            && MOTION_INTENSITY_RANGE.contains(&self.motion_intensity)
    }
}

/// 單一影格的 CSS 變換參數，欄位是否存在取決於效果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
}

impl Transform {
    /// CSS `transform` 屬性值
    pub fn css(&self) -> String {
        let mut css = format!(
            "scale({}) translate({}px, {}px)",
            self.scale,
            self.translate_x,
            self.translate_y.unwrap_or(0.0)
        );
        if let Some(rotate) = self.rotate {
            css.push_str(&format!(" rotate({}deg)", rotate));
        }
        css
    }

    /// CSS `filter` 屬性值，沒有模糊時為 None
    pub fn css_filter(&self) -> Option<String> {
        self.blur.map(|blur| format!("blur({}px)", blur))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
    pub source_image_reference: String,
    pub progress: f64,
    pub transform: Transform,
}

/// `encodeURIComponent` 不編碼的字元：英數與 `-_.!~*'()`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 依 JavaScript `Number#toString` 的規則輸出數字：`1` 而非 `1.0`，`-0` 輸出 `0`，
/// 絕對值小於 1e-6 或不小於 1e21 時用指數表示
fn js_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl Transform {
    /// 與 `JSON.stringify` 相同的輸出(欄位順序與數字格式)
    fn to_js_json(&self) -> String {
        let mut fields = vec![
            ("scale", self.scale),
            ("translateX", self.translate_x),
        ];
        fields.extend(self.translate_y.map(|v| ("translateY", v)));
        fields.extend(self.rotate.map(|v| ("rotate", v)));
        fields.extend(self.blur.map(|v| ("blur", v)));

        let body: Vec<String> = fields
            .iter()
            .map(|(name, value)| format!("\"{}\":{}", name, js_number(*value)))
            .collect();
        format!("{{{}}}", body.join(","))
    }
}

impl FrameDescriptor {
    /// 舊版前端使用的字串格式：`<image>#frame=<progress>&transform=<encoded json>`，
    /// 與原前端逐字元相同
    pub fn fragment_url(&self) -> String {
        let transform_json = self.transform.to_js_json();
        format!(
            "{}#frame={}&transform={}",
            self.source_image_reference,
            js_number(self.progress),
            utf8_percent_encode(&transform_json, URI_COMPONENT)
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub image: Option<String>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub frames: Vec<FrameDescriptor>,
    pub frame_count: usize,
    pub settings: Settings,
}

/// 下載用的 JSON 文件，frames 原樣保留不做格式檢查
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub r#type: String,
    pub frame_count: usize,
    pub frames: Vec<serde_json::Value>,
    pub format: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectInfo {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeInfo<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectCatalog {
    pub effects: Vec<EffectInfo>,
    pub frame_count: RangeInfo<u32>,
    pub motion_intensity: RangeInfo<f64>,
}

impl EffectCatalog {
    pub fn current() -> Self {
        Self {
            effects: Effect::ALL
                .iter()
                .map(|effect| EffectInfo {
                    name: effect.name(),
                    label: effect.label(),
                })
                .collect(),
            frame_count: RangeInfo {
                min: *FRAME_COUNT_RANGE.start(),
                max: *FRAME_COUNT_RANGE.end(),
                default: DEFAULT_FRAME_COUNT,
            },
            motion_intensity: RangeInfo {
                min: *MOTION_INTENSITY_RANGE.start(),
                max: *MOTION_INTENSITY_RANGE.end(),
                default: DEFAULT_MOTION_INTENSITY,
            },
        }
    }
}
