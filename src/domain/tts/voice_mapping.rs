use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

use super::model::{Gender, Tone, VoiceParameters, VoiceTag};

pub const BASE_PITCH: i64 = 50;
pub const BASE_SPEED: i64 = 170;
pub const BASE_AMPLITUDE: u16 = 100;

pub const MIN_PITCH: i64 = 0;
pub const MAX_PITCH: i64 = 99;
pub const MIN_SPEED: i64 = 80;
pub const MAX_SPEED: i64 = 400;

/// Accent used when the requested one has no synthesizer voice
pub const FALLBACK_ACCENT: &str = "en-us";

/// Encoder VBR quality flag
pub const ENCODER_QUALITY: &str = "-V2";

/// Supported accent tags and the synthesizer accent each one maps to
pub const ACCENTS: [(&str, &str); 12] = [
    ("en-us", "en-us"),
    ("en-gb", "en-gb"),
    ("en-au", "en-au"),
    ("en-in", "en-in"),
    ("en-ng", "en-ng"),
    ("en-za", "en-za"),
    ("en-ca", "en-us"),
    ("en-ie", "en-ie"),
    ("en-ph", "en-us"),
    ("en-nz", "en-nz"),
    ("en-tt", "en-us"),
    ("en-ck", "en-us"),
];

static ACCENT_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ACCENTS.iter().copied().collect());

/// Accent tags callers may request
pub fn supported_accents() -> Vec<&'static str> {
    ACCENTS.iter().map(|(accent, _)| *accent).collect()
}

/// Round half up, matching the rounding the tone table was tuned with
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Derive pitch/speed/amplitude for a tone at a given intensity.
///
/// Never fails: any intensity (negative, huge, NaN) ends up inside the
/// synthesizer's accepted ranges thanks to the final clamps.
pub fn resolve_voice_parameters(tone: Tone, intensity: f64) -> VoiceParameters {
    let curve = tone.curve();

    let pitch_offset = round_half_up(curve.pitch_base + curve.pitch_per_intensity * intensity);
    let speed_offset = round_half_up(curve.speed_base + curve.speed_per_intensity * intensity);

    let pitch = BASE_PITCH.saturating_add(pitch_offset).clamp(MIN_PITCH, MAX_PITCH);
    let speed = BASE_SPEED.saturating_add(speed_offset).clamp(MIN_SPEED, MAX_SPEED);

    VoiceParameters {
        pitch: pitch as u8,
        speed: speed as u16,
        amplitude: BASE_AMPLITUDE,
    }
}

/// Pick the synthesizer voice for a gender and accent; unknown accents fall back to en-us
pub fn resolve_voice_tag(gender: Gender, accent: &str) -> VoiceTag {
    let key = accent.trim().to_ascii_lowercase();
    let accent = ACCENT_MAP
        .get(key.as_str())
        .copied()
        .unwrap_or(FALLBACK_ACCENT);

    VoiceTag { accent, gender }
}

/// Synthesizer arguments: `-w <out> -v <voice> -s <speed> -p <pitch> -a <amplitude> <text>`
pub fn synthesizer_args(
    output: &Path,
    voice_tag: &VoiceTag,
    parameters: &VoiceParameters,
    text: &str,
) -> Vec<OsString> {
    vec![
        "-w".into(),
        output.as_os_str().to_os_string(),
        "-v".into(),
        voice_tag.to_string().into(),
        "-s".into(),
        parameters.speed.to_string().into(),
        "-p".into(),
        parameters.pitch.to_string().into(),
        "-a".into(),
        parameters.amplitude.to_string().into(),
        text.into(),
    ]
}

/// Encoder arguments: `-V2 <in> <out>`
pub fn encoder_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        ENCODER_QUALITY.into(),
        input.as_os_str().to_os_string(),
        output.as_os_str().to_os_string(),
    ]
}
