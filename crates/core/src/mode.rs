use serde::{Deserialize, Serialize};

/// How source aspect ratio and target dimensions are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Fill the target, center-cropping overflow.
    #[default]
    Crop,
    /// Letterbox with a fill color to reach the exact target.
    Pad,
    /// Pad only if the source is smaller than the target; never upsizes.
    BoxPad,
    /// Scale down to fit within the target, preserving aspect; never upsizes.
    Max,
    /// Scale so the result is at least as large as the target, preserving
    /// aspect.
    Min,
    /// Non-aspect-preserving scale to the exact target.
    Stretch,
}

impl ResizeMode {
    /// Map a free-text mode token. Case-insensitive and total: unknown or
    /// empty tokens map to [`ResizeMode::Crop`].
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "pad" => Self::Pad,
            "boxpad" => Self::BoxPad,
            "max" => Self::Max,
            "min" => Self::Min,
            "stretch" => Self::Stretch,
            _ => Self::Crop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens_map_to_their_modes() {
        assert_eq!(ResizeMode::from_token("pad"), ResizeMode::Pad);
        assert_eq!(ResizeMode::from_token("boxpad"), ResizeMode::BoxPad);
        assert_eq!(ResizeMode::from_token("max"), ResizeMode::Max);
        assert_eq!(ResizeMode::from_token("min"), ResizeMode::Min);
        assert_eq!(ResizeMode::from_token("stretch"), ResizeMode::Stretch);
        assert_eq!(ResizeMode::from_token("crop"), ResizeMode::Crop);
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(ResizeMode::from_token("BoxPad"), ResizeMode::BoxPad);
        assert_eq!(ResizeMode::from_token("STRETCH"), ResizeMode::Stretch);
    }

    #[test]
    fn unknown_and_empty_tokens_default_to_crop() {
        assert_eq!(ResizeMode::from_token(""), ResizeMode::Crop);
        assert_eq!(ResizeMode::from_token("  "), ResizeMode::Crop);
        assert_eq!(ResizeMode::from_token("fisheye"), ResizeMode::Crop);
    }
}
