//! Player configuration supplied by the host.

use crate::error::{PlayerError, PlayerResult};

/// Default number of frames in a set.
pub const DEFAULT_FRAME_COUNT: usize = 161;

/// Default playback rate in frames per second.
pub const DEFAULT_FPS: u32 = 24;

/// Default overlay style directive.
pub const DEFAULT_OVERLAY_STYLE: &str =
    "radial-gradient(circle at center, rgba(143,145,3,1) 0%, rgba(64,64,64,1) 85%)";

/// Cosmetic layer the host may composite over frame content.
///
/// The style string is passed through verbatim; the player never interprets it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayStyle {
    pub style: String,
    pub blend_mode: &'static str,
}

impl OverlayStyle {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            blend_mode: "color-dodge",
        }
    }
}

/// Immutable configuration for one player instance.
///
/// All fields except `source` have defaults, so a TOML file only needs to
/// name what it changes:
///
/// ```toml
/// source = "monochrome"
/// fps = 48
/// overlay = true
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    /// Logical location of the frame set (e.g. "colored")
    pub source: String,
    /// Number of frames N
    pub frame_count: usize,
    /// Playback rate
    pub fps: u32,
    /// Whether the overlay is composited over frames
    pub overlay: bool,
    pub overlay_style: String,
    pub show_controls: bool,
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            frame_count: DEFAULT_FRAME_COUNT,
            fps: DEFAULT_FPS,
            overlay: false,
            overlay_style: DEFAULT_OVERLAY_STYLE.to_string(),
            show_controls: true,
            autoplay: true,
        }
    }
}

impl PlayerConfig {
    /// Create a config for the given source with default settings.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Enable the overlay with the given style directive.
    pub fn with_overlay(mut self, style: impl Into<String>) -> Self {
        self.overlay = true;
        self.overlay_style = style.into();
        self
    }

    pub fn with_controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Parse a TOML document into a `PlayerConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> PlayerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PlayerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the player relies on.
    pub fn validate(&self) -> PlayerResult<()> {
        if self.frame_count == 0 {
            return Err(PlayerError::config("frame_count must be at least 1"));
        }
        if self.fps == 0 {
            return Err(PlayerError::config("fps must be at least 1"));
        }
        Ok(())
    }

    /// The overlay descriptor, if the overlay is enabled.
    pub fn overlay_style(&self) -> Option<OverlayStyle> {
        self.overlay
            .then(|| OverlayStyle::new(self.overlay_style.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_surface() {
        let config = PlayerConfig::new("colored");
        assert_eq!(config.source, "colored");
        assert_eq!(config.frame_count, 161);
        assert_eq!(config.fps, 24);
        assert!(config.show_controls);
        assert!(config.autoplay);
        assert!(config.overlay_style().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overlay_style_is_verbatim() {
        let style = "radial-gradient(circle at center, rgba(100,200,255,0.8) 0%, rgba(50,50,150,0.5) 85%)";
        let config = PlayerConfig::new("monochrome").with_overlay(style);
        let overlay = config.overlay_style().unwrap();
        assert_eq!(overlay.style, style);
        assert_eq!(overlay.blend_mode, "color-dodge");
    }

    #[test]
    fn rejects_zero_frames_and_fps() {
        let err = PlayerConfig::new("x").with_frame_count(0).validate();
        assert!(matches!(err, Err(PlayerError::Config(_))));

        let err = PlayerConfig::new("x").with_fps(0).validate();
        assert!(matches!(err, Err(PlayerError::Config(_))));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn partial_toml_uses_defaults() {
        let config = PlayerConfig::from_toml_str(
            r#"
            source = "monochrome"
            fps = 48
            overlay = true
            "#,
        )
        .unwrap();
        assert_eq!(config.source, "monochrome");
        assert_eq!(config.fps, 48);
        assert_eq!(config.frame_count, DEFAULT_FRAME_COUNT);
        assert_eq!(config.overlay_style().unwrap().style, DEFAULT_OVERLAY_STYLE);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn invalid_toml_is_config_error() {
        let err = PlayerConfig::from_toml_str("frame_count = 0").unwrap_err();
        assert!(matches!(err, PlayerError::Config(_)));
    }
}
