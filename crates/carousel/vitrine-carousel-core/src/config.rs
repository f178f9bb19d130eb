//! Engine configuration: timings, thresholds, selectors and class names.
//!
//! Every field has a default matching the stock page markup, so hosts only
//! pass the values they want to change (`{"autoplay_interval_ms": 4000}`).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration shared by every instance a registry binds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Period of the autoplay timer.
    pub autoplay_interval_ms: u32,
    /// Delay before autoplay re-arms after manual navigation (multi mode).
    pub resume_grace_ms: u32,
    /// Minimum horizontal drag distance recognised as a swipe.
    pub swipe_threshold: f32,
    /// Input coordinates are clamped into `[-limit, limit]`.
    pub coordinate_limit: f32,
    /// Seed for shuffle randomness. Hosts without a seed get a fixed default.
    pub shuffle_seed: Option<u64>,
    pub single: SingleConfig,
    pub multi: MultiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 5000,
            resume_grace_ms: 3000,
            swipe_threshold: 50.0,
            coordinate_limit: 100_000.0,
            shuffle_seed: None,
            single: SingleConfig::default(),
            multi: MultiConfig::default(),
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay_interval_ms == 0 {
            return Err(ConfigError::invalid("autoplay_interval_ms must be > 0"));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "swipe_threshold must be a finite, non-negative number",
            ));
        }
        if !self.coordinate_limit.is_finite() || self.coordinate_limit <= 0.0 {
            return Err(ConfigError::invalid("coordinate_limit must be > 0"));
        }
        if !self.multi.fallback_gap.is_finite() || self.multi.fallback_gap < 0.0 {
            return Err(ConfigError::invalid("multi.fallback_gap must be >= 0"));
        }
        Ok(())
    }
}

/// One curated slide of the full-bleed carousel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub image: String,
    pub title: String,
}

/// Full-bleed (one slide per viewport) carousel settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleConfig {
    pub transition_ms: u32,
    pub progress_ms: u32,
    pub easing: String,
    /// Curated slides. Empty means "count the track's children".
    pub slides: Vec<SlideSpec>,
    pub start_playing: bool,
    pub fullscreen_key: char,
    pub selectors: SingleSelectors,
    pub play_label: String,
    pub pause_label: String,
    pub active_class: String,
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            transition_ms: 800,
            progress_ms: 400,
            easing: "power2.out".into(),
            slides: Vec::new(),
            start_playing: true,
            fullscreen_key: 'f',
            selectors: SingleSelectors::default(),
            play_label: "▶️".into(),
            pause_label: "⏸️".into(),
            active_class: "active".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleSelectors {
    pub root: String,
    pub track: String,
    pub thumbnail_nav: String,
    pub counter: String,
    pub total: String,
    pub progress: String,
    pub play_pause: String,
    pub shuffle: String,
    pub fullscreen: String,
    pub prev: String,
    pub next: String,
    pub loading: String,
}

impl Default for SingleSelectors {
    fn default() -> Self {
        Self {
            root: "#imageCarousel".into(),
            track: "#carouselTrack".into(),
            thumbnail_nav: "#thumbnailNav".into(),
            counter: "#currentIndex".into(),
            total: "#totalImages".into(),
            progress: "#progressBar".into(),
            play_pause: "#playPauseBtn".into(),
            shuffle: "#shuffleBtn".into(),
            fullscreen: "#fullscreenBtn".into(),
            prev: "#prevBtn".into(),
            next: "#nextBtn".into(),
            loading: "#carouselLoading".into(),
        }
    }
}

/// Paginated (several cards per viewport) carousel settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiConfig {
    pub transition_ms: u32,
    pub card_fade_ms: u32,
    pub easing: String,
    /// Gap used when the track cannot report one.
    pub fallback_gap: f32,
    pub active_scale: f32,
    pub inactive_scale: f32,
    pub active_opacity: f32,
    pub inactive_opacity: f32,
    pub start_playing: bool,
    pub dot_class: String,
    pub dot_active_classes: Vec<String>,
    pub dot_inactive_classes: Vec<String>,
    pub selectors: MultiSelectors,
}

impl Default for MultiConfig {
    fn default() -> Self {
        Self {
            transition_ms: 700,
            card_fade_ms: 400,
            easing: "power2.out".into(),
            fallback_gap: 32.0,
            active_scale: 1.0,
            inactive_scale: 0.97,
            active_opacity: 1.0,
            inactive_opacity: 0.9,
            start_playing: true,
            dot_class: "dot".into(),
            dot_active_classes: vec!["bg-blue-500".into(), "animate-glow".into()],
            dot_inactive_classes: vec!["bg-slate-300".into()],
            selectors: MultiSelectors::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSelectors {
    /// Pagination container; its presence marks a candidate section.
    pub dots: String,
    pub section: String,
    pub container: String,
    /// Clipping box inside the container whose width is the viewport.
    pub viewport: String,
    pub track: String,
    pub card: String,
    pub prev: String,
    pub next: String,
}

impl Default for MultiSelectors {
    fn default() -> Self {
        Self {
            dots: "#dotsContainer".into(),
            section: "section".into(),
            container: ".carousel-container".into(),
            viewport: ".overflow-hidden".into(),
            track: "#carouselTrack".into(),
            card: ".property-card".into(),
            prev: "#prevBtn".into(),
            next: "#nextBtn".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{"autoplay_interval_ms": 4000, "multi": {"fallback_gap": 16}}"#)
            .unwrap();
        assert_eq!(cfg.autoplay_interval_ms, 4000);
        assert_eq!(cfg.resume_grace_ms, 3000);
        assert_eq!(cfg.multi.fallback_gap, 16.0);
        assert_eq!(cfg.multi.selectors.dots, "#dotsContainer");
        assert_eq!(cfg.single.fullscreen_key, 'f');
    }

    #[test]
    fn zero_interval_rejected() {
        let err = Config::from_json(r#"{"autoplay_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn curated_slides_parse() {
        let cfg = Config::from_json(
            r#"{"single": {"slides": [{"image": "a.jpg", "title": "Salon"}]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.single.slides.len(), 1);
        assert_eq!(cfg.single.slides[0].title, "Salon");
        assert_eq!(cfg.single.transition_ms, 800);
    }
}
