//! Host-side option handling that does not touch the DOM.

use serde::de::DeserializeOwned;
use studio_fx_core::render::ContextAttributes;

/// Element id the plasma mounts into.
pub const PLASMA_CONTAINER_ID: &str = "aboutAurora";
/// Ancestor whose pointer moves drive the plasma, when present.
pub const PLASMA_POINTER_SELECTOR: &str = ".about__card";
pub const PLASMA_CONTAINER_CLASS: &str = "plasma-container";
pub const PLASMA_FALLBACK_CLASS: &str = "aurora--fallback";

/// Elements that each receive a silk fill.
pub const SILK_BUTTON_SELECTOR: &str = ".btn--primary";
pub const SILK_WRAPPER_CLASS: &str = "silk-canvas-container";

/// Inline style for a canvas that fills its positioned container.
pub const FILL_STYLE: &[(&str, &str)] = &[
    ("display", "block"),
    ("width", "100%"),
    ("height", "100%"),
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
];

/// Parses an optional JSON config; missing input or missing fields take
/// the defaults.
pub fn parse_config<T: DeserializeOwned + Default>(
    json: Option<&str>,
) -> Result<T, serde_json::Error> {
    match json.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Str(&'static str),
}

/// Context attributes keyed by their WebGL dictionary names.
pub fn attribute_entries(attrs: &ContextAttributes) -> [(&'static str, AttrValue); 6] {
    [
        ("alpha", AttrValue::Bool(attrs.alpha)),
        ("antialias", AttrValue::Bool(attrs.antialias)),
        ("premultipliedAlpha", AttrValue::Bool(attrs.premultiplied_alpha)),
        ("preserveDrawingBuffer", AttrValue::Bool(attrs.preserve_drawing_buffer)),
        (
            "failIfMajorPerformanceCaveat",
            AttrValue::Bool(attrs.fail_if_major_performance_caveat),
        ),
        ("powerPreference", AttrValue::Str(attrs.power_preference)),
    ]
}

/// Size worth applying from a bounding rectangle.
pub fn usable_size(width: f64, height: f64) -> Option<(f64, f64)> {
    (width > 0.0 && height > 0.0).then_some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_fx_core::{Direction, PlasmaConfig, SilkConfig};

    #[test]
    fn missing_config_is_default() {
        let cfg: PlasmaConfig = parse_config(None).unwrap();
        assert_eq!(cfg, PlasmaConfig::default());
        let cfg: SilkConfig = parse_config(Some("  ")).unwrap();
        assert_eq!(cfg, SilkConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg: PlasmaConfig =
            parse_config(Some(r#"{"direction":"reverse","opacity":0.5}"#)).unwrap();
        assert_eq!(cfg.direction, Direction::Reverse);
        assert_eq!(cfg.opacity, 0.5);
        assert_eq!(cfg.scale, 1.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse_config::<PlasmaConfig>(Some("{speed:")).is_err());
    }

    #[test]
    fn attribute_names_match_webgl_dictionary() {
        let entries = attribute_entries(&ContextAttributes::default());
        let names: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            [
                "alpha",
                "antialias",
                "premultipliedAlpha",
                "preserveDrawingBuffer",
                "failIfMajorPerformanceCaveat",
                "powerPreference",
            ]
        );
        assert_eq!(entries[0].1, AttrValue::Bool(false));
        assert_eq!(entries[1].1, AttrValue::Bool(true));
        assert_eq!(entries[5].1, AttrValue::Str("default"));
    }

    #[test]
    fn usable_size_requires_both_sides() {
        assert_eq!(usable_size(10.0, 5.0), Some((10.0, 5.0)));
        assert_eq!(usable_size(0.0, 5.0), None);
        assert_eq!(usable_size(10.0, -1.0), None);
    }
}
