//! Animated silk fill for primary buttons.
//!
//! Runs on either tier; the fragment shader sticks to constructs the
//! legacy downgrade covers.

use serde::{Deserialize, Serialize};

use super::{Effect, FrameClock};
use crate::color;
use crate::render::{RendererOptions, TierPreference, Uniforms, FULLSCREEN_VERTEX_SHADER};

pub const NAME: &str = "silk";

pub const VERTEX_SHADER: &str = FULLSCREEN_VERTEX_SHADER;

pub const FRAGMENT_SHADER: &str = "#version 300 es
precision highp float;
in vec2 vUv;
out vec4 fragColor;

uniform float uTime;
uniform vec3  uColor;
uniform float uSpeed;
uniform float uScale;
uniform float uRotation;
uniform float uNoiseIntensity;

const float e = 2.71828182845904523536;

float noise(vec2 texCoord) {
  float G = e;
  vec2  r = (G * sin(G * texCoord));
  return fract(r.x * r.y * (1.0 + texCoord.x));
}

vec2 rotateUvs(vec2 uv, float angle) {
  float c = cos(angle);
  float s = sin(angle);
  mat2  rot = mat2(c, -s, s, c);
  return rot * uv;
}

void main() {
  float rnd        = noise(gl_FragCoord.xy);
  vec2  uv         = rotateUvs(vUv * uScale, uRotation);
  vec2  tex        = uv * uScale;
  float tOffset    = uSpeed * uTime;

  tex.y += 0.03 * sin(8.0 * tex.x - tOffset);

  float pattern = 0.6 +
                  0.4 * sin(5.0 * (tex.x + tex.y +
                                   cos(3.0 * tex.x + 5.0 * tex.y) +
                                   0.02 * tOffset) +
                           sin(20.0 * (tex.x + tex.y - 0.1 * tOffset)));

  vec3 col = uColor * pattern - rnd / 15.0 * uNoiseIntensity;
  fragColor = vec4(col, 1.0);
}
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SilkConfig {
    pub color: String,
    pub speed: f32,
    pub scale: f32,
    pub rotation: f32,
    pub noise_intensity: f32,
}

impl Default for SilkConfig {
    fn default() -> Self {
        Self {
            color: "#7B7481".to_owned(),
            speed: 0.5,
            scale: 1.0,
            rotation: 0.0,
            noise_intensity: 1.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Silk {
    config: SilkConfig,
}

impl Silk {
    pub fn new(config: SilkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SilkConfig {
        &self.config
    }
}

impl Effect for Silk {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vertex_source(&self) -> &'static str {
        VERTEX_SHADER
    }

    fn fragment_source(&self) -> &'static str {
        FRAGMENT_SHADER
    }

    fn renderer_options(&self) -> RendererOptions {
        RendererOptions {
            tier: TierPreference::Any,
            alpha: true,
            antialias: true,
            dpr_cap: 1.0,
        }
    }

    fn initial_uniforms(&self) -> Uniforms {
        let c = &self.config;
        Uniforms::new()
            .with("uTime", 0.0_f32)
            .with("uColor", color::hex_to_rgb_or_fallback(&c.color))
            .with("uSpeed", c.speed)
            .with("uScale", c.scale)
            .with("uRotation", c.rotation)
            .with("uNoiseIntensity", c.noise_intensity)
    }

    /// Silk is driven by the absolute scheduler timestamp, not by elapsed time.
    fn on_frame(&mut self, clock: FrameClock, uniforms: &mut Uniforms) {
        uniforms.set("uTime", (clock.timestamp_ms * 0.001) as f32);
    }

    /// A collapsed button keeps the fill it had.
    fn keeps_size_when_collapsed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{downgrade_source, ShaderStage, UniformValue};
    use glam::Vec3;

    #[test]
    fn default_uniforms() {
        let u = Silk::default().initial_uniforms();
        assert_eq!(u.len(), 6);
        assert_eq!(u.scalar("uSpeed"), Some(0.5));
        assert_eq!(u.scalar("uScale"), Some(1.0));
        assert_eq!(u.scalar("uRotation"), Some(0.0));
        assert_eq!(u.scalar("uNoiseIntensity"), Some(1.5));
        let expected = Vec3::new(123.0, 116.0, 129.0) / 255.0;
        let Some(UniformValue::Vec3(c)) = u.get("uColor") else {
            panic!("uColor should be a vec3");
        };
        assert!((c - expected).abs().max_element() < 1e-6, "{c}");
    }

    #[test]
    fn time_follows_absolute_timestamp() {
        let mut silk = Silk::default();
        let mut u = silk.initial_uniforms();
        silk.on_frame(
            FrameClock {
                timestamp_ms: 4000.0,
                elapsed_secs: 0.25,
            },
            &mut u,
        );
        assert_eq!(u.scalar("uTime"), Some(4.0));
    }

    #[test]
    fn accepts_any_tier_at_unit_dpr() {
        let opts = Silk::default().renderer_options();
        assert_eq!(opts.tier, TierPreference::Any);
        assert_eq!(opts.dpr_cap, 1.0);
        assert!(opts.alpha);
    }

    #[test]
    fn malformed_color_uses_fallback() {
        let silk = Silk::new(SilkConfig {
            color: "nope".to_owned(),
            ..SilkConfig::default()
        });
        assert_eq!(
            silk.initial_uniforms().get("uColor"),
            Some(UniformValue::Vec3(color::FALLBACK_RGB))
        );
    }

    #[test]
    fn fragment_shader_downgrades_cleanly() {
        let legacy = downgrade_source(ShaderStage::Fragment, FRAGMENT_SHADER);
        assert!(legacy.starts_with("#version 100\n"));
        assert!(legacy.contains("varying vec2 vUv;"));
        assert!(legacy.contains("gl_FragColor = vec4(col, 1.0);"));
        assert!(!legacy.contains("out vec4"));
    }

    #[test]
    fn config_parses_camel_case() {
        let cfg: SilkConfig = serde_json::from_str(r#"{"noiseIntensity":0.5}"#).unwrap();
        assert_eq!(cfg.noise_intensity, 0.5);
        assert_eq!(cfg.color, "#7B7481");
    }
}
