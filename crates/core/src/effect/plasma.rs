//! Raymarched plasma background.
//!
//! Needs the high tier: the fragment shader uses `tanh`, `isnan`/`isinf`
//! and a vec2 loop header, none of which survive the legacy downgrade.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Effect, FrameClock};
use crate::color;
use crate::ping_pong::{Direction, PingPong};
use crate::render::{RendererOptions, TierPreference, Uniforms, FULLSCREEN_VERTEX_SHADER};

pub const NAME: &str = "plasma";

/// Speed is scaled by this before upload.
pub const SPEED_FACTOR: f32 = 0.4;

pub const VERTEX_SHADER: &str = FULLSCREEN_VERTEX_SHADER;

pub const FRAGMENT_SHADER: &str = "#version 300 es
precision highp float;
uniform vec2 iResolution;
uniform float iTime;
uniform vec3 uCustomColor;
uniform float uUseCustomColor;
uniform float uSpeed;
uniform float uDirection;
uniform float uScale;
uniform float uOpacity;
uniform vec2 uMouse;
uniform float uMouseInteractive;
out vec4 fragColor;

void mainImage(out vec4 o, vec2 C) {
  vec2 center = iResolution.xy * 0.5;
  C = (C - center) / uScale + center;

  vec2 mouseOffset = (uMouse - center) * 0.0002;
  C += mouseOffset * length(C - center) * step(0.5, uMouseInteractive);

  float i = 0.0;
  float d = 1.0;
  float z = 0.0;
  float T = iTime * uSpeed * uDirection;
  vec3 O = vec3(0.0);
  vec3 p = vec3(0.0);
  vec3 S = vec3(0.0);

  for (vec2 r = iResolution.xy, Q; ++i < 60.; ) {
    p = z*normalize(vec3(C-.5*r,r.y));
    p.z -= 4.;
    S = p;
    d = p.y-T;

    p.x += .4*(1.+p.y)*sin(d + p.x*0.1)*cos(.34*d + p.x*0.05);
    Q = p.xz *= mat2(cos(p.y+vec4(0,11,33,0)-T));
    z+= d = abs(sqrt(length(Q*Q)) - .25*(5.+S.y))/3.+8e-4;
    o = 1.+sin(S.y+p.z*.5+S.z-length(S-p)+vec4(2,1,0,8));
    float safeD = (d >= 0.0 ? 1.0 : -1.0) * max(abs(d), 1e-4);
    O += o.w / safeD * o.xyz;
  }

  o.xyz = tanh(O/1e4);
}

bool finite1(float x){ return !(isnan(x) || isinf(x)); }
vec3 sanitize(vec3 c){
  return vec3(
    finite1(c.r) ? c.r : 0.0,
    finite1(c.g) ? c.g : 0.0,
    finite1(c.b) ? c.b : 0.0
  );
}

void main() {
  vec4 o = vec4(0.0);
  mainImage(o, gl_FragCoord.xy);
  vec3 rgb = sanitize(o.rgb);

  float intensity = (rgb.r + rgb.g + rgb.b) / 3.0;
  vec3 customColor = intensity * uCustomColor;
  vec3 finalColor = mix(rgb, customColor, step(0.5, uUseCustomColor));

  float alpha = length(rgb) * uOpacity;
  fragColor = vec4(finalColor, alpha);
}
";

/// User-facing plasma settings, as accepted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlasmaConfig {
    /// Tint as `#rrggbb`; `None` keeps the shader's own colors.
    pub color: Option<String>,
    pub speed: f32,
    pub direction: Direction,
    pub scale: f32,
    pub opacity: f32,
    pub mouse_interactive: bool,
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            color: Some("#b19eef".to_owned()),
            speed: 1.0,
            direction: Direction::Forward,
            scale: 1.0,
            opacity: 1.0,
            mouse_interactive: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plasma {
    config: PlasmaConfig,
    ping_pong: PingPong,
}

impl Plasma {
    pub fn new(config: PlasmaConfig) -> Self {
        Self {
            config,
            ping_pong: PingPong::default(),
        }
    }

    pub fn config(&self) -> &PlasmaConfig {
        &self.config
    }

    /// Tint uploaded as `uCustomColor`, white when no color is set.
    fn custom_color(&self) -> Vec3 {
        self.config
            .color
            .as_deref()
            .map_or(Vec3::ONE, color::hex_to_rgb_or_fallback)
    }
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

impl Effect for Plasma {
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
            tier: TierPreference::RequireHigh,
            alpha: true,
            antialias: false,
            dpr_cap: 2.0,
        }
    }

    fn initial_uniforms(&self) -> Uniforms {
        let c = &self.config;
        Uniforms::new()
            .with("iTime", 0.0_f32)
            .with("iResolution", Vec2::ONE)
            .with("uCustomColor", self.custom_color())
            .with("uUseCustomColor", flag(c.color.is_some()))
            .with("uSpeed", c.speed * SPEED_FACTOR)
            .with("uDirection", c.direction.multiplier())
            .with("uScale", c.scale)
            .with("uOpacity", c.opacity)
            .with("uMouse", Vec2::ZERO)
            .with("uMouseInteractive", flag(c.mouse_interactive))
    }

    fn pointer_interactive(&self) -> bool {
        self.config.mouse_interactive
    }

    fn on_frame(&mut self, clock: FrameClock, uniforms: &mut Uniforms) {
        let time = match self.config.direction {
            Direction::PingPong => {
                uniforms.set("uDirection", 1.0_f32);
                self.ping_pong.map(clock.elapsed_secs)
            }
            Direction::Forward | Direction::Reverse => clock.elapsed_secs,
        };
        uniforms.set("iTime", time as f32);
    }

    fn on_resize(&mut self, backing_size: (u32, u32), uniforms: &mut Uniforms) {
        let (w, h) = backing_size;
        uniforms.set("iResolution", Vec2::new(w as f32, h as f32));
    }

    fn on_pointer_move(&mut self, x: f32, y: f32, uniforms: &mut Uniforms) {
        if self.config.mouse_interactive {
            uniforms.set("uMouse", Vec2::new(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::UniformValue;

    fn clock(elapsed_secs: f64) -> FrameClock {
        FrameClock {
            timestamp_ms: elapsed_secs * 1000.0,
            elapsed_secs,
        }
    }

    #[test]
    fn default_uniforms() {
        let u = Plasma::default().initial_uniforms();
        assert_eq!(u.len(), 10);
        assert_eq!(u.scalar("iTime"), Some(0.0));
        assert_eq!(u.get("iResolution"), Some(UniformValue::Vec2(Vec2::ONE)));
        assert_eq!(u.scalar("uUseCustomColor"), Some(1.0));
        assert!((u.scalar("uSpeed").unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(u.scalar("uDirection"), Some(1.0));
        assert_eq!(u.get("uMouse"), Some(UniformValue::Vec2(Vec2::ZERO)));
        assert_eq!(u.scalar("uMouseInteractive"), Some(1.0));

        let Some(UniformValue::Vec3(tint)) = u.get("uCustomColor") else {
            panic!("uCustomColor should be a vec3");
        };
        let expected = Vec3::new(177.0, 158.0, 239.0) / 255.0;
        assert!((tint - expected).abs().max_element() < 1e-6, "{tint}");
    }

    #[test]
    fn no_color_disables_tint() {
        let p = Plasma::new(PlasmaConfig {
            color: None,
            ..PlasmaConfig::default()
        });
        let u = p.initial_uniforms();
        assert_eq!(u.scalar("uUseCustomColor"), Some(0.0));
        assert_eq!(u.get("uCustomColor"), Some(UniformValue::Vec3(Vec3::ONE)));
    }

    #[test]
    fn reverse_uploads_negative_direction() {
        let p = Plasma::new(PlasmaConfig {
            direction: Direction::Reverse,
            ..PlasmaConfig::default()
        });
        assert_eq!(p.initial_uniforms().scalar("uDirection"), Some(-1.0));
    }

    #[test]
    fn forward_time_is_elapsed_seconds() {
        let mut p = Plasma::default();
        let mut u = p.initial_uniforms();
        p.on_frame(clock(2.5), &mut u);
        assert_eq!(u.scalar("iTime"), Some(2.5));
    }

    #[test]
    fn ping_pong_eases_and_forces_positive_direction() {
        let mut p = Plasma::new(PlasmaConfig {
            direction: Direction::PingPong,
            ..PlasmaConfig::default()
        });
        let mut u = p.initial_uniforms();
        u.set("uDirection", -1.0_f32);

        p.on_frame(clock(5.0), &mut u);
        assert_eq!(u.scalar("uDirection"), Some(1.0));
        assert!((u.scalar("iTime").unwrap() - 5.0).abs() < 1e-5);

        p.on_frame(clock(12.0), &mut u);
        let back = u.scalar("iTime").unwrap();
        assert!(back < 10.0 && back > 5.0, "got {back}");
    }

    #[test]
    fn resize_sets_resolution_to_backing_size() {
        let mut p = Plasma::default();
        let mut u = p.initial_uniforms();
        p.on_resize((1600, 900), &mut u);
        assert_eq!(
            u.get("iResolution"),
            Some(UniformValue::Vec2(Vec2::new(1600.0, 900.0)))
        );
    }

    #[test]
    fn pointer_updates_mouse_only_when_interactive() {
        let mut p = Plasma::default();
        let mut u = p.initial_uniforms();
        p.on_pointer_move(12.0, 34.0, &mut u);
        assert_eq!(u.get("uMouse"), Some(UniformValue::Vec2(Vec2::new(12.0, 34.0))));

        let mut still = Plasma::new(PlasmaConfig {
            mouse_interactive: false,
            ..PlasmaConfig::default()
        });
        let mut u = still.initial_uniforms();
        assert!(!still.pointer_interactive());
        still.on_pointer_move(12.0, 34.0, &mut u);
        assert_eq!(u.get("uMouse"), Some(UniformValue::Vec2(Vec2::ZERO)));
    }

    #[test]
    fn requires_high_tier_without_antialiasing() {
        let opts = Plasma::default().renderer_options();
        assert_eq!(opts.tier, TierPreference::RequireHigh);
        assert!(opts.alpha);
        assert!(!opts.antialias);
        assert_eq!(opts.dpr_cap, 2.0);
    }

    #[test]
    fn config_parses_partial_json() {
        let cfg: PlasmaConfig =
            serde_json::from_str(r#"{"direction":"pingpong","mouseInteractive":false}"#).unwrap();
        assert_eq!(cfg.direction, Direction::PingPong);
        assert!(!cfg.mouse_interactive);
        assert_eq!(cfg.color.as_deref(), Some("#b19eef"));
        assert_eq!(cfg.speed, 1.0);
    }

    #[test]
    fn null_color_in_json_means_no_tint() {
        let cfg: PlasmaConfig = serde_json::from_str(r#"{"color":null}"#).unwrap();
        assert_eq!(cfg.color, None);
    }

    #[test]
    fn shader_declares_every_uniform() {
        for (name, _) in Plasma::default().initial_uniforms().iter() {
            assert!(
                FRAGMENT_SHADER.contains(&format!(" {name};")),
                "{name} not declared"
            );
        }
    }
}
