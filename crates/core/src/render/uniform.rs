//! CPU-side uniform table.
//!
//! Values are tagged with their kind when the effect is configured, so
//! upload dispatch never inspects the payload shape at draw time.

use glam::{Vec2, Vec3};

/// A uniform payload. Only the kinds the effects use are supported;
/// matrices and integer uniforms would need new variants here and in
/// [`UniformValue::upload`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl UniformValue {
    /// Uploads this value to `location` with the call matching its kind.
    pub fn upload<G: super::Gl>(&self, gl: &G, location: &G::UniformLocation) {
        match *self {
            UniformValue::Scalar(x) => gl.uniform_1_f32(location, x),
            UniformValue::Vec2(v) => gl.uniform_2_f32(location, v.x, v.y),
            UniformValue::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UniformValue::Scalar(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
        }
    }
}

impl From<f32> for UniformValue {
    fn from(x: f32) -> Self {
        UniformValue::Scalar(x)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

/// Ordered name → value table.
///
/// Effects carry at most a dozen uniforms, so lookups are linear scans
/// over a `Vec`, which also keeps upload order deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    entries: Vec<(String, UniformValue)>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous value for `name`.
    pub fn with(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_owned(), value)),
        }
    }

    /// Updates a tracked uniform. Returns `false` (and stores nothing) when
    /// `name` was never registered.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Convenience accessor for scalar uniforms.
    pub fn scalar(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Scalar(x) => Some(x),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_registration_order() {
        let u = Uniforms::new()
            .with("iTime", 0.0_f32)
            .with("iResolution", Vec2::ONE)
            .with("uColor", Vec3::ZERO);
        let names: Vec<&str> = u.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["iTime", "iResolution", "uColor"]);
    }

    #[test]
    fn insert_replaces_existing_value_in_place() {
        let mut u = Uniforms::new().with("a", 1.0_f32).with("b", 2.0_f32);
        u.insert("a", 3.0_f32);
        assert_eq!(u.len(), 2);
        assert_eq!(u.scalar("a"), Some(3.0));
    }

    #[test]
    fn set_ignores_unregistered_names() {
        let mut u = Uniforms::new().with("iTime", 0.0_f32);
        assert!(!u.set("iTmie", 1.0_f32));
        assert_eq!(u.len(), 1);
        assert!(u.set("iTime", 1.5_f32));
        assert_eq!(u.scalar("iTime"), Some(1.5));
    }

    #[test]
    fn scalar_accessor_rejects_vectors() {
        let u = Uniforms::new().with("uMouse", Vec2::new(1.0, 2.0));
        assert_eq!(u.scalar("uMouse"), None);
        assert_eq!(u.get("uMouse").map(|v| v.kind()), Some("vec2"));
    }
}
