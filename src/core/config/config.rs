use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Skills".into(),
            auto_close: 0.0,
        }
    }
}

/// Insets carved out of the viewport; everything in screen pixels.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayAreaConfig {
    /// Fraction of viewport height blocked off at the top.
    pub top_cutoff_frac: f32,
    /// Fraction of viewport width blocked off on each side.
    pub side_cutoff_frac: f32,
    pub footer_height: f32,
    pub wall_thickness: f32,
}
impl Default for PlayAreaConfig {
    fn default() -> Self {
        Self {
            top_cutoff_frac: 0.09,
            side_cutoff_frac: 0.10,
            footer_height: 50.0,
            wall_thickness: 200.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallsConfig {
    pub radius: f32,
    pub restitution: f32,
    /// Downward acceleration in screen px/s².
    pub gravity: f32,
    pub spawn_attempts: u32,
    pub outline_width: f32,
    pub outline_color: String,
    pub label_font_size: f32,
    pub label_color: String,
}
impl Default for BallsConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            restitution: 0.9,
            gravity: 1000.0,
            spawn_attempts: 64,
            outline_width: 3.0,
            outline_color: "#FFFFFF".into(),
            label_font_size: 18.0,
            label_color: "#FFFFFF".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SkillEntry {
    pub name: String,
    /// Filled stars out of five.
    pub stars: u8,
    pub description: String,
    pub color: String,
    pub icon: Option<String>,
}
impl Default for SkillEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            stars: 0,
            description: String::new(),
            color: "#888888".into(),
            icon: None,
        }
    }
}
impl SkillEntry {
    fn new(name: &str, stars: u8, color: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            stars,
            description: description.into(),
            color: color.into(),
            icon: None,
        }
    }

    /// Parsed fill color; unparsable hex falls back to neutral grey.
    pub fn fill_color(&self) -> Color {
        parse_hex_color(&self.color).unwrap_or(Color::srgb(0.53, 0.53, 0.53))
    }

    pub fn star_line(&self) -> String {
        let filled = self.stars.min(5) as usize;
        let mut s = String::with_capacity(5 * 4);
        for i in 0..5 {
            s.push(if i < filled { '★' } else { '☆' });
        }
        s
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    Srgba::hex(hex).ok().map(Color::from)
}

fn default_skills() -> Vec<SkillEntry> {
    vec![
        SkillEntry::new("HTML", 5, "#F16529", "Built semantic, accessible, and responsive web pages for modern web applications."),
        SkillEntry::new("CSS", 5, "#2965F1", "Designed layouts and styled interfaces using CSS, Flexbox, Grid, and animations."),
        SkillEntry::new("JavaScript", 5, "#F7DF1E", "Developed interactive web applications with integrated libraries and custom elements."),
        SkillEntry::new("Python", 5, "#3472A6", "Automated tasks and processed data using Python scripts and prototypes."),
        SkillEntry::new("C++", 3, "#00599C", "Programmed embedded systems (Arduino, ESP32, Raspberry Pi) implemented projects connecting hardware."),
        SkillEntry::new("C#", 4, "#61DBFB", "Developed interactive applications and games using C# in Unity."),
        SkillEntry::new("Unity", 4, "#8CC84B", "Created immersive 3D, 2D and VR games with interactive environments and gameplay mechanics."),
        SkillEntry::new("3D Modeling", 3, "#56f52aff", "Designed 3D models and animations using Blender, 3D printing oriented using Onshape, and OpenSCAD for projects and prototypes."),
        SkillEntry::new("Git", 4, "#9B59B6", "Managed version control and collaborative development using Git."),
        SkillEntry::new("MySQL", 3, "#68A063", "Designed databases and wrote queries for data-driven applications using MySQL."),
        SkillEntry::new("Graphic Design", 5, "#E67E22", "Produced visual designs, branding assets, and UI elements for digital projects."),
        SkillEntry::new("Java", 3, "#E74C3C", "Built software applications and Android apps using Java and Android Studio."),
    ]
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Pointer travel (screen px) after which a press becomes a drag.
    pub drag_threshold: f32,
}
impl Default for GestureConfig {
    fn default() -> Self {
        Self { drag_threshold: 6.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    pub enabled: bool,
    /// Fraction of the pointer offset closed per reference step.
    pub stiffness: f32,
    /// Share of the previous velocity kept each frame (0 = pure spring).
    pub damping: f32,
    pub max_speed: f32,
}
impl Default for DragConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stiffness: 0.2,
            damping: 0.1,
            max_speed: 4000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IdleConfig {
    /// Linear and angular speed cutoff, measured per reference physics step.
    pub stillness_threshold: f32,
    pub reference_step_hz: f32,
    /// Seconds of continuous stillness before straightening.
    pub dwell: f32,
    pub straighten_duration: f32,
}
impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            stillness_threshold: 0.2,
            reference_step_hz: 60.0,
            dwell: 1.0,
            straighten_duration: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FlipConfig {
    pub duration: f32,
}
impl Default for FlipConfig {
    fn default() -> Self {
        Self { duration: 0.6 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SplatterConfig {
    pub droplets: SpawnRange<u32>,
    /// Max droplet travel as a multiple of the body radius.
    pub spread: f32,
    /// Power-law exponent biasing droplets toward the center (> 1 = denser center).
    pub bias_exponent: f32,
    pub droplet_radius: SpawnRange<f32>,
    pub max_delay: f32,
    pub drip_probability: f64,
    /// Long-axis stretch factor applied to drip ellipses.
    pub drip_stretch: f32,
    pub duration: f32,
}
impl Default for SplatterConfig {
    fn default() -> Self {
        Self {
            droplets: SpawnRange { min: 20, max: 40 },
            spread: 1.8,
            bias_exponent: 2.0,
            droplet_radius: SpawnRange { min: 3.0, max: 11.0 },
            max_delay: 0.05,
            drip_probability: 0.25,
            drip_stretch: 2.6,
            duration: 0.08,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PopupConfig {
    pub timeout: f32,
    pub margin: f32,
    pub fallback_text: String,
    pub max_width: f32,
}
impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            timeout: 5.0,
            margin: 10.0,
            fallback_text: "No description available.".into(),
            max_width: 320.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EscapeConfig {
    pub interval: f32,
    /// Distance outside the viewport (px) before a body counts as lost.
    pub slack: f32,
}
impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            interval: 3.0,
            slack: 1000.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub play_area: PlayAreaConfig,
    pub balls: BallsConfig,
    pub skills: Vec<SkillEntry>,
    pub gesture: GestureConfig,
    pub drag: DragConfig,
    pub idle: IdleConfig,
    pub flip: FlipConfig,
    pub splatter: SplatterConfig,
    pub popup: PopupConfig,
    pub escape: EscapeConfig,
    pub rapier_debug: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            play_area: Default::default(),
            balls: Default::default(),
            skills: default_skills(),
            gesture: Default::default(),
            drag: Default::default(),
            idle: Default::default(),
            flip: Default::default(),
            splatter: Default::default(),
            popup: Default::default(),
            escape: Default::default(),
            rapier_debug: false,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        Self::from_ron_str(&data)
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Deep-merges every readable RON file in order (later wins) and deserializes the result.
    /// Returns (config, files used, errors); never fails hard.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        let pa = &self.play_area;
        if !(0.0..0.5).contains(&pa.top_cutoff_frac) {
            w.push(format!(
                "play_area.top_cutoff_frac {} outside 0..0.5",
                pa.top_cutoff_frac
            ));
        }
        if !(0.0..0.5).contains(&pa.side_cutoff_frac) {
            w.push(format!(
                "play_area.side_cutoff_frac {} outside 0..0.5 (sides would meet)",
                pa.side_cutoff_frac
            ));
        }
        if pa.footer_height < 0.0 {
            w.push("play_area.footer_height negative".into());
        }
        if pa.wall_thickness <= 0.0 {
            w.push("play_area.wall_thickness must be > 0".into());
        }
        if self.balls.radius <= 0.0 {
            w.push("balls.radius must be > 0".into());
        }
        if !(0.0..=1.5).contains(&self.balls.restitution) {
            w.push(format!(
                "balls.restitution {} outside recommended 0..1.5",
                self.balls.restitution
            ));
        }
        if self.balls.gravity < 0.0 {
            w.push(format!(
                "balls.gravity is negative ({}); bodies will float upward",
                self.balls.gravity
            ));
        }
        if self.balls.spawn_attempts == 0 {
            w.push("balls.spawn_attempts is 0; overlap avoidance disabled".into());
        }
        for (label, hex) in [
            ("balls.outline_color", &self.balls.outline_color),
            ("balls.label_color", &self.balls.label_color),
        ] {
            if parse_hex_color(hex).is_none() {
                w.push(format!("{label} '{hex}' is not a valid hex color"));
            }
        }
        if self.skills.is_empty() {
            w.push("skills list is empty; nothing will spawn".into());
        }
        let mut seen = std::collections::HashSet::new();
        for s in &self.skills {
            if s.name.trim().is_empty() {
                w.push("skill with empty name".into());
            } else if !seen.insert(s.name.as_str()) {
                w.push(format!("duplicate skill name '{}'", s.name));
            }
            if s.stars > 5 {
                w.push(format!("skill '{}' stars {} > 5 (clamped)", s.name, s.stars));
            }
            if parse_hex_color(&s.color).is_none() {
                w.push(format!("skill '{}' color '{}' is not a valid hex color", s.name, s.color));
            }
        }
        if self.gesture.drag_threshold <= 0.0 {
            w.push("gesture.drag_threshold must be > 0 (every press would drag)".into());
        }
        if self.drag.enabled {
            if !(0.0..=1.0).contains(&self.drag.stiffness) || self.drag.stiffness == 0.0 {
                w.push(format!("drag.stiffness {} outside (0..1]", self.drag.stiffness));
            }
            if !(0.0..1.0).contains(&self.drag.damping) {
                w.push(format!("drag.damping {} outside 0..1", self.drag.damping));
            }
            if self.drag.max_speed < 0.0 {
                w.push("drag.max_speed negative".into());
            }
        }
        if self.idle.stillness_threshold <= 0.0 {
            w.push("idle.stillness_threshold must be > 0 (bodies never count as still)".into());
        }
        if self.idle.reference_step_hz <= 0.0 {
            w.push("idle.reference_step_hz must be > 0".into());
        }
        if self.idle.dwell < 0.0 {
            w.push("idle.dwell negative".into());
        }
        if self.idle.straighten_duration <= 0.0 {
            w.push("idle.straighten_duration must be > 0".into());
        }
        if self.flip.duration <= 0.0 {
            w.push("flip.duration must be > 0".into());
        }
        let sp = &self.splatter;
        if sp.droplets.min > sp.droplets.max {
            w.push(format!(
                "splatter.droplets min ({}) greater than max ({})",
                sp.droplets.min, sp.droplets.max
            ));
        }
        if sp.droplet_radius.min <= 0.0 || sp.droplet_radius.min > sp.droplet_radius.max {
            w.push(format!(
                "splatter.droplet_radius range {}..{} invalid",
                sp.droplet_radius.min, sp.droplet_radius.max
            ));
        }
        if !(0.0..=1.0).contains(&sp.drip_probability) {
            w.push(format!(
                "splatter.drip_probability {} outside 0..1",
                sp.drip_probability
            ));
        }
        if sp.duration <= 0.0 {
            w.push("splatter.duration must be > 0".into());
        }
        if sp.max_delay < 0.0 || sp.max_delay > sp.duration {
            w.push(format!(
                "splatter.max_delay {} should lie within 0..duration ({})",
                sp.max_delay, sp.duration
            ));
        }
        if self.popup.timeout <= 0.0 {
            w.push("popup.timeout must be > 0".into());
        }
        if self.escape.interval <= 0.0 {
            w.push("escape.interval must be > 0".into());
        }
        if self.escape.slack < 0.0 {
            w.push("escape.slack negative".into());
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                if let Some((_, existing)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                    if let Some(v) = incoming.take() {
                        merge_value(existing, v);
                    }
                }
                if let Some(v) = incoming {
                    bm.insert(k, v);
                }
            }
        }
        (b, o) => *b = o,
    }
}
