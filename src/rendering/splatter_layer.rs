//! Persistent paint layer beneath the live bodies.
//!
//! Marks are rasterized on the CPU into an `RgbaImage` in physical pixels and
//! uploaded to a Bevy `Image` whenever something new was painted. The layer is
//! strictly additive: nothing ever clears it while the app runs.

use std::collections::HashSet;

use bevy::asset::RenderAssetUsages;
use bevy::color::ColorToPacked;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::sprite::Anchor;
use image::{Rgba, RgbaImage};

use crate::core::system::RenderSyncSet;
use crate::core::viewport::Viewport;

/// Draw order of the layer; live bodies sit at z >= 0.
pub const SPLATTER_LAYER_Z: f32 = -10.0;

/// CPU raster with a device-pixel-ratio transform from logical screen px.
#[derive(Debug, Clone)]
pub struct SplatterCanvas {
    pixels: RgbaImage,
    scale: f32,
}

impl SplatterCanvas {
    pub fn new(physical: UVec2, scale: f32) -> Self {
        Self {
            pixels: RgbaImage::new(physical.x.max(1), physical.y.max(1)),
            scale: scale.max(0.01),
        }
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.pixels.width(), self.pixels.height())
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Adopts a new transform and grows the buffer to cover `physical`. Existing
    /// pixels keep their physical position; they are not rescaled or redrawn.
    /// Returns true when the buffer was reallocated.
    pub fn resize(&mut self, physical: UVec2, scale: f32) -> bool {
        self.scale = scale.max(0.01);
        let cur = self.size();
        let want = cur.max(physical);
        if want == cur {
            return false;
        }
        let mut grown = RgbaImage::new(want.x, want.y);
        for (x, y, px) in self.pixels.enumerate_pixels() {
            grown.put_pixel(x, y, *px);
        }
        self.pixels = grown;
        true
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.pixels.width() && y < self.pixels.height()).then(|| self.pixels.get_pixel(x, y).0)
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Number of pixels with any coverage.
    pub fn painted_pixels(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[3] > 0).count()
    }

    /// Filled disc; `center` and `radius` in logical screen px.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: [u8; 4]) {
        if radius <= 0.0 {
            return;
        }
        let c = center * self.scale;
        let r = radius * self.scale;
        let r2 = r * r;
        self.fill_bounded(c, Vec2::splat(r), color, |p| (p - c).length_squared() <= r2);
    }

    /// Filled ellipse with semi-axes `half_axes` rotated by `rotation` radians
    /// (clockwise on screen, since screen y points down).
    pub fn fill_ellipse(&mut self, center: Vec2, half_axes: Vec2, rotation: f32, color: [u8; 4]) {
        if half_axes.x <= 0.0 || half_axes.y <= 0.0 {
            return;
        }
        let c = center * self.scale;
        let a = half_axes * self.scale;
        let (sin, cos) = rotation.sin_cos();
        let reach = Vec2::splat(a.x.max(a.y));
        self.fill_bounded(c, reach, color, |p| {
            let d = p - c;
            let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
            (local.x / a.x).powi(2) + (local.y / a.y).powi(2) <= 1.0
        });
    }

    fn fill_bounded(&mut self, c: Vec2, reach: Vec2, color: [u8; 4], inside: impl Fn(Vec2) -> bool) {
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        let x0 = ((c.x - reach.x).floor() as i64).clamp(0, w);
        let x1 = ((c.x + reach.x).ceil() as i64 + 1).clamp(0, w);
        let y0 = ((c.y - reach.y).floor() as i64).clamp(0, h);
        let y1 = ((c.y + reach.y).ceil() as i64 + 1).clamp(0, h);
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(sample) {
                    let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
                    *dst = blend_over(*dst, color);
                }
            }
        }
    }
}

/// Source-over compositing in straight (non-premultiplied) alpha.
fn blend_over(dst: Rgba<u8>, src: [u8; 4]) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return Rgba(src);
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = src[i] as f32 / 255.0;
        let d = dst.0[i] as f32 / 255.0;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        out[i] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

pub fn color_to_rgba8(color: Color) -> [u8; 4] {
    color.to_srgba().to_u8_array()
}

/// The persistent layer plus the set of bodies already painted.
#[derive(Resource, Debug)]
pub struct SplatterLayer {
    canvas: SplatterCanvas,
    painted: HashSet<Entity>,
    dirty: bool,
}

impl SplatterLayer {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            canvas: SplatterCanvas::new(viewport.physical_size(), viewport.scale_factor),
            painted: HashSet::new(),
            dirty: false,
        }
    }

    /// Reserves the single paint for `body`. A second claim is a caller bug;
    /// it is logged and refused.
    pub fn claim(&mut self, body: Entity) -> bool {
        if !self.painted.insert(body) {
            error!(target: "splatter", ?body, "splatter paint requested twice; refusing");
            return false;
        }
        true
    }

    pub fn has_painted(&self, body: Entity) -> bool {
        self.painted.contains(&body)
    }

    pub fn painted_count(&self) -> usize {
        self.painted.len()
    }

    pub fn canvas(&self) -> &SplatterCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut SplatterCanvas {
        self.dirty = true;
        &mut self.canvas
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl FromWorld for SplatterLayer {
    fn from_world(world: &mut World) -> Self {
        let vp = world.get_resource::<Viewport>().copied().unwrap_or_default();
        Self::new(&vp)
    }
}

#[derive(Component)]
pub struct SplatterSprite;

#[derive(Resource)]
struct SplatterImage(Handle<Image>);

fn canvas_image(canvas: &SplatterCanvas) -> Image {
    let size = canvas.size();
    Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        canvas.as_raw().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn sprite_placement(canvas: &SplatterCanvas, vp: &Viewport) -> (Vec2, Transform) {
    let logical = canvas.size().as_vec2() / canvas.scale();
    let top_left = vp.screen_to_world(Vec2::ZERO);
    (
        logical,
        Transform::from_xyz(top_left.x, top_left.y, SPLATTER_LAYER_Z),
    )
}

fn setup_splatter_sprite(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    layer: Res<SplatterLayer>,
    vp: Res<Viewport>,
) {
    let handle = images.add(canvas_image(layer.canvas()));
    let (size, transform) = sprite_placement(layer.canvas(), &vp);
    commands.spawn((
        SplatterSprite,
        Sprite {
            image: handle.clone(),
            custom_size: Some(size),
            anchor: Anchor::TopLeft,
            ..default()
        },
        transform,
        Name::new("SplatterLayer"),
    ));
    commands.insert_resource(SplatterImage(handle));
}

/// Follows viewport changes: new transform, possibly bigger buffer, old marks kept.
pub fn resize_splatter_layer(mut layer: ResMut<SplatterLayer>, vp: Res<Viewport>) {
    if !vp.is_changed() {
        return;
    }
    let physical = vp.physical_size();
    let scale = vp.scale_factor;
    let canvas = layer.canvas();
    if canvas.size().cmpge(physical).all() && (canvas.scale() - scale).abs() < f32::EPSILON {
        return;
    }
    if layer.canvas_mut().resize(physical, scale) {
        debug!(target: "splatter", w = physical.x, h = physical.y, "splatter layer grown");
    }
}

fn upload_splatter_layer(
    mut layer: ResMut<SplatterLayer>,
    handle: Option<Res<SplatterImage>>,
    mut images: ResMut<Assets<Image>>,
    vp: Res<Viewport>,
    mut sprites: Query<(&mut Sprite, &mut Transform), With<SplatterSprite>>,
) {
    if !layer.dirty && !vp.is_changed() {
        return;
    }
    let Some(handle) = handle else {
        return;
    };
    if layer.dirty {
        if let Some(img) = images.get_mut(&handle.0) {
            *img = canvas_image(layer.canvas());
        }
        layer.dirty = false;
    }
    let (size, placed) = sprite_placement(layer.canvas(), &vp);
    for (mut sprite, mut tf) in &mut sprites {
        sprite.custom_size = Some(size);
        *tf = placed;
    }
}

/// Owns the paint layer resource and its resize handling.
pub struct SplatterLayerPlugin;

impl Plugin for SplatterLayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SplatterLayer>()
            .add_systems(PreUpdate, resize_splatter_layer);
    }
}

/// Displays the layer as a sprite; needs the render/asset plugins.
pub struct SplatterSpritePlugin;

impl Plugin for SplatterSpritePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_splatter_sprite)
            .add_systems(Update, upload_splatter_layer.in_set(RenderSyncSet));
    }
}
