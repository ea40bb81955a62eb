use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::{UtilsError, UtilsResult};
use crate::math::{Rect, Size, Vec2};

/// Opaque handle to a texture owned by the rendering engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// A named sub-region of a texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame {
    pub texture: TextureHandle,
    /// Region inside the texture, in pixels.
    pub rect: Rect,
    /// The region is stored rotated 90 degrees clockwise in the atlas.
    pub rotated: bool,
    /// Offset of the trimmed region from the centre of the untrimmed image.
    pub offset: Vec2,
    /// Size before trimming.
    pub original_size: Size,
}

impl SpriteFrame {
    pub fn new(texture: TextureHandle, rect: Rect) -> Self {
        Self {
            texture,
            rect,
            rotated: false,
            offset: Vec2::ZERO,
            original_size: rect.size,
        }
    }
}

/// Resolves frame names to sprite frames.
pub trait FrameSource {
    fn sprite_frame(&self, name: &str) -> UtilsResult<SpriteFrame>;
}

/// Cache of sprite frames keyed by name.
#[derive(Debug, Default)]
pub struct SpriteFrameCache {
    frames: HashMap<String, SpriteFrame>,
}

impl SpriteFrameCache {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
        }
    }

    /// Register a frame, replacing any previous frame with the same name.
    pub fn add_sprite_frame(&mut self, name: impl Into<String>, frame: SpriteFrame) {
        let name = name.into();
        if self.frames.insert(name.clone(), frame).is_some() {
            log::debug!("Replaced sprite frame '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SpriteFrame> {
        self.frames.remove(name)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Register every frame of a TexturePacker "hash" atlas.
    ///
    /// Atlas rectangles use a top-left origin; they are stored as-is since
    /// the region is only meaningful to the renderer that owns `texture`.
    /// Returns the number of frames added.
    pub fn add_atlas_json(&mut self, texture: TextureHandle, json: &str) -> UtilsResult<usize> {
        let atlas: AtlasFile = serde_json::from_str(json).context("failed to parse frame atlas")?;
        let count = atlas.frames.len();
        for (name, entry) in atlas.frames {
            self.add_sprite_frame(name, entry.into_sprite_frame(texture));
        }
        log::debug!("Loaded {} sprite frames for texture {:?}", count, texture);
        Ok(count)
    }

    /// Read an atlas JSON file from disk and register its frames.
    pub fn load_atlas_file(
        &mut self,
        texture: TextureHandle,
        path: impl AsRef<Path>,
    ) -> UtilsResult<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read frame atlas {}", path.display()))?;
        self.add_atlas_json(texture, &json)
    }
}

impl FrameSource for SpriteFrameCache {
    fn sprite_frame(&self, name: &str) -> UtilsResult<SpriteFrame> {
        match self.frames.get(name) {
            Some(frame) => Ok(frame.clone()),
            None => {
                log::warn!("Sprite frame '{}' is not registered", name);
                Err(UtilsError::not_found(format!("sprite frame '{name}'")))
            }
        }
    }
}

#[derive(Deserialize)]
struct AtlasFile {
    frames: HashMap<String, AtlasEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasEntry {
    frame: AtlasRect,
    #[serde(default)]
    rotated: bool,
    #[serde(default)]
    sprite_source_size: Option<AtlasRect>,
    #[serde(default)]
    source_size: Option<AtlasSize>,
}

#[derive(Deserialize, Clone, Copy)]
struct AtlasRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize, Clone, Copy)]
struct AtlasSize {
    w: f32,
    h: f32,
}

impl AtlasEntry {
    fn into_sprite_frame(self, texture: TextureHandle) -> SpriteFrame {
        let f = self.frame;
        let original_size = self
            .source_size
            .map(|s| Size::new(s.w, s.h))
            .unwrap_or(Size::new(f.w, f.h));

        // Offset of the trimmed centre from the untrimmed centre, y up.
        let offset = match self.sprite_source_size {
            Some(src) => Vec2::new(
                src.x + src.w * 0.5 - original_size.width * 0.5,
                original_size.height * 0.5 - (src.y + src.h * 0.5),
            ),
            None => Vec2::ZERO,
        };

        SpriteFrame {
            texture,
            rect: Rect::new(f.x, f.y, f.w, f.h),
            rotated: self.rotated,
            offset,
            original_size,
        }
    }
}
