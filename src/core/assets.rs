//! Asset handle cache
//!
//! The simulation core never touches the filesystem for art. The embedder
//! registers whatever handles its renderer loaded; gameplay code looks
//! them up by id and treats a miss as "draw the placeholder".

use ahash::AHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    pub id: String,
}

#[derive(Debug, Default)]
pub struct AssetCache {
    textures: AHashMap<String, TextureHandle>,
    fonts: AHashMap<String, FontHandle>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_texture(&mut self, id: &str, width: u32, height: u32) {
        self.textures.insert(
            id.to_string(),
            TextureHandle {
                id: id.to_string(),
                width,
                height,
            },
        );
    }

    pub fn register_font(&mut self, id: &str) {
        self.fonts
            .insert(id.to_string(), FontHandle { id: id.to_string() });
    }

    pub fn texture(&self, id: &str) -> Option<&TextureHandle> {
        self.textures.get(id)
    }

    pub fn font(&self, id: &str) -> Option<&FontHandle> {
        self.fonts.get(id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
