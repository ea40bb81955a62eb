use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::UtilsResult;
use crate::math::{Rect, Size, Vec2};

/// Screen dimensions used by the layout helpers and touch conversion.
///
/// `content_size` is the area the game actually draws into. It defaults to the
/// full screen and is centred inside it when smaller, which is how letterboxing
/// on larger displays is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub size: Size,
    pub content_size: Option<Size>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            size: Size::new(1280.0, 720.0),
            content_size: None,
        }
    }
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            content_size: None,
        }
    }

    /// Override the content (letterboxed) area.
    #[must_use]
    pub fn with_content_size(mut self, width: f32, height: f32) -> Self {
        self.content_size = Some(Size::new(width, height));
        self
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn content_width(&self) -> f32 {
        self.content_size.unwrap_or(self.size).width
    }

    pub fn content_height(&self) -> f32 {
        self.content_size.unwrap_or(self.size).height
    }

    pub fn set_content_width(&mut self, width: f32) {
        let height = self.content_height();
        self.content_size = Some(Size::new(width, height));
    }

    pub fn set_content_height(&mut self, height: f32) {
        let width = self.content_width();
        self.content_size = Some(Size::new(width, height));
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width() * 0.5, self.height() * 0.5)
    }

    /// The content area in screen space.
    pub fn content_rect(&self) -> Rect {
        let w = self.content_width();
        let h = self.content_height();
        Rect::new((self.width() - w) * 0.5, (self.height() - h) * 0.5, w, h)
    }

    /// Converts a window position (origin top-left, y down) into scene space.
    pub fn to_scene(&self, window_pos: Vec2) -> Vec2 {
        Vec2::new(window_pos.x, self.height() - window_pos.y)
    }

    pub fn from_json(json: &str) -> UtilsResult<Self> {
        let screen = serde_json::from_str(json).context("failed to parse screen config")?;
        Ok(screen)
    }

    pub fn load(path: impl AsRef<Path>) -> UtilsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screen config {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("cocos_utils_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[test]
    fn content_defaults_to_full_screen() {
        let screen = Screen::new(480.0, 320.0);
        assert_eq!(screen.content_width(), 480.0);
        assert_eq!(screen.content_rect(), Rect::new(0.0, 0.0, 480.0, 320.0));
    }

    #[test]
    fn letterboxed_content_is_centred() {
        let screen = Screen::new(568.0, 320.0).with_content_size(480.0, 320.0);
        assert_eq!(screen.content_rect(), Rect::new(44.0, 0.0, 480.0, 320.0));
    }

    #[test]
    fn setters_keep_the_other_axis() {
        let mut screen = Screen::new(480.0, 360.0);
        screen.set_content_height(320.0);
        assert_eq!(screen.content_width(), 480.0);
        assert_eq!(screen.content_height(), 320.0);
    }

    #[test]
    fn parses_partial_json() {
        let screen = Screen::from_json(r#"{ "size": { "width": 1024, "height": 768 } }"#).unwrap();
        assert_eq!(screen.size, Size::new(1024.0, 768.0));
        assert!(screen.content_size.is_none());
    }

    #[test]
    fn bad_json_is_reported() {
        let err = Screen::from_json("{ nope").unwrap_err();
        assert!(err.to_string().contains("screen config"));
    }

    #[test]
    fn loads_from_file() {
        let path = temp_path("screen");
        std::fs::write(
            &path,
            r#"{ "size": { "width": 568, "height": 320 }, "content_size": { "width": 480, "height": 320 } }"#,
        )
        .unwrap();
        let screen = Screen::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(screen.size, Size::new(568.0, 320.0));
        assert_eq!(screen.content_rect(), Rect::new(44.0, 0.0, 480.0, 320.0));
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = temp_path("missing_screen");
        let err = Screen::load(&path).unwrap_err().to_string();
        assert!(err.contains("failed to read screen config"), "{err}");
        assert!(err.contains(&path.display().to_string()), "{err}");
    }

    #[test]
    fn window_to_scene_flips_y() {
        let screen = Screen::new(480.0, 320.0);
        assert_eq!(screen.to_scene(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 300.0));
    }
}
