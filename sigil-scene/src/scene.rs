//! The scene container: ordered drawable objects plus canvas properties.
//!
//! Scenes are the unit the history manager snapshots. Snapshot encoding is
//! plain serde_json with fixed field order, so semantically equal scenes
//! serialize to byte-identical strings (the undo/redo round-trip law
//! depends on that).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::object::{DrawableObject, Shape, TextAnchor};
use crate::{Color, SCENE_SCHEMA_VERSION};

/// File extension recommended for saved scenes.
pub const SCENE_FILE_EXT: &str = "sigil.json";

/// Default certificate canvas size.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no object with id {id}")]
    UnknownObject { id: Uuid },

    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The complete set of drawable objects composed on the certificate canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub schema_version: String,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    objects: Vec<DrawableObject>,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        tracing::debug!(width, height, "creating empty scene");
        Self {
            schema_version: SCENE_SCHEMA_VERSION.to_string(),
            width,
            height,
            background,
            objects: vec![],
        }
    }

    /// The default certificate template: gold border plus centered title.
    ///
    /// The border is template furniture and not selectable; the title is a
    /// regular editable text object.
    pub fn certificate_template() -> Self {
        let mut scene = Scene::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, Color::WHITE);

        let mut border = DrawableObject::rect(20.0, 20.0, 760.0, 560.0, Color::TRANSPARENT);
        border.selectable = false;
        if let Shape::Rect { stroke, .. } = &mut border.shape {
            *stroke = Some(crate::Stroke {
                color: Color::GOLD,
                width: 4.0,
            });
        }
        scene.add(border);

        let mut title =
            DrawableObject::text(400.0, 150.0, "Certificate of Achievement", 36.0, Color::SLATE);
        if let Shape::Text {
            font_family,
            anchor,
            ..
        } = &mut title.shape
        {
            *font_family = "Playfair Display".into();
            *anchor = TextAnchor::Center;
        }
        scene.add(title);

        scene
    }

    /// Append an object, returning its id.
    pub fn add(&mut self, object: DrawableObject) -> Uuid {
        let id = object.id;
        tracing::debug!(%id, kind = object.kind(), "adding object to scene");
        self.objects.push(object);
        id
    }

    /// Remove an object by id, preserving the order of the rest.
    pub fn remove(&mut self, id: Uuid) -> Result<DrawableObject, SceneError> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(SceneError::UnknownObject { id })?;
        tracing::debug!(%id, "removing object from scene");
        Ok(self.objects.remove(index))
    }

    pub fn object(&self, id: Uuid) -> Option<&DrawableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: Uuid) -> Option<&mut DrawableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.object(id).is_some()
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Count objects of a given tag (`"rect"`, `"text"`, ...).
    pub fn count_kind(&self, tag: &str) -> usize {
        self.objects.iter().filter(|o| o.kind() == tag).count()
    }

    /// Serialize the whole scene to one snapshot string.
    pub fn snapshot(&self) -> Result<String, SceneError> {
        serde_json::to_string(self).map_err(SceneError::Encode)
    }

    /// Restore a scene from a snapshot string.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SceneError> {
        serde_json::from_str(snapshot).map_err(SceneError::Decode)
    }
}

/// Save a scene to disk as pretty JSON.
pub fn save_scene(path: impl AsRef<Path>, scene: &Scene) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        // fs::write does NOT create directories; tests may run with missing `target/`
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(scene).context("serialize scene to json")?;
    fs::write(path, json).with_context(|| format!("write scene file: {}", path.display()))?;
    Ok(())
}

/// Load a scene from disk.
pub fn load_scene(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).with_context(|| format!("read scene file: {}", path.display()))?;
    let scene: Scene = serde_json::from_str(&data).context("parse scene json")?;
    Ok(scene)
}
