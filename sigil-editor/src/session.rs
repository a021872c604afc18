//! The editor session: one open certificate design.
//!
//! Owns the scene, the undo/redo history, the selection and the decoded
//! image cache. Every mutating operation commits exactly one history
//! entry; undo/redo restore snapshots and are guarded so a restore never
//! records itself as a new edit.
//!
//! The session does no I/O. Remote loads (gallery assets, uploads)
//! complete outside and hand decoded pixels in; each completion performs
//! exactly one scene mutation here.

use sigil_api::ElementRecord;
use sigil_scene::{
    Color, DrawableObject, GeometryError, HasFill, HasFontProperties, HasGeometry, HasStroke,
    Scene, SceneError, Shape, Stroke,
};
use thiserror::Error;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::export::{self, ExportError};
use crate::history::History;
use crate::qr;
use crate::raster::{DecodedImage, ImageCache};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("qr encode failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("nothing is selected")]
    NothingSelected,

    #[error("no object with id {id}")]
    UnknownObject { id: Uuid },

    #[error("object is not selectable")]
    NotSelectable,

    #[error("{kind} objects have no {property}")]
    PropertyNotSupported {
        kind: &'static str,
        property: &'static str,
    },
}

/// Toolbar state, mirroring the editor's tool palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Select,
    Text,
    Rectangle,
    Circle,
    Image,
}

/// One open certificate design. Dropped when the editor view closes;
/// nothing here persists on its own.
#[derive(Debug)]
pub struct EditorSession {
    scene: Scene,
    history: History,
    images: ImageCache,
    selection: Option<Uuid>,
    active_tool: ActiveTool,
    active_color: Color,
    /// Set while a snapshot is being restored; mutations observed in that
    /// window must not enqueue new history entries.
    restoring: bool,
}

impl EditorSession {
    /// Open a session on the default certificate template and record the
    /// baseline snapshot, so the very first undo returns to the template
    /// rather than an empty canvas.
    pub fn new() -> Result<Self, EditorError> {
        let mut session = Self {
            scene: Scene::certificate_template(),
            history: History::new(),
            images: ImageCache::new(),
            selection: None,
            active_tool: ActiveTool::Select,
            active_color: Color::from_hex("#3b82f6").unwrap_or(Color::BLACK),
            restoring: false,
        };
        session.commit()?;
        info!("editor session ready");
        Ok(session)
    }

    // --- mutation protocol ---------------------------------------------

    /// Record the current scene as one history entry, unless a restore is
    /// in flight.
    fn commit(&mut self) -> Result<(), EditorError> {
        if self.restoring {
            trace!("mutation while restoring, not recorded");
            return Ok(());
        }
        let snapshot = self.scene.snapshot()?;
        self.history.record(snapshot);
        Ok(())
    }

    fn add_and_select(&mut self, object: DrawableObject) -> Result<Uuid, EditorError> {
        let id = self.scene.add(object);
        self.selection = Some(id);
        self.commit()?;
        Ok(id)
    }

    pub fn add_rectangle(&mut self) -> Result<Uuid, EditorError> {
        self.add_and_select(DrawableObject::rect(
            100.0,
            100.0,
            150.0,
            100.0,
            self.active_color,
        ))
    }

    pub fn add_circle(&mut self) -> Result<Uuid, EditorError> {
        self.add_and_select(DrawableObject::circle(100.0, 100.0, 75.0, self.active_color))
    }

    pub fn add_triangle(&mut self) -> Result<Uuid, EditorError> {
        self.add_and_select(DrawableObject::triangle(
            100.0,
            100.0,
            100.0,
            100.0,
            self.active_color,
        ))
    }

    pub fn add_text(&mut self) -> Result<Uuid, EditorError> {
        self.add_and_select(DrawableObject::text(
            100.0,
            100.0,
            "Your text here",
            24.0,
            self.active_color,
        ))
    }

    pub fn add_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Uuid, EditorError> {
        self.add_and_select(DrawableObject::line(
            x1,
            y1,
            x2,
            y2,
            Stroke {
                color: self.active_color,
                width: 2.0,
            },
        ))
    }

    /// Regular polygon anchored at its centroid.
    pub fn add_regular_polygon(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        sides: u32,
    ) -> Result<Uuid, EditorError> {
        let poly = DrawableObject::regular_polygon(cx, cy, radius, sides, self.active_color)?;
        self.add_and_select(poly)
    }

    /// Star anchored at its centroid.
    pub fn add_star(
        &mut self,
        cx: f32,
        cy: f32,
        points: u32,
        outer: f32,
        inner: f32,
    ) -> Result<Uuid, EditorError> {
        let star = DrawableObject::star(cx, cy, points, outer, inner, self.active_color)?;
        self.add_and_select(star)
    }

    /// Completion of a user upload: decoded pixels in, one scene mutation.
    /// Uploads come in half scale, matching the original editor.
    pub fn insert_uploaded_image(
        &mut self,
        source: impl Into<String>,
        decoded: DecodedImage,
    ) -> Result<Uuid, EditorError> {
        self.insert_image_at(source.into(), None, decoded, 100.0, 100.0, 0.5)
    }

    /// Completion of a gallery fetch: a catalog element enters the scene
    /// as an image object referencing its hosted URL.
    pub fn insert_asset(
        &mut self,
        record: &ElementRecord,
        decoded: DecodedImage,
    ) -> Result<Uuid, EditorError> {
        debug!(title = %record.title, "inserting gallery asset");
        self.insert_image_at(
            record.image_url.clone(),
            Some(record.title.clone()),
            decoded,
            100.0,
            100.0,
            1.0,
        )
    }

    /// Generate and place a QR code for a verification URL at the
    /// certificate's corner slot.
    pub fn add_qr_code(&mut self, verify_url: &str) -> Result<Uuid, EditorError> {
        let decoded = qr::qr_image(verify_url, 100)?;
        let source = format!("qr:{verify_url}");
        self.insert_image_at(source, None, decoded, 650.0, 450.0, 1.0)
    }

    fn insert_image_at(
        &mut self,
        source: String,
        title: Option<String>,
        decoded: DecodedImage,
        left: f32,
        top: f32,
        scale: f32,
    ) -> Result<Uuid, EditorError> {
        let mut object =
            DrawableObject::image(left, top, &source, title, decoded.width, decoded.height);
        if let Shape::Image {
            scale_x, scale_y, ..
        } = &mut object.shape
        {
            *scale_x = scale;
            *scale_y = scale;
        }
        self.images.insert(source, decoded);
        self.add_and_select(object)
    }

    pub fn remove_object(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.scene.remove(id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.commit()
    }

    pub fn remove_selected(&mut self) -> Result<(), EditorError> {
        let id = self.selection.ok_or(EditorError::NothingSelected)?;
        self.remove_object(id)
    }

    // --- selection ------------------------------------------------------

    pub fn select(&mut self, id: Uuid) -> Result<(), EditorError> {
        let object = self
            .scene
            .object(id)
            .ok_or(EditorError::UnknownObject { id })?;
        if !object.selectable {
            return Err(EditorError::NotSelectable);
        }
        self.selection = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    pub fn selected_object(&self) -> Option<&DrawableObject> {
        self.scene.object(self.selection?)
    }

    fn selected_mut(&mut self) -> Result<&mut DrawableObject, EditorError> {
        let id = self.selection.ok_or(EditorError::NothingSelected)?;
        self.scene
            .object_mut(id)
            .ok_or(EditorError::UnknownObject { id })
    }

    // --- property edits (one history entry each) ------------------------

    pub fn set_fill(&mut self, color: Color) -> Result<(), EditorError> {
        let object = self.selected_mut()?;
        let kind = object.kind();
        if !object.set_fill(color) {
            return Err(EditorError::PropertyNotSupported {
                kind,
                property: "fill",
            });
        }
        self.commit()
    }

    pub fn set_stroke(&mut self, stroke: Stroke) -> Result<(), EditorError> {
        let object = self.selected_mut()?;
        let kind = object.kind();
        if !object.set_stroke(stroke) {
            return Err(EditorError::PropertyNotSupported {
                kind,
                property: "stroke",
            });
        }
        self.commit()
    }

    pub fn set_font_size(&mut self, size: f32) -> Result<(), EditorError> {
        let object = self.selected_mut()?;
        let kind = object.kind();
        if !object.set_font_size(size) {
            return Err(EditorError::PropertyNotSupported {
                kind,
                property: "font size",
            });
        }
        self.commit()
    }

    pub fn set_font_family(&mut self, family: &str) -> Result<(), EditorError> {
        let object = self.selected_mut()?;
        let kind = object.kind();
        if !object.set_font_family(family) {
            return Err(EditorError::PropertyNotSupported {
                kind,
                property: "font family",
            });
        }
        self.commit()
    }

    pub fn set_text_content(&mut self, content: &str) -> Result<(), EditorError> {
        let object = self.selected_mut()?;
        match &mut object.shape {
            Shape::Text { content: c, .. } => {
                *c = content.to_string();
                self.commit()
            }
            other => Err(EditorError::PropertyNotSupported {
                kind: other.tag(),
                property: "text content",
            }),
        }
    }

    pub fn move_selected(&mut self, left: f32, top: f32) -> Result<(), EditorError> {
        self.selected_mut()?.set_position(left, top);
        self.commit()
    }

    // --- undo / redo ----------------------------------------------------

    /// Step back one snapshot. Returns false at the history boundary.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.undo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        Ok(true)
    }

    /// Step forward one snapshot. Returns false at the history boundary.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.redo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        Ok(true)
    }

    /// Replace the live scene with a snapshot. Never records; any
    /// mutation observed while the guard is up is part of the restore.
    fn restore(&mut self, snapshot: &str) -> Result<(), EditorError> {
        self.restoring = true;
        let result = Scene::from_snapshot(snapshot);
        self.restoring = false;
        self.scene = result?;

        // Previously held object handles are stale now; keep the
        // selection only if an object with that identity survived.
        if let Some(id) = self.selection {
            if !self.scene.contains(id) {
                debug!(%id, "selection did not survive restore, clearing");
                self.selection = None;
            }
        }
        Ok(())
    }

    // --- export ---------------------------------------------------------

    /// PNG bytes at export resolution (the local download).
    pub fn export_png(&self) -> Result<Vec<u8>, EditorError> {
        Ok(export::export_png(&self.scene, &self.images)?)
    }

    /// Base64 PNG for the send-certificate transport contract.
    pub fn export_base64_png(&self) -> Result<String, EditorError> {
        Ok(export::export_base64_png(&self.scene, &self.images)?)
    }

    // --- accessors ------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn set_active_tool(&mut self, tool: ActiveTool) {
        trace!(?tool, "tool selected");
        self.active_tool = tool;
    }

    pub fn active_tool(&self) -> ActiveTool {
        self.active_tool
    }

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_snapshot_is_recorded_on_open() {
        let session = EditorSession::new().unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().cursor(), Some(0));
        assert_eq!(session.scene().len(), 2); // border + title
    }

    #[test]
    fn every_mutation_appends_one_entry() {
        let mut s = EditorSession::new().unwrap();
        s.add_rectangle().unwrap();
        s.add_circle().unwrap();
        s.add_text().unwrap();
        s.set_fill(Color::GOLD).unwrap();
        // 1 baseline + 4 mutations
        assert_eq!(s.history().len(), 5);
        assert_eq!(s.history().cursor(), Some(4));
    }

    #[test]
    fn undo_from_first_edit_returns_to_template() {
        let mut s = EditorSession::new().unwrap();
        s.add_rectangle().unwrap();
        assert!(s.undo().unwrap());
        assert_eq!(s.scene().len(), 2);
        assert_eq!(s.scene().count_kind("rect"), 1); // only the border
        assert!(!s.undo().unwrap()); // boundary no-op, template stays
        assert_eq!(s.scene().len(), 2);
    }

    #[test]
    fn two_rectangles_undo_redo_scenario() {
        let mut s = EditorSession::new().unwrap();
        s.add_rectangle().unwrap();
        let second = s.add_rectangle().unwrap();

        assert!(s.undo().unwrap());
        // One added rectangle left, plus the template border rect.
        assert_eq!(s.scene().count_kind("rect"), 2);

        assert!(s.redo().unwrap());
        assert_eq!(s.scene().count_kind("rect"), 3);
        let restored = s.scene().object(second).expect("second rect restored");
        assert_eq!((restored.left, restored.top), (100.0, 100.0));
    }

    #[test]
    fn undo_redo_roundtrip_is_byte_identical() {
        let mut s = EditorSession::new().unwrap();
        s.add_circle().unwrap();
        s.add_star(400.0, 300.0, 5, 50.0, 25.0).unwrap();

        let before = s.scene().snapshot().unwrap();
        s.undo().unwrap();
        s.redo().unwrap();
        assert_eq!(s.scene().snapshot().unwrap(), before);
    }

    #[test]
    fn mutation_after_undo_prunes_redo_branch() {
        let mut s = EditorSession::new().unwrap();
        s.add_rectangle().unwrap();
        s.add_circle().unwrap();
        s.add_text().unwrap(); // entries: 4

        s.undo().unwrap();
        s.undo().unwrap(); // cursor at entry 1

        s.add_triangle().unwrap();
        assert_eq!(s.history().len(), 3); // two pruned, one appended
        assert!(!s.redo().unwrap()); // redo is a no-op until another undo
        assert!(s.undo().unwrap());
    }

    #[test]
    fn restores_do_not_record() {
        let mut s = EditorSession::new().unwrap();
        s.add_rectangle().unwrap();
        let len = s.history().len();
        s.undo().unwrap();
        s.redo().unwrap();
        assert_eq!(s.history().len(), len);
    }

    #[test]
    fn selection_is_reconciled_by_identity_after_undo() {
        let mut s = EditorSession::new().unwrap();
        let id = s.add_rectangle().unwrap();
        assert_eq!(s.selection(), Some(id));

        s.undo().unwrap();
        // The rectangle no longer exists in the restored scene.
        assert_eq!(s.selection(), None);

        s.redo().unwrap();
        // Stale handles stay cleared; the caller must re-select.
        assert_eq!(s.selection(), None);
        s.select(id).unwrap();
        assert_eq!(s.selection(), Some(id));
    }

    #[test]
    fn template_border_cannot_be_selected() {
        let mut s = EditorSession::new().unwrap();
        let border_id = s.scene().objects()[0].id;
        assert!(matches!(
            s.select(border_id),
            Err(EditorError::NotSelectable)
        ));
    }

    #[test]
    fn property_edit_respects_the_variant_tag() {
        let mut s = EditorSession::new().unwrap();
        s.add_circle().unwrap();
        assert!(matches!(
            s.set_font_size(36.0),
            Err(EditorError::PropertyNotSupported {
                kind: "circle",
                property: "font size"
            })
        ));
        // A failed edit records nothing.
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn degenerate_polygon_is_rejected_and_not_recorded() {
        let mut s = EditorSession::new().unwrap();
        assert!(s.add_regular_polygon(400.0, 300.0, 60.0, 2).is_err());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.scene().len(), 2);
    }

    #[test]
    fn qr_insertion_is_one_mutation() {
        let mut s = EditorSession::new().unwrap();
        let id = s.add_qr_code("https://certs.example.com/verify/CERT-2024-001").unwrap();
        assert_eq!(s.history().len(), 2);

        let qr = s.scene().object(id).unwrap();
        assert_eq!((qr.left, qr.top), (650.0, 450.0));
        match &qr.shape {
            Shape::Image { source, .. } => assert!(s.images().contains(source)),
            other => panic!("expected image, got {}", other.tag()),
        }
    }

    #[test]
    fn uploaded_images_come_in_half_scale() {
        let mut s = EditorSession::new().unwrap();
        let decoded = DecodedImage {
            width: 8,
            height: 8,
            pixels: vec![Color::BLACK; 64],
        };
        let id = s.insert_uploaded_image("data:upload-1", decoded).unwrap();
        match &s.scene().object(id).unwrap().shape {
            Shape::Image {
                scale_x, scale_y, ..
            } => assert_eq!((*scale_x, *scale_y), (0.5, 0.5)),
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn history_caps_at_fifty_entries() {
        let mut s = EditorSession::new().unwrap();
        for _ in 0..60 {
            s.add_circle().unwrap();
        }
        assert_eq!(s.history().len(), 50);
        assert_eq!(s.history().cursor(), Some(49));
    }
}
