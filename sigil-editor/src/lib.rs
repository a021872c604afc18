//! sigil-editor: the certificate editor core.
//!
//! A session owns one scene plus its undo/redo history; export renders the
//! scene to a raster for download or for the send-certificate transport.
//! All scene mutation, history recording and rendering happen on the
//! caller's single thread of control; the session itself never does I/O.

pub mod draw;
pub mod export;
pub mod font;
pub mod history;
pub mod qr;
pub mod raster;
pub mod session;

pub use export::{export_base64_png, export_png, ExportError, EXPORT_SCALE};
pub use history::{History, DEFAULT_MAX_ENTRIES};
pub use raster::{DecodedImage, ImageCache, Raster};
pub use session::{ActiveTool, EditorError, EditorSession};
