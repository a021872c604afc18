use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use sigil_api::ElementRecord;
use sigil_editor::{DecodedImage, EditorSession, EXPORT_SCALE};
use sigil_scene::Color;
use uuid::Uuid;

#[test]
fn design_export_send_roundtrip() {
    let mut session = EditorSession::new().unwrap();

    session.add_rectangle().unwrap();
    session.add_regular_polygon(400.0, 300.0, 60.0, 6).unwrap();
    session.add_star(550.0, 300.0, 5, 50.0, 25.0).unwrap();
    session
        .add_qr_code("https://certs.example.com/verify/CERT-2024-001")
        .unwrap();

    // A gallery asset completes its load and performs one mutation.
    let record = ElementRecord {
        id: Uuid::new_v4(),
        title: "Gold Seal".into(),
        category: "seals".into(),
        image_url: "https://cdn.example.com/elements/gold-seal.png".into(),
        created_at: Utc::now(),
    };
    let decoded = DecodedImage {
        width: 12,
        height: 12,
        pixels: vec![Color::GOLD; 144],
    };
    session.insert_asset(&record, decoded).unwrap();

    // Baseline + five mutations.
    assert_eq!(session.history().len(), 6);

    // The transport encoding is a base64 PNG at export resolution.
    let b64 = session.export_base64_png().unwrap();
    let png = BASE64.decode(b64).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 800 * EXPORT_SCALE);
    assert_eq!(decoded.height(), 600 * EXPORT_SCALE);

    // Undo everything back to the template; export still works.
    while session.undo().unwrap() {}
    assert_eq!(session.scene().len(), 2);
    assert!(session.export_png().is_ok());

    // Redo all the way forward again.
    while session.redo().unwrap() {}
    assert_eq!(session.scene().len(), 7);
}
