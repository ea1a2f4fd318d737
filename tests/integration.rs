// SPDX-License-Identifier: MPL-2.0
//! End-to-end tests driving a whole edit session: load, overlapping
//! adjustment previews, crop, undo, remote edit, and session persistence
//! through the blob store.

use darkroom_core::application::port::{InMemoryBlobStore, RemoteEditError, RemoteEditor};
use darkroom_core::domain::editing::{AdjustmentPercent, Hotspot};
use darkroom_core::domain::media::RawImage;
use darkroom_core::media::adjustments::AdjustmentParams;
use darkroom_core::media::image_transform::{encode_png, CropRect};
use darkroom_core::media::worker::AdjustmentResponse;
use darkroom_core::session::{Autosaver, SessionStore, ViewPoint};
use darkroom_core::{EditSession, EngineConfig};
use std::time::Duration;

fn encoded_image(width: u32, height: u32, fill: [u8; 4]) -> Vec<u8> {
    let pixels: Vec<u8> = fill
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    let image = RawImage::from_rgba(width, height, pixels).unwrap();
    encode_png(&image).unwrap()
}

fn brightness(value: i32) -> AdjustmentParams {
    AdjustmentParams {
        brightness: AdjustmentPercent::new(value),
        ..AdjustmentParams::default()
    }
}

/// Remote editor that always answers with a fixed green image and records
/// the hotspot it received.
struct GreenScreen {
    seen_hotspot: std::sync::Mutex<Option<Hotspot>>,
}

impl GreenScreen {
    fn new() -> Self {
        Self {
            seen_hotspot: std::sync::Mutex::new(None),
        }
    }
}

impl RemoteEditor for GreenScreen {
    async fn edit_image(
        &self,
        _source: &[u8],
        _instruction: &str,
        hotspot: Option<Hotspot>,
    ) -> Result<Vec<u8>, RemoteEditError> {
        *self.seen_hotspot.lock().unwrap() = hotspot;
        Ok(encoded_image(6, 6, [0, 200, 0, 255]))
    }
}

#[tokio::test]
async fn full_editing_flow_with_overlapping_previews() {
    let mut session = EditSession::new(&EngineConfig::default());
    session
        .load_image(encoded_image(8, 8, [120, 120, 120, 255]))
        .unwrap();

    // Rapid slider drag: three requests, only the last may win.
    session.request_adjustment(brightness(10)).unwrap();
    session.request_adjustment(brightness(20)).unwrap();
    let last = session.request_adjustment(brightness(30)).unwrap();

    let mut applied = Vec::new();
    for _ in 0..3 {
        let outcome = session.next_adjustment_outcome().await.unwrap().unwrap();
        if let darkroom_core::session::AdjustmentOutcome::Applied { sequence, .. } = outcome {
            applied.push(sequence);
        }
    }
    assert_eq!(applied, vec![last]);
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_adjusting());

    session.commit_adjustments();

    // Crop grows history; undo walks back to the adjusted full frame.
    session
        .apply_crop(CropRect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        })
        .unwrap();
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.native_size(), Some((4, 4)));

    assert!(session.undo());
    assert_eq!(session.native_size(), Some((8, 8)));
    assert!(session.history().can_redo());

    // A fresh edit after undo prunes the redo branch.
    session
        .apply_crop(CropRect {
            x: 1,
            y: 1,
            width: 6,
            height: 6,
        })
        .unwrap();
    assert!(!session.history().can_redo());
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn remote_edit_receives_the_native_resolution_hotspot() {
    let mut session = EditSession::new(&EngineConfig::default());
    session
        .load_image(encoded_image(8, 8, [50, 50, 50, 255]))
        .unwrap();

    // Image displayed at half size; click at (2,2) maps to native (4,4).
    session.select_hotspot(ViewPoint::new(2.0, 2.0), (4, 4));

    let editor = GreenScreen::new();
    session
        .apply_remote_edit(&editor, "replace the sky")
        .await
        .unwrap();

    assert_eq!(*editor.seen_hotspot.lock().unwrap(), Some(Hotspot::new(4, 4)));
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.native_size(), Some((6, 6)));
    assert!(session.hotspot().is_none());
}

#[tokio::test]
async fn stale_worker_response_never_reaches_history() {
    let mut session = EditSession::new(&EngineConfig::default());
    session
        .load_image(encoded_image(4, 4, [10, 10, 10, 255]))
        .unwrap();
    let original_id = session.history().current().unwrap().id();

    let superseded = session.request_adjustment(brightness(10)).unwrap();
    session.request_adjustment(brightness(90)).unwrap();

    // Hand-deliver the superseded response as if it raced ahead.
    let fabricated = AdjustmentResponse {
        sequence: superseded,
        result: Ok(RawImage::from_rgba(4, 4, vec![255; 64]).unwrap()),
    };
    let outcome = session.handle_adjustment_response(fabricated).unwrap();
    assert!(matches!(
        outcome,
        darkroom_core::session::AdjustmentOutcome::Stale { .. }
    ));
    assert_eq!(session.history().current().unwrap().id(), original_id);
}

#[tokio::test(start_paused = true)]
async fn session_survives_a_save_restore_cycle() {
    let config = EngineConfig::default();
    let blobs = InMemoryBlobStore::new();
    let saver = Autosaver::spawn(SessionStore::new(blobs.clone()), config.save_debounce);

    let captured = {
        let mut session = EditSession::new(&EngineConfig::default());
        session
            .load_image(encoded_image(8, 8, [90, 60, 30, 255]))
            .unwrap();
        session
            .apply_crop(CropRect {
                x: 0,
                y: 0,
                width: 5,
                height: 5,
            })
            .unwrap();
        session.undo();
        session
            .viewport_mut()
            .zoom_about(2.0, ViewPoint::new(50.0, 50.0));

        let captured = session.capture_session().unwrap();
        saver.schedule(Some(captured.clone()));
        captured
    };

    tokio::time::sleep(Duration::from_millis(900)).await;

    // A new process: load once at startup and rehydrate.
    let store = SessionStore::new(blobs.clone());
    let loaded = store.load().await.expect("session should have been saved");
    assert_eq!(loaded, captured);

    let mut revived = EditSession::new(&EngineConfig::default());
    revived.restore_session(loaded).unwrap();

    assert_eq!(revived.history().len(), 2);
    assert_eq!(revived.history().cursor(), Some(0));
    assert_eq!(revived.native_size(), Some((8, 8)));
    assert_eq!(revived.viewport().scale(), 2.0);
    assert!(revived.history().can_redo());

    // Emptying the session deletes the stored record.
    saver.schedule(None);
    saver.shutdown().await;
    assert!(blobs.is_empty().await);
}
