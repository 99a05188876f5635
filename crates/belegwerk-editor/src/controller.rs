// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session controller — decodes the input image, seeds the quadrilateral,
// drives the edit session from host events, and resolves with either a
// processed JPEG or a cancellation.

use std::sync::Arc;

use belegwerk_core::config::{DragEngine, EditorConfig, WarpEngine};
use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_core::geometry::{Quad, ViewTransform};
use belegwerk_core::notice::humanize_error;
use belegwerk_core::types::{JPEG_QUALITY, SessionId};
use belegwerk_vision::{Raster, axis_aligned_crop};
use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::drag::{DragBackend, PointerDrag};
use crate::events::{EditorCommand, EditorEvent, InputEvent};
use crate::loader::{BackendLoader, LazyBackends};
use crate::session::EditSession;
use crate::surface::Surface;

/// The edit view is never fit below this long-side bound, so small output
/// caps don't produce an unusably tiny editing canvas.
const MIN_DISPLAY_BOUND: u32 = 1200;

/// Open an edit session over `bytes` and drive it to resolution.
///
/// Resolves with `Some(jpeg)` when the user applies, `None` when they cancel
/// (explicitly, via escape, or by closing the event channel). The only hard
/// error before resolution is a decode failure; apply-time warp failures
/// surface a notice on the `surface` and leave the session open for another
/// attempt.
///
/// The working raster is the display-fit image: detection, corner edits, and
/// the final warp all share its coordinate space.
#[instrument(skip_all, fields(data_len = bytes.len()))]
pub async fn edit<L, S>(
    bytes: &[u8],
    config: EditorConfig,
    backends: &LazyBackends<L>,
    surface: &mut S,
    mut events: mpsc::Receiver<EditorEvent>,
) -> Result<Option<Vec<u8>>>
where
    L: BackendLoader,
    S: Surface,
{
    let session_id = SessionId::new();

    let decoded = Raster::from_bytes(bytes)?;
    let base = decoded.fit_to(config.max_long_side.max(MIN_DISPLAY_BOUND));
    info!(
        session = %session_id,
        width = base.width(),
        height = base.height(),
        ?config,
        "Edit session opened"
    );

    surface.draw_base(base.as_dynamic());
    surface.apply_view(&ViewTransform::IDENTITY);

    let mut quad = Quad::inset_box(base.width() as f32, base.height() as f32);
    if config.auto_detect {
        if let Some(detected) = try_detect(&config, backends, base.as_dynamic()).await {
            info!(session = %session_id, "Auto-detection seeded the quadrilateral");
            quad = detected;
        }
    }

    let drag = resolve_drag_backend(&config, backends).await;
    let mut session = EditSession::new(base.into_dynamic(), quad, drag);
    surface.draw_overlay(&session.overlay_frame());

    loop {
        let Some(event) = events.recv().await else {
            info!(session = %session_id, "Event channel closed; resolving as cancelled");
            surface.teardown();
            return Ok(None);
        };

        match event {
            EditorEvent::Input(InputEvent::Escape)
            | EditorEvent::Command(EditorCommand::Cancel) => {
                info!(session = %session_id, "Session cancelled");
                surface.teardown();
                return Ok(None);
            }

            EditorEvent::Input(input) => {
                session.apply_input(input);
                surface.apply_view(session.view());
                surface.draw_overlay(&session.overlay_frame());
            }

            EditorEvent::Command(EditorCommand::Rotate) => {
                session.rotate();
                surface.draw_base(session.raster());
                surface.apply_view(session.view());
                surface.draw_overlay(&session.overlay_frame());
            }

            EditorEvent::Command(EditorCommand::Reset) => {
                // Re-run detection on the current (possibly rotated) raster;
                // keep the user's corners when nothing is found.
                if let Some(detected) = try_detect(&config, backends, session.raster()).await {
                    session.set_quad(detected);
                    surface.draw_overlay(&session.overlay_frame());
                }
            }

            EditorEvent::Command(EditorCommand::Apply) => {
                match apply_warp(&config, backends, &session).await {
                    Ok(jpeg) => {
                        info!(session = %session_id, bytes = jpeg.len(), "Session applied");
                        surface.teardown();
                        return Ok(Some(jpeg));
                    }
                    Err(err) => {
                        warn!(session = %session_id, error = %err, "Apply failed; session stays open");
                        surface.show_notice(&humanize_error(&err));
                    }
                }
            }
        }
    }
}

/// Attempt quadrilateral detection, degrading silently on every failure.
///
/// Under a projective configuration the vision backend is loaded on demand;
/// an axis-aligned session only consults a backend some earlier session
/// already paid to load.
async fn try_detect<L: BackendLoader>(
    config: &EditorConfig,
    backends: &LazyBackends<L>,
    image: &DynamicImage,
) -> Option<Quad> {
    let vision = match config.warp_engine {
        WarpEngine::Projective => match backends.vision().await {
            Ok(vision) => Some(vision),
            Err(err) => {
                warn!(error = %err, "Vision backend load failed; keeping current quadrilateral");
                None
            }
        },
        WarpEngine::AxisAligned => backends.vision_if_loaded(),
    }?;
    vision.detect_quadrilateral(image)
}

/// Rectify the current quadrilateral and encode the result as JPEG.
///
/// A missing or unavailable vision backend degrades to the axis-aligned crop
/// engine; any other warp or encode failure propagates so the caller can
/// surface it.
async fn apply_warp<L: BackendLoader>(
    config: &EditorConfig,
    backends: &LazyBackends<L>,
    session: &EditSession,
) -> Result<Vec<u8>> {
    let warped = match config.warp_engine {
        WarpEngine::Projective => match backends.vision().await {
            Ok(vision) => {
                match vision.warp_perspective(session.raster(), session.quad(), config.max_long_side)
                {
                    Ok(image) => image,
                    Err(BelegwerkError::BackendUnavailable) => {
                        warn!("Vision backend declined to warp; using axis-aligned crop");
                        axis_aligned_crop(session.raster(), session.quad(), config.max_long_side)
                    }
                    Err(err) => return Err(err),
                }
            }
            Err(err) => {
                warn!(error = %err, "Vision backend load failed; using axis-aligned crop");
                axis_aligned_crop(session.raster(), session.quad(), config.max_long_side)
            }
        },
        WarpEngine::AxisAligned => {
            axis_aligned_crop(session.raster(), session.quad(), config.max_long_side)
        }
    };

    Raster::from_dynamic(warped).to_jpeg_bytes(JPEG_QUALITY)
}

/// Pick the drag backend for this session, falling back to the built-in
/// pointer backend when the alternate one cannot be loaded.
async fn resolve_drag_backend<L: BackendLoader>(
    config: &EditorConfig,
    backends: &LazyBackends<L>,
) -> Arc<dyn DragBackend> {
    match config.drag_engine {
        DragEngine::Pointer => Arc::new(PointerDrag),
        DragEngine::Interact => match backends.drag().await {
            Ok(drag) => drag,
            Err(err) => {
                warn!(error = %err, "Drag backend load failed; using pointer dragging");
                Arc::new(PointerDrag)
            }
        },
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BundledLoader, UnavailableLoader};
    use crate::surface::HeadlessSurface;
    use belegwerk_core::error::Result;
    use belegwerk_vision::VisionBackend;
    use image::{GrayImage, Luma};

    fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([180u8])));
        Raster::from_dynamic(img).to_jpeg_bytes(90).unwrap()
    }

    fn channel_with(events: &[EditorEvent]) -> mpsc::Receiver<EditorEvent> {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.try_send(*event).unwrap();
        }
        // Dropping the sender closes the channel after the queued events,
        // which the controller treats as cancel.
        rx
    }

    /// Garbage input fails with a decode error before any surface work.
    #[tokio::test]
    async fn decode_failure_never_opens_the_session() {
        let backends = LazyBackends::new(BundledLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[]);

        let err = edit(b"not an image", EditorConfig::default(), &backends, &mut surface, rx)
            .await
            .unwrap_err();
        assert!(matches!(err, BelegwerkError::Decode(_)));
        assert!(surface.base_draws.is_empty());
        assert!(!surface.torn_down);
    }

    /// With no vision backend available, the default path still resolves:
    /// default inset quadrilateral, axis-aligned fallback, JPEG out.
    #[tokio::test]
    async fn default_path_resolves_without_vision_backend() {
        let backends = LazyBackends::new(UnavailableLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[EditorEvent::Command(EditorCommand::Apply)]);

        let result = edit(
            &gray_jpeg(1000, 800),
            EditorConfig::default(),
            &backends,
            &mut surface,
            rx,
        )
        .await
        .unwrap()
        .expect("apply should produce a blob");

        // 1000x800 fits the display bound unchanged; the 10%-inset default
        // quadrilateral crops to 800x640.
        let out = Raster::from_bytes(&result).unwrap();
        assert_eq!((out.width(), out.height()), (800, 640));
        assert!(surface.torn_down);
    }

    /// Cancel resolves with `None`, tears the surface down, and detaches the
    /// event channel so no further events are processed.
    #[tokio::test]
    async fn cancel_resolves_none_and_detaches() {
        let backends = LazyBackends::new(BundledLoader);
        let mut surface = HeadlessSurface::new();
        let (tx, rx) = mpsc::channel(4);
        tx.try_send(EditorEvent::Command(EditorCommand::Cancel)).unwrap();

        let result = edit(
            &gray_jpeg(300, 200),
            EditorConfig::default(),
            &backends,
            &mut surface,
            rx,
        )
        .await
        .unwrap();
        assert!(result.is_none());
        assert!(surface.torn_down);

        // The receiver died with the session; late events have nowhere to go.
        assert!(
            tx.send(EditorEvent::Command(EditorCommand::Apply))
                .await
                .is_err()
        );
    }

    /// Escape behaves exactly like cancel.
    #[tokio::test]
    async fn escape_cancels() {
        let backends = LazyBackends::new(BundledLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[EditorEvent::Input(InputEvent::Escape)]);

        let result = edit(
            &gray_jpeg(300, 200),
            EditorConfig::default(),
            &backends,
            &mut surface,
            rx,
        )
        .await
        .unwrap();
        assert!(result.is_none());
        assert!(surface.torn_down);
    }

    /// A vision backend that fails to warp surfaces a notice and leaves the
    /// session open; the user can still cancel.
    #[tokio::test]
    async fn apply_failure_keeps_session_open() {
        struct BrokenWarp;

        impl VisionBackend for BrokenWarp {
            fn detect_quadrilateral(&self, _image: &DynamicImage) -> Option<Quad> {
                None
            }

            fn warp_perspective(
                &self,
                _image: &DynamicImage,
                _quad: &Quad,
                _max_long_side: u32,
            ) -> Result<DynamicImage> {
                Err(BelegwerkError::Warp("resampling exploded".into()))
            }
        }

        struct BrokenLoader;

        impl BackendLoader for BrokenLoader {
            async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>> {
                Ok(Arc::new(BrokenWarp))
            }

            async fn load_drag(&self) -> Result<Arc<dyn DragBackend>> {
                Err(BelegwerkError::BackendUnavailable)
            }
        }

        let backends = LazyBackends::new(BrokenLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[
            EditorEvent::Command(EditorCommand::Apply),
            EditorEvent::Command(EditorCommand::Cancel),
        ]);

        let result = edit(
            &gray_jpeg(300, 200),
            EditorConfig::default(),
            &backends,
            &mut surface,
            rx,
        )
        .await
        .unwrap();

        assert!(result.is_none(), "failed apply must not resolve the session");
        assert_eq!(surface.notices.len(), 1);
        assert!(surface.notices[0].recoverable);
        assert!(surface.torn_down);
    }

    /// Rotation redraws the base raster with swapped dimensions.
    #[tokio::test]
    async fn rotate_redraws_base() {
        let backends = LazyBackends::new(UnavailableLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[
            EditorEvent::Command(EditorCommand::Rotate),
            EditorEvent::Command(EditorCommand::Cancel),
        ]);

        edit(
            &gray_jpeg(640, 480),
            EditorConfig::default(),
            &backends,
            &mut surface,
            rx,
        )
        .await
        .unwrap();

        assert_eq!(surface.base_draws, vec![(640, 480), (480, 640)]);
    }

    /// Auto-detection on a clear synthetic rectangle seeds the quadrilateral
    /// with the detected corners instead of the default inset box.
    #[tokio::test]
    async fn detection_seeds_quad() {
        let mut img = GrayImage::from_pixel(400, 500, Luma([15u8]));
        for y in 60..440 {
            for x in 50..350 {
                img.put_pixel(x, y, Luma([240u8]));
            }
        }
        let bytes = Raster::from_dynamic(DynamicImage::ImageLuma8(img))
            .to_png_bytes()
            .unwrap();

        let backends = LazyBackends::new(BundledLoader);
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[EditorEvent::Command(EditorCommand::Cancel)]);

        edit(&bytes, EditorConfig::default(), &backends, &mut surface, rx)
            .await
            .unwrap();

        let seeded = surface.overlay_frames[0].quad;
        let (min_x, min_y, max_x, max_y) = seeded.bounding_box();
        assert!((min_x - 50.0).abs() < 10.0, "left edge near 50, got {min_x}");
        assert!((min_y - 60.0).abs() < 10.0, "top edge near 60, got {min_y}");
        assert!((max_x - 350.0).abs() < 10.0, "right edge near 350, got {max_x}");
        assert!((max_y - 440.0).abs() < 10.0, "bottom edge near 440, got {max_y}");
    }

    /// An explicit axis-aligned configuration never loads the vision backend.
    #[tokio::test]
    async fn axis_aligned_config_skips_backend_load() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct TattlingLoader(Arc<AtomicUsize>);

        impl BackendLoader for TattlingLoader {
            async fn load_vision(&self) -> Result<Arc<dyn VisionBackend>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(belegwerk_vision::ContourVision))
            }

            async fn load_drag(&self) -> Result<Arc<dyn DragBackend>> {
                Ok(Arc::new(PointerDrag))
            }
        }

        let loads = Arc::new(AtomicUsize::new(0));
        let backends = LazyBackends::new(TattlingLoader(Arc::clone(&loads)));
        let mut surface = HeadlessSurface::new();
        let rx = channel_with(&[EditorEvent::Command(EditorCommand::Apply)]);

        let config = EditorConfig {
            warp_engine: WarpEngine::AxisAligned,
            ..EditorConfig::default()
        };
        let result = edit(&gray_jpeg(500, 400), config, &backends, &mut surface, rx)
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }
}
