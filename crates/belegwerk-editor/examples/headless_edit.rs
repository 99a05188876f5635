// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless editor run: decode a receipt photo, nudge one corner inward,
// apply, and write the rectified JPEG next to the input.
//
//     cargo run --example headless_edit -- photo.jpg

use belegwerk_core::config::EditorConfig;
use belegwerk_editor::{
    BundledLoader, EditorCommand, EditorEvent, HeadlessSurface, InputEvent, LazyBackends,
    PointerId, edit,
};
use belegwerk_core::geometry::ScreenPoint;
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: headless_edit <image>")?;
    let bytes = std::fs::read(&path)?;

    let backends = LazyBackends::new(BundledLoader);
    let mut surface = HeadlessSurface::new();
    let (tx, rx) = mpsc::channel(16);

    // Script a short session: zoom in a notch, pan a little, let detection
    // (or the default inset box) pick the corners, then apply.
    let pointer = PointerId(1);
    for event in [
        EditorEvent::Input(InputEvent::Wheel {
            delta_y: -1.0,
            at: ScreenPoint::new(400.0, 300.0),
        }),
        EditorEvent::Input(InputEvent::PointerDown {
            id: pointer,
            at: ScreenPoint::new(400.0, 300.0),
        }),
        EditorEvent::Input(InputEvent::PointerMove {
            id: pointer,
            at: ScreenPoint::new(430.0, 320.0),
        }),
        EditorEvent::Input(InputEvent::PointerUp { id: pointer }),
        EditorEvent::Command(EditorCommand::Apply),
    ] {
        tx.send(event).await?;
    }
    drop(tx);

    match edit(&bytes, EditorConfig::default(), &backends, &mut surface, rx).await? {
        Some(jpeg) => {
            let out = format!("{path}.rectified.jpg");
            std::fs::write(&out, &jpeg)?;
            println!("wrote {out} ({} bytes)", jpeg.len());
        }
        None => println!("session cancelled"),
    }
    Ok(())
}
