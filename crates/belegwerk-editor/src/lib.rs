// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// belegwerk-editor — The interactive edge-edit session for photographed
// receipts.
//
// The session state machine, gesture handling, and view transform live here,
// behind two injected capabilities: a `Surface` the host renders with, and a
// `BackendLoader` that lazily provides the optional vision and drag
// backends. The public entry point is [`controller::edit`].

pub mod controller;
pub mod drag;
pub mod events;
pub mod loader;
pub mod loupe;
pub mod session;
pub mod surface;

pub use controller::edit;
pub use drag::{DragBackend, PointerDrag};
pub use events::{EditorCommand, EditorEvent, InputEvent, PointerId};
pub use loader::{BackendLoader, BundledLoader, LazyBackends, UnavailableLoader};
pub use loupe::{Loupe, SourceRect};
pub use session::EditSession;
pub use surface::{HeadlessSurface, OverlayFrame, Surface};
