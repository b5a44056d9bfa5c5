/*
 * Win32 backend: GDI drawing, the strip host window and native panel
 * controls. Everything above this module is platform-agnostic.
 */

mod gdi_surface;
mod native_controls;
mod strip_window;

pub use gdi_surface::{GdiObjects, GdiSurface};
pub use native_controls::{NativeControlFactory, clicked_button};
pub use strip_window::{StripWindow, StripWindowHandler, WM_APP_COMPLETIONS};
