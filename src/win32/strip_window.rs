/*
 * Custom-WndProc window hosting a `TabStrip` along the top of a top-level
 * window. The window spans the strip's height; panels created through
 * `NativeControlFactory` live beside it as children of the same parent and
 * fill the content area below.
 *
 * Per-instance state is a heap-allocated `RefCell<StripWindowState>` in
 * GWLP_USERDATA, freed on WM_DESTROY. Each message borrows it for its own
 * duration only; a message that re-enters the window procedure while the
 * state is borrowed finds it busy and is deferred. After every message that
 * can mutate the strip the queued `TabStripEvent`s are handed to the host's
 * `StripWindowHandler`, and once the borrow is released repaints invalidate
 * the window and caption drags are forwarded to the root window as a
 * non-client caption press.
 *
 * A click is a button-down followed by a button-up over the same target.
 * Presses on free caption space start the window drag immediately.
 */

use super::gdi_surface::{GdiObjects, GdiSurface};
use crate::collaborators::Waker;
use crate::config::TabStripConfig;
use crate::error::{Result as ShellResult, ShellError};
use crate::strip::{HitTarget, TabStrip, hit_test};
use crate::types::{StripCommand, TabStripEvent};

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

use windows::Win32::{
    Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM},
    Graphics::Gdi::{BeginPaint, EndPaint, InvalidateRect, PAINTSTRUCT},
    System::LibraryLoader::GetModuleHandleW,
    UI::{
        Input::KeyboardAndMouse::{
            ReleaseCapture, SetCapture, TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent,
        },
        WindowsAndMessaging::{
            CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow,
            GET_ANCESTOR_FLAGS, GWLP_USERDATA,
            GetAncestor, GetCursorPos, GetWindowLongPtrW, HTCAPTION, HMENU, IDC_ARROW, LoadCursorW,
            MoveWindow, PostMessageW, RegisterClassW, SendMessageW, SetWindowLongPtrW,
            WINDOW_EX_STYLE, WM_APP, WM_DESTROY, WM_ERASEBKGND, WM_LBUTTONDOWN, WM_LBUTTONUP,
            WM_MOUSEMOVE, WM_NCLBUTTONDOWN, WM_PAINT, WNDCLASSW, WS_CHILD, WS_CLIPSIBLINGS,
            WS_VISIBLE,
        },
    },
};
use windows::core::{HSTRING, PCWSTR, w};

// WM_MOUSELEAVE is not exported by windows-rs; define the constant directly.
const WM_MOUSELEAVE: u32 = 0x02A3;

/// Posted by the completion waker; drains finished requests on this thread.
pub const WM_APP_COMPLETIONS: u32 = WM_APP + 0x40;

/// Bounds the replay loop when handlers keep issuing commands.
const MAX_EVENT_ROUNDS: usize = 8;

/// Host callbacks. Invoked on the UI thread with the strip borrowed mutably,
/// so handlers act on the strip they are given; `StripWindow::with_strip`
/// refuses to run from inside them.
pub trait StripWindowHandler {
    fn on_events(&mut self, strip: &mut TabStrip, events: &[TabStripEvent]);
}

struct StripWindowState {
    strip: TabStrip,
    objects: GdiObjects,
    handler: Box<dyn StripWindowHandler>,
    tracking_mouse: bool,
    pressed: Option<HitTarget>,
}

const STRIP_CLASS_NAME: PCWSTR = w!("TabShellCaptionStrip");
static STRIP_CLASS_REGISTERED: OnceLock<()> = OnceLock::new();

fn register_strip_class(h_instance: HINSTANCE) {
    STRIP_CLASS_REGISTERED.get_or_init(|| unsafe {
        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(strip_wnd_proc),
            hInstance: h_instance,
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hbrBackground: windows::Win32::Graphics::Gdi::HBRUSH(std::ptr::null_mut()),
            lpszClassName: STRIP_CLASS_NAME,
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            log::error!("[TabStrip] RegisterClassW failed for the strip window class");
        }
    });
}

/// Handle to a created strip window. The window owns its state; this handle
/// is only a way in for the host's own message handling.
#[derive(Debug, Clone, Copy)]
pub struct StripWindow {
    hwnd: HWND,
}

impl StripWindow {
    pub fn create(
        parent: HWND,
        config: TabStripConfig,
        handler: Box<dyn StripWindowHandler>,
    ) -> ShellResult<Self> {
        if parent.is_invalid() {
            return Err(ShellError::InvalidHandle("strip parent window".into()));
        }
        let h_instance: HINSTANCE = unsafe { GetModuleHandleW(PCWSTR::null())? }.into();
        register_strip_class(h_instance);

        let strip_height = config.metrics.strip_height;
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                STRIP_CLASS_NAME,
                &HSTRING::new(),
                WS_CHILD | WS_VISIBLE | WS_CLIPSIBLINGS,
                0,
                0,
                10,
                strip_height,
                Some(parent),
                Some(HMENU(std::ptr::null_mut())),
                Some(h_instance),
                None,
            )?
        };

        let mut objects = GdiObjects::new();
        let strip = match TabStrip::new(config, &mut objects, completion_waker(hwnd)) {
            Ok(strip) => strip,
            Err(e) => {
                let _ = unsafe { DestroyWindow(hwnd) };
                return Err(e);
            }
        };
        let state = Box::new(RefCell::new(StripWindowState {
            strip,
            objects,
            handler,
            tracking_mouse: false,
            pressed: None,
        }));
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize) };
        log::debug!("[TabStrip] strip window created hwnd={hwnd:?}");
        Ok(Self { hwnd })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Runs `f` against the hosted strip and replays whatever it queued.
    /// Returns `None` when the window is gone or its strip is already in
    /// use further up the stack, e.g. from inside
    /// `StripWindowHandler::on_events`.
    pub fn with_strip<R>(&self, f: impl FnOnce(&mut TabStrip) -> R) -> Option<R> {
        let cell = unsafe { state_cell(self.hwnd) }?;
        let result = with_state(self.hwnd, cell, |state| f(&mut state.strip));
        if result.is_none() {
            log::warn!("[TabStrip] with_strip called while the strip is busy");
        }
        result
    }

    /// Call from the parent's WM_SIZE with its client size.
    pub fn layout(&self, width: i32, height: i32) {
        let Some(cell) = (unsafe { state_cell(self.hwnd) }) else {
            return;
        };
        let hwnd = self.hwnd;
        let laid_out = with_state(hwnd, cell, |state| {
            let strip_height = state.strip.config().metrics.strip_height;
            if let Err(e) = unsafe { MoveWindow(hwnd, 0, 0, width, strip_height, true) } {
                log::warn!("[TabStrip] MoveWindow failed: {e:?}");
            }
            state.strip.resize(width, height);
        });
        if laid_out.is_none() {
            log::warn!("[TabStrip] layout skipped while the strip is busy");
        }
    }
}

fn completion_waker(hwnd: HWND) -> Waker {
    // HWND is not Send; the raw value is, and stays valid for PostMessageW
    // (a destroyed window just drops the message).
    let raw = hwnd.0 as isize;
    Arc::new(move || post_completions(HWND(raw as *mut _)))
}

fn post_completions(target: HWND) {
    if let Err(e) = unsafe { PostMessageW(Some(target), WM_APP_COMPLETIONS, WPARAM(0), LPARAM(0)) } {
        log::trace!("[Completions] wake-up not posted: {e:?}");
    }
}

unsafe fn state_cell<'a>(hwnd: HWND) -> Option<&'a RefCell<StripWindowState>> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const RefCell<StripWindowState>;
    unsafe { ptr.as_ref() }
}

fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

/// What the replayed events ask of the window once the state is released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Replay {
    repaint: bool,
    caption_drag: bool,
}

fn replay_events(state: &mut StripWindowState) -> Replay {
    let mut replay = Replay::default();
    for _ in 0..MAX_EVENT_ROUNDS {
        let events = state.strip.take_events();
        if events.is_empty() {
            return replay;
        }
        replay.repaint |= events.contains(&TabStripEvent::RepaintRequested);
        replay.caption_drag |= events.contains(&TabStripEvent::CaptionDragRequested);
        state.handler.on_events(&mut state.strip, &events);
    }
    log::warn!("[TabStrip] events still pending after {MAX_EVENT_ROUNDS} rounds");
    replay
}

/*
 * Runs `f` with exclusive access to the window state and replays the events
 * it queued. The borrow ends before anything that can pump messages back
 * into this window (the caption drag enters the system move loop). Returns
 * `None` without calling `f` when the state is already borrowed.
 */
fn with_state<R>(
    hwnd: HWND,
    cell: &RefCell<StripWindowState>,
    f: impl FnOnce(&mut StripWindowState) -> R,
) -> Option<R> {
    let (result, replay) = {
        let mut state = cell.try_borrow_mut().ok()?;
        let result = f(&mut state);
        (result, replay_events(&mut state))
    };
    if replay.repaint {
        let _ = unsafe { InvalidateRect(Some(hwnd), None, false) };
    }
    if replay.caption_drag {
        begin_caption_drag(hwnd);
    }
    Some(result)
}

/// Hands the press to the top-level window as if it hit its caption, which
/// starts the system move loop.
fn begin_caption_drag(hwnd: HWND) {
    unsafe {
        let root = GetAncestor(hwnd, GET_ANCESTOR_FLAGS(2)); // GA_ROOT
        if root.is_invalid() {
            return;
        }
        let mut cursor = POINT::default();
        let _ = GetCursorPos(&mut cursor);
        let packed = ((cursor.y as u16 as isize) << 16) | (cursor.x as u16 as isize);
        let _ = ReleaseCapture();
        SendMessageW(
            root,
            WM_NCLBUTTONDOWN,
            Some(WPARAM(HTCAPTION as usize)),
            Some(LPARAM(packed)),
        );
    }
}

/// A message arrived while the state was borrowed by an outer message.
fn busy_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    log::trace!("[TabStrip] message {msg:#06x} re-entered a busy strip window");
    match msg {
        // The update region stays invalid, so WM_PAINT comes again.
        WM_PAINT => LRESULT(0),
        WM_APP_COMPLETIONS => {
            post_completions(hwnd);
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn destroy_state(hwnd: HWND, cell: &RefCell<StripWindowState>) {
    if cell.try_borrow_mut().is_err() {
        // Freeing now would pull the state from under the outer message.
        log::error!("[TabStrip] strip window destroyed while in use; leaking its state");
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
        return;
    }
    unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
    let ptr = cell as *const RefCell<StripWindowState> as *mut RefCell<StripWindowState>;
    let state = unsafe { Box::from_raw(ptr) }.into_inner();
    let StripWindowState {
        mut strip,
        mut objects,
        ..
    } = state;
    strip.release_resources(&mut objects);
    log::debug!("[TabStrip] strip window destroyed hwnd={hwnd:?}");
}

unsafe extern "system" fn strip_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(cell) = (unsafe { state_cell(hwnd) }) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    let handled = match msg {
        WM_ERASEBKGND => {
            // WM_PAINT fills the entire strip.
            return LRESULT(1);
        }
        WM_DESTROY => {
            destroy_state(hwnd, cell);
            return LRESULT(0);
        }
        WM_PAINT => with_state(hwnd, cell, |state| {
            let mut ps = PAINTSTRUCT::default();
            let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
            if !hdc.is_invalid() {
                let mut surface = GdiSurface::new(hdc, &mut state.objects);
                state.strip.paint(&mut surface);
            }
            let _ = unsafe { EndPaint(hwnd, &ps) };
        }),
        WM_MOUSEMOVE => with_state(hwnd, cell, |state| {
            let (x, y) = point_from_lparam(lparam);
            state.strip.handle_pointer_move(x, y);
            if !state.tracking_mouse {
                let mut tme = TRACKMOUSEEVENT {
                    cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
                    dwFlags: TME_LEAVE,
                    hwndTrack: hwnd,
                    dwHoverTime: 0,
                };
                let _ = unsafe { TrackMouseEvent(&mut tme) };
                state.tracking_mouse = true;
            }
        }),
        WM_MOUSELEAVE => with_state(hwnd, cell, |state| {
            state.tracking_mouse = false;
            state.strip.handle_pointer_leave();
        }),
        WM_LBUTTONDOWN => with_state(hwnd, cell, |state| {
            let (x, y) = point_from_lparam(lparam);
            match hit_test(&state.strip.layout(), x, y) {
                HitTarget::Caption => {
                    state.pressed = None;
                    state.strip.execute(StripCommand::BeginCaptionDrag);
                }
                HitTarget::None => state.pressed = None,
                target => {
                    state.pressed = Some(target);
                    unsafe { SetCapture(hwnd) };
                }
            }
        }),
        WM_LBUTTONUP => with_state(hwnd, cell, |state| {
            let (x, y) = point_from_lparam(lparam);
            if let Some(pressed) = state.pressed.take() {
                let _ = unsafe { ReleaseCapture() };
                if hit_test(&state.strip.layout(), x, y) == pressed {
                    state.strip.handle_click(x, y);
                }
            }
        }),
        WM_APP_COMPLETIONS => with_state(hwnd, cell, |state| {
            state.strip.drain_completions();
        }),
        _ => return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    };

    match handled {
        Some(()) => LRESULT(0),
        None => busy_message(hwnd, msg, wparam, lparam),
    }
}
