/*
 * Native Win32 controls behind the `Control`/`ControlFactory` seam. Every
 * control is a plain child window of the host's top-level window, created
 * hidden; panels show and position them. List and tree views are list boxes
 * filled one line per item, since panels only ever hand them display text.
 */

use crate::error::{Result as ShellResult, ShellError};
use crate::panels::{Control, ControlFactory};
use crate::types::{ControlId, Rect};

use windows::Win32::{
    Foundation::{HINSTANCE, HWND, LPARAM, WPARAM},
    System::LibraryLoader::GetModuleHandleW,
    UI::WindowsAndMessaging::{
        BN_CLICKED, BS_PUSHBUTTON, CreateWindowExW, DestroyWindow, ES_AUTOHSCROLL, ES_AUTOVSCROLL,
        ES_MULTILINE, GetWindowTextLengthW, GetWindowTextW, HMENU, MoveWindow, SW_HIDE, SW_SHOW,
        SendMessageW, SetWindowTextW, ShowWindow, WINDOW_EX_STYLE, WINDOW_STYLE, WS_BORDER,
        WS_CHILD, WS_EX_CLIENTEDGE, WS_TABSTOP, WS_VSCROLL,
    },
};
use windows::core::{HSTRING, PCWSTR, w};

const WC_STATIC: PCWSTR = w!("STATIC");
const WC_EDIT: PCWSTR = w!("EDIT");
const WC_BUTTON: PCWSTR = w!("BUTTON");
const WC_LISTBOX: PCWSTR = w!("LISTBOX");
const WC_COMBOBOX: PCWSTR = w!("COMBOBOX");

const LBS_NOINTEGRALHEIGHT: u32 = 0x0100;
const LB_ADDSTRING: u32 = 0x0180;
const LB_RESETCONTENT: u32 = 0x0184;

const CBS_DROPDOWNLIST: u32 = 0x0003;
const CBS_HASSTRINGS: u32 = 0x0200;
const CB_ADDSTRING: u32 = 0x0143;
const CB_SELECTSTRING: u32 = 0x014D;
const CB_ERR: isize = -1;

/// Dropdown height for combo boxes; the closed control is sized by `move_to`.
const COMBO_DROP_HEIGHT: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeKind {
    Label,
    Edit { multiline: bool },
    Button,
    List,
    Combo,
}

struct NativeControl {
    hwnd: HWND,
    id: ControlId,
    kind: NativeKind,
    /// Items shown by list boxes, kept so `text` does not read them back.
    lines: Vec<String>,
}

impl NativeControl {
    fn fill_list(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
        unsafe {
            SendMessageW(self.hwnd, LB_RESETCONTENT, Some(WPARAM(0)), Some(LPARAM(0)));
            for line in &self.lines {
                let item = HSTRING::from(line.as_str());
                SendMessageW(
                    self.hwnd,
                    LB_ADDSTRING,
                    Some(WPARAM(0)),
                    Some(LPARAM(item.as_ptr() as isize)),
                );
            }
        }
    }

    fn select_combo_item(&self, text: &str) {
        let item = HSTRING::from(text);
        let result = unsafe {
            SendMessageW(
                self.hwnd,
                CB_SELECTSTRING,
                Some(WPARAM(usize::MAX)),
                Some(LPARAM(item.as_ptr() as isize)),
            )
        };
        if result.0 == CB_ERR {
            log::warn!("[Controls] combo box has no item '{text}'");
        }
    }
}

impl Drop for NativeControl {
    fn drop(&mut self) {
        let _ = unsafe { DestroyWindow(self.hwnd) };
    }
}

impl Control for NativeControl {
    fn id(&self) -> ControlId {
        self.id
    }

    fn show(&mut self) {
        let _ = unsafe { ShowWindow(self.hwnd, SW_SHOW) };
    }

    fn hide(&mut self) {
        let _ = unsafe { ShowWindow(self.hwnd, SW_HIDE) };
    }

    fn move_to(&mut self, rect: Rect) {
        let height = match self.kind {
            NativeKind::Combo => rect.height().max(COMBO_DROP_HEIGHT),
            _ => rect.height(),
        };
        if let Err(e) = unsafe { MoveWindow(self.hwnd, rect.left, rect.top, rect.width(), height, true) } {
            log::warn!("[Controls] MoveWindow failed for {:?}: {e:?}", self.kind);
        }
    }

    fn text(&self) -> String {
        match self.kind {
            NativeKind::List => self.lines.join("\n"),
            NativeKind::Edit { multiline: true } => read_window_text(self.hwnd).replace("\r\n", "\n"),
            _ => read_window_text(self.hwnd),
        }
    }

    fn set_text(&mut self, text: &str) {
        let text = match self.kind {
            NativeKind::List => return self.fill_list(text),
            NativeKind::Combo => return self.select_combo_item(text),
            NativeKind::Edit { multiline: true } => to_crlf(text),
            _ => text.to_string(),
        };
        if let Err(e) = unsafe { SetWindowTextW(self.hwnd, &HSTRING::from(text.as_str())) } {
            log::warn!("[Controls] SetWindowTextW failed for {:?}: {e:?}", self.kind);
        }
    }
}

fn read_window_text(hwnd: HWND) -> String {
    read_text_with(
        || unsafe { GetWindowTextLengthW(hwnd) },
        |buf| unsafe { GetWindowTextW(hwnd, buf) },
    )
}

fn read_text_with<FLen, FGet>(get_len: FLen, get_text: FGet) -> String
where
    FLen: Fn() -> i32,
    FGet: Fn(&mut [u16]) -> i32,
{
    let len = get_len().max(0) as usize;
    let mut buffer = vec![0u16; len + 1];
    let copied = get_text(&mut buffer).max(0) as usize;
    buffer.truncate(copied.min(len));
    String::from_utf16_lossy(&buffer)
}

/// Edit controls only break lines on CRLF.
fn to_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Decodes the parent window's WM_COMMAND. Returns the id of the button
/// when the notification is BN_CLICKED from a child control, which the host
/// hands to `TabStrip::handle_button_click`.
pub fn clicked_button(wparam: WPARAM, lparam: LPARAM) -> Option<ControlId> {
    let notification = (wparam.0 >> 16) & 0xFFFF;
    if lparam.0 == 0 || notification != BN_CLICKED as usize {
        return None;
    }
    Some(ControlId(wparam.0 & 0xFFFF))
}

pub struct NativeControlFactory {
    parent: HWND,
    h_instance: HINSTANCE,
    next_id: usize,
}

impl NativeControlFactory {
    /// Control ids start at `first_id` so they do not clash with the host's.
    pub fn new(parent: HWND, first_id: usize) -> ShellResult<Self> {
        if parent.is_invalid() {
            return Err(ShellError::InvalidHandle("control parent window".into()));
        }
        let module = unsafe { GetModuleHandleW(PCWSTR::null())? };
        Ok(Self {
            parent,
            h_instance: module.into(),
            next_id: first_id,
        })
    }

    fn create(
        &mut self,
        class: PCWSTR,
        text: &str,
        style: WINDOW_STYLE,
        ex_style: WINDOW_EX_STYLE,
        kind: NativeKind,
    ) -> ShellResult<NativeControl> {
        let id = self.next_id;
        self.next_id += 1;
        let hwnd = unsafe {
            CreateWindowExW(
                ex_style,
                class,
                &HSTRING::from(text),
                WS_CHILD | style,
                0,
                0,
                10,
                10,
                Some(self.parent),
                Some(HMENU(id as *mut _)),
                Some(self.h_instance),
                None,
            )?
        };
        log::debug!("[Controls] created {kind:?} id={id} hwnd={hwnd:?}");
        Ok(NativeControl {
            hwnd,
            id: ControlId(id),
            kind,
            lines: Vec::new(),
        })
    }
}

impl ControlFactory for NativeControlFactory {
    fn create_label(&mut self, text: &str) -> ShellResult<Box<dyn Control>> {
        let label = self.create(WC_STATIC, text, WINDOW_STYLE(0), WINDOW_EX_STYLE(0), NativeKind::Label)?;
        Ok(Box::new(label))
    }

    fn create_input(&mut self, text: &str, multiline: bool) -> ShellResult<Box<dyn Control>> {
        let mut style = WS_BORDER | WS_TABSTOP;
        if multiline {
            style |= WS_VSCROLL
                | WINDOW_STYLE(ES_MULTILINE as u32)
                | WINDOW_STYLE(ES_AUTOVSCROLL as u32);
        } else {
            style |= WINDOW_STYLE(ES_AUTOHSCROLL as u32);
        }
        let text = if multiline { to_crlf(text) } else { text.to_string() };
        let edit = self.create(
            WC_EDIT,
            &text,
            style,
            WINDOW_EX_STYLE(0),
            NativeKind::Edit { multiline },
        )?;
        Ok(Box::new(edit))
    }

    fn create_button(&mut self, text: &str) -> ShellResult<Box<dyn Control>> {
        let button = self.create(
            WC_BUTTON,
            text,
            WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32),
            WINDOW_EX_STYLE(0),
            NativeKind::Button,
        )?;
        Ok(Box::new(button))
    }

    fn create_list_view(&mut self) -> ShellResult<Box<dyn Control>> {
        let list = self.create(
            WC_LISTBOX,
            "",
            WS_VSCROLL | WINDOW_STYLE(LBS_NOINTEGRALHEIGHT),
            WS_EX_CLIENTEDGE,
            NativeKind::List,
        )?;
        Ok(Box::new(list))
    }

    fn create_tree_view(&mut self) -> ShellResult<Box<dyn Control>> {
        self.create_list_view()
    }

    fn create_combo_box(&mut self, items: &[&str]) -> ShellResult<Box<dyn Control>> {
        let combo = self.create(
            WC_COMBOBOX,
            "",
            WS_TABSTOP | WS_VSCROLL | WINDOW_STYLE(CBS_DROPDOWNLIST | CBS_HASSTRINGS),
            WINDOW_EX_STYLE(0),
            NativeKind::Combo,
        )?;
        for item in items {
            let h_item = HSTRING::from(*item);
            unsafe {
                SendMessageW(
                    combo.hwnd,
                    CB_ADDSTRING,
                    Some(WPARAM(0)),
                    Some(LPARAM(h_item.as_ptr() as isize)),
                );
            }
        }
        Ok(Box::new(combo))
    }
}
