/*
 * tabshell: an owner-drawn caption tab strip with per-tab panel switching for
 * desktop HTTP-client shells. Each tab binds to one panel group; activating a
 * tab flushes the outgoing panel into its tab, then loads the incoming tab's
 * content into the shared panel of its group.
 *
 * Layout, hit-testing, hover tracking, painting and tab bookkeeping are
 * platform-agnostic and drive injected `DrawingSurface` and `ControlFactory`
 * implementations, so they compile and test on every platform. The Win32
 * backend supplying GDI drawing, the host window and native controls is only
 * built on Windows.
 */
pub mod collaborators;
pub mod config;
pub mod content;
pub mod drawing;
pub mod error;
pub mod panels;
pub mod strip;
pub(crate) mod styling_primitives;
pub mod types;
#[cfg(target_os = "windows")]
pub mod win32;

pub use collaborators::{
    Completion, CompletionCallback, CompletionSender, ExecutorError, PersistenceError,
    PersistenceStore, RequestExecutor, Waker,
};
pub use config::{TabStripConfig, TabStripMetrics};
pub use content::{
    Header, HttpMethod, NodeId, ProjectContent, ProjectTree, RequestContent, RequestSpec,
    ResponseRecord, Settings, SettingsContent, TabContent,
};
pub use drawing::{BrushId, DrawingSurface, FontId, PenId, ResourceFactory, TextFormat};
pub use error::{Result as ShellResult, ShellError};
pub use panels::{
    Control, ControlFactory, Panel, PanelAction, PanelRegistry, ProjectPanel, RequestPanel,
    SettingsPanel,
};
pub use strip::{HitTarget, HoverState, StripLayout, TabStrip};
pub use styling_primitives::{Color, FontDescription, FontWeight, TabStripPalette};
pub use types::{ControlId, PanelGroupId, Point, Rect, StripCommand, TabId, TabStripEvent};
