/*
 * Per-tab payloads. Every panel group owns exactly one `TabContent` variant,
 * and a tab exclusively owns its content from creation until it is closed.
 * Panels resolve the variant by matching on it; a mismatched variant is
 * simply not theirs to touch.
 */

mod project_tree;

pub use project_tree::{NodeId, ProjectNode, ProjectTree};

use crate::types::PanelGroupId;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<HttpMethod> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// What a request tab sends. Owned by the tab, cloned when dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: String,
}

impl RequestSpec {
    /// One `Name: value` line per header.
    pub fn headers_text(&self) -> String {
        self.headers
            .iter()
            .map(|h| format!("{}: {}", h.name, h.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parses `Name: value` lines. Blank lines and lines without a colon or
    /// with an empty name are dropped.
    pub fn parse_headers(text: &str) -> Vec<Header> {
        text.lines()
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(Header {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub status: u16,
    pub elapsed: Duration,
    pub body: String,
}

impl ResponseRecord {
    /// The one-line form shown in a history list.
    pub fn summary(&self) -> String {
        format!(
            "{} ({} ms, {} bytes)",
            self.status,
            self.elapsed.as_millis(),
            self.body.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContent {
    pub request: RequestSpec,
    /// Newest first.
    pub history: Vec<ResponseRecord>,
    pub status: String,
}

impl RequestContent {
    pub fn new(request: RequestSpec) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    /// Records a response, keeping at most `limit` entries (newest kept).
    pub fn push_response(&mut self, record: ResponseRecord, limit: usize) {
        self.status = format!("HTTP {}", record.summary());
        self.history.insert(0, record);
        self.history.truncate(limit);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContent {
    pub tree: ProjectTree,
    /// Where the project was loaded from or last saved to.
    pub path: Option<PathBuf>,
}

impl ProjectContent {
    pub fn new(tree: ProjectTree) -> Self {
        Self { tree, path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub request_timeout: Duration,
    pub certificate_path: Option<PathBuf>,
    pub verify_tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            certificate_path: None,
            verify_tls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsContent {
    pub settings: Settings,
}

/// The opaque per-tab state, one variant per panel group.
#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    Request(RequestContent),
    Project(ProjectContent),
    Settings(SettingsContent),
}

impl TabContent {
    pub fn panel_group(&self) -> PanelGroupId {
        match self {
            TabContent::Request(_) => PanelGroupId::RequestEditor,
            TabContent::Project(_) => PanelGroupId::ProjectTree,
            TabContent::Settings(_) => PanelGroupId::Settings,
        }
    }

    /// A fresh, empty payload for `group`.
    pub fn default_for(group: PanelGroupId) -> TabContent {
        match group {
            PanelGroupId::RequestEditor => TabContent::Request(RequestContent::default()),
            PanelGroupId::ProjectTree => {
                TabContent::Project(ProjectContent::new(ProjectTree::new("Untitled")))
            }
            PanelGroupId::Settings => TabContent::Settings(SettingsContent::default()),
        }
    }

    pub fn as_request(&self) -> Option<&RequestContent> {
        match self {
            TabContent::Request(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_request_mut(&mut self) -> Option<&mut RequestContent> {
        match self {
            TabContent::Request(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectContent> {
        match self {
            TabContent::Project(content) => Some(content),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headers_parse_and_render_symmetrically() {
        let text = "Accept: application/json\n\n  X-Trace : abc:def\nbroken line\n: no-name";
        let headers = RequestSpec::parse_headers(text);
        assert_eq!(
            headers,
            vec![
                Header {
                    name: "Accept".into(),
                    value: "application/json".into()
                },
                Header {
                    name: "X-Trace".into(),
                    value: "abc:def".into()
                },
            ]
        );

        let spec = RequestSpec {
            headers,
            ..RequestSpec::default()
        };
        assert_eq!(spec.headers_text(), "Accept: application/json\nX-Trace: abc:def");
    }

    #[test]
    fn method_parse_ignores_case_and_whitespace() {
        assert_eq!(HttpMethod::parse(" post "), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn history_keeps_newest_within_limit() {
        let mut content = RequestContent::default();
        for status in [200, 404, 500] {
            content.push_response(
                ResponseRecord {
                    status,
                    elapsed: Duration::from_millis(5),
                    body: String::new(),
                },
                2,
            );
        }
        let statuses: Vec<u16> = content.history.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![500, 404]);
        assert!(content.status.starts_with("HTTP 500"));
    }

    #[test]
    fn default_content_matches_its_panel_group() {
        for group in [
            PanelGroupId::RequestEditor,
            PanelGroupId::ProjectTree,
            PanelGroupId::Settings,
        ] {
            assert_eq!(TabContent::default_for(group).panel_group(), group);
        }
    }
}
