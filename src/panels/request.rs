/*
 * Request editor panel: method, URL, headers and body inputs, a send button,
 * a status line and the response history of the bound request tab.
 */

use super::controls::{Control, ControlFactory, hide_all, show_all};
use super::{Panel, PanelAction, stack_rows};
use crate::content::{HttpMethod, RequestSpec, TabContent};
use crate::error::Result as ShellResult;
use crate::types::{ControlId, PanelGroupId, Rect};

const PADDING: i32 = 8;
const ROW_HEIGHT: i32 = 24;
const METHOD_WIDTH: i32 = 96;
const SEND_WIDTH: i32 = 80;
const HEADERS_HEIGHT: i32 = 72;
const HISTORY_HEIGHT: i32 = 120;

pub struct RequestPanel {
    method: Box<dyn Control>,
    url: Box<dyn Control>,
    send: Box<dyn Control>,
    headers: Box<dyn Control>,
    body: Box<dyn Control>,
    status: Box<dyn Control>,
    history: Box<dyn Control>,
}

impl RequestPanel {
    pub fn new(factory: &mut dyn ControlFactory) -> ShellResult<Self> {
        let methods: Vec<&str> = HttpMethod::ALL.iter().map(|m| m.as_str()).collect();
        Ok(Self {
            method: factory.create_combo_box(&methods)?,
            url: factory.create_input("", false)?,
            send: factory.create_button("Send")?,
            headers: factory.create_input("", true)?,
            body: factory.create_input("", true)?,
            status: factory.create_label("")?,
            history: factory.create_list_view()?,
        })
    }

    fn controls(&mut self) -> [&mut Box<dyn Control>; 7] {
        [
            &mut self.method,
            &mut self.url,
            &mut self.send,
            &mut self.headers,
            &mut self.body,
            &mut self.status,
            &mut self.history,
        ]
    }
}

impl Panel for RequestPanel {
    fn panel_group(&self) -> PanelGroupId {
        PanelGroupId::RequestEditor
    }

    fn resize(&mut self, bounds: Rect) {
        let rows = stack_rows(
            bounds,
            PADDING,
            &[
                Some(ROW_HEIGHT),
                Some(HEADERS_HEIGHT),
                None,
                Some(ROW_HEIGHT),
                Some(HISTORY_HEIGHT),
            ],
        );
        let top = rows[0];
        let method = Rect::new(top.left, top.top, top.left + METHOD_WIDTH, top.bottom);
        let send = Rect::new((top.right - SEND_WIDTH).max(method.right), top.top, top.right, top.bottom);
        let url = Rect::new(
            method.right + PADDING,
            top.top,
            (send.left - PADDING).max(method.right + PADDING),
            top.bottom,
        );
        self.method.move_to(method);
        self.url.move_to(url);
        self.send.move_to(send);
        self.headers.move_to(rows[1]);
        self.body.move_to(rows[2]);
        self.status.move_to(rows[3]);
        self.history.move_to(rows[4]);
    }

    fn show(&mut self) {
        show_all(self.controls());
    }

    fn hide(&mut self) {
        hide_all(self.controls());
    }

    fn save_state(&mut self, content: &mut TabContent) {
        let Some(content) = content.as_request_mut() else {
            return;
        };
        let request = &mut content.request;
        match HttpMethod::parse(&self.method.text()) {
            Some(method) => request.method = method,
            None => log::warn!(
                "[Panels] unknown method '{}', keeping {}",
                self.method.text(),
                request.method.as_str()
            ),
        }
        request.url = self.url.text().trim().to_string();
        request.headers = RequestSpec::parse_headers(&self.headers.text());
        request.body = self.body.text();
    }

    fn set_state(&mut self, content: &TabContent) {
        let Some(content) = content.as_request() else {
            log::trace!("[Panels] request panel ignores {:?} content", content.panel_group());
            return;
        };
        self.method.set_text(content.request.method.as_str());
        self.url.set_text(&content.request.url);
        self.headers.set_text(&content.request.headers_text());
        self.body.set_text(&content.request.body);
        self.status.set_text(&content.status);
        let history: Vec<String> = content.history.iter().map(|r| r.summary()).collect();
        self.history.set_text(&history.join("\n"));
    }

    fn button_clicked(&self, control: ControlId) -> Option<PanelAction> {
        (control == self.send.id()).then_some(PanelAction::SendRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Header, RequestContent, ResponseRecord};
    use crate::panels::controls::fake::{FakeControlFactory, FakeKind};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn bound_content() -> TabContent {
        let mut content = RequestContent::new(RequestSpec {
            method: HttpMethod::Post,
            url: "https://example.com/items".into(),
            headers: vec![Header {
                name: "Accept".into(),
                value: "*/*".into(),
            }],
            body: "{\"a\":1}".into(),
        });
        content.push_response(
            ResponseRecord {
                status: 201,
                elapsed: Duration::from_millis(12),
                body: "ok".into(),
            },
            10,
        );
        TabContent::Request(content)
    }

    #[test]
    fn set_state_then_save_state_preserves_the_request() {
        let mut factory = FakeControlFactory::default();
        let mut panel = RequestPanel::new(&mut factory).unwrap();
        let original = bound_content();
        panel.set_state(&original);

        let history = &factory.of_kind(FakeKind::ListView)[0];
        assert_eq!(history.borrow().text, "201 (12 ms, 2 bytes)");

        let mut saved = TabContent::default_for(PanelGroupId::RequestEditor);
        panel.save_state(&mut saved);
        assert_eq!(saved.as_request().unwrap().request, original.as_request().unwrap().request);
    }

    #[test]
    fn edits_are_flushed_into_the_content() {
        let mut factory = FakeControlFactory::default();
        let mut panel = RequestPanel::new(&mut factory).unwrap();
        let mut content = bound_content();
        panel.set_state(&content);

        let inputs = factory.of_kind(FakeKind::Input);
        inputs[0].borrow_mut().text = "  https://example.com/other  ".into();
        factory.of_kind(FakeKind::ComboBox)[0].borrow_mut().text = "delete".into();

        panel.save_state(&mut content);
        let request = &content.as_request().unwrap().request;
        assert_eq!(request.url, "https://example.com/other");
        assert_eq!(request.method, HttpMethod::Delete);
    }

    #[test]
    fn mismatched_content_is_ignored() {
        let mut factory = FakeControlFactory::default();
        let mut panel = RequestPanel::new(&mut factory).unwrap();
        panel.set_state(&bound_content());

        let mut settings = TabContent::default_for(PanelGroupId::Settings);
        let before = settings.clone();
        panel.save_state(&mut settings);
        panel.set_state(&settings);
        assert_eq!(settings, before);
        assert_eq!(
            factory.of_kind(FakeKind::Input)[0].borrow().text,
            "https://example.com/items"
        );
    }

    #[test]
    fn resize_keeps_every_control_inside_the_bounds() {
        let mut factory = FakeControlFactory::default();
        let mut panel = RequestPanel::new(&mut factory).unwrap();
        let bounds = Rect::new(0, 36, 900, 700);
        panel.resize(bounds);
        for control in &factory.controls {
            let r = control.borrow().rect;
            assert!(r.left >= bounds.left && r.right <= bounds.right, "{r:?}");
            assert!(r.top >= bounds.top && r.bottom <= bounds.bottom, "{r:?}");
        }
    }

    #[test]
    fn only_the_send_button_maps_to_an_action() {
        let mut factory = FakeControlFactory::default();
        let panel = RequestPanel::new(&mut factory).unwrap();
        let send = factory.of_kind(FakeKind::Button)[0].borrow().id;
        let url = factory.of_kind(FakeKind::Input)[0].borrow().id;
        assert_eq!(panel.button_clicked(send), Some(PanelAction::SendRequest));
        assert_eq!(panel.button_clicked(url), None);
    }

    #[test]
    fn show_and_hide_cover_every_control() {
        let mut factory = FakeControlFactory::default();
        let mut panel = RequestPanel::new(&mut factory).unwrap();
        panel.hide();
        assert_eq!(factory.visible_count(), 0);
        panel.show();
        assert_eq!(factory.visible_count(), factory.controls.len());
    }
}
