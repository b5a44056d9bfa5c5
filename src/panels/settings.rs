/*
 * Settings panel: request timeout, client certificate path and TLS
 * verification toggle.
 */

use super::controls::{Control, ControlFactory, hide_all, show_all};
use super::{Panel, stack_rows};
use crate::content::TabContent;
use crate::error::Result as ShellResult;
use crate::types::{PanelGroupId, Rect};

use std::path::PathBuf;
use std::time::Duration;

const PADDING: i32 = 8;
const ROW_HEIGHT: i32 = 24;
const LABEL_WIDTH: i32 = 160;
const VERIFY_ON: &str = "Verify TLS";
const VERIFY_OFF: &str = "Skip verification";

struct LabeledRow {
    label: Box<dyn Control>,
    field: Box<dyn Control>,
}

impl LabeledRow {
    fn place(&mut self, row: Rect) {
        let split = (row.left + LABEL_WIDTH).min(row.right);
        self.label
            .move_to(Rect::new(row.left, row.top, split, row.bottom));
        self.field
            .move_to(Rect::new((split + PADDING).min(row.right), row.top, row.right, row.bottom));
    }
}

pub struct SettingsPanel {
    timeout: LabeledRow,
    certificate: LabeledRow,
    verify: LabeledRow,
}

impl SettingsPanel {
    pub fn new(factory: &mut dyn ControlFactory) -> ShellResult<Self> {
        Ok(Self {
            timeout: LabeledRow {
                label: factory.create_label("Timeout (seconds)")?,
                field: factory.create_input("", false)?,
            },
            certificate: LabeledRow {
                label: factory.create_label("Client certificate")?,
                field: factory.create_input("", false)?,
            },
            verify: LabeledRow {
                label: factory.create_label("TLS")?,
                field: factory.create_combo_box(&[VERIFY_ON, VERIFY_OFF])?,
            },
        })
    }

    fn controls(&mut self) -> [&mut Box<dyn Control>; 6] {
        [
            &mut self.timeout.label,
            &mut self.timeout.field,
            &mut self.certificate.label,
            &mut self.certificate.field,
            &mut self.verify.label,
            &mut self.verify.field,
        ]
    }
}

impl Panel for SettingsPanel {
    fn panel_group(&self) -> PanelGroupId {
        PanelGroupId::Settings
    }

    fn resize(&mut self, bounds: Rect) {
        let rows = stack_rows(
            bounds,
            PADDING,
            &[Some(ROW_HEIGHT), Some(ROW_HEIGHT), Some(ROW_HEIGHT), None],
        );
        self.timeout.place(rows[0]);
        self.certificate.place(rows[1]);
        self.verify.place(rows[2]);
    }

    fn show(&mut self) {
        show_all(self.controls());
    }

    fn hide(&mut self) {
        hide_all(self.controls());
    }

    fn save_state(&mut self, content: &mut TabContent) {
        let TabContent::Settings(content) = content else {
            return;
        };
        let settings = &mut content.settings;

        let timeout_text = self.timeout.field.text();
        match timeout_text.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => settings.request_timeout = Duration::from_secs(secs),
            _ => log::warn!(
                "[Panels] ignoring timeout '{timeout_text}', keeping {}s",
                settings.request_timeout.as_secs()
            ),
        }

        let cert = self.certificate.field.text();
        let cert = cert.trim();
        settings.certificate_path = (!cert.is_empty()).then(|| PathBuf::from(cert));

        settings.verify_tls = self.verify.field.text().trim() != VERIFY_OFF;
    }

    fn set_state(&mut self, content: &TabContent) {
        let TabContent::Settings(content) = content else {
            return;
        };
        let settings = &content.settings;
        self.timeout
            .field
            .set_text(&settings.request_timeout.as_secs().to_string());
        self.certificate.field.set_text(
            &settings
                .certificate_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );
        self.verify
            .field
            .set_text(if settings.verify_tls { VERIFY_ON } else { VERIFY_OFF });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Settings, SettingsContent};
    use crate::panels::controls::fake::{FakeControlFactory, FakeKind};
    use pretty_assertions::assert_eq;

    fn content(settings: Settings) -> TabContent {
        TabContent::Settings(SettingsContent { settings })
    }

    #[test]
    fn settings_round_trip_through_the_controls() {
        let mut factory = FakeControlFactory::default();
        let mut panel = SettingsPanel::new(&mut factory).unwrap();
        let original = content(Settings {
            request_timeout: Duration::from_secs(12),
            certificate_path: Some(PathBuf::from("certs/client.pem")),
            verify_tls: false,
        });
        panel.set_state(&original);

        let mut saved = content(Settings::default());
        panel.save_state(&mut saved);
        assert_eq!(saved, original);
    }

    #[test]
    fn unparsable_timeout_keeps_the_previous_value() {
        let mut factory = FakeControlFactory::default();
        let mut panel = SettingsPanel::new(&mut factory).unwrap();
        let mut settings = content(Settings::default());
        panel.set_state(&settings);

        factory.of_kind(FakeKind::Input)[0].borrow_mut().text = "soon".into();
        factory.of_kind(FakeKind::Input)[1].borrow_mut().text = "   ".into();
        panel.save_state(&mut settings);

        let TabContent::Settings(saved) = &settings else {
            panic!("settings content expected");
        };
        assert_eq!(saved.settings.request_timeout, Duration::from_secs(30));
        assert_eq!(saved.settings.certificate_path, None);
    }
}
