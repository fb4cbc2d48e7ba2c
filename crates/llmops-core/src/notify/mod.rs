//! Notification composer.
//!
//! Maps a [`PromotionOutcome`] to a [`NotificationPayload`] by picking the
//! template for the outcome's [`NotificationKind`] and filling it in. Pure
//! formatting: the same outcome always yields a byte-identical payload.

pub mod encoding;
pub mod template;

use crate::domain::{NotificationKind, NotificationPayload, PromotionOutcome};

pub use encoding::{escape_html, is_http_url, percent_encode, strip_tags};
pub use template::{Template, TemplateError, TemplateSet};

/// Subject of every evaluation notification. The outcome is reported in the
/// body, not alarmed in the subject.
pub const CUSTOMIZATION_COMPLETED_SUBJECT: &str = "Amazon Bedrock model customization completed!";

/// Approval endpoint path appended to the API base URL.
pub const APPROVAL_PATH: &str = "updateModelArn";

/// Link that approves deployment of `model_identifier`.
///
/// The identifier is percent-encoded as a single path segment so characters
/// like `/`, `:` or spaces cannot alter the target.
pub fn approval_link(api_base_url: &str, model_identifier: &str) -> String {
    format!(
        "{}/{}/{}",
        api_base_url.trim_end_matches('/'),
        APPROVAL_PATH,
        percent_encode(model_identifier)
    )
}

/// Renders notifications from a [`TemplateSet`].
#[derive(Debug, Clone, Default)]
pub struct NotificationComposer {
    templates: TemplateSet,
}

impl NotificationComposer {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Render the evaluation notification for `outcome`.
    pub fn compose(&self, outcome: &PromotionOutcome, api_base_url: &str) -> NotificationPayload {
        match outcome {
            PromotionOutcome::Promote {
                base_score,
                custom_score,
                model_identifier,
            } => {
                let base_f1 = format!("{:.4}", base_score.f_measure());
                let custom_f1 = format!("{:.4}", custom_score.f_measure());
                let url = escape_html(&approval_link(api_base_url, model_identifier));
                self.render(
                    NotificationKind::Promote,
                    CUSTOMIZATION_COMPLETED_SUBJECT,
                    &[
                        ("base_f1", base_f1.as_str()),
                        ("custom_f1", custom_f1.as_str()),
                        ("approval_url", url.as_str()),
                    ],
                )
            }
            PromotionOutcome::Reject {
                base_score,
                custom_score,
            } => {
                let base = base_score.to_string();
                let custom = custom_score.to_string();
                self.render(
                    NotificationKind::Reject,
                    CUSTOMIZATION_COMPLETED_SUBJECT,
                    &[("base_score", base.as_str()), ("custom_score", custom.as_str())],
                )
            }
        }
    }

    /// Render the template for `kind`; the text body is the rendered body
    /// with tags stripped.
    pub fn render(
        &self,
        kind: NotificationKind,
        subject: &str,
        values: &[(&str, &str)],
    ) -> NotificationPayload {
        let html_body = self.templates.get(kind).render(values);
        let text_body = strip_tags(&html_body);
        NotificationPayload {
            subject: subject.to_string(),
            html_body,
            text_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreTriple;

    #[test]
    fn approval_link_trims_trailing_slash() {
        assert_eq!(
            approval_link("https://api.example.com/prod/", "m 1"),
            "https://api.example.com/prod/updateModelArn/m%201"
        );
    }

    #[test]
    fn approval_url_is_escaped_in_href() {
        let outcome = PromotionOutcome::Promote {
            base_score: ScoreTriple::new(0.5, 0.5, 0.5).unwrap(),
            custom_score: ScoreTriple::new(0.6, 0.6, 0.6).unwrap(),
            model_identifier: "m".to_string(),
        };
        let payload = NotificationComposer::default()
            .compose(&outcome, "https://api.example.com/a\"b?x=1&y=<2>");
        assert!(payload
            .html_body
            .contains("https://api.example.com/a&quot;b?x=1&amp;y=&lt;2&gt;/updateModelArn/m"));
        assert!(!payload.html_body.contains("a\"b"));
    }

    #[test]
    fn reject_body_carries_raw_triples() {
        let outcome = PromotionOutcome::Reject {
            base_score: ScoreTriple::new(0.81, 0.79, 0.8).unwrap(),
            custom_score: ScoreTriple::new(0.61, 0.59, 0.6).unwrap(),
        };
        let payload = NotificationComposer::default().compose(&outcome, "https://api");
        assert!(payload.text_body.contains("(0.81, 0.79, 0.8)"));
        assert!(payload.text_body.contains("(0.61, 0.59, 0.6)"));
        assert!(payload.text_body.contains("training data or hyper-parameters"));
        assert!(!payload.html_body.contains("updateModelArn"));
    }
}
