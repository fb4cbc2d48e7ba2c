//! Notification templates.
//!
//! Template text is data: the built-in set is compiled in from `templates/`
//! and any template can be replaced from a directory at startup. Placeholders
//! use `{{name}}` syntax.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::domain::NotificationKind;

/// Errors raised while loading templates from disk.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A text template with `{{placeholder}}` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: Cow<'static, str>,
}

impl Template {
    pub const fn builtin(source: &'static str) -> Self {
        Self {
            source: Cow::Borrowed(source),
        }
    }

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Cow::Owned(source.into()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute `{{name}}` occurrences with the matching value.
    ///
    /// Placeholders without a value are kept verbatim.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest: &str = &self.source;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = after_open[..end].trim();
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }
        out.push_str(rest);
        out
    }
}

/// One template per [`NotificationKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    promote: Template,
    reject: Template,
    approval_request: Template,
}

impl TemplateSet {
    pub const PROMOTE_FILE: &'static str = "promote.html";
    pub const REJECT_FILE: &'static str = "reject.txt";
    pub const APPROVAL_REQUEST_FILE: &'static str = "approval_request.html";

    /// Templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            promote: Template::builtin(include_str!("../../templates/promote.html")),
            reject: Template::builtin(include_str!("../../templates/reject.txt")),
            approval_request: Template::builtin(include_str!(
                "../../templates/approval_request.html"
            )),
        }
    }

    /// Built-in templates, overridden by any of `promote.html`, `reject.txt`
    /// and `approval_request.html` found in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let mut set = Self::builtin();
        for kind in [
            NotificationKind::Promote,
            NotificationKind::Reject,
            NotificationKind::ApprovalRequest,
        ] {
            let path = dir.as_ref().join(Self::file_name(kind));
            if path.is_file() {
                let source = std::fs::read_to_string(&path)
                    .map_err(|source| TemplateError::Read { path, source })?;
                set = set.with_template(kind, Template::new(source));
            }
        }
        Ok(set)
    }

    pub fn file_name(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Promote => Self::PROMOTE_FILE,
            NotificationKind::Reject => Self::REJECT_FILE,
            NotificationKind::ApprovalRequest => Self::APPROVAL_REQUEST_FILE,
        }
    }

    pub fn get(&self, kind: NotificationKind) -> &Template {
        match kind {
            NotificationKind::Promote => &self.promote,
            NotificationKind::Reject => &self.reject,
            NotificationKind::ApprovalRequest => &self.approval_request,
        }
    }

    /// Replace the template for `kind`.
    pub fn with_template(mut self, kind: NotificationKind, template: Template) -> Self {
        match kind {
            NotificationKind::Promote => self.promote = template,
            NotificationKind::Reject => self.reject = template,
            NotificationKind::ApprovalRequest => self.approval_request = template,
        }
        self
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}
