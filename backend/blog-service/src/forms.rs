/// Form payloads submitted by users, validated before any write.
///
/// Validation failures never become HTTP errors: handlers fold the field
/// errors back into the render context of the page that showed the form.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Field name -> messages, as embedded in render contexts.
pub type FormErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
    pub group: Option<Uuid>,
    pub image_key: Option<String>,
}

impl PostForm {
    /// Trim inputs before validation; whitespace-only text must not pass
    /// the length rule. An empty image key means no attachment.
    pub fn trimmed(&self) -> Self {
        Self {
            text: self.text.trim().to_string(),
            group: self.group,
            image_key: self
                .image_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

impl CommentForm {
    pub fn trimmed(&self) -> Self {
        Self {
            text: self.text.trim().to_string(),
        }
    }
}

/// Flatten validator's error tree into field -> messages.
pub fn field_errors(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_post_text_fails_validation() {
        let form = PostForm {
            text: String::new(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn whitespace_only_text_fails_after_trim() {
        let form = PostForm {
            text: "   \n\t ".into(),
            ..Default::default()
        }
        .trimmed();
        assert!(form.validate().is_err());
    }

    #[test]
    fn valid_post_form_passes_without_group() {
        let form = PostForm {
            text: "first post".into(),
            ..Default::default()
        }
        .trimmed();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn empty_image_key_becomes_none() {
        let form = PostForm {
            text: "post".into(),
            image_key: Some("  ".into()),
            ..Default::default()
        }
        .trimmed();
        assert!(form.image_key.is_none());
    }

    #[test]
    fn field_errors_carry_the_message() {
        let form = CommentForm { text: String::new() };
        let errors = form.validate().unwrap_err();
        let flat = field_errors(&errors);
        assert_eq!(flat["text"], vec!["Text is required".to_string()]);
    }
}
