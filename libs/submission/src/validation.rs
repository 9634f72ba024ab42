use crate::{draft::PostFields, MAX_IMAGES, MIN_IMAGES};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title required")]
    TitleRequired,

    #[error(
        "image count out of range: {count} (expected {}..={})",
        MIN_IMAGES,
        MAX_IMAGES
    )]
    ImageCount { count: usize },
}

impl ValidationError {
    /// Message meant for the person filling in the form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::TitleRequired => "Please enter a title.".to_string(),
            ValidationError::ImageCount { count: 0 } => {
                "Please add at least one image.".to_string()
            }
            ValidationError::ImageCount { count } => format!(
                "A post can have at most {} images ({} selected).",
                MAX_IMAGES, count
            ),
        }
    }
}

/// Checks run before any upload. The first failing rule wins: title, then
/// image count.
pub fn validate(
    fields: &PostFields,
    image_count: usize,
) -> Result<(), ValidationError> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if !(MIN_IMAGES..=MAX_IMAGES).contains(&image_count) {
        return Err(ValidationError::ImageCount { count: image_count });
    }

    Ok(())
}
