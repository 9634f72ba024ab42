use entity::prelude::*;

use crate::staging::StagedImage;

/// Typed form fields of a post, as handed to the pipeline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub description: Option<String>,
    pub category: CategoryEntity,
    pub hashtags: Vec<String>,
}

/// A staged image and the optional external link the author attached to
/// it. The durable URL only exists after upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftImage {
    pub staged: StagedImage,
    pub link: Option<String>,
}

impl From<StagedImage> for DraftImage {
    fn from(staged: StagedImage) -> Self {
        Self { staged, link: None }
    }
}

/// In-progress submission. Every edit consumes the draft and returns the
/// updated value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Draft {
    title: String,
    description: String,
    category: CategoryEntity,
    hashtags: Vec<String>,
    hashtag_input: String,
    images: Vec<DraftImage>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> CategoryEntity {
        self.category
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn hashtag_input(&self) -> &str {
        &self.hashtag_input
    }

    pub fn images(&self) -> &[DraftImage] {
        &self.images
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_category(self, category: CategoryEntity) -> Self {
        Self { category, ..self }
    }

    /// Replaces the text currently typed in the hashtag field.
    pub fn with_hashtag_input(self, input: impl Into<String>) -> Self {
        Self {
            hashtag_input: input.into(),
            ..self
        }
    }

    /// Commits the typed hashtag. Empty tokens and tags already present
    /// are dropped without notice. The input is cleared either way.
    pub fn commit_hashtag(mut self) -> Self {
        let input = std::mem::take(&mut self.hashtag_input);

        if let Some(tag) = normalize_hashtag(&input) {
            if !self.hashtags.contains(&tag) {
                self.hashtags.push(tag);
            }
        }

        self
    }

    pub fn remove_hashtag(mut self, tag: &str) -> Self {
        self.hashtags.retain(|t| t != tag);
        self
    }

    /// Appends staged images after the ones already staged. There is no
    /// upper bound here; the count is checked on submit.
    pub fn stage(mut self, staged: impl IntoIterator<Item = StagedImage>) -> Self {
        self.images.extend(staged.into_iter().map(DraftImage::from));
        self
    }

    pub fn remove_image(mut self, index: usize) -> Self {
        if index < self.images.len() {
            self.images.remove(index);
        }
        self
    }

    /// Attaches an external link to the image at `index`. A blank link
    /// removes it.
    pub fn with_image_link(mut self, index: usize, link: &str) -> Self {
        if let Some(image) = self.images.get_mut(index) {
            let link = link.trim();
            image.link = (!link.is_empty()).then(|| link.to_string());
        }
        self
    }

    pub fn into_parts(self) -> (PostFields, Vec<DraftImage>) {
        let description = self.description.trim();
        let fields = PostFields {
            title: self.title,
            description: (!description.is_empty())
                .then(|| description.to_string()),
            category: self.category,
            hashtags: self.hashtags,
        };

        (fields, self.images)
    }
}

/// Trimmed tag without leading `#`, or `None` when nothing is left.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim();

    (!tag.is_empty()).then(|| tag.to_string())
}

/// Normalizes every tag and drops empty ones and repeats, keeping the
/// first occurrence.
pub fn sanitize_hashtags(tags: Vec<String>) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().filter_map(|t| normalize_hashtag(t)) {
        if !sanitized.contains(&tag) {
            sanitized.push(tag);
        }
    }
    sanitized
}
