pub mod fallback;
pub mod fixtures;
pub mod generator;
pub mod images;
pub mod model;
pub mod prompt;
pub mod slug;

pub use generator::{generate_post, GeneratedContent, PostDraft};
pub use images::{fallback_image_for, resolve_images, ImageSet, ImageSlot};
pub use model::{ContentModel, CHAT_MODEL};
pub use slug::{generate_slug, generate_slug_now};
