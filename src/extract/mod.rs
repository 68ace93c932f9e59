//! Content extraction from raw page bytes
//!
//! Extraction is intentionally regex-based and works on unparsed bytes: it
//! tolerates malformed HTML at the cost of false positives on `href=` and
//! `src=` appearing in comments or text. All functions here are pure
//! except the MX-checked email lookup, which does DNS.

mod email;
mod links;
mod media;
mod text;

pub use email::{find_emails, find_emails_with_mx};
pub use links::{find_links, find_page_assets, find_src_links, resolve_link, AssetRef};
pub use media::{
    classify, find_page_audio, find_page_documents, find_page_images, find_page_videos, MediaKind,
    AUDIO_EXTENSIONS, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use text::{find_regex, is_text_on_page};
