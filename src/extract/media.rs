use crate::extract::links::{find_links, find_src_links};
use url::Url;

/// Known image file extensions (suffix match, case-sensitive)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpeg", ".jpg", ".jpe", ".jfif", ".png", ".ppm", ".svg", ".gif", ".tiff", ".bmp", ".webp",
    ".ico", ".kra", ".bpg", ".drw", ".tga",
];

/// Known video file extensions
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".webm", ".mkv", ".flv", ".wmv", ".avi", ".yuv", ".mp2", ".mp4", ".mpeg", ".mpg", ".mpv",
    ".m4v", ".3gp", ".3g2", ".nsv", ".vob", ".ogv",
];

/// Known audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".3gp", ".aa", ".aac", ".aax", ".act", ".aiff", ".alac", ".amr", ".ape", ".au", ".flac",
    ".m4a", ".mp3", ".mpc", ".msv", ".ogg", ".oga", ".mogg", ".opus", ".tta", ".wav", ".cda",
];

/// Known document file extensions
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".epub", ".fb2", ".pub", ".ppt", ".pptx", ".txt", ".tex", ".odt",
    ".bib", ".ps", ".dwg", ".lyx", ".key", ".ott", ".odf", ".odc", ".ppg", ".xlc", ".latex",
    ".c", ".cpp", ".sh", ".go", ".java", ".cs", ".rs", ".lua", ".php", ".py", ".pl", ".kt",
    ".rb", ".asm", ".rar", ".tar", ".db", ".7z", ".zip", ".gbr", ".ttf", ".ttc", ".woff",
    ".otf", ".exif",
];

/// Media category of a URL, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
}

fn has_extension(url: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| url.ends_with(ext))
}

/// Classifies a URL by its extension, or `None` when it matches no known
/// media set. Categories are checked in image, video, audio, document
/// order; an ambiguous extension (`.3gp`) goes to the first match.
pub fn classify(url: &str) -> Option<MediaKind> {
    if has_extension(url, IMAGE_EXTENSIONS) {
        Some(MediaKind::Image)
    } else if has_extension(url, VIDEO_EXTENSIONS) {
        Some(MediaKind::Video)
    } else if has_extension(url, AUDIO_EXTENSIONS) {
        Some(MediaKind::Audio)
    } else if has_extension(url, DOCUMENT_EXTENSIONS) {
        Some(MediaKind::Document)
    } else {
        None
    }
}

fn find_typed(body: &[u8], from: &Url, extensions: &[&str]) -> Vec<Url> {
    let mut urls = find_links(body, from);
    urls.extend(find_src_links(body, from));
    urls.retain(|url| has_extension(url.as_str(), extensions));
    urls
}

/// Finds image URLs on the page: `href` and `src` targets with a known
/// image extension.
pub fn find_page_images(body: &[u8], from: &Url) -> Vec<Url> {
    find_typed(body, from, IMAGE_EXTENSIONS)
}

/// Finds video URLs on the page
pub fn find_page_videos(body: &[u8], from: &Url) -> Vec<Url> {
    find_typed(body, from, VIDEO_EXTENSIONS)
}

/// Finds audio URLs on the page
pub fn find_page_audio(body: &[u8], from: &Url) -> Vec<Url> {
    find_typed(body, from, AUDIO_EXTENSIONS)
}

/// Finds document URLs on the page
pub fn find_page_documents(body: &[u8], from: &Url) -> Vec<Url> {
    find_typed(body, from, DOCUMENT_EXTENSIONS)
}
