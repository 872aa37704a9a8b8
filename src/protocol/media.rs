//! Video reference resolution

const YOUTUBE_PREFIX: &str = "youtubeid=";
const VIMEO_PREFIX: &str = "vimeoid=";

/// Resolve a video reference into a URL the web view can stream
///
/// `youtubeid=<id>` and `vimeoid=<id>` map to the providers' embed players;
/// anything else (file path or URL) is passed through untouched.
pub fn video_stream_url(reference: &str, autoplay: bool) -> String {
    let query = if autoplay { "?autoplay=1" } else { "" };

    if let Some(id) = reference.strip_prefix(YOUTUBE_PREFIX) {
        format!("https://www.youtube.com/embed/{}{}", id, query)
    } else if let Some(id) = reference.strip_prefix(VIMEO_PREFIX) {
        format!("https://player.vimeo.com/video/{}{}", id, query)
    } else {
        reference.to_string()
    }
}

/// Web content is only loaded over http(s)
pub fn is_web_url(value: &str) -> bool {
    value.starts_with("http")
}
