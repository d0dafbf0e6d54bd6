//! Content types and HTTP dates.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// MIME type for a file name, by case-insensitive suffix.
///
/// Unknown extensions are served as `audio/mpeg`.
///
/// # Example
///
/// ```
/// # use mediaserve::http::mime::content_type;
/// assert_eq!(content_type("Movie.MP4"), "video/mp4");
/// assert_eq!(content_type("song.flac"), "audio/mpeg");
/// ```
pub fn content_type(filename: &str) -> &'static str {
    let name = filename.to_ascii_lowercase();

    if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        "image/jpg"
    } else if name.ends_with(".png") {
        "image/png"
    } else if name.ends_with(".gif") {
        "image/gif"
    } else if name.ends_with(".avi") {
        "video/avi"
    } else if name.ends_with(".mp4") {
        "video/mp4"
    } else {
        "audio/mpeg"
    }
}

/// Music and pictures are always sent whole, even when a range is asked for.
pub fn is_music_or_image(filename: &str) -> bool {
    let name = filename.to_ascii_lowercase();
    [".jpg", ".jpeg", ".png", ".gif", ".mp3"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

/// Formats an instant as an RFC 1123 date, e.g. `Sat, 25 Jan 2014 12:03:19 GMT`.
pub fn gmt_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// The current time as an RFC 1123 date.
pub fn now() -> String {
    gmt_date(SystemTime::now())
}
