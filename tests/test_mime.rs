use mediaserve::http::mime::{content_type, gmt_date, is_music_or_image};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[test]
fn test_content_type_known_extensions() {
    assert_eq!(content_type("a.jpg"), "image/jpg");
    assert_eq!(content_type("a.jpeg"), "image/jpg");
    assert_eq!(content_type("a.png"), "image/png");
    assert_eq!(content_type("a.gif"), "image/gif");
    assert_eq!(content_type("a.avi"), "video/avi");
    assert_eq!(content_type("a.mp4"), "video/mp4");
    assert_eq!(content_type("a.mp3"), "audio/mpeg");
}

#[test]
fn test_content_type_is_case_insensitive() {
    assert_eq!(content_type("/media/Holiday.JPG"), "image/jpg");
    assert_eq!(content_type("/media/Film.Mp4"), "video/mp4");
}

#[test]
fn test_content_type_defaults_to_audio_mpeg() {
    assert_eq!(content_type("notes.txt"), "audio/mpeg");
    assert_eq!(content_type("no_extension"), "audio/mpeg");
    assert_eq!(content_type(""), "audio/mpeg");
}

#[test]
fn test_music_and_images_are_never_ranged() {
    assert!(is_music_or_image("song.MP3"));
    assert!(is_music_or_image("pic.png"));
    assert!(is_music_or_image("pic.gif"));
    assert!(is_music_or_image("pic.jpg"));
    assert!(!is_music_or_image("movie.mp4"));
    assert!(!is_music_or_image("movie.avi"));
}

#[test]
fn test_gmt_date_format() {
    // 2014-01-25T12:03:19Z
    let time = UNIX_EPOCH + Duration::from_secs(1_390_651_399);
    assert_eq!(gmt_date(time), "Sat, 25 Jan 2014 12:03:19 GMT");

    assert_eq!(gmt_date(UNIX_EPOCH), "Thu, 01 Jan 1970 00:00:00 GMT");
}

#[test]
fn test_gmt_date_now_shape() {
    let date = gmt_date(SystemTime::now());
    assert!(date.ends_with(" GMT"));
    assert_eq!(date.len(), "Sat, 25 Jan 2014 12:03:19 GMT".len());
}
