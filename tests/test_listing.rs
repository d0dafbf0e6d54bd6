use mediaserve::media::listing::{ListingRenderer, TemplateRenderer, escape_name};
use std::path::Path;

#[test]
fn test_default_template_links_every_entry() {
    let renderer = TemplateRenderer::default();
    let entries = vec![(0, "a.mp3".to_string()), (1, "b.mp4".to_string())];

    let page = renderer.render(Path::new("/media"), &entries);

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<a href=\"/0\">a.mp3</a>"));
    assert!(page.contains("<a href=\"/1\">b.mp4</a>"));
    assert!(page.contains("/media"));
    assert!(!page.contains("{{"));
}

#[test]
fn test_custom_template_placeholders() {
    let renderer = TemplateRenderer::new("<ol>{{media}}</ol><footer>{{root}}</footer>");
    let entries = vec![(4, "clip.mp4".to_string())];

    let page = renderer.render(Path::new("/srv/media"), &entries);

    assert_eq!(
        page,
        "<ol><li><a href=\"/4\">clip.mp4</a></li>\n</ol><footer>/srv/media</footer>"
    );
}

#[test]
fn test_empty_listing() {
    let renderer = TemplateRenderer::new("[{{media}}]");
    assert_eq!(renderer.render(Path::new("/m"), &[]), "[]");
}

#[test]
fn test_template_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.txt");
    std::fs::write(&path, "<p>{{media}}</p>").unwrap();

    let renderer = TemplateRenderer::from_file(&path).unwrap();
    let page = renderer.render(Path::new("/m"), &[(0, "x.gif".to_string())]);

    assert_eq!(page, "<p><li><a href=\"/0\">x.gif</a></li>\n</p>");
}

#[test]
fn test_escape_name() {
    assert_eq!(escape_name("Tom & Jerry.mp4"), "Tom &amp; Jerry.mp4");
    assert_eq!(escape_name("100%.mp3"), "100%.mp3");
    assert_eq!(escape_name("say \"hi\".mp3"), "say &quot;hi&quot;.mp3");
    assert_eq!(escape_name("it's.mp4"), "it&#39;s.mp4");
    assert_eq!(escape_name("dir\\song.mp3"), "dir/song.mp3");
    assert_eq!(escape_name("<b>.png"), "&lt;b&gt;.png");
}

#[test]
fn test_quoted_names_stay_inside_attributes() {
    let renderer = TemplateRenderer::new("{{media}}");
    let page = renderer.render(Path::new("/m"), &[(0, "a\" onclick=\"x.mp3".to_string())]);

    assert_eq!(
        page,
        "<li><a href=\"/0\">a&quot; onclick=&quot;x.mp3</a></li>\n"
    );
}
