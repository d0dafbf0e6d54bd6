//! Directory listing rendering
//!
//! The connection layer only produces `(index, display name)` pairs; turning
//! them into a page is up to a [`ListingRenderer`].

use std::path::Path;

/// Placeholder replaced by the media root path.
pub const ROOT_PLACEHOLDER: &str = "{{root}}";

/// Placeholder replaced by the generated list of anchors.
pub const MEDIA_PLACEHOLDER: &str = "{{media}}";

const DEFAULT_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Media Server</title>
</head>
<body>
<h1>Available media</h1>
<p>{{root}}</p>
<ul>
{{media}}</ul>
</body>
</html>
";

/// Renders the listing page served for `/`.
pub trait ListingRenderer: Send + Sync {
    /// Returns a complete HTML document for the given root and entries.
    fn render(&self, root: &Path, entries: &[(usize, String)]) -> String;
}

/// Placeholder-substituting renderer.
///
/// Each entry becomes `<li><a href="/<index>">name</a></li>`.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: String,
}

impl TemplateRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Loads the template from disk.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl ListingRenderer for TemplateRenderer {
    fn render(&self, root: &Path, entries: &[(usize, String)]) -> String {
        let media: String = entries
            .iter()
            .map(|(index, name)| {
                format!("<li><a href=\"/{}\">{}</a></li>\n", index, escape_name(name))
            })
            .collect();

        self.template
            .replace(ROOT_PLACEHOLDER, &escape_name(&root.to_string_lossy()))
            .replace(MEDIA_PLACEHOLDER, &media)
    }
}

/// Escapes a display name for embedding in element text or a quoted
/// attribute.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\\' => out.push('/'),
            c => out.push(c),
        }
    }
    out
}
