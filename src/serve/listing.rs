//! Directory listing renderer.
//!
//! Produces the browsable HTML index for a directory: its direct children,
//! hidden entries removed, with a parent-navigation entry everywhere except
//! the served root. Nothing is cached; every request re-enumerates the
//! directory.

use std::cmp::Ordering;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters percent-encoded inside one path segment of a listing href.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

const STYLESHEET: &str = "\
body { margin: 24px; font-family: sans-serif; }
h1 { font-size: 1.2em; }
h1 a { text-decoration: none; }
#files { list-style: none; margin: 0; padding: 0; }
#files li { border-bottom: 1px solid #ddd; }
#files li.header { font-weight: bold; padding: 4px 0; }
#files a { display: block; padding: 4px 0; text-decoration: none; color: inherit; }
#files a:hover { background: #f4f4f4; }
#files .name { display: inline-block; width: 50%; }
#files .size { display: inline-block; width: 20%; }
#files .date { display: inline-block; width: 28%; }
";

/// One row of a directory listing.
///
/// Built fresh for every listing request. `size` and `modified` are `None`
/// for directories, for the parent pseudo-entry, and for entries whose stat
/// failed.
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
}

impl ListingEntry {
    /// The `..` parent-navigation pseudo-entry.
    fn parent() -> Self {
        Self {
            name: "..".to_string(),
            is_dir: true,
            size: None,
            modified: None,
        }
    }
}

/// Renders the HTML listing for `dir`, reached via `request_path`.
///
/// `request_path` is the sanitized request path for the directory and ends
/// with `/`. Fails only when the directory itself cannot be enumerated; a
/// single child whose stat fails is still listed, just without size or date.
pub async fn list(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = read_entries(dir).await?;

    if request_path != "/" {
        entries.push(ListingEntry::parent());
    }

    sort_entries(&mut entries);

    Ok(render(&entries, request_path))
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();

        // hidden-file policy: dotfiles never appear
        if name.starts_with('.') {
            continue;
        }

        // One unstattable child must not take down the whole listing.
        let entry = match entry.metadata().await {
            Ok(meta) => ListingEntry {
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { None } else { Some(meta.len()) },
                modified: meta.modified().ok(),
                name,
            },
            Err(_) => ListingEntry {
                name,
                is_dir: false,
                size: None,
                modified: None,
            },
        };

        entries.push(entry);
    }

    Ok(entries)
}

/// Sort order: `..` pinned first, then directories before files, then
/// case-insensitive lexical by name.
fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by(|a, b| {
        if a.name == ".." || b.name == ".." {
            return if a.name == b.name {
                Ordering::Equal
            } else if a.name == ".." {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn render(entries: &[ListingEntry], request_path: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Index of {}</title>\n",
        html_escape::encode_text(request_path)
    ));
    html.push_str("<style>\n");
    html.push_str(STYLESHEET);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h1>Index of {}</h1>\n", breadcrumb(request_path)));
    html.push_str("<ul id=\"files\" class=\"view-details\">\n");
    html.push_str(
        "<li class=\"header\"><span class=\"name\">Name</span>\
         <span class=\"size\">Size</span><span class=\"date\">Modified</span></li>\n",
    );

    for entry in entries {
        html.push_str(&render_entry(entry, request_path));
    }

    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn render_entry(entry: &ListingEntry, request_path: &str) -> String {
    let href = entry_href(entry, request_path);
    let name = html_escape::encode_text(&entry.name);
    let title = html_escape::encode_double_quoted_attribute(&entry.name);

    // size and date stay blank for directories and the parent entry
    let size = if entry.is_dir {
        String::new()
    } else {
        entry.size.map(|n| n.to_string()).unwrap_or_default()
    };
    let date = if entry.is_dir {
        String::new()
    } else {
        entry.modified.map(format_time).unwrap_or_default()
    };

    format!(
        "<li><a href=\"{}\" title=\"{}\"><span class=\"name\">{}</span>\
         <span class=\"size\">{}</span><span class=\"date\">{}</span></a></li>\n",
        href, title, name, size, date
    )
}

fn entry_href(entry: &ListingEntry, request_path: &str) -> String {
    if entry.name == ".." {
        return parent_path(request_path);
    }

    let mut href = encode_path(request_path);
    if !href.ends_with('/') {
        href.push('/');
    }
    href.push_str(&utf8_percent_encode(&entry.name, SEGMENT).to_string());
    if entry.is_dir {
        href.push('/');
    }
    href
}

/// Percent-encodes a decoded request path segment by segment, keeping the
/// slashes.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// The listing URL of the parent directory: "/docs/sub/" -> "/docs/".
fn parent_path(request_path: &str) -> String {
    let trimmed = request_path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => encode_path(&trimmed[..=idx]),
        None => "/".to_string(),
    }
}

/// Linked path components for the heading: every prefix is clickable.
fn breadcrumb(request_path: &str) -> String {
    let mut links = vec!["<a href=\"/\">/</a>".to_string()];
    let mut cumulative = String::new();

    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        cumulative.push('/');
        cumulative.push_str(segment);
        links.push(format!(
            "<a href=\"{}/\">{}</a>",
            encode_path(&cumulative),
            html_escape::encode_text(segment)
        ));
    }

    links.join(" ")
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string()
}
