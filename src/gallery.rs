//! Gallery listing: enumerates stored articles and derives display metadata.

use crate::error::Result;
use crate::storage;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;
use std::time::SystemTime;

/// Only files with this suffix are treated as articles.
pub const ARTICLE_EXTENSION: &str = ".html";

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h1[^>]*>(.*?)</h1>").expect("heading pattern is valid"));

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// One row of the gallery listing.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryEntry {
    pub filename: String,
    pub title: String,
    /// Modification date formatted for display (`d.M.yyyy`).
    pub date: String,
    pub size: u64,
    #[serde(skip)]
    pub modified: SystemTime,
}

/// List every article in `dir`, newest first.
///
/// Files that cannot be read or stat'ed are logged and skipped.
pub async fn list_gallery(dir: &Path) -> Result<Vec<GalleryEntry>> {
    storage::ensure_dir(dir).await?;

    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(dir_entry) = read_dir.next_entry().await? {
        let Some(filename) = dir_entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %dir_entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !filename.ends_with(ARTICLE_EXTENSION) {
            continue;
        }

        match read_entry(&dir_entry.path(), filename.clone()).await {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                tracing::warn!(%filename, %error, "failed to read article, skipping");
            }
        }
    }

    sort_newest_first(&mut entries);
    tracing::debug!(count = entries.len(), "gallery listed");
    Ok(entries)
}

async fn read_entry(path: &Path, filename: String) -> Result<GalleryEntry> {
    let content = tokio::fs::read_to_string(path).await?;
    let metadata = tokio::fs::metadata(path).await?;
    let modified = metadata.modified()?;

    let title = extract_title(&content).unwrap_or_else(|| filename.clone());

    Ok(GalleryEntry {
        filename,
        title,
        date: format_date(modified),
        size: metadata.len(),
        modified,
    })
}

/// Text of the first single-line `<h1>` element with nested tags removed,
/// if there is a non-empty one.
pub fn extract_title(html: &str) -> Option<String> {
    HEADING_PATTERN
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|heading| TAG_PATTERN.replace_all(heading.as_str(), "").trim().to_string())
        .filter(|title| !title.is_empty())
}

/// German short date, e.g. `5.3.2026`.
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%-d.%-m.%Y").to_string()
}

/// Sort on the raw timestamp; ties keep filename order for a stable listing.
pub fn sort_newest_first(entries: &mut [GalleryEntry]) {
    entries.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(filename: &str, modified: SystemTime) -> GalleryEntry {
        GalleryEntry {
            filename: filename.to_string(),
            title: filename.to_string(),
            date: format_date(modified),
            size: 0,
            modified,
        }
    }

    #[test]
    fn title_comes_from_first_heading() {
        assert_eq!(extract_title("<h1>Hello</h1>").as_deref(), Some("Hello"));
        assert_eq!(
            extract_title(r#"<body><H1 class="title">Erster</H1><h1>Zweiter</h1></body>"#)
                .as_deref(),
            Some("Erster")
        );
    }

    #[test]
    fn title_is_the_heading_text_without_markup() {
        assert_eq!(
            extract_title("<h1>Hello <em>big</em> <a href=\"/x\">World</a></h1>").as_deref(),
            Some("Hello big World")
        );
        assert_eq!(extract_title("<h1><span></span></h1>"), None);
    }

    #[test]
    fn heading_spanning_lines_is_not_a_title() {
        assert_eq!(extract_title("<h1>Erste\nZeile</h1>"), None);
    }

    #[test]
    fn title_is_absent_without_heading() {
        assert_eq!(extract_title("<h2>Not a title</h2><p>text</p>"), None);
        assert_eq!(extract_title("<h1>   </h1>"), None);
    }

    #[test]
    fn newest_entries_sort_first_across_years() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut entries = vec![
            entry("old.html", base),
            entry("newer-year.html", base + Duration::from_secs(400 * 86_400)),
            entry("next-month.html", base + Duration::from_secs(31 * 86_400)),
        ];

        sort_newest_first(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(order, ["newer-year.html", "next-month.html", "old.html"]);
    }

    #[test]
    fn date_uses_day_month_year_without_padding() {
        let formatted = format_date(SystemTime::now());
        let parts: Vec<_> = formatted.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[0].starts_with('0'));
        assert!(!parts[1].starts_with('0'));
        assert_eq!(parts[2].len(), 4);
    }

    #[tokio::test]
    async fn listing_only_includes_html_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(temp.path().join("a.html"), "<h1>Alpha</h1>")
            .await
            .expect("write a");
        tokio::fs::write(temp.path().join("notes.txt"), "<h1>Nope</h1>")
            .await
            .expect("write txt");
        tokio::fs::write(temp.path().join("b.html"), "<p>no heading</p>")
            .await
            .expect("write b");

        let entries = list_gallery(temp.path()).await.expect("list");

        let mut names: Vec<_> = entries.iter().map(|e| e.filename.clone()).collect();
        names.sort();
        assert_eq!(names, ["a.html", "b.html"]);

        let b = entries.iter().find(|e| e.filename == "b.html").expect("b");
        assert_eq!(b.title, "b.html");
        assert_eq!(b.size, "<p>no heading</p>".len() as u64);

        let a = entries.iter().find(|e| e.filename == "a.html").expect("a");
        assert_eq!(a.title, "Alpha");
    }

    #[tokio::test]
    async fn unreadable_files_are_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(temp.path().join("good.html"), "<h1>Good</h1>")
            .await
            .expect("write good");
        tokio::fs::write(temp.path().join("binary.html"), [0xff, 0xfe, 0x00, 0xc3])
            .await
            .expect("write binary");
        tokio::fs::create_dir(temp.path().join("folder.html"))
            .await
            .expect("mkdir");

        let entries = list_gallery(temp.path()).await.expect("list");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Good");
    }

    #[tokio::test]
    async fn listing_creates_a_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("galery");

        let entries = list_gallery(&dir).await.expect("list");

        assert!(entries.is_empty());
        assert!(dir.is_dir());
    }
}
