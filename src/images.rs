//! Optional download of article images.
//!
//! Each item's image is fetched from its `src` (resolved against the page
//! URL when relative) and stored as `images_dir/<image_name>`, so the file
//! on disk matches the report's Image Name column. Only path separators and
//! NUL are replaced. A name already taken by an earlier item is skipped
//! rather than overwritten. Failed downloads, including an unusable image
//! directory, are logged and skipped; they never fail the run.

use crate::models::NewsItem;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Resolve an image `src` to an absolute URL.
///
/// Returns `None` for empty or unparseable sources and for non-HTTP schemes
/// such as inline `data:` images.
pub fn resolve_image_url(page_url: &str, src: &str) -> Option<Url> {
    if src.trim().is_empty() {
        return None;
    }
    let resolved = match Url::parse(src) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url).ok()?.join(src).ok()?,
        Err(_) => return None,
    };
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// File name an image is stored under, `None` when it has no usable name.
fn target_path(images_dir: &Path, image_name: &str) -> Option<PathBuf> {
    if image_name.is_empty() || image_name == "." || image_name == ".." {
        return None;
    }
    let name: String = image_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    Some(images_dir.join(name))
}

/// Pair each downloadable image with its target path, first name wins.
fn plan_downloads(page_url: &str, items: &[NewsItem], images_dir: &Path) -> Vec<(Url, PathBuf)> {
    let mut taken = HashSet::new();
    let mut jobs = Vec::with_capacity(items.len());
    for item in items {
        let Some((url, path)) = resolve_image_url(page_url, &item.image_src)
            .zip(target_path(images_dir, &item.image_name))
        else {
            debug!(src = %item.image_src, "No downloadable image");
            continue;
        };
        if !taken.insert(path.clone()) {
            warn!(%url, image_name = %item.image_name, "Image name already used by an earlier item; skipping");
            continue;
        }
        jobs.push((url, path));
    }
    jobs
}

async fn download(client: &Client, url: &Url, path: &Path) -> Result<usize, Box<dyn Error>> {
    let bytes = client.get(url.clone()).send().await?.error_for_status()?.bytes().await?;
    fs::write(path, &bytes).await?;
    Ok(bytes.len())
}

/// Download every item's image into `images_dir`, one at a time.
///
/// # Returns
///
/// The paths written successfully.
#[instrument(level = "info", skip_all, fields(images_dir = %images_dir.display(), items = items.len()))]
pub async fn download_images(page_url: &str, items: &[NewsItem], images_dir: &Path) -> Vec<PathBuf> {
    if let Err(e) = fs::create_dir_all(images_dir).await {
        error!(error = %e, "Could not create image directory; skipping downloads");
        return Vec::new();
    }
    let client = match Client::builder().timeout(Duration::from_secs(30)).build() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not build HTTP client; skipping downloads");
            return Vec::new();
        }
    };

    let saved: Vec<PathBuf> = stream::iter(plan_downloads(page_url, items, images_dir))
        .then(|(url, path)| {
            let client = &client;
            async move {
                match download(client, &url, &path).await {
                    Ok(bytes) => {
                        debug!(%url, path = %path.display(), bytes, "Saved image");
                        Some(path)
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "Image download failed");
                        None
                    }
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(saved = saved.len(), "Image downloads finished");
    saved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_and_relative() {
        assert_eq!(
            resolve_image_url("https://news.test/search?q=x", "https://cdn.test/a.jpg")
                .unwrap()
                .as_str(),
            "https://cdn.test/a.jpg"
        );
        assert_eq!(
            resolve_image_url("https://news.test/search?q=x", "/img/b.jpg")
                .unwrap()
                .as_str(),
            "https://news.test/img/b.jpg"
        );
    }

    #[test]
    fn test_resolve_rejects_unusable_sources() {
        assert!(resolve_image_url("https://news.test/", "").is_none());
        assert!(resolve_image_url("https://news.test/", "data:image/png;base64,AAAA").is_none());
        assert!(resolve_image_url("not a url", "/relative.jpg").is_none());
    }

    #[test]
    fn test_target_path_matches_image_name() {
        let dir = Path::new("/tmp/imgs");
        let item = NewsItem::new("T", "D", "S", "https://cdn.test/a/p.jpg?w=300");
        let path = target_path(dir, &item.image_name).unwrap();
        assert_eq!(path.file_name().unwrap(), item.image_name.as_str());
        assert_eq!(target_path(dir, ""), None);
        assert_eq!(target_path(dir, ".."), None);
    }

    #[test]
    fn test_target_path_replaces_separators() {
        let dir = Path::new("/tmp/imgs");
        assert_eq!(
            target_path(dir, "a\\b.jpg"),
            Some(PathBuf::from("/tmp/imgs/a_b.jpg"))
        );
    }

    #[test]
    fn test_plan_skips_repeated_names() {
        let dir = Path::new("/tmp/imgs");
        let items = vec![
            NewsItem::new("A", "D", "S", "https://cdn1.test/x/image.jpg"),
            NewsItem::new("B", "D", "S", "https://cdn2.test/y/image.jpg"),
            NewsItem::new("C", "D", "S", "https://cdn1.test/x/other.jpg"),
            NewsItem::new("D", "D", "S", ""),
        ];
        let jobs = plan_downloads("https://news.test/", &items, dir);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].0.as_str(), "https://cdn1.test/x/image.jpg");
        assert_eq!(jobs[0].1, dir.join("image.jpg"));
        assert_eq!(jobs[1].1, dir.join("other.jpg"));
    }

    #[tokio::test]
    async fn test_no_downloadable_images_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("images");
        let items = vec![NewsItem::new("T", "D", "S", "")];
        let saved = download_images("https://news.test/", &items, &dir).await;
        assert!(saved.is_empty());
        assert!(dir.is_dir());
    }
}
