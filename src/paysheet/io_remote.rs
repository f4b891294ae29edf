// Downloading a report from a shared spreadsheet link.

use regex::Regex;
use std::sync::OnceLock;

use crate::paysheet::*;

fn share_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)(/[^?#]*)?(?:[?#].*)?$")
            .expect("valid share link pattern")
    })
}

fn gid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[?#&]gid=([0-9]+)").expect("valid gid pattern"))
}

/// The direct xlsx download link of a spreadsheet share link.
///
/// The sheet id (`gid`) of the link is kept. A link that already points to
/// the export is returned unchanged, anything else gives `None`.
pub fn export_url(share_url: &str) -> Option<String> {
    let share_url = share_url.trim();
    let caps = share_pattern().captures(share_url)?;
    if caps
        .get(2)
        .map(|m| m.as_str().starts_with("/export"))
        .unwrap_or(false)
    {
        return Some(share_url.to_string());
    }
    let id = caps.get(1)?.as_str();
    let mut url = format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=xlsx",
        id
    );
    if let Some(gid) = gid_pattern().captures(share_url).and_then(|c| c.get(1)) {
        url.push_str("&gid=");
        url.push_str(gid.as_str());
    }
    debug!("export_url: {:?} -> {:?}", share_url, url);
    Some(url)
}

/// Downloads the bytes behind `url`.
pub fn fetch_remote(url: &str) -> PaysheetResult<Vec<u8>> {
    info!("Downloading {:?}", url);
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .context(FetchingSnafu { url })?;
    let bytes = response.bytes().context(FetchingSnafu { url })?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_links() {
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/1AbC-d_9/edit?usp=sharing"),
            Some("https://docs.google.com/spreadsheets/d/1AbC-d_9/export?format=xlsx".to_string())
        );
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/1AbC/edit#gid=42"),
            Some("https://docs.google.com/spreadsheets/d/1AbC/export?format=xlsx&gid=42".to_string())
        );
        assert_eq!(
            export_url(" https://docs.google.com/spreadsheets/d/1AbC "),
            Some("https://docs.google.com/spreadsheets/d/1AbC/export?format=xlsx".to_string())
        );
    }

    #[test]
    fn export_links_are_kept() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC/export?format=xlsx&gid=7";
        assert_eq!(export_url(url), Some(url.to_string()));
    }

    #[test]
    fn other_links() {
        assert_eq!(export_url("https://example.com/report.xlsx"), None);
        assert_eq!(export_url("docs.google.com/spreadsheets/d/1AbC"), None);
        assert_eq!(export_url(""), None);
    }
}
