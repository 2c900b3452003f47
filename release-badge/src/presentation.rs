use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::asset::AssetMatcher;
use crate::release::ReleaseRecord;

/// Consumer of the selected release
pub trait Presenter {
    fn present(&mut self, release: &ReleaseRecord);
}

/// Page elements updated with release details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    BadgeText,
    BadgeLink,
    VersionText,
    PrimaryDownload,
    SecondaryDownload,
}

impl ElementId {
    pub const ALL: [ElementId; 5] = [
        ElementId::BadgeText,
        ElementId::BadgeLink,
        ElementId::VersionText,
        ElementId::PrimaryDownload,
        ElementId::SecondaryDownload,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::BadgeText => "latest-release-badge-text",
            ElementId::BadgeLink => "latest-release-badge",
            ElementId::VersionText => "latest-version",
            ElementId::PrimaryDownload => "download-windows",
            ElementId::SecondaryDownload => "download-windows-hero",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where links point when a release offers nothing better
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets {
    /// Static releases page, the last resort for every link
    pub releases_page: String,
    /// Preferred download target when no installer asset was found
    pub fallback_download: Option<String>,
}

impl LinkTargets {
    pub fn for_repo(owner: &str, repo: &str) -> Self {
        Self {
            releases_page: format!("https://github.com/{owner}/{repo}/releases/latest"),
            fallback_download: None,
        }
    }

    fn download_fallback(&self) -> &str {
        self.fallback_download
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.releases_page)
    }
}

/// Values for the five page elements, derived from one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseView {
    pub badge_text: String,
    pub badge_link: String,
    pub version_text: String,
    pub primary_download: String,
    pub secondary_download: String,
}

impl ReleaseView {
    pub fn build(release: &ReleaseRecord, matcher: &AssetMatcher, links: &LinkTargets) -> Self {
        let version_text = release
            .version()
            .map(|v| format!("v{v}"))
            .unwrap_or_else(|| release.tag.clone());

        let badge_link = if release.page_url.is_empty() {
            links.releases_page.clone()
        } else {
            release.page_url.clone()
        };

        let download = matcher
            .select_installer(&release.assets)
            .map(|asset| asset.download_url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| links.download_fallback())
            .to_string();

        Self {
            badge_text: format!("Latest: {}", release.tag),
            badge_link,
            version_text,
            primary_download: download.clone(),
            secondary_download: download,
        }
    }

    pub fn value(&self, id: ElementId) -> &str {
        match id {
            ElementId::BadgeText => &self.badge_text,
            ElementId::BadgeLink => &self.badge_link,
            ElementId::VersionText => &self.version_text,
            ElementId::PrimaryDownload => &self.primary_download,
            ElementId::SecondaryDownload => &self.secondary_download,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes the release view to a terminal or any other sink
pub struct ConsolePresenter<W: Write> {
    out: W,
    format: OutputFormat,
    matcher: AssetMatcher,
    links: LinkTargets,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, format: OutputFormat, matcher: AssetMatcher, links: LinkTargets) -> Self {
        Self {
            out,
            format,
            matcher,
            links,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, view: &ReleaseView) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                for id in ElementId::ALL {
                    writeln!(self.out, "{id}: {}", view.value(id))?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, view)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn present(&mut self, release: &ReleaseRecord) {
        let view = ReleaseView::build(release, &self.matcher, &self.links);
        if let Err(e) = self.render(&view) {
            tracing::warn!("Failed to write release details: {}", e);
        }
    }
}
