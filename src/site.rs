//! Page assembly: index data in, rendered HTML out.
//!
//! [`Site`] wires the content index to the renderer. Every call rebuilds
//! the index it needs, so the output always reflects the directory as it
//! is right now.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::library::{build_index, ContentEntry, EntryKind, IndexError, SampleError, SampleSource};
use crate::render::{Card, ListingPage, PageRenderer, RenderError, SourcePage};

/// Mount point of the projects directory
pub const PROJECTS_MOUNT: &str = "/projects";

/// Mount point of the Fundamentals section
pub const FUNDAMENTALS_MOUNT: &str = "/fundamentals";

/// Indexed directories exposed by the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Practice projects, listed on the landing page
    Projects,

    /// Sample sources, listed on the Fundamentals page
    Fundamentals,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Projects => write!(f, "projects"),
            Section::Fundamentals => write!(f, "fundamentals"),
        }
    }
}

/// Errors raised while assembling a page
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("Sample is not listed: {0}")]
    NotListed(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl SiteError {
    /// Whether the request should be answered with the 404 page
    pub fn is_not_found(&self) -> bool {
        !matches!(self, SiteError::Render(_))
    }
}

/// Content index plus renderer for one site root
#[derive(Debug)]
pub struct Site {
    config: ResolvedConfig,
    renderer: PageRenderer,
}

impl Site {
    pub fn new(config: ResolvedConfig) -> Result<Self, RenderError> {
        Ok(Self {
            config,
            renderer: PageRenderer::new()?,
        })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Directory backing a section
    pub fn section_dir(&self, section: Section) -> &Path {
        match section {
            Section::Projects => &self.config.projects_dir,
            Section::Fundamentals => &self.config.fundamentals_dir,
        }
    }

    /// Build the index for a section
    pub async fn entries(&self, section: Section) -> Result<Vec<ContentEntry>, IndexError> {
        build_index(self.section_dir(section), &self.config.index).await
    }

    /// Landing page: the Fundamentals card followed by one card per project
    pub async fn landing_page(&self) -> Result<ListingPage, IndexError> {
        let projects = self.entries(Section::Projects).await?;

        let mut cards = Vec::with_capacity(projects.len() + 1);
        cards.push(Card {
            title: "Fundamentals".to_string(),
            description: "Begin here to learn Fundamentals".to_string(),
            href: format!("{}/", FUNDAMENTALS_MOUNT),
            action: "Source code".to_string(),
        });
        cards.extend(
            projects
                .iter()
                .map(|entry| Card::for_entry(entry, PROJECTS_MOUNT, "/index.html", "Go to Project")),
        );

        Ok(ListingPage {
            title: "The Sandbox".to_string(),
            heading: "The Sandbox".to_string(),
            back_href: None,
            cards,
        })
    }

    /// Fundamentals page: one card per sample file
    pub async fn fundamentals_page(&self) -> Result<ListingPage, IndexError> {
        let samples = self.entries(Section::Fundamentals).await?;

        Ok(ListingPage {
            title: "Fundamentals".to_string(),
            heading: "Fundamentals".to_string(),
            back_href: Some("/".to_string()),
            cards: samples
                .iter()
                .map(|entry| Card::for_entry(entry, FUNDAMENTALS_MOUNT, "", "View Source"))
                .collect(),
        })
    }

    /// Listing page for either section
    pub async fn section_page(&self, section: Section) -> Result<ListingPage, IndexError> {
        match section {
            Section::Projects => self.landing_page().await,
            Section::Fundamentals => self.fundamentals_page().await,
        }
    }

    /// Source page for one listed sample file
    pub async fn source_page(&self, name: &str) -> Result<SourcePage, SiteError> {
        let listed = self
            .entries(Section::Fundamentals)
            .await?
            .into_iter()
            .any(|entry| entry.name == name && entry.kind == EntryKind::File);
        if !listed {
            return Err(SiteError::NotListed(name.to_string()));
        }

        let sample = SampleSource::load(
            &self.config.fundamentals_dir,
            name,
            self.config.server.max_sample_bytes,
        )
        .await?;

        Ok(SourcePage {
            title: sample.name.clone(),
            name: sample.name,
            section: "Fundamentals".to_string(),
            back_href: format!("{}/", FUNDAMENTALS_MOUNT),
            language: sample.language,
            code: sample.code,
        })
    }

    pub async fn render_section(&self, section: Section) -> Result<String, SiteError> {
        let page = self.section_page(section).await?;
        Ok(self.renderer.listing(&page)?)
    }

    pub async fn render_source(&self, name: &str) -> Result<String, SiteError> {
        let page = self.source_page(name).await?;
        Ok(self.renderer.source(&page)?)
    }

    pub fn render_not_found(&self) -> Result<String, SiteError> {
        Ok(self.renderer.not_found()?)
    }

    /// Map decoded URL segments below /projects to a file inside the
    /// projects directory. `None` for anything that would leave it.
    pub fn project_file(&self, segments: &[String]) -> Option<PathBuf> {
        let mut path = self.config.projects_dir.clone();
        for segment in segments {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(path)
    }
}
