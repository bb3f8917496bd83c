//! HTML rendering for sandbox pages.
//!
//! Pages are plain serializable view models fed to Handlebars templates
//! compiled into the binary. Nothing in here touches the filesystem.

pub mod cards;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

pub use cards::{Card, ListingPage, NotFoundPage, SourcePage};

/// Embedded stylesheet served at /assets/style.css
pub const STYLE_CSS: &str = include_str!("../../assets/style.css");

/// Embedded script served at /assets/script.js
pub const SCRIPT_JS: &str = include_str!("../../assets/script.js");

/// Errors raised while rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to register template '{name}': {message}")]
    Template { name: String, message: String },

    #[error("Template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Template engine with the sandbox pages pre-registered.
///
/// Output is HTML-escaped, so entry names and descriptions taken from the
/// filesystem are safe to display.
#[derive(Debug)]
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    /// Create a renderer with all built-in templates registered
    pub fn new() -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        handlebars
            .register_partial("head", include_str!("../../templates/head.hbs"))
            .map_err(|e| RenderError::Template {
                name: "head".to_string(),
                message: e.to_string(),
            })?;

        let templates = [
            ("listing", include_str!("../../templates/listing.hbs")),
            ("source", include_str!("../../templates/source.hbs")),
            ("not_found", include_str!("../../templates/not_found.hbs")),
        ];
        for (name, source) in templates {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| RenderError::Template {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Render a card listing
    pub fn listing(&self, page: &ListingPage) -> Result<String, RenderError> {
        self.render("listing", page)
    }

    /// Render a sample source page
    pub fn source(&self, page: &SourcePage) -> Result<String, RenderError> {
        self.render("source", page)
    }

    /// Render the 404 page
    pub fn not_found(&self) -> Result<String, RenderError> {
        self.render("not_found", &NotFoundPage::default())
    }

    fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String, RenderError> {
        Ok(self.handlebars.render(template, context)?)
    }
}
