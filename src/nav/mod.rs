//! Sidebar navigation: which link is active and where the page scrolls.

use crate::modules::ModuleKind;

/// How the page moves to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

/// A sidebar link pointing at a page fragment (e.g. `#pricing`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A page section a link can scroll to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    /// The dashboard module rendered in this section, if any.
    pub module: Option<ModuleKind>,
}

/// A completed scroll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTo {
    pub section_id: String,
    pub behavior: ScrollBehavior,
}

/// Sidebar state bound to the sections of one page.
#[derive(Debug, Clone, Default)]
pub struct NavController {
    links: Vec<NavLink>,
    sections: Vec<Section>,
    last_scroll: Option<ScrollTo>,
}

/// Section id of the chat widget.
pub const CHAT_SECTION: &str = "chatbot";

impl NavController {
    /// Bind `links` to the given page sections. No link starts active.
    pub fn bind(links: Vec<NavLink>, sections: Vec<Section>) -> Self {
        Self {
            links,
            sections,
            last_scroll: None,
        }
    }

    /// The standard dashboard sidebar: one link and section per module,
    /// with the chat widget between compliance and prediction and the
    /// generator hub last.
    pub fn dashboard() -> Self {
        let entries = [
            ("Sentiment Analysis", "sentiment", Some(ModuleKind::Sentiment)),
            ("Competitor Benchmark", "benchmark", Some(ModuleKind::Benchmark)),
            ("Smart Pricing", "pricing", Some(ModuleKind::Pricing)),
            ("Compliance Check", "compliance", Some(ModuleKind::Compliance)),
            ("AI Chatbot", CHAT_SECTION, None),
            ("Predictive Analytics", "prediction", Some(ModuleKind::Prediction)),
            ("Personalization", "personalization", Some(ModuleKind::Personalization)),
            ("Campaign Strategist", "marketing-campaign", Some(ModuleKind::MarketingCampaign)),
            ("Sales Pitch Architect", "sales-pitch", Some(ModuleKind::SalesPitch)),
            ("Lead Scorer", "lead-score", Some(ModuleKind::LeadScore)),
        ];

        let links = entries
            .iter()
            .map(|(label, id, _)| NavLink {
                label: label.to_string(),
                href: format!("#{id}"),
                active: false,
            })
            .collect();
        let sections = entries
            .iter()
            .map(|(_, id, module)| Section {
                id: id.to_string(),
                module: *module,
            })
            .collect();

        Self::bind(links, sections)
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// The currently active link, if any.
    pub fn active(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }

    /// The most recent scroll, if any click found its section.
    pub fn last_scroll(&self) -> Option<&ScrollTo> {
        self.last_scroll.as_ref()
    }

    /// Handle a click on the link at `index`.
    ///
    /// The clicked link becomes the only active one. The target id is the
    /// href minus its leading character; when no section has that id the
    /// page does not scroll and `None` is returned. Out-of-range indexes
    /// are ignored.
    pub fn click(&mut self, index: usize) -> Option<&Section> {
        if index >= self.links.len() {
            return None;
        }

        for link in &mut self.links {
            link.active = false;
        }
        self.links[index].active = true;

        let target: String = self.links[index].href.chars().skip(1).collect();
        let section = self.sections.iter().find(|s| s.id == target)?;

        self.last_scroll = Some(ScrollTo {
            section_id: section.id.clone(),
            behavior: ScrollBehavior::Smooth,
        });
        Some(section)
    }

    /// Click the first link whose href is `href` (e.g. `#pricing`).
    pub fn click_href(&mut self, href: &str) -> Option<&Section> {
        let index = self.links.iter().position(|l| l.href == href)?;
        self.click(index)
    }
}
