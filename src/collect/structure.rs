use serde::Serialize;
use tracing::{debug, info};

use crate::browser::accessor::{DocumentAccessor, ElementHandle, QueryKind, Rect};
use crate::element::classifier::ContainerType;

pub const TOP_BAR_SELECTORS: &[&str] = &[
    "#top-bar",
    "header",
    ".navbar",
    ".header",
    "[role='banner']",
    "nav.navbar",
];

pub const SIDE_BAR_SELECTORS: &[&str] = &[
    "#navbar",
    ".sidebar",
    "#sidebar",
    ".sidenav",
    ".menu-nav",
    ".side-menu",
];

pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "#content",
    ".content",
    "[role='main']",
    ".main-content",
    ".container",
];

pub const NAVIGATION_SELECTORS: &[&str] = &[
    "nav",
    "[role='navigation']",
    ".navigation",
    ".nav-container",
];

/// A detected page region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Candidate selector that found the region.
    pub selector: String,
    #[serde(skip)]
    pub handle: ElementHandle,
    pub geometry: Rect,
}

/// Coarse layout of the page: which well-known regions exist and where.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageStructure {
    pub top_bar: Option<Region>,
    pub side_bar: Option<Region>,
    pub main_content: Option<Region>,
    pub navigation: Option<Region>,
}

impl PageStructure {
    /// Region hint for an element, checked top bar, then side bar, then navigation.
    pub fn container_for(&self, rect: &Rect) -> Option<ContainerType> {
        let inside = |region: &Option<Region>| {
            region
                .as_ref()
                .is_some_and(|r| r.geometry.contains(rect))
        };

        if inside(&self.top_bar) {
            Some(ContainerType::TopBar)
        } else if inside(&self.side_bar) {
            Some(ContainerType::SideBar)
        } else if inside(&self.navigation) {
            Some(ContainerType::Navigation)
        } else {
            None
        }
    }

    pub fn detected(&self) -> Vec<(&'static str, &Region)> {
        [
            ("top_bar", &self.top_bar),
            ("side_bar", &self.side_bar),
            ("main_content", &self.main_content),
            ("navigation", &self.navigation),
        ]
        .into_iter()
        .filter_map(|(name, region)| region.as_ref().map(|r| (name, r)))
        .collect()
    }
}

/// Probe the candidate selector lists; the first match per region wins.
pub fn detect_structure<A: DocumentAccessor + ?Sized>(accessor: &A) -> PageStructure {
    let structure = PageStructure {
        top_bar: detect_region(accessor, "top_bar", TOP_BAR_SELECTORS),
        side_bar: detect_region(accessor, "side_bar", SIDE_BAR_SELECTORS),
        main_content: detect_region(accessor, "main_content", CONTENT_SELECTORS),
        navigation: detect_region(accessor, "navigation", NAVIGATION_SELECTORS),
    };
    info!(regions = structure.detected().len(), "page structure detected");
    structure
}

fn detect_region<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    region: &str,
    selectors: &[&str],
) -> Option<Region> {
    for selector in selectors {
        let handle = match accessor.query(QueryKind::Css, selector) {
            Ok(found) => found.into_iter().next(),
            Err(e) => {
                debug!(region, selector, error = %e, "region probe failed");
                continue;
            }
        };

        if let Some(handle) = handle {
            let geometry = accessor.read_geometry(&handle).unwrap_or(Rect::EMPTY);
            info!(region, selector, "region found");
            return Some(Region {
                selector: selector.to_string(),
                handle,
                geometry,
            });
        }
    }
    None
}
