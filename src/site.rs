//! View state for the home page and the outbound link fragment.

use serde::{Deserialize, Serialize};

use crate::github::Release;

/// Local state of the home page once the lookups have settled.
///
/// Fields stay `None` until their lookup succeeds; `has_releases` is `None`
/// only before the release lookup has settled at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_releases: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
}

impl HomeState {
    pub fn record_release(&mut self, release: Release) {
        self.has_releases = Some(true);
        self.latest_version = Some(release.tag_name);
        self.release_url = Some(release.html_url);
    }

    pub fn record_no_release(&mut self) {
        self.has_releases = Some(false);
        self.latest_version = None;
        self.release_url = None;
    }
}

/// Collapsible header menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavBar {
    pub open: bool,
}

impl NavBar {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

/// The matrix-kind tabs on the home page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeTab {
    #[default]
    FullyDynamicMatrices,
    FullyStaticMatrices,
    DynamicRowMatrices,
    DynamicColumnMatrices,
}

impl HomeTab {
    pub const ALL: [HomeTab; 4] = [
        HomeTab::FullyDynamicMatrices,
        HomeTab::FullyStaticMatrices,
        HomeTab::DynamicRowMatrices,
        HomeTab::DynamicColumnMatrices,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HomeTab::FullyDynamicMatrices => "fully_dynamic_matrices",
            HomeTab::FullyStaticMatrices => "fully_static_matrices",
            HomeTab::DynamicRowMatrices => "dynamic_row_matrices",
            HomeTab::DynamicColumnMatrices => "dynamic_column_matrices",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// Which matrix-kind tab is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeTabs {
    pub active: HomeTab,
}

impl HomeTabs {
    /// Switch to `tab`; returns false when it was already active.
    pub fn go_to(&mut self, tab: HomeTab) -> bool {
        if self.active == tab {
            return false;
        }
        self.active = tab;
        true
    }

    pub fn is_active(&self, tab: HomeTab) -> bool {
        self.active == tab
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the hero's outbound links. Links whose target is unknown are left out.
pub fn render_links(state: &HomeState) -> String {
    let mut out = String::new();
    if let Some(url) = &state.repo_url {
        out.push_str(&format!(
            "<a class=\"btn btn-primary\" href=\"{}\">GitHub Repository</a>\n",
            escape(url)
        ));
    }
    if state.has_releases == Some(true) {
        if let (Some(tag), Some(url)) = (&state.latest_version, &state.release_url) {
            out.push_str(&format!(
                "<a class=\"btn btn-secondary\" href=\"{}\">Latest release {}</a>\n",
                escape(url),
                escape(tag)
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_release_renders_no_release_link() {
        let mut state = HomeState::default();
        state.record_no_release();
        assert_eq!(serde_json::to_value(&state).unwrap(), serde_json::json!({"has_releases": false}));
        assert!(!render_links(&state).contains("Latest release"));
    }

    #[test]
    fn release_link_uses_tag_and_url() {
        let mut state = HomeState::default();
        state.record_release(Release {
            tag_name: "v1.0".into(),
            html_url: "https://x/releases/v1.0".into(),
        });
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({
                "has_releases": true,
                "latest_version": "v1.0",
                "release_url": "https://x/releases/v1.0"
            })
        );
        assert!(render_links(&state).contains("href=\"https://x/releases/v1.0\">Latest release v1.0</a>"));
    }

    #[test]
    fn repository_link_points_at_lookup_result() {
        let state = HomeState {
            repo_url: Some("https://github.com/sam20908/matrixpp".into()),
            ..Default::default()
        };
        let html = render_links(&state);
        assert!(html.contains("href=\"https://github.com/sam20908/matrixpp\">GitHub Repository</a>"));
        assert!(render_links(&HomeState::default()).is_empty());
    }

    #[test]
    fn escapes_attribute_values() {
        let state = HomeState {
            repo_url: Some("https://x/?a=1&b=\"2\"".into()),
            ..Default::default()
        };
        assert!(render_links(&state).contains("href=\"https://x/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn navbar_toggles() {
        let mut nav = NavBar::default();
        assert!(!nav.open);
        nav.toggle();
        assert!(nav.open);
        nav.toggle();
        assert!(!nav.open);
    }

    #[test]
    fn tabs_start_on_fully_dynamic() {
        let tabs = HomeTabs::default();
        assert_eq!(tabs.active.id(), "fully_dynamic_matrices");
        assert!(tabs.is_active(HomeTab::FullyDynamicMatrices));
    }

    #[test]
    fn go_to_only_changes_on_a_different_tab() {
        let mut tabs = HomeTabs::default();
        assert!(!tabs.go_to(HomeTab::FullyDynamicMatrices));
        assert!(tabs.go_to(HomeTab::DynamicRowMatrices));
        assert_eq!(tabs.active, HomeTab::DynamicRowMatrices);
        assert!(!tabs.go_to(HomeTab::DynamicRowMatrices));
    }

    #[test]
    fn tab_ids_round_trip() {
        for tab in HomeTab::ALL {
            assert_eq!(HomeTab::from_id(tab.id()), Some(tab));
            assert_eq!(serde_json::to_value(tab).unwrap(), tab.id());
        }
        assert_eq!(HomeTab::from_id("sparse_matrices"), None);
    }
}
