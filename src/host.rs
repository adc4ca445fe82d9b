//! Host Page Boundary
//!
//! Capture and replacement run inside the target page. Browsers refuse
//! script injection on privileged pages, which callers see as an error
//! from [`PageHost::page`].

use serde::{Deserialize, Serialize};

use crate::error::{TypewellError, TypewellResult};
use crate::page::Page;

/// URL prefixes where extensions may not run page scripts
const RESTRICTED_PREFIXES: [&str; 8] = [
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "edge://",
    "about:",
    "view-source:",
    "https://chrome.google.com/webstore",
    "https://chromewebstore.google.com",
];

/// Access to a page's script context
pub trait PageHost {
    fn page(&mut self) -> TypewellResult<&mut Page>;
}

/// A browser tab: its URL and the page loaded in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub url: String,
    pub page: Page,
}

impl Tab {
    pub fn new(url: impl Into<String>, page: Page) -> Self {
        Self {
            url: url.into(),
            page,
        }
    }

    pub fn is_restricted(&self) -> bool {
        let url = self.url.trim().to_ascii_lowercase();
        RESTRICTED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
    }
}

impl PageHost for Tab {
    fn page(&mut self) -> TypewellResult<&mut Page> {
        if self.is_restricted() {
            return Err(TypewellError::InjectionDenied(self.url.clone()));
        }
        Ok(&mut self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_urls_are_denied() {
        for url in ["chrome://settings", "about:blank", "CHROME-EXTENSION://abc/popup.html"] {
            let mut tab = Tab::new(url, Page::default());
            assert!(
                matches!(tab.page(), Err(TypewellError::InjectionDenied(_))),
                "{url} should be denied"
            );
        }
    }

    #[test]
    fn test_regular_pages_are_accessible() {
        let mut tab = Tab::new("https://example.com/compose", Page::default());
        assert!(tab.page().is_ok());
    }
}
