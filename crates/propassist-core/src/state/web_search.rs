//! Web search toggle.

/// Whether the backend should include its web search stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebSearchToggle {
    include_web_search: bool,
}

impl WebSearchToggle {
    pub fn new(include_web_search: bool) -> Self {
        Self { include_web_search }
    }

    pub fn include_web_search(&self) -> bool {
        self.include_web_search
    }

    pub fn set_include_web_search(&mut self, include: bool) {
        self.include_web_search = include;
    }

    /// Value of the request's `exclude_web` flag.
    pub fn exclude_web(&self) -> bool {
        !self.include_web_search
    }
}
