use crate::domain::ReleaseNotes;
use crate::hosting::ReleaseHost;
use crate::process::ToolFailure;
use std::cell::RefCell;
use std::rc::Rc;

struct MockState {
    available: bool,
    failure: Option<ToolFailure>,
    drafts: Vec<ReleaseNotes>,
}

/// Mock release host; clones share state
#[derive(Clone)]
pub struct MockReleaseHost {
    inner: Rc<RefCell<MockState>>,
}

impl MockReleaseHost {
    /// An installed hosting CLI that accepts every draft
    pub fn new() -> Self {
        MockReleaseHost {
            inner: Rc::new(RefCell::new(MockState {
                available: true,
                failure: None,
                drafts: Vec::new(),
            })),
        }
    }

    pub fn unavailable(self) -> Self {
        self.inner.borrow_mut().available = false;
        self
    }

    pub fn failing(self, stderr: &str) -> Self {
        self.inner.borrow_mut().failure =
            Some(ToolFailure::new("gh release create", Some(1), stderr));
        self
    }

    pub fn drafts(&self) -> Vec<ReleaseNotes> {
        self.inner.borrow().drafts.clone()
    }
}

impl Default for MockReleaseHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseHost for MockReleaseHost {
    fn program(&self) -> &str {
        "gh"
    }

    fn is_available(&self) -> bool {
        self.inner.borrow().available
    }

    fn create_draft(&self, notes: &ReleaseNotes) -> Result<String, ToolFailure> {
        if let Some(failure) = self.inner.borrow().failure.clone() {
            return Err(failure);
        }
        self.inner.borrow_mut().drafts.push(notes.clone());
        Ok(format!("https://github.com/acme/widgets/releases/tag/{}", notes.tag))
    }
}
