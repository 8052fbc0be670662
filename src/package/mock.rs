use crate::package::{PackageManager, PublishOptions};
use crate::process::ToolFailure;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Package manager steps a test can make fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageStep {
    Install,
    Build,
    Test,
    Publish,
}

impl PackageStep {
    fn command(&self) -> &'static str {
        match self {
            PackageStep::Install => "yarn install --frozen-lockfile",
            PackageStep::Build => "yarn run build",
            PackageStep::Test => "yarn run test",
            PackageStep::Publish => "yarn publish",
        }
    }
}

#[derive(Default)]
struct MockState {
    logins: HashMap<String, String>,
    failures: HashMap<PackageStep, ToolFailure>,
    published: Vec<PublishOptions>,
    calls: Vec<String>,
}

/// Mock package manager; clones share state
#[derive(Clone, Default)]
pub struct MockPackageManager {
    inner: Rc<RefCell<MockState>>,
}

impl MockPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(self, registry: &str, user: &str) -> Self {
        self.inner
            .borrow_mut()
            .logins
            .insert(registry.to_string(), user.to_string());
        self
    }

    pub fn failing(self, step: PackageStep, code: i32) -> Self {
        self.inner
            .borrow_mut()
            .failures
            .insert(step, ToolFailure::new(step.command(), Some(code), ""));
        self
    }

    /// Steps run so far: "install", "build", "test", "publish".
    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn published(&self) -> Vec<PublishOptions> {
        self.inner.borrow().published.clone()
    }

    fn step(&self, step: PackageStep, name: &str) -> Result<(), ToolFailure> {
        self.inner.borrow_mut().calls.push(name.to_string());
        match self.inner.borrow().failures.get(&step) {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

impl PackageManager for MockPackageManager {
    fn whoami(&self, registry: &str) -> Option<String> {
        self.inner.borrow().logins.get(registry).cloned()
    }

    fn install_frozen(&self) -> Result<(), ToolFailure> {
        self.step(PackageStep::Install, "install")
    }

    fn build(&self) -> Result<(), ToolFailure> {
        self.step(PackageStep::Build, "build")
    }

    fn test(&self) -> Result<(), ToolFailure> {
        self.step(PackageStep::Test, "test")
    }

    fn publish(&self, options: &PublishOptions) -> Result<(), ToolFailure> {
        self.step(PackageStep::Publish, "publish")?;
        self.inner.borrow_mut().published.push(options.clone());
        Ok(())
    }
}
