//! Asset routing.
//!
//! The host asks, per asset name, who loads it and who edits it. Loading
//! always happens before editing so edits see the loaded content.

use tracing::debug;

use crate::error::Result;

/// An asset request being routed through the integration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRequest {
    /// Asset name as the host knows it.
    pub name: String,
    /// Who claimed the load, if anyone.
    pub loaded_by: Option<String>,
    /// Edits applied, in order.
    pub edits: Vec<String>,
}

impl AssetRequest {
    /// A fresh request for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether anything claimed or changed this asset.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.loaded_by.is_some() || !self.edits.is_empty()
    }
}

/// Asset collaborator supplied by the host integration.
pub trait AssetRouter {
    /// Claim the load of `request` if this integration provides it.
    fn load(&mut self, request: &mut AssetRequest);

    /// Apply edits to `request`.
    fn edit(&mut self, request: &mut AssetRequest);

    /// Drop the host's cached copy of `name` so it is re-requested.
    ///
    /// # Errors
    /// Returns an error if the host cannot invalidate the asset.
    fn invalidate(&mut self, name: &str) -> Result<()>;
}

/// Router that claims nothing. For hosts without custom assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetRouter for NoAssets {
    fn load(&mut self, _request: &mut AssetRequest) {}

    fn edit(&mut self, _request: &mut AssetRequest) {}

    fn invalidate(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Route one request: load, then edit.
pub fn route(router: &mut dyn AssetRouter, name: &str) -> AssetRequest {
    let mut request = AssetRequest::new(name);
    router.load(&mut request);
    router.edit(&mut request);
    if request.is_handled() {
        debug!(
            asset = name,
            loaded_by = ?request.loaded_by,
            edits = request.edits.len(),
            "asset routed"
        );
    }
    request
}

/// Host name of a character's dialogue asset.
#[must_use]
pub fn dialogue_asset(character: &str) -> String {
    format!("Characters/Dialogue/{character}")
}
