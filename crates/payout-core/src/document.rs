//! Transient object-URL handles for the document viewer
//!
//! The renderer loads documents by URL. A URL created for a file must be
//! revoked when the viewer switches files or is torn down, otherwise the
//! blob it pins is never released.

use tracing::debug;

/// Creates and revokes object URLs for a platform blob type
pub trait ObjectUrlProvider {
    type Blob;
    type Error;

    fn create(&self, blob: &Self::Blob) -> Result<String, Self::Error>;
    fn revoke(&self, url: &str);
}

/// An object URL that is revoked when dropped
pub struct ScopedObjectUrl<P: ObjectUrlProvider> {
    url: String,
    provider: P,
}

impl<P: ObjectUrlProvider> ScopedObjectUrl<P> {
    pub fn acquire(provider: P, blob: &P::Blob) -> Result<Self, P::Error> {
        let url = provider.create(blob)?;
        debug!(%url, "object url acquired");
        Ok(Self { url, provider })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<P: ObjectUrlProvider> Drop for ScopedObjectUrl<P> {
    fn drop(&mut self) {
        debug!(url = %self.url, "object url released");
        self.provider.revoke(&self.url);
    }
}

/// Holds at most one live URL: the one for the current file
pub struct DocumentSource<P: ObjectUrlProvider + Clone> {
    provider: P,
    current: Option<ScopedObjectUrl<P>>,
}

impl<P: ObjectUrlProvider + Clone> DocumentSource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    /// Switch to `blob`, releasing the previous URL first.
    /// On error no URL is held.
    pub fn load(&mut self, blob: &P::Blob) -> Result<&str, P::Error> {
        self.current = None;
        let scoped = ScopedObjectUrl::acquire(self.provider.clone(), blob)?;
        Ok(self.current.insert(scoped).url())
    }

    pub fn url(&self) -> Option<&str> {
        self.current.as_ref().map(ScopedObjectUrl::url)
    }

    /// Release the current URL without loading another
    pub fn clear(&mut self) {
        self.current = None;
    }
}
