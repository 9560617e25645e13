//! The generic storage interface.
use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::AsyncRead;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    item,
    meta::Metadata,
    plugin::{self, Plugin},
    upload, Context, Error,
};

/// File storage, as seen by callers that don't care about the backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Does a file exist?
    async fn exists(&self, path: &str) -> crate::Result<bool>;

    /// Read a whole file. `None` if it doesn't exist.
    async fn read(&self, path: &str) -> crate::Result<Option<Bytes>>;

    /// Create or replace a file.
    async fn write(&self, path: &str, contents: Bytes) -> crate::Result<bool>;

    /// Create or replace a file with `size` bytes read from `source`.
    async fn write_stream(
        &self,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        size: u64,
    ) -> crate::Result<bool>;

    /// Delete a file. `false` if it didn't exist.
    async fn delete(&self, path: &str) -> crate::Result<bool>;

    /// List the entries of a directory.
    async fn list_contents(&self, dir: &str) -> crate::Result<Vec<Metadata>>;

    /// Metadata of a file.
    async fn metadata(&self, path: &str) -> crate::Result<Metadata>;

    /// Public url of a file. `None` if it doesn't exist.
    async fn url(&self, path: &str) -> crate::Result<Option<String>>;
}

#[async_trait]
impl Storage for Context {
    async fn exists(&self, path: &str) -> crate::Result<bool> {
        item::exists(self, path).await
    }

    async fn read(&self, path: &str) -> crate::Result<Option<Bytes>> {
        item::read(self, path).await
    }

    async fn write(&self, path: &str, contents: Bytes) -> crate::Result<bool> {
        item::write(self, path, contents).await
    }

    async fn write_stream(
        &self,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        size: u64,
    ) -> crate::Result<bool> {
        upload::write_stream(self, path, source, size).await
    }

    async fn delete(&self, path: &str) -> crate::Result<bool> {
        item::delete(self, path).await
    }

    async fn list_contents(&self, dir: &str) -> crate::Result<Vec<Metadata>> {
        item::list_contents(self, dir).await
    }

    async fn metadata(&self, path: &str) -> crate::Result<Metadata> {
        item::metadata(self, path).await
    }

    async fn url(&self, path: &str) -> crate::Result<Option<String>> {
        item::url(self, path).await
    }
}

/// A [`Context`] plus the plugins extending it beyond [`Storage`].
#[derive(Debug)]
pub struct Filesystem {
    ctx: Context,
    plugins: HashMap<&'static str, Box<dyn Plugin>>,
}

impl Filesystem {
    /// Wrap a context without any plugins.
    #[must_use]
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            plugins: HashMap::new(),
        }
    }

    /// Wrap a context with every plugin this crate ships:
    /// [`plugin::GetUrl`], [`plugin::CreateDrive`], [`plugin::DeleteDrive`]
    /// and [`plugin::InviteUser`].
    #[must_use]
    pub fn with_default_plugins(ctx: Context) -> Self {
        let mut fs = Self::new(ctx);

        fs.add_plugin(plugin::GetUrl)
            .add_plugin(plugin::CreateDrive)
            .add_plugin(plugin::DeleteDrive)
            .add_plugin(plugin::InviteUser);

        fs
    }

    /// Register a plugin, replacing any plugin with the same method name.
    pub fn add_plugin(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        self.plugins.insert(plugin.method(), Box::new(plugin));
        self
    }

    /// Call a plugin method, forwarding the arguments unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMethod`] if no plugin handles `method`
    /// - whatever the plugin fails with
    #[instrument(skip(self))]
    pub async fn call(&mut self, method: &str, args: &[Value]) -> crate::Result<Value> {
        let plugin = self
            .plugins
            .get(method)
            .ok_or_else(|| Error::UnknownMethod(method.into()))?;

        debug!("dispatching to plugin");

        plugin.handle(&mut self.ctx, args).await
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The wrapped context, mutably, e.g. to switch drives.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

#[async_trait]
impl Storage for Filesystem {
    async fn exists(&self, path: &str) -> crate::Result<bool> {
        self.ctx.exists(path).await
    }

    async fn read(&self, path: &str) -> crate::Result<Option<Bytes>> {
        self.ctx.read(path).await
    }

    async fn write(&self, path: &str, contents: Bytes) -> crate::Result<bool> {
        self.ctx.write(path, contents).await
    }

    async fn write_stream(
        &self,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        size: u64,
    ) -> crate::Result<bool> {
        self.ctx.write_stream(path, source, size).await
    }

    async fn delete(&self, path: &str) -> crate::Result<bool> {
        self.ctx.delete(path).await
    }

    async fn list_contents(&self, dir: &str) -> crate::Result<Vec<Metadata>> {
        self.ctx.list_contents(dir).await
    }

    async fn metadata(&self, path: &str) -> crate::Result<Metadata> {
        self.ctx.metadata(path).await
    }

    async fn url(&self, path: &str) -> crate::Result<Option<String>> {
        self.ctx.url(path).await
    }
}
