//! Operations on single items, addressed by adapter path.
//!
//! Every operation resolves its [`Location`](crate::path::Location) first and
//! then looks the item up by path. Not finding the item is not an error for
//! [`exists`], [`read`], [`url`], [`delete`] and [`invite_user`]; they answer
//! `false` or `None` instead. That holds for the request following the
//! lookup too, since the item may be deleted in between.
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use graph_fs::{drive::DriveItem, sharing::InviteRequest, sharing::Permission};
use tracing::{debug, instrument, trace};

use crate::{errors::found, meta::Metadata, path::Location, Context};

async fn lookup(ctx: &Context, path: &str) -> crate::Result<Option<(Location, DriveItem)>> {
    let location = ctx.locate(path).await?;
    let item = found(ctx.fs.item_by_path(&location.prefix, &location.item).await)?;

    Ok(item.map(|item| (location, item)))
}

/// Does an item exist at the path?
///
/// # Errors
///
/// Any error except the item not existing.
#[instrument(skip(ctx))]
pub async fn exists(ctx: &Context, path: &str) -> crate::Result<bool> {
    Ok(lookup(ctx, path).await?.is_some())
}

/// Read a whole file into memory. `None` if there is no such file.
///
/// # Errors
///
/// Any error except the file not existing.
#[instrument(skip(ctx))]
pub async fn read(ctx: &Context, path: &str) -> crate::Result<Option<Bytes>> {
    let (location, item) = match lookup(ctx, path).await? {
        Some(found) => found,
        None => return Ok(None),
    };

    let stream = match found(ctx.fs.content_stream(&location.prefix, &item.id).await)? {
        Some(stream) => stream,
        None => return Ok(None),
    };

    let mut stream = Box::pin(stream);
    let mut buf = BytesMut::with_capacity(item.size.unwrap_or_default().try_into().unwrap_or(0));

    while let Some(chunk) = stream.try_next().await? {
        trace!("received {} bytes", chunk.len());
        buf.extend_from_slice(&chunk);
    }

    debug!("read {} bytes", buf.len());

    Ok(Some(buf.freeze()))
}

/// Create or replace a file in a single request.
///
/// Graph refuses bodies larger than 4 MB this way; use
/// [`crate::upload::write_stream`] for anything that might be larger.
///
/// # Errors
///
/// Graph and network errors.
#[instrument(skip(ctx, contents), fields(len = contents.len()))]
pub async fn write(ctx: &Context, path: &str, contents: Bytes) -> crate::Result<bool> {
    let location = ctx.locate(path).await?;

    let item = ctx
        .fs
        .put_content(&location.prefix, &location.item, contents)
        .await?;

    debug!("wrote item {}", item.id);

    Ok(true)
}

/// Web url of an item. `None` if there is no such item, or if Graph doesn't
/// report a url for it.
///
/// # Errors
///
/// Any error except the item not existing.
#[instrument(skip(ctx))]
pub async fn url(ctx: &Context, path: &str) -> crate::Result<Option<String>> {
    Ok(lookup(ctx, path).await?.and_then(|(_, item)| item.web_url))
}

/// Delete an item. `false` if there was nothing to delete.
///
/// # Errors
///
/// Any error except the item not existing.
#[instrument(skip(ctx))]
pub async fn delete(ctx: &Context, path: &str) -> crate::Result<bool> {
    let (location, item) = match lookup(ctx, path).await? {
        Some(found) => found,
        None => return Ok(false),
    };

    if found(ctx.fs.delete_item(&location.prefix, &item.id).await)?.is_none() {
        debug!("item {} vanished before it could be deleted", item.id);
        return Ok(false);
    }

    debug!("deleted item {}", item.id);

    Ok(true)
}

/// Metadata of an item.
///
/// # Errors
///
/// - [`graph_fs::Error::NotFound`] if there is no such item
/// - Graph and network errors
#[instrument(skip(ctx))]
pub async fn metadata(ctx: &Context, path: &str) -> crate::Result<Metadata> {
    let location = ctx.locate(path).await?;
    let item = ctx
        .fs
        .item_by_path(&location.prefix, &location.item)
        .await?;

    Ok(item.into())
}

/// Size of an item in bytes.
///
/// # Errors
///
/// Same as [`metadata`].
pub async fn size(ctx: &Context, path: &str) -> crate::Result<u64> {
    Ok(metadata(ctx, path).await?.size)
}

/// Mime type of a file.
///
/// # Errors
///
/// Same as [`metadata`].
pub async fn mimetype(ctx: &Context, path: &str) -> crate::Result<Option<String>> {
    Ok(metadata(ctx, path).await?.mimetype)
}

/// Last modification of an item, in seconds since the unix epoch.
///
/// # Errors
///
/// Same as [`metadata`].
pub async fn timestamp(ctx: &Context, path: &str) -> crate::Result<Option<i64>> {
    Ok(metadata(ctx, path).await?.timestamp)
}

/// List the direct children of a directory, in the order Graph returns
/// them. See [`Context::locate_directory`] for how `dir` is resolved.
///
/// # Errors
///
/// - [`graph_fs::Error::NotFound`] if there is no such directory
/// - Graph and network errors
#[instrument(skip(ctx))]
pub async fn list_contents(ctx: &Context, dir: &str) -> crate::Result<Vec<Metadata>> {
    let location = ctx.locate_directory(dir).await?;
    let folder = ctx
        .fs
        .item_by_path(&location.prefix, &location.item)
        .await?;

    let children = ctx.fs.children(&location.prefix, &folder.id).await?;

    debug!("listed {} children", children.len());

    Ok(children.into_iter().map(Into::into).collect())
}

/// Silently grant `principal` read and write access to an item. `None` if
/// there is no such item.
///
/// # Errors
///
/// - unknown principal
/// - any other error except the item not existing
#[instrument(skip(ctx))]
pub async fn invite_user(
    ctx: &Context,
    path: &str,
    principal: &str,
) -> crate::Result<Option<Vec<Permission>>> {
    let (location, item) = match lookup(ctx, path).await? {
        Some(found) => found,
        None => return Ok(None),
    };

    let permissions = match found(
        ctx.fs
            .invite(&location.prefix, &item.id, &InviteRequest::read_write(principal))
            .await,
    )? {
        Some(permissions) => permissions,
        None => return Ok(None),
    };

    debug!("granted {} permission(s)", permissions.len());

    Ok(Some(permissions))
}
