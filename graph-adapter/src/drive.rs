//! Drives (document libraries) of the configured site.
use graph_fs::drive::{CreateListRequest, Drive, List};
use tracing::{debug, instrument};

use crate::{Context, Error};

/// List all drives of the site.
///
/// # Errors
///
/// Graph and network errors.
#[instrument(skip(ctx))]
pub async fn list(ctx: &Context) -> crate::Result<Vec<Drive>> {
    let drives = ctx.fs.drives(&ctx.site().id).await?;

    debug!("listed {} drives", drives.len());

    Ok(drives)
}

/// Find a drive by its exact, case-sensitive name. If several drives share
/// the name, the first one Graph lists wins.
///
/// # Errors
///
/// - [`Error::DriveInvalid`] if no drive has the name
/// - Graph and network errors
#[instrument(skip(ctx))]
pub async fn get_by_name(ctx: &Context, name: &str) -> crate::Result<Drive> {
    list(ctx)
        .await?
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| Error::DriveInvalid { drive: name.into() })
}

/// Create a document library, which comes with a drive of its own.
///
/// # Errors
///
/// - name already taken
/// - insufficient permissions
/// - Graph and network errors
#[instrument(skip(ctx))]
pub async fn create(ctx: &Context, name: &str) -> crate::Result<List> {
    let list = ctx
        .fs
        .create_list(&ctx.site().id, &CreateListRequest::document_library(name))
        .await?;

    debug!("created list {}", list.id);

    Ok(list)
}

/// **Permanently** delete a drive and everything in it. If it is the
/// current drive, the context falls back to the site's default library.
///
/// # Errors
///
/// - [`Error::DriveInvalid`] if no drive has the name
/// - insufficient permissions
/// - Graph and network errors
#[instrument(skip(ctx))]
pub async fn delete(ctx: &mut Context, name: &str) -> crate::Result<()> {
    let drive = get_by_name(ctx, name).await?;
    let list = ctx.fs.drive_list(&drive.id).await?;

    ctx.fs.delete_list(&ctx.site().id, &list.id).await?;

    debug!("deleted list {} backing drive {}", list.id, drive.id);

    if ctx.drive().map_or(false, |current| current.id == drive.id) {
        ctx.reset_drive();
    }

    Ok(())
}
