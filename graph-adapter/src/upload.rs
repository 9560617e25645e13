//! Streaming uploads.
//!
//! Small files are sent in a single `PUT`. Anything larger goes through an
//! upload session: the source is read one chunk at a time and every chunk
//! is `PUT` to the session url with a `Content-Range` header, strictly in
//! order.
use bytes::{Bytes, BytesMut};
use futures_util::{AsyncRead, AsyncReadExt};
use graph_fs::{
    drive::DriveItem,
    files::{ConflictBehavior, UploadRes, UploadSessionRequest},
    range::{ByteRange, ContentRange},
};
use tracing::{debug, instrument, trace, warn};

use crate::{path::filename_from_path, Context, Error};

/// Upload session chunks must be multiples of 320 KiB.
pub const CHUNK_ALIGNMENT: usize = 320 * 1024;

/// Default upload session chunk size, 10 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * CHUNK_ALIGNMENT;

/// Largest size, in bytes, sent in a single request.
pub const SIMPLE_UPLOAD_LIMIT: u64 = 4_000_000;

/// Upload `size` bytes from `source` to `path`, replacing whatever is there.
///
/// # Errors
///
/// - [`std::io::ErrorKind::UnexpectedEof`] if `source` ends before `size`
///   bytes were read, in which case the upload session is cancelled
/// - other read errors
/// - Graph and network errors
#[instrument(skip(ctx, source))]
pub async fn write_stream<R: AsyncRead + Unpin>(
    ctx: &Context,
    path: &str,
    mut source: R,
    size: u64,
) -> crate::Result<bool> {
    let location = ctx.locate(path).await?;

    if size <= SIMPLE_UPLOAD_LIMIT {
        #[allow(clippy::cast_possible_truncation)] // at most SIMPLE_UPLOAD_LIMIT
        let body = read_chunk(&mut source, size as usize).await?;

        let item = ctx
            .fs
            .put_content(&location.prefix, &location.item, body)
            .await?;

        debug!("wrote item {} in a single request", item.id);

        return Ok(true);
    }

    let req = UploadSessionRequest::new(filename_from_path(path), ConflictBehavior::Replace);
    let session = ctx
        .fs
        .create_upload_session(&location.prefix, &location.item, &req)
        .await?;

    debug!("created upload session");

    match upload_chunks(ctx, &session.upload_url, &mut source, size).await {
        Ok(item) => {
            debug!("uploaded item {} through upload session", item.id);
            Ok(true)
        }
        Err(e) => {
            warn!("cancelling upload session: {}", e);

            if let Err(cancel) = ctx.fs.cancel_upload_session(&session.upload_url).await {
                warn!("failed to cancel upload session: {}", cancel);
            }

            Err(e)
        }
    }
}

async fn upload_chunks<R: AsyncRead + Unpin>(
    ctx: &Context,
    upload_url: &str,
    source: &mut R,
    size: u64,
) -> crate::Result<DriveItem> {
    let chunk_size = ctx.config().upload_chunk_size as u64;

    for range in ContentRange::chunks(size, chunk_size) {
        #[allow(clippy::cast_possible_truncation)] // at most the configured chunk size
        let body = read_chunk(source, range.len() as usize).await?;

        trace!("uploading {}", range);

        match ctx.fs.upload_range(upload_url, body, range).await? {
            UploadRes::Complete(item) => return Ok(item),
            UploadRes::Incomplete(progress) => {
                let next = progress
                    .next_expected_ranges
                    .first()
                    .and_then(|r| r.parse::<ByteRange>().ok());

                if let Some(next) = next {
                    if next.start() != range.end() + 1 {
                        return Err(graph_fs::Error::UploadOutOfSync {
                            expected: next.start(),
                            actual: range.end() + 1,
                        }
                        .into());
                    }
                }
            }
        }
    }

    Err(Error::UploadIncomplete(size))
}

/// Read exactly `len` bytes.
async fn read_chunk<R: AsyncRead + Unpin>(source: &mut R, len: usize) -> crate::Result<Bytes> {
    let mut buf = BytesMut::with_capacity(len);
    buf.resize(len, 0);

    source.read_exact(&mut buf).await?;

    Ok(buf.freeze())
}
