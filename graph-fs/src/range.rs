//! Ranges of bytes.
use std::{fmt::Display, str::FromStr};

use reqwest::header::HeaderValue;

/// Value of the `Content-Range` header sent with every range of an upload
/// session: `bytes {start}-{end}/{total}` with an inclusive `end`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(clippy::module_name_repetitions)]
pub struct ContentRange {
    start: u64,
    end: u64,
    total: u64,
}

#[allow(clippy::len_without_is_empty)]
impl ContentRange {
    /// Attempt to create a new range.
    ///
    /// ```
    /// use graph_fs::range::ContentRange;
    ///
    /// assert_eq!(ContentRange::try_new(0, 25, 128).unwrap().to_string(), "bytes 0-25/128");
    /// assert!(ContentRange::try_new(10, 5, 128).is_err()); // reversed
    /// assert!(ContentRange::try_new(0, 128, 128).is_err()); // past the end
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the range is reversed or reaches past `total`.
    pub fn try_new(start: u64, end: u64, total: u64) -> Result<Self, InvalidRange> {
        if start > end {
            Err(InvalidRange::Reversed)
        } else if end >= total {
            Err(InvalidRange::OutOfBounds)
        } else {
            Ok(Self { start, end, total })
        }
    }

    /// Split `total` bytes into consecutive ranges of at most `chunk_size`
    /// bytes.
    ///
    /// ```
    /// use graph_fs::range::ContentRange;
    ///
    /// let ranges: Vec<_> = ContentRange::chunks(10, 4).map(|r| r.to_string()).collect();
    ///
    /// assert_eq!(ranges, ["bytes 0-3/10", "bytes 4-7/10", "bytes 8-9/10"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn chunks(total: u64, chunk_size: u64) -> impl Iterator<Item = Self> {
        assert!(chunk_size > 0, "chunk size must not be zero");

        (0..total).step_by(chunk_size_to_step(chunk_size)).map(move |start| Self {
            start,
            end: (start + chunk_size).min(total) - 1,
            total,
        })
    }

    /// Number of bytes in the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end + 1 - self.start
    }

    /// First byte.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte, inclusive.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Size of the whole upload.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Is this the final range of the upload?
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.end + 1 == self.total
    }
}

fn chunk_size_to_step(chunk_size: u64) -> usize {
    usize::try_from(chunk_size).unwrap_or(usize::MAX)
}

impl Display for ContentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

impl From<ContentRange> for HeaderValue {
    fn from(value: ContentRange) -> Self {
        // digits, spaces, dashes and slashes are always valid
        HeaderValue::from_str(&value.to_string()).unwrap()
    }
}

/// One entry of an upload session's `nextExpectedRanges`, like `"26-"` or
/// `"26-99"`.
///
/// ```
/// use graph_fs::range::ByteRange;
///
/// let range: ByteRange = "327680-".parse().unwrap();
///
/// assert_eq!(range.start(), 327_680);
/// assert_eq!(range.end(), None);
/// assert!("-5".parse::<ByteRange>().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(clippy::module_name_repetitions)]
pub struct ByteRange {
    start: u64,
    end: Option<u64>,
}

impl ByteRange {
    /// First byte.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte, inclusive, if bounded.
    #[must_use]
    pub fn end(&self) -> Option<u64> {
        self.end
    }
}

impl FromStr for ByteRange {
    type Err = InvalidRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.trim().split_once('-').ok_or(InvalidRange::Malformed)?;

        let start = start.parse().map_err(|_| InvalidRange::Malformed)?;
        let end = match end {
            "" => None,
            end => Some(end.parse().map_err(|_| InvalidRange::Malformed)?),
        };

        if end.map_or(false, |end| start > end) {
            return Err(InvalidRange::Reversed);
        }

        Ok(Self { start, end })
    }
}

impl Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-", self.start)?;

        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }

        Ok(())
    }
}

/// Invalid range error.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum InvalidRange {
    /// Range is reversed.
    #[error("range is wrong direction")]
    Reversed,

    /// Range reaches past the end of the upload.
    #[error("range ends after the last byte")]
    OutOfBounds,

    /// Not a range at all.
    #[error("malformed range")]
    Malformed,
}
