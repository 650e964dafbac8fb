/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use aws_sdk_s3::primitives::{ByteStream, Length};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

use crate::error::{self, ErrorKind};

/// The contents of a single part.
///
/// A `PartBody` can be opened for reading any number of times. Computing a checksum
/// and then sending the same bytes, or retrying a failed part, each open a fresh reader.
#[derive(Debug, Clone)]
pub struct PartBody {
    inner: Inner,
}

#[derive(Debug, Clone)]
enum Inner {
    /// In-memory buffer to read from
    Buf(Bytes),
    /// Region of a file
    Fs(PathBody),
}

#[derive(Debug, Clone)]
struct PathBody {
    path: PathBuf,
    offset: u64,
    length: u64,
}

impl PartBody {
    /// Create a new `PartBody` from a static byte slice
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(bytes))
    }

    /// Returns a [`PathBodyBuilder`], allowing you to build a `PartBody` from a region
    /// of a file.
    ///
    /// ```no_run
    /// use aws_s3_multipart::io::PartBody;
    ///
    /// fn third_part() -> PartBody {
    ///     PartBody::read_from()
    ///         .path("docs/some-large-file.csv")
    ///         .offset(2 * 8 * 1024 * 1024)
    ///         .length(8 * 1024 * 1024)
    ///         .build()
    ///         .expect("valid path")
    /// }
    /// ```
    pub fn read_from() -> PathBodyBuilder {
        PathBodyBuilder::new()
    }

    /// Create a new `PartBody` that reads a whole file.
    ///
    /// The length of the file is captured here. The contents MUST NOT change while the
    /// body is in use; a changed length is detected and fails the part upload.
    pub fn from_path(path: impl AsRef<Path>) -> Result<PartBody, error::Error> {
        Self::read_from().path(path).build()
    }

    /// Number of bytes this body yields
    pub fn content_length(&self) -> u64 {
        match &self.inner {
            Inner::Buf(bytes) => bytes.len() as u64,
            Inner::Fs(path_body) => path_body.length,
        }
    }

    /// Open a fresh reader over the body.
    pub async fn reader(&self) -> Result<Box<dyn AsyncRead + Send + Unpin>, error::Error> {
        match &self.inner {
            Inner::Buf(bytes) => Ok(Box::new(std::io::Cursor::new(bytes.clone()))),
            Inner::Fs(path_body) => {
                let mut file = tokio::fs::File::open(&path_body.path).await?;
                file.seek(SeekFrom::Start(path_body.offset)).await?;
                Ok(Box::new(file.take(path_body.length)))
            }
        }
    }

    /// A body covering `length` bytes starting at `offset` within this body.
    ///
    /// No data is read or copied.
    pub(crate) fn slice(&self, offset: u64, length: u64) -> PartBody {
        debug_assert!(offset + length <= self.content_length());
        let inner = match &self.inner {
            Inner::Buf(bytes) => {
                let start = offset as usize;
                Inner::Buf(bytes.slice(start..start + length as usize))
            }
            Inner::Fs(path_body) => Inner::Fs(PathBody {
                path: path_body.path.clone(),
                offset: path_body.offset + offset,
                length,
            }),
        };
        PartBody { inner }
    }

    /// Converts the body into a [`ByteStream`] for the S3 client.
    pub(crate) async fn into_byte_stream(self) -> Result<ByteStream, error::Error> {
        match self.inner {
            Inner::Buf(bytes) => Ok(ByteStream::from(bytes)),
            Inner::Fs(path_body) => ByteStream::read_from()
                .path(path_body.path)
                .offset(path_body.offset)
                .length(Length::Exact(path_body.length))
                .build()
                .await
                .map_err(error::from_kind(ErrorKind::IOError)),
        }
    }
}

impl Default for PartBody {
    fn default() -> Self {
        Self::from(Bytes::new())
    }
}

impl From<Bytes> for PartBody {
    fn from(value: Bytes) -> Self {
        Self {
            inner: Inner::Buf(value),
        }
    }
}

impl From<Vec<u8>> for PartBody {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

impl From<&'static [u8]> for PartBody {
    fn from(slice: &'static [u8]) -> PartBody {
        Self::from(Bytes::from_static(slice))
    }
}

impl From<&'static str> for PartBody {
    fn from(slice: &'static str) -> PartBody {
        Self::from(Bytes::from_static(slice.as_bytes()))
    }
}

/// Builder for a file backed [`PartBody`]
#[derive(Debug, Default)]
pub struct PathBodyBuilder {
    path: Option<PathBuf>,
    offset: Option<u64>,
    length: Option<u64>,
}

impl PathBodyBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The file to read from
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Byte offset within the file to start reading at. Defaults to 0.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Number of bytes to read. Defaults to the rest of the file after `offset`.
    ///
    /// Setting this skips the call to retrieve the file size.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Build the body, validating the region against the file size when no explicit
    /// length was given.
    pub fn build(self) -> Result<PartBody, error::Error> {
        let path = self
            .path
            .ok_or_else(|| error::invalid_argument("path is required for a file body"))?;
        let offset = self.offset.unwrap_or_default();

        let length = match self.length {
            Some(length) => length,
            None => {
                let file_len = std::fs::metadata(&path)?.len();
                file_len.checked_sub(offset).ok_or_else(|| {
                    error::invalid_argument(format!(
                        "offset {offset} is past the end of {} ({file_len} bytes)",
                        path.display()
                    ))
                })?
            }
        };

        Ok(PartBody {
            inner: Inner::Fs(PathBody {
                path,
                offset,
                length,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bytes::Bytes;
    use tempfile::NamedTempFile;
    use tokio::io::AsyncReadExt;

    use super::PartBody;
    use crate::error::ErrorKind;

    async fn read_all(body: &PartBody) -> Vec<u8> {
        let mut buf = Vec::new();
        body.reader()
            .await
            .unwrap()
            .read_to_end(&mut buf)
            .await
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_bytes_body_is_rereadable() {
        let body = PartBody::from("a lep is a ball");
        assert_eq!(15, body.content_length());
        assert_eq!(b"a lep is a ball".to_vec(), read_all(&body).await);
        assert_eq!(b"a lep is a ball".to_vec(), read_all(&body).await);
    }

    #[tokio::test]
    async fn test_path_body_region() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"a lep is a ball, a tay is a hammer")
            .unwrap();

        let whole = PartBody::from_path(tmp.path()).unwrap();
        assert_eq!(34, whole.content_length());

        let region = PartBody::read_from()
            .path(tmp.path())
            .offset(17)
            .length(7)
            .build()
            .unwrap();
        assert_eq!(b"a tay i".to_vec(), read_all(&region).await);

        let nested = whole.slice(2, 10).slice(4, 3);
        assert_eq!(b"is ".to_vec(), read_all(&nested).await);
    }

    #[tokio::test]
    async fn test_path_body_offset_past_end() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"short").unwrap();
        let err = PartBody::read_from()
            .path(tmp.path())
            .offset(6)
            .build()
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = PartBody::from_path("/definitely/not/here").unwrap_err();
        assert_eq!(&ErrorKind::IOError, err.kind());
    }

    #[tokio::test]
    async fn test_slice_bytes() {
        let body = PartBody::from(Bytes::from_static(b"0123456789"));
        assert_eq!(b"345".to_vec(), read_all(&body.slice(3, 3)).await);
        assert_eq!(0, body.slice(10, 0).content_length());
    }
}
