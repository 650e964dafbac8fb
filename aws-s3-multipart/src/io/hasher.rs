/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error;
use crate::types::{ChecksumAlgorithm, PartChecksum};

/// Default size of the buffer used to stream a body through the hasher
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Computes a part checksum and byte count by streaming a reader once.
///
/// Memory use is bounded by the buffer size regardless of the part size.
#[derive(Debug, Clone)]
pub struct PartHasher {
    algorithm: ChecksumAlgorithm,
    buffer_size: usize,
}

/// Output of [`PartHasher::hash`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDigest {
    checksum: PartChecksum,
    content_length: u64,
}

impl PartDigest {
    /// The computed checksum
    pub fn checksum(&self) -> &PartChecksum {
        &self.checksum
    }

    /// Consume the digest, returning the checksum
    pub fn into_checksum(self) -> PartChecksum {
        self.checksum
    }

    /// Number of bytes consumed from the reader
    pub fn content_length(&self) -> u64 {
        self.content_length
    }
}

impl PartHasher {
    /// Create a hasher for the given algorithm
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size. Values below 1 are treated as 1.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// The algorithm this hasher computes
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Read `reader` to exhaustion and return its checksum and length.
    ///
    /// A read failure fails with `IOError` and discards partial progress. The reader is
    /// consumed; hashing again needs a fresh reader (see [`PartBody::reader`]).
    ///
    /// [`PartBody::reader`]: crate::io::PartBody::reader
    pub async fn hash<R>(&self, mut reader: R) -> Result<PartDigest, error::Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut checksum = self.algorithm.to_smithy().into_impl();
        let mut buf = vec![0u8; self.buffer_size];
        let mut content_length = 0u64;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            checksum.update(&buf[..n]);
            content_length += n as u64;
        }

        let value = aws_smithy_types::base64::encode(checksum.finalize());
        tracing::trace!(
            "computed {} checksum over {content_length} bytes",
            self.algorithm
        );
        Ok(PartDigest {
            checksum: PartChecksum::new(self.algorithm, value),
            content_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use bytes::Bytes;
    use tokio::io::{AsyncRead, ReadBuf};

    use super::PartHasher;
    use crate::error::ErrorKind;
    use crate::types::ChecksumAlgorithm;

    fn expected(algorithm: ChecksumAlgorithm, data: &[u8]) -> String {
        let mut checksum = algorithm.to_smithy().into_impl();
        checksum.update(data);
        aws_smithy_types::base64::encode(checksum.finalize())
    }

    #[tokio::test]
    async fn test_buffer_size_does_not_change_digest() {
        let data = Bytes::from(
            (0..10_000u32)
                .flat_map(|i| i.to_le_bytes())
                .collect::<Vec<u8>>(),
        );
        for algorithm in [
            ChecksumAlgorithm::Crc32,
            ChecksumAlgorithm::Crc32C,
            ChecksumAlgorithm::Crc64Nvme,
            ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256,
        ] {
            let want = expected(algorithm, &data);
            for buffer_size in [1, 7, 4096, 1 << 20] {
                let digest = PartHasher::new(algorithm)
                    .buffer_size(buffer_size)
                    .hash(std::io::Cursor::new(data.clone()))
                    .await
                    .unwrap();
                assert_eq!(want, digest.checksum().value());
                assert_eq!(algorithm, digest.checksum().algorithm());
                assert_eq!(40_000, digest.content_length());
            }
        }
    }

    #[tokio::test]
    async fn test_known_crc32() {
        let digest = PartHasher::new(ChecksumAlgorithm::Crc32)
            .hash(&b"hello world"[..])
            .await
            .unwrap();
        // crc32("hello world") = 0x0d4a1185
        assert_eq!("DUoRhQ==", digest.checksum().value());
        assert_eq!(11, digest.content_length());
    }

    #[tokio::test]
    async fn test_empty_reader() {
        let digest = PartHasher::new(ChecksumAlgorithm::Crc32)
            .hash(&b""[..])
            .await
            .unwrap();
        assert_eq!(0, digest.content_length());
        assert_eq!("AAAAAA==", digest.checksum().value());
    }

    /// Yields some bytes and then fails
    struct FailingReader {
        remaining: usize,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.remaining == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "source went away",
                )));
            }
            let n = self.remaining.min(buf.remaining());
            buf.put_slice(&vec![0u8; n]);
            self.remaining -= n;
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_read_failure_is_io_error() {
        let err = PartHasher::new(ChecksumAlgorithm::Crc64Nvme)
            .buffer_size(16)
            .hash(FailingReader { remaining: 100 })
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::IOError, err.kind());
    }
}
