/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::cmp;
use std::sync::Mutex;

use crate::error::{Error, ErrorKind};
use crate::io::PartBody;
use crate::MEBIBYTE;

/// Builder for creating a `PartReader`
#[derive(Debug)]
pub(crate) struct Builder {
    body: Option<PartBody>,
    part_size: u64,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            body: None,
            part_size: 5 * MEBIBYTE,
        }
    }

    /// Set the body to split into parts.
    pub(crate) fn body(mut self, body: PartBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the target part size that should be used when reading data.
    ///
    /// All parts except for possibly the last one should be of this size.
    pub(crate) fn part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size.max(1);
        self
    }

    pub(crate) fn build(self) -> PartReader {
        let body = self.body.unwrap_or_default();
        PartReader::new(body, self.part_size)
    }
}

/// Hands out consecutive, numbered regions of a body to concurrent workers.
///
/// Parts are zero-copy views ([`PartBody::slice`]); the bytes are read when a part is
/// hashed and sent. An empty body yields exactly one empty part.
#[derive(Debug)]
pub(crate) struct PartReader {
    body: PartBody,
    part_size: u64,
    state: Mutex<PartReaderState>, // std Mutex
}

#[derive(Debug)]
struct PartReaderState {
    // current start offset
    offset: u64,
    // next part number to hand out
    part_number: u32,
    // total number of bytes remaining to be handed out
    remaining: u64,
}

impl PartReader {
    fn new(body: PartBody, part_size: u64) -> Self {
        let remaining = body.content_length();
        Self {
            body,
            part_size,
            state: Mutex::new(PartReaderState {
                offset: 0,
                part_number: 1,
                remaining,
            }),
        }
    }

    /// Total number of parts this reader hands out
    pub(crate) fn part_count(&self) -> u64 {
        cmp::max(1, self.body.content_length().div_ceil(self.part_size))
    }

    /// The next part to upload, or `None` once the body is exhausted
    pub(crate) fn next_part(&self) -> Result<Option<(u32, PartBody)>, Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::new(ErrorKind::RuntimeError, "part reader state poisoned"))?;
        let empty_body = self.body.content_length() == 0;
        if state.remaining == 0 && !(empty_body && state.part_number == 1) {
            return Ok(None);
        }

        let length = cmp::min(self.part_size, state.remaining);
        let part = self.body.slice(state.offset, length);
        let part_number = state.part_number;
        state.part_number += 1;
        state.offset += length;
        state.remaining -= length;
        Ok(Some((part_number, part)))
    }
}
