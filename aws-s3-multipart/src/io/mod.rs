/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Streaming checksum computation for part bodies
pub mod hasher;
mod part_body;
pub(crate) mod part_reader;

// re-exports
pub use self::hasher::{PartDigest, PartHasher};
pub use self::part_body::{PartBody, PathBodyBuilder};
