/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error, ErrorContext, ErrorKind};
use crate::types::CompletedPart;
use crate::{MAX_PART_NUMBER, MIN_PART_NUMBER};

/// The ordered list of parts used to finalize an upload session.
///
/// A manifest is non-empty, strictly ascending by part number, and has one eTag per part
/// number. Both constructors enforce this before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionManifest {
    parts: Vec<CompletedPart>,
}

impl CompletionManifest {
    /// Build a manifest from parts in any order.
    ///
    /// Parts are sorted by part number. Entries repeating the same part number and eTag
    /// collapse into one. Fails with:
    ///
    /// * `InvalidArgument` if `parts` is empty or a part number is outside `1..=10000`
    /// * `DuplicatePart` if one part number is declared with two different eTags
    pub fn build<I>(parts: I) -> Result<CompletionManifest, Error>
    where
        I: IntoIterator,
        I::Item: Into<CompletedPart>,
    {
        let mut parts: Vec<CompletedPart> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(error::invalid_argument(
                "a completion manifest requires at least one part",
            ));
        }
        for part in &parts {
            check_part_number(part)?;
        }

        // stable sort keeps the first-declared entry first among duplicates
        parts.sort_by_key(|p| p.part_number);

        let mut merged: Vec<CompletedPart> = Vec::with_capacity(parts.len());
        for part in parts {
            match merged.last_mut() {
                Some(prev) if prev.part_number == part.part_number => {
                    if prev.e_tag != part.e_tag {
                        return Err(Error::new(
                            ErrorKind::DuplicatePart,
                            format!(
                                "part {} declared with conflicting eTags {} and {}",
                                part.part_number, prev.e_tag, part.e_tag
                            ),
                        )
                        .with_context(ErrorContext::default().with_part_number(part.part_number)));
                    }
                    // keep whatever extra detail either duplicate carried
                    if prev.checksum.is_none() {
                        prev.checksum = part.checksum;
                    }
                    if prev.size.is_none() {
                        prev.size = part.size;
                    }
                }
                _ => merged.push(part),
            }
        }

        Ok(CompletionManifest { parts: merged })
    }

    /// Accept a manifest the caller has already ordered.
    ///
    /// Fails with `InvalidArgument` if `parts` is empty, a part number is out of range, or
    /// part numbers are not strictly ascending.
    pub fn try_from_ordered(parts: Vec<CompletedPart>) -> Result<CompletionManifest, Error> {
        if parts.is_empty() {
            return Err(error::invalid_argument(
                "a completion manifest requires at least one part",
            ));
        }
        for part in &parts {
            check_part_number(part)?;
        }
        if let Some(pair) = parts
            .windows(2)
            .find(|pair| pair[0].part_number >= pair[1].part_number)
        {
            return Err(error::invalid_argument(format!(
                "manifest is out of order: part {} follows part {}",
                pair[1].part_number, pair[0].part_number
            ))
            .with_context(ErrorContext::default().with_part_number(pair[1].part_number)));
        }
        Ok(CompletionManifest { parts })
    }

    /// The manifest entries in ascending part number order
    pub fn parts(&self) -> &[CompletedPart] {
        &self.parts
    }

    /// The manifest entries as raw input; building from them yields the same manifest.
    pub fn to_raw_parts(&self) -> Vec<CompletedPart> {
        self.parts.clone()
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false; a manifest holds at least one part.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total object size, if every entry declares its part size
    pub fn total_size(&self) -> Option<u64> {
        self.parts.iter().map(|p| p.size).sum()
    }
}

fn check_part_number(part: &CompletedPart) -> Result<(), Error> {
    if (MIN_PART_NUMBER..=MAX_PART_NUMBER).contains(&part.part_number) {
        return Ok(());
    }
    Err(error::invalid_argument(format!(
        "part number {} is outside {MIN_PART_NUMBER}..={MAX_PART_NUMBER}",
        part.part_number
    ))
    .with_context(ErrorContext::default().with_part_number(part.part_number)))
}
