/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::{ObjectIdentity, UploadSession};

/// Response type for a completed upload
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutput {
    /// The session the object was assembled from. It is closed now.
    pub session: UploadSession,

    /// The created object
    pub object: ObjectIdentity,
}

impl UploadOutput {
    /// The session the object was assembled from
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// The created object
    pub fn object(&self) -> &ObjectIdentity {
        &self.object
    }
}
