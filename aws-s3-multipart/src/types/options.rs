/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

const META_PREFIX: &str = "x-amz-meta-";

/// Options recognized when initiating an upload.
///
/// Everything here is applied to the assembled object. Options a store does not understand
/// never reach it: build from raw header pairs with [`UploadOptions::from_headers`] and
/// unrecognized names are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub(crate) content_type: Option<String>,
    pub(crate) cache_control: Option<String>,
    pub(crate) content_disposition: Option<String>,
    pub(crate) content_encoding: Option<String>,
    pub(crate) content_language: Option<String>,
    pub(crate) metadata: HashMap<String, String>,
    pub(crate) storage_class: Option<String>,
    pub(crate) tagging: Option<String>,
    pub(crate) server_side_encryption: Option<ServerSideEncryption>,
}

/// Server-side encryption applied to the uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServerSideEncryption {
    /// Store managed keys (`AES256`)
    S3,
    /// KMS managed keys (`aws:kms`)
    Kms {
        /// Key to use; the store default key when absent
        key_id: Option<String>,
        /// Base64 encoded JSON encryption context
        context: Option<String>,
    },
    /// Customer provided key. Every part upload and the completion must carry the same key.
    Customer(SseCustomerKey),
}

/// A customer provided encryption key (SSE-C).
#[derive(Clone, PartialEq, Eq)]
pub struct SseCustomerKey {
    algorithm: String,
    key: String,
    key_md5: String,
}

impl SseCustomerKey {
    /// An `AES256` key from its raw 32 bytes.
    pub fn aes256(raw_key: &[u8; 32]) -> Self {
        Self {
            algorithm: "AES256".to_owned(),
            key: aws_smithy_types::base64::encode(raw_key),
            key_md5: aws_smithy_types::base64::encode(md5::compute(raw_key).0),
        }
    }

    /// A key from its already encoded header values.
    pub fn from_encoded(
        algorithm: impl Into<String>,
        key: impl Into<String>,
        key_md5: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            key: key.into(),
            key_md5: key_md5.into(),
        }
    }

    /// The encryption algorithm, e.g. `AES256`
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The base64 encoded key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The base64 encoded MD5 digest of the key
    pub fn key_md5(&self) -> &str {
        &self.key_md5
    }
}

impl std::fmt::Debug for SseCustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseCustomerKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"** redacted **")
            .field("key_md5", &self.key_md5)
            .finish()
    }
}

impl UploadOptions {
    /// Build options from raw `(header name, value)` pairs.
    ///
    /// Recognized names (case-insensitive): `Content-Type`, `Cache-Control`,
    /// `Content-Disposition`, `Content-Encoding`, `Content-Language`, `x-amz-meta-*`,
    /// `x-amz-storage-class`, `x-amz-tagging` and the `x-amz-server-side-encryption*`
    /// family. Anything else is ignored.
    pub fn from_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = UploadOptions::default();
        let mut sse: Option<String> = None;
        let mut kms_key_id = None;
        let mut kms_context = None;
        let mut customer = (None, None, None);

        for (name, value) in headers {
            let name = name.as_ref().to_ascii_lowercase();
            let value = value.into();
            match name.as_str() {
                "content-type" => options.content_type = Some(value),
                "cache-control" => options.cache_control = Some(value),
                "content-disposition" => options.content_disposition = Some(value),
                "content-encoding" => options.content_encoding = Some(value),
                "content-language" => options.content_language = Some(value),
                "x-amz-storage-class" => options.storage_class = Some(value),
                "x-amz-tagging" => options.tagging = Some(value),
                "x-amz-server-side-encryption" => sse = Some(value),
                "x-amz-server-side-encryption-aws-kms-key-id" => kms_key_id = Some(value),
                "x-amz-server-side-encryption-context" => kms_context = Some(value),
                "x-amz-server-side-encryption-customer-algorithm" => customer.0 = Some(value),
                "x-amz-server-side-encryption-customer-key" => customer.1 = Some(value),
                "x-amz-server-side-encryption-customer-key-md5" => customer.2 = Some(value),
                meta if meta.starts_with(META_PREFIX) && meta.len() > META_PREFIX.len() => {
                    options
                        .metadata
                        .insert(meta[META_PREFIX.len()..].to_owned(), value);
                }
                _ => tracing::debug!("ignoring unrecognized upload option `{name}`"),
            }
        }

        options.server_side_encryption = match (sse.as_deref(), customer) {
            (_, (Some(algorithm), Some(key), Some(key_md5))) => {
                Some(ServerSideEncryption::Customer(
                    SseCustomerKey::from_encoded(algorithm, key, key_md5),
                ))
            }
            (Some("aws:kms") | Some("aws:kms:dsse"), _) => Some(ServerSideEncryption::Kms {
                key_id: kms_key_id,
                context: kms_context,
            }),
            (Some("AES256"), _) => Some(ServerSideEncryption::S3),
            (Some(other), _) => {
                tracing::debug!("ignoring unrecognized server side encryption `{other}`");
                None
            }
            (None, _) => None,
        };

        options
    }

    /// Set the content type of the assembled object
    pub fn content_type(mut self, input: impl Into<String>) -> Self {
        self.content_type = Some(input.into());
        self
    }

    /// Set caching behavior along the request/reply chain
    pub fn cache_control(mut self, input: impl Into<String>) -> Self {
        self.cache_control = Some(input.into());
        self
    }

    /// Set presentational information for the object
    pub fn content_disposition(mut self, input: impl Into<String>) -> Self {
        self.content_disposition = Some(input.into());
        self
    }

    /// Set the content encodings applied to the object
    pub fn content_encoding(mut self, input: impl Into<String>) -> Self {
        self.content_encoding = Some(input.into());
        self
    }

    /// Set the language the content is in
    pub fn content_language(mut self, input: impl Into<String>) -> Self {
        self.content_language = Some(input.into());
        self
    }

    /// Add a user metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the storage class
    pub fn storage_class(mut self, input: impl Into<String>) -> Self {
        self.storage_class = Some(input.into());
        self
    }

    /// Set the tag set, URL query encoded (e.g. `Key1=Value1`)
    pub fn tagging(mut self, input: impl Into<String>) -> Self {
        self.tagging = Some(input.into());
        self
    }

    /// Set the server-side encryption to apply
    pub fn server_side_encryption(mut self, input: ServerSideEncryption) -> Self {
        self.server_side_encryption = Some(input);
        self
    }

    /// The content type
    pub fn get_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The cache control directive
    pub fn get_cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    /// The content disposition
    pub fn get_content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    /// The content encoding
    pub fn get_content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    /// The content language
    pub fn get_content_language(&self) -> Option<&str> {
        self.content_language.as_deref()
    }

    /// User metadata
    pub fn get_metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// The storage class
    pub fn get_storage_class(&self) -> Option<&str> {
        self.storage_class.as_deref()
    }

    /// The tag set
    pub fn get_tagging(&self) -> Option<&str> {
        self.tagging.as_deref()
    }

    /// The server-side encryption setting
    pub fn get_server_side_encryption(&self) -> Option<&ServerSideEncryption> {
        self.server_side_encryption.as_ref()
    }

    /// The customer provided key, if SSE-C is configured
    pub fn sse_customer_key(&self) -> Option<&SseCustomerKey> {
        match &self.server_side_encryption {
            Some(ServerSideEncryption::Customer(key)) => Some(key),
            _ => None,
        }
    }
}
