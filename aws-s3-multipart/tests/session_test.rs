/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_s3_multipart::error::ErrorKind;
use aws_s3_multipart::io::PartBody;
use aws_s3_multipart::manifest::CompletionManifest;
use aws_s3_multipart::types::{
    ChecksumAlgorithm, PartChecksum, ServerSideEncryption, SseCustomerKey, UploadOptions,
};
use aws_s3_multipart::{Client, Config};
use bytes::Bytes;
use test_common::InMemoryStore;

const PART_LEN: usize = 64 * 1024;

fn client(store: &InMemoryStore) -> Client {
    let config = Config::builder().store(store.clone()).build().unwrap();
    Client::new(config)
}

#[tokio::test]
async fn test_two_part_upload_end_to_end() {
    let store = InMemoryStore::new();
    let client = client(&store);

    let session = client
        .initiate_upload()
        .bucket("b")
        .key("big.bin")
        .send()
        .await
        .unwrap();
    assert_eq!("big.bin", session.key());
    assert_eq!(
        Some(ChecksumAlgorithm::Crc64Nvme),
        session.checksum_algorithm()
    );

    // second part first, the manifest restores the order
    let second = client
        .upload_part()
        .session(session.clone())
        .part_number(2)
        .body(PartBody::from(vec![0xFF; PART_LEN]))
        .send()
        .await
        .unwrap();
    let first = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from(vec![0x00; PART_LEN]))
        .send()
        .await
        .unwrap();
    assert_eq!(PART_LEN as u64, first.size());
    assert_ne!(first.e_tag(), second.e_tag());

    let object = client
        .complete_upload()
        .session(session)
        .manifest(CompletionManifest::build([second, first]).unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!("big.bin", object.key());
    assert_eq!(Some(131072), object.size());
    assert!(object.e_tag().unwrap().ends_with("-2\""));

    let data = store.object("b", "big.bin").await.unwrap();
    let mut expected = vec![0x00; PART_LEN];
    expected.extend(vec![0xFF; PART_LEN]);
    assert_eq!(Bytes::from(expected), data);
    assert_eq!(0, store.upload_count().await);
}

#[tokio::test]
async fn test_parts_uploaded_from_separate_tasks() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for part_number in 1..=4u32 {
        let client = client.clone();
        let session = session.clone();
        tasks.spawn(async move {
            client
                .upload_part()
                .session(session)
                .part_number(part_number)
                .body(PartBody::from(vec![part_number as u8; 16]))
                .send()
                .await
        });
    }
    let mut parts = Vec::new();
    while let Some(part) = tasks.join_next().await {
        parts.push(part.unwrap().unwrap());
    }

    let object = client
        .complete_upload()
        .session(session)
        .manifest(CompletionManifest::build(parts).unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(Some(64), object.size());
    let data = store.object("b", "k").await.unwrap();
    assert_eq!(&[1u8; 16][..], &data[..16]);
    assert_eq!(&[4u8; 16][..], &data[48..]);
}

#[tokio::test]
async fn test_complete_after_abort_fails() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();
    let part = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from_static(b"hello world"))
        .send()
        .await
        .unwrap();

    let aborted = client
        .abort_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(Some(session.upload_id()), aborted.upload_id());

    let err = client
        .complete_upload()
        .session(session.clone())
        .parts(part)
        .send()
        .await
        .unwrap_err();
    assert!(err.is_session_gone(), "{err:?}");
    assert_eq!(Some(session.upload_id()), err.context().upload_id());

    let listing = client.list_uploads().bucket("b").send().await.unwrap();
    assert!(listing.items().is_empty());
    assert!(store.object("b", "k").await.is_none());
}

#[tokio::test]
async fn test_abort_without_parts_drops_session_from_listing() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();
    let other = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();

    let aborted = client
        .abort_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(Some(session.upload_id()), aborted.upload_id());

    let listing = client.list_uploads().bucket("b").send().await.unwrap();
    let ids: Vec<_> = listing.items().iter().map(|u| u.upload_id()).collect();
    assert_eq!(vec![other.upload_id()], ids);
    assert!(store.object("b", "k").await.is_none());
}

#[tokio::test]
async fn test_reupload_replaces_part() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();

    let stale = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from_static(b"first attempt"))
        .send()
        .await
        .unwrap();
    let fresh = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from_static(b"second attempt"))
        .send()
        .await
        .unwrap();
    assert_ne!(stale.e_tag(), fresh.e_tag());

    let err = client
        .complete_upload()
        .session(session.clone())
        .parts(stale)
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::StoreRejected, err.kind());
    assert_eq!(Some("InvalidPart"), err.code());

    // the session is still open after a rejected completion
    client
        .complete_upload()
        .session(session)
        .parts(fresh)
        .send()
        .await
        .unwrap();
    assert_eq!(
        Bytes::from_static(b"second attempt"),
        store.object("b", "k").await.unwrap()
    );
}

#[tokio::test]
async fn test_corrupted_checksum_rejected() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .checksum_algorithm(ChecksumAlgorithm::Crc32)
        .send()
        .await
        .unwrap();

    let err = client
        .upload_part()
        .session(session.clone())
        .part_number(3)
        .body(PartBody::from_static(b"hello world"))
        .checksum(PartChecksum::new(ChecksumAlgorithm::Crc32, "AAAAAA=="))
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::Integrity, err.kind());
    assert_eq!(Some("BadDigest"), err.code());
    assert_eq!(Some(3), err.context().part_number());
    assert_eq!(Some(session.upload_id()), err.context().upload_id());

    let part = client
        .upload_part()
        .session(session)
        .part_number(3)
        .body(PartBody::from_static(b"hello world"))
        .send()
        .await
        .unwrap();
    assert_eq!("DUoRhQ==", part.checksum().value());
}

#[tokio::test]
async fn test_customer_key_required_on_every_request() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let key = SseCustomerKey::aes256(&[7u8; 32]);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("secret")
        .options(
            UploadOptions::default()
                .server_side_encryption(ServerSideEncryption::Customer(key.clone())),
        )
        .send()
        .await
        .unwrap();

    let err = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from_static(b"classified"))
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::StoreRejected, err.kind());
    assert_eq!(Some("InvalidRequest"), err.code());

    let part = client
        .upload_part()
        .session(session.clone())
        .part_number(1)
        .body(PartBody::from_static(b"classified"))
        .sse_customer_key(key.clone())
        .send()
        .await
        .unwrap();
    client
        .complete_upload()
        .session(session)
        .parts(part)
        .sse_customer_key(key)
        .send()
        .await
        .unwrap();
    assert!(store.object("b", "secret").await.is_some());
}

#[tokio::test]
async fn test_invalid_part_number_not_sent() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = client
        .initiate_upload()
        .bucket("b")
        .key("k")
        .send()
        .await
        .unwrap();

    for part_number in [0, 10_001] {
        let err = client
            .upload_part()
            .session(session.clone())
            .part_number(part_number)
            .body(PartBody::from_static(b"x"))
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }
    let parts = client.list_parts().session(session).send().await.unwrap();
    assert!(parts.items().is_empty());
}
