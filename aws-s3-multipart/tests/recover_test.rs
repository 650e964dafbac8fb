/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::{Duration, SystemTime};

use aws_s3_multipart::error::ErrorKind;
use aws_s3_multipart::io::PartBody;
use aws_s3_multipart::types::UploadSession;
use aws_s3_multipart::{Client, Config};
use test_common::InMemoryStore;

fn client(store: &InMemoryStore) -> Client {
    let config = Config::builder().store(store.clone()).build().unwrap();
    Client::new(config)
}

async fn initiate(client: &Client, key: &str) -> UploadSession {
    client
        .initiate_upload()
        .bucket("bucket")
        .key(key)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_find_uploads_matches_exact_key() {
    let store = InMemoryStore::new().with_max_page_size(1);
    let client = client(&store);
    let first = initiate(&client, "video.mp4").await;
    initiate(&client, "video.mp4.tmp").await;
    let second = initiate(&client, "video.mp4").await;

    let found = client
        .find_uploads()
        .bucket("bucket")
        .key("video.mp4")
        .send()
        .await
        .unwrap();
    let mut ids: Vec<_> = found.iter().map(|u| u.upload_id()).collect();
    ids.sort();
    let mut expected = vec![first.upload_id(), second.upload_id()];
    expected.sort();
    assert_eq!(expected, ids);
}

#[tokio::test]
async fn test_resume_then_complete() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = initiate(&client, "k").await;
    for (part_number, body) in [(1u32, "hello "), (3, "!")] {
        client
            .upload_part()
            .session(session.clone())
            .part_number(part_number)
            .body(PartBody::from(body))
            .send()
            .await
            .unwrap();
    }

    // only the session survives the interruption
    let resumed = client
        .resume_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(vec![2], resumed.missing_parts(1..=3));
    assert_eq!(
        session.checksum_algorithm(),
        resumed.session().checksum_algorithm()
    );

    client
        .upload_part()
        .session(resumed.session().clone())
        .part_number(2)
        .body(PartBody::from("world"))
        .send()
        .await
        .unwrap();
    let resumed = client
        .resume_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();
    assert!(resumed.missing_parts(1..=3).is_empty());

    let object = client
        .complete_upload()
        .session(session)
        .manifest(resumed.manifest().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(Some(12), object.size());
    assert_eq!(
        &b"hello world!"[..],
        &store.object("bucket", "k").await.unwrap()[..]
    );
}

#[tokio::test]
async fn test_resume_closed_session() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = initiate(&client, "k").await;
    client
        .abort_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();

    let err = client
        .resume_upload()
        .session(session)
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::SessionClosed, err.kind());
}

#[tokio::test]
async fn test_abort_incomplete_uploads() {
    let store = InMemoryStore::new().with_max_page_size(2);
    let client = client(&store);
    for key in ["tmp/a", "tmp/b", "tmp/c", "keep"] {
        initiate(&client, key).await;
    }

    // nothing was initiated an hour ago
    let aborted = client
        .abort_incomplete_uploads()
        .bucket("bucket")
        .initiated_before(SystemTime::now() - Duration::from_secs(3600))
        .send()
        .await
        .unwrap();
    assert!(aborted.is_empty());
    assert_eq!(4, store.upload_count().await);

    let cutoff = SystemTime::now() + Duration::from_secs(1);
    let mut aborted = client
        .abort_incomplete_uploads()
        .bucket("bucket")
        .prefix("tmp/")
        .initiated_before(cutoff)
        .send()
        .await
        .unwrap();
    aborted.sort_by(|a, b| a.key().cmp(b.key()));
    let keys: Vec<_> = aborted.iter().map(|s| s.key()).collect();
    assert_eq!(vec!["tmp/a", "tmp/b", "tmp/c"], keys);

    let remaining = client.list_uploads().bucket("bucket").send().await.unwrap();
    assert_eq!(
        vec!["keep"],
        remaining
            .items()
            .iter()
            .map(|u| u.key())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_abort_incomplete_uploads_without_cutoff() {
    let store = InMemoryStore::new();
    let client = client(&store);
    for key in ["a", "b"] {
        initiate(&client, key).await;
    }

    let aborted = client
        .abort_incomplete_uploads()
        .bucket("bucket")
        .send()
        .await
        .unwrap();
    assert_eq!(2, aborted.len());
    assert_eq!(0, store.upload_count().await);
}
