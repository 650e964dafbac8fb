/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashSet;

use aws_s3_multipart::error::ErrorKind;
use aws_s3_multipart::io::PartBody;
use aws_s3_multipart::types::UploadSession;
use aws_s3_multipart::{Client, Config};
use futures_util::StreamExt;
use test_common::InMemoryStore;

fn client(store: &InMemoryStore) -> Client {
    let config = Config::builder().store(store.clone()).build().unwrap();
    Client::new(config)
}

async fn initiate(client: &Client, bucket: &str, key: &str) -> UploadSession {
    client
        .initiate_upload()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_paginated_listing_has_no_duplicates() {
    let store = InMemoryStore::new().with_max_page_size(2);
    let client = client(&store);
    let mut expected = HashSet::new();
    for key in ["a", "b", "b", "c", "d"] {
        expected.insert(
            initiate(&client, "bucket", key)
                .await
                .upload_id()
                .to_owned(),
        );
    }
    // other buckets are not listed
    initiate(&client, "other", "a").await;

    let uploads = client
        .list_uploads()
        .bucket("bucket")
        .into_paginator()
        .unwrap()
        .try_collect_items()
        .await
        .unwrap();
    assert_eq!(5, uploads.len());
    let ids: HashSet<_> = uploads.iter().map(|u| u.upload_id().to_owned()).collect();
    assert_eq!(expected, ids);
    assert!(uploads.windows(2).all(|w| w[0].key() <= w[1].key()));
    assert!(uploads.iter().all(|u| u.initiated().is_some()));
}

#[tokio::test]
async fn test_single_page_reports_marker() {
    let store = InMemoryStore::new();
    let client = client(&store);
    for key in ["a", "b", "c"] {
        initiate(&client, "bucket", key).await;
    }

    let page = client
        .list_uploads()
        .bucket("bucket")
        .max_uploads(2)
        .send()
        .await
        .unwrap();
    assert!(page.is_truncated());
    assert_eq!(2, page.items().len());
    let marker = page.next_marker().unwrap().clone();
    assert_eq!("b", marker.key_marker());

    let page = client
        .list_uploads()
        .bucket("bucket")
        .marker(marker)
        .send()
        .await
        .unwrap();
    assert!(!page.is_truncated());
    assert!(page.next_marker().is_none());
    assert_eq!(
        vec!["c"],
        page.items().iter().map(|u| u.key()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_delimiter_groups_common_prefixes() {
    let store = InMemoryStore::new().with_max_page_size(1);
    let client = client(&store);
    for key in ["logs/a", "logs/b", "data/x", "top"] {
        initiate(&client, "bucket", key).await;
    }

    let mut pages = client
        .list_uploads()
        .bucket("bucket")
        .delimiter("/")
        .into_paginator()
        .unwrap()
        .into_page_stream()
        .boxed();
    let mut keys = Vec::new();
    let mut prefixes = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page.unwrap();
        keys.extend(page.items().iter().map(|u| u.key().to_owned()));
        prefixes.extend(page.common_prefixes().iter().cloned());
    }
    assert_eq!(vec!["top"], keys);
    assert_eq!(vec!["data/", "logs/"], prefixes);
}

#[tokio::test]
async fn test_prefix_filters_uploads() {
    let store = InMemoryStore::new();
    let client = client(&store);
    for key in ["logs/a", "logs/b", "data/x"] {
        initiate(&client, "bucket", key).await;
    }

    let page = client
        .list_uploads()
        .bucket("bucket")
        .prefix("logs/")
        .send()
        .await
        .unwrap();
    let keys: Vec<_> = page.items().iter().map(|u| u.key()).collect();
    assert_eq!(vec!["logs/a", "logs/b"], keys);
}

#[tokio::test]
async fn test_list_parts_paginates_in_order() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = initiate(&client, "bucket", "k").await;
    for part_number in [5u32, 1, 3, 2, 4] {
        client
            .upload_part()
            .session(session.clone())
            .part_number(part_number)
            .body(PartBody::from(vec![0u8; part_number as usize]))
            .send()
            .await
            .unwrap();
    }

    let mut paginator = client
        .list_parts()
        .session(session.clone())
        .max_parts(2)
        .into_paginator()
        .unwrap();
    let mut numbers = Vec::new();
    let mut pages = 0;
    while let Some(page) = paginator.next_page().await {
        let page = page.unwrap();
        pages += 1;
        numbers.extend(page.items().iter().map(|p| p.part_number()));
        for part in page.items() {
            assert_eq!(part.part_number() as u64, part.size());
            assert!(part.checksum().is_some());
        }
    }
    assert_eq!(3, pages);
    assert_eq!(vec![1, 2, 3, 4, 5], numbers);
}

#[tokio::test]
async fn test_list_parts_of_aborted_upload() {
    let store = InMemoryStore::new();
    let client = client(&store);
    let session = initiate(&client, "bucket", "k").await;
    client
        .abort_upload()
        .session(session.clone())
        .send()
        .await
        .unwrap();

    let err = client
        .list_parts()
        .session(session)
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::SessionClosed, err.kind());
    assert_eq!(Some("NoSuchUpload"), err.code());
}
