/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time;

use aws_s3_multipart::io::PartBody;
use aws_s3_multipart::manifest::CompletionManifest;
use aws_s3_multipart::types::{
    CompletedPart, ConcurrencySetting, FailedMultipartUploadPolicy, PartSize, UploadSession,
};
use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use tracing::{debug_span, Instrument};

type BoxError = Box<dyn Error + Send + Sync>;

const ONE_MEGABYTE: u64 = 1000 * 1000;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "mpu")]
#[command(about = "Uploads files to S3 as resumable multipart uploads.")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Number of concurrent part uploads to perform.
    #[arg(long, default_value_t = 8, global = true)]
    concurrency: usize,

    /// Part size to use
    #[arg(long, default_value_t = 8388608, global = true)]
    part_size: u64,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Upload a local file to an S3 object
    Upload {
        /// File to upload
        source: PathBuf,
        /// Destination <S3Uri>
        dest: S3Uri,
        /// Keep uploaded parts if the upload fails so it can be resumed
        #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
        retain: bool,
    },
    /// List in-progress uploads under a bucket or prefix
    List {
        /// Bucket or prefix to list <S3Uri>
        target: S3Uri,
    },
    /// Upload the parts an interrupted upload is missing and complete it
    Resume {
        /// The file originally being uploaded
        source: PathBuf,
        /// Destination of the interrupted upload <S3Uri>
        dest: S3Uri,
        /// Upload ID to resume; the most recent upload for the key when absent
        #[arg(long)]
        upload_id: Option<String>,
    },
    /// Abort in-progress uploads started more than the given number of hours ago
    AbortStale {
        /// Bucket or prefix to clean up <S3Uri>
        target: S3Uri,
        /// Minimum age in hours
        #[arg(long, default_value_t = 24)]
        older_than_hours: u64,
    },
}

#[derive(Clone, Debug)]
struct S3Uri {
    bucket: String,
    key: String,
}

impl FromStr for S3Uri {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s
            .strip_prefix("s3://")
            .ok_or_else(|| format!("{s} is not an s3:// URI"))?;
        let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
        Ok(S3Uri {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }
}

async fn client(args: &Args) -> aws_s3_multipart::Client {
    let config = aws_s3_multipart::from_env()
        .concurrency(ConcurrencySetting::Explicit(args.concurrency))
        .part_size(PartSize::Target(args.part_size))
        .load()
        .await;
    aws_s3_multipart::Client::new(config)
}

async fn do_upload(
    client: aws_s3_multipart::Client,
    source: &PathBuf,
    dest: &S3Uri,
    retain: bool,
) -> Result<(), BoxError> {
    let policy = if retain {
        FailedMultipartUploadPolicy::Retain
    } else {
        FailedMultipartUploadPolicy::AbortUpload
    };
    let body = PartBody::from_path(source)?;
    let obj_size_bytes = body.content_length();

    println!("starting upload");
    let start = time::Instant::now();
    let handle = client
        .upload()
        .bucket(&dest.bucket)
        .key(&dest.key)
        .body(body)
        .failed_multipart_upload_policy(policy)
        .initiate()?;

    let output = handle.join().await?;
    let elapsed = start.elapsed();
    tracing::info!("upload output: {output:?}");

    let obj_size_megabytes = obj_size_bytes as f64 / ONE_MEGABYTE as f64;
    let obj_size_megabits = obj_size_megabytes * 8f64;
    println!(
        "uploaded {obj_size_bytes} bytes ({obj_size_megabytes} MB) in {elapsed:?}; Mb/s: {}",
        obj_size_megabits / elapsed.as_secs_f64()
    );
    Ok(())
}

async fn do_list(client: aws_s3_multipart::Client, target: &S3Uri) -> Result<(), BoxError> {
    let mut paginator = client
        .list_uploads()
        .bucket(&target.bucket)
        .prefix(&target.key)
        .into_paginator()?;
    while let Some(page) = paginator.next_page().await {
        for upload in page?.items() {
            println!("{}\t{}", upload.upload_id(), upload.key());
        }
    }
    Ok(())
}

async fn find_session(
    client: &aws_s3_multipart::Client,
    dest: &S3Uri,
    upload_id: Option<String>,
) -> Result<UploadSession, BoxError> {
    if let Some(upload_id) = upload_id {
        return Ok(UploadSession::new(&dest.bucket, &dest.key, upload_id));
    }
    let found = client
        .find_uploads()
        .bucket(&dest.bucket)
        .key(&dest.key)
        .send()
        .await?;
    found
        .into_iter()
        .max_by_key(|upload| upload.initiated())
        .map(|upload| upload.session())
        .ok_or_else(|| {
            format!(
                "no upload in progress for s3://{}/{}",
                dest.bucket, dest.key
            )
            .into()
        })
}

async fn do_resume(
    client: aws_s3_multipart::Client,
    part_size: u64,
    source: &PathBuf,
    dest: &S3Uri,
    upload_id: Option<String>,
) -> Result<(), BoxError> {
    let session = find_session(&client, dest, upload_id).await?;
    let resumed = client.resume_upload().session(session).send().await?;

    let file_len = tokio::fs::metadata(source).await?.len();
    let part_count = file_len.div_ceil(part_size).max(1) as u32;
    let missing = resumed.missing_parts(1..=part_count);
    println!(
        "resuming {}: {} of {part_count} parts missing",
        resumed.session().upload_id(),
        missing.len()
    );

    let mut parts: Vec<CompletedPart> = resumed.parts().iter().cloned().map(Into::into).collect();
    for part_number in missing {
        let offset = (part_number as u64 - 1) * part_size;
        let body = PartBody::read_from()
            .path(source)
            .offset(offset)
            .length(part_size.min(file_len - offset))
            .build()?;
        let part = client
            .upload_part()
            .session(resumed.session().clone())
            .part_number(part_number)
            .body(body)
            .send()
            .instrument(debug_span!("resume-part", part_number))
            .await?;
        parts.push(part.into());
    }

    let object = client
        .complete_upload()
        .session(resumed.session().clone())
        .manifest(CompletionManifest::build(parts)?)
        .send()
        .await?;
    println!("completed s3://{}/{}", object.bucket(), object.key());
    Ok(())
}

async fn do_abort_stale(
    client: aws_s3_multipart::Client,
    target: &S3Uri,
    older_than_hours: u64,
) -> Result<(), BoxError> {
    let cutoff = time::SystemTime::now() - time::Duration::from_secs(older_than_hours * 3600);
    let aborted = client
        .abort_incomplete_uploads()
        .bucket(&target.bucket)
        .prefix(&target.key)
        .initiated_before(cutoff)
        .send()
        .await?;
    for session in &aborted {
        println!("aborted {}\t{}", session.upload_id(), session.key());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let client = client(&args).await;
    let result = match &args.command {
        Command::Upload {
            source,
            dest,
            retain,
        } => do_upload(client, source, dest, *retain).await,
        Command::List { target } => do_list(client, target).await,
        Command::Resume {
            source,
            dest,
            upload_id,
        } => do_resume(client, args.part_size, source, dest, upload_id.clone()).await,
        Command::AbortStale {
            target,
            older_than_hours,
        } => do_abort_stale(client, target, *older_than_hours).await,
    };

    if let Err(ref err) = result {
        tracing::error!("command failed: {}", DisplayErrorContext(err.as_ref()));
    }

    Ok(())
}
