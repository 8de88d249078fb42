//! Multipart parsing for the report submission form.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{NewReport, PhotoUpload};

/// A fully parsed submission.
#[derive(Debug)]
pub(crate) struct Submission {
    pub report: NewReport,
    pub photo: PhotoUpload,
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(err.body_text())
    } else {
        Error::multipart(err.body_text())
    }
}

async fn text(field: Field<'_>) -> Result<String> {
    field.text().await.map_err(multipart_error)
}

/// Read the submission fields out of a multipart body.
///
/// Every one of `photo`, `name`, `age`, `location` and `details` must be
/// present; their contents are not checked. A `photo` part without a file
/// name (a form sent with no file chosen) counts as missing. Unknown parts
/// are skipped.
pub(crate) async fn read_submission(mut multipart: Multipart) -> Result<Submission> {
    let mut name = None;
    let mut age = None;
    let mut location = None;
    let mut details = None;
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !file_name.is_empty() {
                    photo = Some(PhotoUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "name" => name = Some(text(field).await?),
            "age" => age = Some(text(field).await?),
            "location" => location = Some(text(field).await?),
            "details" => details = Some(text(field).await?),
            other => debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(Submission {
        photo: photo.ok_or(Error::missing_field("photo"))?,
        report: NewReport {
            name: name.ok_or(Error::missing_field("name"))?,
            age: age.ok_or(Error::missing_field("age"))?,
            location: location.ok_or(Error::missing_field("location"))?,
            details: details.ok_or(Error::missing_field("details"))?,
        },
    })
}
