//! Project file attachment: object upload plus version bookkeeping.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{project, project_file};
use crate::error::AppError;
use crate::services::object_store::{storage_key, ObjectStore};
use crate::versioning::{latest_count, resolve_version, FileVersion};

pub const DEFAULT_UPLOADER: &str = "Team";

#[derive(Debug, Clone)]
pub struct NewUpload {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub uploaded_by: String,
}

/// Time-ordered unique file id (UUIDv7: millisecond timestamp + random bits).
pub fn new_file_id() -> String {
    Uuid::now_v7().to_string()
}

/// Uploads one file and records it as the newest version of its name.
///
/// The object is stored first. The sibling lookup, the `is_latest` flip and
/// the insert then run in a single transaction holding a row lock on the
/// project, so concurrent uploads to the same project are serialised. If
/// that transaction fails the stored object is removed again.
pub async fn attach_file(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    project_id: i32,
    upload: NewUpload,
) -> Result<project_file::Model, AppError> {
    let file_id = new_file_id();
    let key = storage_key(project_id, &file_id, &upload.name);
    let size = i64::try_from(upload.data.len())
        .map_err(|_| AppError::BadRequest(format!("{} is too large", upload.name)))?;

    let url = store
        .put_object(&key, upload.data, &upload.mime_type)
        .await?;

    let attached = FileRecord {
        id: file_id,
        project_id,
        name: upload.name,
        mime_type: upload.mime_type,
        size,
        s3_key: key,
        url,
        uploaded_by: upload.uploaded_by,
    };

    let s3_key = attached.s3_key.clone();
    match record_new_version(db, attached).await {
        Ok(model) => {
            tracing::info!(
                project_id,
                file = %model.name,
                version = %model.version,
                "File attached"
            );
            Ok(model)
        }
        Err(e) => {
            if let Err(cleanup) = store.delete_object(&s3_key).await {
                tracing::warn!(key = %s3_key, error = %cleanup, "Orphaned object left after failed insert");
            }
            Err(e)
        }
    }
}

struct FileRecord {
    id: String,
    project_id: i32,
    name: String,
    mime_type: String,
    size: i64,
    s3_key: String,
    url: String,
    uploaded_by: String,
}

async fn record_new_version(
    db: &DatabaseConnection,
    record: FileRecord,
) -> Result<project_file::Model, AppError> {
    let txn = db.begin().await?;

    lock_project(&txn, record.project_id).await?;

    let siblings = project_file::Entity::find()
        .filter(project_file::Column::ProjectId.eq(record.project_id))
        .filter(project_file::Column::Name.eq(record.name.as_str()))
        .all(&txn)
        .await?;

    let flagged = latest_count(&siblings, &record.name);
    if flagged > 1 {
        tracing::warn!(
            project_id = record.project_id,
            file = %record.name,
            flagged,
            "Several versions flagged latest; clearing all before insert"
        );
    }
    let resolution = resolve_version(&siblings, &record.name)
        .map_err(|e| AppError::Conflict(format!("{}: {}", record.name, e)))?;

    project_file::Entity::update_many()
        .col_expr(project_file::Column::IsLatest, Expr::value(false))
        .filter(project_file::Column::ProjectId.eq(record.project_id))
        .filter(project_file::Column::Name.eq(record.name.as_str()))
        .exec(&txn)
        .await?;

    let now = Utc::now().naive_utc();
    let inserted = project_file::ActiveModel {
        id: Set(record.id),
        project_id: Set(record.project_id),
        name: Set(record.name),
        size: Set(record.size),
        mime_type: Set(record.mime_type),
        s3_key: Set(record.s3_key),
        url: Set(record.url),
        upload_date: Set(now),
        version: Set(resolution.version.to_string()),
        uploaded_by: Set(record.uploaded_by),
        is_latest: Set(true),
        previous_version_id: Set(resolution.previous_version_id),
    }
    .insert(&txn)
    .await?;

    touch_project(
        &txn,
        inserted.project_id,
        upload_activity(&inserted.name, resolution.version),
    )
    .await?;

    txn.commit().await?;
    Ok(inserted)
}

/// Deletes the stored object, then the record.
///
/// Older versions of the same name are left as they are: nothing is
/// promoted to latest when the latest version goes away.
pub async fn remove_file(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    file: project_file::Model,
) -> Result<(), AppError> {
    store.delete_object(&file.s3_key).await?;

    let txn = db.begin().await?;
    let res = project_file::Entity::delete_by_id(file.id.clone())
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    touch_project(&txn, file.project_id, format!("Deleted {}", file.name)).await?;
    txn.commit().await?;

    tracing::info!(file_id = %file.id, project_id = file.project_id, "File removed");
    Ok(())
}

async fn lock_project(txn: &DatabaseTransaction, project_id: i32) -> Result<(), AppError> {
    project::Entity::find_by_id(project_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(AppError::NotFound("Project not found".to_string()))?;
    Ok(())
}

async fn touch_project(
    txn: &DatabaseTransaction,
    project_id: i32,
    activity: String,
) -> Result<(), AppError> {
    project::Entity::update_many()
        .col_expr(project::Column::LastActivity, Expr::value(activity))
        .col_expr(
            project::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .filter(project::Column::Id.eq(project_id))
        .exec(txn)
        .await?;
    Ok(())
}

fn upload_activity(name: &str, version: FileVersion) -> String {
    format!("Uploaded {} (v{})", name, version)
}
