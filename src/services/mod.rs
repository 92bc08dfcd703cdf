pub mod attachments;
pub mod object_store;
pub mod s3;
