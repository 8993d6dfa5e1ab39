pub mod message;
pub mod upload;

pub use message::{ActionExample, Attachment, Message, ResponseContent};
pub use upload::{
    Block, DelegationProof, FileBlob, Principal, ProgressCallback, SpaceDid, UploadOptions,
    UploadProgress,
};
