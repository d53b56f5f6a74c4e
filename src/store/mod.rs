pub mod error;
pub mod imgur;
pub mod s3;

pub use error::UploadError;
pub use imgur::ImgurStore;
pub use s3::S3Store;

/// Seam for durable, publicly resolvable image hosting.
///
/// The generator's source URLs expire; everything posted back to chat must
/// go through one of these first.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore {
    /// Upload `image` and return its stable public URL. `naming_hint` is
    /// free text (typically the prompt) a backend may work into the object
    /// name.
    async fn upload(&self, image: &[u8], naming_hint: &str) -> Result<String, UploadError>;
}

/// Runtime-selected store backend.
pub enum Store {
    S3(S3Store),
    Imgur(ImgurStore),
}

impl ArtifactStore for Store {
    async fn upload(&self, image: &[u8], naming_hint: &str) -> Result<String, UploadError> {
        match self {
            Store::S3(store) => store.upload(image, naming_hint).await,
            Store::Imgur(store) => store.upload(image, naming_hint).await,
        }
    }
}
