use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

pub mod build_image;
pub mod transcribe;

pub use build_image::BuildImageCommand;
pub use transcribe::TranscribeCommand;

#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>>;
}
