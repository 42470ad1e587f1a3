// src/extractor/mod.rs

pub mod api;
pub mod media_id;
pub mod normalize;
pub mod redgifs;

use crate::{error::*, models::Resource};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceExtractor: Send + Sync {
    async fn find_resources(&self, post_url: &str) -> AppResult<Vec<Resource>>;
}
