//! Fixture models for tests.
//!
//! `FixtureModel` returns canned text and an image URL for every request.
//! `FailingModel` errors on every call, exercising the fallback paths.

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::model::ContentModel;

pub struct FixtureModel {
    pub text: String,
    pub image_url: String,
}

impl FixtureModel {
    pub fn new(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: image_url.into(),
        }
    }
}

#[async_trait]
impl ContentModel for FixtureModel {
    async fn generate_text(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        Ok(self.image_url.clone())
    }
}

pub struct FailingModel;

#[async_trait]
impl ContentModel for FailingModel {
    async fn generate_text(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String> {
        bail!("model offline")
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        bail!("image model offline")
    }
}
