//! Validation for image generation settings.

use crate::schema::GptweeterConfig;

use super::helpers::validate_range;

pub(crate) fn validate_images(errors: &mut Vec<String>, config: &GptweeterConfig) {
    let images = &config.images;
    validate_range(
        errors,
        "images.poll_interval_secs",
        images.poll_interval_secs,
        1,
        60,
    );
    validate_range(errors, "images.max_polls", images.max_polls, 1, 100);
    validate_range(
        errors,
        "images.request_timeout_secs",
        images.request_timeout_secs,
        5,
        600,
    );
    validate_range(errors, "images.cache_capacity", images.cache_capacity, 1, 10_000);
}
