pub(crate) mod comment_repository;
pub(crate) mod image_store;
pub(crate) mod interaction_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
