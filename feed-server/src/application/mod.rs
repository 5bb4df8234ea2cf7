pub(crate) mod comment_service;
pub(crate) mod feed_service;
pub(crate) mod interaction_service;
pub(crate) mod post_service;
