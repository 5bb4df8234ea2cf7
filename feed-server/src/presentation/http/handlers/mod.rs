pub(crate) mod comments;
pub(crate) mod feeds;
pub(crate) mod interactions;
pub(crate) mod posts;
