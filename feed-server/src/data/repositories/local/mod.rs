pub(crate) mod image_store;
