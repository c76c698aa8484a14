pub(crate) mod error;
pub(crate) mod id;
pub(crate) mod post;
pub(crate) mod search;
pub(crate) mod user;
