pub(crate) mod html;
pub(crate) mod iframe;
pub(crate) mod listing;
