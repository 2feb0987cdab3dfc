pub(crate) mod columns;
pub(crate) mod profile;
