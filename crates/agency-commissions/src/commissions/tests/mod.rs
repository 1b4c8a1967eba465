mod common;
mod validators;
