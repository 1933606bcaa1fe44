pub(super) mod build;
mod interaction;
mod view;
