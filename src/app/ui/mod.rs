mod controls;
mod details;
mod finder;
mod panels;
mod status;
