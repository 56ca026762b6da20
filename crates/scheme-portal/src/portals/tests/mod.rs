mod common;
mod draft;
mod review;
mod shell;
