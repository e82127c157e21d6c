//! CLI 層（引数解析）

pub mod args;

pub use args::{
    parse_args, print_completion, Config, ParseOutcome, DEFAULT_CAPTURE_COMMAND,
    DEFAULT_OUTPUT_TEMPLATE,
};
