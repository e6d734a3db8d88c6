pub mod markdown;

pub use markdown::{
    codeblock_sentinel, convert, escape_html, extract_fenced_blocks, extract_inline_code,
    inline_sentinel, Extraction,
};
