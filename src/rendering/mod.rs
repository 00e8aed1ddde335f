pub mod png_io;

pub use png_io::{decode_any, decode_source, encode_index, encode_rgb, load_mask, load_source};
