pub mod text_utils;
