// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Selector with the portal base URL spliced in:
/// `sel!("a[href^='{}/items/']", base)`.
#[macro_export]
macro_rules! sel {
    ($tmpl:literal, $base:expr) => {
        ::std::format!($tmpl, $base.trim_end_matches('/'))
    };
}
