pub mod css;
pub mod errors;
pub mod html;
pub mod node_table;
pub mod rewrite;
pub mod url_calculator;

pub use css::CssProcessor;
pub use errors::{NodeTableError, RewriteError};
pub use html::HtmlProcessor;
pub use node_table::{NodeTable, Scheme};
pub use rewrite::RewriteEngine;
pub use url_calculator::UrlCalculator;
