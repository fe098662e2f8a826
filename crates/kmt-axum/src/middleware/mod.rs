mod content_type;
mod tower_tracing;

pub(crate) use content_type::html_content_type;
pub(crate) use tower_tracing::TRACING_MIDDLEWARE;
