//! Generation infrastructure implementations

pub mod formatter;
pub mod template_renderer;

pub use formatter::{GofmtFormatter, SyntaxCheckFormatter, select_formatter};
pub use template_renderer::TeraTemplateRenderer;
