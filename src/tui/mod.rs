pub mod markdown;
pub mod text_field;
pub mod theme;
pub mod view;

pub use markdown::render_markdown;
pub use text_field::TextField;
pub use theme::Theme;
pub use view::{Action, FormView};
