pub mod about;
pub mod charts;
pub mod data;
pub mod form;
pub mod map;
pub mod widgets;

pub use about::render_about_view;
pub use charts::render_charts_view;
pub use data::render_data_view;
pub use form::render_form_view;
pub use map::render_map_view;
