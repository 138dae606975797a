pub mod json;
pub mod model;
pub mod reporter;
pub mod text;
